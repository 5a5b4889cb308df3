//! CST to AST construction.
//!
//! Flattens the grammar's `(first, rest)` operator sequences into
//! left-associative operator trees, grows lvalue index chains, synthesizes
//! array types for declarators and formal parameters, and constant-folds
//! dimension expressions in place.

use crate::ast::{AstNode, AstOp};
use crate::cst;
use crate::semantic_error::{SemanticError, SemanticErrorKind};
use crate::ty::Ty;

/// Builds the AST for a compile unit. Dimension errors are collected, not
/// fatal: the offending dimension is treated as 0 and construction goes on.
pub fn build_ast(unit: cst::CompileUnit) -> (AstNode, Vec<SemanticError>) {
    let mut builder = AstBuilder { errors: Vec::new() };
    let root = builder.compile_unit(unit);
    (root, builder.errors)
}

/// Evaluates a dimension-sized expression tree: unsigned integer literals
/// combined with `+ - * / %` under wrapping 32-bit arithmetic. Division or
/// modulus by zero, and any other node kind, make the expression unfoldable.
pub fn fold_const_expr(node: &AstNode) -> Option<u32> {
    match node.op {
        AstOp::LeafUint => node.int_val,
        AstOp::Add | AstOp::Sub | AstOp::Mul | AstOp::Div | AstOp::Mod => {
            if node.kids.len() != 2 {
                return None;
            }
            let lhs = fold_const_expr(&node.kids[0])?;
            let rhs = fold_const_expr(&node.kids[1])?;
            match node.op {
                AstOp::Add => Some(lhs.wrapping_add(rhs)),
                AstOp::Sub => Some(lhs.wrapping_sub(rhs)),
                AstOp::Mul => Some(lhs.wrapping_mul(rhs)),
                AstOp::Div => {
                    if rhs == 0 {
                        None
                    } else {
                        Some(lhs / rhs)
                    }
                }
                AstOp::Mod => {
                    if rhs == 0 {
                        None
                    } else {
                        Some(lhs % rhs)
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Like [`fold_const_expr`] but also accepts unary minus, for global
/// variable initializers.
pub fn fold_const_init(node: &AstNode) -> Option<u32> {
    match node.op {
        AstOp::Neg => {
            if node.kids.len() != 1 {
                return None;
            }
            fold_const_init(&node.kids[0]).map(|v| 0u32.wrapping_sub(v))
        }
        _ => fold_const_expr(node),
    }
}

struct AstBuilder {
    errors: Vec<SemanticError>,
}

impl AstBuilder {
    // compileUnit : (funcDef | varDecl)* EOF
    //
    // Global variables are emitted before functions, so a later pass can
    // rely on globals being declared ahead of any function body.
    fn compile_unit(&mut self, unit: cst::CompileUnit) -> AstNode {
        let mut vars = Vec::new();
        let mut funcs = Vec::new();
        for item in unit.items {
            match item {
                cst::TopLevel::Var(decl) => vars.push(self.var_decl(decl)),
                cst::TopLevel::Func(def) => funcs.push(self.func_def(def)),
            }
        }

        let mut root = AstNode::op_node(AstOp::CompileUnit, Vec::new(), 1);
        for var in vars {
            root.insert_son(var);
        }
        for func in funcs {
            root.insert_son(func);
        }
        root
    }

    // funcDef : funcType ID '(' funcFParams? ')' block
    //
    // Children: [type, id, formal-params?, block].
    fn func_def(&mut self, def: cst::FuncDef) -> AstNode {
        let ret_ty = match def.ret {
            cst::FuncType::Int => Ty::int32(),
            cst::FuncType::Void => Ty::void(),
        };
        let mut type_node = AstNode::op_node(AstOp::Type, Vec::new(), def.ret_line);
        type_node.ty = Some(ret_ty);
        let id_node = AstNode::leaf_id(def.name, def.line);

        let mut node = AstNode::op_node(AstOp::FuncDef, vec![type_node, id_node], def.line);
        if !def.params.is_empty() {
            let mut params = AstNode::op_node(AstOp::FuncFormalParams, Vec::new(), def.line);
            for param in def.params {
                params.insert_son(self.func_f_param(param));
            }
            node.insert_son(params);
        }
        node.insert_son(self.block(def.body));
        node
    }

    // funcFParam : basicType ID ('[' expr? ']' ('[' expr ']')*)?
    //
    // An array-typed parameter gets a synthetic first dimension of size 0,
    // the remaining dimensions folded innermost-last, and the whole array
    // type wrapped in a pointer: parameters are passed by address.
    fn func_f_param(&mut self, param: cst::FuncFParam) -> AstNode {
        let base = Ty::int32();
        let mut type_node = AstNode::op_node(AstOp::Type, Vec::new(), param.line);
        type_node.ty = Some(base.clone());
        let id_node = AstNode::leaf_id(param.name.clone(), param.line);

        let mut node = AstNode::op_node(AstOp::FuncFormalParam, Vec::new(), param.line);
        node.insert_son(type_node);
        node.insert_son(id_node);

        let mut complete = base;
        if let Some(array) = param.array {
            let dim0 = AstNode::op_node(
                AstOp::ArrayDim,
                vec![AstNode::leaf_uint(0, param.line)],
                param.line,
            );
            let mut dim_nodes = vec![dim0];
            for expr in array.rest {
                let expr_node = self.expr(expr);
                let line = expr_node.line;
                dim_nodes.push(AstNode::op_node(AstOp::ArrayDim, vec![expr_node], line));
            }

            for dim in dim_nodes[1..].iter_mut().rev() {
                let count = self.fold_dim(dim, &param.name);
                complete = Ty::array_of(&complete, count);
            }
            complete = Ty::array_of(&complete, 0);
            complete = Ty::pointer_of(&complete);

            for dim in dim_nodes {
                node.insert_son(dim);
            }
        }
        node.ty = Some(complete);
        node
    }

    // varDecl : basicType varDef (',' varDef)* ';'
    //
    // One var-decl node per declarator, each with a fresh type node; the
    // complete array type is folded innermost-last onto the base type.
    // Children of var-decl: [type, id, array-dim*, init?].
    fn var_decl(&mut self, decl: cst::VarDecl) -> AstNode {
        let mut stmt_node = AstNode::op_node(AstOp::DeclStmt, Vec::new(), decl.line);
        for def in decl.defs {
            let mut type_node = AstNode::op_node(AstOp::Type, Vec::new(), decl.line);
            type_node.ty = Some(Ty::int32());
            let id_node = AstNode::leaf_id(def.name.clone(), def.line);

            let mut dim_nodes: Vec<AstNode> = Vec::with_capacity(def.dims.len());
            for expr in def.dims {
                let expr_node = self.expr(expr);
                let line = expr_node.line;
                dim_nodes.push(AstNode::op_node(AstOp::ArrayDim, vec![expr_node], line));
            }

            let mut complete = Ty::int32();
            for dim in dim_nodes.iter_mut().rev() {
                let count = self.fold_dim(dim, &def.name);
                complete = Ty::array_of(&complete, count);
            }

            let mut decl_node = AstNode::op_node(AstOp::VarDecl, Vec::new(), def.line);
            decl_node.ty = Some(complete);
            decl_node.insert_son(type_node);
            decl_node.insert_son(id_node);
            for dim in dim_nodes {
                decl_node.insert_son(dim);
            }
            if let Some(init) = def.init {
                decl_node.insert_son(self.init_val(init));
            }
            stmt_node.insert_son(decl_node);
        }
        stmt_node
    }

    /// Folds the dimension expression under an array-dim node. When the
    /// expression folds, it is destroyed and replaced by a literal leaf;
    /// when it does not, it stays in place and the dimension counts as 0.
    fn fold_dim(&mut self, dim: &mut AstNode, name: &str) -> u32 {
        let expr_line = dim.kids[0].line;
        match fold_const_expr(&dim.kids[0]) {
            Some(count) => {
                if count == 0 {
                    self.errors.push(SemanticError::new(
                        SemanticErrorKind::ZeroDimension { name: name.to_string() },
                        expr_line,
                    ));
                }
                dim.replace_son(0, AstNode::leaf_uint(count, expr_line));
                count
            }
            None => {
                self.errors.push(SemanticError::new(
                    SemanticErrorKind::UnfoldableDimension { name: name.to_string() },
                    expr_line,
                ));
                0
            }
        }
    }

    // initVal : expr | '{' initVal (',' initVal)* '}'
    fn init_val(&mut self, init: cst::InitVal) -> AstNode {
        match init {
            cst::InitVal::Expr(expr) => self.expr(expr),
            cst::InitVal::List { vals, line } => {
                let mut node = AstNode::op_node(AstOp::ArrayInit, Vec::new(), line);
                for val in vals {
                    node.insert_son(self.init_val(val));
                }
                node
            }
        }
    }

    fn block(&mut self, block: cst::Block) -> AstNode {
        let mut node = AstNode::op_node(AstOp::Block, Vec::new(), block.line);
        for item in block.items {
            match item {
                cst::BlockItem::Decl(decl) => node.insert_son(self.var_decl(decl)),
                cst::BlockItem::Stmt(stmt) => {
                    if let Some(stmt_node) = self.stmt(stmt) {
                        node.insert_son(stmt_node);
                    }
                }
            }
        }
        node
    }

    /// Empty statements produce no node at all.
    fn stmt(&mut self, stmt: cst::Stmt) -> Option<AstNode> {
        Some(match stmt {
            cst::Stmt::Assign {
                target,
                value,
                line,
            } => {
                let lval_node = self.lval(target);
                let expr_node = self.expr(value);
                AstNode::op_node(AstOp::Assign, vec![lval_node, expr_node], line)
            }
            cst::Stmt::Return { value, line } => {
                let mut node = AstNode::op_node(AstOp::Return, Vec::new(), line);
                if let Some(expr) = value {
                    node.insert_son(self.expr(expr));
                }
                node
            }
            cst::Stmt::Block(block) => self.block(block),
            cst::Stmt::Expr { value: None, .. } => return None,
            cst::Stmt::Expr {
                value: Some(expr),
                line,
            } => {
                let expr_node = self.expr(expr);
                AstNode::op_node(AstOp::ExprStmt, vec![expr_node], line)
            }
            cst::Stmt::If {
                cond,
                then,
                els,
                line,
            } => {
                let cond_node = self.expr(cond);
                let then_node = self.stmt_or_empty_block(*then, line);
                let mut node = AstNode::op_node(AstOp::If, vec![cond_node, then_node], line);
                if let Some(els) = els {
                    node.insert_son(self.stmt_or_empty_block(*els, line));
                }
                node
            }
            cst::Stmt::While { cond, body, line } => {
                let cond_node = self.expr(cond);
                let body_node = self.stmt_or_empty_block(*body, line);
                AstNode::op_node(AstOp::While, vec![cond_node, body_node], line)
            }
            cst::Stmt::Break { line } => AstNode::op_node(AstOp::Break, Vec::new(), line),
            cst::Stmt::Continue { line } => AstNode::op_node(AstOp::Continue, Vec::new(), line),
        })
    }

    /// An empty statement in a branch or loop body becomes an empty block,
    /// so `if`/`while` always have their full child lists.
    fn stmt_or_empty_block(&mut self, stmt: cst::Stmt, line: u32) -> AstNode {
        self.stmt(stmt)
            .unwrap_or_else(|| AstNode::op_node(AstOp::Block, Vec::new(), line))
    }

    // expr : lOrExp
    fn expr(&mut self, expr: cst::Expr) -> AstNode {
        self.l_or_exp(expr)
    }

    // Each binary level reduces left-to-right: the first two operands form
    // a node, then every further operand wraps the accumulator as the new
    // left child. A sequence without operators passes through unwrapped.
    fn l_or_exp(&mut self, exp: cst::LOrExp) -> AstNode {
        let mut left = self.l_and_exp(exp.first);
        for rhs in exp.rest {
            let right = self.l_and_exp(rhs);
            let line = left.line;
            left = AstNode::op_node(AstOp::Or, vec![left, right], line);
        }
        left
    }

    fn l_and_exp(&mut self, exp: cst::LAndExp) -> AstNode {
        let mut left = self.eq_exp(exp.first);
        for rhs in exp.rest {
            let right = self.eq_exp(rhs);
            let line = left.line;
            left = AstNode::op_node(AstOp::And, vec![left, right], line);
        }
        left
    }

    fn eq_exp(&mut self, exp: cst::EqExp) -> AstNode {
        let mut left = self.rel_exp(exp.first);
        for (op, rhs) in exp.rest {
            let op = match op {
                cst::EqOp::Eq => AstOp::Eq,
                cst::EqOp::Ne => AstOp::Ne,
            };
            let right = self.rel_exp(rhs);
            let line = left.line;
            left = AstNode::op_node(op, vec![left, right], line);
        }
        left
    }

    fn rel_exp(&mut self, exp: cst::RelExp) -> AstNode {
        let mut left = self.add_exp(exp.first);
        for (op, rhs) in exp.rest {
            let op = match op {
                cst::RelOp::Lt => AstOp::Lt,
                cst::RelOp::Gt => AstOp::Gt,
                cst::RelOp::Le => AstOp::Le,
                cst::RelOp::Ge => AstOp::Ge,
            };
            let right = self.add_exp(rhs);
            let line = left.line;
            left = AstNode::op_node(op, vec![left, right], line);
        }
        left
    }

    fn add_exp(&mut self, exp: cst::AddExp) -> AstNode {
        let mut left = self.mul_exp(exp.first);
        for (op, rhs) in exp.rest {
            let op = match op {
                cst::AddOp::Add => AstOp::Add,
                cst::AddOp::Sub => AstOp::Sub,
            };
            let right = self.mul_exp(rhs);
            let line = left.line;
            left = AstNode::op_node(op, vec![left, right], line);
        }
        left
    }

    fn mul_exp(&mut self, exp: cst::MulExp) -> AstNode {
        let mut left = self.unary_exp(exp.first);
        for (op, rhs) in exp.rest {
            let op = match op {
                cst::MulOp::Mul => AstOp::Mul,
                cst::MulOp::Div => AstOp::Div,
                cst::MulOp::Mod => AstOp::Mod,
            };
            let right = self.unary_exp(rhs);
            let line = left.line;
            left = AstNode::op_node(op, vec![left, right], line);
        }
        left
    }

    // unaryExp : primaryExp | ID '(' realParamList? ')' | unaryOp unaryExp
    fn unary_exp(&mut self, exp: cst::UnaryExp) -> AstNode {
        match exp {
            cst::UnaryExp::Primary(primary) => self.primary_exp(primary),
            cst::UnaryExp::Call { name, line, args } => {
                let id_node = AstNode::leaf_id(name, line);
                let mut call = AstNode::op_node(AstOp::FuncCall, vec![id_node], line);
                // The real-param list child exists only when there are
                // arguments.
                if !args.is_empty() {
                    let mut params = AstNode::op_node(AstOp::FuncRealParams, Vec::new(), line);
                    for arg in args {
                        params.insert_son(self.expr(arg));
                    }
                    call.insert_son(params);
                }
                call
            }
            cst::UnaryExp::Unary { op, operand, line } => {
                let op = match op {
                    cst::UnaryOp::Neg => AstOp::Neg,
                    cst::UnaryOp::Not => AstOp::Not,
                };
                let operand = self.unary_exp(*operand);
                AstNode::op_node(op, vec![operand], line)
            }
        }
    }

    // primaryExp : '(' expr ')' | DIGIT | lVal
    fn primary_exp(&mut self, exp: cst::PrimaryExp) -> AstNode {
        match exp {
            cst::PrimaryExp::Paren(inner) => self.expr(*inner),
            cst::PrimaryExp::Number { value, line } => AstNode::leaf_uint(value, line),
            cst::PrimaryExp::LVal(lval) => self.lval(lval),
        }
    }

    // lVal : ID ('[' expr ']')*
    //
    // Grows a left-deep chain: array-index(array-index(id, i), j). The
    // leftmost-deepest descendant is always the identifier leaf.
    fn lval(&mut self, lval: cst::LVal) -> AstNode {
        let mut node = AstNode::leaf_id(lval.name, lval.line);
        for index in lval.indices {
            let index_node = self.expr(index);
            let line = node.line;
            node = AstNode::op_node(AstOp::ArrayIndex, vec![node, index_node], line);
        }
        node
    }
}
