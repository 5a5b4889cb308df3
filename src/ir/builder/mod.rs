//! AST to IR lowering.
//!
//! Walks the tagged AST postorder and emits a linear instruction stream per
//! function. Semantic errors are collected and lowering continues with a
//! recovery value; a malformed node shape aborts the compile unit.

use crate::ast::{build as ast_build, AstNode, AstOp};
use crate::ir::symbol_table::{GlobalSymbol, GlobalTable, VarBinding};
use crate::ir::{
    BinOp, FuncId, Function, GlobalVar, IcmpCond, InstKind, Label, LocalId, Module, ValueRef,
};
use crate::semantic_error::{SemanticError, SemanticErrorKind};
use crate::ty::Ty;

mod function_builder;
use self::function_builder::FunctionBuilder;

/// Lowers a compile-unit AST into an IR module. The module may be partial
/// when errors were collected; the caller decides presentation.
pub fn build_module(root: &AstNode) -> (Module, Vec<SemanticError>) {
    let mut module = Module::new();
    let mut table = GlobalTable::new();
    let mut errors = Vec::new();

    if root.op != AstOp::CompileUnit {
        errors.push(shape("compile unit", root.line));
        return (module, errors);
    }

    // First pass: globals and function signatures, so bodies can reference
    // any function and every global.
    let mut pre_funcs = Vec::new();
    for kid in &root.kids {
        let result = match kid.op {
            AstOp::DeclStmt => {
                register_globals(kid, &mut module, &mut table, &mut errors).map(|_| None)
            }
            AstOp::FuncDef => {
                register_function(kid, &mut module, &mut table, &mut errors).map(Some)
            }
            _ => Err(shape("compile unit", kid.line)),
        };
        match result {
            Ok(Some(pre)) => pre_funcs.push(pre),
            Ok(None) => {}
            Err(err) => {
                errors.push(err);
                return (module, errors);
            }
        }
    }

    // Second pass: function bodies.
    for pre in pre_funcs {
        if let Err(err) = build_function(pre, &mut module, &table, &mut errors) {
            errors.push(err);
            return (module, errors);
        }
    }

    (module, errors)
}

fn shape(context: &'static str, line: u32) -> SemanticError {
    SemanticError::new(SemanticErrorKind::MalformedNode { context }, line)
}

/// The declarator's initializer child, if any: everything after the
/// identifier that is not an array-dim node.
fn find_init(decl: &AstNode) -> Option<&AstNode> {
    decl.kids.iter().skip(2).find(|kid| kid.op != AstOp::ArrayDim)
}

fn decl_parts<'n>(decl: &'n AstNode) -> Result<(Ty, &'n str), SemanticError> {
    if decl.op != AstOp::VarDecl {
        return Err(shape("declaration statement", decl.line));
    }
    let ty = decl
        .ty
        .clone()
        .ok_or_else(|| shape("variable declaration", decl.line))?;
    let name = decl
        .kid(1)
        .filter(|kid| kid.op == AstOp::LeafId)
        .and_then(|kid| kid.name())
        .ok_or_else(|| shape("variable declaration", decl.line))?;
    Ok((ty, name))
}

fn register_globals(
    stmt: &AstNode,
    module: &mut Module,
    table: &mut GlobalTable,
    errors: &mut Vec<SemanticError>,
) -> Result<(), SemanticError> {
    for decl in &stmt.kids {
        let (ty, name) = decl_parts(decl)?;
        if table.lookup(name).is_some() {
            errors.push(SemanticError::new(
                SemanticErrorKind::GlobalAlreadyDefined {
                    name: name.to_string(),
                },
                decl.line,
            ));
            continue;
        }

        let mut global = GlobalVar::new(name, ty.clone());
        if let Some(init) = find_init(decl) {
            if init.op == AstOp::ArrayInit || ty.is_array() {
                errors.push(SemanticError::new(
                    SemanticErrorKind::ArrayInitOnGlobal {
                        name: name.to_string(),
                    },
                    init.line,
                ));
            } else {
                match ast_build::fold_const_init(init) {
                    Some(value) => global.set_init(value as i32),
                    None => errors.push(SemanticError::new(
                        SemanticErrorKind::NonConstGlobalInit {
                            name: name.to_string(),
                        },
                        init.line,
                    )),
                }
            }
        }
        let id = module.add_global(global);
        table.register(name.to_string(), GlobalSymbol::Var(id));
    }
    Ok(())
}

struct PreFunc<'n> {
    id: FuncId,
    params: Vec<(String, u32)>,
    body: &'n AstNode,
}

fn register_function<'n>(
    def: &'n AstNode,
    module: &mut Module,
    table: &mut GlobalTable,
    errors: &mut Vec<SemanticError>,
) -> Result<PreFunc<'n>, SemanticError> {
    let ret_ty = def
        .kid(0)
        .filter(|kid| kid.op == AstOp::Type)
        .and_then(|kid| kid.ty.clone())
        .ok_or_else(|| shape("function definition", def.line))?;
    let name = def
        .kid(1)
        .filter(|kid| kid.op == AstOp::LeafId)
        .and_then(|kid| kid.name())
        .ok_or_else(|| shape("function definition", def.line))?;

    let (params_node, body) = match def.kids.len() {
        3 => (None, &def.kids[2]),
        4 => (Some(&def.kids[2]), &def.kids[3]),
        _ => return Err(shape("function definition", def.line)),
    };
    if body.op != AstOp::Block {
        return Err(shape("function definition", body.line));
    }

    let mut func = Function::new(name, ret_ty);
    let mut params = Vec::new();
    if let Some(params_node) = params_node {
        if params_node.op != AstOp::FuncFormalParams {
            return Err(shape("function definition", params_node.line));
        }
        for param in &params_node.kids {
            if param.op != AstOp::FuncFormalParam {
                return Err(shape("formal parameter", param.line));
            }
            let param_ty = param
                .ty
                .clone()
                .ok_or_else(|| shape("formal parameter", param.line))?;
            let param_name = param
                .kid(1)
                .filter(|kid| kid.op == AstOp::LeafId)
                .and_then(|kid| kid.name())
                .ok_or_else(|| shape("formal parameter", param.line))?;
            func.new_local(param_ty, Some(param_name.to_string()), true);
            params.push((param_name.to_string(), param.line));
        }
    }

    let id = module.add_function(func);
    if !table.register(name.to_string(), GlobalSymbol::Func(id)) {
        errors.push(SemanticError::new(
            SemanticErrorKind::FunctionAlreadyDefined {
                name: name.to_string(),
            },
            def.line,
        ));
    }
    Ok(PreFunc {
        id,
        params,
        body,
    })
}

fn build_function(
    pre: PreFunc,
    module: &mut Module,
    table: &GlobalTable,
    errors: &mut Vec<SemanticError>,
) -> Result<(), SemanticError> {
    let mut fb = FunctionBuilder::new(module, pre.id, table, errors);
    fb.symbol_table.push_scope();
    for (index, (name, line)) in pre.params.iter().enumerate() {
        if !fb.symbol_table.insert_local(name.clone(), LocalId(index)) {
            fb.report(
                SemanticErrorKind::ParameterAlreadyDefined { name: name.clone() },
                *line,
            );
        }
    }

    build_block(&mut fb, pre.body)?;

    // Fall off the end of the body: synthesize the missing return.
    let ends_with_ret = matches!(
        fb.func_ref().insts.last().map(|inst| inst.kind),
        Some(InstKind::Ret)
    );
    if !ends_with_ret {
        if fb.ret_ty.is_void() {
            fb.emit_ret(None);
        } else {
            fb.emit_ret(Some(ValueRef::Const(0)));
        }
    }
    fb.symbol_table.pop_scope();
    Ok(())
}

fn build_block(fb: &mut FunctionBuilder, block: &AstNode) -> Result<(), SemanticError> {
    fb.symbol_table.push_scope();
    let mut result = Ok(());
    for kid in &block.kids {
        result = build_stmt(fb, kid);
        if result.is_err() {
            break;
        }
    }
    fb.symbol_table.pop_scope();
    result
}

fn build_stmt(fb: &mut FunctionBuilder, node: &AstNode) -> Result<(), SemanticError> {
    match node.op {
        AstOp::Block => build_block(fb, node),
        AstOp::DeclStmt => {
            for decl in &node.kids {
                build_local_decl(fb, decl)?;
            }
            Ok(())
        }
        AstOp::Assign => {
            let target = node.kid(0).ok_or_else(|| shape("assignment", node.line))?;
            let value_node = node.kid(1).ok_or_else(|| shape("assignment", node.line))?;
            let value = build_rvalue(fb, value_node)?;
            let addr = build_lvalue(fb, target)?;
            store_checked(fb, value, addr, node.line);
            Ok(())
        }
        AstOp::ExprStmt => {
            let expr = node
                .kid(0)
                .ok_or_else(|| shape("expression statement", node.line))?;
            build_rvalue(fb, expr)?;
            Ok(())
        }
        AstOp::If => {
            let cond = node.kid(0).ok_or_else(|| shape("if", node.line))?;
            let then = node.kid(1).ok_or_else(|| shape("if", node.line))?;
            let els = node.kid(2);

            let then_label = fb.func().new_label();
            let end_label = fb.func().new_label();
            let else_label = if els.is_some() {
                fb.func().new_label()
            } else {
                end_label
            };

            build_cond(fb, cond, then_label, else_label)?;
            fb.emit_label(then_label);
            build_stmt(fb, then)?;
            if let Some(els) = els {
                fb.emit_br(end_label);
                fb.emit_label(else_label);
                build_stmt(fb, els)?;
            }
            fb.emit_label(end_label);
            Ok(())
        }
        AstOp::While => {
            let cond = node.kid(0).ok_or_else(|| shape("while", node.line))?;
            let body = node.kid(1).ok_or_else(|| shape("while", node.line))?;

            let header_label = fb.func().new_label();
            let body_label = fb.func().new_label();
            let exit_label = fb.func().new_label();

            fb.emit_label(header_label);
            build_cond(fb, cond, body_label, exit_label)?;
            fb.emit_label(body_label);

            fb.enter_loop(header_label, exit_label);
            let result = build_stmt(fb, body);
            fb.exit_loop();
            result?;

            fb.emit_br(header_label);
            fb.emit_label(exit_label);
            Ok(())
        }
        AstOp::Break => {
            match fb.break_target() {
                Some(target) => fb.emit_br(target),
                None => fb.report(SemanticErrorKind::BreakOutsideLoop, node.line),
            }
            Ok(())
        }
        AstOp::Continue => {
            match fb.continue_target() {
                Some(target) => fb.emit_br(target),
                None => fb.report(SemanticErrorKind::ContinueOutsideLoop, node.line),
            }
            Ok(())
        }
        AstOp::Return => {
            let func = fb.func_name.clone();
            if fb.ret_ty.is_void() {
                if let Some(value_node) = node.kid(0) {
                    fb.report(
                        SemanticErrorKind::ReturnValueInVoidFunction { func },
                        node.line,
                    );
                    build_rvalue(fb, value_node)?;
                }
                fb.emit_ret(None);
            } else {
                match node.kid(0) {
                    Some(value_node) => {
                        let value = build_rvalue(fb, value_node)?;
                        if fb.value_ty(value).is_int32() {
                            fb.emit_ret(Some(value));
                        } else {
                            fb.report(
                                SemanticErrorKind::MismatchingReturnType { func },
                                node.line,
                            );
                            fb.emit_ret(Some(ValueRef::Const(0)));
                        }
                    }
                    None => {
                        fb.report(SemanticErrorKind::MissingReturnValue { func }, node.line);
                        fb.emit_ret(Some(ValueRef::Const(0)));
                    }
                }
            }
            Ok(())
        }
        _ => Err(shape("statement", node.line)),
    }
}

fn build_local_decl(fb: &mut FunctionBuilder, decl: &AstNode) -> Result<(), SemanticError> {
    let (ty, name) = decl_parts(decl)?;
    let name = name.to_string();
    let id = fb.func().new_local(ty.clone(), Some(name.clone()), false);
    if !fb.symbol_table.insert_local(name.clone(), id) {
        fb.report(
            SemanticErrorKind::LocalAlreadyDefined { name: name.clone() },
            decl.line,
        );
    }

    if let Some(init) = find_init(decl) {
        if init.op == AstOp::ArrayInit {
            if ty.is_array() {
                build_array_init(fb, id, &ty, init, &name)?;
            } else {
                fb.report(SemanticErrorKind::MismatchingAssignment, init.line);
            }
        } else if ty.is_array() {
            fb.report(SemanticErrorKind::MismatchingAssignment, init.line);
        } else {
            let value = build_rvalue(fb, init)?;
            store_checked(fb, value, ValueRef::Local(id), init.line);
        }
    }
    Ok(())
}

/// Lowers a brace initializer to element-wise stores. The initializer tree
/// is flattened depth-first; each value lands in the next linear slot of
/// the array, addressed through a constant-index `gep`.
fn build_array_init(
    fb: &mut FunctionBuilder,
    id: LocalId,
    ty: &Ty,
    init: &AstNode,
    name: &str,
) -> Result<(), SemanticError> {
    let dims = ty.dims();
    if dims.iter().any(|&dim| dim == 0) {
        // Dimension errors were already reported during AST construction.
        return Ok(());
    }
    let total = ty.flat_count() as usize;

    let mut exprs = Vec::new();
    flatten_init(init, &mut exprs);
    if exprs.len() > total {
        fb.report(
            SemanticErrorKind::TooManyInitValues {
                name: name.to_string(),
            },
            init.line,
        );
        exprs.truncate(total);
    }

    for (slot, expr) in exprs.into_iter().enumerate() {
        let value = build_rvalue(fb, expr)?;
        let mut remaining = slot as u32;
        let mut indices = vec![0u32; dims.len()];
        for (axis, &dim) in dims.iter().enumerate().rev() {
            indices[axis] = remaining % dim;
            remaining /= dim;
        }
        let index_values = indices
            .into_iter()
            .map(|index| ValueRef::Const(index as i32))
            .collect();
        let addr = fb.emit_gep(ValueRef::Local(id), index_values);
        store_checked(fb, value, addr, expr.line);
    }
    Ok(())
}

fn flatten_init<'n>(node: &'n AstNode, out: &mut Vec<&'n AstNode>) {
    for kid in &node.kids {
        if kid.op == AstOp::ArrayInit {
            flatten_init(kid, out);
        } else {
            out.push(kid);
        }
    }
}

fn store_checked(fb: &mut FunctionBuilder, value: ValueRef, addr: ValueRef, line: u32) {
    let pointee = match fb.value_ty(addr).pointee() {
        Some(pointee) => pointee,
        None => {
            fb.report(SemanticErrorKind::NonAssignableExpression, line);
            return;
        }
    };
    if !pointee.is_int32() {
        fb.report(SemanticErrorKind::NonAssignableExpression, line);
        return;
    }
    if !fb.value_ty(value).is_int32() {
        fb.report(SemanticErrorKind::MismatchingAssignment, line);
        return;
    }
    fb.emit_store(value, addr);
}

fn build_rvalue(fb: &mut FunctionBuilder, node: &AstNode) -> Result<ValueRef, SemanticError> {
    match node.op {
        AstOp::LeafUint => {
            let value = node
                .int_val
                .ok_or_else(|| shape("integer literal", node.line))?;
            Ok(ValueRef::Const(value as i32))
        }
        AstOp::LeafId | AstOp::ArrayIndex => {
            let addr = build_lvalue(fb, node)?;
            match fb.value_ty(addr).pointee() {
                // A reference to a whole array decays to its address, for
                // argument passing; scalars are loaded.
                Some(pointee) if pointee.is_array() => Ok(addr),
                Some(_) => Ok(fb.emit_load(addr)),
                None => Ok(addr),
            }
        }
        AstOp::Add => build_binary_node(fb, node, BinOp::Add),
        AstOp::Sub => build_binary_node(fb, node, BinOp::Sub),
        AstOp::Mul => build_binary_node(fb, node, BinOp::Mul),
        AstOp::Div => build_binary_node(fb, node, BinOp::Div),
        AstOp::Mod => build_binary_node(fb, node, BinOp::Mod),
        AstOp::Lt => build_icmp_node(fb, node, IcmpCond::Lt),
        AstOp::Gt => build_icmp_node(fb, node, IcmpCond::Gt),
        AstOp::Le => build_icmp_node(fb, node, IcmpCond::Le),
        AstOp::Ge => build_icmp_node(fb, node, IcmpCond::Ge),
        AstOp::Eq => build_icmp_node(fb, node, IcmpCond::Eq),
        AstOp::Ne => build_icmp_node(fb, node, IcmpCond::Ne),
        AstOp::And | AstOp::Or => build_bool_value(fb, node),
        AstOp::Not => {
            let operand_node = node.kid(0).ok_or_else(|| shape("unary not", node.line))?;
            let operand = build_rvalue(fb, operand_node)?;
            if !fb.value_ty(operand).is_int32() {
                fb.report(SemanticErrorKind::MismatchingOperandTypes, node.line);
                return Ok(ValueRef::Const(0));
            }
            Ok(fb.emit_icmp(IcmpCond::Eq, operand, ValueRef::Const(0)))
        }
        AstOp::Neg => {
            let operand_node = node.kid(0).ok_or_else(|| shape("unary minus", node.line))?;
            let operand = build_rvalue(fb, operand_node)?;
            if !fb.value_ty(operand).is_int32() {
                fb.report(SemanticErrorKind::MismatchingOperandTypes, node.line);
                return Ok(ValueRef::Const(0));
            }
            Ok(fb.emit_binary(BinOp::Sub, ValueRef::Const(0), operand))
        }
        AstOp::FuncCall => build_call(fb, node),
        _ => Err(shape("expression", node.line)),
    }
}

fn build_binary_node(
    fb: &mut FunctionBuilder,
    node: &AstNode,
    op: BinOp,
) -> Result<ValueRef, SemanticError> {
    let lhs_node = node.kid(0).ok_or_else(|| shape("binary operation", node.line))?;
    let rhs_node = node.kid(1).ok_or_else(|| shape("binary operation", node.line))?;
    let lhs = build_rvalue(fb, lhs_node)?;
    let rhs = build_rvalue(fb, rhs_node)?;
    if !fb.value_ty(lhs).is_int32() || !fb.value_ty(rhs).is_int32() {
        fb.report(SemanticErrorKind::MismatchingOperandTypes, node.line);
        return Ok(ValueRef::Const(0));
    }
    Ok(fb.emit_binary(op, lhs, rhs))
}

fn build_icmp_node(
    fb: &mut FunctionBuilder,
    node: &AstNode,
    cond: IcmpCond,
) -> Result<ValueRef, SemanticError> {
    let lhs_node = node.kid(0).ok_or_else(|| shape("comparison", node.line))?;
    let rhs_node = node.kid(1).ok_or_else(|| shape("comparison", node.line))?;
    let lhs = build_rvalue(fb, lhs_node)?;
    let rhs = build_rvalue(fb, rhs_node)?;
    if !fb.value_ty(lhs).is_int32() || !fb.value_ty(rhs).is_int32() {
        fb.report(SemanticErrorKind::MismatchingOperandTypes, node.line);
        return Ok(ValueRef::Const(0));
    }
    Ok(fb.emit_icmp(cond, lhs, rhs))
}

fn build_call(fb: &mut FunctionBuilder, node: &AstNode) -> Result<ValueRef, SemanticError> {
    let id_node = node
        .kid(0)
        .filter(|kid| kid.op == AstOp::LeafId)
        .ok_or_else(|| shape("function call", node.line))?;
    let name = id_node
        .name()
        .ok_or_else(|| shape("function call", node.line))?
        .to_string();

    let mut args = Vec::new();
    if let Some(params) = node.kid(1) {
        if params.op != AstOp::FuncRealParams {
            return Err(shape("function call", params.line));
        }
        for arg in &params.kids {
            args.push(build_rvalue(fb, arg)?);
        }
    }

    match fb.symbol_table.globals.lookup(&name) {
        Some(GlobalSymbol::Func(id)) => {
            let expected = fb.module.function(id).params.len();
            if expected != args.len() {
                fb.report(
                    SemanticErrorKind::MismatchingArgumentCount {
                        func: name,
                        expected,
                        found: args.len(),
                    },
                    node.line,
                );
            }
            Ok(fb.emit_call(id, args))
        }
        Some(GlobalSymbol::Var(_)) => {
            fb.report(SemanticErrorKind::NotCallable { name }, node.line);
            Ok(ValueRef::Const(0))
        }
        None => {
            fb.report(SemanticErrorKind::FunctionUndefined { name }, node.line);
            Ok(ValueRef::Const(0))
        }
    }
}

/// Lowers an expression in lvalue position to an address. An identifier
/// yields the variable's address; an index chain collapses into one `gep`
/// whose indices run outermost to innermost.
fn build_lvalue(fb: &mut FunctionBuilder, node: &AstNode) -> Result<ValueRef, SemanticError> {
    match node.op {
        AstOp::LeafId => {
            let name = node.name().ok_or_else(|| shape("identifier", node.line))?;
            match fb.symbol_table.lookup(name) {
                Some(VarBinding::Local(id)) => Ok(ValueRef::Local(id)),
                Some(VarBinding::Global(id)) => Ok(ValueRef::Global(id)),
                None => {
                    fb.report(
                        SemanticErrorKind::IdentifierUndefined {
                            name: name.to_string(),
                        },
                        node.line,
                    );
                    Ok(fb.recovery_slot())
                }
            }
        }
        AstOp::ArrayIndex => {
            let mut index_nodes = Vec::new();
            let mut cur = node;
            while cur.op == AstOp::ArrayIndex {
                let index = cur.kid(1).ok_or_else(|| shape("array index", cur.line))?;
                index_nodes.push(index);
                cur = cur.kid(0).ok_or_else(|| shape("array index", cur.line))?;
            }
            index_nodes.reverse();
            if cur.op != AstOp::LeafId {
                return Err(shape("array index", cur.line));
            }
            let name = cur.name().unwrap_or("").to_string();

            let base = build_lvalue(fb, cur)?;
            let pointee = fb.value_ty(base).pointee();
            match pointee {
                Some(pointee) if pointee.is_array() => {
                    if index_nodes.len() > pointee.dims().len() {
                        fb.report(SemanticErrorKind::TooManyIndices { name }, node.line);
                        return Ok(fb.recovery_slot());
                    }
                    let mut index_values = Vec::with_capacity(index_nodes.len());
                    for index_node in index_nodes {
                        let value = build_rvalue(fb, index_node)?;
                        if fb.value_ty(value).is_int32() {
                            index_values.push(value);
                        } else {
                            fb.report(SemanticErrorKind::IndexNotInt, index_node.line);
                            index_values.push(ValueRef::Const(0));
                        }
                    }
                    Ok(fb.emit_gep(base, index_values))
                }
                _ => {
                    fb.report(SemanticErrorKind::NotIndexable { name }, node.line);
                    Ok(fb.recovery_slot())
                }
            }
        }
        _ => {
            fb.report(SemanticErrorKind::NonAssignableExpression, node.line);
            Ok(fb.recovery_slot())
        }
    }
}

/// Lowers an expression in condition position straight to control flow.
/// `&&`, `||` and `!` become branches without materializing a boolean.
fn build_cond(
    fb: &mut FunctionBuilder,
    node: &AstNode,
    true_target: Label,
    false_target: Label,
) -> Result<(), SemanticError> {
    match node.op {
        AstOp::And => {
            let lhs = node.kid(0).ok_or_else(|| shape("logical and", node.line))?;
            let rhs = node.kid(1).ok_or_else(|| shape("logical and", node.line))?;
            let mid = fb.func().new_label();
            build_cond(fb, lhs, mid, false_target)?;
            fb.emit_label(mid);
            build_cond(fb, rhs, true_target, false_target)
        }
        AstOp::Or => {
            let lhs = node.kid(0).ok_or_else(|| shape("logical or", node.line))?;
            let rhs = node.kid(1).ok_or_else(|| shape("logical or", node.line))?;
            let mid = fb.func().new_label();
            build_cond(fb, lhs, true_target, mid)?;
            fb.emit_label(mid);
            build_cond(fb, rhs, true_target, false_target)
        }
        AstOp::Not => {
            let operand = node.kid(0).ok_or_else(|| shape("unary not", node.line))?;
            build_cond(fb, operand, false_target, true_target)
        }
        _ => {
            let value = build_rvalue(fb, node)?;
            let value = if fb.value_ty(value).is_int32() {
                value
            } else {
                fb.report(SemanticErrorKind::MismatchingCondition, node.line);
                ValueRef::Const(0)
            };
            fb.emit_cond_br(value, true_target, false_target);
            Ok(())
        }
    }
}

/// Materializes a short-circuit expression as a 0/1 value: both sides of
/// the control flow store into an unnamed local slot, joined by a load.
fn build_bool_value(fb: &mut FunctionBuilder, node: &AstNode) -> Result<ValueRef, SemanticError> {
    let slot = fb.func().new_local(Ty::int32(), None, false);
    let true_label = fb.func().new_label();
    let false_label = fb.func().new_label();
    let end_label = fb.func().new_label();

    build_cond(fb, node, true_label, false_label)?;
    fb.emit_label(true_label);
    fb.emit_store(ValueRef::Const(1), ValueRef::Local(slot));
    fb.emit_br(end_label);
    fb.emit_label(false_label);
    fb.emit_store(ValueRef::Const(0), ValueRef::Local(slot));
    fb.emit_br(end_label);
    fb.emit_label(end_label);
    Ok(fb.emit_load(ValueRef::Local(slot)))
}
