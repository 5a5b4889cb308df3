mod common;

use common::*;
use minicc::ast::printer::ast_to_string;
use minicc::ast::{AstNode, AstOp};
use minicc::ty::Ty;

fn first_stmt(root: &AstNode) -> &AstNode {
    &first_func_body(root).kids[0]
}

#[test]
fn same_level_operators_associate_left() {
    let (root, errors) = ast_of("int f() { return 1 - 2 - 3; }");
    assert!(errors.is_empty());
    let ret = first_stmt(&root);
    assert_eq!(ret.op, AstOp::Return);

    let outer = &ret.kids[0];
    assert_eq!(outer.op, AstOp::Sub);
    let inner = &outer.kids[0];
    assert_eq!(inner.op, AstOp::Sub);
    assert_eq!(inner.kids[0].int_val, Some(1));
    assert_eq!(inner.kids[1].int_val, Some(2));
    assert_eq!(outer.kids[1].int_val, Some(3));
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let (root, _) = ast_of("int f() { return 1 + 2 * 3; }");
    let add = &first_stmt(&root).kids[0];
    assert_eq!(add.op, AstOp::Add);
    assert_eq!(add.kids[0].int_val, Some(1));
    assert_eq!(add.kids[1].op, AstOp::Mul);
}

#[test]
fn full_precedence_tower() {
    // == over <, && over ==, || loosest
    let (root, _) = ast_of("int f() { return 1 == 2 < 3 && 4 || 5; }");
    let or = &first_stmt(&root).kids[0];
    assert_eq!(or.op, AstOp::Or);
    assert_eq!(or.kids[1].int_val, Some(5));

    let and = &or.kids[0];
    assert_eq!(and.op, AstOp::And);
    assert_eq!(and.kids[1].int_val, Some(4));

    let eq = &and.kids[0];
    assert_eq!(eq.op, AstOp::Eq);
    assert_eq!(eq.kids[0].int_val, Some(1));
    assert_eq!(eq.kids[1].op, AstOp::Lt);
}

#[test]
fn single_operand_levels_pass_through() {
    let (root, _) = ast_of("int f() { return 5; }");
    let ret = first_stmt(&root);
    assert_eq!(ret.kids[0].op, AstOp::LeafUint);
    assert_eq!(ret.kids[0].int_val, Some(5));
}

#[test]
fn index_chain_is_left_deep() {
    let (root, errors) = ast_of("int f() { int a[2][3][4]; a[1][2][3] = 5; return 0; }");
    assert!(errors.is_empty());
    let assign = &first_func_body(&root).kids[1];
    assert_eq!(assign.op, AstOp::Assign);

    let outer = &assign.kids[0];
    assert_eq!(outer.op, AstOp::ArrayIndex);
    assert_eq!(outer.kids[1].int_val, Some(3));

    let middle = &outer.kids[0];
    assert_eq!(middle.op, AstOp::ArrayIndex);
    assert_eq!(middle.kids[1].int_val, Some(2));

    let inner = &middle.kids[0];
    assert_eq!(inner.op, AstOp::ArrayIndex);
    assert_eq!(inner.kids[1].int_val, Some(1));

    let leaf = &inner.kids[0];
    assert_eq!(leaf.op, AstOp::LeafId);
    assert_eq!(leaf.name(), Some("a"));
}

#[test]
fn dimension_expressions_fold_to_literals() {
    let (root, errors) = ast_of("int a[2+3][4];");
    assert!(errors.is_empty());
    let decl = &root.kids[0].kids[0];
    assert_eq!(decl.op, AstOp::VarDecl);

    let ty = decl.ty.as_ref().expect("declarator type");
    assert_eq!(ty.dim_string(), "[5][4]");
    assert_eq!(
        ty,
        &Ty::array_of(&Ty::array_of(&Ty::int32(), 4), 5)
    );

    let dim0 = &decl.kids[2];
    assert_eq!(dim0.op, AstOp::ArrayDim);
    assert_eq!(dim0.kids.len(), 1);
    assert_eq!(dim0.kids[0].op, AstOp::LeafUint);
    assert_eq!(dim0.kids[0].int_val, Some(5));

    let dim1 = &decl.kids[3];
    assert_eq!(dim1.kids[0].int_val, Some(4));
}

#[test]
fn dimension_folding_wraps_unsigned() {
    let (root, errors) = ast_of("int a[0-1+2];");
    assert!(errors.is_empty());
    let decl = &root.kids[0].kids[0];
    assert_eq!(decl.kids[2].kids[0].int_val, Some(1));
    assert_eq!(decl.ty.as_ref().and_then(|ty| ty.count()), Some(1));
}

#[test]
fn unfoldable_dimension_left_in_place() {
    let (root, errors) = ast_of("int n; int a[n];");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].category(),
        minicc::semantic_error::ErrorCategory::Dimension
    );

    let decl = &root.kids[1].kids[0];
    assert_eq!(decl.ty.as_ref(), Some(&Ty::array_of(&Ty::int32(), 0)));
    // the unfoldable expression stays in the tree
    assert_eq!(decl.kids[2].kids[0].op, AstOp::LeafId);
}

#[test]
fn division_by_zero_is_unfoldable() {
    let (_, errors) = ast_of("int a[4/0];");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].category(),
        minicc::semantic_error::ErrorCategory::Dimension
    );
}

#[test]
fn array_param_type_has_unknown_first_dimension() {
    let (root, errors) = ast_of("int f(int a[][3]) { return 0; }");
    assert!(errors.is_empty());
    let func = &root.kids[0];
    let params = &func.kids[2];
    assert_eq!(params.op, AstOp::FuncFormalParams);

    let param = &params.kids[0];
    assert_eq!(param.op, AstOp::FuncFormalParam);
    let expected = Ty::pointer_of(&Ty::array_of(&Ty::array_of(&Ty::int32(), 3), 0));
    assert_eq!(param.ty.as_ref(), Some(&expected));

    // synthetic first dimension of size 0
    let dim0 = &param.kids[2];
    assert_eq!(dim0.op, AstOp::ArrayDim);
    assert_eq!(dim0.kids[0].int_val, Some(0));
    let dim1 = &param.kids[3];
    assert_eq!(dim1.kids[0].int_val, Some(3));
}

#[test]
fn call_param_list_present_iff_args() {
    let (root, _) = ast_of("int g(int x) { return x; } int f() { return g(1); } int h() { return g(2) + f(); }");
    let f = &root.kids[1];
    let f_call = &first_stmt_of(f).kids[0];
    assert_eq!(f_call.op, AstOp::FuncCall);
    assert_eq!(f_call.kids.len(), 2);
    assert_eq!(f_call.kids[1].op, AstOp::FuncRealParams);

    let h = &root.kids[2];
    let add = &first_stmt_of(h).kids[0];
    let no_arg_call = &add.kids[1];
    assert_eq!(no_arg_call.op, AstOp::FuncCall);
    assert_eq!(no_arg_call.kids.len(), 1);
}

fn first_stmt_of(func: &AstNode) -> &AstNode {
    &func.kids.last().expect("body").kids[0]
}

#[test]
fn brace_initializers_become_array_init_nodes() {
    let (root, errors) = ast_of("int f() { int a[2][2] = {{1, 2}, {3, 4}}; return 0; }");
    assert!(errors.is_empty());
    let decl = &first_func_body(&root).kids[0].kids[0];
    let init = decl.kids.last().expect("initializer");
    assert_eq!(init.op, AstOp::ArrayInit);
    assert_eq!(init.kids.len(), 2);
    assert_eq!(init.kids[0].op, AstOp::ArrayInit);
    assert_eq!(init.kids[0].kids[0].int_val, Some(1));
    assert_eq!(init.kids[1].kids[1].int_val, Some(4));
}

#[test]
fn expression_statements_are_wrapped() {
    let (root, _) = ast_of("int f() { 1 + 2; return 0; }");
    let stmt = first_stmt(&root);
    assert_eq!(stmt.op, AstOp::ExprStmt);
    assert_eq!(stmt.kids[0].op, AstOp::Add);
}

#[test]
fn ast_dump_shows_the_tree() {
    let (root, _) = ast_of("int main() { return 0; }");
    let dump = ast_to_string(&root);
    assert!(dump.contains("compile-unit"));
    assert!(dump.contains("func-def"));
    assert!(dump.contains("id 'main'"));
    assert!(dump.contains("return"));
}
