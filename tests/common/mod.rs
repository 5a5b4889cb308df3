#![allow(dead_code)]

use minicc::ast::build::build_ast;
use minicc::ast::{AstNode, AstOp};
use minicc::ir::Module;
use minicc::parser;
use minicc::pipeline;
use minicc::semantic_error::SemanticError;

pub fn ast_of(src: &str) -> (AstNode, Vec<SemanticError>) {
    let cst = parser::parse(src).expect("source should parse");
    build_ast(cst)
}

pub fn lower(src: &str) -> (Module, Vec<SemanticError>) {
    let outcome = pipeline::compile_source(src).expect("source should parse");
    (outcome.module, outcome.errors)
}

pub fn lower_ok(src: &str) -> Module {
    let (module, errors) = lower(src);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    module
}

pub fn printed(src: &str) -> String {
    minicc::ir::printer::module_to_string(&lower_ok(src))
}

/// The body block of the first function definition in the unit.
pub fn first_func_body(root: &AstNode) -> &AstNode {
    let func = root
        .kids
        .iter()
        .find(|kid| kid.op == AstOp::FuncDef)
        .expect("expected a function definition");
    func.kids.last().expect("expected a function body")
}
