use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use crate::ast;
use crate::diagnostics::{self, Diagnostic};
use crate::ir;
use crate::parser::{self, ParseError};
use crate::semantic_error::SemanticError;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub print_ast: bool,
    pub print_ir: bool,
}

/// The result of compiling one source file. The module may be partial when
/// errors were collected.
#[derive(Debug)]
pub struct CompileOutcome {
    pub module: ir::Module,
    pub errors: Vec<SemanticError>,
}

fn slurp_file<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut buffer = String::new();
    file.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Compiles a source string through the whole front end:
/// tokens -> CST -> AST -> IR module plus collected semantic errors.
pub fn compile_source(input: &str) -> Result<CompileOutcome, ParseError> {
    let cst = parser::parse(input)?;
    let (ast_root, mut errors) = ast::build::build_ast(cst);
    let (module, lower_errors) = ir::builder::build_module(&ast_root);
    errors.extend(lower_errors);
    Ok(CompileOutcome { module, errors })
}

/// Compiles a file, printing dumps and diagnostics as requested. `Err(())`
/// means the input could not be read or parsed at all.
pub fn process_path<P: AsRef<Path>>(
    input_path: P,
    options: &CompileOptions,
) -> Result<CompileOutcome, ()> {
    let path = input_path.as_ref();
    let input = match slurp_file(path) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("error: cannot read '{}': {}", path.display(), err);
            return Err(());
        }
    };

    let cst = match parser::parse(&input) {
        Ok(cst) => cst,
        Err(err) => {
            diagnostics::print_diagnostic(&input, path, &Diagnostic::from(&err));
            return Err(());
        }
    };

    let (ast_root, mut errors) = ast::build::build_ast(cst);
    if options.print_ast {
        print!("{}", ast::printer::ast_to_string(&ast_root));
    }

    let (module, lower_errors) = ir::builder::build_module(&ast_root);
    errors.extend(lower_errors);

    for err in &errors {
        diagnostics::print_diagnostic(&input, path, &Diagnostic::from(err));
    }

    if options.print_ir {
        print!("{}", ir::printer::module_to_string(&module));
    }

    Ok(CompileOutcome { module, errors })
}
