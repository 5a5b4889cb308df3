//! Error rendering for the CLI. The core itself never prints; it hands
//! collected errors here and the caller decides the exit code.

use std::path::Path;

use crate::lexer::LexicalError;
use crate::parser::ParseError;
use crate::semantic_error::SemanticError;

#[derive(Debug)]
pub struct Diagnostic {
    pub msg: String,
    pub line: u32,
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Diagnostic {
        Diagnostic {
            msg: err.msg.clone(),
            line: err.line,
        }
    }
}

impl From<&LexicalError> for Diagnostic {
    fn from(err: &LexicalError) -> Diagnostic {
        Diagnostic {
            msg: err.msg.clone(),
            line: err.line,
        }
    }
}

impl From<&SemanticError> for Diagnostic {
    fn from(err: &SemanticError) -> Diagnostic {
        Diagnostic {
            msg: err.kind.to_string(),
            line: err.line,
        }
    }
}

/// Renders one diagnostic with the offending source line underneath.
pub fn render(input: &str, path: &Path, diag: &Diagnostic) -> String {
    let mut out = format!("error: {}\n  --> {}:{}\n", diag.msg, path.display(), diag.line);
    if let Some(text) = input.lines().nth(diag.line.saturating_sub(1) as usize) {
        out.push_str(&format!("{:<5}| {}\n", diag.line, text));
    }
    out
}

pub fn print_diagnostic(input: &str, path: &Path, diag: &Diagnostic) {
    eprint!("{}", render(input, path, diag));
}
