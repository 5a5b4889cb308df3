use std::fmt;

#[derive(Debug, Clone)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub line: u32,
}

/// Coarse classification of semantic errors, used by callers that only care
/// about the family of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Shape,
    Dimension,
    Type,
    Name,
    ControlFlow,
}

#[derive(Debug, Clone)]
pub enum SemanticErrorKind {
    MalformedNode { context: &'static str },
    UnfoldableDimension { name: String },
    ZeroDimension { name: String },
    NonConstGlobalInit { name: String },
    ArrayInitOnGlobal { name: String },
    TooManyInitValues { name: String },
    NonAssignableExpression,
    MismatchingAssignment,
    MismatchingOperandTypes,
    MismatchingCondition,
    MismatchingReturnType { func: String },
    IndexNotInt,
    MissingReturnValue { func: String },
    ReturnValueInVoidFunction { func: String },
    IdentifierUndefined { name: String },
    FunctionUndefined { name: String },
    NotCallable { name: String },
    NotIndexable { name: String },
    TooManyIndices { name: String },
    MismatchingArgumentCount {
        func: String,
        expected: usize,
        found: usize,
    },
    GlobalAlreadyDefined { name: String },
    FunctionAlreadyDefined { name: String },
    LocalAlreadyDefined { name: String },
    ParameterAlreadyDefined { name: String },
    BreakOutsideLoop,
    ContinueOutsideLoop,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, line: u32) -> Self {
        SemanticError { kind, line }
    }

    pub fn category(&self) -> ErrorCategory {
        use self::SemanticErrorKind::*;
        match self.kind {
            MalformedNode { .. } => ErrorCategory::Shape,
            UnfoldableDimension { .. } | ZeroDimension { .. } => ErrorCategory::Dimension,
            NonConstGlobalInit { .. }
            | ArrayInitOnGlobal { .. }
            | TooManyInitValues { .. }
            | NonAssignableExpression
            | MismatchingAssignment
            | MismatchingOperandTypes
            | MismatchingCondition
            | MismatchingReturnType { .. }
            | IndexNotInt
            | MissingReturnValue { .. }
            | ReturnValueInVoidFunction { .. }
            | NotCallable { .. }
            | NotIndexable { .. }
            | TooManyIndices { .. }
            | MismatchingArgumentCount { .. } => ErrorCategory::Type,
            IdentifierUndefined { .. }
            | FunctionUndefined { .. }
            | GlobalAlreadyDefined { .. }
            | FunctionAlreadyDefined { .. }
            | LocalAlreadyDefined { .. }
            | ParameterAlreadyDefined { .. } => ErrorCategory::Name,
            BreakOutsideLoop | ContinueOutsideLoop => ErrorCategory::ControlFlow,
        }
    }
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::SemanticErrorKind::*;
        match *self {
            MalformedNode { context } => {
                write!(f, "Malformed syntax tree node in {}.", context)
            }
            UnfoldableDimension { ref name } => {
                write!(f, "Array dimension of '{}' is not a constant expression.", name)
            }
            ZeroDimension { ref name } => {
                write!(f, "Array dimension of '{}' is zero.", name)
            }
            NonConstGlobalInit { ref name } => {
                write!(f, "Initializer of global '{}' is not a constant expression.", name)
            }
            ArrayInitOnGlobal { ref name } => {
                write!(f, "Initializers on global array '{}' are not supported.", name)
            }
            TooManyInitValues { ref name } => {
                write!(f, "Too many initializer values for '{}'.", name)
            }
            NonAssignableExpression => write!(f, "This expression is not assignable."),
            MismatchingAssignment => {
                write!(f, "Mismatching types during assignment.")
            }
            MismatchingOperandTypes => {
                write!(f, "Binary operation on incompatible types.")
            }
            MismatchingCondition => {
                write!(f, "Mismatching types in condition.")
            }
            MismatchingReturnType { ref func } => {
                write!(f, "Mismatching types in return statement of '{}'.", func)
            }
            IndexNotInt => {
                write!(f, "Mismatching types in array index.")
            }
            MissingReturnValue { ref func } => {
                write!(f, "'{}' must return a value.", func)
            }
            ReturnValueInVoidFunction { ref func } => {
                write!(f, "'{}' is void and cannot return a value.", func)
            }
            IdentifierUndefined { ref name } => write!(f, "'{}' is not defined here.", name),
            FunctionUndefined { ref name } => {
                write!(f, "'{}' function is not defined.", name)
            }
            NotCallable { ref name } => write!(f, "'{}' is not callable.", name),
            NotIndexable { ref name } => write!(f, "'{}' is not an array.", name),
            TooManyIndices { ref name } => {
                write!(f, "Too many indices for array '{}'.", name)
            }
            MismatchingArgumentCount {
                ref func,
                expected,
                found,
            } => write!(
                f,
                "'{}' takes {} parameters, but {} arguments were supplied.",
                func, expected, found
            ),
            GlobalAlreadyDefined { ref name } => {
                write!(f, "'{}' global variable is already defined.", name)
            }
            FunctionAlreadyDefined { ref name } => {
                write!(f, "'{}' function is already defined.", name)
            }
            LocalAlreadyDefined { ref name } => {
                write!(f, "'{}' local variable is already defined in this scope.", name)
            }
            ParameterAlreadyDefined { ref name } => {
                write!(f, "'{}' parameter is already defined.", name)
            }
            BreakOutsideLoop => write!(f, "'break' outside of loop."),
            ContinueOutsideLoop => write!(f, "'continue' outside of loop."),
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}
