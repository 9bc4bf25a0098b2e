//! Error reporting.

use std::{borrow::Cow, fmt, rc::Rc};

/// An error raised while converting values or invoking an adapter.
#[derive(Debug)]
pub enum Error {
    /// A type mismatch occured.
    TypeMismatch {
        /// The name of the expected type.
        expected: Cow<'static, str>,
        /// The name of the actual type obtained.
        got: Cow<'static, str>,
    },
    /// A type mismatch occured in a method's arguments.
    ArgumentTypeMismatch {
        /// Which argument had a type mismatch.
        index: usize,
        /// The name of the expected type.
        expected: Cow<'static, str>,
        /// The name of the actual type obtained.
        got: Cow<'static, str>,
    },
    /// A method was looked up on a `Nil` receiver.
    NilReceiver {
        /// The name of the method that was looked up.
        method_name: Rc<str>,
    },
    /// The receiver has no member with the given name.
    MethodDoesNotExist {
        /// The name of the receiver's type.
        type_name: Cow<'static, str>,
        /// The name of the method that was looked up.
        method_name: Rc<str>,
    },
    /// The named member exists on the receiver but is not a function.
    MemberNotCallable {
        /// The name of the receiver's type.
        type_name: Cow<'static, str>,
        /// The name of the member that was looked up.
        method_name: Rc<str>,
    },
    /// A user-defined error raised by the underlying method.
    User(Box<dyn std::error::Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch, expected {expected} but got {got}")
            }
            Self::ArgumentTypeMismatch { index, expected, got } => {
                write!(
                    f,
                    "type mismatch at argument {}, expected {expected} but got {got}",
                    index + 1
                )
            }
            Self::NilReceiver { method_name } => {
                write!(f, "cannot look up method '{method_name}' on a Nil receiver")
            }
            Self::MethodDoesNotExist { type_name, method_name } => {
                write!(f, "method '{method_name}' is not defined for {type_name}")
            }
            Self::MemberNotCallable { type_name, method_name } => {
                write!(f, "member '{method_name}' of {type_name} is not a function")
            }
            Self::User(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for Error {}
