//! Adapters that turn implicit-receiver methods into plain functions.
//!
//! A [`Method`] is a callable invoked against a receiver, the way `self` works in a method call.
//! The constructors in this crate re-shape such a method into an [`Adapter`]: a plain function
//! whose receiver is an ordinary explicit parameter, either first ([`pre`]) or last ([`post`])
//! in the argument list. The `dynamic_*` constructors go one step further and resolve the method
//! by name on the receiver at call time instead of closing over a fixed one.
//!
//! The `*_fixed` constructors additionally pin the produced adapter to a declared parameter
//! count (0–8 explicit arguments plus the receiver slot), inspectable through
//! [`Adapter::parameter_count`], with a variable-arity fallback above that range.
//!
//! ```
//! use unmethod::{pre, Method, Record, Value};
//!
//! // `greet` reads its receiver the way a method reads `self`.
//! let greet = Method::new(|this: &Value, punctuation: String| {
//!     let name = match this {
//!         Value::Record(record) => record.get("name"),
//!         _ => None,
//!     };
//!     match name {
//!         Some(Value::String(name)) => format!("hello, {name}{punctuation}"),
//!         _ => String::from("hello?"),
//!     }
//! });
//!
//! // `pre` re-shapes it into a function whose first argument is the receiver.
//! let greet = pre(greet);
//! let world = Record::new().with("name", "world");
//! assert_eq!(greet.call(&[world.into(), "!".into()])?, Value::from("hello, world!"));
//! # Ok::<(), unmethod::Error>(())
//! ```

mod adapt;
mod dispatch;
mod error;
mod function;
mod value;

pub use adapt::*;
pub use dispatch::*;
pub use error::*;
pub use function::*;
pub use value::*;
