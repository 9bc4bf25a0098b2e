//! Methods, and the Rust closure signatures that can become them.

use std::{fmt, rc::Rc};

use crate::{Error, TryFromValue, Value};

/// The raw calling convention of a method: a receiver plus an ordered argument list.
pub type RawMethod = Rc<dyn Fn(&Value, &[Value]) -> Result<Value, Error>>;

pub(crate) fn create_raw(
    f: impl Fn(&Value, &[Value]) -> Result<Value, Error> + 'static,
) -> RawMethod {
    Rc::new(f)
}

/// A callable unit that is invoked against an implicit receiver.
#[derive(Clone)]
pub struct Method {
    raw: RawMethod,
    parameter_count: Option<u16>,
}

impl Method {
    /// Creates a method from a Rust closure.
    ///
    /// See [`MethodFn`] for the supported closure signatures.
    pub fn new<S>(function: impl MethodFn<S>) -> Self {
        function.into_method()
    }

    pub(crate) fn from_raw(raw: RawMethod, parameter_count: Option<u16>) -> Self {
        Self { raw, parameter_count }
    }

    /// Returns the number of explicit parameters the method declares, or `None` if the method
    /// accepts a variable number of arguments. The receiver is not counted.
    pub fn parameter_count(&self) -> Option<u16> {
        self.parameter_count
    }

    /// Invokes the method with `receiver` as its context and `arguments` as its argument list.
    pub fn call(&self, receiver: &Value, arguments: &[Value]) -> Result<Value, Error> {
        (self.raw)(receiver, arguments)
    }
}

/// Methods compare by identity.
impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.raw, &other.raw)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter_count {
            Some(count) => write!(f, "<method/{count}>"),
            None => write!(f, "<method>"),
        }
    }
}

/// Returns the `index`th argument converted into the given type. An absent argument reads
/// as `Nil`.
fn argument<T>(arguments: &[Value], index: usize) -> Result<T, Error>
where
    T: TryFromValue,
{
    let value = arguments.get(index).cloned().unwrap_or(Value::Nil);
    T::try_from_value(&value).map_err(|error| {
        if let Error::TypeMismatch { expected, got } = error {
            Error::ArgumentTypeMismatch { index, expected, got }
        } else {
            error
        }
    })
}

/// Signature variants of [`MethodFn`].
///
/// This is a bit of a hack around Rust's type system not supporting disjoint generic
/// implementations. Each closure shape implements `MethodFn` for a distinct marker type from this
/// module, so that eg. `MethodFn<signatures::Fallible<..>>` and
/// `MethodFn<signatures::Infallible<..>>` are different traits, but can both be matched by using
/// a generic parameter.
pub mod signatures {
    use std::marker::PhantomData;

    // For the type system to accept the implementations, the types of the closure's parameters
    // must appear somewhere in the trait or the implemented self type. We can't control the self
    // type, so they go into a generic parameter here. The PhantomData inside suppresses an
    // "unused generic parameter" error and prevents construction of the two structs (because
    // it's a private field).

    /// An infallible method with typed arguments.
    pub struct Infallible<Args>(PhantomData<Args>);
    /// A fallible method with typed arguments.
    pub struct Fallible<Args>(PhantomData<Args>);
    /// An infallible method with a variable number of arguments.
    pub enum VarargsInfallible {}
    /// A fallible method with a variable number of arguments.
    pub enum VarargsFallible {}
}

/// A Rust closure that can act as a [`Method`].
///
/// The first `&Value` parameter is always the receiver. Past it, the following signatures are
/// supported:
/// - `Fn(&Value, A, B, C, ...) -> R` where
///   - Each argument: [`TryFromValue`]
///   - `R`: [`Into<Value>`]
/// - `Fn(&Value, A, B, C, ...) -> Result<R, E>` where additionally
///   - `E`: [`std::error::Error`]; failures surface as [`Error::User`]
/// - Due to a limitation in Rust's type system, a maximum of 8 typed arguments is supported.
///   If more is needed, use the varargs versions below.
/// - `Fn(&Value, &[Value]) -> R` and `Fn(&Value, &[Value]) -> Result<R, E>`, taking a variable
///   number of dynamically typed arguments.
///
/// Typed signatures declare a parameter count equal to their number of typed arguments; varargs
/// signatures declare none.
///
/// The generic parameter `S` is not used inside the trait. Its only purpose is to allow for
/// multiple overlapping implementations of the trait for the same type. See [`signatures`] for
/// more information.
pub trait MethodFn<S> {
    /// Converts the closure into a [`Method`].
    fn into_method(self) -> Method;
}

macro_rules! impl_method_fn {
    ($($types:tt),*) => {
        /// Implementation for a static number of typed arguments.
        impl<Fun, Ret, $($types),*> MethodFn<signatures::Infallible<($($types,)*)>> for Fun
        where
            Fun: Fn(&Value, $($types),*) -> Ret + 'static,
            Ret: Into<Value>,
            $($types: TryFromValue + 'static,)*
        {
            fn into_method(self) -> Method {
                const PARAMETER_COUNT: u16 = {
                    #[allow(unused)]
                    let n = 0;
                    $(
                        // To force Rust into expanding $types into a sequence of additions, we
                        // create an unused variable to drive the expansion.
                        #[allow(unused, non_snake_case)]
                        let $types = ();
                        let n = n + 1;
                    )*
                    n
                };
                Method::from_raw(
                    create_raw(move |receiver, arguments| {
                        let _n = 0;
                        $(
                            // Like above, except this time the variables are actually used.
                            #[allow(non_snake_case)]
                            let $types = argument::<$types>(arguments, _n)?;
                            #[allow(unused)]
                            let _n = _n + 1;
                        )*
                        Ok(self(receiver, $($types),*).into())
                    }),
                    Some(PARAMETER_COUNT),
                )
            }
        }

        /// Implementation for a static number of typed arguments and a fallible result.
        impl<Fun, Ret, Err, $($types),*> MethodFn<signatures::Fallible<($($types,)*)>> for Fun
        where
            Fun: Fn(&Value, $($types),*) -> Result<Ret, Err> + 'static,
            Ret: Into<Value>,
            Err: std::error::Error + 'static,
            $($types: TryFromValue + 'static,)*
        {
            fn into_method(self) -> Method {
                const PARAMETER_COUNT: u16 = {
                    #[allow(unused)]
                    let n = 0;
                    $(
                        #[allow(unused, non_snake_case)]
                        let $types = ();
                        let n = n + 1;
                    )*
                    n
                };
                Method::from_raw(
                    create_raw(move |receiver, arguments| {
                        let _n = 0;
                        $(
                            #[allow(non_snake_case)]
                            let $types = argument::<$types>(arguments, _n)?;
                            #[allow(unused)]
                            let _n = _n + 1;
                        )*
                        match self(receiver, $($types),*) {
                            Ok(value) => Ok(value.into()),
                            Err(error) => Err(Error::User(Box::new(error))),
                        }
                    }),
                    Some(PARAMETER_COUNT),
                )
            }
        }
    };
}

// Support stops at 8 typed arguments. Every entry in this list expands to a pile of generated
// code, and the varargs signatures cover anything wider.
impl_method_fn!();
impl_method_fn!(A);
impl_method_fn!(A, B);
impl_method_fn!(A, B, C);
impl_method_fn!(A, B, C, D);
impl_method_fn!(A, B, C, D, E);
impl_method_fn!(A, B, C, D, E, F);
impl_method_fn!(A, B, C, D, E, F, G);
impl_method_fn!(A, B, C, D, E, F, G, H);

/// Implementation for a variable number of arguments.
impl<Fun, Ret> MethodFn<signatures::VarargsInfallible> for Fun
where
    Fun: Fn(&Value, &[Value]) -> Ret + 'static,
    Ret: Into<Value>,
{
    fn into_method(self) -> Method {
        Method::from_raw(
            create_raw(move |receiver, arguments| Ok(self(receiver, arguments).into())),
            None,
        )
    }
}

/// Implementation for a variable number of arguments and a fallible result.
impl<Fun, Ret, Err> MethodFn<signatures::VarargsFallible> for Fun
where
    Fun: Fn(&Value, &[Value]) -> Result<Ret, Err> + 'static,
    Ret: Into<Value>,
    Err: std::error::Error + 'static,
{
    fn into_method(self) -> Method {
        Method::from_raw(
            create_raw(move |receiver, arguments| match self(receiver, arguments) {
                Ok(value) => Ok(value.into()),
                Err(error) => Err(Error::User(Box::new(error))),
            }),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_closures_declare_their_parameter_count() {
        let method = Method::new(|_: &Value| 1.0);
        assert_eq!(method.parameter_count(), Some(0));
        let method = Method::new(|_: &Value, _: f64, _: f64| 1.0);
        assert_eq!(method.parameter_count(), Some(2));
        let method = Method::new(
            |_: &Value, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64| 1.0,
        );
        assert_eq!(method.parameter_count(), Some(8));
    }

    #[test]
    fn varargs_closures_declare_no_parameter_count() {
        let method = Method::new(|_: &Value, arguments: &[Value]| arguments.len());
        assert_eq!(method.parameter_count(), None);
    }

    #[test]
    fn typed_arguments_are_converted() {
        let add = Method::new(|_: &Value, a: f64, b: f64| a + b);
        let sum = add.call(&Value::Nil, &[Value::Number(1.0), Value::Number(2.0)]).unwrap();
        assert_eq!(sum, Value::Number(3.0));
    }

    #[test]
    fn absent_typed_arguments_read_as_nil() {
        let method = Method::new(|_: &Value, a: Option<f64>| a.is_none());
        assert_eq!(method.call(&Value::Nil, &[]).unwrap(), Value::True);
    }

    #[test]
    fn mistyped_arguments_report_their_position() {
        let add = Method::new(|_: &Value, a: f64, b: f64| a + b);
        let error = add.call(&Value::Nil, &[Value::Number(1.0), Value::from("x")]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "type mismatch at argument 2, expected Number but got String"
        );
    }

    #[test]
    fn user_errors_pass_through_unchanged() {
        #[derive(Debug)]
        struct Broken;

        impl std::fmt::Display for Broken {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("it broke")
            }
        }

        impl std::error::Error for Broken {}

        let method = Method::new(|_: &Value| -> Result<(), Broken> { Err(Broken) });
        let error = method.call(&Value::Nil, &[]).unwrap_err();
        assert!(matches!(error, Error::User(_)));
        assert_eq!(error.to_string(), "it broke");
    }
}
