//! Adapters over a fixed method: receiver-first (`pre`) and receiver-last (`post`).

use std::{array, fmt, rc::Rc};

use crate::{Error, Method, Value};

/// The raw calling convention of an adapter: a single ordered argument list that carries the
/// receiver in an explicit position.
pub type RawAdapter = Rc<dyn Fn(&[Value]) -> Result<Value, Error>>;

/// A method re-shaped into a plain function with an explicit receiver parameter.
///
/// Adapters are produced by [`pre`], [`post`], their fixed-arity variants, and the late-bound
/// `dynamic_*` constructors. They hold no state beyond what their constructor captured and can
/// be cloned and invoked freely.
#[derive(Clone)]
pub struct Adapter {
    raw: RawAdapter,
    parameter_count: Option<u16>,
}

impl Adapter {
    fn variadic(raw: impl Fn(&[Value]) -> Result<Value, Error> + 'static) -> Self {
        Self { raw: Rc::new(raw), parameter_count: None }
    }

    fn fixed(
        parameter_count: u16,
        raw: impl Fn(&[Value]) -> Result<Value, Error> + 'static,
    ) -> Self {
        Self { raw: Rc::new(raw), parameter_count: Some(parameter_count) }
    }

    /// Returns the adapter's declared parameter count (the receiver slot included), or `None`
    /// if the adapter accepts a variable number of arguments.
    pub fn parameter_count(&self) -> Option<u16> {
        self.parameter_count
    }

    /// Invokes the adapter. `arguments` carries the receiver and the explicit arguments in the
    /// positions the adapter's convention dictates.
    pub fn call(&self, arguments: &[Value]) -> Result<Value, Error> {
        (self.raw)(arguments)
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter_count {
            Some(count) => write!(f, "<adapter/{count}>"),
            None => write!(f, "<adapter>"),
        }
    }
}

/// Creates an adapter that takes the receiver as its first argument.
///
/// The adapter accepts any number of arguments; everything past the first is forwarded to
/// `method` in order. Invoking it with no arguments at all makes the receiver read as `Nil`.
pub fn pre(method: Method) -> Adapter {
    Adapter::variadic(move |arguments| match arguments.split_first() {
        Some((receiver, rest)) => method.call(receiver, rest),
        None => method.call(&Value::Nil, &[]),
    })
}

/// Fixed-arity version of [`pre`].
///
/// When `arity` is `None` it is inferred from the method's own
/// [declared parameter count][`Method::parameter_count`]. For arities 0–8 the produced adapter
/// declares exactly `arity + 1` parameters (the receiver slot included); above 8, or when no
/// count can be inferred, this delegates to [`pre`].
pub fn pre_fixed(method: Method, arity: impl Into<Option<u16>>) -> Adapter {
    match arity.into().or_else(|| method.parameter_count()) {
        Some(0) => specialized_pre::<0>(method),
        Some(1) => specialized_pre::<1>(method),
        Some(2) => specialized_pre::<2>(method),
        Some(3) => specialized_pre::<3>(method),
        Some(4) => specialized_pre::<4>(method),
        Some(5) => specialized_pre::<5>(method),
        Some(6) => specialized_pre::<6>(method),
        Some(7) => specialized_pre::<7>(method),
        Some(8) => specialized_pre::<8>(method),
        _ => pre(method),
    }
}

/// Creates an adapter that takes the receiver as its last argument.
///
/// The adapter accepts any number of arguments; the last one is taken as the receiver and
/// everything before it is forwarded to `method` in order. Invoking it with no arguments at all
/// has no defined receiver, which reads as `Nil`; no guard is added.
pub fn post(method: Method) -> Adapter {
    Adapter::variadic(move |arguments| match arguments.split_last() {
        Some((receiver, rest)) => method.call(receiver, rest),
        None => method.call(&Value::Nil, &[]),
    })
}

/// Fixed-arity version of [`post`].
///
/// Arity selection works like in [`pre_fixed`]; the receiver is always the final declared
/// parameter.
pub fn post_fixed(method: Method, arity: impl Into<Option<u16>>) -> Adapter {
    match arity.into().or_else(|| method.parameter_count()) {
        Some(0) => specialized_post::<0>(method),
        Some(1) => specialized_post::<1>(method),
        Some(2) => specialized_post::<2>(method),
        Some(3) => specialized_post::<3>(method),
        Some(4) => specialized_post::<4>(method),
        Some(5) => specialized_post::<5>(method),
        Some(6) => specialized_post::<6>(method),
        Some(7) => specialized_post::<7>(method),
        Some(8) => specialized_post::<8>(method),
        _ => post(method),
    }
}

/// Normalizes an argument list to a fixed shape: missing trailing arguments read as `Nil`,
/// extras are dropped.
fn normalized<const N: usize>(arguments: &[Value]) -> [Value; N] {
    array::from_fn(|i| arguments.get(i).cloned().unwrap_or(Value::Nil))
}

fn specialized_pre<const N: usize>(method: Method) -> Adapter {
    Adapter::fixed(N as u16 + 1, move |arguments| {
        let receiver = arguments.first().cloned().unwrap_or(Value::Nil);
        let arguments = normalized::<N>(arguments.get(1..).unwrap_or(&[]));
        method.call(&receiver, &arguments)
    })
}

fn specialized_post<const N: usize>(method: Method) -> Adapter {
    Adapter::fixed(N as u16 + 1, move |arguments| {
        let receiver = arguments.get(N).cloned().unwrap_or(Value::Nil);
        let arguments = normalized::<N>(arguments);
        method.call(&receiver, &arguments)
    })
}
