//! Late-bound adapters that resolve the method on the receiver at call time.

use std::rc::Rc;

use crate::{
    adapt::{post, post_fixed, pre, pre_fixed, Adapter},
    function::create_raw,
    Error, Method, Value,
};

/// Looks up the method named `method_name` on `receiver`.
///
/// Resolution happens afresh on every call: rebinding the member between two calls changes the
/// dispatch target of the second call.
fn resolve(receiver: &Value, method_name: &Rc<str>) -> Result<Method, Error> {
    let record = match receiver {
        Value::Nil => {
            return Err(Error::NilReceiver { method_name: Rc::clone(method_name) });
        }
        Value::Record(record) => record,
        // Only records have name-addressable members; on anything else every lookup misses.
        _ => {
            return Err(Error::MethodDoesNotExist {
                type_name: receiver.type_name().to_string().into(),
                method_name: Rc::clone(method_name),
            });
        }
    };
    match record.get(method_name) {
        Some(Value::Function(method)) => Ok(method),
        Some(_) => Err(Error::MemberNotCallable {
            type_name: receiver.type_name().to_string().into(),
            method_name: Rc::clone(method_name),
        }),
        None => Err(Error::MethodDoesNotExist {
            type_name: receiver.type_name().to_string().into(),
            method_name: Rc::clone(method_name),
        }),
    }
}

/// Packages per-call resolution as a varargs method, so that the late-bound constructors can
/// reuse the receiver-splicing adapters unchanged.
fn dispatcher(method_name: Rc<str>) -> Method {
    Method::from_raw(
        create_raw(move |receiver, arguments| {
            resolve(receiver, &method_name)?.call(receiver, arguments)
        }),
        None,
    )
}

/// Creates an adapter that takes the receiver as its first argument and looks the method up on
/// it, by name, on every call.
///
/// The receiver must not be `Nil`; lookup on a `Nil` receiver fails with [`Error::NilReceiver`]
/// before any method code runs.
pub fn dynamic_pre(method_name: impl Into<Rc<str>>) -> Adapter {
    pre(dispatcher(method_name.into()))
}

/// Fixed-arity version of [`dynamic_pre`].
///
/// Unlike [`pre_fixed`], the arity cannot be inferred, because there is no method object to
/// inspect before the first call, so it must be supplied. Arities 0-8 produce an adapter declaring
/// exactly `arity + 1` parameters; above 8 this delegates to [`dynamic_pre`].
pub fn dynamic_pre_fixed(method_name: impl Into<Rc<str>>, arity: u16) -> Adapter {
    pre_fixed(dispatcher(method_name.into()), arity)
}

/// Creates an adapter that takes the receiver as its last argument and looks the method up on
/// it, by name, on every call.
///
/// See [`dynamic_pre`] for the lookup rules.
pub fn dynamic_post(method_name: impl Into<Rc<str>>) -> Adapter {
    post(dispatcher(method_name.into()))
}

/// Fixed-arity version of [`dynamic_post`]; the receiver is always the final declared parameter.
///
/// See [`dynamic_pre_fixed`] for how the arity is handled.
pub fn dynamic_post_fixed(method_name: impl Into<Rc<str>>, arity: u16) -> Adapter {
    post_fixed(dispatcher(method_name.into()), arity)
}
