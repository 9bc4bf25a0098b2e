//! Dynamically typed values.

use std::{borrow::Cow, cell::RefCell, fmt, rc::Rc};

use hashbrown::HashMap;

use crate::{Error, Method};

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    /// The nil value.
    Nil,
    /// The boolean `false`.
    False,
    /// The boolean `true`.
    ///
    /// Do note that despite booleans using two different enum variants, they have the same type.
    True,
    /// A number.
    Number(f64),
    /// A string.
    String(Rc<str>),
    /// A list of values.
    List(Rc<Vec<Value>>),
    /// A record with named members.
    Record(Record),
    /// A method.
    Function(Method),
}

impl Value {
    /// Returns the name of this value's type.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "Nil",
            Value::False => "False",
            Value::True => "True",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
            Value::Function(_) => "Function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::False, Self::False) => true,
            (Self::True, Self::True) => true,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::False => f.write_str("false"),
            Value::True => f.write_str("true"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(elements) => f.debug_list().entries(elements.iter()).finish(),
            Value::Record(record) => fmt::Debug::fmt(record, f),
            Value::Function(method) => fmt::Debug::fmt(method, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

/// A shared, mutable collection of named members.
///
/// Records are the only values whose members can be looked up by name, which makes them the only
/// valid receivers for late-bound adapters. Cloning a record is shallow; rebinding a member is
/// visible through every clone.
#[derive(Clone, Default)]
pub struct Record {
    members: Rc<RefCell<HashMap<Rc<str>, Value>>>,
}

impl Record {
    /// Creates a record with no members.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the member `name` to `value`, replacing any previous binding.
    pub fn set(&self, name: impl Into<Rc<str>>, value: impl Into<Value>) {
        self.members.borrow_mut().insert(name.into(), value.into());
    }

    /// Returns the current value of the member `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.members.borrow().get(name).cloned()
    }

    /// Builder-style [`set`][`Self::set`], for constructing records inline.
    pub fn with(self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }
}

/// Records compare by identity, not by structure.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.members, &other.members)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<record>")
    }
}

/// The unit type translates to `Value::Nil`.
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        match b {
            true => Self::True,
            false => Self::False,
        }
    }
}

macro_rules! value_from_number {
    ($T:ty $(, $doc:literal)?) => {
        $(#[doc = $doc])?
        impl From<$T> for Value {
            fn from(x: $T) -> Self {
                Value::Number(x as f64)
            }
        }
    };
}

value_from_number!(i8);
value_from_number!(i16);
value_from_number!(i32);
value_from_number!(i64,   "**NOTE:** This is a lossy conversion, as an `f64` cannot represent the entire range of an `i64`.");
value_from_number!(isize, "**NOTE:** This is a lossy conversion, as an `f64` cannot represent the entire range of an `isize`.");

value_from_number!(u8);
value_from_number!(u16);
value_from_number!(u32);
value_from_number!(u64,   "**NOTE:** This is a lossy conversion, as an `f64` cannot represent the entire range of a `u64`.");
value_from_number!(usize, "**NOTE:** This is a lossy conversion, as an `f64` cannot represent the entire range of a `usize`.");

value_from_number!(f32);
value_from_number!(f64);

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::from(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(elements))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Method> for Value {
    fn from(method: Method) -> Self {
        Self::Function(method)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => value.into(),
            None => Value::Nil,
        }
    }
}

/// Implemented by types that can be constructed from [`Value`]s.
pub trait TryFromValue
where
    Self: Sized,
{
    /// Tries to perform the conversion, returning an [`Error`] on failure.
    fn try_from_value(value: &Value) -> Result<Self, Error>;
}

fn type_mismatch(expected: impl Into<Cow<'static, str>>, got: &Value) -> Error {
    Error::TypeMismatch { expected: expected.into(), got: got.type_name().to_string().into() }
}

impl TryFromValue for Value {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl TryFromValue for () {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        if let Value::Nil = value {
            Ok(())
        } else {
            Err(type_mismatch("Nil", value))
        }
    }
}

impl TryFromValue for bool {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::True => Ok(true),
            Value::False => Ok(false),
            _ => Err(type_mismatch("Boolean", value)),
        }
    }
}

macro_rules! try_from_value_numeric {
    ($T:ty) => {
        impl TryFromValue for $T {
            fn try_from_value(value: &Value) -> Result<Self, Error> {
                if let Value::Number(number) = value {
                    Ok(*number as $T)
                } else {
                    Err(type_mismatch("Number", value))
                }
            }
        }
    };
}

try_from_value_numeric!(u8);
try_from_value_numeric!(u16);
try_from_value_numeric!(u32);
try_from_value_numeric!(u64);
try_from_value_numeric!(usize);

try_from_value_numeric!(i8);
try_from_value_numeric!(i16);
try_from_value_numeric!(i32);
try_from_value_numeric!(i64);
try_from_value_numeric!(isize);

try_from_value_numeric!(f32);
try_from_value_numeric!(f64);

impl TryFromValue for Rc<str> {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        if let Value::String(s) = value {
            Ok(Rc::clone(s))
        } else {
            Err(type_mismatch("String", value))
        }
    }
}

impl TryFromValue for String {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        <Rc<str>>::try_from_value(value).map(|s| s.to_string())
    }
}

impl TryFromValue for Record {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        if let Value::Record(record) = value {
            Ok(record.clone())
        } else {
            Err(type_mismatch("Record", value))
        }
    }
}

impl TryFromValue for Method {
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        if let Value::Function(method) = value {
            Ok(method.clone())
        } else {
            Err(type_mismatch("Function", value))
        }
    }
}

impl<T> TryFromValue for Option<T>
where
    T: TryFromValue,
{
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Nil => Ok(None),
            _ => Ok(Some(T::try_from_value(value).map_err(|error| {
                if let Error::TypeMismatch { expected, got } = error {
                    Error::TypeMismatch { expected: format!("{expected} or Nil").into(), got }
                } else {
                    error
                }
            })?)),
        }
    }
}

impl<T> TryFromValue for Vec<T>
where
    T: TryFromValue,
{
    fn try_from_value(value: &Value) -> Result<Self, Error> {
        if let Value::List(elements) = value {
            let mut result = Vec::with_capacity(elements.len());
            for element in elements.iter() {
                result.push(T::try_from_value(element)?);
            }
            Ok(result)
        } else {
            Err(type_mismatch("List", value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_round_trips() {
        assert_eq!(Value::from(()), Value::Nil);
        assert_eq!(Value::from(true), Value::True);
        assert_eq!(Value::from(1), Value::Number(1.0));
        assert_eq!(Value::from("abc"), Value::String(Rc::from("abc")));
        assert_eq!(f64::try_from_value(&Value::Number(2.5)).unwrap(), 2.5);
        assert_eq!(String::try_from_value(&Value::from("abc")).unwrap(), "abc");
        assert_eq!(Option::<f64>::try_from_value(&Value::Nil).unwrap(), None);
    }

    #[test]
    fn conversion_failures_name_both_types() {
        let error = f64::try_from_value(&Value::from("abc")).unwrap_err();
        assert_eq!(error.to_string(), "type mismatch, expected Number but got String");
    }

    #[test]
    fn lists_compare_structurally() {
        let a = Value::from(vec![Value::Number(1.0), Value::Nil]);
        let b = Value::from(vec![Value::Number(1.0), Value::Nil]);
        assert_eq!(a, b);
        assert_ne!(a, Value::from(vec![Value::Number(2.0)]));
    }

    #[test]
    fn records_compare_by_identity() {
        let a = Record::new().with("x", 1);
        let b = Record::new().with("x", 1);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn rebinding_a_member_is_visible_through_clones() {
        let record = Record::new().with("x", 1);
        let clone = record.clone();
        record.set("x", 2);
        assert_eq!(clone.get("x"), Some(Value::Number(2.0)));
    }
}
