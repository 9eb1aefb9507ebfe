//! Message payloads
//!
//! A log call carries either a list of positional arguments or a string that
//! was already formatted by the caller. Each positional argument is
//! classified once, at the call boundary, into an [`Arg`] variant; nothing
//! downstream inspects runtime types.

use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single positional message argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    Integer(Number),
    Float(f64),
    Mapping(Map<String, Value>),
    /// Any other scalar (booleans, null, arrays)
    Other(Value),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(s) => f.write_str(s),
            Arg::Integer(n) => write!(f, "{}", n),
            Arg::Float(v) => write!(f, "{}", v),
            Arg::Mapping(m) => {
                let rendered = serde_json::to_string(m).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            Arg::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Text(s.clone())
    }
}

macro_rules! impl_integer_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Integer(Number::from(v))
                }
            }
        )*
    };
}

impl_integer_arg!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Other(Value::Bool(v))
    }
}

impl From<Map<String, Value>> for Arg {
    fn from(m: Map<String, Value>) -> Self {
        Arg::Mapping(m)
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Arg {
    fn from(m: HashMap<String, V>) -> Self {
        Arg::Mapping(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Arg {
    fn from(m: BTreeMap<String, V>) -> Self {
        Arg::Mapping(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Arg::Text(s),
            Value::Number(n) if n.is_f64() => Arg::Float(n.as_f64().unwrap_or_default()),
            Value::Number(n) => Arg::Integer(n),
            Value::Object(m) => Arg::Mapping(m),
            other => Arg::Other(other),
        }
    }
}

/// Message carried by one log call
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Args(Vec<Arg>),
    Formatted(String),
}

impl Message {
    /// Human readable rendering used by console sinks: positional
    /// arguments joined by single spaces.
    pub fn render(&self) -> String {
        match self {
            Message::Formatted(s) => s.clone(),
            Message::Args(args) => join_args(args),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Message::Formatted(s) => s.is_empty(),
            Message::Args(args) => args.is_empty(),
        }
    }
}

pub(crate) fn join_args(args: &[Arg]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Vec<Arg>> for Message {
    fn from(args: Vec<Arg>) -> Self {
        Message::Args(args)
    }
}

impl From<Arg> for Message {
    fn from(arg: Arg) -> Self {
        Message::Args(vec![arg])
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Message::Formatted(args.to_string())
    }
}

macro_rules! impl_single_arg_message {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Message {
                fn from(v: $ty) -> Self {
                    Message::Args(vec![Arg::from(v)])
                }
            }
        )*
    };
}

impl_single_arg_message!(
    &str, String, &String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool,
    Map<String, Value>, Value
);

impl<V: Into<Value>> From<HashMap<String, V>> for Message {
    fn from(m: HashMap<String, V>) -> Self {
        Message::Args(vec![Arg::from(m)])
    }
}

/// Build a positional [`Message`] from heterogeneous arguments.
///
/// ```
/// use fanout_logger::{args, Message};
///
/// let msg = args!["a", "b", 123, 456.99];
/// assert_eq!(msg.render(), "a b 123 456.99");
/// assert!(matches!(msg, Message::Args(ref a) if a.len() == 4));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Message::Args(::std::vec::Vec::new())
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Message::Args(::std::vec![$($crate::Arg::from($arg)),+])
    };
}
