// Job Argument Values

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A positional argument passed to a job.
///
/// Mirrors the values a dynamically typed job payload can carry. `Symbol` is
/// the one variant that never survives enqueue: the normalizer turns every
/// symbol into a `Str`, at any depth.
///
/// `Display` renders the inspect form used in assertion messages:
///
/// ```text
/// [1, :test, {:symbol=>:symbol}]   (before enqueue)
/// [1, "test", {"symbol"=>"symbol"}] (as stored)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    List(Vec<Arg>),
    /// Ordered key/value pairs (insertion order is kept).
    Map(Vec<(Arg, Arg)>),
}

impl Arg {
    pub fn sym(name: impl Into<String>) -> Self {
        Arg::Symbol(name.into())
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arg>,
    {
        Arg::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arg>,
        V: Into<Arg>,
    {
        Arg::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Arg::Symbol(_))
    }

    /// Text of a string or symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) | Arg::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Arg::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Look up a map entry whose key is the string or symbol `key`.
    pub fn get(&self, key: &str) -> Option<&Arg> {
        match self {
            Arg::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Inspect form of a positional argument list, e.g. `[1, "test"]`.
pub fn inspect_args(args: &[Arg]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_seq(&mut out, args);
    out
}

fn write_seq<W: fmt::Write>(out: &mut W, items: &[Arg]) -> fmt::Result {
    out.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{item}")?;
    }
    out.write_char(']')
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Nil => f.write_str("nil"),
            Arg::Bool(b) => write!(f, "{b}"),
            Arg::Int(n) => write!(f, "{n}"),
            Arg::Float(x) => write!(f, "{x:?}"),
            Arg::Str(s) => write!(f, "{s:?}"),
            Arg::Symbol(s) => write!(f, ":{s}"),
            Arg::List(items) => write_seq(f, items),
            Arg::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}=>{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// JSON encoding of a payload: symbols serialize as plain strings.
impl Serialize for Arg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Arg::Nil => serializer.serialize_unit(),
            Arg::Bool(b) => serializer.serialize_bool(*b),
            Arg::Int(n) => serializer.serialize_i64(*n),
            Arg::Float(x) => serializer.serialize_f64(*x),
            Arg::Str(s) | Arg::Symbol(s) => serializer.serialize_str(s),
            Arg::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Arg::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Arg {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Arg::Nil,
            Value::Bool(b) => Arg::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Arg::Int(i),
                None => n.as_f64().map_or(Arg::Nil, Arg::Float),
            },
            Value::String(s) => Arg::Str(s),
            Value::Array(items) => Arg::List(items.into_iter().map(Arg::from).collect()),
            Value::Object(map) => Arg::Map(
                map.into_iter()
                    .map(|(k, v)| (Arg::Str(k), Arg::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Int(i64::from(n))
    }
}

impl From<u32> for Arg {
    fn from(n: u32) -> Self {
        Arg::Int(i64::from(n))
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Float(x)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::list(items)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Nil, Into::into)
    }
}
