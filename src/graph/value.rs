use super::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal input value bound directly onto a node slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Literal>),
}

impl Literal {
    /// Returns the literal as JSON, the shape both serialized forms embed.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Int(n) => serde_json::Value::from(*n),
            // Graphs only hold finite floats; see `DataType::accepts`.
            Literal::Float(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Literal::String(s) => serde_json::Value::String(s.clone()),
            Literal::List(items) => {
                serde_json::Value::Array(items.iter().map(Literal::to_json).collect())
            }
        }
    }

    /// False for NaN and infinite floats, which have no JSON representation.
    pub fn is_finite(&self) -> bool {
        match self {
            Literal::Float(n) => n.is_finite(),
            Literal::List(items) => items.iter().all(Literal::is_finite),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Float(n) => Some(*n),
            Literal::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(values: Vec<T>) -> Self {
        Literal::List(values.into_iter().map(Into::into).collect())
    }
}

/// Points at one output slot of an already-allocated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputRef {
    pub node: NodeId,
    pub slot: usize,
}

impl OutputRef {
    pub fn new(node: NodeId, slot: usize) -> Self {
        Self { node, slot }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.node, self.slot)
    }
}

/// What an input slot is bound to: a literal, or another node's output.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Literal(Literal),
    Reference(OutputRef),
}

impl Binding {
    pub fn literal(value: impl Into<Literal>) -> Self {
        Binding::Literal(value.into())
    }

    pub fn reference(node: NodeId, slot: usize) -> Self {
        Binding::Reference(OutputRef::new(node, slot))
    }

    pub fn as_reference(&self) -> Option<OutputRef> {
        match self {
            Binding::Reference(r) => Some(*r),
            Binding::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Binding::Literal(l) => Some(l),
            Binding::Reference(_) => None,
        }
    }
}

impl From<OutputRef> for Binding {
    fn from(value: OutputRef) -> Self {
        Binding::Reference(value)
    }
}

impl From<Literal> for Binding {
    fn from(value: Literal) -> Self {
        Binding::Literal(value)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Literal(l) => write!(f, "{}", l),
            Binding::Reference(r) => write!(f, "{}", r),
        }
    }
}
