use crate::graph::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node already present: {id}")]
    DuplicateNode { id: NodeId },
    #[error("unknown node: {id}")]
    UnknownNode { id: NodeId },
    #[error("unknown link: {a} <-> {b}")]
    UnknownLink { a: NodeId, b: NodeId },
    #[error("invalid {parameter}: {value} (expected a positive, finite number)")]
    InvalidForceConfiguration { parameter: &'static str, value: f64 },
    #[error("node is static and cannot be given a destination: {id}")]
    StaticNode { id: NodeId },
    #[error("a node cannot be linked to itself: {id}")]
    InvalidLink { id: NodeId },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects zero, negative, NaN and infinite values for a named parameter.
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidForceConfiguration { parameter, value })
    }
}
