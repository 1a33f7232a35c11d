use std::fmt;
use thiserror::Error;

/// Which node already holds the child an attach was attempted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    /// The node the attach was called on
    Caller,
    /// Some other node
    Other,
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Caller => write!(f, "this node"),
            Holder::Other => write!(f, "another node"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Node handle does not refer to a live node")]
    NullNode,

    #[error("Node '{name}' is already a child of {holder}")]
    AlreadyParented { name: String, holder: Holder },

    #[error("Node '{0}' is not a child of this node")]
    NotAChild(String),

    #[error("Node '{0}' is not parented with a node")]
    NoParent(String),

    #[error("Node '{0}' is not connected to a child")]
    NoChild(String),

    #[error("Another child is already connected to node '{0}'")]
    ChildOccupied(String),

    #[error("Attaching '{child}' under '{parent}' would create a cycle")]
    CycleDetected { parent: String, child: String },

    #[error("Index {index} out of range for {len} positions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type NodeResult<T> = Result<T, NodeError>;
