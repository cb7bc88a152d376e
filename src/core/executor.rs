use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{QueryError, Result};

/// Per-node capability exposed by the driver for a live DOM element.
///
/// References are non-owning: the document owns the node, and any call may
/// fail with [`QueryError::StaleReference`] once the node has been detached
/// or the page has reloaded.
#[async_trait]
pub trait NodeHandle: Clone + std::fmt::Debug + Send + Sync {
    /// Tag name of the element.
    ///
    /// This is also the liveness probe: element construction calls it to
    /// detect references that went stale between snapshot and wrapping.
    async fn tag_name(&self) -> Result<String>;

    /// Value of the named attribute, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;
}

/// Capability to run a script string in the page context.
///
/// The single boundary to the browser driver. Implementations decode the
/// driver's raw return value into a [`ScriptValue`] before handing it back.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    type Node: NodeHandle;

    /// Runs `script` in the page and returns its decoded value.
    async fn execute_script(&self, script: &str) -> Result<ScriptValue<Self::Node>>;
}

/// A script result, decoded at the driver boundary.
///
/// Drivers serialize a jQuery object either as a collection of node
/// references or as a plain object carrying a numeric `length` field and
/// integer-string keys; both are recognized. Anything matching neither is
/// kept as [`ScriptValue::Unrecognized`] and fails loudly wherever nodes
/// are expected of it, never silently becoming an empty set.
#[derive(Debug, Clone)]
pub enum ScriptValue<N> {
    /// A primitive: string, number, bool or null.
    Value(Value),
    /// A single node reference.
    Node(N),
    /// An ordered collection of node references.
    NodeList(Vec<N>),
    /// A jQuery object serialized as a plain object. `entries` holds the
    /// integer-string keys; other keys the driver tacked on are dropped
    /// during decoding.
    NodeMap {
        length: usize,
        entries: HashMap<String, N>,
    },
    /// Anything the driver returned that matches no recognized shape.
    Unrecognized(Value),
}

impl<N> ScriptValue<N> {
    /// Short name of the shape, for error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            ScriptValue::Value(_) => "primitive value",
            ScriptValue::Node(_) => "single node",
            ScriptValue::NodeList(_) => "node list",
            ScriptValue::NodeMap { .. } => "node map",
            ScriptValue::Unrecognized(_) => "unrecognized value",
        }
    }

    /// Unwraps a primitive result into a string.
    ///
    /// Strings come back verbatim; other primitives are rendered as JSON
    /// text. Node-bearing and unrecognized shapes are an error.
    pub fn into_string(self) -> Result<String> {
        match self {
            ScriptValue::Value(Value::String(s)) => Ok(s),
            ScriptValue::Value(other) => Ok(other.to_string()),
            other => Err(QueryError::UnexpectedResultShape(format!(
                "expected a primitive value, got {}",
                other.shape_name()
            ))),
        }
    }
}
