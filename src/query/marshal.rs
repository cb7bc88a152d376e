//! Conversion of raw script results into ordered element handle lists.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{ScriptExecutor, ScriptValue};
use crate::errors::{QueryError, Result};
use crate::query::element::ElementHandle;

/// Converts a script result into an ordered list of element handles.
///
/// Accepts the two shapes drivers produce for jQuery objects: a plain
/// collection of node references, or a map with a `length` field and
/// integer-string keys. Every other shape is a loud error, never an empty
/// list. Stale references encountered here propagate; only bulk
/// construction from a node snapshot drops them.
pub(crate) async fn to_handles<E: ScriptExecutor>(
    executor: &Arc<E>,
    selector: &str,
    result: ScriptValue<E::Node>,
) -> Result<Vec<ElementHandle<E>>> {
    match result {
        ScriptValue::NodeList(nodes) => {
            let mut handles = Vec::with_capacity(nodes.len());
            for (index, node) in nodes.into_iter().enumerate() {
                handles.push(ElementHandle::new(executor.clone(), selector, index, node).await?);
            }
            Ok(handles)
        }
        ScriptValue::NodeMap { length, entries } => {
            from_map(executor, selector, length, entries).await
        }
        other => Err(QueryError::UnexpectedResultShape(format!(
            "expected a node list or node map, got {}",
            other.shape_name()
        ))),
    }
}

/// Map-shape-only conversion, used by the two-argument `add` path, which has
/// only ever been observed to produce the map shape. A node-list result here
/// is an error; the asymmetry with [`to_handles`] is deliberate.
pub(crate) async fn to_handles_from_map<E: ScriptExecutor>(
    executor: &Arc<E>,
    selector: &str,
    result: ScriptValue<E::Node>,
) -> Result<Vec<ElementHandle<E>>> {
    match result {
        ScriptValue::NodeMap { length, entries } => {
            from_map(executor, selector, length, entries).await
        }
        other => Err(QueryError::UnexpectedResultShape(format!(
            "expected a node map, got {}",
            other.shape_name()
        ))),
    }
}

async fn from_map<E: ScriptExecutor>(
    executor: &Arc<E>,
    selector: &str,
    length: usize,
    entries: HashMap<String, E::Node>,
) -> Result<Vec<ElementHandle<E>>> {
    let mut handles = Vec::with_capacity(length);
    for index in 0..length {
        let node = entries.get(&index.to_string()).cloned().ok_or_else(|| {
            QueryError::UnexpectedResultShape(format!(
                "node map of length {} is missing entry \"{}\"",
                length, index
            ))
        })?;
        handles.push(ElementHandle::new(executor.clone(), selector, index, node).await?);
    }
    Ok(handles)
}
