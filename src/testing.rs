//! Test doubles for exercising the fluent layer without a browser.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{NodeHandle, ScriptExecutor, ScriptValue};
use crate::errors::{QueryError, Result};
use crate::query::Selection;

/// An in-memory stand-in for a driver's DOM node reference.
#[derive(Debug, Clone)]
pub struct MockNode {
    tag_name: String,
    attributes: HashMap<String, String>,
    failure: Option<MockFailure>,
}

#[derive(Debug, Clone, Copy)]
enum MockFailure {
    Stale,
    Driver,
}

impl MockNode {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attributes: HashMap::new(),
            failure: None,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Marks the node as detached: every capability call fails with a stale
    /// reference error.
    pub fn stale(mut self) -> Self {
        self.failure = Some(MockFailure::Stale);
        self
    }

    /// Makes every capability call fail with a driver error that is not a
    /// stale reference.
    pub fn broken(mut self) -> Self {
        self.failure = Some(MockFailure::Driver);
        self
    }

    fn check(&self) -> Result<()> {
        match self.failure {
            Some(MockFailure::Stale) => Err(QueryError::StaleReference(format!(
                "{} is detached from the document",
                self.tag_name
            ))),
            Some(MockFailure::Driver) => Err(QueryError::ScriptFailed(format!(
                "node capability failure on {}",
                self.tag_name
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NodeHandle for MockNode {
    async fn tag_name(&self) -> Result<String> {
        self.check()?;
        Ok(self.tag_name.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.attributes.get(name).cloned())
    }
}

/// Script executor double: answers from a queue of canned results and
/// records every script it was asked to run.
///
/// An exhausted queue answers `null`, which is what a driver returns for
/// scripts executed purely for their side effect.
#[derive(Default)]
pub struct MockExecutor {
    responses: Mutex<VecDeque<Result<ScriptValue<MockNode>>>>,
    scripts: Mutex<Vec<String>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ScriptValue<MockNode>) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: QueryError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Scripts executed so far, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptExecutor for MockExecutor {
    type Node = MockNode;

    async fn execute_script(&self, script: &str) -> Result<ScriptValue<MockNode>> {
        self.scripts.lock().unwrap().push(script.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ScriptValue::Value(Value::Null)))
    }
}

/// Builds a map-shaped script result the way drivers serialize jQuery
/// objects: a `length` field plus integer-string keys.
pub fn node_map(nodes: Vec<MockNode>) -> ScriptValue<MockNode> {
    let length = nodes.len();
    let entries = nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| (index.to_string(), node))
        .collect();
    ScriptValue::NodeMap { length, entries }
}

/// Builds a selection over mock nodes with the given tag names.
pub async fn selection_of(
    executor: Arc<MockExecutor>,
    selector: &str,
    tags: &[&str],
) -> Selection<MockExecutor> {
    let nodes = tags.iter().map(|tag| MockNode::new(tag)).collect();
    Selection::from_nodes(executor, selector, nodes)
        .await
        .expect("mock nodes are never stale")
}

/// Installs a debug-level subscriber so composed scripts show up in test
/// output. Repeat calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
}
