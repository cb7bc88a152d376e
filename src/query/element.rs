use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::core::{NodeHandle, ScriptExecutor};
use crate::errors::Result;

/// A single matched DOM element: one opaque node reference plus the selector
/// expression it was derived from.
///
/// The node reference is non-owning. It goes stale when the underlying
/// element is detached or the page reloads; a handle held across a page
/// reload fails on its next driver call rather than being masked here.
pub struct ElementHandle<E: ScriptExecutor> {
    executor: Arc<E>,
    selector: String,
    index: usize,
    tag_name: String,
    node: E::Node,
}

impl<E: ScriptExecutor> ElementHandle<E> {
    /// Wraps a raw node reference as element `index` of `selector`.
    ///
    /// Reads the node's tag name, so a reference that went stale between
    /// snapshot and wrapping fails here with
    /// [`QueryError::StaleReference`](crate::QueryError::StaleReference).
    pub async fn new(
        executor: Arc<E>,
        selector: &str,
        index: usize,
        node: E::Node,
    ) -> Result<Self> {
        let tag_name = node.tag_name().await?;
        Ok(Self {
            executor,
            selector: format!("{}[{}]", selector, index),
            index,
            tag_name,
            node,
        })
    }

    /// Position within the owning selection at creation time.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Selector expression uniquely describing how this element was derived,
    /// e.g. `jQuery('.item')[3]`.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn node(&self) -> &E::Node {
        &self.node
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    /// Value of the named attribute, read straight from the node reference.
    pub async fn attr(&self, attribute_name: &str) -> Result<Option<String>> {
        self.node.attribute(attribute_name).await
    }

    /// Computed style value of `css_property`, queried through jQuery with
    /// this element's own selector expression.
    pub async fn css(&self, css_property: &str) -> Result<String> {
        let script = format!(
            "return jQuery({}).css('{}');",
            self.selector, css_property
        );
        debug!("executing script: {}", script);
        self.executor.execute_script(&script).await?.into_string()
    }

    pub(crate) fn set_selector(&mut self, selector: String) {
        self.selector = selector;
    }
}

impl<E: ScriptExecutor> Clone for ElementHandle<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            selector: self.selector.clone(),
            index: self.index,
            tag_name: self.tag_name.clone(),
            node: self.node.clone(),
        }
    }
}

impl<E: ScriptExecutor> fmt::Debug for ElementHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("selector", &self.selector)
            .field("index", &self.index)
            .field("tag_name", &self.tag_name)
            .field("node", &self.node)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptValue;
    use crate::errors::QueryError;
    use crate::testing::{MockExecutor, MockNode};
    use serde_json::json;

    #[tokio::test]
    async fn new_derives_indexed_selector_and_tag_name() {
        let executor = Arc::new(MockExecutor::new());
        let handle = ElementHandle::new(executor, "jQuery('.item')", 3, MockNode::new("div"))
            .await
            .unwrap();

        assert_eq!(handle.selector(), "jQuery('.item')[3]");
        assert_eq!(handle.index(), 3);
        assert_eq!(handle.tag_name(), "div");
    }

    #[tokio::test]
    async fn new_fails_on_stale_node() {
        let executor = Arc::new(MockExecutor::new());
        let result =
            ElementHandle::new(executor, "jQuery('.item')", 0, MockNode::new("div").stale()).await;

        assert!(matches!(result, Err(QueryError::StaleReference(_))));
    }

    #[tokio::test]
    async fn attr_delegates_to_the_node() {
        let executor = Arc::new(MockExecutor::new());
        let node = MockNode::new("a").with_attribute("href", "/docs");
        let handle = ElementHandle::new(executor, "jQuery('a')", 0, node)
            .await
            .unwrap();

        assert_eq!(handle.attr("href").await.unwrap(), Some("/docs".to_string()));
        assert_eq!(handle.attr("title").await.unwrap(), None);
    }

    #[tokio::test]
    async fn css_wraps_own_selector_expression() {
        let executor = Arc::new(MockExecutor::new());
        let handle = ElementHandle::new(executor.clone(), "jQuery('.item')", 1, MockNode::new("p"))
            .await
            .unwrap();

        executor.push_response(ScriptValue::Value(json!("rgb(0, 0, 0)")));
        let color = handle.css("color").await.unwrap();

        assert_eq!(color, "rgb(0, 0, 0)");
        assert_eq!(
            executor.scripts(),
            vec!["return jQuery(jQuery('.item')[1]).css('color');"]
        );
    }
}
