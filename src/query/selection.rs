use std::fmt;
use std::slice;
use std::sync::Arc;

use tracing::debug;

use crate::core::{ScriptExecutor, ScriptValue};
use crate::errors::{QueryError, Result};
use crate::query::element::ElementHandle;
use crate::query::marshal;
use crate::query::quoting::{join_quoted, quote_argument};

/// An ordered set of matched elements plus the jQuery expression that
/// produced them.
///
/// Every fluent method composes a JavaScript expression around the current
/// selector, runs it through the shared script executor, and — when the call
/// can change which elements match — replaces the element list with the
/// marshaled result. Mutating methods return the selection itself so calls
/// chain.
///
/// Calls are strictly sequential: one script execution per call, no overlap,
/// no cancellation. A hang in the driver hangs the caller.
pub struct Selection<E: ScriptExecutor> {
    executor: Arc<E>,
    selector: String,
    elements: Vec<ElementHandle<E>>,
    cursor: usize,
}

impl<E: ScriptExecutor> Selection<E> {
    /// Builds a selection from raw node references.
    ///
    /// Each node is wrapped individually; a reference that went stale
    /// between snapshot and wrapping is dropped, and the survivors are
    /// indexed sequentially. Any other wrapping failure aborts the whole
    /// construction.
    pub async fn from_nodes(
        executor: Arc<E>,
        selector: &str,
        nodes: Vec<E::Node>,
    ) -> Result<Self> {
        let mut elements = Vec::with_capacity(nodes.len());
        for node in nodes {
            match ElementHandle::new(executor.clone(), selector, elements.len(), node).await {
                Ok(element) => elements.push(element),
                Err(QueryError::StaleReference(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(Self {
            executor,
            selector: selector.to_string(),
            elements,
            cursor: 0,
        })
    }

    /// Seeds a new chain from a single element handle.
    pub fn from_element(element: ElementHandle<E>) -> Self {
        let executor = Arc::clone(element.executor());
        let selector = format!("jQuery({})", element.selector());
        Self {
            executor,
            selector,
            elements: vec![element],
            cursor: 0,
        }
    }

    /// Builds a selection by marshaling a raw script result.
    pub(crate) async fn from_script_value(
        executor: Arc<E>,
        selector: String,
        result: ScriptValue<E::Node>,
    ) -> Result<Self> {
        let elements = marshal::to_handles(&executor, &selector, result).await?;
        Ok(Self {
            executor,
            selector,
            elements,
            cursor: 0,
        })
    }

    /// jQuery expression whose evaluation yields the current elements.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Matched elements, in DOM match order from the last query.
    pub fn elements(&self) -> &[ElementHandle<E>] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the selection matched no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the matched elements in order.
    pub fn iter(&self) -> slice::Iter<'_, ElementHandle<E>> {
        self.elements.iter()
    }

    /// Element at `index`, or `None` when the index is out of range.
    pub fn get(&self, index: usize) -> Option<&ElementHandle<E>> {
        self.elements.get(index)
    }

    /// Returns the element at the cursor, then advances the cursor.
    ///
    /// # Panics
    ///
    /// Panics once the cursor has run past the last element. Sequential
    /// consumers are expected to stop at [`len`](Self::len); there is no
    /// silent guard here.
    pub fn advance(&mut self) -> &ElementHandle<E> {
        let element = &self.elements[self.cursor];
        self.cursor += 1;
        element
    }

    /// Adds elements matched by `selector_elements_html` (a selector,
    /// elements, or an HTML fragment) to the set of matched elements.
    pub async fn add(&mut self, selector_elements_html: &str) -> Result<&mut Self> {
        let argument = quote_argument(selector_elements_html);
        let result = self
            .exec_js("jQuery(", &format!(").add({});", argument))
            .await?;
        let new_selector = format!("jQuery({}).add({})", self.selector, argument);
        let elements = marshal::to_handles(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        self.overwrite_selectors(new_selector);
        Ok(self)
    }

    /// Adds elements matched by `selector` within `context` to the set of
    /// matched elements.
    ///
    /// Unlike [`add`](Self::add), this path accepts only the map-shaped
    /// script result; drivers have only ever been observed to produce that
    /// shape here, and a node-list result is an error.
    pub async fn add_in_context(&mut self, selector: &str, context: &str) -> Result<&mut Self> {
        let result = self
            .exec_js("jQuery(", &format!(").add('{}',{});", selector, context))
            .await?;
        let new_selector = format!("jQuery({}).add('{}',{})", self.selector, selector, context);
        let elements = marshal::to_handles_from_map(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        self.overwrite_selectors(new_selector);
        Ok(self)
    }

    /// Adds the given class name(s) to every matched element.
    pub async fn add_class(&mut self, class_name: &str) -> Result<&mut Self> {
        let argument = quote_argument(class_name);
        self.exec_js("jQuery(", &format!(").addClass({});", argument))
            .await?;
        Ok(self)
    }

    /// Inserts each content item after each matched element.
    pub async fn after(&mut self, content: &[&str]) -> Result<&mut Self> {
        let joined = join_quoted(content);
        debug!("after content: {}", joined);
        let result = self
            .exec_js("jQuery(", &format!(").after({});", joined))
            .await?;
        let elements = marshal::to_handles(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        Ok(self)
    }

    /// Inserts each content item at the end of each matched element.
    pub async fn append(&mut self, content: &[&str]) -> Result<&mut Self> {
        let joined = join_quoted(content);
        debug!("append content: {}", joined);
        let result = self
            .exec_js("jQuery(", &format!(").append({});", joined))
            .await?;
        let elements = marshal::to_handles(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        Ok(self)
    }

    /// Inserts every matched element at the end of the target.
    pub async fn append_to(&mut self, target: &str) -> Result<&mut Self> {
        let argument = quote_argument(target);
        self.exec_js("jQuery(", &format!(").appendTo({});", argument))
            .await?;
        Ok(self)
    }

    /// Attribute value of the first matched element, `None` when the
    /// attribute is absent.
    pub async fn attr(&self, attribute_name: &str) -> Result<Option<String>> {
        self.first()?.attr(attribute_name).await
    }

    /// Sets an attribute on every matched element.
    pub async fn set_attr(&mut self, attribute_name: &str, new_value: &str) -> Result<&mut Self> {
        let argument = quote_argument(new_value);
        self.exec_js(
            "jQuery(",
            &format!(").attr(\"{}\",{});", attribute_name, argument),
        )
        .await?;
        Ok(self)
    }

    /// Computed style value of `css_property` for the first matched element.
    pub async fn css(&self, css_property: &str) -> Result<String> {
        self.first()?.css(css_property).await
    }

    /// Sets a style property on every matched element.
    pub async fn set_css(&mut self, css_property: &str, new_value: &str) -> Result<&mut Self> {
        let argument = quote_argument(new_value);
        self.exec_js(
            "jQuery(",
            &format!(").css(\"{}\",{});", css_property, argument),
        )
        .await?;
        Ok(self)
    }

    /// Whether any matched element's class attribute contains `class_name`.
    ///
    /// A substring test, not token-exact: `has_class("nav")` matches an
    /// element whose class is `navbar`. Elements without a class attribute
    /// never match.
    pub async fn has_class(&self, class_name: &str) -> Result<bool> {
        for element in &self.elements {
            if let Some(class_attr) = element.attr("class").await? {
                if class_attr.contains(class_name) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// HTML contents of the first matched element.
    pub async fn html(&self) -> Result<String> {
        self.exec_js("jQuery(", ").html()").await?.into_string()
    }

    /// Sets the HTML contents of every matched element.
    pub async fn set_html(&mut self, html_string: &str) -> Result<&mut Self> {
        let result = self
            .exec_js("jQuery(", &format!(").html('{}')", html_string))
            .await?;
        let elements = marshal::to_handles(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        Ok(self)
    }

    /// Detaches every matched element from the document.
    pub async fn remove(&mut self) -> Result<()> {
        self.exec_js("jQuery(", ").remove()").await?;
        Ok(())
    }

    /// Detaches the matched elements that also match `selector` from the
    /// document.
    pub async fn remove_filtered(&mut self, selector: &str) -> Result<()> {
        self.exec_js("jQuery(", &format!(").remove('{}')", selector))
            .await?;
        Ok(())
    }

    /// Combined text contents of the matched elements and their descendants.
    pub async fn text(&self) -> Result<String> {
        self.exec_js("jQuery(", ").text();").await?.into_string()
    }

    /// Sets the text content of every matched element.
    pub async fn set_text(&mut self, text_string: &str) -> Result<&mut Self> {
        let argument = quote_argument(text_string);
        let result = self
            .exec_js("jQuery(", &format!(").text({});", argument))
            .await?;
        let elements = marshal::to_handles(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        Ok(self)
    }

    /// Current form value of the first matched element.
    pub async fn val(&self) -> Result<String> {
        self.exec_js("jQuery(", ").val();").await?.into_string()
    }

    /// Sets the form value of every matched element.
    pub async fn set_val(&mut self, value: &str) -> Result<&mut Self> {
        let result = self
            .exec_js("jQuery(", &format!(").val('{}');", value))
            .await?;
        let elements = marshal::to_handles(&self.executor, &self.selector, result).await?;
        self.elements = elements;
        Ok(self)
    }

    /// Replaces the set selector and rewrites every element's selector to
    /// `<selector>[<position>]`, keeping per-element selectors consistent
    /// with the new composite expression.
    pub fn overwrite_selectors(&mut self, selector: String) {
        for (index, element) in self.elements.iter_mut().enumerate() {
            element.set_selector(format!("{}[{}]", selector, index));
        }
        self.selector = selector;
    }

    fn first(&self) -> Result<&ElementHandle<E>> {
        self.elements.first().ok_or(QueryError::EmptySelection)
    }

    async fn exec_js(&self, prefix: &str, suffix: &str) -> Result<ScriptValue<E::Node>> {
        let script = format!("return {}{}{}", prefix, self.selector, suffix);
        debug!("executing script: {}", script);
        self.executor.execute_script(&script).await
    }
}

impl<'a, E: ScriptExecutor> IntoIterator for &'a Selection<E> {
    type Item = &'a ElementHandle<E>;
    type IntoIter = slice::Iter<'a, ElementHandle<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<E: ScriptExecutor> fmt::Debug for Selection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("selector", &self.selector)
            .field("elements", &self.elements)
            .field("cursor", &self.cursor)
            .finish()
    }
}
