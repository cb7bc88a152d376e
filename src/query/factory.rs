use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::{Config, ScriptExecutor};
use crate::errors::{QueryError, Result};
use crate::query::quoting::quote_argument;
use crate::query::selection::Selection;

/// Entry point for jQuery chains.
///
/// Runs the initial query against the current document and hands back a
/// [`Selection`] to chain on. Optionally makes sure `jQuery` itself is
/// available in the page first, injecting it from a configured URL when the
/// page ships without it.
pub struct JQueryFactory<E: ScriptExecutor> {
    executor: Arc<E>,
    config: Config,
}

impl<E: ScriptExecutor> JQueryFactory<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self::with_config(executor, Config::default())
    }

    pub fn with_config(executor: Arc<E>, config: Config) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Matches `selector` against the current document and returns the
    /// resulting selection.
    pub async fn query(&self, selector: &str) -> Result<Selection<E>> {
        if self.config.auto_inject_jquery {
            self.ensure_jquery().await?;
        }
        let argument = quote_argument(selector);
        let script = format!("return jQuery({});", argument);
        debug!("executing script: {}", script);
        let result = self.executor.execute_script(&script).await?;
        Selection::from_script_value(
            self.executor.clone(),
            format!("jQuery({})", argument),
            result,
        )
        .await
    }

    /// Makes sure `jQuery` is available in the page, injecting a script tag
    /// from the configured source URL when it is not.
    ///
    /// Polls until the injected library is loaded or the configured timeout
    /// elapses.
    pub async fn ensure_jquery(&self) -> Result<()> {
        if self.jquery_loaded().await? {
            return Ok(());
        }

        debug!(
            "jQuery missing, injecting from {}",
            self.config.jquery_source_url
        );
        let script = format!(
            "return (function() {{ var script = document.createElement('script'); script.src = '{}'; document.getElementsByTagName('head')[0].appendChild(script); return true; }})();",
            self.config.jquery_source_url
        );
        self.executor.execute_script(&script).await?;

        let started = Instant::now();
        let timeout = Duration::from_millis(self.config.injection_timeout_ms);
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        while started.elapsed() < timeout {
            if self.jquery_loaded().await? {
                return Ok(());
            }
            tokio::time::sleep(poll_interval).await;
        }

        Err(QueryError::InjectionFailed(format!(
            "jQuery did not become available within {}ms",
            self.config.injection_timeout_ms
        )))
    }

    async fn jquery_loaded(&self) -> Result<bool> {
        let result = self
            .executor
            .execute_script("return typeof window.jQuery;")
            .await?
            .into_string()?;
        Ok(result != "undefined")
    }
}
