//! Fluent jQuery-style DOM queries and mutations over a browser automation
//! driver.
//!
//! The driver stays behind the [`ScriptExecutor`] seam: this crate composes
//! jQuery expressions as strings, hands them to the executor, and marshals
//! the returned node references into [`ElementHandle`]s owned by a
//! [`Selection`].

pub mod core;
pub mod errors;
pub mod query;
pub mod testing;

pub use crate::core::{Config, NodeHandle, ScriptExecutor, ScriptValue};
pub use errors::{QueryError, Result};
pub use query::{ElementHandle, JQueryFactory, Selection};
