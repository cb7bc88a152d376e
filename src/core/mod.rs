pub mod config;
pub mod executor;

pub use config::Config;
pub use executor::{NodeHandle, ScriptExecutor, ScriptValue};
