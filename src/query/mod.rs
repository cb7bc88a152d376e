pub mod element;
pub mod factory;
mod marshal;
pub mod quoting;
pub mod selection;

pub use element::ElementHandle;
pub use factory::JQueryFactory;
pub use quoting::{quote_argument, requires_apostrophe};
pub use selection::Selection;
