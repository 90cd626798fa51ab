//! Inbound adapters.
//!
//! Renders service responses into the launcher's result-list protocol.

pub mod script_filter;

pub use script_filter::{ScriptFilterItem, ScriptFilterList, ScriptFilterRenderer, format_amount};
