//! Market discovery module
//!
//! Resolves which quarterly futures contract the bot monitors and trades.

mod resolver;

pub use resolver::{resolve_symbol, select_current_quarterly, ResolveError};
