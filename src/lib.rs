//! Transformer Lookup Library
//!
//! Client for the transformer search site: a static JSON index maps codes and
//! registration numbers to transformer identifiers, and one static JSON
//! detail record per transformer lists its attributes and clients.
//!
//! This library provides tools for:
//! - Loading the search index once per session, with an explicit reload path
//! - Resolving user input (trimmed, uppercased) to a transformer identifier
//! - Fetching detail records over HTTP or from the generated directory tree
//! - Rendering records with placeholders, a configurable status badge and
//!   a client table, to the terminal or to escaped HTML

pub mod cli;
pub mod config;
pub mod constants;
pub mod detail;
pub mod error;
pub mod index;
pub mod models;
pub mod page;
pub mod render;
pub mod session;
pub mod source;

// Re-export commonly used types
pub use config::LookupConfig;
pub use error::{LookupError, Result};
pub use models::{ClientEntry, DetailRecord, SearchIndex};
pub use page::Page;
pub use session::{SearchOutcome, Session};
