//! Snippetbox Core - snippet storage and form validation.
//!
//! This crate holds everything the web layer needs that is not HTTP-specific:
//!
//! - **Snippets**: [`SnippetModel`], the SQLite-backed store that owns the
//!   snippet lifecycle (expiry computed on insert, expired rows hidden on read)
//! - **Validator**: field-scoped error accumulation for submitted forms
//!
//! Storage errors are translated into the closed [`Error`] set at this
//! boundary, so callers never match on `rusqlite` error identity.

pub mod error;
pub mod schema;
pub mod snippets;
pub mod validator;

pub use error::{Error, Result};
pub use snippets::{LATEST_LIMIT, Snippet, SnippetModel};
pub use validator::Validator;
