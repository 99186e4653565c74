//! Core types and logic for the gym administration backend.
//!
//! Everything here works on an in-memory [`table::Workbook`]: explicit
//! per-category schemas, record parsing, summaries, field edits and record
//! creation. Nothing here depends on HTTP or a file format;
//! backends implement [`store::GymStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod amount;
pub mod category;
pub mod cell;
pub mod create;
pub mod dashboard;
pub mod error;
pub mod parse;
pub mod record;
pub mod schema;
pub mod store;
pub mod summary;
pub mod table;
pub mod update;

pub use category::Category;
pub use error::{Classify, Error, ErrorKind, Result};
