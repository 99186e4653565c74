//! Spreadsheet backend for the gym store.
//!
//! Each category lives in its own directory under a data root as one or more
//! `<label>_*.xlsx` files; the newest one is the backing file. All file access
//! runs on tokio's blocking thread pool so the async runtime is never stalled.

mod locate;
mod lock;
mod revision;
mod store;
mod workbook;

pub mod error;

pub use error::{Error, Result};
pub use locate::locate;
pub use revision::revision;
pub use store::XlsxStore;
pub use workbook::{decode, encode};

#[cfg(test)]
mod tests;
