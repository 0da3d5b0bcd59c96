//! BarcodeDB Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging setup for the BarcodeDB workspace.
//!
//! - **Error Handling**: [`BarcodeError`] and the [`Result`] alias used by every
//!   pipeline component
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`], called once
//!   by binaries at startup
//!
//! # Example
//!
//! ```no_run
//! use barcodedb_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::builder().level(LogLevel::Debug).build();
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{BarcodeError, Result};
