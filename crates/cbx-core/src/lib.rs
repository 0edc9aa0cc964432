//! Core logic for `cbx`, the ContentBot key extractor.
//!
//! Harvests credentials from the IKAR and telegram_parser projects and
//! provisions ContentBot with a ready `.env`, the copied Telegram session and a
//! small helper for reading that session back.

pub mod config;
pub mod dotenv;
pub mod errors;
pub mod extractor;
pub mod logging;
pub mod owner;
pub mod report;
pub mod secrets;
pub mod session;
pub mod utils;
pub mod writer;

pub use errors::{Error, Result};
pub use report::{render_summary, run, RunReport};
