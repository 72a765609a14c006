//! Wheelhouse - Car Marketplace Backend
//!
//! Serves a vehicle catalog over a small JSON API and interprets free-text
//! Russian queries ("семейный кроссовер до 2 млн") into structured search
//! filters. The catalog, user accounts, sessions, favorites, reviews and
//! posts live in a single SQLite file.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod search;
pub mod server;
pub mod storage;

pub use error::{Result, WheelhouseError};
