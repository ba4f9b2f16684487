//! SQLite persistence for the hy2 panel core.
//!
//! Provides:
//!
//! - [`Db`] - pool construction and schema bootstrap
//! - [`Filter`] - typed predicate builder; values always travel as bound
//!   parameters
//! - [`SqlAccountStore`] / [`SqlSettingsStore`] - the production
//!   implementations of the `hy2-core` collaborator traits

mod accounts;
mod db;
mod filter;
mod schema;
mod settings;

#[cfg(test)]
mod tests;

pub use accounts::SqlAccountStore;
pub use db::Db;
pub use filter::{Filter, Value};
pub use settings::SqlSettingsStore;
