#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Store adapter for the traffic-stop log.
//!
//! Uses `switchy_database` over a raw `PostgreSQL` connection. Every call
//! opens its own connection and drops it when done; there is no pooling and
//! no explicit transaction, so statements run in auto-commit mode.
//!
//! Failures never escape [`db::execute`]: they come back as an empty
//! [`TabularResult`](securecheck_database_models::TabularResult) with a
//! diagnostic attached.

pub mod config;
pub mod db;
pub mod stops;

use thiserror::Error;

/// Errors that can occur while talking to the store or reading its rows.
#[derive(Debug, Error)]
pub enum DbError {
    /// The store could not be reached or rejected the credentials.
    #[error("Database connection error: {message}")]
    Connection {
        /// Driver-reported reason.
        message: String,
    },

    /// The query was malformed or failed while executing.
    #[error("Query execution error: {0}")]
    Query(#[from] switchy_database::DatabaseError),

    /// A row could not be converted into a typed record.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// The connection configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
