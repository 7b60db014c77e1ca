//! # Error Handling
//!
//! This module defines the centralized error type for `devfile-flatten`. It
//! uses the `thiserror` library to create a single `Error` enum that covers
//! every failure the flattening engine can surface.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to one failure class
//!   and carries the parent location involved, so a caller can report which
//!   link of the chain broke.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! All flattening errors are terminal for the current call. Nothing is retried
//! internally; the caller decides whether to try again (for example by
//! requeueing a reconciliation).

use thiserror::Error;

/// Main error type for devfile-flatten operations
#[derive(Error, Debug)]
pub enum Error {
    /// A remote parent could not be retrieved, either because of a transport
    /// failure or because the server answered with a non-success status.
    #[error("failed to fetch parent devfile from URL '{uri}': {message}")]
    Fetch { uri: String, message: String },

    /// A document was rejected by strict decoding: unknown keys, wrong types,
    /// or a union with zero or several variants populated.
    #[error("invalid devfile template from {origin}: {message}")]
    Schema { origin: String, message: String },

    /// The referenced `DevWorkspaceTemplate` does not exist.
    #[error("DevWorkspaceTemplate '{name}' not found in namespace '{namespace}'")]
    NotFound { name: String, namespace: String },

    /// The cluster API failed for a reason other than the resource being absent.
    #[error("failed to read DevWorkspaceTemplate '{name}' in namespace '{namespace}': {message}")]
    ClusterAccess {
        name: String,
        namespace: String,
        message: String,
    },

    /// The same parent location was reached twice while walking the chain.
    #[error("cyclic dependency in parents: '{location}' was already visited")]
    Cycle { location: String },

    /// No usable cluster connection settings were found.
    #[error("cluster configuration error: {message}")]
    ClusterConfig { message: String },

    /// The routing class has no solver. Event predicates treat this as the
    /// signal to ignore the object.
    #[error("routing class '{routing_class}' is not supported")]
    RoutingNotSupported { routing_class: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `Schema` error from any displayable decode failure.
    pub fn schema(origin: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::Schema {
            origin: origin.into(),
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
