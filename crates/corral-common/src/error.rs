//! Common error types for the Corral ecosystem.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`CorralError`].
pub type CorralResult<T> = Result<T, CorralError>;

/// Common errors across the Corral ecosystem.
#[derive(Error, Diagnostic, Debug)]
pub enum CorralError {
    /// No network matched the given identifier.
    #[error("Network not found: {id}")]
    #[diagnostic(code(corral::network::not_found))]
    NetworkNotFound {
        /// The name, ID, or ID prefix that matched nothing.
        id: String,
    },

    /// A network with the requested name already exists.
    #[error("Network with name {name} already exists")]
    #[diagnostic(
        code(corral::network::name_conflict),
        help("Network names are not unique; retry without CheckDuplicate to create anyway")
    )]
    NetworkNameConflict {
        /// The conflicting network name.
        name: String,
    },

    /// A filter specification could not be parsed.
    #[error("Invalid filter specification: {message}")]
    #[diagnostic(
        code(corral::filters::invalid),
        help("Filters are a JSON object mapping field names to lists of values")
    )]
    InvalidFilter {
        /// Parser diagnostic for the malformed specification.
        message: String,
    },

    /// A container identifier could not be resolved.
    #[error("Invalid container {id}: {source}")]
    #[diagnostic(code(corral::container::invalid))]
    InvalidContainer {
        /// The container identifier that failed to resolve.
        id: String,
        /// The underlying resolution failure.
        #[source]
        source: Box<CorralError>,
    },

    /// Invalid object ID format.
    #[error("Invalid object ID: {id}")]
    #[diagnostic(
        code(corral::id::invalid),
        help("Object IDs must be alphanumeric with hyphens and underscores, 1-64 characters")
    )]
    InvalidId {
        /// The invalid object ID.
        id: String,
    },

    /// Failure surfaced by an external network or container directory.
    ///
    /// Carried through unmodified so transport-layer error mapping can
    /// inspect the engine's own message.
    #[error("{message}")]
    #[diagnostic(code(corral::directory))]
    Directory {
        /// The engine's error message.
        message: String,
    },
}
