use std::path::PathBuf;

use thiserror::Error;

use crate::site::Facility;

/// Syntax errors in the Definition Store text format.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("line {line}: '{{' without a node name")]
    UnexpectedOpenBrace { line: usize },

    #[error("line {line}: '}}' without an open node")]
    UnexpectedCloseBrace { line: usize },

    #[error("line {line}: '{name}' is neither a value nor followed by a block")]
    DanglingName { name: String, line: usize },

    #[error("node '{name}' is never closed")]
    Unclosed { name: String },
}

/// Errors building a `SiteDefinition` or `SiteGroup` from a node.
///
/// Malformed numbers are not errors: they keep the field's prior value.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("unknown facility '{0}' (expected VAB, SPH or None)")]
    UnknownFacility(String),

    #[error("site definition has no name")]
    MissingName,
}

/// Errors reading or writing site files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed site file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: NodeError,
    },
}

/// Errors from the live site registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("site '{0}' is already registered")]
    Duplicate(String),
}

/// Errors from the external site builder.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("failed to build site '{site}': {reason}")]
    Failed { site: String, reason: String },

    #[error("builder produced no site for '{0}'")]
    NoHandle(String),
}

/// Errors that stop a marker conversion (an abort is not one of them).
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("converting markers into {0} sites is disabled")]
    FacilityDisabled(Facility),

    #[error("marker has no site title")]
    EmptyTitle,

    #[error("site title '{0}' cannot be stored ('}}' and '//' are reserved)")]
    UnstorableTitle(String),

    #[error("failed to persist site: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors starting a creation pass.
#[derive(Debug, Error)]
pub enum CreationError {
    #[error("a creation pass is already running")]
    PassInProgress,
}
