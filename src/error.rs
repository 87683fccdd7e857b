//! Error types for the Vellum library.
//!
//! This module provides error handling for all Vellum operations. All errors
//! are represented by the [`VellumError`] enum, which carries enough context
//! to tell schema-construction failures, conversion failures, and
//! registration failures apart.
//!
//! # Examples
//!
//! ```
//! use vellum::error::{Result, VellumError};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(VellumError::unknown_schema("Gift"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for Vellum operations.
///
/// Schema construction surfaces [`DuplicateProperty`] and
/// [`InvalidFlagCombination`]; conversion surfaces
/// [`MissingRequiredProperty`], [`UnknownSchema`] and [`CyclicData`];
/// registration surfaces [`SchemaConflict`]. The remaining variants cover
/// ambient failures such as accessor contract violations and JSON
/// externalization.
///
/// [`DuplicateProperty`]: VellumError::DuplicateProperty
/// [`InvalidFlagCombination`]: VellumError::InvalidFlagCombination
/// [`MissingRequiredProperty`]: VellumError::MissingRequiredProperty
/// [`UnknownSchema`]: VellumError::UnknownSchema
/// [`CyclicData`]: VellumError::CyclicData
/// [`SchemaConflict`]: VellumError::SchemaConflict
#[derive(Error, Debug)]
pub enum VellumError {
    /// Two property descriptors in one schema share a name
    #[error("Duplicate property: {0}")]
    DuplicateProperty(String),

    /// A property descriptor combines flags that are illegal for its kind
    #[error("Invalid flag combination: {0}")]
    InvalidFlagCombination(String),

    /// A REQUIRED property had no value during conversion
    #[error("Missing required property: {0}")]
    MissingRequiredProperty(String),

    /// A schema name had no registered codec when one was needed
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// Nested conversion exceeded the configured depth bound
    #[error("Cyclic data: {0}")]
    CyclicData(String),

    /// A schema name was re-registered with a conflicting schema
    #[error("Schema conflict: {0}")]
    SchemaConflict(String),

    /// Schema-shape errors (empty names, missing bindings, etc.)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Field accessor contract violations (shape or kind mismatch)
    #[error("Field error: {0}")]
    Field(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with VellumError.
pub type Result<T> = std::result::Result<T, VellumError>;

impl VellumError {
    /// Create a new duplicate-property error.
    pub fn duplicate_property<S: Into<String>>(name: S) -> Self {
        VellumError::DuplicateProperty(name.into())
    }

    /// Create a new invalid-flag-combination error.
    pub fn invalid_flags<S: Into<String>>(msg: S) -> Self {
        VellumError::InvalidFlagCombination(msg.into())
    }

    /// Create a new missing-required-property error.
    pub fn missing_required<S: Into<String>>(name: S) -> Self {
        VellumError::MissingRequiredProperty(name.into())
    }

    /// Create a new unknown-schema error.
    pub fn unknown_schema<S: Into<String>>(name: S) -> Self {
        VellumError::UnknownSchema(name.into())
    }

    /// Create a new cyclic-data error.
    pub fn cyclic_data<S: Into<String>>(msg: S) -> Self {
        VellumError::CyclicData(msg.into())
    }

    /// Create a new schema-conflict error.
    pub fn schema_conflict<S: Into<String>>(msg: S) -> Self {
        VellumError::SchemaConflict(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        VellumError::Schema(msg.into())
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        VellumError::Field(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        VellumError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        VellumError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
