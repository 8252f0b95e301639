//! Form runtime
//!
//! Binds derived field metadata, caller configuration and default values
//! into a live editable form: a small state machine that owns the value map,
//! per-field validation errors and, for union schemas, the reconciliation
//! between the selected discriminator variant and the rendered field set.

pub mod runtime;
pub mod state;
pub mod validate;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use runtime::{FormRuntime, ResolvedField};
pub use state::{FieldError, FormPhase, FormState};

use state::FormPhase as Phase;

/// Error returned by caller-supplied mutation callbacks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("mutation rejected: {0}")]
    Rejected(String),
    #[error("entity not found: {0}")]
    NotFound(String),
}

/// Errors from driving a form outside its contract.
///
/// These are programmer errors (wrong phase, unknown field) except for
/// [`FormError::Mutation`], which carries a rejected submit callback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("form is in the {0:?} phase; this operation requires editing")]
    NotEditing(Phase),
    #[error("form is already mounted")]
    AlreadyMounted,
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is required and cannot be cleared")]
    ClearNotAllowed(String),
    #[error("'{0}' is not a declared variant of this form")]
    UnknownVariant(String),
    #[error("this form is not backed by a discriminated union")]
    NotAUnion,
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Caller-supplied submit callback.
///
/// Receives the validated, fully-merged field values (hidden fields with
/// defaults included) verbatim.
#[async_trait(?Send)]
pub trait SubmitHandler {
    async fn submit(&self, values: Map<String, Value>) -> Result<(), MutationError>;
}

/// Outcome of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed and the handler accepted the values
    Submitted,
    /// Validation failed; per-field errors are recorded on the form
    Invalid,
}
