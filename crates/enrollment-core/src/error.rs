use thiserror::Error;

use crate::validate::FieldError;
use crate::wizard::Step;

/// Field path grammar violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,

    #[error("empty segment at byte {0}")]
    EmptySegment(usize),

    #[error("unexpected character {found:?} at byte {at}")]
    UnexpectedChar { found: char, at: usize },

    #[error("unclosed index bracket starting at byte {0}")]
    UnclosedBracket(usize),

    #[error("index out of range at byte {0}")]
    IndexOverflow(usize),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid field path: {0}")]
    Path(#[from] PathError),

    #[error("update does not fit the form at `{path}`: {source}")]
    Shape {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("form JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected wizard transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("{step} has {} validation error(s)", .errors.len())]
    Invalid { step: Step, errors: Vec<FieldError> },

    #[error("form has {} validation error(s)", .0.len())]
    FormInvalid(Vec<FieldError>),

    #[error("already on the first step")]
    AtFirstStep,

    #[error("submission is only possible from {}", Step::LAST)]
    NotOnFinalStep,

    #[error("a submission is already in flight")]
    Busy,
}
