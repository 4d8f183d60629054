use thiserror::Error;

use crate::collaborators::BodyId;
use crate::steering::SteeringMode;

/// Errors surfaced while building or stepping a finite-burn controller.
#[derive(Debug, Error, PartialEq)]
pub enum GuidanceError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("invalid burn setting `{field}`: {reason}")]
    InvalidSettings { field: &'static str, reason: String },
    #[error("controller must be started before it is ticked")]
    NotStarted,
    #[error("no state available for body {0}")]
    UnknownBody(BodyId),
    #[error("{mode:?} steering is undefined for the current geometry")]
    DegenerateSteering { mode: SteeringMode },
}
