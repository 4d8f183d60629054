//! Re-exported APIs for consumers of the guidance crate.

pub use crate::cancel::CancellationToken;
pub use crate::collaborators::{
    Actuator, BodyId, ManeuverPlanner, OrbitSnapshotProvider, PlannedTransfer, StateSource,
    TargetOrbit,
};
pub use crate::controller::{BurnMode, BurnSettings, FiniteBurnController};
pub use crate::error::GuidanceError;
pub use crate::plan::BurnPlan;
pub use crate::reference::{ReferenceBurn, ReferenceTransfer};
pub use crate::report::{BurnReport, TelemetrySample};
pub use crate::session::{BurnOutcome, BurnPhase, BurnSession};
pub use crate::steering::SteeringMode;
