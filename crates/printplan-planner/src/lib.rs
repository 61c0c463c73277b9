//! # printplan Planner
//!
//! The print operation tree and the passes rewriting it: feature and move
//! sequence scheduling, travel insertion and the transformer pipeline that
//! chains them. Finished trees are emitted through a [`PlanExporter`].

pub mod error;
pub mod export;
pub mod operation;
pub mod schedule;
pub mod transform;
pub mod travel;

pub use error::{
    OperationError, OperationResult, ScheduleError, ScheduleResult, TransformError, TransformResult,
};
pub use export::{ExportedInstruction, PlanExporter, RecordingExporter};

pub use operation::{
    ExtrusionMove, FeatureExtrusionInfo, OperationKind, OperationPtr, OperationSequence,
    PrintOperation, SearchOrder, SequenceKind, TravelMove,
};

pub use schedule::{
    BestElementFinder, ChangeSequenceAction, ClosestStartPoint, ExtruderPlanScheduler,
    FeatureExtrusionScheduler, StartCandidatePoint, OPTIMIZE_SEQUENCES_OPTION,
};

pub use transform::{
    InsertBetween, PrintOperationTransformer, TransformerConfig, TransformerHandle,
    TransformerPipeline, TransformerRegistry,
};

pub use travel::{DirectTravelMoveGenerator, SpeedDerivatives, TravelMoveGenerator, TravelMovesInserter};
