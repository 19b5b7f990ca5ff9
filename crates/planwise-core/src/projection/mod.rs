pub mod engine;
pub mod sampler;
pub mod snapshot;
pub mod summary;

pub use engine::{project, ProjectionOutput, ProjectionRow};
pub use snapshot::PlanSnapshot;
pub use summary::SummaryMetrics;
