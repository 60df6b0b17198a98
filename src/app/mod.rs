// Application layer - Use case interactors

pub mod container;
pub mod gate;
pub mod inspect_interactor;
pub mod pipeline;

// Re-export interactors
pub use gate::AccessGate;
pub use inspect_interactor::InspectInteractor;
pub use pipeline::{ClipPipeline, JobPlan, PipelineSettings, PlannedPart};
