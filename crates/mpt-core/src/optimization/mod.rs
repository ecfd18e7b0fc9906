pub mod api;
pub mod assets;
pub mod config;
pub mod engine;
pub mod ensemble;
pub mod matrix;
pub mod result;
pub mod validation;

pub use assets::{AssetInput, CorrelationInput};
pub use config::EngineConfig;
pub use engine::MptEngine;
pub use result::{AssetAllocation, FrontierPoint, OptimizationOutcome, OptimizationResult};
