//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that can be composed into a complete terrain generation pipeline.

mod stage;

pub use stage::{
    BiomeStage, GenerationStage, HeightmapStage, MeshStage, Pipeline, PipelineError, SlopeStage,
    StageId,
};
