//! Seeded, pass-based generation of town and route tile maps.
//!
//! Generation is deterministic for a given config and catalog: every pass draws from
//! its own named fork of the seed stream, and validation plus repair always run after
//! the content passes so the returned grid satisfies the enabled hard constraints
//! whenever repair can reach them.

pub mod buildings;
pub mod catalog;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod grid;
mod math;
pub mod passes;
pub mod pipeline;
pub mod repair;
pub mod rng;
pub mod seed;
pub mod tiles;
pub mod validate;

pub use catalog::Catalog;
pub use config::{ConfigOverrides, Dimensions, HardConstraintId, RandomGenerationConfig, SoftGoalId};
pub use context::GenerationContext;
pub use diagnostics::{GenerationDiagnostics, ValidationIssue};
pub use error::{MapgenError, Result};
pub use grid::{Cell, TileGrid};
pub use passes::PassId;
pub use pipeline::{RandomGenerationResult, generate_random_map, generate_random_map_with};
pub use rng::SeededRng;
pub use tiles::TileId;
