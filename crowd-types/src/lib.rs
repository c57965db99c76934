#![doc(html_root_url = "https://docs.rs/crowd-types/0.1.0")]
//! Core data types for planar crowd contact dynamics.
//!
//! This crate defines the shared vocabulary of the crowd mechanics stack:
//!
//! - [`AgentId`], [`Pose2`], [`Twist2`], [`AgentState`]: identity and
//!   kinematic state of a planar rigid body
//! - [`AgentShape`], [`MassProperties`]: disc and capsule cross-sections
//!   with their lumped mass properties
//! - [`Material`], [`MaterialId`]: elastic moduli that feed pairwise
//!   contact stiffness
//! - [`Wall`], [`WallId`]: immovable segments with a surface material
//! - [`SimulationConfig`], [`IntegrationMethod`]: run parameters
//! - [`TrajectorySample`], [`TrajectorySink`], [`TrajectoryBuffer`]: the
//!   flat output stream of a run
//! - [`MechError`], [`Result`]: the error taxonomy
//!
//! # Design Philosophy
//!
//! Everything here is pure data: plain structs and enums with validation
//! but no behavior that depends on other agents. Contact resolution lives
//! in `crowd-contact` and time stepping in `crowd-core`; both build on
//! these types without this crate knowing about either.
//!
//! # Coordinate System
//!
//! The simulation plane uses right-handed coordinates: `+x` to the right,
//! `+y` up, angles in radians measured counterclockwise from `+x`. All
//! quantities are SI (meters, kilograms, seconds, pascals).
//!
//! # Example
//!
//! ```
//! use crowd_types::{AgentShape, MassProperties, Material, SimulationConfig};
//!
//! let shape = AgentShape::disc(0.5);
//! shape.validate()?;
//!
//! let props = MassProperties::of_shape(80.0, &shape)?;
//! assert!((props.inertia - 10.0).abs() < 1e-12);
//!
//! let body = Material::pedestrian();
//! assert!(body.shear_modulus > 0.0);
//!
//! let config = SimulationConfig::default().with_duration(5.0);
//! config.validate()?;
//! # Ok::<(), crowd_types::MechError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // MechError, AgentShape etc. read better qualified
#![allow(clippy::must_use_candidate)] // too noisy for simple accessors
#![allow(clippy::cast_precision_loss)] // step counts fit f64 comfortably
#![allow(clippy::cast_possible_truncation)] // ids are dense small indices
#![allow(clippy::cast_sign_loss)] // validated non-negative before casting

mod agent;
mod config;
mod error;
mod material;
mod trajectory;
mod wall;

pub use agent::{AgentId, AgentShape, AgentState, MassProperties, Pose2, Twist2};
pub use config::{IntegrationMethod, SimulationConfig};
pub use error::MechError;
pub use material::{shear_modulus, Material, MaterialId};
pub use trajectory::{TrajectoryBuffer, TrajectorySample, TrajectorySink};
pub use wall::{Wall, WallId};

/// Convenience result alias used across the crowd mechanics crates.
pub type Result<T> = std::result::Result<T, MechError>;
