#![doc(html_root_url = "https://docs.rs/crowd-core/0.1.0")]
//! World state and fixed-step time integration for planar crowd
//! contact dynamics.
//!
//! # Architecture
//!
//! ```text
//!   SimulationConfig
//!         |
//!         v
//!   +-----------+   clear / drain / solve   +--------------------+
//!   |  Stepper  | -------------------------> |       World        |
//!   |           | <------ accumulators ----- | agents walls table |
//!   +-----------+                            +--------------------+
//!         |                                            |
//!         | integrate + damp + guard                   | emit_samples
//!         v                                            v
//!    next world state                           TrajectorySink
//! ```
//!
//! `crowd-types` supplies the vocabulary, `crowd-contact` the geometry
//! and force laws; this crate owns mutable state and the stepping loop.
//! Within one step every contact force is computed from the same
//! pre-step snapshot, then all agents integrate, so resolution order
//! never changes the physics.
//!
//! # Quick Start
//!
//! ```
//! use crowd_core::{AgentSpec, Simulation};
//! use crowd_types::{AgentShape, Material, SimulationConfig, TrajectoryBuffer};
//! use nalgebra::{Point2, Vector2};
//!
//! let config = SimulationConfig::default().with_duration(0.1);
//! let mut sim = Simulation::new(config)?;
//!
//! let body = sim.add_material(Material::pedestrian())?;
//! sim.add_agent(
//!     AgentSpec::new(AgentShape::disc(0.5), 80.0, body)
//!         .with_velocity(Vector2::new(0.5, 0.0)),
//! )?;
//! sim.add_agent(
//!     AgentSpec::new(AgentShape::disc(0.5), 80.0, body)
//!         .with_position(Point2::new(2.0, 0.0)),
//! )?;
//!
//! let mut trajectory = TrajectoryBuffer::new();
//! let summary = sim.run(&mut trajectory)?;
//!
//! assert_eq!(summary.steps, 100);
//! assert_eq!(trajectory.len(), 2 * 101);
//! # Ok::<(), crowd_types::MechError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Stepper, RunSummary read better qualified
#![allow(clippy::must_use_candidate)] // too noisy for simple accessors
#![allow(clippy::cast_precision_loss)] // step counts fit f64 comfortably

pub mod integrator;
pub mod stepper;
pub mod world;

pub use integrator::{
    apply_damping, integrate_with_method, ExplicitEuler, Integrator, SemiImplicitEuler,
};
pub use stepper::{RunSummary, Simulation, Stepper};
pub use world::{Agent, AgentSpec, World};

// Convenience re-exports so scenario code rarely needs the leaf crates.
pub use crowd_contact::{Contact, ContactForce, ContactModel, ContactPartner};
pub use crowd_types::{
    AgentId, AgentShape, AgentState, IntegrationMethod, MassProperties, Material, MaterialId,
    MechError, Pose2, Result, SimulationConfig, TrajectoryBuffer, TrajectorySample,
    TrajectorySink, Twist2, Wall, WallId,
};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    /// A moving agent hands its momentum to a resting one of equal mass.
    #[test]
    fn test_end_to_end_collision_transfers_momentum() {
        let config = SimulationConfig::default()
            .with_duration(2.0)
            .with_normal_damping(0.0);
        let mut sim = Simulation::new(config).unwrap();
        let soft = sim.add_material(Material::new(1e4, 0.3).unwrap()).unwrap();

        let shape = AgentShape::disc(0.5);
        let mover = sim
            .add_agent(
                AgentSpec::new(shape, 80.0, soft).with_velocity(Vector2::new(0.5, 0.0)),
            )
            .unwrap();
        let target = sim
            .add_agent(AgentSpec::new(shape, 80.0, soft).with_position(Point2::new(1.05, 0.0)))
            .unwrap();

        let mut trajectory = TrajectoryBuffer::new();
        sim.run(&mut trajectory).unwrap();

        let mover_vx = sim.world().agent(mover).unwrap().state().twist.linear.x;
        let target_vx = sim.world().agent(target).unwrap().state().twist.linear.x;
        assert!(
            target_vx > 0.4,
            "target should carry most of the momentum, got vx = {target_vx}"
        );
        assert!(
            mover_vx < 0.1,
            "mover should have shed its momentum, got vx = {mover_vx}"
        );
        // Symmetric head-on geometry never produces lateral motion.
        assert_eq!(sim.world().agent(mover).unwrap().state().twist.linear.y, 0.0);
    }

    /// A wall turns an approaching agent around.
    #[test]
    fn test_end_to_end_wall_bounce() {
        let config = SimulationConfig::default()
            .with_duration(3.0)
            .with_normal_damping(0.0);
        let mut sim = Simulation::new(config).unwrap();
        let soft = sim.add_material(Material::new(1e4, 0.3).unwrap()).unwrap();

        let agent = sim
            .add_agent(
                AgentSpec::new(AgentShape::disc(0.5), 80.0, soft)
                    .with_velocity(Vector2::new(1.0, 0.0)),
            )
            .unwrap();
        sim.add_wall(Wall::new(Point2::new(2.0, -2.0), Point2::new(2.0, 2.0), soft))
            .unwrap();

        let mut trajectory = TrajectoryBuffer::new();
        sim.run(&mut trajectory).unwrap();

        let state = sim.world().agent(agent).unwrap().state();
        assert!(
            state.twist.linear.x < 0.0,
            "agent should rebound off the wall, got vx = {}",
            state.twist.linear.x
        );
        assert!(
            state.pose.position.x < 1.5,
            "agent should end clear of the wall, got x = {}",
            state.pose.position.x
        );
    }
}
