//! Push relaxation scenario.
//!
//! One agent is driven into a resting neighbor by an external force,
//! then released. The shove is purely head-on, so nothing may ever move
//! or rotate off the push axis, and with body damping active the whole
//! system must be at rest again well before the run ends.
//!
//! Coverage:
//! - external force drive through the pending-force queue
//! - momentum handover through an agent-agent contact
//! - settling into a stationary final phase under velocity damping

mod common;

use common::{
    assert_no_teleport, assert_uniform_time_grid, max_abs, samples_for, spread, tail_from,
    STATE_TOL,
};
use crowd_core::{
    AgentId, AgentShape, AgentSpec, Material, Simulation, SimulationConfig, TrajectoryBuffer,
};
use nalgebra::{Point2, Vector2};

const DT: f64 = 1e-3;
const DURATION: f64 = 6.0;
const PUSH_STEPS: u64 = 500;
const PUSH_FORCE: f64 = 160.0;

/// Two discs on the x axis, 0.05 m apart. Agent 0 is pushed right with a
/// constant 160 N for half a second, collides with agent 1, and both
/// then relax under body-level velocity damping.
fn run_scenario() -> (TrajectoryBuffer, AgentId, AgentId) {
    let config = SimulationConfig::default()
        .with_timestep(DT)
        .with_duration(DURATION)
        .with_normal_damping(500.0)
        .with_linear_damping(2.0)
        .with_angular_damping(2.0);
    let mut sim = Simulation::new(config).expect("config must validate");

    let body = sim
        .add_material(Material::new(1e4, 0.3).expect("material must validate"))
        .expect("material registration");
    let shape = AgentShape::disc(0.5);
    let pusher = sim
        .add_agent(AgentSpec::new(shape, 80.0, body))
        .expect("pusher registration");
    let target = sim
        .add_agent(AgentSpec::new(shape, 80.0, body).with_position(Point2::new(1.05, 0.0)))
        .expect("target registration");

    let mut trajectory = TrajectoryBuffer::new();
    sim.world().emit_samples(&mut trajectory);
    for step in 0..(DURATION / DT).round() as u64 {
        if step < PUSH_STEPS {
            sim.apply_force(pusher, Vector2::new(PUSH_FORCE, 0.0), 0.0)
                .expect("pusher exists");
        }
        sim.step().expect("step must not diverge");
        sim.world().emit_samples(&mut trajectory);
    }
    (trajectory, pusher, target)
}

/// The sample stream is well-formed for both agents.
#[test]
fn test_stream_is_uniform_and_continuous() {
    let (trajectory, pusher, target) = run_scenario();
    for agent in [pusher, target] {
        let samples = samples_for(&trajectory, agent);
        assert_eq!(samples.len() as u64, (DURATION / DT).round() as u64 + 1);
        assert_uniform_time_grid(&samples, DT);
        assert_no_teleport(&samples);
    }
}

/// A head-on push has no business creating lateral motion or rotation.
#[test]
fn test_motion_stays_on_the_push_axis() {
    let (trajectory, pusher, target) = run_scenario();
    for agent in [pusher, target] {
        let samples = samples_for(&trajectory, agent);
        assert!(
            max_abs(&samples, |s| s.y) <= STATE_TOL,
            "{agent} left the push axis by {}",
            max_abs(&samples, |s| s.y)
        );
        assert!(max_abs(&samples, |s| s.vy) <= STATE_TOL);
        assert!(max_abs(&samples, |s| s.theta) <= STATE_TOL);
        assert!(max_abs(&samples, |s| s.omega) <= STATE_TOL);
    }
}

/// The shove actually lands: the target ends up displaced along +x.
#[test]
fn test_target_is_displaced() {
    let (trajectory, _, target) = run_scenario();
    let samples = samples_for(&trajectory, target);
    let last = samples.last().expect("samples");

    assert!(
        last.x > 1.1,
        "target barely moved: final x = {}",
        last.x
    );
    // It was shoved, not teleported: it moved through intermediate speed.
    assert!(max_abs(&samples, |s| s.vx) > 0.05);
}

/// By the last 5% of the run both agents are at rest again: velocities
/// inside the tolerance band and poses frozen.
#[test]
fn test_final_phase_is_stationary() {
    let (trajectory, pusher, target) = run_scenario();
    for agent in [pusher, target] {
        let samples = samples_for(&trajectory, agent);
        let tail = tail_from(&samples, 0.95 * DURATION);
        assert!(!tail.is_empty());

        assert!(
            max_abs(&tail, |s| s.vx) <= STATE_TOL,
            "{agent} still moving at {} m/s",
            max_abs(&tail, |s| s.vx)
        );
        assert!(max_abs(&tail, |s| s.vy) <= STATE_TOL);
        assert!(
            spread(&tail, |s| s.x) <= STATE_TOL,
            "{agent} still drifting by {} m",
            spread(&tail, |s| s.x)
        );
        assert!(spread(&tail, |s| s.y) <= STATE_TOL);
        assert!(spread(&tail, |s| s.theta) <= STATE_TOL);
    }
}
