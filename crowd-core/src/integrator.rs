//! Fixed-step integrators for planar rigid body states.
//!
//! Both schemes are first order; they differ only in whether the pose
//! advances with the old or the updated velocity. Semi-implicit Euler is
//! the default because it stays bounded under the stiff contact springs
//! this crate exists to resolve.

use nalgebra::Vector2;

use crowd_types::{AgentState, IntegrationMethod, Pose2, Twist2};

/// Advances one agent state by one timestep under constant acceleration.
pub trait Integrator {
    /// Integrate `state` forward by `dt` seconds.
    fn integrate(
        &self,
        state: &AgentState,
        linear_accel: Vector2<f64>,
        angular_accel: f64,
        dt: f64,
    ) -> AgentState;
}

/// Symplectic Euler: update velocity first, then advance the pose with
/// the new velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn integrate(
        &self,
        state: &AgentState,
        linear_accel: Vector2<f64>,
        angular_accel: f64,
        dt: f64,
    ) -> AgentState {
        let linear = state.twist.linear + linear_accel * dt;
        let angular = state.twist.angular + angular_accel * dt;
        let position = state.pose.position + linear * dt;
        let theta = state.pose.theta + angular * dt;
        AgentState::new(Pose2::new(position, theta), Twist2::new(linear, angular))
    }
}

/// Forward Euler: advance the pose with the old velocity, then update
/// the velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn integrate(
        &self,
        state: &AgentState,
        linear_accel: Vector2<f64>,
        angular_accel: f64,
        dt: f64,
    ) -> AgentState {
        let position = state.pose.position + state.twist.linear * dt;
        let theta = state.pose.theta + state.twist.angular * dt;
        let linear = state.twist.linear + linear_accel * dt;
        let angular = state.twist.angular + angular_accel * dt;
        AgentState::new(Pose2::new(position, theta), Twist2::new(linear, angular))
    }
}

/// Integrate with the scheme selected in the configuration.
#[must_use]
pub fn integrate_with_method(
    method: IntegrationMethod,
    state: &AgentState,
    linear_accel: Vector2<f64>,
    angular_accel: f64,
    dt: f64,
) -> AgentState {
    match method {
        IntegrationMethod::ExplicitEuler => {
            ExplicitEuler.integrate(state, linear_accel, angular_accel, dt)
        }
        IntegrationMethod::SemiImplicitEuler => {
            SemiImplicitEuler.integrate(state, linear_accel, angular_accel, dt)
        }
    }
}

/// Exponential velocity decay: `v *= exp(-damping * dt)` per component
/// family. Zero damping returns the twist unchanged.
#[must_use]
pub fn apply_damping(
    twist: &Twist2,
    linear_damping: f64,
    angular_damping: f64,
    dt: f64,
) -> Twist2 {
    let linear_factor = (-linear_damping * dt).exp();
    let angular_factor = (-angular_damping * dt).exp();
    Twist2::new(twist.linear * linear_factor, twist.angular * angular_factor)
}
