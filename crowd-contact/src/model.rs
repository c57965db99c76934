//! Contact force law.
//!
//! Forces come from a spring-dashpot along the contact normal and a
//! Coulomb-limited tangential spring. The normal side is
//!
//! ```text
//! F_n = max(0, k_n * depth + c_n * approach_speed)
//! ```
//!
//! clamped at zero so a fast separation never turns the contact
//! adhesive. The tangential side treats one step of relative sliding as
//! elastic shear, `F_t = k_t * v_t * dt`, then projects it onto the
//! friction cone `|F_t| <= mu * F_n`. Sliding state is not carried
//! across steps: each step reads the instantaneous velocities of a
//! freshly detected contact.

use nalgebra::Vector2;

use crowd_types::SimulationConfig;

use crate::{Contact, ContactForce, FrictionCone, StiffnessPair};

/// Evaluates contact forces from contact geometry and relative velocity.
///
/// # Example
///
/// ```
/// use crowd_contact::{contact_stiffness, ContactModel};
/// use crowd_types::Material;
/// use nalgebra::Vector2;
///
/// let model = ContactModel::new(0.5, 0.0);
/// let body = Material::pedestrian();
/// let stiffness = contact_stiffness(&body, &body)?;
/// # let contact = crowd_contact::agent_agent_contact(
/// #     crowd_types::AgentId::new(0),
/// #     &crowd_types::AgentShape::disc(0.5),
/// #     &crowd_types::Pose2::identity(),
/// #     crowd_types::AgentId::new(1),
/// #     &crowd_types::AgentShape::disc(0.5),
/// #     &crowd_types::Pose2::new(nalgebra::Point2::new(0.9, 0.0), 0.0),
/// # ).unwrap();
/// let force = model.compute_force(&contact, &Vector2::zeros(), stiffness, 1e-3);
/// assert!(force.normal.norm() > 0.0);
/// assert_eq!(force.tangential.norm(), 0.0);
/// # Ok::<(), crowd_types::MechError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactModel {
    friction: FrictionCone,
    normal_damping: f64,
}

impl ContactModel {
    /// Create a model from a friction coefficient and a normal dashpot
    /// coefficient (N s/m).
    #[must_use]
    pub fn new(friction_coefficient: f64, normal_damping: f64) -> Self {
        Self {
            friction: FrictionCone::new(friction_coefficient),
            normal_damping: normal_damping.max(0.0),
        }
    }

    /// Build the model from a simulation configuration.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.friction_coefficient, config.normal_damping)
    }

    /// The friction cone in use.
    #[must_use]
    pub fn friction(&self) -> &FrictionCone {
        &self.friction
    }

    /// Resolve the force exerted on the contact's agent.
    ///
    /// `relative_velocity` is the agent's contact-point velocity minus
    /// the partner's, and `stiffness` the pair stiffness for the two
    /// materials involved. `dt` converts the tangential sliding speed
    /// into a one-step elastic displacement.
    #[must_use]
    pub fn compute_force(
        &self,
        contact: &Contact,
        relative_velocity: &Vector2<f64>,
        stiffness: StiffnessPair,
        dt: f64,
    ) -> ContactForce {
        if contact.depth <= 0.0 {
            return ContactForce::zero(contact.position);
        }

        let (v_n, v_t) = contact.decompose_velocity(relative_velocity);

        // v_n > 0 means separating; the dashpot only resists approach
        // and the total can never pull the bodies together.
        let normal_magnitude =
            (stiffness.normal * contact.depth - self.normal_damping * v_n).max(0.0);

        let trial = stiffness.tangential * v_t * dt;
        let tangential_magnitude = self.friction.clamp(trial, normal_magnitude);

        ContactForce {
            normal: contact.normal.into_inner() * normal_magnitude,
            tangential: contact.tangent().into_inner() * -tangential_magnitude,
            position: contact.position,
        }
    }
}
