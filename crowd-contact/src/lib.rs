#![doc(html_root_url = "https://docs.rs/crowd-contact/0.1.0")]
//! Contact geometry, stiffness, and force laws for planar crowd dynamics.
//!
//! Everything between "two bodies exist" and "here is the force on each"
//! lives here:
//!
//! - [`contact_stiffness`], [`StiffnessTable`]: pairwise spring constants
//!   derived from material moduli, precomputed per material pair
//! - [`agent_agent_contact`], [`agent_wall_contact`]: narrow-phase
//!   overlap tests built on one segment-segment primitive
//! - [`Contact`], [`ContactForce`]: the per-step contact record and the
//!   resolved force with its application point
//! - [`ContactModel`], [`FrictionCone`]: the spring-dashpot normal law
//!   with Coulomb-limited tangential friction
//!
//! The crate is stateless by construction: contacts are recomputed every
//! step from instantaneous poses and velocities, and nothing here mutates
//! agent state. Accumulating forces and advancing time is the job of
//! `crowd-core`.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // ContactModel, ContactForce read better qualified
#![allow(clippy::must_use_candidate)] // too noisy for simple accessors
#![allow(clippy::cast_precision_loss)] // material counts fit f64 comfortably
#![allow(clippy::similar_names)] // geometric locals (pa/pb, s0/s1) are clearest short

mod contact;
mod friction;
mod geometry;
mod model;
mod stiffness;

pub use contact::{Contact, ContactForce, ContactPartner};
pub use friction::FrictionCone;
pub use geometry::{
    agent_agent_contact, agent_wall_contact, closest_point_on_segment,
    closest_points_between_segments, shape_segment,
};
pub use model::ContactModel;
pub use stiffness::{contact_stiffness, StiffnessPair, StiffnessTable};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crowd_types::{AgentId, AgentShape, Material, Pose2};
    use nalgebra::{Point2, Vector2};

    /// Detection, stiffness, and force resolution compose end to end.
    #[test]
    fn test_detect_then_resolve() {
        let body = Material::pedestrian();
        let stiffness = contact_stiffness(&body, &body).unwrap();

        let shape = AgentShape::disc(0.5);
        let contact = agent_agent_contact(
            AgentId::new(0),
            &shape,
            &Pose2::identity(),
            AgentId::new(1),
            &shape,
            &Pose2::new(Point2::new(0.95, 0.0), 0.0),
        )
        .unwrap();

        let model = ContactModel::new(0.5, 0.0);
        let force = model.compute_force(&contact, &Vector2::zeros(), stiffness, 1e-3);

        // Agent 0 is pushed away from agent 1, toward -x.
        assert!(force.normal.x < 0.0);
        assert_eq!(force.normal.y, 0.0);
    }
}
