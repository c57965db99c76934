//! Contact records and resolved contact forces.
//!
//! A [`Contact`] is ephemeral: it captures the geometry of one overlap at
//! one instant and is rebuilt from scratch every step. Forces derived
//! from it ([`ContactForce`]) carry their application point so the torque
//! about any center falls out of a single cross product.

use nalgebra::{Point2, Unit, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crowd_types::{AgentId, WallId};

/// The other side of a contact, as seen from the agent that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactPartner {
    /// Contact against another agent.
    Agent(AgentId),
    /// Contact against a static wall segment.
    Wall(WallId),
}

impl ContactPartner {
    /// Whether the partner is a wall (immovable, infinite effective mass).
    #[must_use]
    pub fn is_wall(&self) -> bool {
        matches!(self, Self::Wall(_))
    }
}

impl std::fmt::Display for ContactPartner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent(id) => write!(f, "{id}"),
            Self::Wall(id) => write!(f, "{id}"),
        }
    }
}

/// Geometry of one overlap between an agent and a partner.
///
/// The normal points from the partner toward the agent, so a positive
/// normal force pushes the agent out of the overlap. `depth` is the
/// overlap measured along the normal and is strictly positive for every
/// contact the detector emits.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contact {
    /// Agent on the receiving end of the recorded normal.
    pub agent: AgentId,
    /// The other body.
    pub partner: ContactPartner,
    /// Contact point: the midpoint of the overlap band, in world
    /// coordinates.
    pub position: Point2<f64>,
    /// Unit normal from partner toward agent.
    pub normal: Unit<Vector2<f64>>,
    /// Overlap depth along the normal (m).
    pub depth: f64,
}

impl Contact {
    /// Unit tangent: the normal rotated a quarter turn counterclockwise.
    #[must_use]
    pub fn tangent(&self) -> Unit<Vector2<f64>> {
        Unit::new_unchecked(Vector2::new(-self.normal.y, self.normal.x))
    }

    /// Split a relative velocity into `(normal, tangential)` scalar
    /// components in this contact's frame.
    ///
    /// With the relative velocity taken as agent minus partner, a
    /// positive normal component means the bodies are separating.
    #[must_use]
    pub fn decompose_velocity(&self, relative_velocity: &Vector2<f64>) -> (f64, f64) {
        (
            relative_velocity.dot(&self.normal),
            relative_velocity.dot(&self.tangent()),
        )
    }
}

/// Force resolved at a single contact, split into its normal and
/// tangential parts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactForce {
    /// Repulsive component along the contact normal (N).
    pub normal: Vector2<f64>,
    /// Friction component along the contact tangent (N).
    pub tangential: Vector2<f64>,
    /// World-space point where the force applies.
    pub position: Point2<f64>,
}

impl ContactForce {
    /// A zero force applied at the given point.
    #[must_use]
    pub fn zero(position: Point2<f64>) -> Self {
        Self {
            normal: Vector2::zeros(),
            tangential: Vector2::zeros(),
            position,
        }
    }

    /// Combined force vector (N).
    #[must_use]
    pub fn total(&self) -> Vector2<f64> {
        self.normal + self.tangential
    }

    /// Torque of the total force about `center` (N m, counterclockwise
    /// positive): the planar cross product `r x F`.
    #[must_use]
    pub fn torque_about(&self, center: &Point2<f64>) -> f64 {
        let r = self.position - center;
        r.perp(&self.total())
    }

    /// Whether both components vanish.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.normal == Vector2::zeros() && self.tangential == Vector2::zeros()
    }
}
