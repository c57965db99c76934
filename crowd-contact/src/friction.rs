//! Coulomb friction cone in the plane.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coulomb friction limit: tangential force magnitude may not exceed
/// `mu` times the normal force.
///
/// In the plane the tangential force is a signed scalar along the
/// contact tangent, so the "cone" degenerates to a symmetric interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrictionCone {
    mu: f64,
}

impl FrictionCone {
    /// Create a friction cone with the given coefficient.
    ///
    /// Negative coefficients are clamped to zero.
    #[must_use]
    pub fn new(mu: f64) -> Self {
        Self { mu: mu.max(0.0) }
    }

    /// A cone that admits no tangential force at all.
    #[must_use]
    pub fn frictionless() -> Self {
        Self::new(0.0)
    }

    /// Friction coefficient.
    #[must_use]
    pub fn coefficient(&self) -> f64 {
        self.mu
    }

    /// Largest admissible tangential force magnitude for the given
    /// normal force.
    #[must_use]
    pub fn limit(&self, normal_force: f64) -> f64 {
        self.mu * normal_force.max(0.0)
    }

    /// Project a trial tangential force onto the admissible interval.
    #[must_use]
    pub fn clamp(&self, tangential_force: f64, normal_force: f64) -> f64 {
        let limit = self.limit(normal_force);
        tangential_force.clamp(-limit, limit)
    }

    /// Whether the tangential force satisfies the Coulomb condition.
    #[must_use]
    pub fn contains(&self, tangential_force: f64, normal_force: f64) -> bool {
        tangential_force.abs() <= self.limit(normal_force) + 1e-12
    }
}
