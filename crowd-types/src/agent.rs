//! Agent identity, kinematic state, and mass properties.
//!
//! An agent is a planar rigid body: a disc or a capsule (a rectangle capped
//! by two half-discs) with position, orientation, linear and angular
//! velocity, and lumped mass properties. Geometry and state are pure data;
//! contact resolution and integration live in higher layers.

use nalgebra::{Point2, Rotation2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MechError;

/// Unique identifier for an agent within a simulation.
///
/// Ids are assigned densely in insertion order, so they double as indices
/// into per-agent storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentId(u64);

impl AgentId {
    /// Create a new agent ID from a raw value.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Get the ID as a storage index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent({})", self.0)
    }
}

/// Position and orientation of a planar rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose2 {
    /// Position of the center of mass in world coordinates (meters).
    pub position: Point2<f64>,
    /// Orientation angle in radians, counterclockwise from the +x axis.
    pub theta: f64,
}

impl Pose2 {
    /// Create a pose from a position and an orientation angle.
    #[must_use]
    pub fn new(position: Point2<f64>, theta: f64) -> Self {
        Self { position, theta }
    }

    /// Pose at the origin with zero orientation.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point2::origin(), 0.0)
    }

    /// Rotation corresponding to the orientation angle.
    #[must_use]
    pub fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.theta)
    }

    /// Transform a point from body coordinates to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point2<f64>) -> Point2<f64> {
        self.position + self.rotation() * local.coords
    }

    /// Rotate a vector from body coordinates to world coordinates.
    #[must_use]
    pub fn transform_vector(&self, local: &Vector2<f64>) -> Vector2<f64> {
        self.rotation() * local
    }

    /// Check that position and angle are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite() && self.theta.is_finite()
    }
}

impl Default for Pose2 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Linear and angular velocity of a planar rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twist2 {
    /// Linear velocity of the center of mass (m/s).
    pub linear: Vector2<f64>,
    /// Angular velocity (rad/s), positive counterclockwise.
    pub angular: f64,
}

impl Twist2 {
    /// Create a twist from linear and angular components.
    #[must_use]
    pub fn new(linear: Vector2<f64>, angular: f64) -> Self {
        Self { linear, angular }
    }

    /// Twist with zero linear and angular velocity.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Vector2::zeros(), 0.0)
    }

    /// Velocity of a material point at offset `r` from the center of mass.
    ///
    /// In the plane the angular term is `omega x r = (-omega * r.y, omega * r.x)`.
    #[must_use]
    pub fn velocity_at_offset(&self, r: &Vector2<f64>) -> Vector2<f64> {
        self.linear + Vector2::new(-self.angular * r.y, self.angular * r.x)
    }

    /// Kinetic energy of a body with the given mass and inertia moving at
    /// this twist (J).
    #[must_use]
    pub fn kinetic_energy(&self, mass: f64, inertia: f64) -> f64 {
        0.5 * mass * self.linear.norm_squared() + 0.5 * inertia * self.angular * self.angular
    }

    /// Check that all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.linear.x.is_finite() && self.linear.y.is_finite() && self.angular.is_finite()
    }
}

impl Default for Twist2 {
    fn default() -> Self {
        Self::zero()
    }
}

/// Full kinematic state of an agent: pose plus twist.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentState {
    /// Position and orientation.
    pub pose: Pose2,
    /// Linear and angular velocity.
    pub twist: Twist2,
}

impl AgentState {
    /// Create a state from a pose and a twist.
    #[must_use]
    pub fn new(pose: Pose2, twist: Twist2) -> Self {
        Self { pose, twist }
    }

    /// State at rest at the given position.
    #[must_use]
    pub fn at_position(position: Point2<f64>) -> Self {
        Self::new(Pose2::new(position, 0.0), Twist2::zero())
    }

    /// Velocity of the material point at world position `point`.
    #[must_use]
    pub fn velocity_at_point(&self, point: &Point2<f64>) -> Vector2<f64> {
        let r = point - self.pose.position;
        self.twist.velocity_at_offset(&r)
    }

    /// Check that pose and twist are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pose.is_finite() && self.twist.is_finite()
    }
}

/// Cross-section of an agent in the plane.
///
/// A capsule is a rectangle of half-length `half_length` capped by two
/// half-discs of the given radius; its long axis lies along body-frame +x.
/// A disc is the degenerate capsule with zero half-length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AgentShape {
    /// Circular cross-section.
    Disc {
        /// Disc radius in meters.
        radius: f64,
    },
    /// Stadium cross-section: a segment of half-length `half_length`
    /// swept by a disc of radius `radius`.
    Capsule {
        /// Half the length of the central segment (meters).
        half_length: f64,
        /// Cap radius (meters).
        radius: f64,
    },
}

impl AgentShape {
    /// Create a disc shape.
    #[must_use]
    pub fn disc(radius: f64) -> Self {
        Self::Disc { radius }
    }

    /// Create a capsule shape.
    #[must_use]
    pub fn capsule(half_length: f64, radius: f64) -> Self {
        Self::Capsule {
            half_length,
            radius,
        }
    }

    /// Radius of the swept disc (for a plain disc, its radius).
    #[must_use]
    pub fn radius(&self) -> f64 {
        match *self {
            Self::Disc { radius } | Self::Capsule { radius, .. } => radius,
        }
    }

    /// Half-length of the central segment (zero for a disc).
    #[must_use]
    pub fn half_length(&self) -> f64 {
        match *self {
            Self::Disc { .. } => 0.0,
            Self::Capsule { half_length, .. } => half_length,
        }
    }

    /// Radius of the smallest circle centered at the center of mass that
    /// contains the shape.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        self.half_length() + self.radius()
    }

    /// Validate the shape parameters.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] if the radius is not
    /// positive and finite, or the half-length is negative or non-finite.
    pub fn validate(&self) -> crate::Result<()> {
        let radius = self.radius();
        if !radius.is_finite() || radius <= 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "shape radius must be positive and finite, got {radius}"
            )));
        }
        let half_length = self.half_length();
        if !half_length.is_finite() || half_length < 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "capsule half-length must be non-negative and finite, got {half_length}"
            )));
        }
        Ok(())
    }
}

/// Lumped mass properties of a planar rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// Mass in kilograms.
    pub mass: f64,
    /// Moment of inertia about the center of mass (kg m^2).
    pub inertia: f64,
}

impl MassProperties {
    /// Create mass properties from explicit mass and inertia.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] if either value is not
    /// positive and finite.
    pub fn new(mass: f64, inertia: f64) -> crate::Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "mass must be positive and finite, got {mass}"
            )));
        }
        if !inertia.is_finite() || inertia <= 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "inertia must be positive and finite, got {inertia}"
            )));
        }
        Ok(Self { mass, inertia })
    }

    /// Mass properties of a uniform disc: `I = m r^2 / 2`.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] if mass or radius is not
    /// positive and finite.
    pub fn disc(mass: f64, radius: f64) -> crate::Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "disc radius must be positive and finite, got {radius}"
            )));
        }
        Self::new(mass, 0.5 * mass * radius * radius)
    }

    /// Mass properties of a uniform capsule (stadium) of half-length `h`
    /// and cap radius `r`.
    ///
    /// The stadium is split into a `2h x 2r` rectangle and two half-discs.
    /// Each part carries its share of the total mass by area, and the
    /// half-disc contributions use the parallel-axis theorem about the
    /// combined centroid. At `h = 0` this reduces to the disc formula.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] if mass or radius is not
    /// positive and finite, or the half-length is negative.
    pub fn capsule(mass: f64, half_length: f64, radius: f64) -> crate::Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "capsule radius must be positive and finite, got {radius}"
            )));
        }
        if !half_length.is_finite() || half_length < 0.0 {
            return Err(MechError::degenerate_geometry(format!(
                "capsule half-length must be non-negative and finite, got {half_length}"
            )));
        }
        let h = half_length;
        let r = radius;
        let area = 4.0 * h * r + std::f64::consts::PI * r * r;
        let density = mass / area;

        // Rectangle 2h x 2r about its own center.
        let m_rect = density * 4.0 * h * r;
        let i_rect = m_rect * (h * h + r * r) / 3.0;

        // Two half-discs, centroid at distance h + 4r/(3 pi) from the
        // combined center along the long axis.
        let m_caps = density * std::f64::consts::PI * r * r;
        let d = 4.0 * r / (3.0 * std::f64::consts::PI);
        let i_caps = m_caps * (r * r / 2.0 + h * h + 2.0 * h * d);

        Self::new(mass, i_rect + i_caps)
    }

    /// Mass properties of the given shape with the given total mass.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] if the mass or the shape
    /// parameters are out of range.
    pub fn of_shape(mass: f64, shape: &AgentShape) -> crate::Result<Self> {
        match *shape {
            AgentShape::Disc { radius } => Self::disc(mass, radius),
            AgentShape::Capsule {
                half_length,
                radius,
            } => Self::capsule(mass, half_length, radius),
        }
    }

    /// Inverse mass (1/kg).
    #[must_use]
    pub fn inv_mass(&self) -> f64 {
        1.0 / self.mass
    }

    /// Inverse inertia (1/(kg m^2)).
    #[must_use]
    pub fn inv_inertia(&self) -> f64 {
        1.0 / self.inertia
    }
}
