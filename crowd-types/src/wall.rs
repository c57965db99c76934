//! Static wall segments.

use nalgebra::{Point2, Unit, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MaterialId, MechError};

/// Unique identifier for a wall within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallId(u64);

impl WallId {
    /// Create a new wall ID from a raw value.
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

impl From<u64> for WallId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wall({})", self.0)
    }
}

/// An immovable line segment with a surface material.
///
/// Walls have infinite effective mass: contacts against them load the
/// agent side only, and the wall never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    /// First endpoint in world coordinates.
    pub start: Point2<f64>,
    /// Second endpoint in world coordinates.
    pub end: Point2<f64>,
    /// Surface material used for contact stiffness.
    pub material: MaterialId,
}

impl Wall {
    /// Create a wall segment between two points.
    #[must_use]
    pub fn new(start: Point2<f64>, end: Point2<f64>, material: MaterialId) -> Self {
        Self {
            start,
            end,
            material,
        }
    }

    /// Segment length in meters.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit vector from `start` to `end`.
    ///
    /// Only meaningful for validated (non-degenerate) walls.
    #[must_use]
    pub fn direction(&self) -> Unit<Vector2<f64>> {
        Unit::new_normalize(self.end - self.start)
    }

    /// Validate the wall geometry.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] if an endpoint is
    /// non-finite or the segment has zero length.
    pub fn validate(&self) -> crate::Result<()> {
        for p in [&self.start, &self.end] {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(MechError::degenerate_geometry(
                    "wall endpoint must be finite",
                ));
            }
        }
        if self.length() < f64::EPSILON {
            return Err(MechError::degenerate_geometry(format!(
                "wall segment has zero length at ({}, {})",
                self.start.x, self.start.y
            )));
        }
        Ok(())
    }
}
