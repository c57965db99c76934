//! Material parameters for contact stiffness.
//!
//! A material is described by its Young's modulus `E` and shear modulus
//! `G`. For isotropic elasticity the two are linked through the Poisson
//! ratio by `G = E / (2 (1 + nu))`; [`Material::new`] takes `(E, nu)` and
//! derives `G`, while [`Material::from_moduli`] accepts both moduli
//! directly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MechError;

/// Unique identifier for a registered material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaterialId(u64);

impl MaterialId {
    /// Create a new material ID from a raw value.
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

impl From<u64> for MaterialId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Material({})", self.0)
    }
}

/// Shear modulus of an isotropic material: `G = E / (2 (1 + nu))`.
#[must_use]
pub fn shear_modulus(young_modulus: f64, poisson_ratio: f64) -> f64 {
    young_modulus / (2.0 * (1.0 + poisson_ratio))
}

/// Elastic parameters of a contact material.
///
/// Stored as the pair `(E, G)`. Pairwise contact stiffnesses are derived
/// from these in the contact layer; a material with `G = 0` can be
/// constructed (via [`Material::from_moduli`]) but is rejected the moment
/// it participates in a contact pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    /// Young's modulus in pascals.
    pub young_modulus: f64,
    /// Shear modulus in pascals.
    pub shear_modulus: f64,
}

impl Material {
    /// Create a material from Young's modulus and Poisson ratio.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::InvalidMaterial`] if `young_modulus` is not
    /// positive and finite, or `poisson_ratio` lies outside `(-1, 0.5]`.
    pub fn new(young_modulus: f64, poisson_ratio: f64) -> crate::Result<Self> {
        if !young_modulus.is_finite() || young_modulus <= 0.0 {
            return Err(MechError::invalid_material(format!(
                "Young's modulus must be positive and finite, got {young_modulus}"
            )));
        }
        if !poisson_ratio.is_finite() || poisson_ratio <= -1.0 || poisson_ratio > 0.5 {
            return Err(MechError::invalid_material(format!(
                "Poisson ratio must lie in (-1, 0.5], got {poisson_ratio}"
            )));
        }
        Ok(Self {
            young_modulus,
            shear_modulus: shear_modulus(young_modulus, poisson_ratio),
        })
    }

    /// Create a material directly from Young's and shear moduli.
    ///
    /// A zero shear modulus is accepted here so that the error surfaces
    /// where it matters: deriving a contact stiffness for such a material
    /// fails with [`MechError::InvalidMaterial`].
    ///
    /// # Errors
    ///
    /// Returns [`MechError::InvalidMaterial`] if `young_modulus` is not
    /// positive and finite, or `shear_modulus` is negative or non-finite.
    pub fn from_moduli(young_modulus: f64, shear_modulus: f64) -> crate::Result<Self> {
        if !young_modulus.is_finite() || young_modulus <= 0.0 {
            return Err(MechError::invalid_material(format!(
                "Young's modulus must be positive and finite, got {young_modulus}"
            )));
        }
        if !shear_modulus.is_finite() || shear_modulus < 0.0 {
            return Err(MechError::invalid_material(format!(
                "shear modulus must be non-negative and finite, got {shear_modulus}"
            )));
        }
        Ok(Self {
            young_modulus,
            shear_modulus,
        })
    }

    /// Poisson ratio recovered from the stored moduli.
    ///
    /// Returns infinity when the shear modulus is zero.
    #[must_use]
    pub fn poisson_ratio(&self) -> f64 {
        self.young_modulus / (2.0 * self.shear_modulus) - 1.0
    }

    /// Structural steel: `E = 210 GPa`, `nu = 0.30`.
    #[must_use]
    pub fn steel() -> Self {
        Self {
            young_modulus: 210e9,
            shear_modulus: shear_modulus(210e9, 0.30),
        }
    }

    /// Aluminum alloy: `E = 70 GPa`, `nu = 0.33`.
    #[must_use]
    pub fn aluminum() -> Self {
        Self {
            young_modulus: 70e9,
            shear_modulus: shear_modulus(70e9, 0.33),
        }
    }

    /// Concrete: `E = 30 GPa`, `nu = 0.20`.
    #[must_use]
    pub fn concrete() -> Self {
        Self {
            young_modulus: 30e9,
            shear_modulus: shear_modulus(30e9, 0.20),
        }
    }

    /// Effective bulk stiffness of a clothed human body in a crowd:
    /// `E = 2.6 MPa`, `nu = 0.45`. Orders of magnitude softer than
    /// engineering solids, which keeps contact forces in a plausible
    /// range for pedestrian simulations.
    #[must_use]
    pub fn pedestrian() -> Self {
        Self {
            young_modulus: 2.6e6,
            shear_modulus: shear_modulus(2.6e6, 0.45),
        }
    }
}
