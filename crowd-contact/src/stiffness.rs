//! Pairwise contact stiffness derived from material moduli.
//!
//! Two touching bodies behave like springs in series: each side
//! contributes a compliance, and the pair stiffness is the reciprocal of
//! the summed compliances. Per body the normal and tangential compliances
//! are
//!
//! ```text
//! c_n = (4G - E) / (4 G^2)
//! c_t = (6G - E) / (8 G^2)
//! ```
//!
//! so for two identical materials the pair reduces to
//! `k_n = 2 G^2 / (4G - E)` and `k_t = 4 G^2 / (6G - E)`.
//!
//! Because floating-point addition commutes, `contact_stiffness(a, b)`
//! and `contact_stiffness(b, a)` are bitwise identical; the
//! [`StiffnessTable`] additionally canonicalizes its keys so each
//! unordered pair is computed and stored once.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crowd_types::{Material, MaterialId, MechError};

/// Normal and tangential spring constants for one material pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StiffnessPair {
    /// Spring constant along the contact normal (N/m per meter of overlap).
    pub normal: f64,
    /// Spring constant along the contact tangent.
    pub tangential: f64,
}

fn normal_compliance(material: &Material) -> f64 {
    let g = material.shear_modulus;
    (4.0 * g - material.young_modulus) / (4.0 * g * g)
}

fn tangential_compliance(material: &Material) -> f64 {
    let g = material.shear_modulus;
    (6.0 * g - material.young_modulus) / (8.0 * g * g)
}

/// Combine two materials into the stiffness of their contact.
///
/// Symmetric in its arguments down to the last bit.
///
/// # Errors
///
/// Returns [`MechError::InvalidMaterial`] if either material has a
/// non-positive shear modulus, or the combined compliances do not yield a
/// positive finite stiffness.
pub fn contact_stiffness(a: &Material, b: &Material) -> crowd_types::Result<StiffnessPair> {
    for m in [a, b] {
        if m.shear_modulus <= 0.0 {
            return Err(MechError::invalid_material(format!(
                "cannot derive contact stiffness for shear modulus {}",
                m.shear_modulus
            )));
        }
    }
    let normal = 1.0 / (normal_compliance(a) + normal_compliance(b));
    let tangential = 1.0 / (tangential_compliance(a) + tangential_compliance(b));
    for k in [normal, tangential] {
        if !k.is_finite() || k <= 0.0 {
            return Err(MechError::invalid_material(format!(
                "material pair yields non-positive contact stiffness {k}"
            )));
        }
    }
    Ok(StiffnessPair { normal, tangential })
}

fn canonical_key(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Registry of materials with every pair stiffness precomputed.
///
/// Registration is eager: adding a material derives its stiffness against
/// itself and every material already present, so an unusable material is
/// rejected at setup time rather than mid-run. Lookup is a plain hash-map
/// read on the canonical `(min, max)` key.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StiffnessTable {
    materials: Vec<Material>,
    pairs: HashMap<(MaterialId, MaterialId), StiffnessPair>,
}

impl StiffnessTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and precompute its stiffness against itself
    /// and all previously registered materials.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::InvalidMaterial`] if any resulting pair has a
    /// degenerate stiffness; the table is left unchanged in that case.
    pub fn add(&mut self, material: Material) -> crowd_types::Result<MaterialId> {
        let id = MaterialId::new(self.materials.len() as u64);

        let mut new_pairs = Vec::with_capacity(self.materials.len() + 1);
        new_pairs.push((canonical_key(id, id), contact_stiffness(&material, &material)?));
        for (index, existing) in self.materials.iter().enumerate() {
            let other = MaterialId::new(index as u64);
            new_pairs.push((
                canonical_key(other, id),
                contact_stiffness(existing, &material)?,
            ));
        }

        self.materials.push(material);
        self.pairs.extend(new_pairs);
        Ok(id)
    }

    /// Look up the stiffness for a material pair, in either order.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::UnknownMaterial`] if either ID has not been
    /// registered.
    pub fn get(&self, a: MaterialId, b: MaterialId) -> crowd_types::Result<StiffnessPair> {
        self.pairs
            .get(&canonical_key(a, b))
            .copied()
            .ok_or_else(|| {
                let missing = if a.index() >= self.materials.len() {
                    a
                } else {
                    b
                };
                MechError::UnknownMaterial(missing)
            })
    }

    /// Look up a registered material.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::UnknownMaterial`] if the ID has not been
    /// registered.
    pub fn material(&self, id: MaterialId) -> crowd_types::Result<&Material> {
        self.materials
            .get(id.index())
            .ok_or(MechError::UnknownMaterial(id))
    }

    /// Number of registered materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether any materials have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_pair_reduction() {
        // E = 5, G = 2: k_n = 2*4/(8-5) = 8/3, k_t = 4*4/(12-5) = 16/7.
        let m = Material::from_moduli(5.0, 2.0).unwrap();
        let pair = contact_stiffness(&m, &m).unwrap();
        assert_relative_eq!(pair.normal, 8.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(pair.tangential, 16.0 / 7.0, epsilon = 1e-12);

        // E = 1, G = 1: k_n = 2/3, k_t = 4/5.
        let m = Material::from_moduli(1.0, 1.0).unwrap();
        let pair = contact_stiffness(&m, &m).unwrap();
        assert_relative_eq!(pair.normal, 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(pair.tangential, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_pair_is_bitwise_symmetric() {
        let steel = Material::from_moduli(210e9, 80e9).unwrap();
        let aluminum = Material::from_moduli(70e9, 26e9).unwrap();
        let ab = contact_stiffness(&steel, &aluminum).unwrap();
        let ba = contact_stiffness(&aluminum, &steel).unwrap();
        assert_eq!(ab.normal.to_bits(), ba.normal.to_bits());
        assert_eq!(ab.tangential.to_bits(), ba.tangential.to_bits());
    }

    #[test]
    fn test_zero_shear_rejected_at_combination() {
        let good = Material::pedestrian();
        let rigid_only = Material::from_moduli(100.0, 0.0).unwrap();
        let err = contact_stiffness(&good, &rigid_only).unwrap_err();
        assert!(matches!(err, MechError::InvalidMaterial { .. }));
    }

    #[test]
    fn test_softer_material_softens_the_pair() {
        let hard = Material::new(1e5, 0.3).unwrap();
        let soft = Material::new(1e4, 0.3).unwrap();
        let hard_pair = contact_stiffness(&hard, &hard).unwrap();
        let mixed = contact_stiffness(&hard, &soft).unwrap();
        assert!(mixed.normal < hard_pair.normal);
        assert!(mixed.tangential < hard_pair.tangential);
    }

    #[test]
    fn test_table_registration_and_lookup() {
        let mut table = StiffnessTable::new();
        assert!(table.is_empty());

        let a = table.add(Material::new(1e5, 0.3).unwrap()).unwrap();
        let b = table.add(Material::new(1e4, 0.3).unwrap()).unwrap();
        assert_eq!(table.len(), 2);

        // Self pairs and the cross pair all resolve, in either order.
        assert!(table.get(a, a).is_ok());
        assert!(table.get(b, b).is_ok());
        let ab = table.get(a, b).unwrap();
        let ba = table.get(b, a).unwrap();
        assert_eq!(ab.normal.to_bits(), ba.normal.to_bits());

        let err = table.get(a, MaterialId::new(9)).unwrap_err();
        assert!(matches!(err, MechError::UnknownMaterial(id) if id == MaterialId::new(9)));
    }

    #[test]
    fn test_table_rejects_unusable_material() {
        let mut table = StiffnessTable::new();
        table.add(Material::pedestrian()).unwrap();

        let before = table.len();
        let err = table
            .add(Material::from_moduli(100.0, 0.0).unwrap())
            .unwrap_err();
        assert!(matches!(err, MechError::InvalidMaterial { .. }));
        assert_eq!(table.len(), before, "failed add must not mutate the table");
        assert!(table.get(MaterialId::new(0), MaterialId::new(1)).is_err());
    }

    #[test]
    fn test_table_lookup_matches_direct_combination() {
        let steel = Material::steel();
        let concrete = Material::concrete();

        let mut table = StiffnessTable::new();
        let s = table.add(steel).unwrap();
        let c = table.add(concrete).unwrap();

        let direct = contact_stiffness(&steel, &concrete).unwrap();
        let looked_up = table.get(s, c).unwrap();
        assert_eq!(direct.normal.to_bits(), looked_up.normal.to_bits());
        assert_eq!(direct.tangential.to_bits(), looked_up.tangential.to_bits());
    }
}
