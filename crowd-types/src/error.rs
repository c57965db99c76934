//! Error types for crowd mechanics.
//!
//! Errors split into two families: setup errors (invalid materials,
//! degenerate geometry, bad configuration) raised while a scenario is being
//! assembled, and run errors (divergence) raised mid-integration with the
//! offending agent and step attached.

use thiserror::Error;

use crate::{AgentId, MaterialId};

/// Errors that can occur while building or running a simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MechError {
    /// Material parameters outside the physical range, or a material pair
    /// whose contact stiffness is degenerate (e.g. zero shear modulus).
    #[error("invalid material: {reason}")]
    InvalidMaterial {
        /// Description of what makes the material invalid.
        reason: String,
    },

    /// Zero-length wall segment, non-positive radius, or similar.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Description of the degenerate geometry.
        reason: String,
    },

    /// Timestep is zero, negative, or not finite.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Configuration is inconsistent or out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration problem.
        reason: String,
    },

    /// A material reference does not resolve to a registered material.
    #[error("unknown material: {0}")]
    UnknownMaterial(MaterialId),

    /// An agent reference does not resolve to a registered agent.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// The integration produced a non-finite state or an excessive
    /// per-step displacement. Not recoverable; the run must be aborted.
    #[error("simulation diverged at step {step} for {agent}: {reason}")]
    Diverged {
        /// The first agent whose state violated the stability bounds.
        agent: AgentId,
        /// Step index at which the divergence was detected.
        step: u64,
        /// Description of the violated bound.
        reason: String,
    },
}

impl MechError {
    /// Create an invalid-material error.
    pub fn invalid_material(reason: impl Into<String>) -> Self {
        Self::InvalidMaterial {
            reason: reason.into(),
        }
    }

    /// Create a degenerate-geometry error.
    pub fn degenerate_geometry(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a divergence error for the given agent and step.
    pub fn diverged(agent: AgentId, step: u64, reason: impl Into<String>) -> Self {
        Self::Diverged {
            agent,
            step,
            reason: reason.into(),
        }
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }

    /// Check if this error was raised at scenario-setup time.
    ///
    /// Setup errors abort scenario construction; they never surface
    /// mid-run.
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        !self.is_diverged()
    }
}
