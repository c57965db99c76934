//! Simulation configuration.
//!
//! [`SimulationConfig`] gathers the knobs shared by every scenario: the
//! fixed timestep, run duration, friction and damping coefficients, the
//! per-step displacement guard, and the integration method. Construction
//! is infallible; call [`SimulationConfig::validate`] before handing the
//! config to a stepper.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MechError;

/// Numerical integration scheme for advancing agent states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// Explicit (forward) Euler: position advances with the pre-update
    /// velocity. Simple but drifts energy upward under stiff contact.
    ExplicitEuler,
    /// Semi-implicit (symplectic) Euler: velocity updates first, then
    /// position advances with the new velocity. The default.
    #[default]
    SemiImplicitEuler,
}

impl IntegrationMethod {
    /// Order of accuracy of the method.
    #[must_use]
    pub fn order(&self) -> usize {
        match self {
            Self::ExplicitEuler | Self::SemiImplicitEuler => 1,
        }
    }

    /// Whether the method preserves phase-space volume (no secular
    /// energy drift for conservative forces).
    #[must_use]
    pub fn is_symplectic(&self) -> bool {
        matches!(self, Self::SemiImplicitEuler)
    }
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExplicitEuler => write!(f, "Explicit Euler"),
            Self::SemiImplicitEuler => write!(f, "Semi-Implicit Euler"),
        }
    }
}

/// Global parameters for a simulation run.
///
/// # Example
///
/// ```
/// use crowd_types::SimulationConfig;
///
/// let config = SimulationConfig::default()
///     .with_timestep(1e-3)
///     .with_duration(5.0)
///     .with_friction_coefficient(0.5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.total_steps(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Fixed integration timestep in seconds.
    pub timestep: f64,
    /// Total simulated duration in seconds.
    pub duration: f64,
    /// Coulomb friction coefficient applied at every contact.
    pub friction_coefficient: f64,
    /// Normal dashpot coefficient (N s/m); resists approach along the
    /// contact normal.
    pub normal_damping: f64,
    /// Body-level exponential decay rate for linear velocity (1/s).
    /// Zero disables the decay.
    pub linear_damping: f64,
    /// Body-level exponential decay rate for angular velocity (1/s).
    /// Zero disables the decay.
    pub angular_damping: f64,
    /// Largest center-of-mass displacement an agent may make in a single
    /// step (meters) before the run is declared diverged.
    pub max_step_displacement: f64,
    /// Integration scheme.
    pub integration: IntegrationMethod,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1e-3,
            duration: 5.0,
            friction_coefficient: 0.5,
            normal_damping: 1e3,
            linear_damping: 0.0,
            angular_damping: 0.0,
            max_step_displacement: 1.0,
            integration: IntegrationMethod::SemiImplicitEuler,
        }
    }
}

impl SimulationConfig {
    /// Configuration tuned for accuracy: a 0.1 ms timestep.
    #[must_use]
    pub fn high_precision() -> Self {
        Self {
            timestep: 1e-4,
            ..Self::default()
        }
    }

    /// Configuration tuned for quick previews: a 10 ms timestep and a
    /// looser displacement guard.
    #[must_use]
    pub fn fast_preview() -> Self {
        Self {
            timestep: 1e-2,
            max_step_displacement: 2.0,
            ..Self::default()
        }
    }

    /// Set the timestep in seconds.
    #[must_use]
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the simulated duration in seconds.
    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the Coulomb friction coefficient.
    #[must_use]
    pub fn with_friction_coefficient(mut self, mu: f64) -> Self {
        self.friction_coefficient = mu;
        self
    }

    /// Set the normal dashpot coefficient (N s/m).
    #[must_use]
    pub fn with_normal_damping(mut self, damping: f64) -> Self {
        self.normal_damping = damping;
        self
    }

    /// Set the body-level linear velocity decay rate (1/s).
    #[must_use]
    pub fn with_linear_damping(mut self, damping: f64) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set the body-level angular velocity decay rate (1/s).
    #[must_use]
    pub fn with_angular_damping(mut self, damping: f64) -> Self {
        self.angular_damping = damping;
        self
    }

    /// Set the per-step displacement guard (meters).
    #[must_use]
    pub fn with_max_step_displacement(mut self, limit: f64) -> Self {
        self.max_step_displacement = limit;
        self
    }

    /// Set the integration method.
    #[must_use]
    pub fn with_integration(mut self, method: IntegrationMethod) -> Self {
        self.integration = method;
        self
    }

    /// Validate all parameters.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::InvalidTimestep`] or
    /// [`MechError::InvalidConfig`] describing the first violated bound.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(MechError::InvalidTimestep(self.timestep));
        }
        if self.timestep > 1.0 {
            return Err(MechError::invalid_config(format!(
                "timestep {} > 1 second is likely an error",
                self.timestep
            )));
        }
        if !self.duration.is_finite() || self.duration < self.timestep {
            return Err(MechError::invalid_config(format!(
                "duration must be finite and at least one timestep, got {}",
                self.duration
            )));
        }
        if !self.friction_coefficient.is_finite() || self.friction_coefficient < 0.0 {
            return Err(MechError::invalid_config(format!(
                "friction coefficient must be non-negative, got {}",
                self.friction_coefficient
            )));
        }
        if !self.normal_damping.is_finite() || self.normal_damping < 0.0 {
            return Err(MechError::invalid_config(format!(
                "normal damping must be non-negative, got {}",
                self.normal_damping
            )));
        }
        if !self.linear_damping.is_finite() || self.linear_damping < 0.0 {
            return Err(MechError::invalid_config(format!(
                "linear damping must be non-negative, got {}",
                self.linear_damping
            )));
        }
        if !self.angular_damping.is_finite() || self.angular_damping < 0.0 {
            return Err(MechError::invalid_config(format!(
                "angular damping must be non-negative, got {}",
                self.angular_damping
            )));
        }
        if !self.max_step_displacement.is_finite() || self.max_step_displacement <= 0.0 {
            return Err(MechError::invalid_config(format!(
                "max step displacement must be positive, got {}",
                self.max_step_displacement
            )));
        }
        Ok(())
    }

    /// Simulation frequency in Hz (steps per simulated second).
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }

    /// Number of steps covering the configured duration.
    #[must_use]
    pub fn total_steps(&self) -> u64 {
        (self.duration / self.timestep).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.timestep, 1e-3);
        assert_relative_eq!(config.frequency(), 1000.0);
        assert_eq!(config.total_steps(), 5000);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(SimulationConfig::high_precision().validate().is_ok());
        assert!(SimulationConfig::fast_preview().validate().is_ok());
        assert!(SimulationConfig::high_precision().timestep < SimulationConfig::default().timestep);
    }

    #[test]
    fn test_builder_chain() {
        let config = SimulationConfig::default()
            .with_timestep(1e-4)
            .with_duration(2.0)
            .with_friction_coefficient(0.3)
            .with_normal_damping(500.0)
            .with_linear_damping(2.0)
            .with_angular_damping(1.0)
            .with_max_step_displacement(0.5)
            .with_integration(IntegrationMethod::ExplicitEuler);
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.timestep, 1e-4);
        assert_relative_eq!(config.linear_damping, 2.0);
        assert_eq!(config.integration, IntegrationMethod::ExplicitEuler);
        assert_eq!(config.total_steps(), 20_000);
    }

    #[test]
    fn test_invalid_timestep() {
        let config = SimulationConfig::default().with_timestep(0.0);
        assert!(matches!(
            config.validate(),
            Err(MechError::InvalidTimestep(_))
        ));

        let config = SimulationConfig::default().with_timestep(-1e-3);
        assert!(config.validate().is_err());

        let config = SimulationConfig::default().with_timestep(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_timestep_rejected() {
        let config = SimulationConfig::default().with_timestep(2.0);
        assert!(matches!(
            config.validate(),
            Err(MechError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_negative_coefficients_rejected() {
        assert!(SimulationConfig::default()
            .with_friction_coefficient(-0.1)
            .validate()
            .is_err());
        assert!(SimulationConfig::default()
            .with_normal_damping(-1.0)
            .validate()
            .is_err());
        assert!(SimulationConfig::default()
            .with_linear_damping(-0.5)
            .validate()
            .is_err());
        assert!(SimulationConfig::default()
            .with_max_step_displacement(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_duration_shorter_than_step_rejected() {
        let config = SimulationConfig::default()
            .with_timestep(1e-2)
            .with_duration(1e-3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_integration_method_properties() {
        assert_eq!(IntegrationMethod::SemiImplicitEuler.order(), 1);
        assert!(IntegrationMethod::SemiImplicitEuler.is_symplectic());
        assert!(!IntegrationMethod::ExplicitEuler.is_symplectic());
        assert_eq!(
            IntegrationMethod::SemiImplicitEuler.to_string(),
            "Semi-Implicit Euler"
        );
        assert_eq!(IntegrationMethod::default(), IntegrationMethod::SemiImplicitEuler);
    }
}
