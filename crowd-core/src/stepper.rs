//! Fixed-step simulation driver.
//!
//! One step runs the same pipeline every time:
//!
//! 1. validate the incoming state
//! 2. clear force accumulators and drain queued external forces
//! 3. detect and solve contacts against the pre-step snapshot
//! 4. integrate every agent, enforcing the displacement guard
//! 5. apply body-level velocity damping
//! 6. advance the clock
//!
//! All agents see the same snapshot within a step; no state mutates until
//! every contact force has been resolved.

use tracing::{debug, trace, warn};

use nalgebra::Vector2;

use crowd_contact::ContactModel;
use crowd_types::{
    AgentId, Material, MaterialId, MechError, SimulationConfig, TrajectorySink, Wall, WallId,
};

use crate::integrator::{apply_damping, integrate_with_method};
use crate::world::{AgentSpec, World};

/// Totals reported after a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Steps executed by this call.
    pub steps: u64,
    /// World clock at the end of the run (s).
    pub simulated_time: f64,
    /// Largest number of simultaneous contacts seen in any step.
    pub max_contacts: usize,
}

/// Advances a [`World`] through fixed timesteps.
///
/// The stepper is immutable during a run: it captures the validated
/// configuration and the contact model once, and all per-run state lives
/// in the world it drives.
#[derive(Debug, Clone)]
pub struct Stepper {
    config: SimulationConfig,
    model: ContactModel,
}

impl Stepper {
    /// Create a stepper from a configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error if any parameter is
    /// out of range.
    pub fn new(config: &SimulationConfig) -> crowd_types::Result<Self> {
        config.validate()?;
        Ok(Self {
            config: *config,
            model: ContactModel::from_config(config),
        })
    }

    /// The configuration driving this stepper.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Execute one timestep and return the number of contacts resolved.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::Diverged`] if any agent state goes non-finite
    /// or moves farther in one step than the configured displacement
    /// guard allows. A diverged world is mid-step and must be discarded.
    pub fn step(&self, world: &mut World) -> crowd_types::Result<usize> {
        let step = world.step_count();
        world.validate_state(step)?;
        world.clear_forces();
        world.drain_pending();
        let contact_count = world.solve_contacts(&self.model, self.config.timestep)?;

        let dt = self.config.timestep;
        let method = self.config.integration;
        let max_displacement = self.config.max_step_displacement;
        let linear_damping = self.config.linear_damping;
        let angular_damping = self.config.angular_damping;

        for agent in world.agents_mut() {
            let before = agent.state().pose.position;
            let mut next = integrate_with_method(
                method,
                agent.state(),
                agent.linear_acceleration(),
                agent.angular_acceleration(),
                dt,
            );
            next.twist = apply_damping(&next.twist, linear_damping, angular_damping, dt);

            if !next.is_finite() {
                warn!(agent = %agent.id(), step, "integration produced a non-finite state");
                return Err(MechError::diverged(
                    agent.id(),
                    step,
                    "non-finite state after integration",
                ));
            }
            let displacement = (next.pose.position - before).norm();
            if displacement > max_displacement {
                warn!(agent = %agent.id(), step, displacement, "displacement guard tripped");
                return Err(MechError::diverged(
                    agent.id(),
                    step,
                    format!(
                        "step displacement {displacement:.3} m exceeds limit {max_displacement} m"
                    ),
                ));
            }
            agent.set_state(next);
        }

        world.advance_time(dt);
        trace!(step, contacts = contact_count, time = world.time(), "step complete");
        Ok(contact_count)
    }

    /// Execute `steps` timesteps, recording every agent after each one.
    ///
    /// Does not record the state the world starts in; [`Stepper::run`]
    /// does that before its first step.
    ///
    /// # Errors
    ///
    /// Stops at the first [`MechError::Diverged`] and propagates it.
    pub fn run_steps<S: TrajectorySink + ?Sized>(
        &self,
        world: &mut World,
        sink: &mut S,
        steps: u64,
    ) -> crowd_types::Result<RunSummary> {
        let mut max_contacts = 0;
        for _ in 0..steps {
            let contacts = self.step(world)?;
            max_contacts = max_contacts.max(contacts);
            world.emit_samples(sink);
        }
        Ok(RunSummary {
            steps,
            simulated_time: world.time(),
            max_contacts,
        })
    }

    /// Run for the configured duration, recording the initial state and
    /// then every agent after every step.
    ///
    /// # Errors
    ///
    /// Stops at the first [`MechError::Diverged`] and propagates it.
    pub fn run<S: TrajectorySink + ?Sized>(
        &self,
        world: &mut World,
        sink: &mut S,
    ) -> crowd_types::Result<RunSummary> {
        let steps = self.config.total_steps();
        debug!(
            agents = world.agent_count(),
            walls = world.wall_count(),
            steps,
            timestep = self.config.timestep,
            "starting run"
        );
        world.emit_samples(sink);
        self.run_steps(world, sink, steps)
    }
}

/// Owned world plus stepper: the one-stop entry point for scenarios.
#[derive(Debug, Clone)]
pub struct Simulation {
    world: World,
    stepper: Stepper,
}

impl Simulation {
    /// Create an empty simulation from a configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error if any parameter is
    /// out of range.
    pub fn new(config: SimulationConfig) -> crowd_types::Result<Self> {
        Ok(Self {
            world: World::new(),
            stepper: Stepper::new(&config)?,
        })
    }

    /// The world being simulated.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        self.stepper.config()
    }

    /// Register a material.
    ///
    /// # Errors
    ///
    /// See [`World::add_material`].
    pub fn add_material(&mut self, material: Material) -> crowd_types::Result<MaterialId> {
        self.world.add_material(material)
    }

    /// Add an agent.
    ///
    /// # Errors
    ///
    /// See [`World::add_agent`].
    pub fn add_agent(&mut self, spec: AgentSpec) -> crowd_types::Result<AgentId> {
        self.world.add_agent(spec)
    }

    /// Add a wall.
    ///
    /// # Errors
    ///
    /// See [`World::add_wall`].
    pub fn add_wall(&mut self, wall: Wall) -> crowd_types::Result<WallId> {
        self.world.add_wall(wall)
    }

    /// Queue an external force and torque on an agent for the next step.
    ///
    /// # Errors
    ///
    /// See [`World::apply_force`].
    pub fn apply_force(
        &mut self,
        agent: AgentId,
        force: Vector2<f64>,
        torque: f64,
    ) -> crowd_types::Result<()> {
        self.world.apply_force(agent, force, torque)
    }

    /// Execute one timestep.
    ///
    /// # Errors
    ///
    /// See [`Stepper::step`].
    pub fn step(&mut self) -> crowd_types::Result<usize> {
        self.stepper.step(&mut self.world)
    }

    /// Run for the configured duration.
    ///
    /// # Errors
    ///
    /// See [`Stepper::run`].
    pub fn run<S: TrajectorySink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> crowd_types::Result<RunSummary> {
        self.stepper.run(&mut self.world, sink)
    }

    /// Current simulation time (s).
    #[must_use]
    pub fn time(&self) -> f64 {
        self.world.time()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crowd_types::{AgentShape, TrajectorySample};
    use nalgebra::Point2;

    fn soft_material() -> Material {
        Material::new(1e4, 0.3).unwrap()
    }

    fn config() -> SimulationConfig {
        SimulationConfig::default()
            .with_normal_damping(0.0)
            .with_duration(0.01)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = SimulationConfig::default().with_timestep(0.0);
        assert!(Stepper::new(&bad).is_err());
    }

    #[test]
    fn test_free_agent_coasts() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        sim.add_agent(
            AgentSpec::new(AgentShape::disc(0.5), 80.0, mat)
                .with_velocity(Vector2::new(2.0, 0.0)),
        )
        .unwrap();

        for _ in 0..10 {
            sim.step().unwrap();
        }

        let state = sim.world().agents()[0].state();
        assert_relative_eq!(state.pose.position.x, 0.02, epsilon = 1e-12);
        assert_relative_eq!(state.twist.linear.x, 2.0);
        assert_relative_eq!(sim.time(), 0.01, epsilon = 1e-15);
        assert_eq!(sim.world().step_count(), 10);
    }

    #[test]
    fn test_collision_conserves_momentum() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        let shape = AgentShape::disc(0.5);
        sim.add_agent(
            AgentSpec::new(shape, 80.0, mat).with_velocity(Vector2::new(0.5, 0.0)),
        )
        .unwrap();
        sim.add_agent(
            AgentSpec::new(shape, 80.0, mat).with_position(Point2::new(0.95, 0.0)),
        )
        .unwrap();

        let before = sim.world().total_linear_momentum();
        for _ in 0..10 {
            let contacts = sim.step().unwrap();
            assert_eq!(contacts, 1);
        }
        let after = sim.world().total_linear_momentum();

        assert_relative_eq!(after.x, before.x, epsilon = 1e-12);
        assert_relative_eq!(after.y, before.y, epsilon = 1e-12);
        // The target picked up speed from the overlap.
        assert!(sim.world().agents()[1].state().twist.linear.x > 0.0);
    }

    #[test]
    fn test_pending_force_accelerates_agent() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        let id = sim
            .add_agent(AgentSpec::new(AgentShape::disc(0.5), 80.0, mat))
            .unwrap();

        sim.apply_force(id, Vector2::new(160.0, 0.0), 0.0).unwrap();
        sim.step().unwrap();

        // a = 2 m/s^2 over one 1 ms step.
        let state = sim.world().agent(id).unwrap().state();
        assert_relative_eq!(state.twist.linear.x, 0.002, epsilon = 1e-15);

        // The queue drained: a second step adds nothing.
        sim.step().unwrap();
        let state = sim.world().agent(id).unwrap().state();
        assert_relative_eq!(state.twist.linear.x, 0.002, epsilon = 1e-15);
    }

    #[test]
    fn test_non_finite_force_diverges() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        let id = sim
            .add_agent(AgentSpec::new(AgentShape::disc(0.5), 80.0, mat))
            .unwrap();

        sim.apply_force(id, Vector2::new(f64::INFINITY, 0.0), 0.0)
            .unwrap();
        let err = sim.step().unwrap_err();
        assert!(err.is_diverged());
    }

    #[test]
    fn test_displacement_guard_trips() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        let id = sim
            .add_agent(AgentSpec::new(AgentShape::disc(0.5), 80.0, mat))
            .unwrap();

        // Enough force to throw the agent kilometers in one millisecond.
        sim.apply_force(id, Vector2::new(1e12, 0.0), 0.0).unwrap();
        let err = sim.step().unwrap_err();
        assert!(matches!(
            err,
            MechError::Diverged { agent, step: 0, .. } if agent == id
        ));
        assert!(err.to_string().contains("displacement"));
    }

    #[test]
    fn test_damping_decays_coasting_velocity() {
        let cfg = config().with_linear_damping(2.0);
        let mut sim = Simulation::new(cfg).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        sim.add_agent(
            AgentSpec::new(AgentShape::disc(0.5), 80.0, mat)
                .with_velocity(Vector2::new(1.0, 0.0)),
        )
        .unwrap();

        for _ in 0..10 {
            sim.step().unwrap();
        }
        // v = exp(-2 * 0.01) after 10 ms of decay at rate 2/s.
        let vx = sim.world().agents()[0].state().twist.linear.x;
        assert_relative_eq!(vx, (-0.02_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_run_emits_initial_and_per_step_samples() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        sim.add_agent(AgentSpec::new(AgentShape::disc(0.5), 80.0, mat))
            .unwrap();
        sim.add_agent(
            AgentSpec::new(AgentShape::disc(0.5), 80.0, mat)
                .with_position(Point2::new(3.0, 0.0)),
        )
        .unwrap();

        let mut samples: Vec<TrajectorySample> = Vec::new();
        let summary = sim.run(&mut samples).unwrap();

        assert_eq!(summary.steps, 10);
        assert_relative_eq!(summary.simulated_time, 0.01, epsilon = 1e-15);
        // 2 agents x (initial row + 10 step rows).
        assert_eq!(samples.len(), 22);
        assert_relative_eq!(samples[0].t, 0.0);
        assert_relative_eq!(samples[21].t, 0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_run_steps_skips_initial_sample() {
        let mut sim = Simulation::new(config()).unwrap();
        let mat = sim.add_material(soft_material()).unwrap();
        sim.add_agent(AgentSpec::new(AgentShape::disc(0.5), 80.0, mat))
            .unwrap();

        let stepper = Stepper::new(&config()).unwrap();
        let mut world = sim.world().clone();
        let mut samples: Vec<TrajectorySample> = Vec::new();
        let summary = stepper.run_steps(&mut world, &mut samples, 5).unwrap();

        assert_eq!(summary.steps, 5);
        assert_eq!(samples.len(), 5);
    }
}
