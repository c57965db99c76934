//! World state: registered materials, agents, walls, and the per-step
//! contact resolution that couples them.
//!
//! The world owns all mutable simulation state. Contact forces are
//! resolved in two phases so that every force in a step is computed from
//! the same pre-step snapshot: first all contacts are evaluated against
//! immutable state, then the resulting forces land in the per-agent
//! accumulators. State itself only changes when the stepper integrates.

use nalgebra::{Point2, Vector2};

use crowd_contact::{
    agent_agent_contact, agent_wall_contact, Contact, ContactForce, ContactModel,
    ContactPartner, StiffnessTable,
};
use crowd_types::{
    AgentId, AgentShape, AgentState, MassProperties, Material, MaterialId, MechError,
    TrajectorySample, TrajectorySink, Wall, WallId,
};

/// Construction parameters for one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentSpec {
    /// Cross-section in the plane.
    pub shape: AgentShape,
    /// Total mass in kilograms.
    pub mass: f64,
    /// Registered material for contact stiffness.
    pub material: MaterialId,
    /// Initial kinematic state.
    pub state: AgentState,
}

impl AgentSpec {
    /// Spec for an agent at rest at the origin.
    #[must_use]
    pub fn new(shape: AgentShape, mass: f64, material: MaterialId) -> Self {
        Self {
            shape,
            mass,
            material,
            state: AgentState::default(),
        }
    }

    /// Set the initial position.
    #[must_use]
    pub fn with_position(mut self, position: Point2<f64>) -> Self {
        self.state.pose.position = position;
        self
    }

    /// Set the initial orientation angle (rad).
    #[must_use]
    pub fn with_angle(mut self, theta: f64) -> Self {
        self.state.pose.theta = theta;
        self
    }

    /// Set the initial linear velocity (m/s).
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector2<f64>) -> Self {
        self.state.twist.linear = velocity;
        self
    }

    /// Set the initial angular velocity (rad/s).
    #[must_use]
    pub fn with_angular_velocity(mut self, omega: f64) -> Self {
        self.state.twist.angular = omega;
        self
    }

    /// Set the full initial state.
    #[must_use]
    pub fn with_state(mut self, state: AgentState) -> Self {
        self.state = state;
        self
    }
}

/// One mobile body with its force and torque accumulators.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    shape: AgentShape,
    material: MaterialId,
    mass: MassProperties,
    state: AgentState,
    force: Vector2<f64>,
    torque: f64,
}

impl Agent {
    fn new(id: AgentId, spec: &AgentSpec, mass: MassProperties) -> Self {
        Self {
            id,
            shape: spec.shape,
            material: spec.material,
            mass,
            state: spec.state,
            force: Vector2::zeros(),
            torque: 0.0,
        }
    }

    /// Agent ID.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Cross-section shape.
    #[must_use]
    pub fn shape(&self) -> &AgentShape {
        &self.shape
    }

    /// Registered material.
    #[must_use]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Mass and moment of inertia.
    #[must_use]
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass
    }

    /// Current kinematic state.
    #[must_use]
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Net force accumulated so far this step (N).
    #[must_use]
    pub fn accumulated_force(&self) -> Vector2<f64> {
        self.force
    }

    /// Net torque accumulated so far this step (N m).
    #[must_use]
    pub fn accumulated_torque(&self) -> f64 {
        self.torque
    }

    /// Linear acceleration implied by the current accumulators.
    #[must_use]
    pub fn linear_acceleration(&self) -> Vector2<f64> {
        self.force * self.mass.inv_mass()
    }

    /// Angular acceleration implied by the current accumulators.
    #[must_use]
    pub fn angular_acceleration(&self) -> f64 {
        self.torque * self.mass.inv_inertia()
    }

    pub(crate) fn apply_central_force(&mut self, force: Vector2<f64>, torque: f64) {
        self.force += force;
        self.torque += torque;
    }

    pub(crate) fn apply_force_at_point(&mut self, force: Vector2<f64>, point: &Point2<f64>) {
        let r = point - self.state.pose.position;
        self.force += force;
        self.torque += r.perp(&force);
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vector2::zeros();
        self.torque = 0.0;
    }

    pub(crate) fn set_state(&mut self, state: AgentState) {
        self.state = state;
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingForce {
    agent: AgentId,
    force: Vector2<f64>,
    torque: f64,
}

/// All simulation state: materials, agents, walls, time.
#[derive(Debug, Clone, Default)]
pub struct World {
    agents: Vec<Agent>,
    walls: Vec<Wall>,
    stiffness: StiffnessTable,
    pending: Vec<PendingForce>,
    time: f64,
    steps: u64,
}

impl World {
    /// Create an empty world at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material, precomputing its contact stiffness against
    /// every material already registered.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::InvalidMaterial`] if any resulting pair has
    /// a degenerate stiffness.
    pub fn add_material(&mut self, material: Material) -> crowd_types::Result<MaterialId> {
        self.stiffness.add(material)
    }

    /// Add an agent and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] for an invalid shape,
    /// mass, or non-finite initial state, and
    /// [`MechError::UnknownMaterial`] for an unregistered material.
    pub fn add_agent(&mut self, spec: AgentSpec) -> crowd_types::Result<AgentId> {
        spec.shape.validate()?;
        let mass = MassProperties::of_shape(spec.mass, &spec.shape)?;
        self.stiffness.material(spec.material)?;
        if !spec.state.is_finite() {
            return Err(MechError::degenerate_geometry(
                "agent initial state must be finite",
            ));
        }
        let id = AgentId::new(self.agents.len() as u64);
        self.agents.push(Agent::new(id, &spec, mass));
        Ok(id)
    }

    /// Add a wall segment and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::DegenerateGeometry`] for a zero-length or
    /// non-finite segment, and [`MechError::UnknownMaterial`] for an
    /// unregistered material.
    pub fn add_wall(&mut self, wall: Wall) -> crowd_types::Result<WallId> {
        wall.validate()?;
        self.stiffness.material(wall.material)?;
        let id = WallId::new(self.walls.len() as u64);
        self.walls.push(wall);
        Ok(id)
    }

    /// Look up an agent.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::UnknownAgent`] for an unregistered ID.
    pub fn agent(&self, id: AgentId) -> crowd_types::Result<&Agent> {
        self.agents.get(id.index()).ok_or(MechError::UnknownAgent(id))
    }

    /// All agents in ID order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// All walls in ID order.
    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Number of agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Number of walls.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// The stiffness table backing contact resolution.
    #[must_use]
    pub fn stiffness(&self) -> &StiffnessTable {
        &self.stiffness
    }

    /// Queue an external force and torque on an agent.
    ///
    /// The queue drains at the start of the next step, so external drive
    /// always combines with that step's contact forces rather than
    /// tearing a step in half.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::UnknownAgent`] for an unregistered ID.
    pub fn apply_force(
        &mut self,
        agent: AgentId,
        force: Vector2<f64>,
        torque: f64,
    ) -> crowd_types::Result<()> {
        self.agent(agent)?;
        self.pending.push(PendingForce {
            agent,
            force,
            torque,
        });
        Ok(())
    }

    /// Current simulation time in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Find all current overlaps: every unordered agent pair, then every
    /// agent against every wall, in ID order.
    #[must_use]
    pub fn detect_contacts(&self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for i in 0..self.agents.len() {
            for j in (i + 1)..self.agents.len() {
                let (a, b) = (&self.agents[i], &self.agents[j]);
                if let Some(contact) = agent_agent_contact(
                    a.id,
                    &a.shape,
                    &a.state.pose,
                    b.id,
                    &b.shape,
                    &b.state.pose,
                ) {
                    contacts.push(contact);
                }
            }
        }
        for agent in &self.agents {
            for (index, wall) in self.walls.iter().enumerate() {
                if let Some(contact) = agent_wall_contact(
                    agent.id,
                    &agent.shape,
                    &agent.state.pose,
                    WallId::new(index as u64),
                    wall,
                ) {
                    contacts.push(contact);
                }
            }
        }
        contacts
    }

    /// Detect contacts and accumulate the resulting forces.
    ///
    /// Forces for every contact are evaluated against the same pre-step
    /// snapshot before any accumulator changes, so resolution order
    /// cannot leak into the physics. Agent-agent contacts load both
    /// sides with equal and opposite forces at the shared contact point;
    /// wall contacts load the agent only. Returns the contact count.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::UnknownMaterial`] if a contact references a
    /// material missing from the stiffness table.
    pub fn solve_contacts(
        &mut self,
        model: &ContactModel,
        dt: f64,
    ) -> crowd_types::Result<usize> {
        let contacts = self.detect_contacts();

        let mut resolved: Vec<(usize, ContactForce)> = Vec::with_capacity(contacts.len() * 2);
        for contact in &contacts {
            let agent = &self.agents[contact.agent.index()];
            let (partner_material, partner_velocity, partner_index) = match contact.partner {
                ContactPartner::Agent(id) => {
                    let partner = &self.agents[id.index()];
                    (
                        partner.material,
                        partner.state.velocity_at_point(&contact.position),
                        Some(id.index()),
                    )
                }
                ContactPartner::Wall(id) => {
                    (self.walls[id.index()].material, Vector2::zeros(), None)
                }
            };
            let stiffness = self.stiffness.get(agent.material, partner_material)?;
            let relative_velocity =
                agent.state.velocity_at_point(&contact.position) - partner_velocity;
            let force = model.compute_force(contact, &relative_velocity, stiffness, dt);

            resolved.push((contact.agent.index(), force));
            if let Some(j) = partner_index {
                resolved.push((
                    j,
                    ContactForce {
                        normal: -force.normal,
                        tangential: -force.tangential,
                        position: force.position,
                    },
                ));
            }
        }

        for (index, force) in resolved {
            let position = force.position;
            self.agents[index].apply_force_at_point(force.total(), &position);
        }

        Ok(contacts.len())
    }

    /// Check that every agent state is finite.
    ///
    /// # Errors
    ///
    /// Returns [`MechError::Diverged`] naming the first offending agent
    /// and the given step index.
    pub fn validate_state(&self, step: u64) -> crowd_types::Result<()> {
        for agent in &self.agents {
            if !agent.state.is_finite() {
                return Err(MechError::diverged(agent.id, step, "non-finite state"));
            }
        }
        Ok(())
    }

    /// Record one sample per agent, in ascending ID order, at the
    /// current simulation time.
    pub fn emit_samples<S: TrajectorySink + ?Sized>(&self, sink: &mut S) {
        for agent in &self.agents {
            sink.record(TrajectorySample::from_state(
                agent.id,
                self.time,
                &agent.state,
            ));
        }
    }

    /// Total kinetic energy, translational plus rotational (J).
    #[must_use]
    pub fn total_kinetic_energy(&self) -> f64 {
        self.agents
            .iter()
            .map(|a| a.state.twist.kinetic_energy(a.mass.mass, a.mass.inertia))
            .sum()
    }

    /// Total linear momentum (kg m/s).
    #[must_use]
    pub fn total_linear_momentum(&self) -> Vector2<f64> {
        self.agents
            .iter()
            .map(|a| a.state.twist.linear * a.mass.mass)
            .sum()
    }

    pub(crate) fn clear_forces(&mut self) {
        for agent in &mut self.agents {
            agent.clear_forces();
        }
    }

    pub(crate) fn drain_pending(&mut self) {
        for pending in self.pending.drain(..) {
            self.agents[pending.agent.index()]
                .apply_central_force(pending.force, pending.torque);
        }
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub(crate) fn advance_time(&mut self, dt: f64) {
        self.time += dt;
        self.steps += 1;
    }
}
