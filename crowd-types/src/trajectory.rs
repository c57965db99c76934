//! Trajectory sampling.
//!
//! A simulation run communicates with the outside world through a stream
//! of flat per-agent rows: one [`TrajectorySample`] per agent per emitted
//! step. Anything that wants the stream implements [`TrajectorySink`];
//! [`TrajectoryBuffer`] is the in-memory implementation used by tests and
//! by callers that post-process a whole run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AgentId, AgentState};

/// One row of trajectory output: the full scalar state of one agent at
/// one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectorySample {
    /// Agent the row belongs to.
    pub agent: AgentId,
    /// Simulation time in seconds.
    pub t: f64,
    /// Center-of-mass x coordinate (m).
    pub x: f64,
    /// Center-of-mass y coordinate (m).
    pub y: f64,
    /// Orientation angle (rad).
    pub theta: f64,
    /// Linear velocity x component (m/s).
    pub vx: f64,
    /// Linear velocity y component (m/s).
    pub vy: f64,
    /// Angular velocity (rad/s).
    pub omega: f64,
}

impl TrajectorySample {
    /// Column names, in row order.
    pub const CSV_HEADER: &'static str = "agent_id,t,x,y,theta,vx,vy,omega";

    /// Build a sample from an agent's kinematic state.
    #[must_use]
    pub fn from_state(agent: AgentId, t: f64, state: &AgentState) -> Self {
        Self {
            agent,
            t,
            x: state.pose.position.x,
            y: state.pose.position.y,
            theta: state.pose.theta,
            vx: state.twist.linear.x,
            vy: state.twist.linear.y,
            omega: state.twist.angular,
        }
    }

    /// Render the sample as a CSV row matching [`Self::CSV_HEADER`].
    #[must_use]
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.agent.raw(),
            self.t,
            self.x,
            self.y,
            self.theta,
            self.vx,
            self.vy,
            self.omega
        )
    }

    /// Linear speed (m/s).
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Receiver for the sample stream produced by a run.
pub trait TrajectorySink {
    /// Record one sample.
    fn record(&mut self, sample: TrajectorySample);
}

impl TrajectorySink for Vec<TrajectorySample> {
    fn record(&mut self, sample: TrajectorySample) {
        self.push(sample);
    }
}

/// In-memory sample store with per-agent queries.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryBuffer {
    samples: Vec<TrajectorySample>,
}

impl TrajectoryBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` samples.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// All samples in recording order.
    #[must_use]
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Samples belonging to one agent, in recording (time) order.
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &TrajectorySample> {
        self.samples.iter().filter(move |s| s.agent == agent)
    }

    /// Number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all recorded samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl TrajectorySink for TrajectoryBuffer {
    fn record(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }
}
