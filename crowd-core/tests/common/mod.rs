//! Shared checks for scenario tests.
//!
//! Every scenario produces one [`TrajectoryBuffer`] and then interrogates
//! it column-wise: per-agent time series of position, orientation, and
//! velocity. The helpers here keep the sanity checks (uniform sampling,
//! no teleporting) and the window/extremum queries in one place.
//!
//! # Tolerances
//!
//! - [`TIME_TOL`]: sample timestamps may wobble by accumulated rounding,
//!   never by a dropped or doubled step.
//! - [`MAX_SPATIAL_JUMP`]: at the speeds these scenarios run, a meter
//!   between consecutive samples means the integrator blew up.
//! - [`STATE_TOL`]: band for components that should be zero or frozen.
//! - [`JOSTLE_TOL`]: band for bodies that may be bumped but must not be
//!   carried away.

#![allow(dead_code)] // each scenario binary uses its own subset

use crowd_core::{AgentId, TrajectoryBuffer, TrajectorySample};

/// Allowed deviation of consecutive sample spacing from the timestep (s).
pub const TIME_TOL: f64 = 1e-4;

/// Largest believable center-of-mass move between samples (m).
pub const MAX_SPATIAL_JUMP: f64 = 1.0;

/// Band for components expected to stay at rest or unchanged.
pub const STATE_TOL: f64 = 1e-2;

/// Band for bodies allowed to be jostled in place.
pub const JOSTLE_TOL: f64 = 0.5;

/// All samples for one agent, in time order.
pub fn samples_for(buffer: &TrajectoryBuffer, agent: AgentId) -> Vec<TrajectorySample> {
    buffer.for_agent(agent).copied().collect()
}

/// Samples for one agent restricted to `t0 <= t <= t1`.
pub fn window(samples: &[TrajectorySample], t0: f64, t1: f64) -> Vec<TrajectorySample> {
    samples
        .iter()
        .copied()
        .filter(|s| s.t >= t0 && s.t <= t1)
        .collect()
}

/// Samples at or after `t_start`.
pub fn tail_from(samples: &[TrajectorySample], t_start: f64) -> Vec<TrajectorySample> {
    samples.iter().copied().filter(|s| s.t >= t_start).collect()
}

/// Spread (max minus min) of one column.
pub fn spread<F: Fn(&TrajectorySample) -> f64>(samples: &[TrajectorySample], column: F) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for sample in samples {
        let value = column(sample);
        min = min.min(value);
        max = max.max(value);
    }
    max - min
}

/// Largest absolute value of one column.
pub fn max_abs<F: Fn(&TrajectorySample) -> f64>(samples: &[TrajectorySample], column: F) -> f64 {
    samples
        .iter()
        .map(|s| column(s).abs())
        .fold(0.0, f64::max)
}

/// Every consecutive pair of samples must be one timestep apart.
pub fn assert_uniform_time_grid(samples: &[TrajectorySample], dt: f64) {
    assert!(samples.len() > 1, "scenario produced too few samples");
    for pair in samples.windows(2) {
        let spacing = pair[1].t - pair[0].t;
        assert!(
            (spacing - dt).abs() <= TIME_TOL,
            "sample spacing {spacing} deviates from dt = {dt} at t = {}",
            pair[0].t
        );
    }
}

/// No agent may move farther than [`MAX_SPATIAL_JUMP`] between samples.
pub fn assert_no_teleport(samples: &[TrajectorySample]) {
    for pair in samples.windows(2) {
        let jump = (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y);
        assert!(
            jump <= MAX_SPATIAL_JUMP,
            "agent {} jumped {jump} m between t = {} and t = {}",
            pair[0].agent,
            pair[0].t,
            pair[1].t
        );
    }
}
