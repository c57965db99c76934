//! Narrow-phase contact geometry.
//!
//! Every supported shape reduces to a segment swept by a radius: a
//! capsule is its core segment, a disc is the degenerate segment of zero
//! length, and a wall is a bare segment of zero radius. All pair tests
//! therefore share one primitive, the closest points between two
//! segments, and overlap falls out of comparing that distance against the
//! summed radii.

use nalgebra::{Point2, Unit, Vector2};

use crowd_types::{AgentId, AgentShape, Pose2, Wall, WallId};

use crate::{Contact, ContactPartner};

/// Below this separation the closest points are treated as coincident
/// and a deterministic fallback normal is used.
const COINCIDENT_EPS: f64 = 1e-12;

/// Closest point to `p` on the segment `[a, b]`.
#[must_use]
pub fn closest_point_on_segment(
    p: &Point2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>,
) -> Point2<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= COINCIDENT_EPS * COINCIDENT_EPS {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest pair of points between segments `[p1, q1]` and `[p2, q2]`.
///
/// Handles degenerate (zero-length) segments on either side, so the same
/// routine serves disc-disc, disc-capsule, capsule-capsule, and
/// body-wall queries.
#[must_use]
pub fn closest_points_between_segments(
    p1: &Point2<f64>,
    q1: &Point2<f64>,
    p2: &Point2<f64>,
    q2: &Point2<f64>,
) -> (Point2<f64>, Point2<f64>) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let eps = COINCIDENT_EPS * COINCIDENT_EPS;
    if a <= eps && e <= eps {
        return (*p1, *p2);
    }

    let (s, t) = if a <= eps {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= eps {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            // Parallel segments leave s free; pinning it to 0 keeps the
            // result deterministic.
            let mut s = if denom.abs() > eps {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t_unclamped = (b * s + f) / e;
            let t = if t_unclamped < 0.0 {
                s = (-c / a).clamp(0.0, 1.0);
                0.0
            } else if t_unclamped > 1.0 {
                s = ((b - c) / a).clamp(0.0, 1.0);
                1.0
            } else {
                t_unclamped
            };
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Core segment of a shape in world coordinates.
///
/// A disc collapses to the degenerate segment at its center; a capsule's
/// long axis (body-frame `+x`) is rotated by the pose.
#[must_use]
pub fn shape_segment(shape: &AgentShape, pose: &Pose2) -> (Point2<f64>, Point2<f64>) {
    match *shape {
        AgentShape::Disc { .. } => (pose.position, pose.position),
        AgentShape::Capsule { half_length, .. } => {
            let axis = pose.transform_vector(&Vector2::new(half_length, 0.0));
            (pose.position - axis, pose.position + axis)
        }
    }
}

/// Test two agents for overlap.
///
/// Returns a [`Contact`] owned by agent `a`, with the normal pointing
/// from `b` toward `a` and the contact point at the midpoint of the
/// overlap band. Touching exactly (separation equal to the summed radii)
/// does not count as contact.
#[must_use]
pub fn agent_agent_contact(
    id_a: AgentId,
    shape_a: &AgentShape,
    pose_a: &Pose2,
    id_b: AgentId,
    shape_b: &AgentShape,
    pose_b: &Pose2,
) -> Option<Contact> {
    let (a0, a1) = shape_segment(shape_a, pose_a);
    let (b0, b1) = shape_segment(shape_b, pose_b);
    let (pa, pb) = closest_points_between_segments(&a0, &a1, &b0, &b1);

    let delta = pa - pb;
    let distance = delta.norm();
    let sum_radii = shape_a.radius() + shape_b.radius();
    if distance >= sum_radii {
        return None;
    }

    let normal = Unit::try_new(delta, COINCIDENT_EPS).unwrap_or_else(Vector2::x_axis);
    let depth = sum_radii - distance;
    let position = pa - normal.into_inner() * (shape_a.radius() - 0.5 * depth);

    Some(Contact {
        agent: id_a,
        partner: ContactPartner::Agent(id_b),
        position,
        normal,
        depth,
    })
}

/// Test an agent against a wall segment.
///
/// The normal points from the wall toward the agent. If the agent's core
/// lands exactly on the wall line the normal falls back to the wall's
/// left-hand perpendicular, so the outcome stays deterministic.
#[must_use]
pub fn agent_wall_contact(
    id: AgentId,
    shape: &AgentShape,
    pose: &Pose2,
    wall_id: WallId,
    wall: &Wall,
) -> Option<Contact> {
    let (s0, s1) = shape_segment(shape, pose);
    let (pb, pw) = closest_points_between_segments(&s0, &s1, &wall.start, &wall.end);

    let delta = pb - pw;
    let distance = delta.norm();
    let radius = shape.radius();
    if distance >= radius {
        return None;
    }

    let normal = Unit::try_new(delta, COINCIDENT_EPS).unwrap_or_else(|| {
        let dir = wall.direction();
        Unit::new_unchecked(Vector2::new(-dir.y, dir.x))
    });
    let depth = radius - distance;
    let position = pw - normal.into_inner() * (0.5 * depth);

    Some(Contact {
        agent: id,
        partner: ContactPartner::Wall(wall_id),
        position,
        normal,
        depth,
    })
}
