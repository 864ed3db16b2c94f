use std::f64::consts::{PI, TAU};

use crate::types::{Segment, TrailPoint};

/// Splits `points` into runs of roughly constant heading.
///
/// Edge `i` joins points `i` and `i + 1` and belongs to the run containing
/// index `i`. A run's heading is that of its first edge; when an edge turns
/// more than `threshold` radians away from it, the run closes just before
/// that edge and a new run starts at the edge's first point. The returned
/// ranges cover `0..points.len()` exactly, in order, without overlap.
pub fn segment_by_direction(points: &[TrailPoint], threshold: f64) -> Vec<Segment> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut runs = Vec::new();
    let mut run_start = 0;
    let mut run_heading: Option<f64> = None;

    for (i, pair) in points.windows(2).enumerate() {
        let heading = edge_heading(&pair[0], &pair[1]);
        match run_heading {
            None => run_heading = Some(heading),
            Some(h) if angular_difference(h, heading) > threshold => {
                runs.push(Segment::new(run_start, i - 1));
                run_start = i;
                run_heading = Some(heading);
            }
            Some(_) => {}
        }
    }

    runs.push(Segment::new(run_start, points.len() - 1));
    runs
}

pub fn edge_heading(from: &TrailPoint, to: &TrailPoint) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Smallest absolute difference between two angles, in `[0, PI]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI {
        TAU - d
    } else {
        d
    }
}
