//! Curve fitting for trail edges.
//!
//! Curve modes convert each Catmull-Rom span into one cubic Bezier. The
//! newest edge that gets drawn ends at the mean of the last three samples
//! instead of the second newest sample, which tapers the stroke into its tip
//! rather than overshooting toward the clamped final control point.

use crate::types::{Segment, TrailPoint, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeShape {
    Curve { cp1: Vec2, cp2: Vec2 },
    Line,
}

/// One drawable edge running from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedEdge {
    /// Buffer index of `start`.
    pub index: usize,
    pub start: TrailPoint,
    pub end: TrailPoint,
    /// Point after `end`, used for the end boundary's speed.
    pub lookahead: Option<TrailPoint>,
    /// True if `end` is the last boundary of the whole trail.
    pub ends_trail: bool,
    pub shape: EdgeShape,
}

impl FittedEdge {
    pub fn is_curve(&self) -> bool {
        matches!(self.shape, EdgeShape::Curve { .. })
    }
}

/// Bezier control points for the Catmull-Rom span `p1 -> p2`.
pub fn catmull_rom_to_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, k: f64) -> (Vec2, Vec2) {
    let cp1 = p1.add(p2.sub(p0).scale(k));
    let cp2 = p2.sub(p3.sub(p1).scale(k));
    (cp1, cp2)
}

/// Number of edges curve modes draw for `n` points.
///
/// The edge between the two newest samples is folded into the tapered tip.
pub fn curve_edge_count(n: usize) -> usize {
    n.saturating_sub(2)
}

/// Number of edges the straight-line mode draws for `n` points.
pub fn line_edge_count(n: usize) -> usize {
    n.saturating_sub(1)
}

/// Tapered tip: mean of the three newest points.
pub fn tapered_tip(points: &[TrailPoint]) -> Option<TrailPoint> {
    match points {
        [.., a, b, c] => Some(TrailPoint::average3(a, b, c)),
        _ => None,
    }
}

/// Fits the curve edge starting at buffer index `i`.
///
/// `tip` replaces the end point when `i` is the last curve edge. Passing
/// `None` recomputes it on the spot.
pub fn fit_curve_edge(
    points: &[TrailPoint],
    i: usize,
    k: f64,
    tip: Option<TrailPoint>,
) -> Option<FittedEdge> {
    let n = points.len();
    if i >= curve_edge_count(n) {
        return None;
    }

    let p0 = if i == 0 { points[i] } else { points[i - 1] };
    let p1 = points[i];
    let raw_p2 = points[i + 1];
    let p3 = points.get(i + 2).copied().unwrap_or(raw_p2);

    let ends_trail = i + 3 == n;
    let p2 = if ends_trail {
        tip.or_else(|| tapered_tip(points)).unwrap_or(raw_p2)
    } else {
        raw_p2
    };

    let (cp1, cp2) =
        catmull_rom_to_bezier(p0.position(), p1.position(), p2.position(), p3.position(), k);

    Some(FittedEdge {
        index: i,
        start: p1,
        end: p2,
        lookahead: if ends_trail { None } else { Some(p3) },
        ends_trail,
        shape: EdgeShape::Curve { cp1, cp2 },
    })
}

/// Curve edges owned by `run`, with the tip computed once for the run.
pub fn fit_run_curves(points: &[TrailPoint], run: &Segment, k: f64) -> Vec<FittedEdge> {
    let last_edge = match curve_edge_count(points.len()).checked_sub(1) {
        Some(last) => last,
        None => return Vec::new(),
    };
    let tip = if run.contains(last_edge) {
        tapered_tip(points)
    } else {
        None
    };

    (run.start..=run.end.min(last_edge))
        .filter_map(|i| fit_curve_edge(points, i, k, tip))
        .collect()
}

/// Straight edges owned by `run`.
pub fn fit_run_lines(points: &[TrailPoint], run: &Segment) -> Vec<FittedEdge> {
    let n = points.len();
    let last_edge = match line_edge_count(n).checked_sub(1) {
        Some(last) => last,
        None => return Vec::new(),
    };

    (run.start..=run.end.min(last_edge))
        .map(|i| {
            let ends_trail = i == last_edge;
            FittedEdge {
                index: i,
                start: points[i],
                end: points[i + 1],
                lookahead: points.get(i + 2).copied(),
                ends_trail,
                shape: EdgeShape::Line,
            }
        })
        .collect()
}
