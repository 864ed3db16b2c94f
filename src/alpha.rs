use crate::config::RenderConfig;
use crate::constants::SPEED_REFERENCE_PX_PER_SEC;
use crate::types::TrailPoint;

/// Extra cap applied to a boundary depending on where it sits in the trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryRole {
    Interior,
    /// Oldest point of a trail that has not been pruned yet.
    FreshHead,
    /// Last boundary of the trail; always fully transparent.
    Tip,
}

/// Per-frame opacity model.
///
/// A boundary's opacity is the minimum of three caps, clamped to `[0, 1]`,
/// then scaled by the configured global alpha:
/// - a triangular fade envelope over the point's age, peaking at half the
///   fade duration;
/// - the terminal cap from [`BoundaryRole`];
/// - a speed cap that thins edges travelled slowly relative to stroke width.
#[derive(Clone, Copy, Debug)]
pub struct AlphaModel {
    now: f64,
    fade_duration: f64,
    line_width: f64,
    global_alpha: f64,
}

impl AlphaModel {
    pub fn new(config: &RenderConfig, now: f64) -> Self {
        Self {
            now,
            fade_duration: config.fade_duration(),
            line_width: config.line_width(),
            global_alpha: unit(config.alpha),
        }
    }

    pub fn fade_envelope(&self, point: &TrailPoint) -> f64 {
        let progress = (self.now - point.t) / self.fade_duration;
        (2.0 * progress).min(1.0 - progress)
    }

    /// Distance over time between `from` and `to`, relative to the reference
    /// speed for the current stroke width. Not limiting when no time elapsed.
    pub fn speed_cap(&self, from: &TrailPoint, to: &TrailPoint) -> f64 {
        let dt = to.t - from.t;
        if dt <= 0.0 {
            return 1.0;
        }
        let reference = SPEED_REFERENCE_PX_PER_SEC * self.line_width / 1000.0;
        from.distance_to(to) / dt / reference
    }

    pub fn boundary_alpha(
        &self,
        point: &TrailPoint,
        next: Option<&TrailPoint>,
        role: BoundaryRole,
    ) -> f64 {
        let terminal = match role {
            BoundaryRole::Interior => 1.0,
            BoundaryRole::FreshHead | BoundaryRole::Tip => 0.0,
        };
        let speed = next.map_or(1.0, |next| self.speed_cap(point, next));
        let raw = self.fade_envelope(point).min(terminal).min(speed);
        unit(raw) * self.global_alpha
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
