// Per-frame render pass: strategy selection, geometry, gradients, pruning.
use log::{trace, warn};

use crate::alpha::{AlphaModel, BoundaryRole};
use crate::buffer::TrailBuffer;
use crate::config::RenderConfig;
use crate::constants::{DIRECTION_CHANGE_THRESHOLD, MIN_DRAWABLE_POINTS, TANGENT_SCALE};
use crate::curve::{
    curve_edge_count, fit_curve_edge, fit_run_curves, fit_run_lines, EdgeShape, FittedEdge,
};
use crate::error::Result;
use crate::segment::segment_by_direction;
use crate::surface::{LinearGradient, Paint, Surface};
use crate::types::{RenderMode, Rgb, Segment, TrailPoint};

#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Neither this frame nor the previous one had enough points.
    Skipped,
    /// Too few points to draw, but the previous frame drew something the
    /// host has to repaint over.
    Cleared,
    Drawn { strokes: usize },
    /// The surface failed mid-frame; the strokes before the failure were
    /// emitted. The buffer was still pruned.
    Aborted { strokes: usize, reason: String },
}

impl FrameOutcome {
    pub fn needs_repaint(&self) -> bool {
        !matches!(self, FrameOutcome::Skipped)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderStats {
    pub frames_drawn: u64,
    pub frames_skipped: u64,
    pub frames_aborted: u64,
}

#[derive(Debug, Default)]
pub struct TrailRenderer {
    stats: RenderStats,
}

impl TrailRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Draws `buffer` as seen at `now`, then prunes expired points.
    ///
    /// Pruning runs after geometry has been read, whatever the surface did.
    /// Out-of-range config fields are clamped for the pass.
    pub fn render(
        &mut self,
        buffer: &mut TrailBuffer,
        config: &RenderConfig,
        now: f64,
        surface: &mut dyn Surface,
    ) -> FrameOutcome {
        let config = &config.sanitized();
        let outcome = if buffer.is_idle() {
            FrameOutcome::Skipped
        } else if buffer.len() < MIN_DRAWABLE_POINTS {
            FrameOutcome::Cleared
        } else {
            let mut strokes = 0;
            match draw_trail(buffer, config, now, surface, &mut strokes) {
                Ok(()) => FrameOutcome::Drawn { strokes },
                Err(e) => {
                    warn!("Trail frame aborted after {} strokes: {}", strokes, e);
                    FrameOutcome::Aborted {
                        strokes,
                        reason: e.to_string(),
                    }
                }
            }
        };

        let removed = buffer.prune(now, config.fade_duration());

        match outcome {
            FrameOutcome::Skipped => self.stats.frames_skipped += 1,
            FrameOutcome::Aborted { .. } => self.stats.frames_aborted += 1,
            _ => self.stats.frames_drawn += 1,
        }
        trace!(
            "frame mode={} outcome={:?} pruned={} remaining={}",
            config.render_mode,
            outcome,
            removed,
            buffer.len()
        );
        outcome
    }
}

fn draw_trail(
    buffer: &TrailBuffer,
    config: &RenderConfig,
    now: f64,
    surface: &mut dyn Surface,
    strokes: &mut usize,
) -> Result<()> {
    let line_width = config.line_width();
    surface.set_line_width(line_width)?;
    if let Some(bb) = buffer.bounding_box(line_width) {
        surface.clip(&bb)?;
    }

    let pass = Pass {
        points: buffer.as_slice(),
        fresh_head: buffer.has_fresh_head(),
        alpha: AlphaModel::new(config, now),
        color: config.color,
    };

    match config.render_mode {
        RenderMode::Precise => pass.draw_edges(surface, strokes),
        RenderMode::Balance => pass.draw_runs(surface, strokes, |points, run| {
            fit_run_curves(points, run, TANGENT_SCALE)
        }),
        RenderMode::Fast => pass.draw_runs(surface, strokes, fit_run_lines),
    }
}

struct Pass<'a> {
    points: &'a [TrailPoint],
    fresh_head: bool,
    alpha: AlphaModel,
    color: Rgb,
}

impl Pass<'_> {
    /// One path and one gradient per edge.
    fn draw_edges(&self, surface: &mut dyn Surface, strokes: &mut usize) -> Result<()> {
        for i in 0..curve_edge_count(self.points.len()) {
            if let Some(edge) = fit_curve_edge(self.points, i, TANGENT_SCALE, None) {
                self.stroke_edges(surface, std::slice::from_ref(&edge))?;
                *strokes += 1;
            }
        }
        Ok(())
    }

    /// One path and one gradient per direction run.
    fn draw_runs<F>(&self, surface: &mut dyn Surface, strokes: &mut usize, fit: F) -> Result<()>
    where
        F: Fn(&[TrailPoint], &Segment) -> Vec<FittedEdge>,
    {
        for run in segment_by_direction(self.points, DIRECTION_CHANGE_THRESHOLD) {
            let edges = fit(self.points, &run);
            if edges.is_empty() {
                continue;
            }
            self.stroke_edges(surface, &edges)?;
            *strokes += 1;
        }
        Ok(())
    }

    /// Strokes consecutive `edges` as a single path whose gradient runs from
    /// the first edge's start to the last edge's end.
    ///
    /// Both boundary alphas measure speed towards the raw sample after the
    /// boundary, so a stroke ending at a point and the stroke starting there
    /// share that point's alpha even when the later one ends at the tip.
    fn stroke_edges(&self, surface: &mut dyn Surface, edges: &[FittedEdge]) -> Result<()> {
        let (first, last) = match (edges.first(), edges.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Ok(()),
        };

        let start_role = if first.index == 0 && self.fresh_head {
            BoundaryRole::FreshHead
        } else {
            BoundaryRole::Interior
        };
        let end_role = if last.ends_trail {
            BoundaryRole::Tip
        } else {
            BoundaryRole::Interior
        };
        let start_next = self.points.get(first.index + 1);
        let start_alpha = self.alpha.boundary_alpha(&first.start, start_next, start_role);
        let end_alpha = self
            .alpha
            .boundary_alpha(&last.end, last.lookahead.as_ref(), end_role);

        surface.new_path()?;
        surface.move_to(first.start.position())?;
        for edge in edges {
            match edge.shape {
                EdgeShape::Curve { cp1, cp2 } => {
                    surface.curve_to(cp1, cp2, edge.end.position())?
                }
                EdgeShape::Line => surface.line_to(edge.end.position())?,
            }
        }
        surface.stroke(&self.paint(&first.start, &last.end, start_alpha, end_alpha))
    }

    fn paint(&self, from: &TrailPoint, to: &TrailPoint, start_alpha: f64, end_alpha: f64) -> Paint {
        let start = self.color.with_alpha(start_alpha);
        let end = self.color.with_alpha(end_alpha);
        // A zero-length gradient axis is undefined on most canvases.
        if from.same_position(to.x, to.y) {
            Paint::Solid(start)
        } else {
            Paint::Linear(LinearGradient {
                from: from.position(),
                to: to.position(),
                start,
                end,
            })
        }
    }
}
