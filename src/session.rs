// Host-facing trail session: sample callback, repaint timer, render entry.
use log::{debug, info};

use crate::buffer::TrailBuffer;
use crate::config::ConfigSource;
use crate::ingest::{ingest_sample, IngestOutcome};
use crate::renderer::{FrameOutcome, RenderStats, TrailRenderer};
use crate::surface::Surface;
use crate::types::TrailPoint;

/// One active trail, from pointer-watch start to teardown.
///
/// Hosts call [`push_sample`](Self::push_sample) from their pointer watch,
/// [`tick`](Self::tick) from a periodic timer to decide whether to queue a
/// repaint, and [`render`](Self::render) from the repaint handler.
pub struct TrailSession<C: ConfigSource> {
    config: C,
    buffer: TrailBuffer,
    renderer: TrailRenderer,
    repaint_pending: bool,
    samples: u64,
}

impl<C: ConfigSource> TrailSession<C> {
    pub fn new(config: C) -> Self {
        let snapshot = config.current();
        info!(
            "Trail session started (mode={}, fade={}ms, width={}px)",
            snapshot.render_mode, snapshot.fade_duration_ms, snapshot.line_width
        );
        Self {
            config,
            buffer: TrailBuffer::new(),
            renderer: TrailRenderer::new(),
            repaint_pending: false,
            samples: 0,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn push_sample(&mut self, x: f64, y: f64, now: f64) -> IngestOutcome {
        let line_width = self.config.current().line_width();
        let outcome = ingest_sample(&mut self.buffer, x, y, now, line_width);
        self.samples += 1;
        self.repaint_pending = true;
        outcome
    }

    /// Repaint-timer callback. True if the host should queue a repaint.
    ///
    /// A trail keeps fading without new samples, so any buffered geometry, or
    /// geometry drawn by the previous frame, asks for another frame.
    pub fn tick(&self) -> bool {
        self.repaint_pending || !self.buffer.is_idle()
    }

    pub fn repaint_pending(&self) -> bool {
        self.repaint_pending
    }

    /// Draws the current trail on `surface` and prunes expired samples.
    pub fn render(&mut self, surface: &mut dyn Surface, now: f64) -> FrameOutcome {
        let config = self.config.current();
        let outcome = self.renderer.render(&mut self.buffer, &config, now, surface);
        if !matches!(outcome, FrameOutcome::Aborted { .. }) {
            self.repaint_pending = false;
        }
        outcome
    }

    /// Drops every buffered point. Nothing outlives the session.
    pub fn clear(&mut self) {
        let stats = self.renderer.stats();
        debug!(
            "Trail session cleared after {} samples ({} drawn, {} skipped, {} aborted frames)",
            self.samples, stats.frames_drawn, stats.frames_skipped, stats.frames_aborted
        );
        self.buffer.clear();
        self.repaint_pending = false;
    }

    pub fn points(&self) -> &[TrailPoint] {
        self.buffer.as_slice()
    }

    pub fn stats(&self) -> RenderStats {
        self.renderer.stats()
    }
}
