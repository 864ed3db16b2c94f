use crate::constants::{COMPACT_THRESHOLD, MIN_DRAWABLE_POINTS};
use crate::types::{BoundingBox, TrailPoint};

/// Time-ordered pointer samples with a logical start cursor.
///
/// Pruning only advances `start`; the dead prefix is dropped in bulk once it
/// grows past [`COMPACT_THRESHOLD`], so steady-state pruning does not shift
/// the backing storage every frame.
#[derive(Clone, Debug, Default)]
pub struct TrailBuffer {
    points: Vec<TrailPoint>,
    start: usize,
    previous_len: usize,
    fresh_head: bool,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[TrailPoint] {
        &self.points[self.start..]
    }

    pub fn last(&self) -> Option<&TrailPoint> {
        self.as_slice().last()
    }

    pub fn last_mut(&mut self) -> Option<&mut TrailPoint> {
        self.points[self.start..].last_mut()
    }

    /// The newest `n` points, oldest first. `None` if fewer are buffered.
    pub fn tail_mut(&mut self, n: usize) -> Option<&mut [TrailPoint]> {
        let len = self.len();
        if len < n {
            return None;
        }
        let from = self.points.len() - n;
        Some(&mut self.points[from..])
    }

    pub fn push(&mut self, point: TrailPoint) {
        if self.is_empty() {
            self.fresh_head = true;
        }
        self.points.push(point);
    }

    /// Drops the second newest point, keeping the newest.
    pub fn remove_second_to_last(&mut self) -> Option<TrailPoint> {
        if self.len() < 2 {
            return None;
        }
        let idx = self.points.len() - 2;
        Some(self.points.remove(idx))
    }

    /// Keeps only points with `now - t < fade_duration`.
    ///
    /// Records the pre-prune length as the length seen by this frame and
    /// returns the number of removed points.
    pub fn prune(&mut self, now: f64, fade_duration: f64) -> usize {
        let before = self.len();
        self.previous_len = before;

        let is_live = |p: &TrailPoint| now - p.t < fade_duration;
        let expired_prefix = self.as_slice().iter().take_while(|p| !is_live(*p)).count();
        self.start += expired_prefix;

        // Timestamps are monotonic under normal operation, so the expired
        // points form a prefix. A host clock that jumped backwards can leave
        // stragglers behind.
        if !self.as_slice().iter().all(is_live) {
            self.compact();
            self.points.retain(is_live);
        }

        if self.start >= COMPACT_THRESHOLD && self.start * 2 >= self.points.len() {
            self.compact();
        }

        let removed = before - self.len();
        if removed > 0 {
            self.fresh_head = false;
        }
        removed
    }

    /// Buffer length observed by the most recent [`prune`](Self::prune).
    pub fn previous_len(&self) -> usize {
        self.previous_len
    }

    /// True when neither this frame nor the last one had anything to draw.
    pub fn is_idle(&self) -> bool {
        self.len() < MIN_DRAWABLE_POINTS && self.previous_len < MIN_DRAWABLE_POINTS
    }

    /// True while the oldest buffered point is the first sample of a trail
    /// that has not lost any point to pruning yet.
    pub fn has_fresh_head(&self) -> bool {
        self.fresh_head && !self.is_empty()
    }

    /// Bounds of all buffered points grown by `margin` on every side.
    pub fn bounding_box(&self, margin: f64) -> Option<BoundingBox> {
        let mut points = self.as_slice().iter();
        let first = points.next()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        let bb = points.fold(init, |bb, p| BoundingBox {
            min_x: bb.min_x.min(p.x),
            min_y: bb.min_y.min(p.y),
            max_x: bb.max_x.max(p.x),
            max_y: bb.max_y.max(p.y),
        });
        Some(bb.expand(margin))
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.start = 0;
        self.previous_len = 0;
        self.fresh_head = false;
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.points.drain(..self.start);
            self.start = 0;
        }
    }
}

impl<'a> IntoIterator for &'a TrailBuffer {
    type Item = &'a TrailPoint;
    type IntoIter = std::slice::Iter<'a, TrailPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}
