// Sample ingestion: deduplication followed by a 3-tap jitter filter.
use crate::buffer::TrailBuffer;
use crate::types::TrailPoint;

/// What a single sample did to the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Same position as the newest point; only its timestamp moved.
    Refreshed,
    /// Appended; the previous point was averaged with its neighbours.
    Smoothed,
    /// Appended; the previous point was dropped as redundant.
    Merged,
    /// Appended without filtering (fewer than three points).
    Appended,
}

/// Feeds one pointer position into `buffer`.
///
/// `now` is clamped to the newest buffered timestamp so the buffer stays
/// non-decreasing in time even if the host clock stutters.
pub fn ingest_sample(
    buffer: &mut TrailBuffer,
    x: f64,
    y: f64,
    now: f64,
    line_width: f64,
) -> IngestOutcome {
    let now = match buffer.last() {
        Some(last) if now < last.t => last.t,
        _ => now,
    };

    if let Some(last) = buffer.last_mut() {
        if last.same_position(x, y) {
            last.t = now;
            return IngestOutcome::Refreshed;
        }
    }

    buffer.push(TrailPoint::new(x, y, now));
    apply_jitter_filter(buffer, line_width)
}

/// Looks at the newest three points `prev, cur, next`.
///
/// If `prev` and `next` are closer than one stroke width, `cur` carries no
/// visible detail and is removed. Otherwise `cur` is replaced by the mean of
/// the three, timestamp included.
fn apply_jitter_filter(buffer: &mut TrailBuffer, line_width: f64) -> IngestOutcome {
    let (prev, next) = match buffer.tail_mut(3) {
        Some(tail) => (tail[0], tail[2]),
        None => return IngestOutcome::Appended,
    };

    if prev.distance_squared_to(&next) < line_width * line_width {
        buffer.remove_second_to_last();
        return IngestOutcome::Merged;
    }

    if let Some(tail) = buffer.tail_mut(3) {
        tail[1] = TrailPoint::average3(&tail[0], &tail[1], &tail[2]);
    }
    IngestOutcome::Smoothed
}
