//! Documented constants for trail buffering and rendering.
//!
//! Values match the behaviour of the desktop pointer-trail effect: a 20 ms
//! sampling/repaint cadence, a few hundred milliseconds of visible trail and
//! strokes a handful of pixels wide.

use std::f64::consts::FRAC_PI_4;

// ============================================================================
// Buffer
// ============================================================================

/// Fewest buffered points that produce any drawable geometry.
///
/// Curve fitting needs a leading point, a trailing point and the tapered tip
/// averaged from the last three samples, so two points never draw.
pub const MIN_DRAWABLE_POINTS: usize = 3;

/// Once the logical start cursor passes this many dead slots the backing
/// storage is compacted.
pub const COMPACT_THRESHOLD: usize = 64;

// ============================================================================
// Segmentation
// ============================================================================

/// Heading change (radians) that closes a direction run.
///
/// A single linear gradient stays visually correct across gentle bends; past
/// 45 degrees the colour stops no longer follow the stroke.
pub const DIRECTION_CHANGE_THRESHOLD: f64 = FRAC_PI_4;

// ============================================================================
// Curve fitting
// ============================================================================

/// Catmull-Rom to cubic Bezier tangent scale (uniform parameterisation).
pub const TANGENT_SCALE: f64 = 1.0 / 6.0;

/// Curve segments flattened by the raster surface per 4 px of chord length.
pub const FLATTEN_PX_PER_STEP: f64 = 4.0;

/// Bounds for the number of flattening steps per cubic.
pub const FLATTEN_MIN_STEPS: usize = 4;
pub const FLATTEN_MAX_STEPS: usize = 64;

// ============================================================================
// Alpha compositing
// ============================================================================

/// Reference speed for the speed cap, in pixels per second per pixel of
/// stroke width.
///
/// An edge travelled at `600 * line_width` px/s or faster is not thinned; a
/// slower edge is faded proportionally so densely packed samples of a slow
/// pointer do not pile up into a solid blob.
pub const SPEED_REFERENCE_PX_PER_SEC: f64 = 600.0;

// ============================================================================
// Host cadence
// ============================================================================

/// Nominal interval of the host's repaint timer.
pub const TICK_INTERVAL_MS: u32 = 20;

// ============================================================================
// Configuration defaults and bounds
// ============================================================================

pub const DEFAULT_FADE_DURATION_MS: u32 = 200;
pub const DEFAULT_LINE_WIDTH: u32 = 8;
pub const DEFAULT_ALPHA: f64 = 0.5;
/// Info level by default.
pub const DEFAULT_LOG_LEVEL: i32 = 3;

pub const MIN_FADE_DURATION_MS: u32 = 1;
pub const MAX_FADE_DURATION_MS: u32 = 60_000;
pub const MIN_LINE_WIDTH: u32 = 1;
pub const MAX_LINE_WIDTH: u32 = 512;
