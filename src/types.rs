use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrailError;

/// One buffered pointer sample.
///
/// `t` is the host timestamp in milliseconds. Points are stored in insertion
/// order, which is also temporal order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl TrailPoint {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Componentwise mean of three points, timestamp included.
    pub fn average3(a: &TrailPoint, b: &TrailPoint, c: &TrailPoint) -> TrailPoint {
        TrailPoint {
            x: (a.x + b.x + c.x) / 3.0,
            y: (a.y + b.y + c.y) / 3.0,
            t: (a.t + b.t + c.t) / 3.0,
        }
    }

    pub fn distance_to(&self, other: &TrailPoint) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &TrailPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn same_position(&self, x: f64, y: f64) -> bool {
        self.x == x && self.y == y
    }
}

impl From<CTrailPoint> for TrailPoint {
    fn from(p: CTrailPoint) -> Self {
        TrailPoint::new(p.x, p.y, p.timestamp_ms)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self.add(other.sub(self).scale(t))
    }
}

/// Straight RGB, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { r: self.r, g: self.g, b: self.b, a }
    }

    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f64; 3]> for Rgb {
    fn from(c: [f64; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        c.channels()
    }
}

/// Straight (not premultiplied) RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Geometry/gradient granularity used for a render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Per-edge curves, per-edge gradients, no segmentation.
    #[default]
    Precise,
    /// Curves grouped into direction runs, one gradient per run.
    Balance,
    /// Straight lines grouped into direction runs, one gradient per run.
    Fast,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Precise => "precise",
            RenderMode::Balance => "balance",
            RenderMode::Fast => "fast",
        }
    }

    pub fn from_ffi(value: i32) -> Option<RenderMode> {
        match value {
            0 => Some(RenderMode::Precise),
            1 => Some(RenderMode::Balance),
            2 => Some(RenderMode::Fast),
            _ => None,
        }
    }

    pub fn to_ffi(self) -> i32 {
        match self {
            RenderMode::Precise => 0,
            RenderMode::Balance => 1,
            RenderMode::Fast => 2,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = TrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precise" => Ok(RenderMode::Precise),
            "balance" => Ok(RenderMode::Balance),
            "fast" => Ok(RenderMode::Fast),
            other => Err(TrailError::InvalidConfig {
                field: "render-mode",
                reason: format!("unknown render mode {:?}", other),
            }),
        }
    }
}

/// Inclusive index range `[start, end]` into the trail buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx <= self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn expand(&self, by: f64) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }
}

// ============================================================================
// FFI mirrors
// ============================================================================

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CTrailPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
}

/// Render configuration passed from the host.
///
/// `render_mode`: 0 = precise, 1 = balance, 2 = fast.
/// `log_level`: 0=off, 1=error, 2=warn, 3=info, 4=debug, 5=trace.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CRenderConfig {
    pub fade_duration_ms: i32,
    pub line_width: i32,
    pub color_r: f64,
    pub color_g: f64,
    pub color_b: f64,
    pub alpha: f64,
    pub render_mode: i32,
    pub log_level: i32,
}

/// Tag for [`CDrawCommand`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CDrawKind {
    SetLineWidth = 0,
    Clip = 1,
    NewPath = 2,
    MoveTo = 3,
    LineTo = 4,
    CurveTo = 5,
    StrokeSolid = 6,
    StrokeGradient = 7,
}

/// Flattened drawing command.
///
/// Coordinate slots by kind:
/// - `SetLineWidth`: `v[0]` = width
/// - `Clip`: `v[0..4]` = min_x, min_y, max_x, max_y
/// - `MoveTo` / `LineTo`: `v[0..2]` = x, y
/// - `CurveTo`: `v[0..6]` = cp1, cp2, end
/// - `StrokeSolid`: `rgba_start`
/// - `StrokeGradient`: `v[0..4]` = from x/y, to x/y; `rgba_start`, `rgba_end`
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CDrawCommand {
    pub kind: CDrawKind,
    pub v: [f64; 6],
    pub rgba_start: [f64; 4],
    pub rgba_end: [f64; 4],
}

#[repr(C)]
pub struct CCommandList {
    pub commands: *mut CDrawCommand,
    pub len: usize,
}

impl CCommandList {
    pub fn empty() -> Self {
        CCommandList {
            commands: std::ptr::null_mut(),
            len: 0,
        }
    }
}
