use crate::error::Result;
use crate::types::{BoundingBox, CDrawCommand, CDrawKind, Rgba, Vec2};

/// Two-stop linear gradient from `from` (offset 0) to `to` (offset 1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: Vec2,
    pub to: Vec2,
    pub start: Rgba,
    pub end: Rgba,
}

impl LinearGradient {
    /// Colour at `p`, projecting onto the gradient axis and clamping.
    pub fn color_at(&self, p: Vec2) -> Rgba {
        let axis = self.to.sub(self.from);
        let len2 = axis.length_squared();
        if len2 <= f64::EPSILON {
            return self.start;
        }
        let t = (p.sub(self.from).dot(axis) / len2).clamp(0.0, 1.0);
        self.start.lerp(&self.end, t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl Paint {
    pub fn max_alpha(&self) -> f64 {
        match self {
            Paint::Solid(c) => c.a,
            Paint::Linear(g) => g.start.a.max(g.end.a),
        }
    }
}

/// Path/stroke sink the renderer draws into.
///
/// Any method may fail; the renderer then abandons the rest of the frame.
pub trait Surface {
    fn set_line_width(&mut self, width: f64) -> Result<()>;

    /// Restricts drawing to `rect`. Surfaces without clipping ignore it.
    fn clip(&mut self, _rect: &BoundingBox) -> Result<()> {
        Ok(())
    }

    fn new_path(&mut self) -> Result<()>;
    fn move_to(&mut self, p: Vec2) -> Result<()>;
    fn line_to(&mut self, p: Vec2) -> Result<()>;
    fn curve_to(&mut self, cp1: Vec2, cp2: Vec2, to: Vec2) -> Result<()>;

    /// Strokes and consumes the current path.
    fn stroke(&mut self, paint: &Paint) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    SetLineWidth(f64),
    Clip(BoundingBox),
    NewPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    CurveTo { cp1: Vec2, cp2: Vec2, to: Vec2 },
    Stroke(Paint),
}

impl DrawCommand {
    pub fn to_ffi(&self) -> CDrawCommand {
        let rgba = |c: &Rgba| [c.r, c.g, c.b, c.a];
        let mut out = CDrawCommand {
            kind: CDrawKind::NewPath,
            v: [0.0; 6],
            rgba_start: [0.0; 4],
            rgba_end: [0.0; 4],
        };
        match self {
            DrawCommand::SetLineWidth(w) => {
                out.kind = CDrawKind::SetLineWidth;
                out.v[0] = *w;
            }
            DrawCommand::Clip(bb) => {
                out.kind = CDrawKind::Clip;
                out.v[..4].copy_from_slice(&[bb.min_x, bb.min_y, bb.max_x, bb.max_y]);
            }
            DrawCommand::NewPath => {}
            DrawCommand::MoveTo(p) => {
                out.kind = CDrawKind::MoveTo;
                out.v[..2].copy_from_slice(&[p.x, p.y]);
            }
            DrawCommand::LineTo(p) => {
                out.kind = CDrawKind::LineTo;
                out.v[..2].copy_from_slice(&[p.x, p.y]);
            }
            DrawCommand::CurveTo { cp1, cp2, to } => {
                out.kind = CDrawKind::CurveTo;
                out.v = [cp1.x, cp1.y, cp2.x, cp2.y, to.x, to.y];
            }
            DrawCommand::Stroke(Paint::Solid(c)) => {
                out.kind = CDrawKind::StrokeSolid;
                out.rgba_start = rgba(c);
                out.rgba_end = rgba(c);
            }
            DrawCommand::Stroke(Paint::Linear(g)) => {
                out.kind = CDrawKind::StrokeGradient;
                out.v[..4].copy_from_slice(&[g.from.x, g.from.y, g.to.x, g.to.y]);
                out.rgba_start = rgba(&g.start);
                out.rgba_end = rgba(&g.end);
            }
        }
        out
    }
}

/// Surface that records every call, for hosts that replay commands on their
/// own canvas.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Paint> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Stroke(paint) => Some(paint),
            _ => None,
        })
    }

    pub fn curve_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::CurveTo { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::LineTo(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn set_line_width(&mut self, width: f64) -> Result<()> {
        self.commands.push(DrawCommand::SetLineWidth(width));
        Ok(())
    }

    fn clip(&mut self, rect: &BoundingBox) -> Result<()> {
        self.commands.push(DrawCommand::Clip(*rect));
        Ok(())
    }

    fn new_path(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::NewPath);
        Ok(())
    }

    fn move_to(&mut self, p: Vec2) -> Result<()> {
        self.commands.push(DrawCommand::MoveTo(p));
        Ok(())
    }

    fn line_to(&mut self, p: Vec2) -> Result<()> {
        self.commands.push(DrawCommand::LineTo(p));
        Ok(())
    }

    fn curve_to(&mut self, cp1: Vec2, cp2: Vec2, to: Vec2) -> Result<()> {
        self.commands.push(DrawCommand::CurveTo { cp1, cp2, to });
        Ok(())
    }

    fn stroke(&mut self, paint: &Paint) -> Result<()> {
        self.commands.push(DrawCommand::Stroke(*paint));
        Ok(())
    }
}
