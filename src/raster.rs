//! Software [`Surface`] backed by an `image::RgbaImage`.
//!
//! Paths are flattened to polylines and stroked with round caps and joins.
//! Each pixel takes the maximum coverage over all pieces of a path, so the
//! overlapping ends of adjacent pieces do not double the opacity of a
//! translucent stroke. Paint is evaluated at pixel centres and composited
//! over the existing contents with straight alpha.

use std::collections::BTreeMap;
use std::path::Path;

use image::{Rgba as Pixel, RgbaImage};
use log::debug;

use crate::constants::{FLATTEN_MAX_STEPS, FLATTEN_MIN_STEPS, FLATTEN_PX_PER_STEP};
use crate::error::{Result, TrailError};
use crate::surface::{Paint, Surface};
use crate::types::{BoundingBox, Vec2};

pub struct ImageSurface {
    image: RgbaImage,
    line_width: f64,
    clip: Option<BoundingBox>,
    subpaths: Vec<Vec<Vec2>>,
}

impl ImageSurface {
    /// Transparent canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            line_width: 1.0,
            clip: None,
            subpaths: Vec::new(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.image.width() && y < self.image.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        debug!("Wrote {}x{} frame to {:?}", self.image.width(), self.image.height(), path);
        Ok(())
    }

    fn current_subpath(&mut self, op: &str) -> Result<&mut Vec<Vec2>> {
        self.subpaths
            .last_mut()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TrailError::Surface(format!("{} without a current point", op)))
    }

    /// Pixel rows/columns a stroke may touch, after clipping.
    fn pixel_window(&self, lo: Vec2, hi: Vec2) -> Option<(u32, u32, u32, u32)> {
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (lo.x, lo.y, hi.x, hi.y);
        if let Some(clip) = &self.clip {
            min_x = min_x.max(clip.min_x);
            min_y = min_y.max(clip.min_y);
            max_x = max_x.min(clip.max_x);
            max_y = max_y.min(clip.max_y);
        }
        let w = self.image.width() as f64;
        let h = self.image.height() as f64;
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.ceil().min(w - 1.0);
        let y1 = max_y.ceil().min(h - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn cover_segment(&self, a: Vec2, b: Vec2, coverage: &mut BTreeMap<(u32, u32), f64>) {
        let half = self.line_width / 2.0;
        let reach = half + 1.0;
        let lo = Vec2::new(a.x.min(b.x) - reach, a.y.min(b.y) - reach);
        let hi = Vec2::new(a.x.max(b.x) + reach, a.y.max(b.y) + reach);
        let (x0, y0, x1, y1) = match self.pixel_window(lo, hi) {
            Some(window) => window,
            None => return,
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let centre = Vec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some(clip) = &self.clip {
                    if !clip.contains(centre.x, centre.y) {
                        continue;
                    }
                }
                let c = (half + 0.5 - distance_to_segment(centre, a, b)).clamp(0.0, 1.0);
                if c > 0.0 {
                    let slot = coverage.entry((x, y)).or_insert(0.0);
                    *slot = slot.max(c);
                }
            }
        }
    }
}

impl Surface for ImageSurface {
    fn set_line_width(&mut self, width: f64) -> Result<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(TrailError::Surface(format!("unusable line width {}", width)));
        }
        self.line_width = width;
        Ok(())
    }

    fn clip(&mut self, rect: &BoundingBox) -> Result<()> {
        self.clip = Some(*rect);
        Ok(())
    }

    fn new_path(&mut self) -> Result<()> {
        self.subpaths.clear();
        Ok(())
    }

    fn move_to(&mut self, p: Vec2) -> Result<()> {
        self.subpaths.push(vec![p]);
        Ok(())
    }

    fn line_to(&mut self, p: Vec2) -> Result<()> {
        self.current_subpath("line_to")?.push(p);
        Ok(())
    }

    fn curve_to(&mut self, cp1: Vec2, cp2: Vec2, to: Vec2) -> Result<()> {
        let subpath = self.current_subpath("curve_to")?;
        let from = subpath[subpath.len() - 1];
        subpath.extend(flatten_cubic(from, cp1, cp2, to).into_iter().skip(1));
        Ok(())
    }

    fn stroke(&mut self, paint: &Paint) -> Result<()> {
        let subpaths = std::mem::take(&mut self.subpaths);
        if paint.max_alpha() <= 0.0 {
            return Ok(());
        }

        let mut coverage = BTreeMap::new();
        for subpath in &subpaths {
            match subpath.as_slice() {
                [] => {}
                [only] => self.cover_segment(*only, *only, &mut coverage),
                pts => {
                    for pair in pts.windows(2) {
                        self.cover_segment(pair[0], pair[1], &mut coverage);
                    }
                }
            }
        }

        for ((x, y), c) in coverage {
            let centre = Vec2::new(x as f64 + 0.5, y as f64 + 0.5);
            let color = match paint {
                Paint::Solid(c) => *c,
                Paint::Linear(g) => g.color_at(centre),
            };
            let src = [color.r, color.g, color.b, color.a * c];
            let dst = self.image.get_pixel_mut(x, y);
            *dst = Pixel(over(dst.0, src));
        }
        Ok(())
    }
}

/// Polyline approximation of a cubic Bezier, endpoints included.
pub fn flatten_cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec<Vec2> {
    let net = p1.sub(p0).length_squared().sqrt()
        + p2.sub(p1).length_squared().sqrt()
        + p3.sub(p2).length_squared().sqrt();
    let steps = ((net / FLATTEN_PX_PER_STEP).ceil() as usize)
        .clamp(FLATTEN_MIN_STEPS, FLATTEN_MAX_STEPS);

    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let a = p0.lerp(p1, t);
            let b = p1.lerp(p2, t);
            let c = p2.lerp(p3, t);
            let ab = a.lerp(b, t);
            let bc = b.lerp(c, t);
            ab.lerp(bc, t)
        })
        .collect()
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b.sub(a);
    let len2 = ab.length_squared();
    let t = if len2 <= f64::EPSILON {
        0.0
    } else {
        (p.sub(a).dot(ab) / len2).clamp(0.0, 1.0)
    };
    p.sub(a.lerp(b, t)).length_squared().sqrt()
}

/// Straight-alpha "over": `src` channels in `[0, 1]` onto an RGBA8 pixel.
fn over(dst: [u8; 4], src: [f64; 4]) -> [u8; 4] {
    let sa = src[3].clamp(0.0, 1.0);
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = src[i].clamp(0.0, 1.0);
        let dc = dst[i] as f64 / 255.0;
        out[i] = to_u8((sc * sa + dc * da * (1.0 - sa)) / out_a);
    }
    out[3] = to_u8(out_a);
    out
}

fn to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
