//! Render configuration and the sources it is read from.
//!
//! Configuration is hot-reloadable: an external settings collaborator may
//! replace any single field at any time. The renderer takes one snapshot per
//! pass through [`ConfigSource::current`], so a pass never observes a torn
//! value.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALPHA, DEFAULT_FADE_DURATION_MS, DEFAULT_LINE_WIDTH, DEFAULT_LOG_LEVEL,
    MAX_FADE_DURATION_MS, MAX_LINE_WIDTH, MIN_FADE_DURATION_MS, MIN_LINE_WIDTH,
};
use crate::error::{Result, TrailError};
use crate::types::{CRenderConfig, RenderMode, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RenderConfig {
    /// Lifetime of a trail point in milliseconds.
    #[serde(rename = "fade-duration")]
    pub fade_duration_ms: u32,
    /// Stroke width in pixels.
    pub line_width: u32,
    pub color: Rgb,
    /// Global opacity multiplier.
    pub alpha: f64,
    pub render_mode: RenderMode,
    /// 0=off, 1=error, 2=warn, 3=info, 4=debug, 5=trace
    pub log_level: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            line_width: DEFAULT_LINE_WIDTH,
            color: Rgb::WHITE,
            alpha: DEFAULT_ALPHA,
            render_mode: RenderMode::Precise,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl RenderConfig {
    pub fn fade_duration(&self) -> f64 {
        f64::from(self.fade_duration_ms)
    }

    pub fn line_width(&self) -> f64 {
        f64::from(self.line_width)
    }

    /// Rejects any value that would reach the compositor as a zero divisor
    /// or an out-of-range colour.
    pub fn validate(&self) -> Result<()> {
        if self.fade_duration_ms == 0 {
            return Err(invalid("fade-duration", "must be positive"));
        }
        if self.fade_duration_ms > MAX_FADE_DURATION_MS {
            return Err(invalid(
                "fade-duration",
                format!("must not exceed {} ms", MAX_FADE_DURATION_MS),
            ));
        }
        if self.line_width == 0 {
            return Err(invalid("line-width", "must be positive"));
        }
        if self.line_width > MAX_LINE_WIDTH {
            return Err(invalid("line-width", format!("must not exceed {} px", MAX_LINE_WIDTH)));
        }
        for c in self.color.channels() {
            if !is_unit(c) {
                return Err(invalid("color", format!("channel {} is outside [0, 1]", c)));
            }
        }
        if !is_unit(self.alpha) {
            return Err(invalid("alpha", format!("{} is outside [0, 1]", self.alpha)));
        }
        Ok(())
    }

    /// Forces every field into range, logging each adjustment.
    pub fn clamped(&self) -> RenderConfig {
        let out = self.sanitized();
        if out.fade_duration_ms != self.fade_duration_ms {
            warn!("fade-duration {} clamped to {}", self.fade_duration_ms, out.fade_duration_ms);
        }
        if out.line_width != self.line_width {
            warn!("line-width {} clamped to {}", self.line_width, out.line_width);
        }
        if out.color.channels() != self.color.channels() {
            warn!("color {:?} clamped to {:?}", self.color.channels(), out.color.channels());
        }
        if out.alpha != self.alpha {
            warn!("alpha {} clamped to {}", self.alpha, out.alpha);
        }
        out
    }

    /// [`clamped`](Self::clamped) without the warnings, for per-frame reads.
    pub fn sanitized(&self) -> RenderConfig {
        let [r, g, b] = self.color.channels().map(clamp_unit);
        RenderConfig {
            fade_duration_ms: self
                .fade_duration_ms
                .clamp(MIN_FADE_DURATION_MS, MAX_FADE_DURATION_MS),
            line_width: self.line_width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH),
            color: Rgb::new(r, g, b),
            alpha: clamp_unit(self.alpha),
            render_mode: self.render_mode,
            log_level: self.log_level.clamp(0, 5),
        }
    }

    pub fn from_json_str(json: &str) -> Result<RenderConfig> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<RenderConfig> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = RenderConfig::from_json_str(&contents)?;
        info!("Loaded trail configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_ffi(c: &CRenderConfig) -> Result<RenderConfig> {
        let positive = |v: i32, field: &'static str| {
            u32::try_from(v)
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| invalid(field, format!("{} is not positive", v)))
        };
        let render_mode = RenderMode::from_ffi(c.render_mode).ok_or_else(|| {
            invalid("render-mode", format!("unknown render mode {}", c.render_mode))
        })?;

        let config = RenderConfig {
            fade_duration_ms: positive(c.fade_duration_ms, "fade-duration")?,
            line_width: positive(c.line_width, "line-width")?,
            color: Rgb::new(c.color_r, c.color_g, c.color_b),
            alpha: c.alpha,
            render_mode,
            log_level: c.log_level,
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TrailError {
    TrailError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

fn is_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Yields the configuration to use for the next render pass.
pub trait ConfigSource {
    fn current(&self) -> RenderConfig;
}

/// A bare config is read through [`RenderConfig::sanitized`], so zero or
/// out-of-range fields never reach the compositor.
impl ConfigSource for RenderConfig {
    fn current(&self) -> RenderConfig {
        self.sanitized()
    }
}

/// Lock-guarded configuration shared with an external settings thread.
///
/// Each setter replaces exactly one field under the write lock, so readers see
/// either the old or the new value of that field, never a mix.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<RenderConfig>>,
}

impl SharedConfig {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config.clamped())),
        }
    }

    pub fn replace(&self, config: RenderConfig) {
        let stored = config.clamped();
        *self.write() = stored;
        info!(
            "Trail configuration replaced (mode={}, fade={}ms, width={}px)",
            stored.render_mode, stored.fade_duration_ms, stored.line_width
        );
    }

    pub fn set_fade_duration(&self, ms: u32) {
        let value = ms.clamp(MIN_FADE_DURATION_MS, MAX_FADE_DURATION_MS);
        if value != ms {
            warn!("fade-duration {} clamped to {}", ms, value);
        }
        self.write().fade_duration_ms = value;
    }

    pub fn set_line_width(&self, px: u32) {
        let value = px.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
        if value != px {
            warn!("line-width {} clamped to {}", px, value);
        }
        self.write().line_width = value;
    }

    pub fn set_color(&self, color: Rgb) {
        let [r, g, b] = color.channels().map(clamp_unit);
        let value = Rgb::new(r, g, b);
        if value.channels() != color.channels() {
            warn!("color {:?} clamped to {:?}", color.channels(), value.channels());
        }
        self.write().color = value;
    }

    pub fn set_alpha(&self, alpha: f64) {
        let value = clamp_unit(alpha);
        if value != alpha {
            warn!("alpha {} clamped to {}", alpha, value);
        }
        self.write().alpha = value;
    }

    pub fn set_render_mode(&self, mode: RenderMode) {
        self.write().render_mode = mode;
        info!("Render mode set to {}", mode);
    }

    // A poisoned lock still holds a fully written config: every writer
    // assigns a single field.
    fn read(&self) -> RwLockReadGuard<'_, RenderConfig> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RenderConfig> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigSource for SharedConfig {
    fn current(&self) -> RenderConfig {
        *self.read()
    }
}
