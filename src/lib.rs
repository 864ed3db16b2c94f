//! Pointer trail buffering and adaptive curve rendering.
//!
//! Pointer samples go into a [`TrailSession`], which dedups and smooths them,
//! keeps them for the configured fade duration and draws them each frame on a
//! [`Surface`] as tapered, fading strokes. The `extern "C"` functions below
//! expose a session to non-Rust hosts as a flat list of draw commands.

pub mod alpha;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod raster;
pub mod renderer;
pub mod segment;
pub mod session;
pub mod surface;
pub mod types;
pub mod utils;

use std::sync::{Mutex, MutexGuard};

use log::{error, info};

pub use config::{ConfigSource, RenderConfig, SharedConfig};
pub use error::{Result, TrailError};
pub use raster::ImageSurface;
pub use renderer::{FrameOutcome, TrailRenderer};
pub use session::TrailSession;
pub use surface::{DrawCommand, Paint, RecordingSurface, Surface};
pub use types::{CCommandList, CDrawCommand, CRenderConfig, CTrailPoint, RenderMode, TrailPoint};

/// Opaque session handle owned by the host.
pub struct TrailHandle {
    config: SharedConfig,
    session: Mutex<TrailSession<SharedConfig>>,
}

impl TrailHandle {
    fn session(&self) -> MutexGuard<'_, TrailSession<SharedConfig>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn handle_ref<'a>(handle: *mut TrailHandle) -> Option<&'a TrailHandle> {
    // Hosts pass back pointers from `trail_session_new` only.
    unsafe { handle.as_ref() }
}

/// Creates a session. Returns null if `config` is invalid.
#[no_mangle]
pub extern "C" fn trail_session_new(config: CRenderConfig) -> *mut TrailHandle {
    logging::init(config.log_level);
    let config = match RenderConfig::from_ffi(&config) {
        Ok(config) => config,
        Err(e) => {
            error!("Rejected trail configuration: {}", e);
            return std::ptr::null_mut();
        }
    };

    let shared = SharedConfig::new(config);
    let handle = TrailHandle {
        session: Mutex::new(TrailSession::new(shared.clone())),
        config: shared,
    };
    Box::into_raw(Box::new(handle))
}

#[no_mangle]
pub extern "C" fn trail_session_free(handle: *mut TrailHandle) {
    if handle.is_null() {
        return;
    }
    // Reclaim the box handed out by `trail_session_new` and drop it.
    let handle = unsafe { Box::from_raw(handle) };
    handle.session().clear();
}

#[no_mangle]
pub extern "C" fn trail_session_push_sample(handle: *mut TrailHandle, x: f64, y: f64, now_ms: f64) {
    if let Some(h) = handle_ref(handle) {
        h.session().push_sample(x, y, now_ms);
    }
}

/// Feeds a batch of recorded samples in order. Returns how many were read.
#[no_mangle]
pub extern "C" fn trail_session_push_points(
    handle: *mut TrailHandle,
    points_ptr: *const CTrailPoint,
    points_len: usize,
) -> usize {
    let h = match handle_ref(handle) {
        Some(h) => h,
        None => return 0,
    };
    if points_ptr.is_null() || points_len == 0 {
        return 0;
    }

    let points: &[CTrailPoint] = unsafe { std::slice::from_raw_parts(points_ptr, points_len) };
    let mut session = h.session();
    for p in points.iter().copied().map(TrailPoint::from) {
        session.push_sample(p.x, p.y, p.t);
    }
    points.len()
}

/// True if the host should queue a repaint.
#[no_mangle]
pub extern "C" fn trail_session_tick(handle: *mut TrailHandle) -> bool {
    handle_ref(handle).is_some_and(|h| h.session().tick())
}

/// Replaces the whole configuration. Invalid values leave it untouched.
#[no_mangle]
pub extern "C" fn trail_session_set_config(
    handle: *mut TrailHandle,
    config: CRenderConfig,
) -> bool {
    let h = match handle_ref(handle) {
        Some(h) => h,
        None => return false,
    };
    match RenderConfig::from_ffi(&config) {
        Ok(config) => {
            log::set_max_level(logging::level_filter_from_i32(config.log_level));
            h.config.replace(config);
            true
        }
        Err(e) => {
            error!("Rejected trail configuration update: {}", e);
            false
        }
    }
}

/// Renders one frame into a command list. Free it with [`trail_free_commands`].
#[no_mangle]
pub extern "C" fn trail_session_render(handle: *mut TrailHandle, now_ms: f64) -> CCommandList {
    let h = match handle_ref(handle) {
        Some(h) => h,
        None => return CCommandList::empty(),
    };

    let mut surface = RecordingSurface::new();
    h.session().render(&mut surface, now_ms);

    let commands: Box<[CDrawCommand]> =
        surface.commands().iter().map(DrawCommand::to_ffi).collect();
    if commands.is_empty() {
        return CCommandList::empty();
    }
    let len = commands.len();
    let ptr = Box::into_raw(commands) as *mut CDrawCommand;
    CCommandList { commands: ptr, len }
}

#[no_mangle]
pub extern "C" fn trail_free_commands(list: CCommandList) {
    if list.commands.is_null() || list.len == 0 {
        return;
    }
    // Rebuild the boxed slice allocated by `trail_session_render`; dropping
    // it frees the memory.
    unsafe {
        let slice = std::ptr::slice_from_raw_parts_mut(list.commands, list.len);
        drop(Box::from_raw(slice));
    }
}

/// Drops all buffered points, e.g. when the host disables the effect.
#[no_mangle]
pub extern "C" fn trail_session_clear(handle: *mut TrailHandle) {
    if let Some(h) = handle_ref(handle) {
        h.session().clear();
        info!("Trail session cleared by host");
    }
}
