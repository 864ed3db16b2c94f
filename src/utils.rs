use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::types::TrailPoint;

/// Dumps trail points as `x,y,timestamp_ms` rows for offline inspection.
pub fn export_points_to_csv(path: impl AsRef<Path>, points: &[TrailPoint]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "x,y,timestamp_ms")?;
    for p in points {
        writeln!(writer, "{},{},{}", p.x, p.y, p.t)?;
    }
    writer.flush()
}

/// `output/` under the crate root, created on demand.
pub fn ensure_output_dir() -> PathBuf {
    let out_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output");
    if let Err(e) = fs::create_dir_all(&out_dir) {
        warn!("Failed to create output dir {:?}: {}", out_dir, e);
    }
    out_dir
}
