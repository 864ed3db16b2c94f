// `log` level mapping and an `env_logger` backend for hosts without one.
use log::LevelFilter;

/// Maps the 0..=5 host scale (off, error, warn, info, debug, trace) onto a
/// filter. Out-of-range values saturate.
pub fn level_filter_from_i32(level: i32) -> LevelFilter {
    match level {
        i32::MIN..=0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs an `env_logger` backend unless the process already has a logger,
/// then sets the maximum level. Safe to call repeatedly.
///
/// The backend itself passes every record; `log::max_level` is the only cap,
/// so a later [`log::set_max_level`] can raise verbosity again.
pub fn init(level: i32) {
    // Err only means another logger is installed; its output wins.
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .format_target(false)
        .try_init();
    log::set_max_level(level_filter_from_i32(level));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scale_saturates() {
        assert_eq!(level_filter_from_i32(-3), LevelFilter::Off);
        assert_eq!(level_filter_from_i32(0), LevelFilter::Off);
        assert_eq!(level_filter_from_i32(2), LevelFilter::Warn);
        assert_eq!(level_filter_from_i32(3), LevelFilter::Info);
        assert_eq!(level_filter_from_i32(9), LevelFilter::Trace);
    }

    #[test]
    fn init_twice_is_harmless() {
        init(2);
        init(4);
        log::warn!("logger installed");
    }
}
