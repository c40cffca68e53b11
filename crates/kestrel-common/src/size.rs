//! Human-readable byte sizes.

const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with a binary unit, e.g. `512 B` or `1.5 KiB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_human(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
