//! Listing line formatting

use crate::remote::RemoteEntry;

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Binary-prefixed size, e.g. `1.5KiB`.
pub fn human_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{:3.1}{}B", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}YiB", num)
}

/// `size  client_modified  path`, right-aligned columns, `-` for absent
/// timestamps.
pub fn listing_line(entry: &RemoteEntry) -> String {
    let modified = entry
        .client_modified
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>8}  {:>20}  {}",
        human_size(entry.size.unwrap_or(0)),
        modified,
        entry.path_display
    )
}
