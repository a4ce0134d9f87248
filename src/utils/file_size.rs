pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Formats a byte count with binary units, e.g. `1.5 KB` or `0 Bytes`.
    /// Two decimals at most, trailing zeros dropped.
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
        let mut value = size as f64;
        let mut unit_index = 0;

        while value >= 1024.0 && unit_index < UNITS.len() - 1 {
            value /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            return format!("{} {}", size, UNITS[0]);
        }

        let rounded = format!("{:.2}", value);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, UNITS[unit_index])
    }
}
