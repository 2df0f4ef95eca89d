const SIZE_UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

/// Formats a byte count with decimal (power-of-1000) units, rounded to a whole number.
///
/// ```
/// use vodchat::util::human_file_size;
///
/// assert_eq!(human_file_size(0), "0 B");
/// assert_eq!(human_file_size(1_500), "2 kB");
/// assert_eq!(human_file_size(734_003_200), "734 MB");
/// ```
pub fn human_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{} {}", value.round(), SIZE_UNITS[unit])
}
