pub const KIB: f64 = 1024.0;
pub const MIB: f64 = 1024.0 * 1024.0;
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Round to a fixed number of decimal places. Negative and non-finite
/// readings collapse to zero since counters never go below it.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn bytes_to_kb(bytes: f64) -> f64 {
    bytes / KIB
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    round_to(bytes as f64 / MIB, 2)
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    round_to(bytes as f64 / GIB, 2)
}
