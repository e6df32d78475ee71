//! Query execution results and cost helpers.
//!
//! Costs use on-demand pricing of 5 USD per TiB scanned.

mod types;

pub use types::{DryRunOutcome, QueryOutcome};

/// Bytes in one TiB
pub const BYTES_PER_TIB: f64 = 1_099_511_627_776.0;

/// On-demand price per TiB scanned, in USD
pub const USD_PER_TIB: f64 = 5.0;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Human-readable byte count (`0 B`, `1.50 KB`, `2.00 GB`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return String::from("0 B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Estimated on-demand cost in USD for scanning `bytes`.
pub fn estimate_cost(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_TIB * USD_PER_TIB
}
