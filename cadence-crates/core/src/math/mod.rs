mod num_ext;

pub(crate) use num_ext::NumExt;

/// Converts a bound computed with 64-bit arithmetic into a domain bound, saturating at the limits
/// of `i32`.
pub(crate) fn to_bound(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value > 0 { i32::MAX } else { i32::MIN })
}
