use chrono::{DateTime, Utc};

/// Converts a Windows FILETIME tick count to a DateTime<Utc>
///
/// # Arguments
/// * `ticks` - 100-nanosecond intervals since January 1, 1601 UTC
///
/// # Returns
/// None for a zero FILETIME (field not set), otherwise the matching instant.
/// Times before the Unix epoch clamp to the epoch.
pub fn filetime_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    const FILETIME_TO_UNIX_EPOCH: u64 = 116444736000000000;
    const HUNDRED_NANOSECONDS_PER_SECOND: u64 = 10000000;

    if ticks == 0 {
        return None;
    }
    let unix = ticks.saturating_sub(FILETIME_TO_UNIX_EPOCH) / HUNDRED_NANOSECONDS_PER_SECOND;
    DateTime::from_timestamp(unix as i64, 0)
}

/// Joins the two halves of a FILETIME into a tick count
pub fn filetime_ticks(low: u32, high: u32) -> u64 {
    ((high as u64) << 32) | (low as u64)
}

/// Converts a Rust `&str` to a Windows wide string (`Vec<u16>`) with a
/// trailing null terminator suitable for passing to Win32 APIs.
#[cfg(windows)]
pub fn to_wide_null_terminated(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Case-insensitive equality after trimming both sides
pub fn eq_trimmed_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_uppercase() == b.trim().to_uppercase()
}

/// Case-insensitive `starts_with`
pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.to_uppercase().starts_with(&prefix.to_uppercase())
}
