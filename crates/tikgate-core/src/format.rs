//! Human-readable formatting and input checks shared by the renderers.

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary (1024) steps and one decimal:
/// `0.0B`, `512.0B`, `1.5KB`, `3.2GB`.
///
/// The unit advances whenever the value would *display* as 1024.0 or
/// more, so the shown number is always below 1024 unless the unit is TB.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn humanize_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while unit < BYTE_UNITS.len() - 1 && (value * 10.0).round() >= 10_240.0 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", BYTE_UNITS[unit])
}

/// Format a rate given in bits per second (RouterOS queue `rate`) as
/// `"245.0 Mbps"`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn humanize_rate(bits_per_sec: u64) -> String {
    if bits_per_sec >= 1_000_000_000 {
        format!("{:.1} Gbps", bits_per_sec as f64 / 1_000_000_000.0)
    } else if bits_per_sec >= 1_000_000 {
        format!("{:.1} Mbps", bits_per_sec as f64 / 1_000_000.0)
    } else if bits_per_sec >= 1_000 {
        format!("{:.1} Kbps", bits_per_sec as f64 / 1_000.0)
    } else {
        format!("{bits_per_sec} bps")
    }
}

/// Four dot-separated decimal groups, each 0-255. Nothing else: no
/// prefix length, no port, no surrounding whitespace.
pub fn is_valid_ipv4(input: &str) -> bool {
    let groups: Vec<&str> = input.split('.').collect();
    groups.len() == 4
        && groups.iter().all(|group| {
            !group.is_empty()
                && group.len() <= 3
                && group.bytes().all(|b| b.is_ascii_digit())
                && group.parse::<u16>().is_ok_and(|n| n <= 255)
        })
}

/// Longest prefix of `input` holding at most `max` characters.
pub fn truncate_chars(input: &str, max: usize) -> &str {
    match input.char_indices().nth(max) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
