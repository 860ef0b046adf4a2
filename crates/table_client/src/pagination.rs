use std::ops::Range;

pub const PAGE_WINDOW_RADIUS: u64 = 10;

/// Page buttons around `page`: `max(page-10, 1)..min(page+10, page_count+1)`.
pub fn page_window(page: u64, page_count: u64) -> Range<u64> {
    let start = page.saturating_sub(PAGE_WINDOW_RADIUS).max(1);
    let end = page
        .saturating_add(PAGE_WINDOW_RADIUS)
        .min(page_count.saturating_add(1));
    start..end.max(start)
}

pub fn clamp_page(target: i64, page_count: u64) -> u64 {
    let upper = page_count.max(1);
    u64::try_from(target).map_or(1, |target| target.clamp(1, upper))
}

/// Reads the leading integer of a go-to-page input (`"12abc"` is 12).
/// Returns `None` when there are no digits.
pub fn parse_page_input(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
