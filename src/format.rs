use unicode_width::UnicodeWidthStr;

const KB_PER_MB: f64 = 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// First `max_chars` characters of `s`. No ellipsis is appended, so the
/// result is a prefix of the input.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Left-aligns `s` in `width` display columns. Wide glyphs count double, so
/// CJK titles line up with ASCII ones.
pub fn pad_columns(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(pad))
}

pub fn kb_to_mb(kb: u64) -> u64 {
    (kb as f64 / KB_PER_MB).round() as u64
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

pub fn round_1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn format_mb(mb: u64) -> String {
    if mb >= 1024 {
        format!("{:.1} GB", mb as f64 / 1024.0)
    } else {
        format!("{mb} MB")
    }
}
