use crate::text_metrics;

const ELLIPSIS: char = '\u{2026}';

/// Collapse runs of whitespace (newlines included) into single spaces so a
/// label always renders on one line inside its box.
pub(super) fn normalize_label(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` with a trailing ellipsis until it fits in `max_width`.
pub(crate) fn fit_label(
    text: &str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
    fast_metrics: bool,
) -> String {
    let text = normalize_label(text);
    if text_width(&text, font_size, font_family, fast_metrics) <= max_width {
        return text;
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        while chars.last().is_some_and(|ch| ch.is_whitespace()) {
            chars.pop();
        }
        let mut candidate: String = chars.iter().collect();
        candidate.push(ELLIPSIS);
        if text_width(&candidate, font_size, font_family, fast_metrics) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

pub(crate) fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Approximate advance of `ch` in ems for a proportional sans-serif face.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '\'' | '(' | ')' | '[' | ']' => 0.321,
        'i' | 'j' | 'l' | 'I' => 0.25,
        'f' | 'r' | 't' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        '@' | '#' | '%' | '&' => 0.946,
        '\u{2026}' => 0.8,
        c if c.is_ascii_lowercase() => 0.57,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_digit() => 0.6,
        c if c.is_ascii() => 0.568,
        // CJK and other wide scripts.
        _ => 1.0,
    }
}
