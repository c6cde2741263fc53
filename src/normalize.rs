// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Turning free-form descriptions into filename stems
//!
//! A stem is a run of lowercase ASCII alphanumeric tokens joined by single
//! underscores. Tokens made only of digits are dropped, and when nothing
//! survives the stem is [`SENTINEL_STEM`].

/// Stem used when a description yields no usable tokens
pub const SENTINEL_STEM: &str = "unnamed_image";

/// Normalize a description into a filename stem
///
/// Anything after the last `.` is discarded first, so a model echoing
/// `sunset_beach.jpg` does not leak its extension into the stem.
pub fn normalize(text: &str) -> String {
    let text = text.rsplit_once('.').map_or(text, |(head, _)| head);

    let mapped: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    let tokens: Vec<&str> = mapped
        .split('_')
        .filter(|token| !token.is_empty())
        .filter(|token| !token.bytes().all(|b| b.is_ascii_digit()))
        .collect();

    if tokens.is_empty() {
        return SENTINEL_STEM.to_string();
    }

    tokens.join("_")
}

/// Shorten a stem to at most `max_len` bytes
///
/// Whole tokens are dropped from the end first. A leading token that is
/// longer than the limit on its own gets cut. `max_len == 0` disables the limit.
pub fn fit_length(stem: &str, max_len: usize) -> String {
    if max_len == 0 || stem.len() <= max_len {
        return stem.to_string();
    }

    let mut fitted = String::with_capacity(max_len);
    for token in stem.split('_') {
        let extra = if fitted.is_empty() { token.len() } else { token.len() + 1 };
        if fitted.len() + extra > max_len {
            break;
        }
        if !fitted.is_empty() {
            fitted.push('_');
        }
        fitted.push_str(token);
    }

    if fitted.is_empty() {
        fitted = cut_to(stem, max_len);
    }

    // A cut token must still carry a letter
    if fitted.bytes().all(|b| b.is_ascii_digit()) {
        cut_to(SENTINEL_STEM, max_len)
    } else {
        fitted
    }
}

/// Byte prefix of at most `max_len`, on a char boundary, without trailing `_`
fn cut_to(text: &str, max_len: usize) -> String {
    let cut = (0..=max_len.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    text[..cut].trim_end_matches('_').to_string()
}
