// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;
use snapname::normalize::{fit_length, normalize, SENTINEL_STEM};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let stem = normalize(&text);

    assert!(!stem.is_empty());
    assert!(!stem.starts_with('_') && !stem.ends_with('_'));
    assert!(!stem.contains("__"));
    assert!(stem.bytes().all(|b| b == b'_' || b.is_ascii_lowercase() || b.is_ascii_digit()));
    assert!(stem == SENTINEL_STEM || stem.split('_').all(|t| !t.bytes().all(|b| b.is_ascii_digit())));
    assert_eq!(stem, normalize(&text));

    let max_len = data.first().map_or(0, |&b| b as usize);
    let fitted = fit_length(&stem, max_len);
    assert!(!fitted.is_empty());
    assert!(max_len == 0 || fitted.len() <= max_len);
});
