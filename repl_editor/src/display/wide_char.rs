// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::ops::RangeInclusive;

/// Code point ranges that a terminal renders two columns wide. The ranges are kept
/// sorted by start so [`is_full_width_code_point`] can binary search them.
const FULL_WIDTH_RANGES: [RangeInclusive<u32>; 16] = [
    0x1100..=0x115f,   // Hangul Jamo.
    0x2329..=0x232a,   // Left and right pointing angle brackets.
    0x2e80..=0x303e,   // CJK Radicals Supplement .. CJK Symbols (minus U+303F).
    0x3040..=0x3247,   // Hiragana .. Enclosed CJK Letters and Months.
    0x3250..=0x4dbf,   // Enclosed CJK .. CJK Unified Ideographs Extension A.
    0x4e00..=0xa4c6,   // CJK Unified Ideographs .. Yi Radicals.
    0xa960..=0xa97c,   // Hangul Jamo Extended-A.
    0xac00..=0xd7a3,   // Hangul Syllables.
    0xf900..=0xfaff,   // CJK Compatibility Ideographs.
    0xfe10..=0xfe19,   // Vertical Forms.
    0xfe30..=0xfe6b,   // CJK Compatibility Forms .. Small Form Variants.
    0xff01..=0xff60,   // Fullwidth Forms.
    0xffe0..=0xffe6,   // Fullwidth signs.
    0x1_b000..=0x1_b001, // Kana Supplement.
    0x1_f200..=0x1_f251, // Enclosed Ideographic Supplement.
    0x2_0000..=0x3_fffd, // CJK Extension B .. Tertiary Ideographic Plane.
];

/// Returns `true` if `ch` occupies two terminal columns.
#[must_use]
pub fn is_full_width_code_point(ch: char) -> bool {
    let code = u32::from(ch);
    if code < 0x1100 {
        return false;
    }
    FULL_WIDTH_RANGES
        .binary_search_by(|range| {
            if *range.end() < code {
                std::cmp::Ordering::Less
            } else if *range.start() > code {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Number of columns `ch` contributes when it is not a newline.
#[must_use]
pub fn code_point_width(ch: char) -> usize {
    if is_full_width_code_point(ch) { 2 } else { 1 }
}
