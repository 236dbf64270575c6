//! Fuzz target for string truncation.
//!
//! Tests that `sanitize_string` never panics and never splits inside a
//! character, whatever the input and limit.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lfs_common::sanitize_string;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    value: &'a str,
    max_chars: u16,
}

fuzz_target!(|input: Input<'_>| {
    let max_chars = input.max_chars as usize;
    let out = sanitize_string(input.value, max_chars);
    if input.value.chars().count() <= max_chars {
        assert_eq!(out, input.value);
    } else {
        let kept: String = input.value.chars().take(max_chars).collect();
        assert!(out.starts_with(&kept));
        assert!(out.ends_with(" more characters}"));
    }
});
