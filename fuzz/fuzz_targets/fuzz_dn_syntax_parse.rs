//! Fuzz target for DN field syntax extraction.
//!
//! Tests that `DnSyntax::parse_value` classifies arbitrary input as
//! redacted, tokenized, malformed, or a value without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lfs_syntax::{DnSyntax, FieldSyntax, SensitivityPolicy};

fuzz_target!(|data: &str| {
    let syntax = DnSyntax::new(50, SensitivityPolicy::all_sensitive());
    let _ = syntax.parse_value(data);
});
