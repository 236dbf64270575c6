//! Fuzz target for JSON field syntax extraction.
//!
//! Tests that `JsonSyntax::parse_value` classifies arbitrary input
//! without panicking, and that sanitized output of anything it accepts
//! is itself parseable JSON.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lfs_syntax::{FieldSyntax, JsonSyntax, SensitivityPolicy};

fuzz_target!(|data: &str| {
    let syntax = JsonSyntax::new(50, SensitivityPolicy::all_sensitive());
    if let Ok(value) = syntax.parse_value(data) {
        let sanitized = syntax.value_to_sanitized_string(&value);
        let _: serde_json::Value = serde_json::from_str(&sanitized).unwrap();
    }
});
