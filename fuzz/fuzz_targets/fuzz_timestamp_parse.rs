//! Fuzz target for the timestamp field syntaxes.
//!
//! Tests that generalized time and RFC 3339 extraction handle arbitrary
//! input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lfs_syntax::{FieldSyntax, GeneralizedTimeSyntax, Rfc3339TimestampSyntax};

fuzz_target!(|data: &str| {
    let _ = GeneralizedTimeSyntax::new(50).parse_value(data);
    let _ = Rfc3339TimestampSyntax::new(50).parse_value(data);
});
