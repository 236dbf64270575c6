//! Fuzz target for RFC 4515 search filter parsing.
//!
//! Tests that `Filter::parse` handles arbitrary input without panicking,
//! and that the string form of anything it accepts parses back to the
//! same value.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lfs_ldap::Filter;

fuzz_target!(|data: &str| {
    if let Ok(filter) = Filter::parse(data) {
        let rendered = filter.to_string();
        let reparsed = Filter::parse(&rendered).unwrap();
        assert_eq!(reparsed, filter);
    }
});
