//! Fuzz target for RFC 4514 DN parsing.
//!
//! Tests that `Dn::parse` handles arbitrary input without panicking, and
//! that the string form of anything it accepts parses back to the same
//! value.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lfs_ldap::Dn;

fuzz_target!(|data: &str| {
    if let Ok(dn) = Dn::parse(data) {
        let rendered = dn.to_string();
        let reparsed = Dn::parse(&rendered).unwrap();
        assert_eq!(reparsed, dn);
    }
});
