#![no_main]

use std::str::FromStr;
use libfuzzer_sys::fuzz_target;
use dertree::Oid;

fuzz_target!(|data: &[u8]| {
    if let Ok(oid) = Oid::from_content(data) {
        let dotted = oid.to_string();
        if oid.arcs().is_some() {
            if let Ok(parsed) = Oid::from_str(&dotted) {
                assert_eq!(parsed, oid);
            }
        }
    }
});
