#![no_main]

use libfuzzer_sys::fuzz_target;
use dertree::{Header, Mode};

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Der] {
        if let Ok(header) = Header::decode(data, 0, mode) {
            assert!(header.total_len() <= data.len());
        }
    }
});
