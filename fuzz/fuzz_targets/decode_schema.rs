#![no_main]

use std::sync::Arc;
use libfuzzer_sys::fuzz_target;
use dertree::{DispatchTable, Mode, Presence, Schema};

fn schema() -> Schema {
    let dss_parms = Schema::sequence("Dss-Parms")
        .field("p", Schema::integer())
        .field("q", Schema::integer())
        .field("g", Schema::integer())
        .build().unwrap();
    let table = Arc::new(
        DispatchTable::new()
            .register_oid("1.2.840.113549.1.1.1", "rsa", Schema::null())
            .unwrap()
            .register_oid("1.2.840.10040.4.1", "dsa", dss_parms)
            .unwrap()
    );
    Schema::sequence("AlgorithmIdentifier")
        .field("algorithm", Schema::oid())
        .defined_by("parameters", "algorithm", table, Presence::Optional)
        .build().unwrap()
}

fuzz_target!(|data: &[u8]| {
    let schema = schema();
    let _ = schema.decode_with_mode(data, Mode::Ber);
    if let Ok((value, len)) = schema.decode(data) {
        assert_eq!(schema.encode(&value).unwrap(), &data[..len]);
    }
});
