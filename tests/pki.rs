//! Decoding and encoding of PKI structures through their schemas.

use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use dertree::{
    BuildError, Constraint, DispatchTable, Discriminator, ErrorKind, Fields,
    Mode, Oid, Presence, RelativeOid, Schema, Slot, StringKind, Tag, Value,
};

const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const DSA: &str = "1.2.840.10040.4.1";

fn der(s: &str) -> Vec<u8> {
    hex::decode(s.replace(' ', "")).unwrap()
}

fn oid(s: &str) -> Value {
    Value::Oid(Oid::from_str(s).unwrap())
}

fn decode_all(schema: &Schema, data: &[u8]) -> Value {
    let (value, len) = schema.decode(data).unwrap();
    assert_eq!(len, data.len());
    value
}


//------------ Schemas -------------------------------------------------------

fn algorithm_identifier() -> Schema {
    let dss_parms = Schema::sequence("Dss-Parms")
        .field("p", Schema::integer())
        .field("q", Schema::integer())
        .field("g", Schema::integer())
        .build().unwrap();
    let params = Arc::new(
        DispatchTable::new()
            .register_oid(RSA_ENCRYPTION, "rsa", Schema::null()).unwrap()
            .register_oid(DSA, "dsa", dss_parms).unwrap()
    );
    Schema::sequence("AlgorithmIdentifier")
        .field("algorithm", Schema::oid())
        .defined_by("parameters", "algorithm", params, Presence::Optional)
        .build().unwrap()
}

fn certificate_extensions() -> Arc<DispatchTable> {
    let basic_constraints = Schema::sequence("BasicConstraints")
        .default("cA", Schema::boolean(), false)
        .optional(
            "pathLenConstraint",
            Schema::integer().with_constraint(Constraint::Range {
                min: Some(0), max: None
            }).unwrap()
        )
        .build().unwrap();
    Arc::new(
        DispatchTable::new()
            .register_oid(
                "2.5.29.19", "basicConstraints",
                Schema::octet_string_containing(basic_constraints)
            ).unwrap()
            .register_oid(
                "2.5.29.15", "keyUsage",
                Schema::octet_string_containing(Schema::bit_string())
            ).unwrap()
            .with_wildcard("unknown", Schema::octet_string())
    )
}

fn crl_entry_extensions() -> Arc<DispatchTable> {
    Arc::new(
        DispatchTable::new()
            .register_oid(
                "2.5.29.21", "reasonCode",
                Schema::octet_string_containing(Schema::enumerated())
            ).unwrap()
            .with_next(certificate_extensions())
    )
}

fn extensions(table: Arc<DispatchTable>) -> Schema {
    let extension = Schema::sequence("Extension")
        .field("extnID", Schema::oid())
        .default("critical", Schema::boolean(), false)
        .defined_by("extnValue", "extnID", table, Presence::Required)
        .build().unwrap();
    Schema::sequence_of(extension).with_constraint(Constraint::Size {
        min: Some(1), max: None
    }).unwrap().with_name("Extensions")
}


//------------ Algorithm Identifiers -----------------------------------------

#[test]
fn rsa_algorithm_identifier() {
    let schema = algorithm_identifier();
    let data = der("300d 06092a864886f70d010101 0500");
    let value = decode_all(&schema, &data);
    assert_eq!(value.field("algorithm"), Some(&oid(RSA_ENCRYPTION)));
    assert_eq!(
        value.field("parameters"), Some(&Value::open("rsa", Value::Null))
    );
    assert_eq!(schema.encode(&value).unwrap(), data);

    // Parameters left out.
    let value = decode_all(&schema, &der("300b 06092a864886f70d010101"));
    assert!(value.as_fields().unwrap().slot("parameters").is_absent());
}

#[test]
fn dsa_algorithm_identifier() {
    let schema = algorithm_identifier();
    let data = der("3014 06072a8648ce380401 3009 020117 02010b 020105");
    let value = decode_all(&schema, &data);
    let params = value.field("parameters").and_then(Value::as_open).unwrap();
    assert_eq!(params.label, "dsa");
    assert_eq!(
        params.value,
        Value::Sequence(
            Fields::new().with("p", 23i64).with("q", 11i64).with("g", 5i64)
        )
    );
    assert_eq!(schema.encode(&value).unwrap(), data);
}

#[test]
fn unknown_algorithm() {
    let schema = algorithm_identifier();

    // 2.289.9 isn’t in the table and something follows it.
    let err = schema.decode(&der("3007 0603827109 0500")).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::UnknownOpenTypeDiscriminator("2.289.9".into())
    );

    // Without parameters, all is well.
    let value = decode_all(&schema, &der("3005 0603827109"));
    assert!(value.as_fields().unwrap().slot("parameters").is_absent());
}


//------------ Primitives and Framing ----------------------------------------

#[test]
fn minimal_integers() {
    let schema = Schema::integer();
    assert_eq!(schema.encode(&0i64.into()).unwrap(), der("020100"));
    assert_eq!(schema.encode(&128i64.into()).unwrap(), der("02020080"));
    assert_eq!(schema.encode(&(-128i64).into()).unwrap(), der("020180"));
    assert_eq!(schema.encode(&(-129i64).into()).unwrap(), der("0202ff7f"));

    let padded = der("0202007f");
    assert!(matches!(
        schema.decode(&padded).unwrap_err().kind(),
        ErrorKind::MalformedEncoding(_)
    ));
    let (value, _) = schema.decode_with_mode(&padded, Mode::Ber).unwrap();
    assert_eq!(value.to_i64(), Some(127));
    assert_eq!(schema.encode(&value).unwrap(), der("02017f"));
}

#[test]
fn lengths() {
    let schema = Schema::sequence_of(Schema::integer());
    let long_form = der("308103 020105");
    assert!(schema.decode(&long_form).is_err());
    let (value, len) = schema.decode_with_mode(&long_form, Mode::Ber).unwrap();
    assert_eq!(len, 6);
    assert_eq!(schema.encode(&value).unwrap(), der("3003020105"));

    // Indefinite length is refused in either mode.
    let indefinite = der("3080 020105 0000");
    assert!(schema.decode(&indefinite).is_err());
    assert!(schema.decode_with_mode(&indefinite, Mode::Ber).is_err());
}

#[test]
fn truncated_input() {
    let schema = Schema::sequence("Pair")
        .field("a", Schema::integer())
        .field("b", Schema::integer())
        .build().unwrap();
    assert_eq!(
        schema.decode(&der("3006 020101 0201")).unwrap_err().kind(),
        &ErrorKind::TruncatedInput
    );
    assert_eq!(
        schema.decode(&der("30")).unwrap_err().kind(),
        &ErrorKind::TruncatedInput
    );
}

#[test]
fn constructed_strings_in_ber() {
    let schema = Schema::string(StringKind::Ia5);
    let data = der("3608 16026869 16022121");
    assert!(schema.decode(&data).is_err());
    let (value, _) = schema.decode_with_mode(&data, Mode::Ber).unwrap();
    assert_eq!(value.as_str(), Some("hi!!"));
    assert_eq!(schema.encode(&value).unwrap(), der("160468692121"));
}


//------------ Presence ------------------------------------------------------

#[test]
fn optional_fields_round_trip() {
    let schema = Schema::sequence("Entry")
        .optional("version", Schema::integer())
        .field("name", Schema::string(StringKind::Utf8))
        .optional("flag", Schema::boolean())
        .build().unwrap();

    let data = der("3004 0c026869");
    let value = decode_all(&schema, &data);
    let fields = value.as_fields().unwrap();
    assert!(fields.slot("version").is_absent());
    assert!(fields.slot("flag").is_absent());
    assert_eq!(fields.get("name"), Some(&Value::from("hi")));
    assert_eq!(schema.encode(&value).unwrap(), data);

    let data = der("300a 020101 0c026869 0101ff");
    let value = decode_all(&schema, &data);
    assert_eq!(value.field("flag"), Some(&Value::from(true)));
    assert_eq!(schema.encode(&value).unwrap(), data);
}

#[test]
fn default_version_is_left_out() {
    let schema = Schema::sequence("TBSCertificate")
        .tagged(
            "version", Schema::integer(), Tag::ctx(0).explicit(),
            Presence::Default(0i64.into())
        )
        .field("serialNumber", Schema::integer())
        .build().unwrap();

    // v1 given explicitly although it is the default.
    let value = decode_all(&schema, &der("3008 a003020100 020105"));
    assert_eq!(
        value.as_fields().unwrap().slot("version"),
        &Slot::Defaulted(0i64.into())
    );
    let encoded = schema.encode(&value).unwrap();
    assert_eq!(encoded, der("3003 020105"));
    assert_eq!(decode_all(&schema, &encoded), value);

    // v3 stays.
    let data = der("3008 a003020102 020105");
    let value = decode_all(&schema, &data);
    assert_eq!(
        value.as_fields().unwrap().slot("version"),
        &Slot::Present(2i64.into())
    );
    assert_eq!(schema.encode(&value).unwrap(), data);

    // A value equal to the default set by hand is left out, too.
    let value = Value::Sequence(
        Fields::new().with("version", 0i64).with("serialNumber", 5i64)
    );
    assert_eq!(schema.encode(&value).unwrap(), der("3003 020105"));
}


//------------ Choices -------------------------------------------------------

#[test]
fn time_choice() {
    let schema = Schema::choice("Time")
        .field("utcTime", Schema::utc_time())
        .field("generalTime", Schema::generalized_time())
        .build().unwrap();
    let data = der("170d 3235303130313030303030305a");
    let value = decode_all(&schema, &data);
    assert_eq!(value, Value::choice("utcTime", "250101000000Z"));
    assert_eq!(schema.encode(&value).unwrap(), data);
}

#[test]
fn time_syntax() {
    let utc = Schema::utc_time();
    let err = utc.decode(b"\x17\x04ZZ+-").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MalformedEncoding(_)));
    let err = utc.encode(&Value::from("----")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ValueMismatch(_)));

    // BER takes an offset and no seconds, DER and the encoder do not.
    let data = b"\x17\x0f2501010000+0100";
    let (value, _) = utc.decode_with_mode(data, Mode::Ber).unwrap();
    assert_eq!(value, Value::from("2501010000+0100"));
    assert!(utc.decode(data).is_err());
    assert!(utc.encode(&value).is_err());

    let general = Schema::generalized_time();
    let data = der("180f 32303234303232393132333030305a");
    assert_eq!(decode_all(&general, &data), Value::from("20240229123000Z"));
    assert!(general.decode(&der("180f 32303235303232393132333030305a")).is_err());
}

#[test]
fn relative_oid() {
    let schema = Schema::sequence("Ref")
        .field("base", Schema::oid())
        .field("rel", Schema::relative_oid())
        .build().unwrap();
    let data = der("300a 06032a0304 0d03c27b03");
    let value = decode_all(&schema, &data);
    assert_eq!(
        value.field("rel"),
        Some(&Value::from(RelativeOid::from_str("8571.3").unwrap()))
    );
    assert_eq!(schema.encode(&value).unwrap(), data);

    let value = Value::Sequence(
        Fields::new()
            .with("base", oid("1.2.3.4"))
            .with("rel", RelativeOid::from_arcs(&[1, 2]).unwrap())
    );
    assert_eq!(schema.encode(&value).unwrap(), der("3009 06032a0304 0d020102"));
    assert!(matches!(
        schema.encode(
            &Value::Sequence(
                Fields::new()
                    .with("base", oid("1.2.3.4"))
                    .with("rel", oid("1.2"))
            )
        ).unwrap_err().kind(),
        ErrorKind::ValueMismatch(_)
    ));
}

#[test]
fn ambiguous_choice_is_rejected() {
    let err = Schema::choice("Time")
        .field("utcTime", Schema::utc_time())
        .field("otherTime", Schema::utc_time())
        .build().unwrap_err();
    assert_eq!(
        err,
        BuildError::AmbiguousChoice {
            first: "utcTime".into(),
            second: "otherTime".into(),
            tag: Some(Tag::UTC_TIME),
        }
    );

    // Nested untagged choices count with all their alternatives.
    let inner = Schema::choice("Inner")
        .field("int", Schema::integer())
        .field("bool", Schema::boolean())
        .build().unwrap();
    assert!(matches!(
        Schema::choice("Outer")
            .field("inner", inner.clone())
            .field("flag", Schema::boolean())
            .build(),
        Err(BuildError::AmbiguousChoice { .. })
    ));
    assert!(
        Schema::choice("Outer")
            .tagged(
                "inner", inner, Tag::ctx(0).explicit(), Presence::Required
            )
            .field("flag", Schema::boolean())
            .build().is_ok()
    );
}


//------------ Tagged Types --------------------------------------------------

#[test]
fn application_tagged_sequence() {
    let schema = Schema::sequence("ORName")
        .field("country", Schema::string(StringKind::Printable))
        .build().unwrap()
        .with_tag(Tag::application(0).implicit());
    let value = Value::Sequence(Fields::new().with("country", "NL"));
    let data = schema.encode(&value).unwrap();
    assert_eq!(data, der("6004 13024e4c"));
    assert_eq!(decode_all(&schema, &data), value);

    assert_eq!(
        schema.decode(&der("3004 13024e4c")).unwrap_err().kind(),
        &ErrorKind::UnexpectedTag {
            expected: Tag::application(0), found: Tag::SEQUENCE
        }
    );
}

#[test]
fn set_fields() {
    let schema = Schema::set("Qualifier")
        .field("id", Schema::oid())
        .optional("note", Schema::string(StringKind::Ia5))
        .build().unwrap();
    let value = Value::Set(
        Fields::new().with("id", oid("1.2.3.4")).with("note", "hi")
    );
    let data = schema.encode(&value).unwrap();
    assert_eq!(data, der("3109 06032a0304 16026869"));
    assert_eq!(decode_all(&schema, &data), value);
}


//------------ Extensions ----------------------------------------------------

#[test]
fn certificate_extensions_round_trip() {
    let schema = extensions(certificate_extensions());
    let data = der(
        "301c \
         300f 0603551d13 0101ff 0405 30030101ff \
         3009 06032a0304 04020500"
    );
    let value = decode_all(&schema, &data);
    let list = value.as_list().unwrap();
    assert_eq!(list.len(), 2);

    let basic = list[0].as_fields().unwrap();
    assert_eq!(basic.slot("critical"), &Slot::Present(true.into()));
    let basic = basic.get("extnValue").and_then(Value::as_open).unwrap();
    assert_eq!(basic.label, "basicConstraints");
    assert_eq!(basic.value.field("cA"), Some(&Value::from(true)));
    assert!(
        basic.value.as_fields().unwrap().slot("pathLenConstraint").is_absent()
    );

    let unknown = list[1].as_fields().unwrap();
    assert_eq!(unknown.slot("critical"), &Slot::Defaulted(false.into()));
    assert_eq!(
        unknown.get("extnValue"),
        Some(&Value::open(
            "unknown", Value::OctetString(Bytes::from_static(b"\x05\x00"))
        ))
    );

    assert_eq!(schema.encode(&value).unwrap(), data);
}

#[test]
fn explicit_non_critical_is_dropped() {
    let schema = extensions(certificate_extensions());
    let value = decode_all(
        &schema, &der("3011 300f 0603551d13 010100 0405 3003020101")
    );
    assert_eq!(
        value.as_list().unwrap()[0].as_fields().unwrap().slot("critical"),
        &Slot::Defaulted(false.into())
    );
    assert_eq!(
        schema.encode(&value).unwrap(),
        der("300e 300c 0603551d13 0405 3003020101")
    );
}

#[test]
fn empty_extensions_violate_size() {
    let schema = extensions(certificate_extensions());
    assert!(matches!(
        schema.decode(&der("3000")).unwrap_err().kind(),
        ErrorKind::ConstraintViolation(_)
    ));
    assert!(matches!(
        schema.encode(&Value::List(Vec::new())).unwrap_err().kind(),
        ErrorKind::ConstraintViolation(_)
    ));
}

#[test]
fn crl_entry_extensions_chain() {
    let schema = extensions(crl_entry_extensions());
    let data = der(
        "301d \
         300a 0603551d15 04030a0101 \
         300f 0603551d13 0101ff 0405 30030101ff"
    );
    let value = decode_all(&schema, &data);
    let list = value.as_list().unwrap();
    assert_eq!(
        list[0].field("extnValue"),
        Some(&Value::open("reasonCode", 1i64))
    );
    assert_eq!(
        list[1].field("extnValue").and_then(Value::as_open)
            .map(|open| open.label.as_str()),
        Some("basicConstraints")
    );
    assert_eq!(schema.encode(&value).unwrap(), data);
}

#[test]
fn encode_error_path() {
    let schema = extensions(certificate_extensions());
    let bad = Value::List(vec![
        Value::Sequence(
            Fields::new()
                .with("extnID", oid("2.5.29.19"))
                .with("extnValue", Value::open(
                    "basicConstraints",
                    Value::Sequence(Fields::new().with("cA", 1i64))
                ))
        )
    ]);
    let err = schema.encode(&bad).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ValueMismatch(_)));
    assert_eq!(err.path(), "0.extnValue.cA");

    let missing = Value::List(vec![
        Value::Sequence(Fields::new().with("extnID", oid("2.5.29.19")))
    ]);
    let err = schema.encode(&missing).unwrap_err();
    assert_eq!(
        err.kind(), &ErrorKind::MissingRequiredField("extnValue".into())
    );
    assert_eq!(err.path(), "0");
}


//------------ Integer Discriminators ----------------------------------------

#[test]
fn integer_keyed_chain() {
    let text = Arc::new(
        DispatchTable::new()
            .register_int(2, "text", Schema::string(StringKind::Utf8))
            .unwrap()
    );
    let table = Arc::new(
        DispatchTable::new()
            .register_int(1, "flag", Schema::boolean()).unwrap()
            .with_next(text)
            .with_wildcard("raw", Schema::octet_string())
    );
    assert_eq!(
        table.resolve(&Discriminator::Int(2)).map(|entry| entry.label()),
        Some("text")
    );
    assert_eq!(
        table.resolve(&Discriminator::Int(9)).map(|entry| entry.label()),
        Some("raw")
    );

    let schema = Schema::sequence("Message")
        .field("kind", Schema::integer())
        .optional("cmd", Schema::enumerated())
        .tagged(
            "warn", Schema::integer(), Tag::ctx(0).explicit(),
            Presence::Default(0i64.into())
        )
        .defined_by("body", "kind", table, Presence::Required)
        .build().unwrap();

    let value = decode_all(&schema, &der("3007 020102 0c026869"));
    assert_eq!(value.field("body"), Some(&Value::open("text", "hi")));
    let fields = value.as_fields().unwrap();
    assert_eq!(fields.slot("cmd"), &Slot::Absent);
    assert_eq!(fields.slot("warn"), &Slot::Defaulted(0i64.into()));

    // An explicit default next to the open type is dropped again.
    let value = decode_all(
        &schema, &der("300f 020102 0a0103 a003020100 0c026869")
    );
    let fields = value.as_fields().unwrap();
    assert_eq!(fields.get("cmd"), Some(&Value::from(3i64)));
    assert_eq!(fields.slot("warn"), &Slot::Defaulted(0i64.into()));
    assert_eq!(value.field("body"), Some(&Value::open("text", "hi")));
    assert_eq!(
        schema.encode(&value).unwrap(), der("300a 020102 0a0103 0c026869")
    );

    let data = der("300c 020102 a003020105 0c026869");
    let value = decode_all(&schema, &data);
    assert_eq!(
        value.as_fields().unwrap().slot("warn"), &Slot::Present(5i64.into())
    );
    assert_eq!(schema.encode(&value).unwrap(), data);
    let value = decode_all(&schema, &der("3006 020101 0101ff"));
    assert_eq!(value.field("body"), Some(&Value::open("flag", true)));
    let value = decode_all(&schema, &der("3007 020107 04020000"));
    assert_eq!(
        value.field("body"),
        Some(&Value::open(
            "raw", Value::OctetString(Bytes::from_static(b"\0\0"))
        ))
    );

    // The wildcard wants an OCTET STRING.
    assert_eq!(
        schema.decode(&der("3006 020107 0101ff")).unwrap_err().kind(),
        &ErrorKind::MissingRequiredField("body".into())
    );

    // Keys must match the discriminator’s type.
    let oids = Arc::new(
        DispatchTable::new()
            .register_oid("1.2.3.4", "x", Schema::null()).unwrap()
    );
    assert_eq!(
        Schema::sequence("Message")
            .field("kind", Schema::integer())
            .defined_by("body", "kind", oids, Presence::Required)
            .build().unwrap_err(),
        BuildError::InvalidDiscriminator("body".into())
    );
}


//------------ Sharing -------------------------------------------------------

#[test]
fn concurrent_decoding() {
    let schema = extensions(crl_entry_extensions());
    let data = Arc::new(der(
        "301d \
         300a 0603551d15 04030a0101 \
         300f 0603551d13 0101ff 0405 30030101ff"
    ));
    let expected = decode_all(&schema, &data);
    let handles: Vec<_> = (0..8).map(|_| {
        let schema = schema.clone();
        let data = data.clone();
        thread::spawn(move || {
            (0..50).map(|_| schema.decode(&data).unwrap().0).last()
        })
    }).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(expected.clone()));
    }
}


//------------ Writing -------------------------------------------------------

#[test]
fn write_to_io_target() {
    use dertree::encode::{IoTarget, WriteError};

    let schema = algorithm_identifier();
    let value = Value::Sequence(
        Fields::new()
            .with("algorithm", oid(RSA_ENCRYPTION))
            .with("parameters", Value::Null)
    );
    let mut target = IoTarget::new(Vec::new());
    schema.write_encoded(&value, &mut target).unwrap();
    assert_eq!(
        target.into_writer(), der("300d 06092a864886f70d010101 0500")
    );

    // Nothing is written for a bad value.
    let mut target = IoTarget::new(Vec::new());
    let bad = Value::Sequence(Fields::new().with("parameters", Value::Null));
    assert!(matches!(
        schema.write_encoded(&bad, &mut target),
        Err(WriteError::Encode(_))
    ));
    assert!(target.into_writer().is_empty());
}
