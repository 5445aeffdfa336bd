//! Generates the content octets of object identifiers.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation and
//! you will receive the octet array for each of them, ready for use with
//! `Oid::from_static` when defining constants.

use std::env;
use std::str::FromStr;
use dertree::Oid;

fn process_one(arg: &str) -> Result<(), dertree::oid::ParseOidError> {
    let oid = Oid::from_str(arg)?;
    let octets: Vec<_> = oid.as_slice().iter().map(|x| {
        x.to_string()
    }).collect();
    println!("{}: b\"{}\" [{}]",
        oid,
        oid.as_slice().iter().map(|x| format!("\\x{:02x}", x))
            .collect::<String>(),
        octets.join(", "),
    );
    Ok(())
}

fn main() {
    for arg in env::args().skip(1) {
        if let Err(err) = process_one(&arg) {
            println!("{}: {}.", arg, err)
        }
    }
}
