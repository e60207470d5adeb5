//! Basic DSN decoding and encoding.
//!
//! Run with: cargo run --example simple
//! Set `RUST_LOG=serde_dsn=trace` to watch the decoder commit pairs.

use serde::{Deserialize, Serialize};
use serde_dsn::{decode, encode, from_str, to_string};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Connection {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text = r"host=127.0.0.1 port=5432 user=admin password=p\=ss\sword";
    let dsn = decode(text)?;
    println!("Decoded {} pairs:", dsn.len());
    for (key, value) in &dsn {
        println!("  {key:>10} = {value:?}");
    }
    println!("Re-encoded: {}\n", encode(&dsn));

    // Typed round trip through serde
    let conn: Connection = from_str(text)?;
    println!("As struct: {conn:?}");
    let back = to_string(&conn)?;
    assert_eq!(from_str::<Connection>(&back)?, conn);
    println!("✓ Round-trip successful");

    // Errors report where the input went wrong
    for bad in ["test==true", "host", r"ans\wer=Hi", "a=1 a=2"] {
        println!("{bad:>12} -> {}", decode(bad).unwrap_err());
    }

    Ok(())
}
