//! Reading and writing typed values with defaults.
//!
//! Run with: cargo run --example typed_accessors

use serde_dsn::Dsn;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut dsn: Dsn =
        "server=127.0.0.1 port=80 sslmode=true keepalive=0 timeout=1.5".parse()?;

    println!("server    = {}", dsn.get_string("server", "localhost"));
    println!("port      = {}", dsn.get_int("port", 443));
    println!("sslmode   = {}", dsn.get_bool("sslmode", false));
    println!("keepalive = {}", dsn.get_bool("keepalive", true));
    println!("timeout   = {}", dsn.get_float("timeout", 30.0));

    // Missing or unparsable values fall back to the default
    println!("retries   = {} (missing)", dsn.get_int("retries", 3));
    println!("timeout   = {} (as int)", dsn.get_int("timeout", 10));

    dsn.set_int("port", 8080);
    dsn.set_int64("max_bytes", 10_000_000_000);
    dsn.set_bool("keepalive", true);
    dsn.set_float("timeout", 5.0);
    dsn.set_string("comment", "edited by hand");

    println!("\nUpdated: {dsn}");
    Ok(())
}
