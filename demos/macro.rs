//! Using the dsn! macro to build mappings.
//!
//! Run with: cargo run --example macro

use serde_dsn::{dsn, Dsn};

fn main() {
    let empty: Dsn = dsn!();
    println!("Empty: {:?}", empty.to_string());

    let port = 5432;
    let db = dsn! {
        "host" => "localhost",
        "port" => port,
        "sslmode" => "require",
        "application_name" => "my app",
        "connect_timeout" => 2.5,
    };
    println!("Database: {db}");

    // Later keys overwrite earlier ones
    let overridden = dsn! { "mode" => "dev", "mode" => "prod" };
    println!("Overridden: {overridden}");

    // Reserved characters are escaped on output
    let tricky = dsn! { "expr" => "1+2=3", "path" => r"C:\Temp", "quote" => "it's" };
    println!("Escaped: {tricky}");
}
