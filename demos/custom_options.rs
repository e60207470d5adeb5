//! Customizing DSN output with DsnOptions.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use serde_dsn::{to_string, to_string_with_options, DsnOptions, Separator};
use std::collections::HashMap;
use std::error::Error;

#[derive(Debug, Serialize)]
struct Config {
    name: String,
    version: String,
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        debug: true,
    };

    // Default format (field order, single spaces)
    println!("Default:   {}", to_string(&config)?);

    // Tab separator
    let options = DsnOptions::new().with_separator(Separator::Tab);
    println!("Tab:       {:?}", to_string_with_options(&config, &options)?);

    // HashMap iteration order varies between runs; canonical output does not
    let mut params = HashMap::new();
    params.insert("zone", "eu-west");
    params.insert("account", "ops team");
    params.insert("region", "1");
    println!(
        "Canonical: {}",
        to_string_with_options(&params, &DsnOptions::canonical())?
    );

    Ok(())
}
