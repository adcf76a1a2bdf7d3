//! Print the OpenAPI document for the portal API.

use anyhow::Result;

fn main() -> Result<()> {
    let spec = innohub::api::openapi();
    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}
