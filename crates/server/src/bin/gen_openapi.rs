//! Write the portal's OpenAPI document.
//!
//! `gen-openapi` prints to stdout; `gen-openapi docs/openapi.json` writes the file.

use server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi().to_pretty_json()?;

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, doc)?;
            eprintln!("Wrote {path}");
        }
        None => println!("{doc}"),
    }
    Ok(())
}
