//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use hello_timer::doc::openapi_document;

fn main() -> io::Result<()> {
    let document = openapi_document().map_err(io::Error::other)?;
    let rendered = serde_json::to_string_pretty(&document).map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{rendered}")
}
