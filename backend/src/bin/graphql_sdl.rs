//! Print the GraphQL schema in SDL form.

use std::io::{self, Write};

use hello_timer::domain::TimerService;
use hello_timer::inbound::graphql::schema::build_schema;

fn main() -> io::Result<()> {
    let schema = build_schema(TimerService::default())
        .map_err(|error| io::Error::other(error.to_string()))?;
    write!(io::stdout().lock(), "{}", schema.sdl())
}
