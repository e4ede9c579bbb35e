//! Greeting formatters shared by the GraphQL `hello` query and the REST
//! user endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Greet `name` the way the GraphQL `hello` field does.
///
/// # Examples
/// ```
/// use hello_timer::domain::greet;
///
/// assert_eq!(greet("World"), "Hello, World!!!");
/// ```
#[must_use]
pub fn greet(name: &str) -> String {
    format!("Hello, {name}!!!")
}

/// Body returned by `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserGreeting {
    /// Greeting embedding the username verbatim.
    #[schema(example = "Hello alice")]
    pub message: String,
}

impl UserGreeting {
    /// Build the greeting for a path-supplied username. No escaping is applied.
    #[must_use]
    pub fn for_username(username: &str) -> Self {
        Self {
            message: format!("Hello {username}"),
        }
    }
}
