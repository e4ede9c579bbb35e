//! `GET /users/{username}`: greet the path-supplied username.

use actix_web::{get, web};
use tracing::debug;

use crate::domain::UserGreeting;

/// Greet a user.
#[utoipa::path(
    get,
    path = "/users/{username}",
    tags = ["users"],
    operation_id = "read_user",
    params(("username" = String, Path, description = "Username echoed in the greeting")),
    responses(
        (status = 200, description = "Greeting", body = UserGreeting)
    )
)]
#[get("/users/{username}")]
pub async fn read_user(username: web::Path<String>) -> web::Json<UserGreeting> {
    let username = username.into_inner();
    debug!(%username, "greeting user");
    web::Json(UserGreeting::for_username(&username))
}
