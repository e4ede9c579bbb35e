//! `GET /items/`: the fixed demo listing.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::domain::{Item, ItemListing, list_items};

/// List items.
///
/// The response is documented as a single `Item`, while the body is a list
/// whose entries only carry a name.
#[utoipa::path(
    get,
    path = "/items/",
    tags = ["items"],
    operation_id = "read_items",
    responses(
        (status = 200, description = "Item listing", body = Item)
    )
)]
#[get("/items/")]
pub async fn read_items() -> web::Json<Vec<ItemListing>> {
    web::Json(list_items())
}

/// Redirect the slashless path to the canonical listing.
#[get("/items")]
pub async fn items_redirect() -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, "/items/"))
        .finish()
}
