//! Behavioural tests for the REST facade, documentation pages and GraphQL
//! execution over HTTP.
#[path = "support/http.rs"]
mod http;
#[path = "support/world.rs"]
mod support_world;

use hello_timer::doc::LOGO_URL;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use support_world::WorldFixture;

#[fixture]
fn world() -> WorldFixture {
    support_world::world()
}

#[given("a running hello-timer server")]
fn a_running_hello_timer_server(world: &WorldFixture) {
    let _ = world;
}

#[when("the client requests {path}")]
fn the_client_requests(world: &WorldFixture, path: String) {
    http::perform_get(&world.world(), &path);
}

fn hello_request(name: &str) -> Value {
    json!({
        "query": "query Greet($name: String) { hello(name: $name) }",
        "variables": { "name": name }
    })
}

#[when("the client queries hello for {name}")]
fn the_client_queries_hello_for(world: &WorldFixture, name: String) {
    http::perform_post_json(&world.world(), "/graphql", hello_request(&name));
}

#[when("the client posts a hello query for {name} to {path}")]
fn the_client_posts_a_hello_query_to(world: &WorldFixture, name: String, path: String) {
    http::perform_post_json(&world.world(), &path, hello_request(&name));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    assert_eq!(world.world().borrow().last_status, Some(status));
}

#[then("the response lists a single item named {name}")]
fn the_response_lists_a_single_item_named(world: &WorldFixture, name: String) {
    let body = world.world().borrow().last_json();
    assert_eq!(body, json!([{ "name": name }]));
}

#[then("the greeting message is {message}")]
fn the_greeting_message_is(world: &WorldFixture, message: String) {
    let body = world.world().borrow().last_json();
    assert_eq!(body, json!({ "message": message }));
}

#[then("the document title is {title}")]
fn the_document_title_is(world: &WorldFixture, title: String) {
    let body = world.world().borrow().last_json();
    assert_eq!(body["info"]["title"], Value::String(title));
}

#[then("the document version is {version}")]
fn the_document_version_is(world: &WorldFixture, version: String) {
    let body = world.world().borrow().last_json();
    assert_eq!(body["info"]["version"], Value::String(version));
}

#[then("the document carries the teal logo")]
fn the_document_carries_the_teal_logo(world: &WorldFixture) {
    let body = world.world().borrow().last_json();
    assert_eq!(body["info"]["x-logo"], json!({ "url": LOGO_URL }));
}

#[then("the page references {asset}")]
fn the_page_references(world: &WorldFixture, asset: String) {
    let page = world.world().borrow().last_text();
    assert!(page.contains(&asset), "page should reference {asset}");
}

#[then("the page title is {title}")]
fn the_page_title_is(world: &WorldFixture, title: String) {
    let page = world.world().borrow().last_text();
    assert!(
        page.contains(&format!("<title>{title}</title>")),
        "page should be titled {title}"
    );
}

#[then("the page disables deep linking")]
fn the_page_disables_deep_linking(world: &WorldFixture) {
    let page = world.world().borrow().last_text();
    assert!(page.contains("\"deepLinking\": false"));
}

#[then("the content type starts with {prefix}")]
fn the_content_type_starts_with(world: &WorldFixture, prefix: String) {
    let ctx = world.world();
    let ctx = ctx.borrow();
    let content_type = ctx.last_content_type.as_deref().expect("content type");
    assert!(
        content_type.starts_with(&prefix),
        "content type {content_type} should start with {prefix}"
    );
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &WorldFixture, code: String) {
    let body = world.world().borrow().last_json();
    assert_eq!(body["code"], Value::String(code));
}

#[then("the error carries the response trace id")]
fn the_error_carries_the_response_trace_id(world: &WorldFixture) {
    let ctx = world.world();
    let ctx = ctx.borrow();
    let trace_id = ctx.last_trace_id.clone().expect("trace id header");
    assert_eq!(ctx.last_json()["traceId"], Value::String(trace_id));
}

#[then("the hello field is {greeting}")]
fn the_hello_field_is(world: &WorldFixture, greeting: String) {
    let body = world.world().borrow().last_json();
    assert_eq!(body, json!({ "data": { "hello": greeting } }));
}

#[scenario(path = "tests/features/rest_endpoints.feature", name = "Listing items")]
fn listing_items(world: WorldFixture) {
    drop(world);
}

#[scenario(path = "tests/features/rest_endpoints.feature", name = "Greeting a user")]
fn greeting_a_user(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/rest_endpoints.feature",
    name = "Reading the OpenAPI document"
)]
fn reading_the_openapi_document(world: WorldFixture) {
    drop(world);
}

#[scenario(path = "tests/features/rest_endpoints.feature", name = "Opening Swagger UI")]
fn opening_swagger_ui(world: WorldFixture) {
    drop(world);
}

#[scenario(path = "tests/features/rest_endpoints.feature", name = "Opening ReDoc")]
fn opening_redoc(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/rest_endpoints.feature",
    name = "Loading a documentation bundle"
)]
fn loading_a_documentation_bundle(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/rest_endpoints.feature",
    name = "Requesting an unknown path"
)]
fn requesting_an_unknown_path(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/rest_endpoints.feature",
    name = "Querying hello over HTTP"
)]
fn querying_hello_over_http(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/rest_endpoints.feature",
    name = "Querying hello at the trailing-slash endpoint"
)]
fn querying_hello_at_the_trailing_slash_endpoint(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/rest_endpoints.feature",
    name = "Opening the GraphQL explorer"
)]
fn opening_the_graphql_explorer(world: WorldFixture) {
    drop(world);
}
