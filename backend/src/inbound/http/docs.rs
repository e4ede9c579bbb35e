//! Interactive documentation: Swagger UI, ReDoc, the OAuth2 redirect helper,
//! the OpenAPI document and the static bundles they load.
//!
//! Pages are rendered once from bundled templates when [`DocsState`] is built
//! and reference assets under `/static`, so no CDN is contacted.

use std::path::Path;

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use minijinja::context;
use thiserror::Error;

use super::assets::{StaticAssets, content_type_for};
use crate::doc::openapi_document;
use crate::domain::ApiResult;
use crate::inbound::templates::{environment, trusted_path};

/// Location of the OpenAPI document.
pub const OPENAPI_URL: &str = "/openapi.json";
/// Location of the Swagger UI OAuth2 redirect helper.
pub const OAUTH2_REDIRECT_URL: &str = "/docs/oauth2-redirect";
/// Swagger UI script bundle.
pub const SWAGGER_JS_URL: &str = "/static/swagger-ui-bundle.js";
/// Swagger UI stylesheet.
pub const SWAGGER_CSS_URL: &str = "/static/swagger-ui.css";
/// ReDoc standalone bundle.
pub const REDOC_JS_URL: &str = "/static/redoc.standalone.js";

const SWAGGER_TEMPLATE: &str = "swagger_ui.html";
const REDOC_TEMPLATE: &str = "redoc.html";
const OAUTH2_REDIRECT_TEMPLATE: &str = "oauth2_redirect.html";

const TEMPLATES: [(&str, &str); 3] = [
    (SWAGGER_TEMPLATE, include_str!("templates/swagger_ui.html")),
    (REDOC_TEMPLATE, include_str!("templates/redoc.html")),
    (
        OAUTH2_REDIRECT_TEMPLATE,
        include_str!("templates/oauth2_redirect.html"),
    ),
];

/// Failure while preparing the documentation routes.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The OpenAPI document could not be serialised.
    #[error("failed to render OpenAPI document: {0}")]
    OpenApi(#[from] serde_json::Error),
    /// A page template failed to parse or render.
    #[error("failed to render documentation page: {0}")]
    Template(#[from] minijinja::Error),
}

/// Pre-rendered documentation pages plus the asset directory.
pub struct DocsState {
    openapi_json: web::Bytes,
    swagger_ui: String,
    redoc: String,
    oauth2_redirect: String,
    assets: StaticAssets,
}

impl DocsState {
    /// Render the OpenAPI document and pages, serving assets from `static_dir`.
    ///
    /// `title` prefixes the page titles and is HTML-escaped.
    pub fn new(title: &str, static_dir: &Path) -> Result<Self, DocsError> {
        let document_json = serde_json::to_vec(&openapi_document()?)?;
        let env = environment(&TEMPLATES)?;

        let swagger_ui_page = env.get_template(SWAGGER_TEMPLATE)?.render(context! {
            title => format!("{title} - Swagger UI"),
            openapi_url => trusted_path(OPENAPI_URL),
            oauth2_redirect_url => trusted_path(OAUTH2_REDIRECT_URL),
            js_url => trusted_path(SWAGGER_JS_URL),
            css_url => trusted_path(SWAGGER_CSS_URL),
        })?;
        let redoc_page = env.get_template(REDOC_TEMPLATE)?.render(context! {
            title => format!("{title} - ReDoc"),
            openapi_url => trusted_path(OPENAPI_URL),
            js_url => trusted_path(REDOC_JS_URL),
        })?;
        let oauth2_redirect = env
            .get_template(OAUTH2_REDIRECT_TEMPLATE)?
            .render(context! {})?;

        Ok(Self {
            openapi_json: web::Bytes::from(document_json),
            swagger_ui: swagger_ui_page,
            redoc: redoc_page,
            oauth2_redirect,
            assets: StaticAssets::open(static_dir),
        })
    }
}

fn html(body: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body.into())
}

/// Serve the OpenAPI document.
#[get("/openapi.json")]
pub async fn openapi_json(state: web::Data<DocsState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(state.openapi_json.clone())
}

/// Swagger UI with deep linking disabled.
#[get("/docs")]
pub async fn swagger_ui(state: web::Data<DocsState>) -> HttpResponse {
    html(state.swagger_ui.as_str())
}

/// OAuth2 redirect helper used by Swagger UI's authorisation flows.
#[get("/docs/oauth2-redirect")]
pub async fn swagger_ui_redirect(state: web::Data<DocsState>) -> HttpResponse {
    html(state.oauth2_redirect.as_str())
}

/// ReDoc page.
#[get("/redoc")]
pub async fn redoc(state: web::Data<DocsState>) -> HttpResponse {
    html(state.redoc.as_str())
}

/// Static documentation bundles.
#[get("/static/{path:.*}")]
pub async fn static_asset(
    state: web::Data<DocsState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let content_type = content_type_for(&name);
    let body = state.assets.load(name).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use cap_std::{ambient_authority, fs::Dir};
    use rstest::rstest;
    use serde_json::Value;

    async fn docs_app(
        static_dir: &Path,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        let state = web::Data::new(DocsState::new("FastAPI", static_dir).expect("docs"));
        test::init_service(
            App::new()
                .app_data(state)
                .service(openapi_json)
                .service(swagger_ui)
                .service(swagger_ui_redirect)
                .service(redoc)
                .service(static_asset),
        )
        .await
    }

    async fn get_text(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        uri: &str,
    ) -> (StatusCode, Option<String>, String) {
        let res = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = test::read_body(res).await;
        (
            status,
            content_type,
            String::from_utf8(body.to_vec()).expect("utf8 body"),
        )
    }

    #[actix_web::test]
    async fn swagger_page_loads_local_bundles() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = docs_app(tmp.path()).await;
        let (status, content_type, body) = get_text(&app, "/docs").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.is_some_and(|value| value.starts_with("text/html")));
        for fragment in [
            SWAGGER_JS_URL,
            SWAGGER_CSS_URL,
            "url: \"/openapi.json\"",
            "\"deepLinking\": false",
            "window.location.origin + \"/docs/oauth2-redirect\"",
            "<title>FastAPI - Swagger UI</title>",
        ] {
            assert!(body.contains(fragment), "swagger page missing `{fragment}`");
        }
        assert!(!body.contains("{{"), "unrendered placeholder");
    }

    #[actix_web::test]
    async fn redoc_page_loads_local_bundle() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = docs_app(tmp.path()).await;
        let (status, _, body) = get_text(&app, "/redoc").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(REDOC_JS_URL));
        assert!(body.contains("<title>FastAPI - ReDoc</title>"));
        assert!(body.contains("<redoc spec-url=\"/openapi.json\"></redoc>"));
        assert!(!body.contains("{{"), "unrendered placeholder");
    }

    #[actix_web::test]
    async fn oauth2_redirect_page_is_served() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = docs_app(tmp.path()).await;
        let (status, _, body) = get_text(&app, "/docs/oauth2-redirect").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("swaggerUIRedirectOauth2"));
    }

    #[actix_web::test]
    async fn openapi_document_is_served_as_json() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = docs_app(tmp.path()).await;
        let (status, content_type, body) = get_text(&app, "/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let document: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(document["info"]["version"], "2.5.0");
        assert!(document["info"]["x-logo"]["url"].is_string());
    }

    #[rstest]
    #[case("/static/swagger-ui.css", StatusCode::OK)]
    #[case("/static/redoc.standalone.js", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn static_assets_come_from_the_configured_directory(
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let tmp = tempfile::tempdir().expect("tempdir");
        Dir::open_ambient_dir(tmp.path(), ambient_authority())
            .expect("open tempdir")
            .write("swagger-ui.css", "body { margin: 0 }")
            .expect("write asset");
        let app = docs_app(tmp.path()).await;
        let (status, content_type, _) = get_text(&app, uri).await;

        assert_eq!(status, expected);
        if expected == StatusCode::OK {
            assert_eq!(content_type.as_deref(), Some("text/css; charset=utf-8"));
        }
    }

    #[actix_web::test]
    async fn page_titles_are_escaped() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let state = DocsState::new("<Demo & Co>", tmp.path()).expect("docs");
        assert!(
            state
                .swagger_ui
                .contains("<title>&lt;Demo &amp; Co&gt; - Swagger UI</title>")
        );
        assert!(state.redoc.contains("&lt;Demo &amp; Co&gt; - ReDoc"));
        assert!(!state.swagger_ui.contains("<Demo"));
    }
}
