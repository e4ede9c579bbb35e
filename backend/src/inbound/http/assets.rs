//! Static documentation assets served from a capability-scoped directory.
//!
//! Lookups go through `cap_std::fs::Dir`, so request paths cannot escape the
//! configured root.

use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};

use crate::domain::Error;

/// Handle on the directory backing `/static`.
#[derive(Clone, Default)]
pub struct StaticAssets {
    root: Option<Arc<Dir>>,
}

impl StaticAssets {
    /// Open `path` for serving. A missing directory is logged and every lookup
    /// then answers not-found.
    pub fn open(path: &Path) -> Self {
        match Dir::open_ambient_dir(path, ambient_authority()) {
            Ok(dir) => Self {
                root: Some(Arc::new(dir)),
            },
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "static asset directory unavailable; documentation pages will not render"
                );
                Self::default()
            }
        }
    }

    /// Read one asset by its path relative to the root.
    pub async fn load(&self, name: String) -> Result<Vec<u8>, Error> {
        let Some(root) = self.root.clone() else {
            return Err(Error::not_found("Not Found"));
        };
        if name.is_empty() {
            return Err(Error::not_found("Not Found"));
        }

        let result = web::block(move || root.read(&name).map_err(|error| (name, error)))
            .await
            .map_err(|error| Error::internal(format!("asset read task failed: {error}")))?;

        result.map_err(|(name, error)| {
            if error.kind() == io::ErrorKind::NotFound {
                debug!(%name, "static asset missing");
            } else {
                warn!(%name, %error, "static asset not served");
            }
            Error::not_found("Not Found")
        })
    }
}

/// Media type for an asset, keyed on its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("html") => "text/html; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
