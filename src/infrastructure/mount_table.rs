// Mount table - Routes requests below a dashboard base path to that dashboard
use crate::application::mount_registry::MountError;
use axum::{
    extract::Request,
    http::{uri::PathAndQuery, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Dashboard routers keyed by the base path they are mounted at.
///
/// Filled once at startup, then handed to the server as a fallback; every
/// request whose path falls under a mount point goes to that mount's router
/// with the mount prefix stripped. The longest matching prefix wins, so
/// `/dazzler/t/-/b/` shadows `/dazzler/t/-/` for the paths below it.
#[derive(Clone, Default)]
pub struct MountTable {
    mounts: Vec<(String, Router)>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `app` at `path`, which must start and end with `/`. A second
    /// mount at the same path is refused and the first one stays.
    pub fn mount(&mut self, path: String, app: Router) -> Result<(), MountError> {
        if path.len() < 2 || !path.starts_with('/') || !path.ends_with('/') {
            return Err(MountError::InvalidMountPoint { path });
        }
        if self.mounts.iter().any(|(p, _)| *p == path) {
            return Err(MountError::DuplicateMount { path });
        }
        self.mounts.push((path, app));
        Ok(())
    }

    /// Mount points in mount order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|(p, _)| p.as_str())
    }

    /// Find the mount serving `path` and the path that mount should see.
    pub fn resolve<'p>(&self, path: &'p str) -> Option<(&str, &Router, &'p str)> {
        self.mounts
            .iter()
            .filter_map(|(prefix, app)| {
                let rest = match path.strip_prefix(prefix.as_str()) {
                    Some(_) => &path[prefix.len() - 1..],
                    // The base path itself without its trailing slash
                    None if prefix.strip_suffix('/') == Some(path) => "/",
                    None => return None,
                };
                Some((prefix.as_str(), app, rest))
            })
            .max_by_key(|(prefix, _, _)| prefix.len())
    }

    /// Install the table as `base`'s fallback.
    pub fn into_router(self, base: Router) -> Router {
        let table = Arc::new(self);
        base.fallback(move |req: Request| {
            let table = table.clone();
            async move { table.dispatch(req).await }
        })
    }

    async fn dispatch(&self, mut req: Request) -> Response {
        let path = req.uri().path().to_string();
        let Some((prefix, app, rest)) = self.resolve(&path) else {
            tracing::debug!("No dashboard mounted for {}", path);
            return StatusCode::NOT_FOUND.into_response();
        };

        let path_and_query = match req.uri().query() {
            Some(query) => format!("{}?{}", rest, query),
            None => rest.to_string(),
        };
        let uri = match rewrite_path(req.uri(), &path_and_query) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!("Cannot rewrite {} for mount {}: {}", path, prefix, e);
                return StatusCode::BAD_REQUEST.into_response();
            }
        };
        tracing::debug!("Dispatching {} to {} as {}", path, prefix, uri);
        *req.uri_mut() = uri;

        match app.clone().oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

fn rewrite_path(uri: &Uri, path_and_query: &str) -> Result<Uri, axum::http::Error> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
