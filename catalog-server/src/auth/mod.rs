//! Admin guard middleware
//!
//! Authentication proper is an external collaborator; this crate only
//! enforces the seam: storefront reads are public, everything else under
//! `/api/` requires the administrator bearer token. The token is issued
//! out-of-band and arrives via configuration.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::core::ServerState;
use crate::utils::AppError;

/// Storefront read surface, reachable without credentials.
///
/// Admin reads (impact preview, raw listings, maintenance audit) are
/// deliberately not here: they expose soft-deleted rows and deletion
/// planning data.
fn is_public(method: &Method, path: &str) -> bool {
    if method != Method::GET {
        return false;
    }
    matches!(
        path,
        "/api/health"
            | "/api/categories"
            | "/api/categories/tree"
            | "/api/subcategories"
            | "/api/products/by-nodes"
    ) || (path.starts_with("/api/pages/")
        && (path.ends_with("/categories") || path.ends_with("/products")))
}

/// Admin guard, layered over the whole API router.
///
/// `Authorization: Bearer <token>` must match the configured admin token
/// on every non-public route. OPTIONS requests pass through for CORS
/// preflight; non-`/api/` paths fall through to the normal 404.
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || is_public(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(t) if t == state.config.admin_token => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(target: "security", uri = %req.uri(), "Rejected admin request with bad token");
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Rejected admin request without credentials");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_surface() {
        assert!(is_public(&Method::GET, "/api/categories/tree"));
        assert!(is_public(&Method::GET, "/api/products/by-nodes"));
        assert!(is_public(&Method::GET, "/api/pages/offer/summer/products"));
        assert!(is_public(&Method::GET, "/api/pages/gaming-zone/rgb/categories"));

        // Mutations and admin reads are guarded
        assert!(!is_public(&Method::POST, "/api/categories"));
        assert!(!is_public(&Method::GET, "/api/categories/category:c1/impact"));
        assert!(!is_public(&Method::GET, "/api/maintenance/hierarchy-issues"));
        assert!(!is_public(&Method::DELETE, "/api/categories/category:c1/cascade"));
    }
}
