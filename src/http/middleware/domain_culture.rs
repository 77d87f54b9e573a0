//! Domain/culture middleware.
//! Attaches a [`DomainCulture`] to every request.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::culture::{DomainCulture, Resolver};
use crate::http::request::extract_signals;
use crate::observability::metrics;

/// Resolver shared with the middleware; swapped wholesale on reload.
pub type SharedResolver = Arc<ArcSwap<Resolver>>;

/// Resolve the request's domain and culture and insert the resulting
/// [`DomainCulture`] into request extensions. Never rejects a request.
///
/// Handlers read it with `Extension<DomainCulture>`.
pub async fn domain_culture_middleware(
    State(resolver): State<SharedResolver>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let signals = extract_signals(req.uri(), req.headers());
    let resolution = resolver.load().classify(&signals);

    metrics::record_resolution(resolution.tier);
    tracing::debug!(
        tier = %resolution.tier,
        domain = %resolution.domain_culture.domain,
        culture = %resolution.domain_culture.culture,
        "Resolved domain culture"
    );

    req.extensions_mut().insert::<DomainCulture>(resolution.domain_culture);
    next.run(req).await
}
