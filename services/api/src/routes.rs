use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use ta_portal::workflows::postings::applications::{
    portal_router, DefaultDocumentPrompt, PortalService, StateStore,
};

pub(crate) fn with_portal_routes<S, P>(service: Arc<PortalService<S, P>>) -> axum::Router
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    portal_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use ta_portal::workflows::postings::applications::{
        DocumentPolicy, FixedDecisionPrompt, MemoryStateStore,
    };
    use tower::ServiceExt;

    fn test_router() -> axum::Router {
        let service = Arc::new(PortalService::new(
            Arc::new(MemoryStateStore::default()),
            Arc::new(FixedDecisionPrompt::declining()),
            DocumentPolicy::default(),
        ));
        with_portal_routes(service)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn portal_routes_are_mounted() {
        let response = test_router()
            .oneshot(Request::get("/api/v1/postings").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
