//! API 路由模块
//!
//! | 模块 | 路径 | 说明 |
//! |------|------|------|
//! | [`health`] | /api/health | 健康检查 |
//! | [`installment_sales`] | /api/installment-sales, /api/salesman/* | 销售创建与查询 |
//! | [`payments`] | /api/installment-sales/{id}/payments, /api/installment-payments | 还款 |
//! | [`salesmen`] | /api/salesmen, /api/assign-salesmen | 业务员与分配 |

pub mod health;
pub mod installment_sales;
pub mod payments;
pub mod salesmen;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use http::HeaderName;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// 表单字段 + multipart 边界的额外空间
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(installment_sales::router())
        .merge(payments::router())
        .merge(salesmen::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: ServerState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    build_router()
        // Customer photos arrive inside the sale form
        .layer(DefaultBodyLimit::max(body_limit))
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(middleware::from_fn(log_request))
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID - Generate unique ID for each request (outermost)
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
        .with_state(state)
}
