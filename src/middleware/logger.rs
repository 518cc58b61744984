use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

/// Log the host and URI of each call to the wrapped routes
pub async fn log_request(req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_owned();

    tracing::info!(host = %host, method = %req.method(), uri = %req.uri(), "called");

    next.run(req).await
}
