use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::logger::Logger;
use crate::timing::RequestTiming;

/// Access-log handler for `axum::middleware::from_fn_with_state`.
pub async fn request_logger(
    State(logger): State<Arc<Logger>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let timing = RequestTiming::start(request.method().as_str(), request.uri().path());
    request.extensions_mut().insert(timing.clone());

    let response = next.run(request).await;
    logger.access_timed(&timing);

    response
}
