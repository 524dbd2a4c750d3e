use axum::http::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::logger::Logger;
use crate::timing::RequestTiming;

#[derive(Debug, Clone)]
pub struct AccessLogLayer {
    logger: Arc<Logger>,
}

impl AccessLogLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLog {
            inner,
            logger: Arc::clone(&self.logger),
        }
    }
}

/// Stamps each request with a [`RequestTiming`] and logs it once the inner
/// service has produced a response. Requests whose future is dropped before
/// completing are never logged.
#[derive(Debug, Clone)]
pub struct AccessLog<S> {
    inner: S,
    logger: Arc<Logger>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let timing = RequestTiming::start(request.method().as_str(), request.uri().path());
        request.extensions_mut().insert(timing.clone());

        let logger = Arc::clone(&self.logger);
        let response = self.inner.call(request);

        Box::pin(async move {
            let response = response.await?;
            logger.access_timed(&timing);
            Ok(response)
        })
    }
}
