//! Access-log filter.
//!
//! Wraps the rest of the chain with an [`InFlight`](crate::access_log::InFlight)
//! guard, so the recorder observes every terminal outcome: a response, an
//! error, or the request future being dropped mid-flight.

use crate::access_log::{AccessLogRecorder, Outcome};
use async_trait::async_trait;
use std::sync::Arc;
use warden_kernel::gateway::{FilterOrder, FilterResult, GatewayContext, GatewayFilter, Next};

pub struct LoggingFilter {
    recorder: Arc<AccessLogRecorder>,
}

impl LoggingFilter {
    pub fn new(recorder: Arc<AccessLogRecorder>) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl GatewayFilter for LoggingFilter {
    fn name(&self) -> &str {
        "access-log"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::LOGGING
    }

    async fn filter(&self, ctx: GatewayContext, next: Next<'_>) -> FilterResult {
        let in_flight = self.recorder.begin(&ctx.request);
        let result = next.run(ctx).await;

        let elapsed = match &result {
            Ok(resp) => in_flight.finish(Outcome::Response(resp)),
            Err(err) => in_flight.finish(Outcome::Error(err)),
        };

        result.map(|mut resp| {
            resp.latency_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            resp
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_log::tests::CapturingSink;
    use crate::filter::FilterPipeline;
    use std::time::Duration;
    use warden_kernel::gateway::{
        ChainError, FilterDescriptor, Forwarder, GatewayRequest, GatewayResponse, HttpMethod,
    };

    struct Fixed(Result<u16, ()>);

    #[async_trait]
    impl Forwarder for Fixed {
        async fn forward(&self, _ctx: GatewayContext) -> FilterResult {
            match self.0 {
                Ok(status) => Ok(GatewayResponse::new(status, "svc")),
                Err(()) => Err(ChainError::BadGateway {
                    backend_id: "svc".into(),
                    message: "connection refused".into(),
                }),
            }
        }
    }

    struct Hang;

    #[async_trait]
    impl Forwarder for Hang {
        async fn forward(&self, _ctx: GatewayContext) -> FilterResult {
            std::future::pending().await
        }
    }

    fn pipeline(sink: &Arc<CapturingSink>, terminal: Arc<dyn Forwarder>) -> FilterPipeline {
        let recorder = AccessLogRecorder::new().with_sink(sink.clone());
        FilterPipeline::new(
            vec![FilterDescriptor::new(Arc::new(LoggingFilter::new(Arc::new(recorder))))],
            terminal,
        ).unwrap()
    }

    fn ctx() -> GatewayContext {
        GatewayContext::new(GatewayRequest::new("r1", "/api/v1/orders?page=1", HttpMethod::Get))
    }

    #[tokio::test]
    async fn response_is_logged_before_and_after() {
        let sink = Arc::new(CapturingSink::default());
        let resp = pipeline(&sink, Arc::new(Fixed(Ok(201))))
            .execute(ctx())
            .await
            .unwrap();
        assert_eq!(resp.status, 201);
        assert_eq!(
            *sink.events.lock(),
            vec!["before GET /api/v1/orders", "after /api/v1/orders response 201"]
        );
    }

    #[tokio::test]
    async fn errors_are_logged_and_passed_through() {
        let sink = Arc::new(CapturingSink::default());
        let result = pipeline(&sink, Arc::new(Fixed(Err(())))).execute(ctx()).await;
        assert!(matches!(result, Err(ChainError::BadGateway { .. })));
        assert_eq!(sink.events.lock()[1], "after /api/v1/orders error 502");
    }

    #[tokio::test]
    async fn dropped_request_is_logged_as_cancelled() {
        let sink = Arc::new(CapturingSink::default());
        let p = pipeline(&sink, Arc::new(Hang));

        let outcome = tokio::time::timeout(Duration::from_millis(20), p.execute(ctx())).await;
        assert!(outcome.is_err());
        assert_eq!(
            *sink.events.lock(),
            vec!["before GET /api/v1/orders", "after /api/v1/orders cancelled"]
        );
    }
}
