//! Outermost filter: turns every downstream failure into one JSON envelope.
//!
//! Errors keep their own status and public message; panics become a generic
//! 500. Diagnostic detail is logged, never written into the body.

use crate::response::ErrorResponder;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};
use warden_kernel::gateway::{
    ChainError, FilterOrder, FilterResult, GatewayContext, GatewayFilter, Next,
};

#[derive(Debug, Default)]
pub struct ErrorCaptureFilter;

impl ErrorCaptureFilter {
    pub fn new() -> Self {
        Self
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[async_trait]
impl GatewayFilter for ErrorCaptureFilter {
    fn name(&self) -> &str {
        "error-capture"
    }

    fn order(&self) -> FilterOrder {
        FilterOrder::ERROR_CAPTURE
    }

    async fn filter(&self, ctx: GatewayContext, next: Next<'_>) -> FilterResult {
        let request_id = ctx.request.id.clone();

        match AssertUnwindSafe(next.run(ctx)).catch_unwind().await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(err)) => {
                if err.status() >= 500 {
                    error!(request_id = %request_id, error = %err, "gateway error");
                } else {
                    debug!(request_id = %request_id, error = %err, "request rejected");
                }
                Ok(ErrorResponder::from_error(&err))
            }
            Err(payload) => {
                let err = ChainError::Internal(panic_message(payload.as_ref()));
                error!(request_id = %request_id, error = %err, "filter chain panicked");
                Ok(ErrorResponder::from_error(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterPipeline;
    use crate::filter::tests::{RecordingForwarder, Trace};
    use std::sync::Arc;
    use warden_kernel::gateway::{FilterDescriptor, Forwarder, GatewayRequest, HttpMethod};

    struct Exploding;

    #[async_trait]
    impl GatewayFilter for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn order(&self) -> FilterOrder {
            FilterOrder(0)
        }

        async fn filter(&self, _ctx: GatewayContext, _next: Next<'_>) -> FilterResult {
            panic!("database password is hunter2");
        }
    }

    struct Unavailable;

    #[async_trait]
    impl Forwarder for Unavailable {
        async fn forward(&self, _ctx: GatewayContext) -> FilterResult {
            Err(ChainError::BackendUnavailable("zeroq-back-service".into()))
        }
    }

    fn ctx() -> GatewayContext {
        GatewayContext::new(GatewayRequest::new("r1", "/api/v1/x", HttpMethod::Get))
    }

    fn body(resp: &warden_kernel::gateway::GatewayResponse) -> serde_json::Value {
        serde_json::from_slice(&resp.body).unwrap()
    }

    #[tokio::test]
    async fn panic_becomes_generic_500() {
        let trace: Trace = Arc::default();
        let pipeline = FilterPipeline::new(
            vec![
                FilterDescriptor::new(Arc::new(ErrorCaptureFilter::new())),
                FilterDescriptor::new(Arc::new(Exploding)),
            ],
            Arc::new(RecordingForwarder { trace: trace.clone() }),
        ).unwrap();

        let resp = pipeline.execute(ctx()).await.unwrap();
        assert_eq!(resp.status, 500);
        assert_eq!(
            body(&resp),
            serde_json::json!({"error": "Internal server error", "status": 500})
        );
        assert!(trace.lock().is_empty());
    }

    #[tokio::test]
    async fn errors_keep_their_status() {
        let pipeline = FilterPipeline::new(
            vec![FilterDescriptor::new(Arc::new(ErrorCaptureFilter::new()))],
            Arc::new(Unavailable),
        ).unwrap();
        let resp = pipeline.execute(ctx()).await.unwrap();
        assert_eq!(resp.status, 503);
        assert_eq!(body(&resp)["error"], "Service unavailable");
    }

    #[test]
    fn panic_payloads_are_stringified() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }
}
