//! Gateway filter trait and filter-chain types.
//!
//! A filter chain is an ordered list of [`FilterDescriptor`]s wrapped around
//! a terminal [`Forwarder`]. Descriptors are sorted once by ascending
//! [`FilterOrder`]; the lowest value is the outermost wrapper.
//!
//! ```text
//!  ErrorCapture ─► AuthGate ─► Identity ─► AccessLog ─► Forward
//!        ◄────────────◄────────────◄───────────◄─────── response
//! ```
//!
//! Every filter receives the request context together with a [`Next`]
//! continuation. It may call `next.run(ctx)` and return the result as-is,
//! call it and post-process the result, or return without calling it at all
//! (short-circuit). `Next` is consumed by `run`, so the rest of the chain can
//! be entered at most once per filter invocation.

use super::error::ChainError;
use super::types::{GatewayContext, GatewayResponse};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Outcome of a filter or of the terminal forward step.
pub type FilterResult = Result<GatewayResponse, ChainError>;

// ─────────────────────────────────────────────────────────────────────────────
// Filter ordering
// ─────────────────────────────────────────────────────────────────────────────

/// Numeric ordering slot for a filter in the chain.
///
/// The well-known slots below are defaults; any `i32` is accepted so custom
/// filters can slot in between. Equal values keep registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterOrder(pub i32);

impl FilterOrder {
    /// Outermost slot: turns residual errors and panics into responses.
    pub const ERROR_CAPTURE: FilterOrder = FilterOrder(-300);
    /// Authentication gate.
    pub const AUTH: FilterOrder = FilterOrder(-200);
    /// Identity header propagation; needs the auth gate's decision.
    pub const IDENTITY: FilterOrder = FilterOrder(-150);
    /// Access logging, after rejected requests have been turned away.
    pub const LOGGING: FilterOrder = FilterOrder(-100);
}

impl fmt::Display for FilterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayFilter trait
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel contract for a single filter in the gateway chain.
///
/// Implementations must be `Send + Sync` so one instance can serve every
/// concurrent request; per-request state belongs in the [`GatewayContext`]
/// or on the stack of [`filter`](Self::filter).
#[async_trait]
pub trait GatewayFilter: Send + Sync {
    /// Stable, human-readable identifier for this filter (used in logs and
    /// for priority overrides in configuration).
    fn name(&self) -> &str;

    /// Default position in the filter chain. Lower values run first.
    fn order(&self) -> FilterOrder;

    /// Process one request. Call `next.run(ctx)` to continue the chain.
    async fn filter(&self, ctx: GatewayContext, next: Next<'_>) -> FilterResult;
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal step
// ─────────────────────────────────────────────────────────────────────────────

/// The forward-to-backend step at the end of the chain.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, ctx: GatewayContext) -> FilterResult;
}

// ─────────────────────────────────────────────────────────────────────────────
// FilterDescriptor
// ─────────────────────────────────────────────────────────────────────────────

/// A filter bound to its effective priority.
#[derive(Clone)]
pub struct FilterDescriptor {
    pub priority: FilterOrder,
    pub name: String,
    pub behavior: Arc<dyn GatewayFilter>,
}

impl FilterDescriptor {
    /// Describe `filter` at its own default [`order`](GatewayFilter::order).
    pub fn new(filter: Arc<dyn GatewayFilter>) -> Self {
        Self {
            priority: filter.order(),
            name: filter.name().to_string(),
            behavior: filter,
        }
    }

    /// Override the priority (e.g. from configuration).
    pub fn with_priority(mut self, priority: FilterOrder) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Debug for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDescriptor")
            .field("priority", &self.priority)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Continuation
// ─────────────────────────────────────────────────────────────────────────────

/// "The rest of the chain": the remaining filters plus the terminal step.
pub struct Next<'a> {
    filters: &'a [FilterDescriptor],
    terminal: &'a dyn Forwarder,
}

impl<'a> Next<'a> {
    /// Continuation positioned at the start of `filters`.
    ///
    /// `filters` must already be sorted; the pipeline owning them does that
    /// once at construction.
    pub fn new(filters: &'a [FilterDescriptor], terminal: &'a dyn Forwarder) -> Self {
        Self { filters, terminal }
    }

    /// Run the remainder of the chain. Consumes the continuation.
    pub fn run(self, ctx: GatewayContext) -> BoxFuture<'a, FilterResult> {
        Box::pin(async move {
            match self.filters.split_first() {
                Some((current, rest)) => {
                    let next = Next {
                        filters: rest,
                        terminal: self.terminal,
                    };
                    current.behavior.filter(ctx, next).await
                }
                None => self.terminal.forward(ctx).await,
            }
        })
    }

    /// Names of the filters that have not run yet, in execution order.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|d| d.name.as_str())
    }
}
