//! Per-client request throttling keyed by peer IP address.
//!
//! Every route shares one GCRA limiter. Half of `max_requests` is available
//! as a burst and the other half trickles back evenly over `window`, so no
//! window-long interval admits more than `max_requests`. Over the limit the
//! request is answered with 429 and never reaches the session layer or a
//! handler.

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, ContentType};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use governor::clock::Clock;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;

/// Body sent with every 429.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later";

/// Request budget per client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: NonZeroU32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    /// 200 requests per 15 minutes.
    fn default() -> Self {
        Self {
            max_requests: NonZeroU32::MIN.saturating_add(199),
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitPolicy {
    /// Burst of `max / 2`; the remainder replenishes one at a time across
    /// `window`.
    fn quota(&self) -> Quota {
        let max = self.max_requests.get();
        let burst = NonZeroU32::new(max / 2).unwrap_or(NonZeroU32::MIN);
        let replenished = (max - burst.get()).max(1);
        Quota::with_period(self.window / replenished)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Middleware factory sharing one keyed limiter across all workers.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use complaints::middleware::RateLimit;
///
/// let limit = RateLimit::default();
/// let app = App::new().wrap(limit.clone());
/// limit.retain_recent();
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}

impl RateLimit {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::keyed(policy.quota())),
        }
    }

    /// Drop state for clients whose budget has fully replenished.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of client addresses currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Requests without a peer address (in-process test calls) share a bucket.
        let client = req
            .peer_addr()
            .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |addr| addr.ip());

        if let Err(not_until) = self.limiter.check_key(&client) {
            let wait = not_until.wait_time_from(self.limiter.clock().now());
            warn!(%client, path = %req.path(), "rate limit exceeded");
            let response = HttpResponse::TooManyRequests()
                .insert_header((header::RETRY_AFTER, wait.as_secs().max(1).to_string()))
                .content_type(ContentType::plaintext())
                .body(RATE_LIMITED_MESSAGE);
            let res = req.into_response(response).map_into_right_body();
            return Box::pin(ready(Ok(res)));
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
