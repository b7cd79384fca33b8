//! Rate limiting middleware
//!
//! Admits or rejects every request through the shared `RateGate` before
//! any other processing. The client key is the peer address (or a trusted
//! forwarding header) and the route key is the matched route template.

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use sentinel_core::services::RateGate;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use super::client::{client_key, route_key};
use crate::handlers::error::ApiError;

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimiter {
    gate: Arc<RateGate>,
    trust_forwarded: bool,
}

impl RateLimiter {
    /// Create a rate limiter keyed by peer address
    pub fn new(gate: Arc<RateGate>) -> Self {
        Self {
            gate,
            trust_forwarded: false,
        }
    }

    /// Read `X-Forwarded-For` / `X-Real-IP` for the client key.
    /// Only enable behind a proxy that overwrites these headers.
    pub fn trust_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
            trust_forwarded: self.trust_forwarded,
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    gate: Arc<RateGate>,
    trust_forwarded: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(req.request(), self.trust_forwarded);
        let route = route_key(req.request());

        if let Err(error) = self.gate.admit(&client, &route).into_result() {
            let response = ApiError::from(error).error_response();
            return Box::pin(ready(Ok(req.into_response(response).map_into_right_body())));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
