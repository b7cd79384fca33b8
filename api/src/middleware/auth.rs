//! Cookie credential authentication middleware
//!
//! Reads the bearer credential from the configured cookie, runs it through
//! the `AuthGate` and attaches the resolved `Principal` to the request
//! extensions. Every failure ends the request with 401 and attaches nothing.

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use sentinel_core::{domain::entities::Principal, errors::GateError, services::AuthGate};
use std::{
    future::{ready, Ready},
    ops::Deref,
    rc::Rc,
    sync::Arc,
};

use crate::handlers::error::ApiError;

/// Cookie authentication middleware factory
#[derive(Clone)]
pub struct CookieAuth {
    gate: Arc<AuthGate>,
    cookie_name: Rc<str>,
}

impl CookieAuth {
    /// Create the middleware reading the credential from `cookie_name`
    pub fn new(gate: Arc<AuthGate>, cookie_name: impl Into<String>) -> Self {
        Self {
            gate,
            cookie_name: Rc::from(cookie_name.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CookieAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieAuthMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
            cookie_name: Rc::clone(&self.cookie_name),
        }))
    }
}

/// Cookie authentication middleware service
pub struct CookieAuthMiddleware<S> {
    service: Rc<S>,
    gate: Arc<AuthGate>,
    cookie_name: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for CookieAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        let credential = req.cookie(&self.cookie_name).map(|c| c.value().to_owned());

        Box::pin(async move {
            match gate.authenticate(credential.as_deref()).await {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    let response = ApiError::from(error).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extractor for the principal attached by [`CookieAuth`].
///
/// Fails with 401 when the route is not behind the authentication
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Principal);

impl AuthenticatedUser {
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl Deref for AuthenticatedUser {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(ApiError(GateError::ContextMissing));

        ready(result)
    }
}
