//! Role authorization middleware
//!
//! Must be wrapped inside [`CookieAuth`](super::CookieAuth): it reads the
//! principal attached there and answers 401 when none is present.

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use sentinel_core::{
    domain::entities::{Principal, Role},
    services::RoleGate,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::handlers::error::ApiError;

/// Role requirement middleware factory
#[derive(Clone)]
pub struct RequireRole {
    gate: Rc<RoleGate>,
}

impl RequireRole {
    /// Admit principals holding any of `roles`
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            gate: Rc::new(RoleGate::require_any_of(roles)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            gate: Rc::clone(&self.gate),
        }))
    }
}

/// Role requirement middleware service
pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    gate: Rc<RoleGate>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let decision = {
            let extensions = req.extensions();
            self.gate.authorize(extensions.get::<Principal>())
        };

        if let Err(error) = decision {
            let response = ApiError::from(error).error_response();
            return Box::pin(ready(Ok(req.into_response(response).map_into_right_body())));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
