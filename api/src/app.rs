//! Application state and factory
//!
//! This module wires the gate chain into an Actix-web application:
//! `Logger` → `RateLimiter` (every request) → `CookieAuth` (protected
//! scopes) → `RequireRole` (per resource) → handler.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};
use sentinel_core::{
    domain::entities::Role,
    services::{AuthGate, RateGate},
};
use sentinel_shared::ErrorResponse;
use std::sync::Arc;

use crate::middleware::{CookieAuth, RateLimiter, RequireRole};
use crate::routes::{auth, health, users};

/// Shared state handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub rate_gate: Arc<RateGate>,
    pub auth_gate: Arc<AuthGate>,
    /// Cookie carrying the bearer credential
    pub cookie_name: String,
    pub trust_forwarded_headers: bool,
}

impl AppState {
    pub fn new(rate_gate: Arc<RateGate>, auth_gate: Arc<AuthGate>, cookie_name: impl Into<String>) -> Self {
        Self {
            rate_gate,
            auth_gate,
            cookie_name: cookie_name.into(),
            trust_forwarded_headers: false,
        }
    }

    pub fn trust_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let rate_limiter = RateLimiter::new(Arc::clone(&state.rate_gate))
        .trust_forwarded_headers(state.trust_forwarded_headers);

    App::new()
        .app_data(web::Data::new(state.clone()))
        // Registration order is inverse of execution: Logger runs first
        .wrap(rate_limiter)
        .wrap(Logger::default())
        .configure(|cfg| configure_routes(cfg, &state))
        .default_service(web::route().to(not_found))
}

/// Register every route with its gate stages
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let cookie_auth = CookieAuth::new(Arc::clone(&state.auth_gate), state.cookie_name.clone());

    cfg.route("/ping", web::get().to(health::ping)).service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .wrap(cookie_auth.clone())
                    .route("/logout", web::post().to(auth::logout)),
            )
            .service(
                web::scope("/users")
                    .wrap(cookie_auth)
                    .route("/profile", web::get().to(users::profile))
                    .service(
                        web::resource("/admin")
                            .wrap(RequireRole::any_of([Role::Admin]))
                            .route(web::get().to(users::admin_dashboard)),
                    ),
            ),
    );
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("not found"))
}
