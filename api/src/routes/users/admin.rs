use actix_web::HttpResponse;

use crate::dto::MessageResponse;
use crate::middleware::auth::AuthenticatedUser;

/// Handler for GET /api/users/admin
///
/// Only reachable through `RequireRole::any_of([Role::Admin])`.
pub async fn admin_dashboard(user: AuthenticatedUser) -> HttpResponse {
    log::info!("Admin dashboard accessed by user {}", user.id);
    HttpResponse::Ok().json(MessageResponse::new("Welcome to the admin dashboard"))
}
