use actix_web::HttpResponse;

use crate::dto::ProfileResponse;
use crate::middleware::auth::AuthenticatedUser;

/// Handler for GET /api/users/profile
///
/// Returns the principal resolved for this request.
pub async fn profile(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse {
        message: "User is authenticated".to_string(),
        user: user.into_inner(),
    })
}
