use actix_web::{cookie::Cookie, web, HttpResponse};

use crate::app::AppState;
use crate::dto::MessageResponse;
use crate::middleware::auth::AuthenticatedUser;

/// Handler for POST /api/auth/logout
///
/// Clears the credential cookie. Requires authentication.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid credential
pub async fn logout(state: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    log::debug!("Clearing session cookie for user {}", user.id);

    let mut cookie = Cookie::new(state.cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(MessageResponse::new("logged out successfully"))
}
