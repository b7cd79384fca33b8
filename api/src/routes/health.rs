use actix_web::HttpResponse;

use crate::dto::MessageResponse;

/// Handler for GET /ping
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new("pong"))
}
