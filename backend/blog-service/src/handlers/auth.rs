/// Current-user endpoint
use crate::db::Stores;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};

pub async fn me(stores: web::Data<Stores>, user_id: UserId) -> Result<HttpResponse> {
    let user = stores
        .users
        .find_by_id(user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;
    Ok(HttpResponse::Ok().json(user))
}
