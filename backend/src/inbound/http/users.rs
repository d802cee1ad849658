//! Endpoints scoped to the session user.
//!
//! ```text
//! GET /api/v1/users/me/tickets
//! ```

use actix_web::{get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::PurchaseResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Paid tickets of the current user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/tickets",
    responses(
        (status = 200, description = "Purchases", body = [PurchaseResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listMyTickets"
)]
#[get("/users/me/tickets")]
pub async fn my_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PurchaseResponse>>> {
    let user_id = session.require_user_id()?;
    let purchases = state.payments_query.purchases(user_id).await?;
    Ok(web::Json(purchases.iter().map(PurchaseResponse::from).collect()))
}
