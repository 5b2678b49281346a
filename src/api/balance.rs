use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AmountQuery, AmountResponse, AppState, StatusMessage};

#[get("/amount")]
pub async fn get_amount(
    state: web::Data<AppState>,
    query: web::Query<AmountQuery>,
) -> impl Responder {
    match query.address.as_deref().filter(|a| !a.is_empty()) {
        Some(address) => HttpResponse::Ok().json(AmountResponse {
            amount: state.node.balance(address),
        }),
        None => HttpResponse::BadRequest().json(StatusMessage::fail()),
    }
}
