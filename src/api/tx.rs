use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use log::{info, warn};

use super::models::{AppState, StatusMessage, TransactionsResponse};
use crate::transaction::TransactionRequest;

/// List the transaction pool.
#[get("/transactions")]
pub async fn get_transactions(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.node.pool();
    HttpResponse::Ok().json(TransactionsResponse {
        length: transactions.len(),
        transactions,
    })
}

/// Submit a signed transaction from a client; relayed to peers on success.
#[post("/transactions")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<TransactionRequest>,
) -> impl Responder {
    match state.node.create_transaction(&body) {
        Ok(()) => {
            info!("POST /transactions - admitted");
            HttpResponse::Created().json(StatusMessage::success())
        }
        Err(e) => {
            warn!("POST /transactions - rejected: {e}");
            HttpResponse::BadRequest().json(StatusMessage::fail())
        }
    }
}

/// Peer-to-peer relay of a transaction admitted elsewhere. Not relayed again.
#[put("/transactions")]
pub async fn put_transaction(
    state: web::Data<AppState>,
    body: web::Json<TransactionRequest>,
) -> impl Responder {
    match state.node.submit_request(&body) {
        Ok(_) => HttpResponse::Ok().json(StatusMessage::success()),
        Err(e) => {
            warn!("PUT /transactions - rejected: {e}");
            HttpResponse::BadRequest().json(StatusMessage::fail())
        }
    }
}

/// Peer-to-peer: a neighbor mined a block, drop our pending transactions.
#[delete("/transactions")]
pub async fn delete_transactions(state: web::Data<AppState>) -> impl Responder {
    state.node.clear_pool();
    HttpResponse::Ok().json(StatusMessage::success())
}
