use actix_web::{HttpResponse, Responder, get, put, web};

use super::models::{AppState, StatusMessage};
use crate::codec::ChainEnvelope;

/// Get the full blockchain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    HttpResponse::Ok().json(ChainEnvelope { chain: &chain })
}

/// Peer-to-peer: re-run conflict resolution against our neighbors.
#[put("/consensus")]
pub async fn put_consensus(state: web::Data<AppState>) -> impl Responder {
    state.node.resolve_conflicts().await;
    HttpResponse::Ok().json(StatusMessage::success())
}
