use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let node = &state.node;
    // Separate short reads; the figures need not be mutually consistent.
    HttpResponse::Ok().json(StatsResponse {
        height: node.chain_len() - 1,
        difficulty: node.difficulty(),
        pool_size: node.pool_len(),
        peers: node.peers().len(),
        mining: node.is_mining(),
        miner_address: node.miner_address().to_string(),
    })
}
