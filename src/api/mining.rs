use actix_web::{HttpResponse, Responder, get, web};
use log::warn;

use super::models::{AppState, StatusMessage};

/// Run one mining cycle now.
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    match state.node.mine().await {
        Ok(_) => HttpResponse::Ok().json(StatusMessage::success()),
        Err(e) => {
            warn!("GET /mine - {e}");
            HttpResponse::BadRequest().json(StatusMessage::fail())
        }
    }
}

/// Begin periodic mining (no-op if already running).
#[get("/mine/start")]
pub async fn start_mining(state: web::Data<AppState>) -> impl Responder {
    state.node.start_mining();
    HttpResponse::Ok().json(StatusMessage::success())
}

/// Stop periodic mining.
#[get("/mine/stop")]
pub async fn stop_mining(state: web::Data<AppState>) -> impl Responder {
    state.node.stop_mining();
    HttpResponse::Ok().json(StatusMessage::success())
}
