mod balance;
mod chain;
mod health;
mod mining;
pub mod models;
mod stats;
mod tx;
mod wallet;

use actix_web::error::InternalError;
use actix_web::web::{self, ServiceConfig};
use actix_web::HttpResponse;
use log::warn;

pub use models::AppState;
use models::StatusMessage;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::health_check)
        .service(chain::get_chain)
        .service(chain::put_consensus)
        .service(tx::get_transactions)
        .service(tx::post_transaction)
        .service(tx::put_transaction)
        .service(tx::delete_transactions)
        .service(mining::mine)
        .service(mining::start_mining)
        .service(mining::stop_mining)
        .service(balance::get_amount)
        .service(stats::get_stats)
        .service(wallet::create_wallet);
}

/// Undecodable bodies get the same `{"message":"fail"}` answer as rejected ones.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!("{} {} - undecodable body: {err}", req.method(), req.path());
        InternalError::from_response(err, HttpResponse::BadRequest().json(StatusMessage::fail()))
            .into()
    })
}
