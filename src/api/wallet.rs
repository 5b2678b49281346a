use actix_web::{HttpResponse, Responder, post, web};
use log::warn;

use super::models::{AppState, NewWalletResponse, StatusMessage};
use crate::wallet::Wallet;

/// Dev helper: mint a fresh keypair. Only served when `DEV_WALLET` is set; the
/// private key travels in the clear and is never stored by the node.
#[post("/wallet")]
pub async fn create_wallet(state: web::Data<AppState>) -> impl Responder {
    if !state.node.config().dev_wallet {
        return HttpResponse::NotFound().json(StatusMessage::fail());
    }
    warn!("POST /wallet - development only, private key sent over plain HTTP");
    let wallet = Wallet::generate();
    HttpResponse::Ok().json(NewWalletResponse {
        private_key: wallet.private_key_hex(),
        public_key: wallet.public_key().to_hex(),
        address: wallet.address().to_string(),
    })
}
