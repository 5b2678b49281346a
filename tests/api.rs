//! HTTP surface tests against an in-process service.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{App, test, web};
use std::sync::Arc;

use pow_ledger::api::models::{AmountResponse, StatusMessage, TransactionsResponse};
use pow_ledger::api::{self, AppState};
use pow_ledger::blockchain::{MINING_SENDER, validate_chain};
use pow_ledger::codec;
use pow_ledger::config::NodeConfig;
use pow_ledger::node::Node;
use pow_ledger::transaction::{BalancePolicy, Transaction, TransactionRequest};
use pow_ledger::wallet::Wallet;

fn node(policy: BalancePolicy) -> Arc<Node> {
    let config = NodeConfig {
        difficulty: 2,
        balance_policy: policy,
        mine_on_start: false,
        ..NodeConfig::default()
    };
    Arc::new(Node::new(config, "miner".into()).unwrap())
}

macro_rules! service {
    ($node:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($node.clone())))
                .configure(api::init_routes),
        )
        .await
    };
}

fn signed_request(wallet: &Wallet, recipient: &str, value: f64) -> TransactionRequest {
    let tx = Transaction::new(wallet.address(), recipient, value);
    TransactionRequest::from_signed(&tx, &wallet.credentials(&tx))
}

#[actix_web::test]
async fn signed_transfer_is_created_and_listed() {
    let node = node(BalancePolicy::Skip);
    let app = service!(node);
    let wallet = Wallet::generate();

    let req = test::TestRequest::post()
        .uri("/transactions")
        .set_json(signed_request(&wallet, "bob", 1.01))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let msg: StatusMessage = test::read_body_json(resp).await;
    assert_eq!(msg.message, "success");

    let req = test::TestRequest::get().uri("/transactions").to_request();
    let pool: TransactionsResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pool.length, 1);
    assert_eq!(pool.transactions[0].recipient_address, "bob");
}

#[actix_web::test]
async fn rejected_transfers_answer_fail() {
    let node = node(BalancePolicy::Enforce);
    let app = service!(node);
    let wallet = Wallet::generate();

    // Unfunded sender.
    let req = test::TestRequest::post()
        .uri("/transactions")
        .set_json(signed_request(&wallet, "bob", 1.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let msg: StatusMessage = test::read_body_json(resp).await;
    assert_eq!(msg.message, "fail");

    // Signature over different content.
    let mut tampered = signed_request(&wallet, "bob", 1.0);
    tampered.value = Some(2.0);
    let req = test::TestRequest::post()
        .uri("/transactions")
        .set_json(tampered)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    // Reserved reward identity.
    let tx = Transaction::new(MINING_SENDER, "bob", 5.0);
    let forged = TransactionRequest::from_signed(&tx, &wallet.credentials(&tx));
    let req = test::TestRequest::post()
        .uri("/transactions")
        .set_json(forged)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    assert_eq!(node.pool_len(), 0);
}

#[actix_web::test]
async fn undecodable_body_answers_fail() {
    let node = node(BalancePolicy::Skip);
    let app = service!(node);

    let req = test::TestRequest::post()
        .uri("/transactions")
        .insert_header(ContentType::json())
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let msg: StatusMessage = test::read_body_json(resp).await;
    assert_eq!(msg.message, "fail");
}

#[actix_web::test]
async fn relay_put_and_delete_manage_the_pool() {
    let node = node(BalancePolicy::Skip);
    let app = service!(node);
    let wallet = Wallet::generate();

    let req = test::TestRequest::put()
        .uri("/transactions")
        .set_json(signed_request(&wallet, "carol", 0.3))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(node.pool_len(), 1);

    let req = test::TestRequest::delete().uri("/transactions").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(node.pool_len(), 0);
}

#[actix_web::test]
async fn mine_then_query_chain_and_amount() {
    let node = node(BalancePolicy::Skip);
    let app = service!(node);
    let a = Wallet::generate();

    let req = test::TestRequest::post()
        .uri("/transactions")
        .set_json(signed_request(&a, "bob", 1.01))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::get().uri("/mine").to_request();
    let msg: StatusMessage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(msg.message, "success");

    let req = test::TestRequest::get().uri("/chain").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let chain = codec::decode_chain(&body).unwrap();
    assert_eq!(chain.len(), 2);
    assert!(validate_chain(&chain, 2));
    assert_eq!(chain[1].hash(), node.last_block().hash());

    for (address, expected) in [(a.address(), -1.01), ("bob", 1.01), ("miner", 1.0)] {
        let req = test::TestRequest::get()
            .uri(&format!("/amount?address={address}"))
            .to_request();
        let amount: AmountResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(amount.amount, expected, "balance of {address}");
    }

    let req = test::TestRequest::get().uri("/amount").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn wallet_endpoint_is_off_unless_enabled() {
    let node = node(BalancePolicy::Skip);
    let app = service!(node);

    let req = test::TestRequest::post().uri("/wallet").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn wallet_endpoint_returns_usable_keys() {
    let config = NodeConfig {
        difficulty: 2,
        mine_on_start: false,
        dev_wallet: true,
        ..NodeConfig::default()
    };
    let node = Arc::new(Node::new(config, "miner".into()).unwrap());
    let app = service!(node);

    let req = test::TestRequest::post().uri("/wallet").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["public_key"].as_str().unwrap().len(), 128);
    assert_eq!(body["private_key"].as_str().unwrap().len(), 64);
    assert!(body["address"].is_string());
}
