use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::net::Ipv4Addr;
use std::sync::Arc;

use pow_ledger::api::{self, AppState};
use pow_ledger::config::NodeConfig;
use pow_ledger::node::{Node, PortScanDiscovery, StaticDiscovery};
use pow_ledger::wallet::Wallet;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let miner_address = match &config.miner_address {
        Some(address) => address.clone(),
        None => {
            let wallet = Wallet::generate();
            info!("priKey  : {}", wallet.private_key_hex());
            info!("pubKey  : {}", wallet.public_key().to_hex());
            info!("address : {}", wallet.address());
            wallet.address().to_string()
        }
    };

    let node = Arc::new(Node::new(config.clone(), miner_address).map_err(std::io::Error::other)?);

    match (&config.peers, config.advertised_host.parse::<Ipv4Addr>()) {
        (Some(peers), _) => {
            node.run(StaticDiscovery::new(peers.clone(), &config.self_address()))
                .await
        }
        (None, Ok(host)) => {
            node.run(PortScanDiscovery::new(
                host,
                config.port,
                config.port_range,
                config.ip_range,
                std::time::Duration::from_secs(1),
            ))
            .await
        }
        (None, Err(_)) => {
            warn!(
                "ADVERTISED_HOST {} is not an IPv4 address and PEERS is unset; running without peers",
                config.advertised_host
            );
            node.run(StaticDiscovery::new(Vec::new(), "")).await
        }
    }

    println!(
        "⛓️ Starting blockchain node at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(node.clone()));

    let result = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    node.shutdown();
    result
}
