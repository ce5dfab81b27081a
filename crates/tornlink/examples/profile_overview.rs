use std::sync::Arc;
use std::time::Duration;

use tornlink::prelude::*;
use tornlink::{HttpConfig, ReqwestTransport, SystemClock};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize tracing subscriber
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 2. The key comes from the environment; without one every fetch is empty
    let credential = match std::env::var("TORN_API_KEY") {
        Ok(key) => StaticCredential::new(key),
        Err(_) => {
            println!("TORN_API_KEY not set, resources will be absent");
            StaticCredential::none()
        }
    };

    // 3. Client with TracingMetrics so hits and misses show up in the log
    let client = ApiClient::with_parts(
        ReqwestTransport::new(&HttpConfig::default())?,
        Arc::new(credential),
        TracingMetrics::new().with_service_name("profile-example"),
        Arc::new(SystemClock),
        ClientConfig::default().comment("tornlink-example"),
    )?;

    // 4. Poll the profile screen twice; the second poll is served from cache
    for poll in 1..=2 {
        let snapshot = client.profile_overview().await;

        match snapshot.user() {
            Some(user) => println!(
                "[{poll}] {} (level {}): energy {}/{}",
                user.name, user.level, user.energy.current, user.energy.maximum
            ),
            None => println!("[{poll}] profile: unknown"),
        }
        match snapshot.networth().and_then(|n| n.bank) {
            Some(bank) => println!(
                "[{poll}] bank: {} (matures in {:?}s)",
                bank.amount, bank.time_left
            ),
            None => println!("[{poll}] bank: unknown"),
        }
        println!(
            "[{poll}] requests this minute: {}",
            client.current_request_rate_count()
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    let stats = client.cache_stats();
    println!("cache: {} hits, {} misses", stats.hits, stats.misses);

    Ok(())
}
