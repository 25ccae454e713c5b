use std::time::Duration;

use micro_client::{Client, ClientRequest};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Fetches a page from a host given on the command line and prints the
/// status line, headers and body length.
///
/// Usage:
///   cargo run --example fetch -- example.com /
#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "example.com".to_owned());
    let target = args.next().unwrap_or_else(|| "/".to_owned());

    let client = Client::builder(host).build();

    match client.send(ClientRequest::get(target), Duration::from_secs(10)).await {
        Ok(response) => {
            info!(status = %response.status(), version = ?response.version(), "received response");
            for (name, value) in response.headers() {
                info!("  {}: {}", name, String::from_utf8_lossy(value.as_bytes()));
            }
            info!(body_len = response.body().len(), pooled = client.idle_connections(), "done");
        }
        Err(e) => {
            error!("request failed, cause {}", e);
        }
    }
}
