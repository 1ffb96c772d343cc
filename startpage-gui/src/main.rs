mod app;

use startpage_core::{RestClient, StartPageConfig};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            // Example: RUST_LOG=startpage_core::paginator=debug
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "startpage_core=info,startpage_gui=info".into()),
        )
        .init();
}

fn main() -> iced::Result {
    init_logging();

    let config = match StartPageConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match RestClient::new(&config.api_base_url, config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(api = %client.base_url(), "Starting start page");

    iced::application("Start Page", app::update, app::view)
        .subscription(app::subscription)
        .run_with(move || app::initialize(config, client))
}
