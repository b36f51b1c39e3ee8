use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use petrol_server::cache::CacheConfig;
use petrol_server::config::{AppConfig, FeedSettings, load_app_config};
use petrol_server::feed::{FeedCache, FeedClient, FeedClientConfig, FeedSource, StationDirectory};
use petrol_server::prefs::PreferenceStore;
use petrol_server::regions::melbourne_regions;
use petrol_server::web::{AppState, create_router};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn feed_source(config: &AppConfig) -> Result<FeedSource, Box<dyn std::error::Error>> {
    Ok(match &config.feed {
        FeedSettings::Fixture(path) => FeedSource::Fixture(path.clone()),
        FeedSettings::Baserow {
            url,
            table_id,
            token,
        } => {
            let mut client_config = FeedClientConfig::new(url, table_id)
                .with_timeout_secs(config.feed_timeout_secs);
            if let Some(token) = token {
                client_config = client_config.with_token(token);
            }
            FeedSource::Http(FeedClient::new(client_config)?)
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_app_config() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    init_tracing(&config.log_level);

    let cache = FeedCache::new(&config.station_cache_path, config.station_cache_ttl);

    // A failed first load is fatal; later refreshes keep the last good list
    info!("loading stations...");
    let directory = StationDirectory::load(feed_source(&config)?, Some(cache))
        .await
        .inspect_err(|e| error!(error = %e, "failed to load stations"))?;
    info!(count = directory.len().await, "stations loaded");

    let refresher = directory.clone();
    let refresh_interval = config.station_refresh_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if let Err(e) = refresher.refresh().await {
                warn!(error = %e, "station refresh failed; keeping previous list");
            }
        }
    });

    let prefs = PreferenceStore::open(&config.preferences_path).await?;

    let cache_config = CacheConfig {
        ttl: config.query_cache_ttl,
        ..CacheConfig::default()
    };
    let state = AppState::new(directory, melbourne_regions(), &cache_config, prefs)
        .with_page_size(config.page_size);

    let static_dir = config.static_dir.to_string_lossy();
    let app = create_router(state, &static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Petrol Prices Near Me listening");
    info!(
        "API endpoints: /api/stations, /api/stations/query, /api/regions, /api/brands, \
         /api/stats, /api/preferences"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
