#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use calendar_tool::{
        AppConfig, CalendarGenerator, CalendarQuery, HttpHolidayLookup, SqliteCalendarStore,
        http_api,
    };
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;
    let addr: SocketAddr = config.http_addr.parse()?;

    let store = Arc::new(SqliteCalendarStore::new(&config.database_path)?);
    let lookup = Arc::new(HttpHolidayLookup::new(config.lookup_config()?)?);
    tracing::info!(
        database = %config.database_path,
        holiday_service = %lookup.base_url(),
        "starting calendar service"
    );

    let generator =
        CalendarGenerator::new(store.clone(), lookup).with_concurrency(config.lookup_concurrency);
    generator.ensure_categories()?;
    let query = CalendarQuery::new(store);

    http_api::serve(addr, http_api::AppState::new(generator, query)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
