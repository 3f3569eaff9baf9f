use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod dbus;
mod worker;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("rollcalld starting");

    let config = config::Config::load();
    tracing::info!(
        store = %config.store_path.display(),
        cooldown_secs = config.cooldown_secs,
        "configuration loaded"
    );

    // Fail fast: a missing or uncreatable store is a startup error, not
    // something to discover on the first sighting.
    let handle = worker::spawn_worker(&config.store_path, config.cooldown_secs)?;

    let service =
        dbus::RollcallService::new(handle, config.store_path.display().to_string());
    let _conn = zbus::connection::Builder::session()?
        .name(dbus::BUS_NAME)?
        .serve_at(dbus::OBJECT_PATH, service)?
        .build()
        .await?;

    tracing::info!(bus = dbus::BUS_NAME, "rollcalld ready");

    // Keep running until signaled
    tokio::signal::ctrl_c().await?;
    tracing::info!("rollcalld shutting down");

    Ok(())
}
