//! Basic usage example

use envbind::Record;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Record)]
struct Config {
    // Loaded from DATABASE_URL
    #[env("DATABASE_URL")]
    pub database_url: String,

    #[env("SERVER_ADDR")]
    pub server_addr: String,

    // Numeric type
    #[env("MAX_CONNECTIONS")]
    pub max_connections: u32,

    // Only "true" (any case) is true
    #[env("DEBUG_MODE")]
    pub debug_mode: bool,

    // No directive: never touched
    pub retries: u8,
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=envbind=debug shows each bound field
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");
    std::env::set_var("DEBUG_MODE", "TRUE");

    // Unset keys keep whatever the struct already holds
    let mut config = Config {
        server_addr: "127.0.0.1:8080".to_string(),
        max_connections: 10,
        retries: 3,
        ..Config::default()
    };
    envbind::load(&mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);
    println!("  Retries: {}", config.retries);

    Ok(())
}
