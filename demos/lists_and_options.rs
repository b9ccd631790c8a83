//! Lists and optional fields example

use envbind::Record;

#[derive(Debug, Default, Record)]
struct Config {
    // Comma-separated by default
    #[env("ALLOWED_ORIGINS")]
    pub allowed_origins: Vec<String>,

    // Custom separator
    #[env("WORKER_PORTS,sep:;")]
    pub worker_ports: Vec<u16>,

    // Some(..) only when REDIS_URL is set
    #[env("REDIS_URL")]
    pub redis_url: Option<String>,

    #[env("CACHE_TTL")]
    pub cache_ttl: Option<u64>,

    // Optional list
    #[env("FEATURE_FLAGS,sep:|")]
    pub feature_flags: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    std::env::set_var("ALLOWED_ORIGINS", "https://a.example,https://b.example");
    std::env::set_var("WORKER_PORTS", "9001;9002;9003");
    std::env::set_var("CACHE_TTL", "300");
    std::env::set_var("FEATURE_FLAGS", "");
    std::env::remove_var("REDIS_URL");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Allowed origins: {:?}", config.allowed_origins);
    println!("  Worker ports: {:?}", config.worker_ports);
    println!("  Redis URL: {:?}", config.redis_url);
    println!("  Cache TTL: {:?}", config.cache_ttl);
    // Set but empty: Some(vec![])
    println!("  Feature flags: {:?}", config.feature_flags);

    Ok(())
}
