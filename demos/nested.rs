//! Nested records example

use envbind::Record;

#[derive(Debug, Default, Record)]
struct Database {
    #[env("DB_HOST")]
    pub host: String,

    #[env("DB_PORT")]
    pub port: u16,
}

#[derive(Debug, Default, Record)]
struct Http {
    #[env("HTTP_BIND")]
    pub bind: String,

    #[env("HTTP_TIMEOUT_SECS")]
    pub timeout_secs: u32,
}

// Record-typed fields are walked without a directive
#[derive(Debug, Default, Record)]
struct Config {
    pub database: Database,
    pub http: Http,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    std::env::set_var("DB_HOST", "db.internal");
    std::env::set_var("DB_PORT", "5432");
    std::env::set_var("HTTP_BIND", "0.0.0.0:8080");
    std::env::set_var("HTTP_TIMEOUT_SECS", "30");

    let config = Config::from_env()?;
    println!("{config:#?}");

    // Errors name the path to the failing field
    std::env::set_var("DB_PORT", "70000");
    match Config::from_env() {
        Ok(_) => println!("unexpectedly loaded"),
        Err(err) => {
            println!("Error: {err}");
            println!("Path: {}", err.field_path().join("."));
        }
    }

    Ok(())
}
