//! Loading from a `KEY=VALUE` file example

use std::io::Write;

use envbind::source::FileSource;
use envbind::Record;

#[derive(Debug, Default, Record)]
struct Config {
    #[env("DATABASE_URL")]
    pub database_url: String,

    #[env("API_KEY")]
    pub api_key: String,

    #[env("REPLICAS")]
    pub replicas: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Write a demo file
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "# demo settings")?;
    writeln!(file, "DATABASE_URL=postgres://localhost/mydb")?;
    writeln!(file, "export API_KEY='secret-123'")?;
    writeln!(file, "REPLICAS=\"r1,r2\"")?;

    let source = FileSource::open(file.path())?;
    println!("Read {} entries from {}", source.len(), file.path().display());

    let mut config = Config::default();
    envbind::load_with(&source, &mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  API key: {}", config.api_key);
    println!("  Replicas: {:?}", config.replicas);

    Ok(())
}
