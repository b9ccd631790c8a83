//! Prefixed keys example

use envbind::source::Prefixed;
use envbind::{Env, Record};

#[derive(Debug, Default, Record)]
struct Config {
    #[env("DATABASE_URL")]
    pub database_url: String,

    #[env("PORT")]
    pub port: u16,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("MYAPP_PORT", "8080");
    std::env::set_var("OTHER_PORT", "9090");

    // Looks up MYAPP_DATABASE_URL and MYAPP_PORT
    let mut app = Config::default();
    app.load_from(&Prefixed::new("MYAPP_", Env))?;

    let mut other = Config::default();
    envbind::load_with(&Prefixed::new("OTHER_", Env), &mut other)?;

    println!("myapp: {app:?}");
    println!("other: {other:?}");

    Ok(())
}
