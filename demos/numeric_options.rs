//! Numeric directive options example

use std::collections::HashMap;

use envbind::{Complex128, Record};

#[derive(Debug, Default, Record)]
struct Tuning {
    // Binary digits
    #[env("FLAGS,base:2")]
    pub flags: u8,

    // Radix from prefix: 0x, 0o, 0b or leading 0
    #[env("MASK,base:0")]
    pub mask: u32,

    // Stored as i64 but must fit in 8 bits
    #[env("LEVEL,bitsize:8")]
    pub level: i64,

    // Single character as its code point
    #[env("SEPARATOR,rune")]
    pub separator: i32,

    #[env("RATIO,bitsize:32")]
    pub ratio: f64,

    #[env("IMPEDANCE")]
    pub impedance: Complex128,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let source = HashMap::from([
        ("FLAGS".to_string(), "1011".to_string()),
        ("MASK".to_string(), "0xff_00".to_string()),
        ("LEVEL".to_string(), "-100".to_string()),
        ("SEPARATOR".to_string(), "→".to_string()),
        ("RATIO".to_string(), "0.1".to_string()),
        ("IMPEDANCE".to_string(), "(50-12.5i)".to_string()),
    ]);

    let mut tuning = Tuning::default();
    envbind::load_with(&source, &mut tuning)?;
    println!("{tuning:#?}");

    // Out of range for bitsize:8
    let source = HashMap::from([("LEVEL".to_string(), "129".to_string())]);
    if let Err(err) = envbind::load_with(&source, &mut tuning) {
        println!("Error: {err}");
    }

    Ok(())
}
