//! Bind environment variables into struct fields with compact directives
//!
//! `envbind` fills the fields of a struct from a flat string key-value source,
//! usually the process environment. Each field names its key and parsing
//! options in one directive string, `#[env("KEY[,OPTION]*")]`, and the library
//! handles lookup, conversion, nested structs and error reporting.
//!
//! # Features
//!
//! - **Declarative**: `#[derive(Record)]` builds the field table at compile time
//! - **Numeric control**: radix (`base:`), bit width (`bitsize:`) and
//!   single-character (`rune`) parsing per field
//! - **Lists and optionals**: `Vec<T>` split on a configurable separator,
//!   `Option<T>` filled only when the key is present
//! - **Nested records**: struct-typed fields are walked recursively
//! - **Pluggable sources**: process environment, maps, closures, prefixes and
//!   `KEY=VALUE` files
//!
//! # Example
//!
//! ```rust
//! use envbind::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct Config {
//!     #[env("APP_HOST")]
//!     pub host: String,
//!
//!     #[env("APP_PORT")]
//!     pub port: u16,
//!
//!     #[env("APP_PEERS,sep:;")]
//!     pub peers: Vec<String>,
//!
//!     // Left untouched: no directive
//!     pub retries: u32,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("APP_HOST", "0.0.0.0");
//! #     std::env::set_var("APP_PORT", "8080");
//! #     std::env::set_var("APP_PEERS", "a:1;b:2");
//! let mut config = Config { retries: 3, ..Config::default() };
//! envbind::load(&mut config)?;
//! assert_eq!(config.host, "0.0.0.0");
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.peers, vec!["a:1", "b:2"]);
//! assert_eq!(config.retries, 3);
//! #     Ok(())
//! # }
//! ```
//!
//! # Directives
//!
//! ```text
//! directive  := key ("," option)*
//! option     := "rune" | "base:" digits | "bitsize:" digits | "sep:" separator
//! ```
//!
//! ## `base:N`
//!
//! Radix for integer fields. `base:0` infers it from a `0x`, `0o`, `0b` or `0`
//! prefix.
//!
//! ```rust
//! # use std::collections::HashMap;
//! # use envbind::Record;
//! #[derive(Default, Record)]
//! struct Flags {
//!     #[env("MASK,base:2")]
//!     pub mask: u8,
//! }
//!
//! let source = HashMap::from([("MASK".to_string(), "101".to_string())]);
//! let mut flags = Flags::default();
//! envbind::load_with(&source, &mut flags).unwrap();
//! assert_eq!(flags.mask, 5);
//! ```
//!
//! ## `bitsize:N`
//!
//! Width the parsed number must fit, independent of the field's own type.
//! `"129"` with `bitsize:8` fails with an overflow even on an `i64` field.
//!
//! ## `rune`
//!
//! Read an `i32` field as a single Unicode character instead of a decimal
//! number.
//!
//! ## `sep:S`
//!
//! Separator for `Vec<T>` fields (default `,`). An empty value produces an
//! empty vector.
//!
//! # Errors
//!
//! Absent directives and absent keys are not errors: the field keeps its
//! value. Anything else aborts the whole call with an [`Error`] naming the
//! field path, e.g. `envbind: field "port": value '70000' overflows u16`.
//! Use [`Error::cause`], [`Error::directive_error`] and
//! [`Error::coerce_error`] to inspect it.

extern crate self as envbind;

pub mod bind;
pub mod coerce;
pub mod complex;
pub mod directive;
mod error;
mod field;
pub mod source;

pub use bind::{load, load_with};
pub use complex::{Complex, Complex128, Complex64};
pub use directive::{Directive, Options};
pub use envbind_derive::Record;
pub use error::{BindError, CoerceError, DirectiveError, Error, OptionKind, SourceError};
pub use field::{Field, Nullable, Record, Sequence, Slot};
pub use source::{Env, KeyGetter};
