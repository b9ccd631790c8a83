//! Key-value sources
//!
//! The binder only needs a way to look up a string by key. [`Env`] reads the
//! process environment; the other sources exist for tests, prefixes and
//! dotenv-style files.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Look up a raw string value by key.
///
/// `None` means the key is not present, which the binder treats as
/// "leave the field alone", not as an error.
pub trait KeyGetter {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: KeyGetter + ?Sized> KeyGetter for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<S: KeyGetter + ?Sized> KeyGetter for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// The process environment.
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env;

impl KeyGetter for Env {
    fn get(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> KeyGetter for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl KeyGetter for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

/// A source backed by a closure.
///
/// Created with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnSource<F>(F);

/// Wrap a lookup function as a [`KeyGetter`].
///
/// ```rust
/// use envbind::source::{from_fn, KeyGetter};
///
/// let source = from_fn(|key| (key == "PORT").then(|| "8080".to_string()));
/// assert_eq!(source.get("PORT").as_deref(), Some("8080"));
/// assert_eq!(source.get("HOST"), None);
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnSource(f)
}

impl<F> KeyGetter for FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }
}

/// Prepends a fixed prefix to every key before delegating.
///
/// ```rust
/// use std::collections::HashMap;
/// use envbind::source::{KeyGetter, Prefixed};
///
/// let map = HashMap::from([("APP_PORT".to_string(), "80".to_string())]);
/// let source = Prefixed::new("APP_", map);
/// assert_eq!(source.get("PORT").as_deref(), Some("80"));
/// ```
#[derive(Debug, Clone)]
pub struct Prefixed<S> {
    prefix: String,
    inner: S,
}

impl<S> Prefixed<S> {
    /// Wrap `inner` so that `get("KEY")` looks up `"{prefix}KEY"`.
    pub fn new(prefix: impl Into<String>, inner: S) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    /// The prefix added to every key.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<S: KeyGetter> KeyGetter for Prefixed<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&format!("{}{}", self.prefix, key))
    }
}

/// Values read from a `KEY=VALUE` file.
///
/// Blank lines and lines starting with `#` are skipped, an `export ` prefix
/// is allowed, and a value wrapped in matching single or double quotes is
/// unquoted. When a key repeats, the last line wins.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    values: BTreeMap<String, String>,
}

impl FileSource {
    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Read`] if the file cannot be read
    /// - [`SourceError::Syntax`] for a line that is not `KEY=VALUE`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, SourceError> {
        let mut values = BTreeMap::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let syntax_error = || SourceError::Syntax {
                path: PathBuf::from(path),
                line: index + 1,
            };
            let (key, value) = line.split_once('=').ok_or_else(syntax_error)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(syntax_error());
            }
            values.insert(key.to_string(), unquote(value.trim()).to_string());
        }
        Ok(Self { values })
    }

    /// Number of keys read.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the file held no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyGetter for FileSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_env_source() {
        env::set_var("ENVBIND_SOURCE_TEST", "value");
        assert_eq!(Env.get("ENVBIND_SOURCE_TEST").as_deref(), Some("value"));
        env::remove_var("ENVBIND_SOURCE_TEST");
        assert_eq!(Env.get("ENVBIND_SOURCE_TEST"), None);
    }

    #[test]
    #[serial]
    fn test_env_source_empty_value_is_present() {
        env::set_var("ENVBIND_SOURCE_EMPTY", "");
        assert_eq!(Env.get("ENVBIND_SOURCE_EMPTY").as_deref(), Some(""));
        env::remove_var("ENVBIND_SOURCE_EMPTY");
    }

    #[test]
    fn test_map_sources() {
        let hash = HashMap::from([("A".to_string(), "1".to_string())]);
        let tree = BTreeMap::from([("A".to_string(), "2".to_string())]);
        assert_eq!(KeyGetter::get(&hash, "A").as_deref(), Some("1"));
        assert_eq!(KeyGetter::get(&tree, "A").as_deref(), Some("2"));
        assert_eq!(KeyGetter::get(&tree, "B"), None);
    }

    fn lookup<S: KeyGetter>(source: S, key: &str) -> Option<String> {
        source.get(key)
    }

    #[test]
    fn test_boxed_and_borrowed_sources() {
        let tree = BTreeMap::from([("A".to_string(), "1".to_string())]);
        let boxed: Box<dyn KeyGetter> = Box::new(tree.clone());
        assert_eq!(lookup(boxed, "A").as_deref(), Some("1"));
        assert_eq!(lookup(&tree, "A").as_deref(), Some("1"));
    }

    #[test]
    fn test_prefixed() {
        let source = Prefixed::new("APP_", from_fn(|key| Some(key.to_string())));
        assert_eq!(source.prefix(), "APP_");
        assert_eq!(source.get("PORT").as_deref(), Some("APP_PORT"));
    }

    #[test]
    fn test_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "HOST=localhost").unwrap();
        writeln!(file, "export PORT = 8080").unwrap();
        writeln!(file, "GREETING=\"hello, world\"").unwrap();
        writeln!(file, "RAW='a=b'").unwrap();
        writeln!(file, "HOST=example.com").unwrap();

        let source = FileSource::open(file.path()).unwrap();
        assert_eq!(source.len(), 4);
        assert_eq!(source.get("HOST").as_deref(), Some("example.com"));
        assert_eq!(source.get("PORT").as_deref(), Some("8080"));
        assert_eq!(source.get("GREETING").as_deref(), Some("hello, world"));
        assert_eq!(source.get("RAW").as_deref(), Some("a=b"));
        assert_eq!(source.get("MISSING"), None);
    }

    #[test]
    fn test_file_source_syntax_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "GOOD=1").unwrap();
        writeln!(file, "no equals sign").unwrap();

        let result = FileSource::open(file.path());
        assert!(matches!(result, Err(SourceError::Syntax { line: 2, .. })));
    }

    #[test]
    fn test_file_source_missing_file() {
        let result = FileSource::open("/nonexistent/envbind/values.env");
        assert!(matches!(result, Err(SourceError::Read { .. })));
    }
}
