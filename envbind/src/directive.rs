//! Field directive parsing.
//!
//! A directive is the string attached to a field with `#[env("...")]`. It names
//! the key to look up and, optionally, how the value should be parsed:
//!
//! ```text
//! directive  := key ("," option)*
//! option     := "rune" | "base:" digits | "bitsize:" digits | "sep:" separator
//! ```
//!
//! Options are accepted regardless of the field they end up on. A `rune` on a
//! float field is not an error; the coercer simply ignores it.

use std::str::FromStr;

use crate::error::{DirectiveError, OptionKind};

const OPT_RUNE: &str = "rune";
const OPT_BASE: &str = "base:";
const OPT_BIT_SIZE: &str = "bitsize:";
const OPT_SEP: &str = "sep:";
const SEGMENT_SEPARATOR: char = ',';

/// Separator used to split list values when no `sep:` option is given.
pub const DEFAULT_LIST_SEPARATOR: &str = ",";

/// Parsing options carried by a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Read an `i32` field as a single Unicode code point.
    pub rune: bool,
    /// Radix for integer parsing. `None` means 10.
    pub base: Option<u32>,
    /// Width the parsed value must fit. `None` means the type's natural width.
    pub bit_size: Option<u32>,
    /// Separator for list values.
    pub sep: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rune: false,
            base: None,
            bit_size: None,
            sep: DEFAULT_LIST_SEPARATOR.to_string(),
        }
    }
}

/// A parsed directive: the lookup key and its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    key: String,
    options: Options,
}

impl Directive {
    /// Key looked up in the source. Never empty.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Parsing options.
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl FromStr for Directive {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a directive string such as `"HOSTS,sep:;"`.
///
/// # Errors
///
/// - [`DirectiveError::MissingData`] if the directive or its key is empty
/// - [`DirectiveError::UnsupportedOption`] for unknown option tokens
/// - [`DirectiveError::DuplicateOption`] if an option is repeated
/// - [`DirectiveError::InvalidOptionValue`] if `base:`/`bitsize:` is not a decimal integer
/// - [`DirectiveError::EmptySeparator`] for a bare `sep:`
///
/// Unknown and repeated options are reported before any option value is
/// checked, so `"E,base:x,base:1"` is a duplicate rather than a bad value.
pub fn parse(directive: &str) -> Result<Directive, DirectiveError> {
    if directive.is_empty() {
        return Err(DirectiveError::MissingData);
    }

    let mut segments = directive.split(SEGMENT_SEPARATOR);
    let key = match segments.next() {
        Some(key) if !key.is_empty() => key,
        _ => return Err(DirectiveError::MissingData),
    };

    let segments = classify(segments)?;

    let mut options = Options::default();
    for segment in segments {
        match segment {
            Segment::Rune => options.rune = true,
            Segment::Base(value) => options.base = Some(parse_number(OptionKind::Base, value)?),
            Segment::BitSize(value) => {
                options.bit_size = Some(parse_number(OptionKind::BitSize, value)?);
            }
            Segment::Sep(value) => {
                if value.is_empty() {
                    return Err(DirectiveError::EmptySeparator);
                }
                options.sep = value.to_string();
            }
        }
    }

    Ok(Directive {
        key: key.to_string(),
        options,
    })
}

/// An option segment, with the text after its prefix.
enum Segment<'a> {
    Rune,
    Base(&'a str),
    BitSize(&'a str),
    Sep(&'a str),
}

/// Reject unknown and repeated options across the whole directive before any
/// option value is read.
fn classify<'a>(
    segments: impl Iterator<Item = &'a str>,
) -> Result<Vec<Segment<'a>>, DirectiveError> {
    let mut seen = Vec::new();
    let mut classified = Vec::new();
    for segment in segments {
        let (kind, parsed) = if segment == OPT_RUNE {
            (OptionKind::Rune, Segment::Rune)
        } else if let Some(value) = segment.strip_prefix(OPT_BASE) {
            (OptionKind::Base, Segment::Base(value))
        } else if let Some(value) = segment.strip_prefix(OPT_BIT_SIZE) {
            (OptionKind::BitSize, Segment::BitSize(value))
        } else if let Some(value) = segment.strip_prefix(OPT_SEP) {
            (OptionKind::Sep, Segment::Sep(value))
        } else {
            return Err(DirectiveError::UnsupportedOption {
                option: segment.to_string(),
            });
        };
        if seen.contains(&kind) {
            return Err(DirectiveError::DuplicateOption(kind));
        }
        seen.push(kind);
        classified.push(parsed);
    }
    Ok(classified)
}

fn parse_number(option: OptionKind, value: &str) -> Result<u32, DirectiveError> {
    value
        .parse::<u32>()
        .map_err(|source| DirectiveError::InvalidOptionValue {
            option,
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_only() {
        let directive = parse("PORT").unwrap();
        assert_eq!(directive.key(), "PORT");
        assert_eq!(directive.options(), &Options::default());
    }

    #[test]
    fn test_parse_all_options() {
        let directive = parse("LEVEL,rune,base:16,bitsize:8,sep:;").unwrap();
        assert_eq!(directive.key(), "LEVEL");
        assert!(directive.options().rune);
        assert_eq!(directive.options().base, Some(16));
        assert_eq!(directive.options().bit_size, Some(8));
        assert_eq!(directive.options().sep, ";");
    }

    #[test]
    fn test_options_are_order_independent() {
        let a = parse("E,sep:||,base:2,bitsize:8").unwrap();
        let b = parse("E,bitsize:8,sep:||,base:2").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_multi_char_separator_is_verbatim() {
        let directive = parse("HOSTS,sep:||").unwrap();
        assert_eq!(directive.options().sep, "||");
    }

    #[test]
    fn test_from_str() {
        let directive: Directive = "CHAR,rune".parse().unwrap();
        assert_eq!(directive.key(), "CHAR");
        assert!(directive.options().rune);
    }

    #[test]
    fn test_empty_directive_is_missing_data() {
        assert_eq!(parse(""), Err(DirectiveError::MissingData));
    }

    #[test]
    fn test_empty_key_is_missing_data() {
        assert_eq!(parse(",base:2"), Err(DirectiveError::MissingData));
    }

    #[test]
    fn test_unknown_option() {
        assert_eq!(
            parse("notkey,what"),
            Err(DirectiveError::UnsupportedOption {
                option: "what".to_string()
            })
        );
    }

    #[test]
    fn test_option_prefix_without_colon_is_unknown() {
        assert!(matches!(
            parse("E,base"),
            Err(DirectiveError::UnsupportedOption { .. })
        ));
        assert!(matches!(
            parse("E,runes"),
            Err(DirectiveError::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_trailing_comma_is_unknown_empty_option() {
        assert_eq!(
            parse("E,"),
            Err(DirectiveError::UnsupportedOption {
                option: String::new()
            })
        );
    }

    #[test]
    fn test_duplicates() {
        assert_eq!(
            parse("E,rune,rune"),
            Err(DirectiveError::DuplicateOption(OptionKind::Rune))
        );
        assert_eq!(
            parse("E,base:1,base:1"),
            Err(DirectiveError::DuplicateOption(OptionKind::Base))
        );
        assert_eq!(
            parse("E,bitsize:8,bitsize:8"),
            Err(DirectiveError::DuplicateOption(OptionKind::BitSize))
        );
        assert_eq!(
            parse("E,sep:8,sep:8"),
            Err(DirectiveError::DuplicateOption(OptionKind::Sep))
        );
    }

    #[test]
    fn test_invalid_numeric_values() {
        for directive in ["E,base:", "E,base:abc", "E,base:-2"] {
            assert!(
                matches!(
                    parse(directive),
                    Err(DirectiveError::InvalidOptionValue {
                        option: OptionKind::Base,
                        ..
                    })
                ),
                "{directive}"
            );
        }
        for directive in ["E,bitsize:", "E,bitsize:abc"] {
            assert!(
                matches!(
                    parse(directive),
                    Err(DirectiveError::InvalidOptionValue {
                        option: OptionKind::BitSize,
                        ..
                    })
                ),
                "{directive}"
            );
        }
    }

    #[test]
    fn test_empty_separator() {
        assert_eq!(parse("E,sep:"), Err(DirectiveError::EmptySeparator));
    }

    #[test]
    fn test_unknown_and_duplicate_options_reported_before_values() {
        assert_eq!(
            parse("E,base:x,base:1"),
            Err(DirectiveError::DuplicateOption(OptionKind::Base))
        );
        assert_eq!(
            parse("E,sep:,sep:;"),
            Err(DirectiveError::DuplicateOption(OptionKind::Sep))
        );
        assert_eq!(
            parse("E,bitsize:x,rune,rune"),
            Err(DirectiveError::DuplicateOption(OptionKind::Rune))
        );
        assert_eq!(
            parse("E,base:x,what"),
            Err(DirectiveError::UnsupportedOption {
                option: "what".to_string()
            })
        );
        assert_eq!(
            parse("E,sep:,what"),
            Err(DirectiveError::UnsupportedOption {
                option: "what".to_string()
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            parse("").unwrap_err().to_string(),
            "directive must contain at minimum a key name"
        );
        assert_eq!(
            parse("E,rune,rune").unwrap_err().to_string(),
            "directive option 'rune' must only be provided once"
        );
        assert!(parse("E,bitsize:x")
            .unwrap_err()
            .to_string()
            .starts_with("bitsize option: invalid value 'x'"));
    }
}
