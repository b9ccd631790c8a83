//! Field binding: walk a record and fill its annotated fields.

use tracing::{debug, trace};

use crate::coerce::coerce;
use crate::directive;
use crate::error::{BindError, Error};
use crate::field::{Field, Record, Slot};
use crate::source::{Env, KeyGetter};

/// Fill `target` from the process environment.
///
/// # Errors
///
/// - `target` is not a record (see [`Error::is_not_a_struct_pointer`])
/// - a field's directive is malformed
/// - a field's value cannot be converted to the field's type
pub fn load<T: Field + ?Sized>(target: &mut T) -> Result<(), Error> {
    load_with(&Env, target)
}

/// Fill `target` from `source`.
///
/// Fields without a directive, and fields whose key is absent from `source`,
/// keep their current value. The first failing field aborts the whole call.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with<S, T>(source: &S, target: &mut T) -> Result<(), Error>
where
    S: KeyGetter + ?Sized,
    T: Field + ?Sized,
{
    let source: &dyn KeyGetter = &source;
    match target.slot() {
        Slot::Record(record) => bind_record(source, record).map_err(Error::from),
        _ => Err(BindError::NotAStructPointer.into()),
    }
}

/// Bind every field of `record` from `source`.
pub fn bind_record(source: &dyn KeyGetter, record: &mut dyn Record) -> Result<(), BindError> {
    record.bind_fields(source)
}

/// Bind one field. Called by `#[derive(Record)]` for every field.
///
/// Nested records are walked whether or not they carry a directive.
pub fn bind_field<F: Field + ?Sized>(
    source: &dyn KeyGetter,
    name: &'static str,
    directive: Option<&str>,
    target: &mut F,
) -> Result<(), BindError> {
    bind_slot(source, name, directive, target.slot())
}

/// Bind one already-borrowed slot.
pub fn bind_slot(
    source: &dyn KeyGetter,
    name: &'static str,
    directive: Option<&str>,
    slot: Slot<'_>,
) -> Result<(), BindError> {
    let slot = match slot {
        Slot::Record(record) => {
            return bind_record(source, record).map_err(|e| BindError::in_field(name, e));
        }
        other => other,
    };

    let Some(directive) = directive else {
        trace!(field = name, "no directive, field left unchanged");
        return Ok(());
    };
    let directive = directive::parse(directive).map_err(|e| BindError::in_field(name, e))?;

    let Some(raw) = source.get(directive.key()) else {
        trace!(field = name, key = directive.key(), "key not found, field left unchanged");
        return Ok(());
    };

    let kind = slot.kind_name();
    coerce(&raw, directive.options(), slot).map_err(|e| BindError::in_field(name, e))?;
    debug!(field = name, key = directive.key(), kind, "field bound");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoerceError, DirectiveError};
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bind_field_sets_value() {
        let src = source(&[("PORT", "8080")]);
        let mut port = 0u16;
        bind_field(&src, "port", Some("PORT"), &mut port).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_bind_field_without_directive_is_noop() {
        let src = source(&[("PORT", "8080")]);
        let mut port = 1u16;
        bind_field(&src, "port", None, &mut port).unwrap();
        assert_eq!(port, 1);
    }

    #[test]
    fn test_bind_field_missing_key_is_noop() {
        let src = source(&[]);
        let mut port = 1u16;
        bind_field(&src, "port", Some("PORT"), &mut port).unwrap();
        assert_eq!(port, 1);
    }

    #[test]
    fn test_bad_directive_reported_even_when_key_missing() {
        let src = source(&[]);
        let mut port = 1u16;
        let err = bind_field(&src, "port", Some(",base:2"), &mut port).unwrap_err();
        assert_eq!(
            err,
            BindError::Field {
                field: "port",
                cause: Box::new(BindError::Directive(DirectiveError::MissingData)),
            }
        );
    }

    #[test]
    fn test_coerce_error_wrapped_with_field_name() {
        let src = source(&[("PORT", "70000")]);
        let mut port = 0u16;
        let err = bind_field(&src, "port", Some("PORT"), &mut port).unwrap_err();
        assert_eq!(err.field_path(), vec!["port"]);
        assert!(matches!(
            err.coerce_error(),
            Some(CoerceError::Overflow { .. })
        ));
        assert_eq!(err.to_string(), "field \"port\": value '70000' overflows u16");
    }

    #[test]
    fn test_bind_slot_unsupported() {
        let src = source(&[("F", "x")]);
        let err = bind_slot(&src, "f", Some("F"), Slot::Unsupported("function")).unwrap_err();
        assert_eq!(
            err.coerce_error(),
            Some(&CoerceError::UnsupportedType { kind: "function" })
        );
    }

    #[test]
    fn test_load_rejects_non_records() {
        let src = source(&[("X", "1")]);

        let mut text = String::from("agad");
        let err = load_with(&src, &mut text).unwrap_err();
        assert!(err.is_not_a_struct_pointer());
        assert_eq!(text, "agad");

        let mut list: Vec<u8> = Vec::new();
        assert!(load_with(&src, &mut list).unwrap_err().is_not_a_struct_pointer());
    }

    #[test]
    fn test_top_level_error_message() {
        let src = source(&[]);
        let mut value = 0i32;
        let err = load_with(&src, &mut value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "envbind: input must be a mutable reference to a record"
        );
    }
}
