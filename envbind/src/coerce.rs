//! Conversion of raw source strings into typed fields.

use std::any::type_name;
use std::num::IntErrorKind;

use crate::complex::{self, Complex};
use crate::directive::Options;
use crate::error::CoerceError;
use crate::field::{Field, Nullable, Sequence, Slot};

const DEFAULT_BASE: u32 = 10;

/// Convert `raw` and store it in `target`.
///
/// Options that do not apply to the target's kind are ignored.
///
/// # Errors
///
/// - [`CoerceError::Parse`] if `raw` does not match the target's grammar
/// - [`CoerceError::Overflow`] if the value does not fit the requested or actual width
/// - [`CoerceError::InvalidRuneLength`] if a character target gets other than one code point
/// - [`CoerceError::UnsupportedType`] for records, nested lists and unsupported kinds
pub fn coerce(raw: &str, options: &Options, target: Slot<'_>) -> Result<(), CoerceError> {
    match target {
        Slot::Bool(v) => *v = raw.to_lowercase() == "true",
        Slot::Str(v) => raw.clone_into(v),
        Slot::Char(v) => *v = single_char(raw)?,
        Slot::I8(v) => set_signed(raw, options, v, i8::BITS)?,
        Slot::I16(v) => set_signed(raw, options, v, i16::BITS)?,
        Slot::I32(v) if options.rune => {
            let c = single_char(raw)?;
            *v = i32::try_from(u32::from(c)).map_err(|_| CoerceError::overflow(raw, "i32"))?;
        }
        Slot::I32(v) => set_signed(raw, options, v, i32::BITS)?,
        Slot::I64(v) => set_signed(raw, options, v, i64::BITS)?,
        Slot::Isize(v) => set_signed(raw, options, v, isize::BITS)?,
        Slot::U8(v) => set_unsigned(raw, options, v, u8::BITS)?,
        Slot::U16(v) => set_unsigned(raw, options, v, u16::BITS)?,
        Slot::U32(v) => set_unsigned(raw, options, v, u32::BITS)?,
        Slot::U64(v) => set_unsigned(raw, options, v, u64::BITS)?,
        Slot::Usize(v) => set_unsigned(raw, options, v, usize::BITS)?,
        Slot::F32(v) => *v = narrow_to_f32(raw, parse_float(raw, options.bit_size, "f32")?)?,
        Slot::F64(v) => *v = parse_float(raw, options.bit_size, "f64")?,
        Slot::Complex64(v) => {
            let Complex { re, im } = parse_complex(raw, options.bit_size, "complex64")?;
            *v = Complex::new(narrow_to_f32(raw, re)?, narrow_to_f32(raw, im)?);
        }
        Slot::Complex128(v) => *v = parse_complex(raw, options.bit_size, "complex128")?,
        Slot::Optional(v) => v.fill(raw, options)?,
        Slot::List(v) => v.fill(raw, options)?,
        Slot::Record(_) => return Err(CoerceError::unsupported("record")),
        Slot::Unsupported(kind) => return Err(CoerceError::unsupported(kind)),
    }
    Ok(())
}

impl<T: Field + Default> Nullable for Option<T> {
    fn fill(&mut self, raw: &str, options: &Options) -> Result<(), CoerceError> {
        let mut value = T::default();
        coerce(raw, options, value.slot())?;
        *self = Some(value);
        Ok(())
    }
}

impl<T: Field + Default> Sequence for Vec<T> {
    fn fill(&mut self, raw: &str, options: &Options) -> Result<(), CoerceError> {
        let mut probe = T::default();
        match probe.slot() {
            Slot::Record(_) => return Err(CoerceError::unsupported("list of records")),
            Slot::List(_) => return Err(CoerceError::unsupported("list of lists")),
            Slot::Unsupported(kind) => return Err(CoerceError::unsupported(kind)),
            _ => {}
        }

        if raw.is_empty() {
            self.clear();
            return Ok(());
        }

        let pieces: Vec<&str> = raw.split(options.sep.as_str()).collect();
        let mut values = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let mut value = T::default();
            coerce(piece, options, value.slot())?;
            values.push(value);
        }
        *self = values;
        Ok(())
    }
}

fn single_char(raw: &str) -> Result<char, CoerceError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CoerceError::InvalidRuneLength {
            count: raw.chars().count(),
        }),
    }
}

fn set_signed<T: TryFrom<i64>>(
    raw: &str,
    options: &Options,
    target: &mut T,
    natural_bits: u32,
) -> Result<(), CoerceError> {
    let name = type_name::<T>();
    let (bits, width) = match options.bit_size {
        None | Some(0) => (natural_bits, name.to_string()),
        Some(bits) => (bits, format!("{bits}-bit signed integer")),
    };
    let value = parse_signed(raw, options.base, bits, name, &width)?;
    *target = T::try_from(value).map_err(|_| CoerceError::overflow(raw, name))?;
    Ok(())
}

fn set_unsigned<T: TryFrom<u64>>(
    raw: &str,
    options: &Options,
    target: &mut T,
    natural_bits: u32,
) -> Result<(), CoerceError> {
    let name = type_name::<T>();
    let (bits, width) = match options.bit_size {
        None | Some(0) => (natural_bits, name.to_string()),
        Some(bits) => (bits, format!("{bits}-bit unsigned integer")),
    };
    let value = parse_unsigned(raw, options.base, bits, name, &width)?;
    *target = T::try_from(value).map_err(|_| CoerceError::overflow(raw, name))?;
    Ok(())
}

/// Parse a signed integer that must fit in `bits` bits.
fn parse_signed(
    raw: &str,
    base: Option<u32>,
    bits: u32,
    target: &'static str,
    width: &str,
) -> Result<i64, CoerceError> {
    check_bits(raw, bits, target)?;
    let (negative, unsigned_text) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let magnitude = parse_magnitude(raw, unsigned_text, base, target)?;

    let limit = 1u64 << (bits - 1);
    if negative {
        if magnitude > limit {
            return Err(CoerceError::overflow(raw, width));
        }
        Ok((-i128::from(magnitude)) as i64)
    } else {
        if magnitude >= limit {
            return Err(CoerceError::overflow(raw, width));
        }
        Ok(magnitude as i64)
    }
}

/// Parse an unsigned integer that must fit in `bits` bits.
fn parse_unsigned(
    raw: &str,
    base: Option<u32>,
    bits: u32,
    target: &'static str,
    width: &str,
) -> Result<u64, CoerceError> {
    check_bits(raw, bits, target)?;
    let value = parse_magnitude(raw, raw, base, target)?;
    let max = if bits == u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    };
    if value > max {
        return Err(CoerceError::overflow(raw, width));
    }
    Ok(value)
}

fn check_bits(raw: &str, bits: u32, target: &'static str) -> Result<(), CoerceError> {
    if bits == 0 || bits > u64::BITS {
        return Err(CoerceError::parse(
            raw,
            target,
            format!("invalid bit size {bits}"),
        ));
    }
    Ok(())
}

/// Parse unsigned digits in the given base.
///
/// Base 0 infers the radix from a `0x`/`0o`/`0b`/`0` prefix and allows `_`
/// between digits.
fn parse_magnitude(
    raw: &str,
    text: &str,
    base: Option<u32>,
    target: &'static str,
) -> Result<u64, CoerceError> {
    let base = base.unwrap_or(DEFAULT_BASE);
    if base == 0 && text.contains('_') && !underscores_ok(text) {
        return Err(CoerceError::parse(raw, target, "invalid syntax"));
    }
    let (radix, digits) = if base == 0 {
        infer_radix(text)
    } else {
        (base, text)
    };

    if !(2..=36).contains(&radix) {
        return Err(CoerceError::parse(raw, target, format!("invalid base {base}")));
    }
    if digits.starts_with(|c: char| c == '+' || c == '-') {
        return Err(CoerceError::parse(raw, target, "invalid syntax"));
    }

    let cleaned;
    let digits = if base == 0 && digits.contains('_') {
        cleaned = digits.replace('_', "");
        cleaned.as_str()
    } else {
        digits
    };

    u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => CoerceError::overflow(raw, target),
        _ => CoerceError::parse(raw, target, e),
    })
}

fn infer_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'0') || bytes.len() == 1 {
        return (10, text);
    }
    match bytes[1].to_ascii_lowercase() {
        b'x' => (16, &text[2..]),
        b'o' => (8, &text[2..]),
        b'b' => (2, &text[2..]),
        _ => (8, &text[1..]),
    }
}

// `_` may only sit between two digits, after an optional sign. A `0x`/`0o`/`0b`
// prefix counts as a digit, so `0x_1f` is accepted.
fn underscores_ok(text: &str) -> bool {
    let unsigned = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    let (hex, mut after_digit, rest) = match unsigned.as_bytes() {
        [b'0', prefix, rest @ ..] if matches!(prefix.to_ascii_lowercase(), b'x' | b'o' | b'b') => {
            (prefix.eq_ignore_ascii_case(&b'x'), true, rest)
        }
        bytes => (false, false, bytes),
    };
    let mut after_underscore = false;
    for &b in rest {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            after_digit = true;
            after_underscore = false;
        } else if b == b'_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
            after_underscore = true;
        } else {
            if after_underscore {
                return false;
            }
            after_digit = false;
        }
    }
    !after_underscore
}

/// Parse a float at 32-bit precision when `bit_size` is 32, otherwise 64-bit.
///
/// Accepts decimal and `0x` hexadecimal literals (`0x1.8p1`), with `_` between
/// digits.
fn parse_float(
    raw: &str,
    bit_size: Option<u32>,
    target: &'static str,
) -> Result<f64, CoerceError> {
    let cleaned;
    let text = if raw.contains('_') {
        if !underscores_ok(raw) {
            return Err(CoerceError::parse(raw, target, "invalid syntax"));
        }
        cleaned = raw.replace('_', "");
        cleaned.as_str()
    } else {
        raw
    };

    let single = bit_size == Some(32);
    let value = if is_hex_float(text) {
        let value = parse_hex_float(text)
            .ok_or_else(|| CoerceError::parse(raw, target, "invalid syntax"))?;
        if single {
            f64::from(value as f32)
        } else {
            value
        }
    } else if single {
        text.parse::<f32>()
            .map(f64::from)
            .map_err(|e| CoerceError::parse(raw, target, e))?
    } else {
        text.parse::<f64>()
            .map_err(|e| CoerceError::parse(raw, target, e))?
    };
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(CoerceError::overflow(raw, target));
    }
    Ok(value)
}

fn is_hex_float(text: &str) -> bool {
    let unsigned = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    unsigned.starts_with("0x") || unsigned.starts_with("0X")
}

// Hex mantissa with an optional fraction, then a mandatory `p` exponent.
fn parse_hex_float(text: &str) -> Option<f64> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let body = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))?;
    let (mantissa, exponent) = body.split_once(|c: char| c == 'p' || c == 'P')?;
    let exponent: i32 = exponent.parse().ok()?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    // Keep up to 60 significant bits; dropped digits only feed a sticky bit.
    let mut bits: u64 = 0;
    let mut exp = i64::from(exponent);
    let mut sticky = false;
    for (digits, fractional) in [(int_part, false), (frac_part, true)] {
        for c in digits.chars() {
            let digit = c.to_digit(16)?;
            if bits >> 56 == 0 {
                bits = bits << 4 | u64::from(digit);
                if fractional {
                    exp -= 4;
                }
            } else {
                sticky |= digit != 0;
                if !fractional {
                    exp += 4;
                }
            }
        }
    }
    if sticky {
        bits |= 1;
    }

    let magnitude = scale_by_power_of_two(bits as f64, exp);
    Some(if negative { -magnitude } else { magnitude })
}

fn scale_by_power_of_two(mut value: f64, mut exp: i64) -> f64 {
    const STEP: i32 = 1000;
    if value == 0.0 {
        return value;
    }
    while exp > i64::from(STEP) && value.is_finite() {
        value *= 2f64.powi(STEP);
        exp -= i64::from(STEP);
    }
    while exp < -i64::from(STEP) && value != 0.0 {
        value *= 2f64.powi(-STEP);
        exp += i64::from(STEP);
    }
    let exp = i32::try_from(exp).unwrap_or(if exp > 0 { i32::MAX } else { i32::MIN });
    value * 2f64.powi(exp)
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw
        .strip_prefix('+')
        .or_else(|| raw.strip_prefix('-'))
        .unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn narrow_to_f32(raw: &str, value: f64) -> Result<f32, CoerceError> {
    if value.is_finite() && value.abs() > f64::from(f32::MAX) {
        return Err(CoerceError::overflow(raw, "f32"));
    }
    Ok(value as f32)
}

/// Parse complex text; `bit_size` 64 means 32-bit components, anything else 64-bit.
fn parse_complex(
    raw: &str,
    bit_size: Option<u32>,
    target: &'static str,
) -> Result<Complex<f64>, CoerceError> {
    let (re, im) = complex::split_parts(raw)
        .ok_or_else(|| CoerceError::parse(raw, target, "unbalanced parentheses"))?;
    let component_bits = if bit_size == Some(64) { 32 } else { 64 };
    let component = |text: &str| {
        parse_float(text, Some(component_bits), target).map_err(|e| match e {
            CoerceError::Overflow { .. } => CoerceError::overflow(raw, target),
            _ => CoerceError::parse(raw, target, "invalid syntax"),
        })
    };
    Ok(Complex::new(component(re)?, component(im)?))
}
