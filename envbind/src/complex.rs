//! Complex number fields.
//!
//! Accepted text forms, optionally wrapped in parentheses:
//! `"1.5"`, `"2i"`, `"1.5+2i"`, `"1e3-0.5i"`, `"-i"`.

use std::fmt;

/// A complex number with real and imaginary parts of type `T`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    /// Real part
    pub re: T,
    /// Imaginary part
    pub im: T,
}

/// Complex number with `f32` components (64 bits total).
pub type Complex64 = Complex<f32>;

/// Complex number with `f64` components (128 bits total).
pub type Complex128 = Complex<f64>;

impl<T> Complex<T> {
    /// Create a complex number from its parts.
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T> fmt::Display for Complex<T>
where
    T: fmt::Display + PartialOrd + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < T::default() {
            write!(f, "({}{}i)", self.re, self.im)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

/// Split complex text into its real and imaginary component texts.
///
/// Returns `None` when the parentheses are unbalanced. Component texts are
/// not validated here.
pub(crate) fn split_parts(text: &str) -> Option<(&str, &str)> {
    let text = match text.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')')?,
        None if text.ends_with(')') => return None,
        None => text,
    };

    let Some(body) = text.strip_suffix('i') else {
        return Some((text, "0"));
    };

    match find_imaginary_sign(body) {
        Some(pos) => Some((&body[..pos], unit_imaginary(&body[pos..]))),
        None => Some(("0", unit_imaginary(body))),
    }
}

// Position of the sign that starts the imaginary part, skipping the leading
// sign and exponent signs such as `1e-3` or `0x1p-2`.
fn find_imaginary_sign(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| {
            matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E' | b'p' | b'P')
        })
}

fn unit_imaginary(text: &str) -> &str {
    match text {
        "" => "1",
        "+" => "+1",
        "-" => "-1",
        other => other,
    }
}
