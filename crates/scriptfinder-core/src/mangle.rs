//! Unit identifier mangling for compiled-unit lookup.
//!
//! Compiled units are indexed by a qualified, identifier-safe name derived
//! from the candidate script path. The mapping is lossless: `/` becomes the
//! segment separator `.`, and inside a segment every character outside
//! `[A-Za-z0-9]` (plus a leading ASCII digit) is escaped as `_<hex>_` with
//! lowercase hex, zero-padded to at least four digits. The trailing
//! delimiter keeps longer code points unambiguous.
//!
//! Example: `app/component/GET.print` mangles to
//! `app.component.GET_002e_print`.

use std::fmt::Write;

/// Derive the qualified unit identifier for a candidate script name.
#[must_use]
pub fn unit_identifier(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len());
    for (i, segment) in candidate.split('/').enumerate() {
        if i > 0 {
            out.push('.');
        }
        mangle_segment(segment, &mut out);
    }
    out
}

/// Recover the candidate script name from a mangled identifier.
///
/// Returns `None` when the identifier contains a malformed escape.
#[must_use]
pub fn demangle(identifier: &str) -> Option<String> {
    let mut out = String::with_capacity(identifier.len());
    let mut first = true;
    for segment in identifier.split('.') {
        if !first {
            out.push('/');
        }
        first = false;
        demangle_segment(segment, &mut out)?;
    }
    Some(out)
}

fn mangle_segment(segment: &str, out: &mut String) {
    for (i, c) in segment.chars().enumerate() {
        let escape = !c.is_ascii_alphanumeric() || (i == 0 && c.is_ascii_digit());
        if escape {
            let _ = write!(out, "_{:04x}_", c as u32);
        } else {
            out.push(c);
        }
    }
}

fn demangle_segment(segment: &str, out: &mut String) -> Option<()> {
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '_' {
            let mut hex = String::new();
            loop {
                match chars.next() {
                    Some('_') => break,
                    Some(h) if h.is_ascii_hexdigit() => hex.push(h),
                    _ => return None,
                }
            }
            if hex.is_empty() {
                return None;
            }
            let code = u32::from_str_radix(&hex, 16).ok()?;
            out.push(char::from_u32(code)?);
        } else {
            out.push(c);
        }
    }
    Some(())
}
