//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

pub(crate) const DEFAULT_CURRENCY: &str = "KRW";

/// Trim a display name and collapse inner whitespace.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let mut out = String::new();
    for token in value.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(out)
}

/// Comparison key for names that must be unique per owner.
///
/// Case, accents and punctuation runs are ignored, so `"Café"`, `"cafe"` and
/// `"CAFE!"` collide.
pub(crate) fn normalize_name_key(display: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in display.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "name '{display}' has no letters or digits"
        )));
    }
    Ok(normalized.to_string())
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidValue(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Accepts `#RRGGBB`, stored lowercase.
pub(crate) fn normalize_color(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(color) = normalize_optional_text(value) else {
        return Ok(None);
    };
    let valid = color.len() == 7
        && color
            .strip_prefix('#')
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(EngineError::InvalidValue(format!(
            "color must look like #RRGGBB, got '{color}'"
        )));
    }
    Ok(Some(color.to_ascii_lowercase()))
}

/// ISO-4217 style code (three ASCII letters), upper-cased.
pub(crate) fn normalize_currency(value: Option<&str>) -> ResultEngine<String> {
    let Some(code) = normalize_optional_text(value) else {
        return Ok(DEFAULT_CURRENCY.to_string());
    };
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EngineError::InvalidValue(format!(
            "currency must be a 3-letter code, got '{code}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}
