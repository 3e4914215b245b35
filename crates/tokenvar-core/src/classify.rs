//! Leaf shape classification.
//!
//! The "already a complete color" checks are textual heuristics: anything
//! that starts like `rgb(` is treated as a finished color even when the
//! rest of the string is not a valid function call.

use crate::options::ColorFunction;
use crate::theme::{CustomFn, Leaf};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static COLOR_FUNCTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:rgba?|hsla?)\(").unwrap());

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^#[0-9a-f]{3,8}$").unwrap());

static VAR_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^var\(").unwrap());

/// The five ways a leaf can be written, decided once per leaf.
#[derive(Clone, Copy)]
pub enum LeafShape<'a> {
    /// Raw components such as `240 5.9% 10%`, wrapped with the global rule.
    Literal(&'a str),
    /// Hex, color function or `var(...)`: already usable as a color.
    Complete(&'a str),
    /// `[value, "hsl" | "rgb"]`.
    Rule(&'a str, ColorFunction),
    /// `[value, fn]`.
    Custom(&'a str, &'a CustomFn),
    /// `[value]`: bare `var()` with the value as fallback, never wrapped.
    NoWrap(&'a str),
}

impl<'a> LeafShape<'a> {
    pub fn value(&self) -> &'a str {
        match *self {
            Self::Literal(v)
            | Self::Complete(v)
            | Self::Rule(v, _)
            | Self::Custom(v, _)
            | Self::NoWrap(v) => v,
        }
    }
}

impl std::fmt::Debug for LeafShape<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Complete(v) => f.debug_tuple("Complete").field(v).finish(),
            Self::Rule(v, r) => f.debug_tuple("Rule").field(v).field(r).finish(),
            Self::Custom(v, _) => f.debug_tuple("Custom").field(v).finish(),
            Self::NoWrap(v) => f.debug_tuple("NoWrap").field(v).finish(),
        }
    }
}

pub fn classify(leaf: &Leaf) -> LeafShape<'_> {
    match leaf {
        Leaf::Value(v) => classify_str(v),
        Leaf::NoWrap(v) => LeafShape::NoWrap(v),
        Leaf::Rule(v, rule) => match rule.parse::<ColorFunction>() {
            Ok(function) => LeafShape::Rule(v, function),
            Err(err) => {
                warn!(value = %v, "{err}; falling back to the default rule");
                classify_str(v)
            }
        },
        Leaf::Custom(v, f) => LeafShape::Custom(v, f),
    }
}

fn classify_str(v: &str) -> LeafShape<'_> {
    if is_complete(v) {
        LeafShape::Complete(v)
    } else {
        LeafShape::Literal(v)
    }
}

/// Hex color, color function or `var()` reference.
pub fn is_complete(value: &str) -> bool {
    is_color_literal(value) || VAR_START.is_match(value)
}

/// Hex color or `rgb()/rgba()/hsl()/hsla()` call.
pub fn is_color_literal(value: &str) -> bool {
    COLOR_FUNCTION.is_match(value) || HEX_COLOR.is_match(value)
}
