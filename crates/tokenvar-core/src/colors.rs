//! Color tokens for the CSS framework's color namespace.
//!
//! Every `DEFAULT` leaf becomes a reference to its custom property with the
//! literal as fallback, wrapped in the leaf's color function:
//!
//! ```text
//! {"btn": {"primary": {"DEFAULT": "240 5.9% 10%", "dark": "0 0% 98%"}}}
//!   => {"btn-primary": {"DEFAULT": "hsl(var(--btn-primary, 240 5.9% 10%))"}}
//! ```
//!
//! Modifier leaves (`dark`, custom states) produce no token. The token
//! already points at the custom property the modifier class overrides.

use crate::classify::{classify, is_color_literal, LeafShape};
use crate::flatten::{child_name, flatten, FlatMap};
use crate::options::{ColorFunction, GenerateOptions};
use crate::resolver::{resolve, resolve_in};
use crate::theme::{Leaf, Theme, ThemeNode, DEFAULT_KEY};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

pub type ColorTokens = IndexMap<String, ColorToken>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColorToken {
    Value(String),
    Group(ColorTokens),
}

impl ColorToken {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&ColorTokens> {
        match self {
            Self::Group(g) => Some(g),
            Self::Value(_) => None,
        }
    }
}

/// Generate color tokens, flattening the theme for reference lookups.
pub fn generate_colors(theme: &Theme, options: &GenerateOptions) -> ColorTokens {
    let flat = flatten(theme);
    generate_colors_with(theme, options, &flat)
}

/// Generate color tokens against an already flattened theme.
pub fn generate_colors_with(
    theme: &Theme,
    options: &GenerateOptions,
    flat: &FlatMap,
) -> ColorTokens {
    let gen = TokenGenerator {
        rule: options.color_rule,
        flat,
    };
    let mut out = ColorTokens::new();

    for (group, node) in theme.iter() {
        let group_name = child_name(None, group);
        match node {
            ThemeNode::Leaf(leaf) => {
                out.insert(group.to_string(), ColorToken::Value(gen.token(&group_name, leaf)));
            }
            ThemeNode::Group(variants) => gen.group(group, &group_name, variants, &mut out),
        }
    }

    debug!(tokens = out.len(), "generated color tokens");
    out
}

struct TokenGenerator<'a> {
    rule: ColorFunction,
    flat: &'a FlatMap,
}

impl TokenGenerator<'_> {
    /// Direct children of a top level group. Nested variants get their own
    /// `group-variant` entry. Scalar variants get a flat string entry unless
    /// the group has its own value, in which case they are modifiers.
    fn group(&self, group: &str, group_name: &str, variants: &Theme, out: &mut ColorTokens) {
        let own_value = variants.has_own_value();
        for (variant, node) in variants.iter() {
            let name = child_name(Some(group_name), variant);
            let key = if variant == DEFAULT_KEY {
                group.to_string()
            } else {
                format!("{group}-{variant}")
            };

            match node {
                ThemeNode::Group(sub) => {
                    out.insert(key, ColorToken::Group(self.walk(sub, &name)));
                }
                ThemeNode::Leaf(leaf) if variant == DEFAULT_KEY => {
                    let token = ColorToken::Value(self.token(&name, leaf));
                    match out.entry(key) {
                        Entry::Occupied(mut entry) => match entry.get_mut() {
                            ColorToken::Group(existing) => {
                                existing.insert(DEFAULT_KEY.to_string(), token);
                            }
                            slot => *slot = default_group(token),
                        },
                        Entry::Vacant(entry) => {
                            entry.insert(default_group(token));
                        }
                    }
                }
                ThemeNode::Leaf(_) if own_value => {}
                ThemeNode::Leaf(leaf) => {
                    out.insert(key, ColorToken::Value(self.token(&name, leaf)));
                }
            }
        }
    }

    fn walk(&self, theme: &Theme, prefix: &str) -> ColorTokens {
        let mut out = ColorTokens::new();
        for (key, node) in theme.iter() {
            match node {
                ThemeNode::Group(sub) => {
                    let name = child_name(Some(prefix), key);
                    out.insert(key.to_string(), ColorToken::Group(self.walk(sub, &name)));
                }
                ThemeNode::Leaf(leaf) if key == DEFAULT_KEY => {
                    out.insert(key.to_string(), ColorToken::Value(self.token(prefix, leaf)));
                }
                // Modifier values live in the variable table only.
                ThemeNode::Leaf(_) => {}
            }
        }
        out
    }

    fn token(&self, name: &str, leaf: &Leaf) -> String {
        match classify(leaf) {
            LeafShape::NoWrap(value) => format!("var({name}, {value})"),
            LeafShape::Custom(value, f) => f(name, value),
            LeafShape::Literal(value) | LeafShape::Complete(value) => {
                self.wrap(name, value, self.rule)
            }
            LeafShape::Rule(value, rule) => self.wrap(name, value, rule),
        }
    }

    fn wrap(&self, name: &str, value: &str, rule: ColorFunction) -> String {
        let color = is_color_literal(value);
        if !value.contains("var(") {
            let reference = format!("var({name}, {value})");
            return if color { reference } else { rule.wrap(&reference) };
        }

        // A complete color function brings its own wrapper, so its references
        // are resolved without a context function.
        let resolved = if color {
            resolve(value, self.flat)
        } else {
            resolve_in(value, Some(rule), self.flat)
        };
        let reference = format!("var({name}, {})", resolved.value);
        let token = if color || is_color_literal(&resolved.value) {
            reference
        } else {
            rule.wrap(&reference)
        };
        match resolved.comment() {
            Some(comment) => token + &comment,
            None => token,
        }
    }
}

fn default_group(token: ColorToken) -> ColorToken {
    let mut group = ColorTokens::new();
    group.insert(DEFAULT_KEY.to_string(), token);
    ColorToken::Group(group)
}
