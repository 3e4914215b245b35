use crate::flatten::{child_name, flatten, FlatMap};
use crate::resolver::{is_wrapped_reference, resolve};
use crate::theme::{Leaf, Theme, ThemeNode, DEFAULT_KEY};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

pub const ROOT_SELECTOR: &str = ":root";

/// Custom property name -> value for one selector.
pub type Declarations = IndexMap<String, String>;

/// Custom property declarations partitioned by selector.
///
/// `:root` always comes first. Modifier classes (`.dark`, `.hover`, ...)
/// follow in the order they were first written to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableTable {
    selectors: IndexMap<String, Declarations>,
}

impl Default for VariableTable {
    fn default() -> Self {
        let mut selectors = IndexMap::new();
        selectors.insert(ROOT_SELECTOR.to_string(), Declarations::new());
        Self { selectors }
    }
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Declarations {
        &self.selectors[ROOT_SELECTOR]
    }

    pub fn selector(&self, selector: &str) -> Option<&Declarations> {
        self.selectors.get(selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declarations)> {
        self.selectors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.values().all(IndexMap::is_empty)
    }

    /// Later writes to the same selector and name win.
    pub fn set(&mut self, selector: &str, name: String, value: String) {
        self.selectors
            .entry(selector.to_string())
            .or_default()
            .insert(name, value);
    }
}

/// Build the variable table, flattening the theme for reference lookups.
pub fn process_theme(theme: &Theme) -> VariableTable {
    let flat = flatten(theme);
    process_theme_with(theme, &flat)
}

/// Build the variable table against an already flattened theme.
pub fn process_theme_with(theme: &Theme, flat: &FlatMap) -> VariableTable {
    let mut table = VariableTable::new();

    for (group, node) in theme.iter() {
        let group_name = child_name(None, group);
        match node {
            ThemeNode::Leaf(leaf) => table.set(ROOT_SELECTOR, group_name, value(leaf, flat)),
            // A group with its own value is a color with state modifiers.
            ThemeNode::Group(variants) if variants.has_own_value() => {
                walk(variants, &group_name, flat, &mut table);
            }
            // Otherwise every scalar child is a variant with its own property.
            ThemeNode::Group(variants) => {
                for (variant, node) in variants.iter() {
                    let name = child_name(Some(&group_name), variant);
                    match node {
                        ThemeNode::Group(sub) => walk(sub, &name, flat, &mut table),
                        ThemeNode::Leaf(leaf) => table.set(ROOT_SELECTOR, name, value(leaf, flat)),
                    }
                }
            }
        }
    }

    debug!(selectors = table.len(), "generated variable table");
    table
}

fn walk(theme: &Theme, prefix: &str, flat: &FlatMap, table: &mut VariableTable) {
    for (key, node) in theme.iter() {
        match node {
            ThemeNode::Group(sub) => walk(sub, &child_name(Some(prefix), key), flat, table),
            ThemeNode::Leaf(leaf) if key == DEFAULT_KEY => {
                table.set(ROOT_SELECTOR, prefix.to_string(), value(leaf, flat));
            }
            ThemeNode::Leaf(leaf) => {
                table.set(&modifier_selector(key), prefix.to_string(), value(leaf, flat));
            }
        }
    }
}

fn modifier_selector(key: &str) -> String {
    format!(".{key}")
}

fn value(leaf: &Leaf, flat: &FlatMap) -> String {
    let raw = leaf.value();
    if is_wrapped_reference(raw) {
        resolve(raw, flat).to_css()
    } else {
        raw.to_string()
    }
}
