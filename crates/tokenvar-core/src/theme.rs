use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Key whose value is the parent's own value (no name suffix, `:root`).
pub const DEFAULT_KEY: &str = "DEFAULT";

/// Key whose value is declared under the `.dark` selector.
pub const DARK_KEY: &str = "dark";

/// Caller supplied wrapper, called with `(property_name, value)`.
/// Its return value is used as the token verbatim.
pub type CustomFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// A nested theme description: color groups, variants and state modifiers.
///
/// Keys keep their source order, which is the order every generated
/// structure follows.
#[derive(Clone, Debug, Default)]
pub struct Theme {
    entries: IndexMap<String, ThemeNode>,
}

#[derive(Clone, Debug)]
pub enum ThemeNode {
    Group(Theme),
    Leaf(Leaf),
}

/// A leaf as written in the theme, before shape classification.
#[derive(Clone)]
pub enum Leaf {
    /// `"240 5.9% 10%"`, `"#fff"`, `"var(--x) / 90%"`.
    Value(String),
    /// `[value]` or `[value, null]`.
    NoWrap(String),
    /// `[value, "rgb"]`. The rule name is kept as written.
    Rule(String, String),
    /// `[value, fn]`, only constructible from Rust.
    Custom(String, CustomFn),
}

impl Leaf {
    pub fn no_wrap(value: impl Into<String>) -> Self {
        Self::NoWrap(value.into())
    }

    pub fn rule(value: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::Rule(value.into(), rule.into())
    }

    pub fn custom<F>(value: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self::Custom(value.into(), Arc::new(f))
    }

    /// The primary string of the leaf, with any rule or callback dropped.
    pub fn value(&self) -> &str {
        match self {
            Self::Value(v) | Self::NoWrap(v) | Self::Rule(v, _) | Self::Custom(v, _) => v,
        }
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::NoWrap(v) => f.debug_tuple("NoWrap").field(v).finish(),
            Self::Rule(v, r) => f.debug_tuple("Rule").field(v).field(r).finish(),
            Self::Custom(v, _) => f.debug_tuple("Custom").field(v).field(&"<fn>").finish(),
        }
    }
}

impl From<&str> for ThemeNode {
    fn from(value: &str) -> Self {
        Self::Leaf(Leaf::Value(value.to_string()))
    }
}

impl From<String> for ThemeNode {
    fn from(value: String) -> Self {
        Self::Leaf(Leaf::Value(value))
    }
}

impl From<Leaf> for ThemeNode {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<Theme> for ThemeNode {
    fn from(theme: Theme) -> Self {
        Self::Group(theme)
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Theme::insert`].
    pub fn with(mut self, key: impl Into<String>, node: impl Into<ThemeNode>) -> Self {
        self.insert(key, node);
        self
    }

    /// Insert or replace an entry. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<ThemeNode>) {
        self.entries.insert(key.into(), node.into());
    }

    pub fn get(&self, key: &str) -> Option<&ThemeNode> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this group is itself a color, i.e. it has a scalar `DEFAULT`
    /// or `dark`. Other scalar keys of such a group are state modifiers
    /// rather than variants.
    pub fn has_own_value(&self) -> bool {
        [DEFAULT_KEY, DARK_KEY]
            .iter()
            .any(|key| matches!(self.entries.get(*key), Some(ThemeNode::Leaf(_))))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deep merge `other` into `self`. Groups merge key by key, anything
    /// else (leaves, arrays) replaces what was there.
    pub fn merge(&mut self, other: Theme) {
        for (key, node) in other.entries {
            match (self.entries.get_mut(&key), node) {
                (Some(ThemeNode::Group(existing)), ThemeNode::Group(incoming)) => {
                    existing.merge(incoming);
                }
                (_, node) => {
                    self.entries.insert(key, node);
                }
            }
        }
    }

    /// Build a theme from parsed JSON. Returns `None` unless the top level
    /// is an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let mut theme = Theme::new();
                for (key, value) in map {
                    if let Some(node) = node_from_json(value) {
                        theme.entries.insert(key, node);
                    }
                }
                Some(theme)
            }
            _ => None,
        }
    }

    pub fn from_json_str(src: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(src)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Theme::from_json(value).ok_or_else(|| D::Error::custom("theme must be an object"))
    }
}

fn node_from_json(value: Value) -> Option<ThemeNode> {
    let leaf = match value {
        Value::Null => return None,
        Value::Object(_) => return Theme::from_json(value).map(ThemeNode::Group),
        Value::String(s) => Leaf::Value(s),
        Value::Bool(_) | Value::Number(_) => Leaf::Value(value.to_string()),
        Value::Array(items) => leaf_from_array(items)?,
    };
    Some(ThemeNode::Leaf(leaf))
}

fn leaf_from_array(items: Vec<Value>) -> Option<Leaf> {
    let mut items = items.into_iter();
    let value = json_string(items.next()?);
    let rule = items.next();
    if items.next().is_some() {
        // Longer than a pair: not a shape we know, keep the value only.
        return Some(Leaf::Value(value));
    }
    Some(match rule {
        None | Some(Value::Null) => Leaf::NoWrap(value),
        Some(Value::String(rule)) => Leaf::Rule(value, rule),
        Some(_) => Leaf::Value(value),
    })
}

fn json_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
