use crate::theme::{Theme, ThemeNode, DEFAULT_KEY};
use indexmap::IndexMap;

/// Custom property name -> raw leaf value, in first-seen order.
///
/// Built once per generation pass before any resolution starts and only
/// read afterwards.
pub type FlatMap = IndexMap<String, String>;

/// Flatten the theme into `--path-to-leaf -> value`.
///
/// `DEFAULT` does not extend the path, so `colors.primary.DEFAULT` and a
/// plain `colors.primary` leaf both land on `--colors-primary`.
pub fn flatten(theme: &Theme) -> FlatMap {
    let mut out = FlatMap::new();
    walk(theme, None, &mut out);
    out
}

fn walk(theme: &Theme, prefix: Option<&str>, out: &mut FlatMap) {
    for (key, node) in theme.iter() {
        let name = child_name(prefix, key);
        match node {
            ThemeNode::Group(group) => walk(group, Some(&name), out),
            ThemeNode::Leaf(leaf) => {
                out.insert(name, leaf.value().to_string());
            }
        }
    }
}

/// Name of `key` below `parent`. `DEFAULT` names the parent itself.
pub(crate) fn child_name(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) if key == DEFAULT_KEY => parent.to_string(),
        Some(parent) => format!("{parent}-{key}"),
        None => format!("--{key}"),
    }
}
