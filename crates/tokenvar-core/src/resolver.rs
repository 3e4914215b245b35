//! `var()` reference resolution against the flattened theme.
//!
//! Resolution inlines the value of every `var(--name)` whose name exists in
//! the [`FlatMap`], keeping the reference in place with the resolved value as
//! its fallback:
//!
//! ```text
//! --x: hsl(var(--y))
//! --y: 240 10% 50%
//!
//! hsl(var(--x))  =>  hsl(var(--x, 240 10% 50%))/* --x */
//! ```
//!
//! A stored value wrapped in the same color function as the surrounding
//! context is peeled, so the output never nests `hsl(hsl(...))`. Names that
//! forward to another reference form the resolution trail, which is written
//! out as a trailing comment.
//!
//! Nothing here fails. Unknown names, cycles and unbalanced parentheses are
//! left as written.

use crate::flatten::FlatMap;
use crate::options::ColorFunction;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::trace;

/// Start of a call the resolver understands: `var(` or a color function.
static CALL_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(var|rgba?|hsla?)\(").unwrap());

static WRAPPED_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:hsl|rgb)\(var\(").unwrap());

/// Result of resolving one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The rewritten value without the trail comment.
    pub value: String,
    /// Custom properties crossed on the way, first seen first, no repeats.
    pub trail: Vec<String>,
    annotated: bool,
}

impl Resolution {
    /// `/* --a -> --b */`, when the trail is worth documenting.
    pub fn comment(&self) -> Option<String> {
        self.annotated
            .then(|| format!("/* {} */", self.trail.join(" -> ")))
    }

    /// Value followed by its trail comment, if any.
    pub fn to_css(&self) -> String {
        match self.comment() {
            Some(comment) => format!("{}{}", self.value, comment),
            None => self.value.clone(),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Resolve `raw` outside of any color function.
pub fn resolve(raw: &str, flat: &FlatMap) -> Resolution {
    resolve_in(raw, None, flat)
}

/// Resolve `raw` as if it were the argument list of `context`. Top level
/// references whose stored value is wrapped in `context` get peeled.
pub fn resolve_in(raw: &str, context: Option<ColorFunction>, flat: &FlatMap) -> Resolution {
    let mut resolver = Resolver::new(flat);
    let value = resolver.resolve_text(raw, context.map(ColorFunction::name));
    let trail = resolver.trail;

    // A single hop is only documented when it went through a function
    // wrapped value. This is a textual check on the stored value.
    let annotated = match trail.as_slice() {
        [] => false,
        [only] => flat
            .get(only)
            .is_some_and(|stored| stored.contains("hsl(") || stored.contains("rgb(")),
        _ => true,
    };

    trace!(raw, resolved = %value, ?trail, "resolved references");
    Resolution {
        value,
        trail,
        annotated,
    }
}

/// `hsl(var(` or `rgb(var(` appears somewhere in the value.
pub fn is_wrapped_reference(value: &str) -> bool {
    WRAPPED_REFERENCE.is_match(value)
}

/// Any `var(` or color function call in the value.
pub fn has_call(value: &str) -> bool {
    CALL_START.is_match(value)
}

struct Resolver<'a> {
    flat: &'a FlatMap,
    /// Names currently being expanded. A name on the stack is a cycle.
    stack: Vec<String>,
    trail: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(flat: &'a FlatMap) -> Self {
        Self {
            flat,
            stack: Vec::new(),
            trail: Vec::new(),
        }
    }

    fn resolve_text(&mut self, text: &str, context: Option<&str>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(call) = next_call(rest) {
            out.push_str(&rest[..call.start]);
            let whole = &rest[call.start..call.end];
            if call.name == "var" {
                out.push_str(&self.expand_var(whole, call.args, context));
            } else {
                out.push_str(&self.expand_function(call.name, call.args));
            }
            rest = &rest[call.end..];
        }
        out.push_str(rest);
        out
    }

    fn expand_function(&mut self, name: &str, args: &str) -> String {
        let inner = self.resolve_text(args, Some(name));
        collapse(name, &inner)
    }

    fn expand_var(&mut self, whole: &str, args: &str, context: Option<&str>) -> String {
        let flat = self.flat;
        let (name, _fallback) = split_var_args(args);
        if !self.can_enter(name) {
            return whole.to_string();
        }

        let depth = self.stack.len();
        let mut hops: Vec<String> = Vec::new();
        let mut current = name.to_string();

        let content = loop {
            let stored = flat[current.as_str()].as_str();
            self.stack.push(current.clone());

            let peeled = context.and_then(|f| peel(stored, f));
            let candidate = peeled.unwrap_or(stored);

            if let Some(next) = sole_reference(candidate) {
                if self.can_enter(next) {
                    self.record(&current);
                    hops.push(current);
                    current = next.to_string();
                    continue;
                }
            }

            if has_call(candidate) {
                self.record(&current);
                hops.push(current);
                break self.resolve_text(candidate, context);
            }

            if peeled.is_some() {
                self.record(&current);
                hops.push(current);
            }
            break candidate.to_string();
        };
        self.stack.truncate(depth);

        let target = match hops.as_slice() {
            [_, .., last] => last.as_str(),
            _ => name,
        };
        format!("var({target}, {content})")
    }

    fn record(&mut self, name: &str) {
        if !self.trail.iter().any(|n| n == name) {
            self.trail.push(name.to_string());
        }
    }

    fn can_enter(&self, name: &str) -> bool {
        self.flat.contains_key(name) && !self.stack.iter().any(|n| n == name)
    }
}

struct Call<'t> {
    name: &'t str,
    args: &'t str,
    start: usize,
    end: usize,
}

/// Next call with balanced parentheses. Unbalanced candidates are skipped.
fn next_call(text: &str) -> Option<Call<'_>> {
    let mut from = 0;
    while let Some(caps) = CALL_START.captures_at(text, from) {
        let whole = caps.get(0)?;
        let name = caps.get(1)?.as_str();
        let open = whole.end() - 1;
        match close_paren(text, open) {
            Some(close) => {
                return Some(Call {
                    name,
                    args: &text[open + 1..close],
                    start: whole.start(),
                    end: close + 1,
                });
            }
            None => from = whole.end(),
        }
    }
    None
}

/// Index of the `)` matching the `(` at `open`.
fn close_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `--name, fallback` -> (`--name`, Some(`fallback`)), split at the first
/// comma outside parentheses.
fn split_var_args(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (i, ch) in args.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return (args[..i].trim(), Some(args[i + 1..].trim())),
            _ => {}
        }
    }
    (args.trim(), None)
}

/// Arguments of `value` when the whole of it is a single `function(...)`.
fn peel<'v>(value: &'v str, function: &str) -> Option<&'v str> {
    let value = value.trim();
    let rest = value.strip_prefix(function)?;
    if !rest.starts_with('(') {
        return None;
    }
    let open = function.len();
    let close = close_paren(value, open)?;
    (close == value.len() - 1).then(|| &value[open + 1..close])
}

/// Name of the reference when `value` is nothing but one `var(...)`.
fn sole_reference(value: &str) -> Option<&str> {
    let args = peel(value, "var")?;
    let (name, _) = split_var_args(args);
    name.starts_with("--").then_some(name)
}

/// `hsl(hsl(x) / 90%)` -> `hsl(x / 90%)`. Different functions are left
/// nested.
fn collapse(name: &str, inner: &str) -> String {
    let trimmed = inner.trim_start();
    if let Some(rest) = trimmed.strip_prefix(name) {
        if rest.starts_with('(') {
            if let Some(close) = close_paren(trimmed, name.len()) {
                let inner_args = &trimmed[name.len() + 1..close];
                let tail = &trimmed[close + 1..];
                return format!("{name}({inner_args}{tail})");
            }
        }
    }
    format!("{name}({inner})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat(entries: &[(&str, &str)]) -> FlatMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn collapses_same_function_through_a_reference() {
        let flat = flat(&[("--x", "hsl(var(--y))"), ("--y", "240 10% 50%")]);
        let res = resolve("hsl(var(--x))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--x, 240 10% 50%))/* --x */");
        assert_eq!(res.trail, vec!["--x"]);
    }

    #[test]
    fn plain_reference_gets_literal_fallback_without_comment() {
        let flat = flat(&[("--primary", "240 5.9% 10%")]);
        let res = resolve("hsl(var(--primary))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--primary, 240 5.9% 10%))");
        assert!(res.trail.is_empty());
        assert_eq!(res.comment(), None);
    }

    #[test]
    fn multi_hop_chain_points_at_last_forwarding_name() {
        let flat = flat(&[
            ("--a", "hsl(var(--b))"),
            ("--b", "hsl(var(--c))"),
            ("--c", "1 2% 3%"),
        ]);
        let res = resolve("hsl(var(--a))", &flat);
        assert_eq!(res.value, "hsl(var(--b, 1 2% 3%))");
        assert_eq!(res.comment().as_deref(), Some("/* --a -> --b */"));
    }

    #[test]
    fn cycles_terminate() {
        let flat = flat(&[("--a", "hsl(var(--b))"), ("--b", "hsl(var(--a))")]);

        let res = resolve("hsl(var(--a))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--b, var(--a)))/* --a -> --b */");

        let res = resolve("hsl(var(--b))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--a, var(--b)))/* --b -> --a */");

        let res = resolve("var(--a)", &flat);
        assert!(res.value.starts_with("var(--a, hsl("));
        assert_eq!(res.trail, vec!["--a", "--b"]);
    }

    #[test]
    fn self_reference_terminates() {
        let flat = flat(&[("--a", "var(--a)")]);
        let res = resolve("var(--a)", &flat);
        assert_eq!(res.value, "var(--a, var(--a))");
    }

    #[test]
    fn unknown_references_are_left_alone() {
        let flat = flat(&[("--a", "1 2 3")]);
        let res = resolve("hsl(var(--missing, 0 0% 0%))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--missing, 0 0% 0%))");
        assert!(res.trail.is_empty());
    }

    #[test]
    fn malformed_var_is_left_alone() {
        let flat = flat(&[("--a", "1 2 3")]);
        assert_eq!(resolve("hsl(var(--a)", &flat).value, "hsl(var(--a, 1 2 3)");
        assert_eq!(resolve("var(--a", &flat).value, "var(--a");
        assert_eq!(resolve("var(a)", &flat).value, "var(a)");
    }

    #[test]
    fn different_function_stays_nested() {
        let flat = flat(&[("--x", "rgb(var(--y))"), ("--y", "0 0 0")]);
        let res = resolve("hsl(var(--x))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--x, rgb(var(--y, 0 0 0))))/* --x */");
    }

    #[test]
    fn direct_reference_to_wrapped_literal_is_unwrapped() {
        let flat = flat(&[("--x", "hsl(1 2% 3%)")]);
        let res = resolve("hsl(var(--x))", &flat);
        assert_eq!(res.to_css(), "hsl(var(--x, 1 2% 3%))/* --x */");
    }

    #[test]
    fn forwarding_without_function_has_no_comment() {
        let flat = flat(&[
            ("--btn-primary", "240 5.9% 10%"),
            ("--btn-primary-hover", "var(--btn-primary) / 90%"),
        ]);
        let res = resolve("hsl(var(--btn-primary-hover))", &flat);
        assert_eq!(
            res.to_css(),
            "hsl(var(--btn-primary-hover, var(--btn-primary, 240 5.9% 10%) / 90%))"
        );
        assert_eq!(res.trail, vec!["--btn-primary-hover"]);
    }

    #[test]
    fn collapses_literal_nested_functions_keeping_modifiers() {
        let flat = FlatMap::new();
        assert_eq!(resolve("hsl(hsl(1 2% 3%) / 90%)", &flat).value, "hsl(1 2% 3% / 90%)");
        assert_eq!(resolve("rgb(hsl(1 2% 3%))", &flat).value, "rgb(hsl(1 2% 3%))");
    }

    #[test]
    fn context_peels_top_level_references() {
        let flat = flat(&[("--x", "rgb(var(--y))"), ("--y", "0 0 0")]);
        let res = resolve_in("var(--x) / 50%", Some(ColorFunction::Rgb), &flat);
        assert_eq!(res.to_css(), "var(--x, 0 0 0) / 50%/* --x */");
    }

    #[test]
    fn repeated_reference_resolves_each_time_and_trail_has_no_duplicates() {
        let flat = flat(&[("--a", "var(--b)"), ("--b", "1")]);
        let res = resolve("var(--a) var(--a)", &flat);
        assert_eq!(res.value, "var(--a, 1) var(--a, 1)");
        assert_eq!(res.trail, vec!["--a"]);
    }

    #[test]
    fn detects_wrapped_references() {
        assert!(is_wrapped_reference("hsl(var(--a))"));
        assert!(is_wrapped_reference("rgb(var(--a) / 50%)"));
        assert!(!is_wrapped_reference("var(--a)"));
        assert!(!is_wrapped_reference("hsl(1 2% 3%)"));
    }

    #[test]
    fn splits_var_arguments_outside_parentheses() {
        assert_eq!(split_var_args("--a, rgb(1, 2, 3)"), ("--a", Some("rgb(1, 2, 3)")));
        assert_eq!(split_var_args(" --a "), ("--a", None));
    }
}
