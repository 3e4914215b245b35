//! Reference resolution through the public API.

use pretty_assertions::assert_eq;
use serde_json::json;
use tokenvar_core::{
    flatten, generate_colors, process_theme, resolve, FlatMap, GenerateOptions, Leaf, Theme,
};

fn flat(entries: &[(&str, &str)]) -> FlatMap {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn end_to_end_primary() {
    let theme =
        Theme::from_json(json!({"primary": {"DEFAULT": "240 5.9% 10%", "dark": "0 0% 98%"}}))
            .unwrap();

    let tokens =
        serde_json::to_value(generate_colors(&theme, &GenerateOptions::default())).unwrap();
    assert_eq!(
        tokens,
        json!({"primary": {"DEFAULT": "hsl(var(--primary, 240 5.9% 10%))"}})
    );

    let table = serde_json::to_value(process_theme(&theme)).unwrap();
    assert_eq!(
        table,
        json!({":root": {"--primary": "240 5.9% 10%"}, ".dark": {"--primary": "0 0% 98%"}})
    );
}

#[test]
fn mutual_references_terminate_from_either_side() {
    let flat = flat(&[("--a", "hsl(var(--b))"), ("--b", "hsl(var(--a))")]);
    for start in ["hsl(var(--a))", "hsl(var(--b))", "var(--a)", "rgb(var(--b)) / var(--a)"] {
        let res = resolve(start, &flat);
        assert!(res.trail.len() <= 2, "{start}: {:?}", res.trail);
        assert!(res.to_css().len() < 200);
    }
}

#[test]
fn long_chain_reports_every_forwarding_hop() {
    let flat = flat(&[
        ("--a", "var(--b)"),
        ("--b", "hsl(var(--c))"),
        ("--c", "var(--d)"),
        ("--d", "10 20% 30%"),
    ]);
    let res = resolve("hsl(var(--a))", &flat);
    assert_eq!(res.to_css(), "hsl(var(--c, 10 20% 30%))/* --a -> --b -> --c */");
}

#[test]
fn cyclic_theme_still_generates() {
    let theme = Theme::from_json(json!({"c": {
        "a": {"DEFAULT": "hsl(var(--c-b))", "dark": "0 0% 0%"},
        "b": {"DEFAULT": "hsl(var(--c-a))"},
    }}))
    .unwrap();

    let table = process_theme(&theme);
    assert_eq!(table.root()["--c-a"], "hsl(var(--c-a, var(--c-b)))/* --c-b -> --c-a */");
    assert_eq!(table.root()["--c-b"], "hsl(var(--c-b, var(--c-a)))/* --c-a -> --c-b */");

    let tokens = generate_colors(&theme, &GenerateOptions::default());
    assert_eq!(
        tokens["c-a"].as_group().unwrap()["DEFAULT"].as_value(),
        Some("var(--c-a, hsl(var(--c-a, var(--c-b))))/* --c-b -> --c-a */")
    );
}

#[test]
fn color_function_leaf_gets_resolved_fallback() {
    let theme = Theme::from_json(json!({"c": {
        "base": {"DEFAULT": "1 2% 3%"},
        "alias": {"DEFAULT": "hsl(var(--c-base))"},
    }}))
    .unwrap();

    let tokens =
        serde_json::to_value(generate_colors(&theme, &GenerateOptions::default())).unwrap();
    assert_eq!(
        tokens["c-alias"],
        json!({"DEFAULT": "var(--c-alias, hsl(var(--c-base, 1 2% 3%)))"})
    );
    assert_eq!(process_theme(&theme).root()["--c-alias"], "hsl(var(--c-base, 1 2% 3%))");
}

#[test]
fn builder_and_json_themes_agree() {
    let built = Theme::new().with(
        "btn",
        Theme::new().with(
            "primary",
            Theme::new()
                .with("DEFAULT", "240 5.9% 10%")
                .with("dark", "0 0% 98%")
                .with("hover", Theme::new().with("DEFAULT", Leaf::no_wrap("var(--btn-primary)"))),
        ),
    );
    let parsed = Theme::from_json(json!({"btn": {"primary": {
        "DEFAULT": "240 5.9% 10%",
        "dark": "0 0% 98%",
        "hover": {"DEFAULT": ["var(--btn-primary)"]},
    }}}))
    .unwrap();

    assert_eq!(flatten(&built), flatten(&parsed));
    assert_eq!(
        generate_colors(&built, &GenerateOptions::default()),
        generate_colors(&parsed, &GenerateOptions::default())
    );
    assert_eq!(process_theme(&built), process_theme(&parsed));
}
