use crate::colors::{generate_colors_with, ColorTokens};
use crate::flatten::flatten;
use crate::options::GenerateOptions;
use crate::theme::{Theme, DARK_KEY};
use crate::variables::{process_theme_with, VariableTable};
use serde::Serialize;
use serde_json::Value;

/// Everything a CSS framework preset needs from one theme.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// `dark` first, then the configured extra classes.
    pub safelist: Vec<String>,
    pub colors: ColorTokens,
    pub variables: VariableTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// Run both generators over one flattened view of `theme`.
pub fn build_preset(theme: &Theme, options: &GenerateOptions) -> Preset {
    let flat = flatten(theme);

    // Extra classes follow `dark` verbatim.
    let mut safelist = vec![DARK_KEY.to_string()];
    safelist.extend(options.safelist.iter().cloned());

    Preset {
        safelist,
        colors: generate_colors_with(theme, options, &flat),
        variables: process_theme_with(theme, &flat),
        dark_mode: options.dark_mode.clone(),
        content: options.content.clone(),
    }
}
