use crate::error::ThemeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Color function a plain component list gets wrapped in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFunction {
    #[default]
    Hsl,
    Rgb,
}

impl ColorFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Hsl => "hsl",
            Self::Rgb => "rgb",
        }
    }

    /// `hsl(inner)` / `rgb(inner)`.
    pub fn wrap(self, inner: &str) -> String {
        format!("{}({})", self.name(), inner)
    }
}

impl fmt::Display for ColorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hsl" => Ok(Self::Hsl),
            "rgb" => Ok(Self::Rgb),
            other => Err(format!("Unknown color function '{other}' (expected hsl or rgb)")),
        }
    }
}

/// Options for one generation pass.
///
/// `dark_mode` and `content` are carried to the preset untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    pub color_rule: ColorFunction,
    pub safelist: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl GenerateOptions {
    pub fn with_color_rule(mut self, rule: ColorFunction) -> Self {
        self.color_rule = rule;
        self
    }

    /// Read options from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let data = fs::read_to_string(path).map_err(|e| ThemeError::io(path, e))?;
        serde_json::from_str(&data).map_err(|e| ThemeError::json(path, e))
    }
}
