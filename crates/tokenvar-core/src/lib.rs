//! Turn a nested color theme into CSS custom property declarations and
//! framework color tokens that reference them.
//!
//! One generation pass flattens the theme once and shares that lookup
//! table between [`generate_colors`] and [`process_theme`]; nothing is
//! cached between calls.

pub mod classify;
pub mod colors;
pub mod emitter;
pub mod error;
pub mod flatten;
pub mod loader;
pub mod options;
pub mod preset;
pub mod resolver;
pub mod theme;
pub mod variables;

pub use colors::{generate_colors, ColorToken, ColorTokens};
pub use error::ThemeError;
pub use flatten::{flatten, FlatMap};
pub use options::{ColorFunction, GenerateOptions};
pub use preset::{build_preset, Preset};
pub use resolver::{resolve, Resolution};
pub use theme::{Leaf, Theme, ThemeNode};
pub use variables::{process_theme, VariableTable};
