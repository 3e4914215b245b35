use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokenvar_core::ColorFunction;

#[derive(Parser, Debug)]
#[command(name = "tokenvar")]
#[command(about = "Generate CSS custom properties and color tokens from a theme")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit the custom property declarations as a stylesheet fragment
    Css(ThemeArgs),
    /// Emit the color tokens as JSON
    Colors(ThemeArgs),
    /// Emit the flattened property dictionary as JSON
    Flatten(ThemeArgs),
    /// Emit safelist, color tokens and variable table as one JSON document
    Preset {
        #[command(flatten)]
        theme: ThemeArgs,

        /// Extra class kept by the safelist (repeatable)
        #[arg(long)]
        safelist: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct ThemeArgs {
    /// Theme JSON files or directories, merged in order
    #[arg(required = true)]
    pub themes: Vec<PathBuf>,

    /// Write output to FILE instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Color function for values without their own rule
    #[arg(long)]
    pub color_rule: Option<ColorFunction>,

    /// JSON options file (colorRule, safelist, darkMode, content)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
