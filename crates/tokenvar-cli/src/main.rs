use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use tokenvar_core::{
    build_preset, emitter, flatten, generate_colors, loader, process_theme, GenerateOptions, Theme,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Commands, ThemeArgs};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Css(args) => {
            let (theme, _) = prepare(&args)?;
            write_output(&args, emitter::emit_css(&process_theme(&theme)))
        }
        Commands::Colors(args) => {
            let (theme, options) = prepare(&args)?;
            write_output(&args, to_json(&generate_colors(&theme, &options))?)
        }
        Commands::Flatten(args) => {
            let (theme, _) = prepare(&args)?;
            write_output(&args, to_json(&flatten(&theme))?)
        }
        Commands::Preset { theme: args, safelist } => {
            let (theme, mut options) = prepare(&args)?;
            options.safelist.extend(safelist);
            write_output(&args, to_json(&build_preset(&theme, &options))?)
        }
    }
}

/// Load the theme sources and the options, flags taking precedence over
/// the config file.
fn prepare(args: &ThemeArgs) -> Result<(Theme, GenerateOptions)> {
    let mut options = match &args.config {
        Some(path) => GenerateOptions::load(path)?,
        None => GenerateOptions::default(),
    };
    if let Some(rule) = args.color_rule {
        options.color_rule = rule;
    }

    let theme = loader::load_themes(args.themes.as_slice())?;
    tracing::info!(sources = args.themes.len(), rule = %options.color_rule, "theme loaded");
    Ok((theme, options))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

fn write_output(args: &ThemeArgs, content: String) -> Result<()> {
    match &args.output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
