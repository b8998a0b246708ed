//! RU-009: Command-line surface — flags, logging setup, top-level run.

use crate::core::emit::{self, ScriptWritePolicy};
use crate::core::parser;
use crate::core::unit::{self, GenerateOptions, ManifestPolicy};
use crate::error::{Error, Result};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "recipe2unit",
    version,
    about = "Translate a component recipe into a systemd unit and its lifecycle scripts",
    disable_help_flag = true
)]
pub struct Args {
    /// Path to the recipe file to translate
    #[arg(short = 'r', long = "recipe-path", value_parser = non_empty_path)]
    pub recipe_path: PathBuf,

    /// Absolute path to the recipe runner binary
    #[arg(short = 'e', long = "recipe-runner-path", value_parser = non_empty_path)]
    pub recipe_runner_path: PathBuf,

    /// Directory for the unit file and scripts
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Policy when several manifests apply to linux
    #[arg(long, value_enum, default_value_t = ManifestPolicy::LastWins)]
    pub on_multiple_manifests: ManifestPolicy,

    /// Policy when a script file cannot be written
    #[arg(long, value_enum, default_value_t = ScriptWritePolicy::Fatal)]
    pub on_script_write_error: ScriptWritePolicy,

    /// Print help
    #[arg(short = 'h', long = "help", visible_alias = "Help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

fn non_empty_path(s: &str) -> std::result::Result<PathBuf, String> {
    if s.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(PathBuf::from(s))
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log a failed run and return the exit code it maps to.
pub fn report_failure(err: &Error) -> i32 {
    let code = err.exit_code();
    tracing::error!(error = %err, exit_code = code, "recipe2unit failed");
    code
}

/// Run one translation end to end.
pub fn dispatch(args: Args) -> Result<()> {
    if !args.recipe_runner_path.is_absolute() {
        return Err(Error::Usage(format!(
            "recipe runner path must be absolute, got {}",
            args.recipe_runner_path.display()
        )));
    }
    let out_dir = absolute_dir(&args.output_dir)?;

    let recipe = parser::parse_recipe_file(&args.recipe_path)?;
    let opts = GenerateOptions {
        runner_path: args.recipe_runner_path,
        script_dir: out_dir.clone(),
        manifest_policy: args.on_multiple_manifests,
    };
    let generation = unit::generate(&recipe, &opts)?;
    emit::write_generation(&generation, &out_dir, args.on_script_write_error)?;

    if generation.unit.is_none() {
        tracing::info!(
            component = %generation.component,
            "skipped generating unit file: no linux manifest with a run or startup phase"
        );
    }
    Ok(())
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    std::path::absolute(dir).map_err(|e| Error::io(dir, e))
}
