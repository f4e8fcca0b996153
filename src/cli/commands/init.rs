//! Implementation of the `defect-rca init` command.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::{create_config_dir, create_config_file, SetupPaths};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_file: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        format!("{}\n  {}", self.message, self.config_file.display())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: &InitArgs, json_mode: bool) -> Result<()> {
    let paths = SetupPaths::new()?;
    let output_data = run(&paths, args.force)?;
    output(&output_data, json_mode);
    Ok(())
}

fn run(paths: &SetupPaths, force: bool) -> Result<InitOutput> {
    let reinitializing = paths.is_initialized();
    create_config_dir(paths)?;
    let written = create_config_file(paths, force)?;

    let message = match (written, reinitializing) {
        (false, _) => "Project already initialized. Use --force to overwrite the config.",
        (true, true) => "Configuration reset to defaults.",
        (true, false) => "Project initialized successfully.",
    };
    tracing::info!(path = %paths.config_file.display(), written, "init");

    Ok(InitOutput {
        success: written,
        message: message.to_string(),
        config_file: paths.config_file.clone(),
    })
}
