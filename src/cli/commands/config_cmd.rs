//! config command - Show or initialize configuration

use crate::core::config::{Config, ProjectConfig};
use crate::engine::{Context, Session};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Print the effective configuration and where it came from.
pub fn show(ctx: &Context) -> Result<()> {
    let project_dir = ctx.project_dir()?;
    let config = Session::load_config(&project_dir, ctx.config.as_deref())
        .context("Failed to load config")?;

    let overlay_dirs = config.overlay_dirs();
    let registry = ctx.registry.clone().unwrap_or_else(|| config.registry());
    let lines = vec![
        format!("project = {}", config.project_dir().display()),
        format!(
            "project_config = {}",
            loaded_from(config.project_config_loaded_from())
        ),
        format!(
            "global_config = {}",
            loaded_from(config.global_config_loaded_from())
        ),
        format!("registry = {}", registry.display()),
        format!("cache_dir = {}", config.cache_dir().display()),
        format!(
            "overlay_dirs = [{}]",
            overlay_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        format!("overlay_extension = {}", config.overlay_extension()),
        format!("runtime_version_id = {}", config.runtime_version_id()),
        format!("date_format = {}", config.date_format().as_str()),
        format!("debug = {}", ctx.debug || config.debug()),
    ];

    output::data(output::format_list(&lines, ""));
    Ok(())
}

fn loaded_from(path: Option<&std::path::Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string())
}

/// Write a starter project config.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet);
    let project_dir = ctx.project_dir()?;

    let path = Config::write_project(&project_dir, &ProjectConfig::starter(), force)
        .context("Failed to write config")?;

    output::print(format!("Wrote {}", path.display()), verbosity);
    Ok(())
}
