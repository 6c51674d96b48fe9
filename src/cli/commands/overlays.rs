//! overlays command - List classes with overlay metadata

use crate::engine::{Context, OverlayStore, Session};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// List the classes that have overlay metadata, in load order.
pub fn overlays(ctx: &Context) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet);
    let project_dir = ctx.project_dir()?;
    let config = Session::load_config(&project_dir, ctx.config.as_deref())
        .context("Failed to load config")?;

    let dirs = config.overlay_dirs();
    if dirs.is_empty() {
        output::print("No overlay directories configured.", verbosity);
        return Ok(());
    }

    for dir in dirs.iter().filter(|d| !d.is_dir()) {
        output::warn(
            format!("overlay directory '{}' does not exist", dir.display()),
            verbosity,
        );
    }

    let mut store = OverlayStore::new(dirs, config.overlay_extension());
    let classes = store.classes().context("Failed to load overlays")?;
    if classes.is_empty() {
        output::print("No overlays found.", verbosity);
    } else {
        output::data(output::format_list(&classes, ""));
    }

    Ok(())
}
