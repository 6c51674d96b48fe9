//! show command - Print a cached artifact

use super::parse_class;
use crate::core::paths::CachePaths;
use crate::engine::{Context, MetadataCache, Session};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Print the cached metadata of `class`.
pub fn show(ctx: &Context, class: &str) -> Result<()> {
    let class = parse_class(class)?;
    let project_dir = ctx.project_dir()?;
    let config = Session::load_config(&project_dir, ctx.config.as_deref())
        .context("Failed to load config")?;

    let cache = MetadataCache::new(CachePaths::new(config.cache_dir()));
    let Some(metadata) = cache.read(&class).context("Failed to read cache")? else {
        bail!(
            "No cache artifact for '{}'. Run 'smeta generate {}' first.",
            class,
            class
        );
    };

    output::data(MetadataCache::render(&class, &metadata)?.trim_end());
    Ok(())
}
