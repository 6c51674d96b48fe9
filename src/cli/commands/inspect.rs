//! inspect command - Print freshly built metadata without writing it

use super::parse_class;
use crate::engine::{ClassMetadataBuilder, Context, MetadataCache, Session};
use crate::ui::output;
use anyhow::{Context as _, Result};
use std::sync::Arc;

/// Print the metadata built for `class`, optionally merged with its overlay.
pub fn inspect(ctx: &Context, class: &str, merged: bool) -> Result<()> {
    let class = parse_class(class)?;
    let session = Session::open(ctx).context("Failed to load project")?;

    let metadata = if merged {
        session
            .generator(false)
            .merged_metadata(&class)
            .with_context(|| format!("Failed to build metadata for '{}'", class))?
    } else {
        let builder =
            ClassMetadataBuilder::new(Arc::clone(session.registry()), session.config().date_format());
        let definition = session.registry().get(&class)?;
        builder
            .build(definition)
            .with_context(|| format!("Failed to build metadata for '{}'", class))?
            .to_value()?
    };

    output::data(MetadataCache::render(&class, &metadata)?.trim_end());
    Ok(())
}
