//! hierarchy command - Print the ancestor chain of a class

use super::parse_class;
use crate::engine::{Context, Session};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print `class` and its ancestors, root-most first.
pub fn hierarchy(ctx: &Context, class: &str) -> Result<()> {
    let class = parse_class(class)?;
    let session = Session::open(ctx).context("Failed to load project")?;

    let chain: Vec<_> = session
        .registry()
        .hierarchy(&class)?
        .into_iter()
        .map(|definition| definition.name.clone())
        .collect();

    output::data(output::format_list(&chain, ""));
    Ok(())
}
