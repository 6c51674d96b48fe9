//! generate command - Build, merge, and cache metadata for classes

use super::parse_class;
use crate::engine::{Context, Session};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Generate artifacts for `classes` and their ancestors, or for every
/// registered class with `all`.
///
/// Classes are processed in order; the first failure aborts the batch.
pub fn generate(ctx: &Context, classes: &[String], all: bool, force: bool) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet);
    let requested = classes
        .iter()
        .map(|c| parse_class(c))
        .collect::<Result<Vec<_>>>()?;

    let session = Session::open(ctx).context("Failed to load project")?;
    let classes = if all {
        session.registry().class_names().into_iter().cloned().collect()
    } else {
        requested
    };
    let mut generator = session.generator(force);

    for class in &classes {
        let report = generator
            .generate_for(class)
            .with_context(|| format!("Failed to generate metadata for '{}'", class))?;

        if report.cache_hit {
            output::print(
                format!("{}: up to date (use --force to rebuild)", class),
                verbosity,
            );
            continue;
        }

        for path in &report.written {
            output::print(format!("wrote {}", path.display()), verbosity);
        }
    }

    Ok(())
}
