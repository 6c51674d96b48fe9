//! param command - Encode and decode handler parameters

use crate::core::metadata::codec::{self, HandlerParam};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Encode a JSON value as a handler parameter.
pub fn encode(json: &str) -> Result<()> {
    let value: HandlerParam =
        serde_json::from_str(json).with_context(|| format!("Invalid JSON '{}'", json))?;
    output::data(codec::encode(&value)?);
    Ok(())
}

/// Decode a handler parameter and print it as JSON.
///
/// Text that is not JSON decodes to itself as a string.
pub fn decode(text: &str) -> Result<()> {
    let value = codec::decode(text).to_json()?;
    output::data(serde_json::to_string(&value)?);
    Ok(())
}
