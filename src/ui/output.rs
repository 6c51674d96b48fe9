//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Status messages respect the quiet flag. Requested data (artifacts,
//! encoded parameters, config) is always printed: quiet mode suppresses
//! chatter, not answers.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print requested data (always shown).
pub fn data(message: impl Display) {
    println!("{}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false), Verbosity::Normal);
    }

    #[test]
    fn format_list_prefixes_each_item() {
        assert_eq!(format_list(&["a", "b"], "- "), "- a\n- b");
        assert_eq!(format_list::<&str>(&[], "- "), "");
    }
}
