//! Text output for listings.

use std::io::{self, Write};

use crate::lister::Listing;

/// What gets printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One `<full_name> (<HEX>)` line per node.
    #[default]
    List,
    /// The number of nodes only.
    Count,
}

/// How fingerprints are rendered in list mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HexStyle {
    /// Uppercase hex without leading zeros.
    #[default]
    Compact,
    /// Always eight uppercase hex digits.
    Padded,
}

/// Writes `listing` to `out`.
///
/// Count mode always prints a number, `0` included. List mode prints nothing
/// at all for an empty listing.
pub fn render(
    listing: &Listing,
    mode: OutputMode,
    style: HexStyle,
    out: &mut impl Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Count => writeln!(out, "{}", listing.count()),
        OutputMode::List => {
            for entry in &listing.entries {
                match style {
                    HexStyle::Compact => {
                        writeln!(out, "{} ({})", entry.full_name, entry.fingerprint)?
                    }
                    HexStyle::Padded => writeln!(
                        out,
                        "{} ({})",
                        entry.full_name,
                        entry.fingerprint.padded()
                    )?,
                }
            }
            Ok(())
        }
    }
}
