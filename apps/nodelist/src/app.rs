//! Wires configuration, discovery and presentation together.

use std::io::Write;

use nodelist_discovery::Discovery;
use nodelist_listing::{OutputMode, Visibility, list_nodes, render};

use crate::Args;
use crate::config::Config;

/// Lists nodes once and writes the result to `out`.
///
/// Nothing is written unless discovery succeeds.
pub fn run(args: &Args, config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let discovery = config.discovery.build();
    run_with(discovery.as_ref(), args, config, out)
}

fn run_with(
    discovery: &dyn Discovery,
    args: &Args,
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let visibility = Visibility::from(args.all);
    let mode = if args.count_nodes {
        OutputMode::Count
    } else {
        OutputMode::List
    };

    let listing = list_nodes(discovery, visibility)?;
    render(&listing, mode, config.output.hex_style(), out)?;
    out.flush()?;
    Ok(())
}
