//! refpatch - patch placeholder cross-reference links in diagram SVGs
//!
//! Diagram tools render `\ref` links without knowing where they point.
//! refpatch looks up each link's label and rewrites the link in place.

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    refpatch::logging::init(cli.verbose, cli.quiet);
    cli::run(cli)
}
