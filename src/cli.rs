//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use refpatch::core::discover::WalkOptions;
use refpatch::core::render::{OutputFormat, RenderConfig};
use refpatch::patch::api::PatchRequest;
use refpatch::resolve::ResolveContext;

/// refpatch - resolve placeholder cross-reference links in diagram SVGs.
#[derive(Parser, Debug)]
#[command(name = "refpatch")]
#[command(
    author,
    version,
    about,
    long_about = r##"Diagram renderers emit cross-reference links as href="\ref" with the
reference name as the link label. refpatch finds those links, looks the name up
in a reference table, and rewrites the link in place. Links that cannot be
resolved get href="#" and an onclick handler that reports the name to the
hosting page.

Each command prints a ResultSet in the selected format (default: jsonl).

Examples:
    refpatch scan html/
    refpatch patch html/ --refs refs.json --rel-path ../
    refpatch patch uml/seq.svg --refs refs.json --context ns::Widget --dry-run
"##
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and positional paths are\n\
interpreted relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw (reference names only)"
    )]
    pub format: String,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr. REFPATCH_LOG, when set, takes\n\
precedence (e.g. REFPATCH_LOG=refpatch=trace)."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Traversal flags shared by commands that accept directories
#[derive(Args, Debug, Clone)]
pub struct WalkArgs {
    /// SVG files or directories (relative to ROOT unless absolute).
    #[arg(value_name = "PATH", num_args = 0..)]
    pub paths: Vec<PathBuf>,

    /// Include hidden files/directories (dotfiles).
    #[arg(long)]
    pub hidden: bool,

    /// Disable .gitignore and other ignore rules.
    #[arg(long)]
    pub no_ignore: bool,
}

impl WalkArgs {
    fn options(&self) -> WalkOptions {
        WalkOptions {
            hidden: self.hidden,
            ignore: !self.no_ignore,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite placeholder links in SVG files.
    #[command(
        long_about = "Patch every href=\"\\ref\" / xlink:href=\"\\ref\" link in the given SVG files,\n\
or in every *.svg under the given directories (ROOT when none are given).\n\n\
Files without placeholders are left untouched. Links whose label cannot be read\n\
are skipped and reported.\n\n\
Examples:\n\
  refpatch patch html/ --refs refs.json\n\
  refpatch patch html/uml --refs refs.json --rel-path ../ --atomic\n"
    )]
    Patch {
        #[command(flatten)]
        walk: WalkArgs,

        /// Reference table (JSON) used to resolve names.
        #[arg(
            long,
            env = "REFPATCH_REFS",
            value_name = "FILE",
            long_help = "JSON reference table mapping names to targets.\n\n\
Without a table every reference is treated as unresolved."
        )]
        refs: Option<PathBuf>,

        /// Prefix for local targets (path from the SVG back to the docs root).
        #[arg(long, env = "REFPATCH_REL_PATH", default_value = "", value_name = "PREFIX")]
        rel_path: String,

        /// Scope in which names are looked up (e.g. ns::Widget).
        #[arg(long, env = "REFPATCH_CONTEXT", default_value = "", value_name = "SCOPE")]
        context: String,

        /// Extension appended to target files without one.
        #[arg(
            long,
            value_name = "EXT",
            long_help = "Extension appended to target files that have none.\n\n\
Overrides the table's \"extension\"; defaults to .html."
        )]
        extension: Option<String>,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,

        /// Write through a temporary file and rename it over the original.
        #[arg(long)]
        atomic: bool,
    },

    /// List placeholder links without modifying anything.
    #[command(
        long_about = "Scan SVG files for placeholder links and emit one anchor result per link\n\
with its line and reference name. Links the patcher would skip are marked skipped.\n\n\
Example:\n\
  refpatch scan html/\n"
    )]
    Scan {
        #[command(flatten)]
        walk: WalkArgs,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Patch {
            walk,
            refs,
            rel_path,
            context,
            extension,
            dry_run,
            atomic,
        } => {
            let request = PatchRequest {
                inputs: walk.paths.clone(),
                refs,
                context: ResolveContext::new(rel_path, context),
                extension,
                dry_run,
                atomic,
                walk: walk.options(),
            };
            refpatch::patch::api::run_patch(&root, &request, render_config)
        }

        Commands::Scan { walk } => {
            refpatch::patch::api::run_scan(&root, &walk.paths, walk.options(), render_config)
        }
    }
}
