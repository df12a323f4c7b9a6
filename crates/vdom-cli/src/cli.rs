use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vdom_patch::DiffMode;

#[derive(Parser)]
#[command(
    name = "vdom",
    about = "vdom: reconcile host trees against virtual node trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file holding a patch configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured diff heuristics
    #[arg(long, global = true)]
    pub mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Exact,
    Compat,
}

impl From<ModeArg> for DiffMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Exact => DiffMode::Exact,
            ModeArg::Compat => DiffMode::Compat,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a vnode file into a host tree and print its HTML
    Render(RenderArgs),
    /// Mount OLD, patch it toward NEW, and show the mutations applied
    Patch(PatchArgs),
    /// Patch OLD toward NEW and verify the result matches a fresh render of NEW
    Check(PatchArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PatchArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Pass OLD as the previous vnode instead of relying on the cache
    #[arg(long)]
    pub explicit_prev: bool,
}
