use clap::{Parser, Subcommand};

pub mod inspect;
pub mod list;
pub mod select;

#[derive(Debug, Parser)]
#[command(
    name = "provsel",
    author,
    version,
    about = "Provisioning profile discovery for extension signing pipelines",
    disable_help_subcommand = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Select the installed profile entitled to an extension point
    Select(select::SelectArgs),
    /// List installed provisioning profiles
    List(list::ListArgs),
    /// Classify individual provisioning profile files
    Inspect(inspect::InspectArgs),
}
