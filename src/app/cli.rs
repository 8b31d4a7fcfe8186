use crate::app::models::CollisionPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Package a built editor into the Builds directory",
    long_about = "Copies the editor data, assemblies, Mono runtime and native binaries of an \
                  already built configuration into Builds/<Product> Editor.\n\n\
                  The output folder is deleted and recreated on every run without confirmation."
)]
pub struct Cli {
    /// Build configuration to package (e.g. Debug, OptimizedDebug)
    pub configuration: String,

    /// Project root containing Data, bin and Builds
    #[arg(long, default_value = "..")]
    pub project_root: PathBuf,

    /// Use a named profile from profiles.toml
    #[arg(long)]
    pub profile: Option<String>,

    /// Product name used for the output folder
    #[arg(long)]
    pub product: Option<String>,

    /// Platform folder under bin/ holding the configuration output
    #[arg(long)]
    pub platform: Option<String>,

    /// Extra top-level Data entries to leave out
    #[arg(long, num_args = 1..)]
    pub ignore_data: Option<Vec<String>>,

    /// Extra binary file names to leave out
    #[arg(long, num_args = 1..)]
    pub ignore_binary: Option<Vec<String>>,

    /// Extra binary extensions to package (e.g. dylib)
    #[arg(long, num_args = 1..)]
    pub binary_extension: Option<Vec<String>>,

    /// How to handle binaries that flatten onto the same name
    #[arg(long, value_enum, default_value_t = CollisionPolicy::Overwrite)]
    pub on_collision: CollisionPolicy,

    /// Print the planned output tree without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,
}
