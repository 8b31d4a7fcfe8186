use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Represents the final configuration after merging profiles and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub configuration: String,
    pub project_root: PathBuf,
    pub product: String,
    pub platform: String,
    pub data_ignore: Vec<String>,
    pub binary_ignore: Vec<String>,
    pub binary_extensions: Vec<String>,
    pub collision_policy: CollisionPolicy,
    pub dry_run: bool,
}

/// What to do when two library binaries flatten onto the same output name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CollisionPolicy {
    /// Later file wins, a warning is logged
    #[default]
    Overwrite,
    /// Abort packaging
    Error,
}

/// Input and output folders for a single packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub input_data: PathBuf,
    pub input_assemblies: PathBuf,
    pub input_mono: PathBuf,
    pub input_lib: PathBuf,
    pub output_base: PathBuf,
    pub output_data: PathBuf,
    pub output_assemblies: PathBuf,
    pub output_mono: PathBuf,
    pub output_lib: PathBuf,
}

impl PackageLayout {
    pub fn new(project_root: &Path, product: &str, platform: &str, configuration: &str) -> Self {
        let input_bin = project_root.join("bin");
        let output_base = project_root
            .join("Builds")
            .join(format!("{} Editor", product));
        let output_bin = output_base.join("bin");

        Self {
            input_data: project_root.join("Data"),
            input_assemblies: input_bin.join("Assemblies"),
            input_mono: input_bin.join("Mono"),
            input_lib: input_bin.join(platform).join(configuration),
            output_data: output_base.join("Data"),
            output_assemblies: output_bin.join("Assemblies"),
            output_mono: output_bin.join("Mono"),
            output_lib: output_base.clone(),
            output_base,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            &config.project_root,
            &config.product,
            &config.platform,
            &config.configuration,
        )
    }
}

/// Which packaging step produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    Data,
    Assemblies,
    Runtime,
    Library,
}

/// A single file or directory to be placed in the output tree.
#[derive(Debug, Clone)]
pub struct CopyEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub relative_path: String, // Relative to the output base, forward slashes
    pub depth: usize,
    pub is_dir: bool,
    pub kind: CopyKind,
}

/// Entries found by one scan, plus the source paths the filters rejected.
#[derive(Debug, Default)]
pub struct StageScan {
    pub entries: Vec<CopyEntry>,
    pub skipped: Vec<PathBuf>,
}

impl StageScan {
    pub fn extend(&mut self, other: StageScan) {
        self.entries.extend(other.entries);
        self.skipped.extend(other.skipped);
    }
}

#[derive(Debug)]
pub struct PackageReport {
    pub output_base: PathBuf,
    pub entries: Vec<CopyEntry>,
    pub skipped: Vec<PathBuf>,
    pub bytes_copied: u64,
}

impl PackageReport {
    pub fn files_copied(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_dir).count()
    }

    pub fn dirs_created(&self) -> usize {
        self.entries.iter().filter(|e| e.is_dir).count()
    }
}
