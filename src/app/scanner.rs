use crate::app::models::{CollisionPolicy, CopyEntry, CopyKind, RuntimeConfig, StageScan};
use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Scanner {
    output_base: PathBuf,
    extension_set: GlobSet,
    binary_ignore: HashSet<String>,
    collision_policy: CollisionPolicy,
}

impl Scanner {
    pub fn new(output_base: PathBuf, config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            output_base,
            extension_set: build_extension_set(&config.binary_extensions)?,
            binary_ignore: config.binary_ignore.iter().cloned().collect(),
            collision_policy: config.collision_policy,
        })
    }

    /// Lists everything under `source`, mapped onto `destination`.
    ///
    /// Names in `top_level_ignore` are pruned only when they are direct children
    /// of `source`; deeper entries with the same name are kept.
    pub fn scan_tree(
        &self,
        source: &Path,
        destination: &Path,
        top_level_ignore: &[String],
        kind: CopyKind,
    ) -> Result<StageScan> {
        ensure_input_dir(source)?;

        let ignored: HashSet<OsString> = top_level_ignore.iter().map(OsString::from).collect();
        let mut scan = StageScan {
            entries: vec![self.entry(source, destination.to_path_buf(), true, kind)?],
            skipped: skipped_top_level(source, &ignored)?,
        };

        let mut builder = walker(source);
        if !ignored.is_empty() {
            builder.filter_entry(move |entry| {
                !(entry.depth() == 1 && ignored.contains(entry.file_name()))
            });
        }

        for result in builder.build() {
            let entry =
                result.with_context(|| format!("Failed to walk {}", source.display()))?;
            if entry.depth() == 0 {
                continue;
            }

            let relative = diff_paths(entry.path(), source).with_context(|| {
                format!(
                    "{} is not inside {}",
                    entry.path().display(),
                    source.display()
                )
            })?;
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());

            scan.entries
                .push(self.entry(entry.path(), destination.join(relative), is_dir, kind)?);
        }

        for path in &scan.skipped {
            log::debug!("Skipping ignored entry {}", path.display());
        }

        Ok(scan)
    }

    /// Finds every packaged binary below `source` and maps it flat into `destination`.
    pub fn scan_binaries(&self, source: &Path, destination: &Path) -> Result<StageScan> {
        ensure_input_dir(source)?;

        let mut scan = StageScan::default();
        let mut by_name: HashMap<OsString, usize> = HashMap::new();

        for result in walker(source).build() {
            let entry =
                result.with_context(|| format!("Failed to walk {}", source.display()))?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let file_name = entry.file_name();
            if !self.is_packaged_binary(&file_name.to_string_lossy()) {
                log::debug!("Skipping {}", entry.path().display());
                scan.skipped.push(entry.path().to_path_buf());
                continue;
            }

            let copy = self.entry(
                entry.path(),
                destination.join(file_name),
                false,
                CopyKind::Library,
            )?;

            match by_name.get(file_name) {
                Some(&index) => {
                    let previous = scan.entries[index].source.clone();
                    match self.collision_policy {
                        CollisionPolicy::Overwrite => {
                            log::warn!(
                                "{} overwrites {} in the flattened output",
                                entry.path().display(),
                                previous.display()
                            );
                            scan.skipped.push(previous);
                            scan.entries[index] = copy;
                        }
                        CollisionPolicy::Error => bail!(
                            "Binary name collision: {} and {} both map to {}",
                            previous.display(),
                            entry.path().display(),
                            copy.destination.display()
                        ),
                    }
                }
                None => {
                    by_name.insert(file_name.to_os_string(), scan.entries.len());
                    scan.entries.push(copy);
                }
            }
        }

        Ok(scan)
    }

    /// True if a file with this name belongs in the packaged library folder.
    pub fn is_packaged_binary(&self, file_name: &str) -> bool {
        self.extension_set.is_match(file_name) && !self.binary_ignore.contains(file_name)
    }

    fn entry(
        &self,
        source: &Path,
        destination: PathBuf,
        is_dir: bool,
        kind: CopyKind,
    ) -> Result<CopyEntry> {
        let relative = diff_paths(&destination, &self.output_base).with_context(|| {
            format!(
                "{} is not inside the output folder {}",
                destination.display(),
                self.output_base.display()
            )
        })?;

        Ok(CopyEntry {
            source: source.to_path_buf(),
            relative_path: relative.to_string_lossy().replace('\\', "/"),
            depth: relative.components().count(),
            destination,
            is_dir,
            kind,
        })
    }
}

fn ensure_input_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        bail!("Input directory not found: {}", path.display());
    }
    Ok(())
}

/// Plain walker: nothing hidden or gitignored is dropped.
///
/// Within a directory, files come before subdirectories, each sorted by name,
/// so a nested binary is always visited after a same-named one above it.
fn walker(source: &Path) -> WalkBuilder {
    let mut builder = WalkBuilder::new(source);
    builder
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_path(|a, b| {
            a.is_dir()
                .cmp(&b.is_dir())
                .then_with(|| a.file_name().cmp(&b.file_name()))
        });
    builder
}

fn skipped_top_level(source: &Path, ignored: &HashSet<OsString>) -> Result<Vec<PathBuf>> {
    if ignored.is_empty() {
        return Ok(Vec::new());
    }

    let mut skipped = Vec::new();
    for entry in fs::read_dir(source).with_context(|| format!("Failed to read {}", source.display()))? {
        let entry = entry.with_context(|| format!("Failed to read {}", source.display()))?;
        if ignored.contains(&entry.file_name()) {
            skipped.push(entry.path());
        }
    }
    skipped.sort();
    Ok(skipped)
}

fn build_extension_set(extensions: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let pattern = format!("*.{}", ext.trim_start_matches('.'));
        builder.add(
            GlobBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .context(format!("Invalid binary extension: {}", ext))?,
        );
    }
    Ok(builder.build()?)
}
