use crate::app::models::{CopyEntry, CopyKind, PackageLayout, PackageReport, RuntimeConfig, StageScan};
use crate::app::scanner::Scanner;
use anyhow::{Context, Result};
use std::fs;

/// Assembles `Builds/<Product> Editor` from an already built project tree.
pub struct Packager {
    layout: PackageLayout,
    scanner: Scanner,
    data_ignore: Vec<String>,
}

impl Packager {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let layout = PackageLayout::from_config(config);
        Ok(Self {
            scanner: Scanner::new(layout.output_base.clone(), config)?,
            data_ignore: config.data_ignore.clone(),
            layout,
        })
    }

    pub fn layout(&self) -> &PackageLayout {
        &self.layout
    }

    /// Scans every input without writing anything.
    pub fn plan(&self) -> Result<StageScan> {
        let mut plan = StageScan::default();
        plan.extend(self.scan_data()?);
        plan.extend(self.scan_assemblies()?);
        plan.extend(self.scan_runtime()?);
        plan.extend(self.scan_libraries()?);
        Ok(plan)
    }

    /// Deletes the previous output and copies every packaged input into a fresh one.
    ///
    /// Any missing input or I/O failure aborts the run; the output is then left
    /// partially populated.
    pub fn package(&self) -> Result<PackageReport> {
        self.reset_output()?;

        let mut report = PackageReport {
            output_base: self.layout.output_base.clone(),
            entries: Vec::new(),
            skipped: Vec::new(),
            bytes_copied: 0,
        };

        let stages: [(&str, fn(&Self) -> Result<StageScan>); 4] = [
            ("data", Self::scan_data),
            ("assemblies", Self::scan_assemblies),
            ("runtime", Self::scan_runtime),
            ("library binaries", Self::scan_libraries),
        ];

        for (name, scan) in stages {
            let stage = scan(self)?;
            log::info!(
                "Copying {} ({} entries, {} skipped)",
                name,
                stage.entries.len(),
                stage.skipped.len()
            );
            report.bytes_copied += copy_entries(&stage.entries)?;
            report.entries.extend(stage.entries);
            report.skipped.extend(stage.skipped);
        }

        Ok(report)
    }

    fn reset_output(&self) -> Result<()> {
        let output = &self.layout.output_base;
        if output.exists() {
            log::info!("Removing previous output {}", output.display());
            fs::remove_dir_all(output)
                .with_context(|| format!("Failed to remove {}", output.display()))?;
        }
        fs::create_dir_all(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        Ok(())
    }

    fn scan_data(&self) -> Result<StageScan> {
        self.scanner.scan_tree(
            &self.layout.input_data,
            &self.layout.output_data,
            &self.data_ignore,
            CopyKind::Data,
        )
    }

    fn scan_assemblies(&self) -> Result<StageScan> {
        self.scanner.scan_tree(
            &self.layout.input_assemblies,
            &self.layout.output_assemblies,
            &[],
            CopyKind::Assemblies,
        )
    }

    fn scan_runtime(&self) -> Result<StageScan> {
        self.scanner.scan_tree(
            &self.layout.input_mono,
            &self.layout.output_mono,
            &[],
            CopyKind::Runtime,
        )
    }

    fn scan_libraries(&self) -> Result<StageScan> {
        self.scanner
            .scan_binaries(&self.layout.input_lib, &self.layout.output_lib)
    }
}

/// Copies entries in order, creating directories as needed. Returns bytes written.
fn copy_entries(entries: &[CopyEntry]) -> Result<u64> {
    let mut bytes = 0;
    for entry in entries {
        if entry.is_dir {
            fs::create_dir_all(&entry.destination)
                .with_context(|| format!("Failed to create {}", entry.destination.display()))?;
            continue;
        }

        if let Some(parent) = entry.destination.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        log::debug!(
            "{} -> {}",
            entry.source.display(),
            entry.destination.display()
        );
        bytes += fs::copy(&entry.source, &entry.destination).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                entry.source.display(),
                entry.destination.display()
            )
        })?;
    }
    Ok(bytes)
}
