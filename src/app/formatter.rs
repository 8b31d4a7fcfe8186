use crate::app::models::{CopyEntry, CopyKind, PackageReport};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

pub struct OutputGenerator;

impl OutputGenerator {
    /// Renders the destination layout as an indented tree.
    ///
    /// Parent folders that have no entry of their own (e.g. `bin/`) are still
    /// printed once so the nesting stays readable.
    pub fn generate_tree(entries: &[CopyEntry]) -> String {
        let mut sorted: Vec<&CopyEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| Path::new(&a.relative_path).cmp(Path::new(&b.relative_path)));

        let mut output = String::new();
        let mut printed_dirs = HashSet::new();

        for entry in sorted {
            let path = Path::new(&entry.relative_path);
            let components: Vec<Component> = path.components().collect();
            if components.is_empty() {
                continue;
            }

            let mut current = PathBuf::new();
            for (i, component) in components.iter().enumerate().take(components.len() - 1) {
                current.push(component);
                if printed_dirs.insert(current.clone()) {
                    let indent = "    ".repeat(i);
                    output.push_str(&format!(
                        "{}{}/\n",
                        indent,
                        component.as_os_str().to_string_lossy()
                    ));
                }
            }

            if entry.is_dir && !printed_dirs.insert(path.to_path_buf()) {
                continue;
            }

            let indent = "    ".repeat(entry.depth.saturating_sub(1));
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            let marker = if entry.is_dir { "/" } else { "" };
            output.push_str(&format!("{}{}{}\n", indent, name, marker));
        }

        output.trim_end().to_string()
    }

    pub fn format_plan(output_base: &Path, tree: &str) -> String {
        format!(
            "<package_plan output=\"{}\">\n{}\n</package_plan>",
            output_base.display(),
            tree
        )
    }

    pub fn format_summary(report: &PackageReport) -> String {
        format!(
            "Packaged {} files ({} binaries) and {} directories ({} bytes, {} entries skipped) into {}",
            report.files_copied(),
            report
                .entries
                .iter()
                .filter(|e| e.kind == CopyKind::Library)
                .count(),
            report.dirs_created(),
            report.bytes_copied,
            report.skipped.len(),
            report.output_base.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(relative: &str, is_dir: bool) -> CopyEntry {
        CopyEntry {
            source: PathBuf::from("src").join(relative),
            destination: PathBuf::from("out").join(relative),
            relative_path: relative.to_string(),
            depth: Path::new(relative).components().count(),
            is_dir,
            kind: CopyKind::Data,
        }
    }

    #[test]
    fn tree_includes_implicit_parents() {
        let entries = vec![
            entry("Core.dll", false),
            entry("bin/Mono", true),
            entry("bin/Mono/etc.cfg", false),
            entry("Data", true),
            entry("Data/Shaders", true),
        ];

        let tree = OutputGenerator::generate_tree(&entries);

        assert_eq!(
            tree,
            "Core.dll\n\
             Data/\n\
             \x20   Shaders/\n\
             bin/\n\
             \x20   Mono/\n\
             \x20       etc.cfg"
        );
    }

    #[test]
    fn tree_keeps_children_under_their_parent() {
        let entries = vec![
            entry("Data", true),
            entry("Data/Shaders", true),
            entry("Data/Shaders/a.bsl", false),
            entry("Data/Shaders-Old", true),
            entry("Data.dll", false),
        ];

        let tree = OutputGenerator::generate_tree(&entries);

        assert_eq!(
            tree,
            "Data/\n\
             \x20   Shaders/\n\
             \x20       a.bsl\n\
             \x20   Shaders-Old/\n\
             Data.dll"
        );
    }

    #[test]
    fn summary_counts_files_and_dirs() {
        let report = PackageReport {
            output_base: PathBuf::from("Builds/Banshee Editor"),
            entries: vec![entry("Data", true), entry("Core.dll", false)],
            skipped: vec![PathBuf::from("Game.exe")],
            bytes_copied: 42,
        };

        assert_eq!(
            OutputGenerator::format_summary(&report),
            "Packaged 1 files (0 binaries) and 1 directories (42 bytes, 1 entries skipped) into Builds/Banshee Editor"
        );
    }

    #[test]
    fn plan_wraps_tree() {
        let plan = OutputGenerator::format_plan(Path::new("out"), "Core.dll");
        assert_eq!(plan, "<package_plan output=\"out\">\nCore.dll\n</package_plan>");
    }
}
