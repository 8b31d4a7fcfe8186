use crate::app::cli::Cli;
use crate::app::models::RuntimeConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PRODUCT: &str = "Banshee";
pub const DEFAULT_PLATFORM: &str = "x64";
pub const DEFAULT_DATA_IGNORE: &[&str] = &["Examples", "Raw", "Settings.asset"];
pub const DEFAULT_BINARY_IGNORE: &[&str] = &[
    "Game.exe",
    "Game.pdb",
    "ExampleProject.exe",
    "ExampleProject.pdb",
    "BansheeD3D9RenderAPI.dll",
    "BansheeD3D9RenderAPI.pdb",
];
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &["dll", "exe", "pdb", "so"];

#[derive(Deserialize, Debug)]
struct ProfilesFile {
    #[serde(flatten)]
    profiles: HashMap<String, ProfileConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    product: Option<String>,
    platform: Option<String>,
    data_ignore: Option<Vec<String>>,
    binary_ignore: Option<Vec<String>>,
    binary_extensions: Option<Vec<String>>,
}

fn profiles_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("editor_packager")
        .join("profiles.toml"))
}

fn load_profiles_file(config_path: &Path) -> Result<HashMap<String, ProfileConfig>> {
    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_profiles(&content).context(format!("Failed to parse {:?}", config_path))
}

fn parse_profiles(content: &str) -> Result<HashMap<String, ProfileConfig>> {
    let parsed: ProfilesFile = toml::from_str(content)?;
    Ok(parsed.profiles)
}

fn defaults(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn merge_vecs(base: Vec<String>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = base;
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Built-in packaging settings for `configuration` under `project_root`.
pub fn default_config(configuration: &str, project_root: &Path) -> RuntimeConfig {
    RuntimeConfig {
        configuration: configuration.to_string(),
        project_root: project_root.to_path_buf(),
        product: DEFAULT_PRODUCT.to_string(),
        platform: DEFAULT_PLATFORM.to_string(),
        data_ignore: defaults(DEFAULT_DATA_IGNORE),
        binary_ignore: defaults(DEFAULT_BINARY_IGNORE),
        binary_extensions: defaults(DEFAULT_BINARY_EXTENSIONS),
        collision_policy: Default::default(),
        dry_run: false,
    }
}

pub fn resolve_config(cli: Cli, project_root: PathBuf) -> Result<RuntimeConfig> {
    let profiles = load_profiles_file(&profiles_path()?)?;
    resolve_with_profiles(cli, project_root, &profiles)
}

fn resolve_with_profiles(
    cli: Cli,
    project_root: PathBuf,
    profiles: &HashMap<String, ProfileConfig>,
) -> Result<RuntimeConfig> {
    // Determine profile to use: CLI flag > project folder name > None
    let profile = match cli.profile.as_deref() {
        Some(name) => match profiles.get(name) {
            Some(profile) => profile.clone(),
            None => bail!("Unknown packaging profile: {}", name),
        },
        None => project_root
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| profiles.get(name))
            .cloned()
            .unwrap_or_default(),
    };

    let config = RuntimeConfig {
        configuration: cli.configuration,
        project_root,
        product: cli
            .product
            .or(profile.product)
            .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
        platform: cli
            .platform
            .or(profile.platform)
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        data_ignore: merge_vecs(
            profile
                .data_ignore
                .unwrap_or_else(|| defaults(DEFAULT_DATA_IGNORE)),
            cli.ignore_data,
        ),
        binary_ignore: merge_vecs(
            profile
                .binary_ignore
                .unwrap_or_else(|| defaults(DEFAULT_BINARY_IGNORE)),
            cli.ignore_binary,
        ),
        binary_extensions: merge_vecs(
            profile
                .binary_extensions
                .unwrap_or_else(|| defaults(DEFAULT_BINARY_EXTENSIONS)),
            cli.binary_extension,
        ),
        collision_policy: cli.on_collision,
        dry_run: cli.dry_run,
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::CollisionPolicy;
    use clap::Parser;

    const PROFILES: &str = r#"
[Banshee]
product = "Banshee"
data_ignore = ["Examples", "Raw"]

[Other]
product = "Other"
platform = "arm64"
binary_ignore = ["Tool.exe"]
binary_extensions = ["dll", "dylib"]
"#;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("editor_packager").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_without_profile() {
        let config = resolve_with_profiles(
            cli(&["Debug"]),
            PathBuf::from("/work/Unknown"),
            &HashMap::new(),
        )
        .unwrap();

        assert_eq!(config.configuration, "Debug");
        assert_eq!(config.product, "Banshee");
        assert_eq!(config.platform, "x64");
        assert_eq!(config.data_ignore, defaults(DEFAULT_DATA_IGNORE));
        assert_eq!(config.binary_ignore, defaults(DEFAULT_BINARY_IGNORE));
        assert_eq!(config.binary_extensions, defaults(DEFAULT_BINARY_EXTENSIONS));
        assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_profile_detected_from_project_folder() {
        let profiles = parse_profiles(PROFILES).unwrap();
        let config =
            resolve_with_profiles(cli(&["Debug"]), PathBuf::from("/work/Other"), &profiles)
                .unwrap();

        assert_eq!(config.product, "Other");
        assert_eq!(config.platform, "arm64");
        assert_eq!(config.binary_ignore, vec!["Tool.exe"]);
        assert_eq!(config.binary_extensions, vec!["dll", "dylib"]);
        // Unset profile fields fall back to built-in defaults
        assert_eq!(config.data_ignore, defaults(DEFAULT_DATA_IGNORE));
    }

    #[test]
    fn test_cli_overrides_and_extends_profile() {
        let profiles = parse_profiles(PROFILES).unwrap();
        let config = resolve_with_profiles(
            cli(&[
                "OptimizedDebug",
                "--profile",
                "Banshee",
                "--product",
                "Custom",
                "--ignore-data",
                "Raw",
                "Scratch",
            ]),
            PathBuf::from("/work/Other"),
            &profiles,
        )
        .unwrap();

        assert_eq!(config.product, "Custom");
        assert_eq!(config.data_ignore, vec!["Examples", "Raw", "Scratch"]);
    }

    #[test]
    fn test_cli_adds_binary_extensions() {
        let profiles = parse_profiles(PROFILES).unwrap();
        let config = resolve_with_profiles(
            cli(&["Debug", "--binary-extension", "dylib", "lib"]),
            PathBuf::from("/work/Other"),
            &profiles,
        )
        .unwrap();

        assert_eq!(config.binary_extensions, vec!["dll", "dylib", "lib"]);
    }

    #[test]
    fn test_unknown_explicit_profile_is_an_error() {
        let err = resolve_with_profiles(
            cli(&["Debug", "--profile", "Missing"]),
            PathBuf::from("/work/Banshee"),
            &HashMap::new(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_unknown_profile_field_is_rejected() {
        assert!(parse_profiles("[Banshee]\nproduct = \"B\"\nbogus = 1\n").is_err());
    }

    #[test]
    fn test_missing_profiles_file_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let profiles = load_profiles_file(&temp.path().join("profiles.toml")).unwrap();
        assert!(profiles.is_empty());
    }
}
