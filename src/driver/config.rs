use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A package config file. Namely Cerberus.toml
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub package: Package,
    #[serde(default)]
    pub profile: HashMap<String, Profile>,
}

/// Meta information about the package.
#[derive(Debug, Serialize, Deserialize)]
pub struct Package {
    /// The name of the package.
    pub name: String,
    /// The SEMVER compatible version of the package.
    pub version: String,
    /// The source file to check, relative to the manifest.
    #[serde(default = "default_entry")]
    pub entry: PathBuf,
    /// Where emitted IR goes, relative to the manifest.
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
}

/// Defines a check profile.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Whether to print the lowered IR.
    #[serde(default)]
    pub emit_ir: bool,
    /// Whether to print the parsed AST.
    #[serde(default)]
    pub emit_ast: bool,
}

fn default_entry() -> PathBuf {
    PathBuf::from("src/main.cer")
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("build_artifacts")
}

impl Config {
    pub const FILE_NAME: &'static str = "Cerberus.toml";

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid manifest {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Returns the named profile, the profile called "dev" when no name is given,
    /// or the default profile when the manifest doesn't define it.
    pub fn get_profile(&self, name: Option<&str>) -> anyhow::Result<Profile> {
        match name {
            Some(name) => self
                .profile
                .get(name)
                .cloned()
                .with_context(|| format!("profile {name:?} not found in manifest")),
            None => Ok(self.profile.get("dev").cloned().unwrap_or_default()),
        }
    }
}
