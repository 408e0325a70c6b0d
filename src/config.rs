use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::traits::FileSystem;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".tfadopt.yaml";

/// Settings for one adoption run
///
/// Every field may come from the YAML config file; command-line values
/// override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdoptConfig {
    /// describe-alarms JSON to read (`-` for stdin)
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Directory the export command writes into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the rendered Terraform configuration
    #[serde(default = "default_tf_file")]
    pub tf_file: String,

    /// File name of the state file
    #[serde(default = "default_tfstate_file")]
    pub tfstate_file: String,

    /// Seed for reproducible resource names
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tf_file() -> String {
    "cloud_watch_alarm.tf".to_string()
}

fn default_tfstate_file() -> String {
    "terraform.tfstate".to_string()
}

impl Default for AdoptConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: default_output_dir(),
            tf_file: default_tf_file(),
            tfstate_file: default_tfstate_file(),
            seed: None,
        }
    }
}

impl AdoptConfig {
    /// Load configuration from a YAML file
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> anyhow::Result<Self> {
        let content = fs.read_to_string(path)?;
        let config: AdoptConfig = serde_yaml::from_str(&content)
            .map_err(crate::adopt::AdoptError::from)?;

        config.validate()?;
        Ok(config)
    }

    /// Load the explicit config file, else the default one if present, else defaults
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(fs, path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if fs.is_file(default_path) {
            tracing::debug!("Using config file {}", DEFAULT_CONFIG_FILE);
            return Self::from_file(fs, default_path);
        }

        Ok(Self::default())
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        input: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        seed: Option<u64>,
    ) -> Self {
        if input.is_some() {
            self.input = input;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    pub fn tf_path(&self) -> PathBuf {
        self.output_dir.join(&self.tf_file)
    }

    pub fn tfstate_path(&self) -> PathBuf {
        self.output_dir.join(&self.tfstate_file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tf_file.trim().is_empty() || self.tfstate_file.trim().is_empty() {
            anyhow::bail!("tf_file and tfstate_file must not be empty");
        }

        if self.tf_file == self.tfstate_file {
            anyhow::bail!(
                "tf_file and tfstate_file must differ, both are '{}'",
                self.tf_file
            );
        }

        Ok(())
    }
}
