//! Locator configuration: catalog directories and policy rule tables.
//!
//! Settings are plain serde types so a host can bind them from any config
//! source. [`LocatorSettings::from_figment`] extracts the `discovery`
//! section the way hosts typically layer yaml + env providers.
//!
//! Directory paths resolve against explicitly supplied [`BasePaths`]
//! rather than ambient process state, so the same directory list stays
//! portable across differently-rooted deployments and tests can pin the
//! bases by hand.

use crate::policy::{LifetimeRule, NameRule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which base a relative catalog directory resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryBase {
    /// The process's current working directory.
    #[default]
    Current,
    /// The directory containing the running executable.
    Module,
    /// The host application's base directory.
    Host,
}

/// One catalog source: a directory plus a file search pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    pub base: DirectoryBase,
    pub path: PathBuf,
    /// Glob matched against file names inside the directory.
    pub pattern: String,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base: DirectoryBase::Current,
            path: PathBuf::from("."),
            pattern: "*.part.yaml".to_owned(),
        }
    }
}

impl DirectorySettings {
    /// Resolves the effective directory path.
    ///
    /// Absolute paths pass through untouched regardless of `base`;
    /// relative paths join against the selected base.
    #[must_use]
    pub fn full_path(&self, paths: &BasePaths) -> PathBuf {
        if self.path.is_absolute() {
            return self.path.clone();
        }
        let base = match self.base {
            DirectoryBase::Current => &paths.current,
            DirectoryBase::Module => &paths.module,
            DirectoryBase::Host => &paths.host,
        };
        base.join(&self.path)
    }
}

/// Resolution bases for relative catalog directories.
///
/// Constructed once by the host and passed in; nothing here is read from
/// global state after construction.
#[derive(Debug, Clone)]
pub struct BasePaths {
    pub current: PathBuf,
    pub module: PathBuf,
    pub host: PathBuf,
}

impl BasePaths {
    /// Probes the running process for its bases. The host base defaults to
    /// the executable's directory; hosts with a distinct application root
    /// should override the `host` field.
    ///
    /// # Errors
    /// Returns an error when the working directory or executable path
    /// cannot be determined.
    pub fn detect() -> std::io::Result<Self> {
        let current = std::env::current_dir()?;
        let exe = std::env::current_exe()?;
        let module = exe
            .parent()
            .map_or_else(|| current.clone(), Path::to_path_buf);
        Ok(Self {
            host: module.clone(),
            current,
            module,
        })
    }
}

/// Full locator configuration: directories plus the two ordered policy
/// rule tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorSettings {
    pub directories: Vec<DirectorySettings>,
    /// Ordered name overrides, matched against contract identities.
    pub contracts: Vec<NameRule>,
    /// Ordered lifetime overrides, matched against contract identities.
    pub lifetimes: Vec<LifetimeRule>,
}

impl LocatorSettings {
    /// Extracts the `discovery` section from a layered figment.
    ///
    /// # Errors
    /// Returns the figment error when the section is present but does not
    /// deserialize.
    pub fn from_figment(figment: &figment::Figment) -> Result<Self, figment::Error> {
        if figment.find_value("discovery").is_err() {
            return Ok(Self::default());
        }
        figment.extract_inner("discovery")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::Figment;
    use figment::providers::{Format, Yaml};

    fn bases() -> BasePaths {
        BasePaths {
            current: PathBuf::from("/work/cwd"),
            module: PathBuf::from("/opt/app/bin"),
            host: PathBuf::from("/opt/app"),
        }
    }

    #[test]
    fn relative_path_joins_current_dir_by_default() {
        let dir = DirectorySettings::default();
        assert_eq!(dir.full_path(&bases()), PathBuf::from("/work/cwd/."));
    }

    #[test]
    fn relative_path_joins_selected_base() {
        let module_dir = DirectorySettings {
            base: DirectoryBase::Module,
            path: PathBuf::from("plugins"),
            ..DirectorySettings::default()
        };
        let host_dir = DirectorySettings {
            base: DirectoryBase::Host,
            path: PathBuf::from("plugins"),
            ..DirectorySettings::default()
        };

        assert_eq!(
            module_dir.full_path(&bases()),
            PathBuf::from("/opt/app/bin/plugins")
        );
        assert_eq!(
            host_dir.full_path(&bases()),
            PathBuf::from("/opt/app/plugins")
        );
    }

    #[test]
    fn absolute_path_ignores_base_type() {
        for base in [
            DirectoryBase::Current,
            DirectoryBase::Module,
            DirectoryBase::Host,
        ] {
            let dir = DirectorySettings {
                base,
                path: PathBuf::from("/srv/exports"),
                ..DirectorySettings::default()
            };
            assert_eq!(dir.full_path(&bases()), PathBuf::from("/srv/exports"));
        }
    }

    #[test]
    fn settings_bind_from_figment_yaml() {
        let yaml = r#"
discovery:
  directories:
    - path: plugins
      base: host
      pattern: "*.part.yaml"
  contracts:
    - pattern: "MyContract"
      name: first
  lifetimes:
    - pattern: "worker"
      lifetime: transient
"#;
        let figment = Figment::new().merge(Yaml::string(yaml));
        let settings = LocatorSettings::from_figment(&figment).unwrap();

        assert_eq!(settings.directories.len(), 1);
        assert_eq!(settings.directories[0].base, DirectoryBase::Host);
        assert_eq!(settings.contracts[0].name, "first");
        assert_eq!(settings.lifetimes.len(), 1);
    }

    #[test]
    fn missing_section_yields_defaults() {
        let settings = LocatorSettings::from_figment(&Figment::new()).unwrap();
        assert!(settings.directories.is_empty());
        assert!(settings.contracts.is_empty());
        assert!(settings.lifetimes.is_empty());
    }
}
