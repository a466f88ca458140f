use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;
use crate::rewrite::{IgnoreSet, RewriteRule, SuffixPolicy};
use crate::utils::io;

/// Root configuration structure for rebrand.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebrandConfig {
    #[serde(default)]
    pub repo_url: String,

    /// Directory `git clone` creates inside the run directory.
    /// Derived from `repo_url` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_dir: Option<String>,

    #[serde(default = "default_output_root")]
    pub output_root: String,

    #[serde(default = "default_target_name")]
    pub default_target: String,

    #[serde(default = "default_targets")]
    pub targets: BTreeMap<String, BuildTarget>,

    #[serde(default = "default_build_steps")]
    pub build_steps: Vec<BuildStep>,

    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl Default for RebrandConfig {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            checkout_dir: None,
            output_root: default_output_root(),
            default_target: default_target_name(),
            targets: default_targets(),
            build_steps: default_build_steps(),
            modules: Vec::new(),
        }
    }
}

/// A named git ref to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub git_ref: String,
    /// Check out `tags/<git_ref>` after fetching all tags.
    #[serde(default)]
    pub tag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    pub program: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// A module entry as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: ModuleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleKind {
    /// Tree-wide rewrite of the whole checkout.
    Rewrite {
        #[serde(default)]
        ignore: Vec<String>,
        #[serde(default)]
        ignore_policy: SuffixPolicy,
        #[serde(default = "default_true")]
        rename_paths: bool,
        rules: Vec<RewriteRule>,
    },
    /// In-place replacements inside one file of the checkout.
    Patch { file: String, rules: Vec<RewriteRule> },
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Rewrite { .. } => "rewrite",
            ModuleKind::Patch { .. } => "patch",
        }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        match self {
            ModuleKind::Rewrite { rules, .. } | ModuleKind::Patch { rules, .. } => rules,
        }
    }

    /// Ignore set for rewrite modules; patches have none.
    pub fn ignore_set(&self) -> IgnoreSet {
        match self {
            ModuleKind::Rewrite {
                ignore,
                ignore_policy,
                ..
            } => IgnoreSet::new(ignore.iter().cloned()).with_policy(*ignore_policy),
            ModuleKind::Patch { .. } => IgnoreSet::default(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_output_root() -> String {
    "/tmp/output".to_string()
}

fn default_target_name() -> String {
    "main".to_string()
}

fn default_targets() -> BTreeMap<String, BuildTarget> {
    BTreeMap::from([(
        "main".to_string(),
        BuildTarget {
            git_ref: "main".to_string(),
            tag: false,
        },
    )])
}

fn default_build_steps() -> Vec<BuildStep> {
    vec![BuildStep {
        program: "make".to_string(),
        args: Vec::new(),
    }]
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Loading
// =============================================================================

/// Load configuration.
///
/// An explicitly requested file must exist and parse. Without one, the default
/// `~/.config/rebrand/rebrand.json` is used when present and built-in defaults
/// otherwise.
pub fn load(explicit: Option<&Path>) -> Result<RebrandConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::config_invalid_value(
                "config",
                Some(path.display().to_string()),
                "Config file not found",
            ));
        }
        return load_from_file(path);
    }

    let path = paths::rebrand_json()?;
    if !path.exists() {
        return Ok(RebrandConfig::default());
    }

    match load_from_file(&path) {
        Ok(config) => Ok(config),
        Err(err) => {
            crate::log_status!("config", "Ignoring {}: {}", path.display(), err.message);
            Ok(RebrandConfig::default())
        }
    }
}

/// Parse and validate one config file.
pub fn load_from_file(path: &Path) -> Result<RebrandConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;
    let config: RebrandConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;
    config.validate()?;
    Ok(config)
}

/// Path of the default config file.
pub fn config_path() -> Result<PathBuf> {
    paths::rebrand_json()
}

impl RebrandConfig {
    /// Reject configurations that cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        if !self.targets.contains_key(&self.default_target) {
            return Err(Error::config_invalid_value(
                "default_target",
                Some(self.default_target.clone()),
                "default_target must name an entry in targets",
            ));
        }

        for name in self.targets.keys() {
            let unsafe_name = name.trim().is_empty()
                || name.contains(|c: char| c == '/' || c == '\\')
                || name == "."
                || name == "..";
            if unsafe_name {
                return Err(Error::config_invalid_value(
                    "targets",
                    Some(name.clone()),
                    "Target names cannot be empty or contain path separators",
                ));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(Error::config_invalid_value("modules.name", None, "Module name cannot be empty"));
            }
            if module.name == "all" {
                return Err(Error::config_invalid_value(
                    "modules.name",
                    Some(module.name.clone()),
                    "'all' is reserved for selecting every module",
                ));
            }
            if !seen.insert(module.name.as_str()) {
                return Err(Error::config_invalid_value(
                    "modules.name",
                    Some(module.name.clone()),
                    "Module names must be unique",
                ));
            }
        }

        if self.build_steps.iter().any(|s| s.program.trim().is_empty()) {
            return Err(Error::config_invalid_value(
                "build_steps.program",
                None,
                "Build step program cannot be empty",
            ));
        }

        Ok(())
    }

    /// Look up a target by name.
    pub fn target(&self, name: &str) -> Result<&BuildTarget> {
        self.targets
            .get(name)
            .ok_or_else(|| Error::target_not_found(name, self.targets.keys().cloned().collect()))
    }

    /// Output root with `~` and environment variables expanded.
    pub fn output_root_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.output_root).map_err(|e| {
            Error::config_invalid_value("output_root", Some(self.output_root.clone()), e.to_string())
        })?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// Name of the directory the clone lands in.
    pub fn checkout_dir_name(&self) -> Result<String> {
        if let Some(dir) = self.checkout_dir.as_deref().filter(|d| !d.trim().is_empty()) {
            return Ok(dir.to_string());
        }

        let trimmed = self.repo_url.trim().trim_end_matches('/');
        let last = trimmed.rsplit(['/', ':']).next().unwrap_or_default();
        let name = last.strip_suffix(".git").unwrap_or(last);

        if name.is_empty() {
            return Err(Error::config_invalid_value(
                "repo_url",
                Some(self.repo_url.clone()),
                "Cannot derive a checkout directory; set repo_url or checkout_dir",
            ));
        }
        Ok(name.to_string())
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }
}
