//! Run orchestration: clone, run modules, build.

use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::build::{self, BuildOutput};
use crate::config::RebrandConfig;
use crate::error::{Error, Result};
use crate::git;
use crate::module::{self, Module, ModuleReport, RunContext};
use crate::utils::io;

/// Module selector that expands to every registered module.
pub const ALL_MODULES: &str = "all";

#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub target: String,
    pub git_ref: String,
    pub run_dir: String,
    pub checkout: String,
    pub modules: Vec<ModuleReport>,
    pub build: BuildOutput,
}

/// Holds the module registry for one run.
///
/// Modules keep registration order; `all` runs them in that order.
pub struct Builder {
    config: RebrandConfig,
    modules: Vec<Box<dyn Module>>,
    verbose: bool,
}

impl Builder {
    pub fn new(config: RebrandConfig, verbose: bool) -> Self {
        Self {
            config,
            modules: Vec::new(),
            verbose,
        }
    }

    /// Builder with every module declared in `config` registered.
    pub fn from_config(config: RebrandConfig, verbose: bool) -> Result<Self> {
        let mut builder = Self::new(config, verbose);
        let declared = builder.config.modules.clone();
        for entry in &declared {
            builder.register(module::from_config(entry)?);
        }
        Ok(builder)
    }

    /// Register a module. A module with the same name is replaced in place.
    pub fn register(&mut self, module: Box<dyn Module>) {
        match self.modules.iter().position(|m| m.name() == module.name()) {
            Some(index) => self.modules[index] = module,
            None => self.modules.push(module),
        }
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name().to_string()).collect()
    }

    /// Resolve requested names to registered modules, in request order.
    ///
    /// `all` anywhere in the list selects every module in registration order.
    /// Any unknown name fails the whole selection.
    pub fn select(&self, names: &[String]) -> Result<Vec<&dyn Module>> {
        if names.iter().any(|n| n == ALL_MODULES) {
            return Ok(self.modules.iter().map(|m| m.as_ref()).collect());
        }

        names
            .iter()
            .map(|name| {
                self.modules
                    .iter()
                    .find(|m| m.name() == name)
                    .map(|m| m.as_ref())
                    .ok_or_else(|| Error::module_not_found(name.clone(), self.module_names()))
            })
            .collect()
    }

    /// Full run: create the run directory, clone, check out, run the selected
    /// modules, then the build steps. Stops at the first failure.
    pub fn run(&self, target_name: &str, module_names: &[String]) -> Result<BuildReport> {
        self.config.validate()?;
        let target = self.config.target(target_name)?.clone();
        let selected = self.select(module_names)?;
        let checkout_dir = self.config.checkout_dir_name()?;

        let run_dir = create_run_dir(&self.config.output_root_path()?, target_name)?;
        crate::log_status!("build", "Target version: {} ({})", target_name, target.git_ref);
        crate::log_status!("build", "Run directory: {}", run_dir.display());

        crate::log_status!("build", "Cloning {}...", self.config.repo_url);
        let checkout = git::clone_repo(&self.config.repo_url, &run_dir, &checkout_dir, self.verbose)?;
        git::checkout_target(&checkout, &target, self.verbose)?;

        let ctx = RunContext {
            checkout: checkout.clone(),
        };

        let mut reports = Vec::with_capacity(selected.len());
        for module in selected {
            crate::log_status!("build", "Running module: {}", module.name());
            let report = module
                .run(&ctx, self.verbose)
                .map_err(|e| e.with_message_prefix(format!("Module {} failed", module.name())))?;
            reports.push(report);
        }

        crate::log_status!("build", "Compiling...");
        let build = build::run_steps(&checkout, &self.config.build_steps, self.verbose)?;

        Ok(BuildReport {
            target: target_name.to_string(),
            git_ref: target.git_ref,
            run_dir: run_dir.display().to_string(),
            checkout: checkout.display().to_string(),
            modules: reports,
            build,
        })
    }
}

/// Name of a fresh run directory: `run_<target>_<YYYYmmdd_HHMMSS>`.
pub fn run_dir_name(target_name: &str) -> String {
    format!("run_{}_{}", target_name, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Create a fresh run directory under `output_root`.
///
/// A second run in the same second gets a numeric suffix instead of reusing
/// the first run's directory.
pub fn create_run_dir(output_root: &Path, target_name: &str) -> Result<PathBuf> {
    io::ensure_dir(output_root, "create output root")?;
    let base = run_dir_name(target_name);

    let mut attempt = 1;
    loop {
        let name = if attempt == 1 {
            base.clone()
        } else {
            format!("{}_{}", base, attempt)
        };
        let run_dir = output_root.join(name);
        match fs::create_dir(&run_dir) {
            Ok(()) => return Ok(run_dir),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(Error::internal_io(
                    format!("{}: {}", run_dir.display(), e),
                    Some("create run directory".to_string()),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleReport;
    use crate::rewrite::RewriteSummary;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Module for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> &'static str {
            "test"
        }

        fn run(&self, _ctx: &RunContext, _verbose: bool) -> Result<ModuleReport> {
            self.log.borrow_mut().push(self.name.clone());
            Ok(ModuleReport {
                name: self.name.clone(),
                kind: "test",
                summary: RewriteSummary::default(),
            })
        }
    }

    fn builder_with(names: &[&str]) -> (Builder, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut builder = Builder::new(RebrandConfig::default(), false);
        for name in names {
            builder.register(Box::new(Recording {
                name: name.to_string(),
                log: Rc::clone(&log),
            }));
        }
        (builder, log)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_selects_every_module_in_registration_order() {
        let (builder, _) = builder_with(&["zeta", "alpha", "mid"]);
        let selected = builder.select(&names(&["all"])).unwrap();
        let order: Vec<&str> = selected.iter().map(|m| m.name()).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn explicit_selection_keeps_request_order() {
        let (builder, _) = builder_with(&["a", "b", "c"]);
        let selected = builder.select(&names(&["c", "a"])).unwrap();
        let order: Vec<&str> = selected.iter().map(|m| m.name()).collect();
        assert_eq!(order, vec!["c", "a"]);
        assert!(builder.select(&[]).unwrap().is_empty());
    }

    #[test]
    fn unknown_module_fails_before_any_module_runs() {
        let (builder, log) = builder_with(&["a", "b"]);
        let err = builder.run("main", &names(&["a", "missing"])).unwrap_err();

        assert_eq!(err.code.as_str(), "module.not_found");
        assert_eq!(err.details["id"], "missing");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unknown_target_fails_first() {
        let (builder, _) = builder_with(&["a"]);
        let err = builder.run("nightly", &names(&["a"])).unwrap_err();
        assert_eq!(err.code.as_str(), "target.not_found");
    }

    #[test]
    fn register_replaces_same_name_in_place() {
        let (mut builder, log) = builder_with(&["a", "b"]);
        builder.register(Box::new(Recording {
            name: "a".to_string(),
            log,
        }));
        assert_eq!(builder.module_names(), vec!["a", "b"]);
    }

    #[test]
    fn run_dir_name_has_target_and_timestamp() {
        let name = run_dir_name("stable");
        assert!(name.starts_with("run_stable_"));
        let stamp = name.trim_start_matches("run_stable_");
        assert_eq!(stamp.len(), "20240101_120000".len());
        assert_eq!(stamp.as_bytes()[8], b'_');
    }

    #[test]
    fn create_run_dir_makes_missing_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().join("output");
        let run_dir = create_run_dir(&root, "main").unwrap();
        assert!(run_dir.is_dir());
        assert!(run_dir.starts_with(&root));
    }

    #[test]
    fn back_to_back_runs_get_distinct_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = create_run_dir(dir.path(), "main").unwrap();
        let second = create_run_dir(dir.path(), "main").unwrap();
        let third = create_run_dir(dir.path(), "main").unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(first.is_dir() && second.is_dir() && third.is_dir());
    }

    #[test]
    fn target_with_path_separator_is_rejected_before_run_dir() {
        let output = tempfile::TempDir::new().unwrap();
        let mut config = RebrandConfig {
            output_root: output.path().display().to_string(),
            ..RebrandConfig::default()
        };
        config.targets.insert(
            "../escape".to_string(),
            crate::config::BuildTarget {
                git_ref: "main".to_string(),
                tag: false,
            },
        );

        let builder = Builder::new(config, false);
        let err = builder.run("../escape", &[]).unwrap_err();

        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
