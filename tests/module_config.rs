use std::fs;
use std::path::Path;

use rebrand::builder::Builder;
use rebrand::config;
use rebrand::module::RunContext;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "repo_url": "https://example.com/org/project.git",
    "output_root": "/tmp/rebrand-test-output",
    "default_target": "stable",
    "targets": {
        "stable": { "git_ref": "v1.0.0", "tag": true },
        "edge": { "git_ref": "main" }
    },
    "build_steps": [ { "program": "make", "args": ["pb"] }, { "program": "make" } ],
    "modules": [
        { "name": "branding", "kind": "rewrite",
          "ignore": [".git", "vendor"],
          "rules": [ { "search": "acme", "replace": "zenith" },
                     { "search": "Acme", "replace": "Zenith" } ] },
        { "name": "tune", "kind": "patch", "file": "server/config.go",
          "rules": [ { "search": "Level:     3,", "replace": "Level:     1," } ] }
    ]
}"#;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("rebrand.json");
    fs::write(&path, CONFIG).unwrap();
    path
}

fn checkout(dir: &Path) -> std::path::PathBuf {
    let root = dir.join("project");
    fs::create_dir_all(root.join("server")).unwrap();
    fs::create_dir_all(root.join("vendor/acme")).unwrap();
    fs::write(root.join("server/config.go"), "var c = Config{\n\tLevel:     3,\n}\n// acme\n").unwrap();
    fs::write(root.join("server/acme.go"), "package server // Acme\n").unwrap();
    fs::write(root.join("vendor/acme/acme.go"), "package acme\n").unwrap();
    root
}

fn context(root: &Path) -> RunContext {
    RunContext {
        checkout: root.to_path_buf(),
    }
}

#[test]
fn configured_modules_run_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let config = config::load(Some(&write_config(dir.path()))).unwrap();
    let root = checkout(dir.path());

    assert_eq!(config.checkout_dir_name().unwrap(), "project");
    assert!(config.target("stable").unwrap().tag);

    let builder = Builder::from_config(config, false).unwrap();
    assert_eq!(builder.module_names(), vec!["branding", "tune"]);

    let ctx = context(&root);
    let mut reports = Vec::new();
    for module in builder.select(&["all".to_string()]).unwrap() {
        reports.push(module.run(&ctx, false).unwrap());
    }

    assert_eq!(reports[0].name, "branding");
    assert_eq!(reports[0].summary.rules_applied, 2);
    assert_eq!(reports[1].name, "tune");
    assert_eq!(reports[1].summary.files_modified, 1);

    // Branding ran first, so the patch sees a rebranded file.
    assert_eq!(
        fs::read_to_string(root.join("server/config.go")).unwrap(),
        "var c = Config{\n\tLevel:     1,\n}\n// zenith\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("server/zenith.go")).unwrap(),
        "package server // Zenith\n"
    );
    assert_eq!(fs::read_to_string(root.join("vendor/acme/acme.go")).unwrap(), "package acme\n");
}

#[test]
fn unknown_module_is_reported_with_configured_names() {
    let dir = TempDir::new().unwrap();
    let config = config::load(Some(&write_config(dir.path()))).unwrap();
    let builder = Builder::from_config(config, false).unwrap();

    let err = builder
        .run("stable", &["branding".to_string(), "ghost".to_string()])
        .err()
        .unwrap();

    assert_eq!(err.code.as_str(), "module.not_found");
    assert_eq!(err.details["available"][0], "branding");
    assert!(!Path::new("/tmp/rebrand-test-output").join("project").exists());
}

#[test]
fn patch_path_escaping_checkout_is_rejected_at_registration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"modules": [{"name": "evil", "kind": "patch", "file": "../outside.go", "rules": []}]}"#,
    )
    .unwrap();

    let config = config::load(Some(&path)).unwrap();
    let err = Builder::from_config(config, false).err().unwrap();
    assert_eq!(err.code.as_str(), "config.invalid_value");
}

#[test]
fn invalid_module_kind_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"modules": [{"name": "x", "kind": "unknown"}]}"#).unwrap();

    let err = config::load(Some(&path)).unwrap_err();
    assert_eq!(err.code.as_str(), "config.invalid_json");
}
