//! End-to-end tests through the library API.
//!
//! Each test gets its own project root, so nothing depends on the
//! process working directory.

use rulebased::config::{OutputFormat, ProjectConfig, Source, SourceKind};
use rulebased::format::{render, NO_MATCHES};
use rulebased::init::{init_project, InitOptions, EXAMPLE_RULE};
use rulebased::resolver::resolve_all;
use rulebased::search::{search, search_rules};
use rulebased::sync::sync_sources;
use rulebased::traits::{ToolContext, ToolRegistry};
use rulebased::{RuleError, Workspace};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn local_source(name: &str, path: &str) -> Source {
    Source {
        name: name.to_string(),
        kind: SourceKind::Local,
        path: path.to_string(),
        description: format!("{} rules", name),
        repository: None,
        branch: None,
    }
}

fn local_init(path: &str) -> InitOptions {
    InitOptions {
        kind: SourceKind::Local,
        path: path.to_string(),
        repository: None,
    }
}

#[test]
fn style_rule_is_found_by_keyword() {
    let tmp = TempDir::new().unwrap();
    let ws = Workspace::new(tmp.path());
    init_project(&ws, &local_init("./rules")).unwrap();
    fs::write(tmp.path().join("rules/style.md"), "Use 2-space indentation").unwrap();

    let outcome = search_rules(&ws, "indentation").unwrap();
    assert_eq!(outcome.default_format, OutputFormat::Markdown);
    let text = render(&outcome.matches, OutputFormat::Markdown).unwrap();
    assert!(text.contains("## style.md (default)"));
    assert!(text.contains("Use 2-space indentation"));

    let none = search_rules(&ws, "nonexistent-term").unwrap();
    assert!(none.matches.is_empty());
    assert_eq!(render(&none.matches, OutputFormat::Markdown).unwrap(), NO_MATCHES);
}

#[test]
fn non_markdown_sources_never_match() {
    let tmp = TempDir::new().unwrap();
    let rules = tmp.path().join("rules");
    fs::create_dir_all(&rules).unwrap();
    fs::write(rules.join("a.txt"), "indentation").unwrap();
    fs::write(rules.join("b.markdown"), "indentation").unwrap();
    fs::write(rules.join("c.MD"), "indentation").unwrap();

    let config = ProjectConfig::with_source(local_source("default", "rules"));
    for keywords in ["", "indentation", "x"] {
        let docs = resolve_all(&config, tmp.path()).documents;
        assert!(search(docs, keywords).is_empty(), "keywords {:?}", keywords);
    }
}

#[test]
fn documents_keep_source_order() {
    let tmp = TempDir::new().unwrap();
    for (dir, file) in [("second", "b.md"), ("first", "a.md")] {
        fs::create_dir_all(tmp.path().join(dir)).unwrap();
        fs::write(tmp.path().join(dir).join(file), "shared phrase").unwrap();
    }

    let mut config = ProjectConfig::with_source(local_source("second", "./second"));
    config.sources.push(local_source("missing", "./nowhere"));
    config.sources.push(local_source("first", "./first"));
    let ws = Workspace::new(tmp.path());
    ws.config_store().save(&config).unwrap();

    let outcome = search_rules(&ws, "").unwrap();
    let sources: Vec<&str> = outcome
        .matches
        .iter()
        .map(|d| d.source_name.as_str())
        .collect();
    assert_eq!(sources, vec!["second", "first"]);
    assert_eq!(outcome.unavailable.len(), 1);
    assert_eq!(outcome.unavailable[0].source_name(), "missing");
}

#[test]
fn seed_written_once_then_never_again() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("a");
    let second = tmp.path().join("b");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();

    init_project(&Workspace::new(&first), &local_init("./empty-dir")).unwrap();
    let empty_dir = first.join("empty-dir");
    assert_eq!(fs::read_dir(&empty_dir).unwrap().count(), 1);
    assert_eq!(
        fs::read_to_string(empty_dir.join("example.md")).unwrap(),
        EXAMPLE_RULE
    );

    // A fresh project pointing at the now non-empty directory.
    init_project(&Workspace::new(&second), &local_init("../a/empty-dir")).unwrap();
    assert_eq!(fs::read_dir(&empty_dir).unwrap().count(), 1);
}

#[test]
fn git_project_sync_reports_repository() {
    let tmp = TempDir::new().unwrap();
    let ws = Workspace::new(tmp.path());
    let opts = InitOptions {
        kind: SourceKind::Git,
        path: "./rule-sets".to_string(),
        repository: Some("https://example/repo.git".to_string()),
    };
    init_project(&ws, &opts).unwrap();

    let report = sync_sources(&ws, false).unwrap();
    assert!(report
        .to_string()
        .contains("Would sync default from https://example/repo.git"));
    assert!(!tmp.path().join("rule-sets").exists());
}

#[test]
fn sync_before_init_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = sync_sources(&Workspace::new(tmp.path()), false).unwrap_err();
    assert!(matches!(err, RuleError::ConfigNotFound { .. }));
}

#[test]
fn config_edits_are_seen_by_next_call() {
    let tmp = TempDir::new().unwrap();
    let ws = Workspace::new(tmp.path());
    init_project(&ws, &local_init("./rules")).unwrap();
    fs::create_dir_all(tmp.path().join("extra")).unwrap();
    fs::write(tmp.path().join("extra/deploy.md"), "Deploy on Fridays? Never.").unwrap();

    assert!(search_rules(&ws, "fridays")
        .unwrap()
        .matches
        .is_empty());

    let store = ws.config_store();
    let mut config = store.load().unwrap();
    config.sources.push(local_source("extra", "extra"));
    store.save(&config).unwrap();

    let outcome = search_rules(&ws, "fridays").unwrap();
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].source_name, "extra");
}

#[tokio::test]
async fn registry_tools_share_one_workspace() {
    let tmp = TempDir::new().unwrap();
    let ctx = ToolContext::new(Arc::new(Workspace::new(tmp.path())));
    let registry = ToolRegistry::with_builtins();

    let init = registry.find("initProject").unwrap();
    init.execute(json!({ "type": "local", "path": "rules" }), &ctx)
        .await
        .unwrap();

    let store = ctx.workspace().config_store();
    let mut config = store.load().unwrap();
    config.settings.default_format = OutputFormat::Json;
    store.save(&config).unwrap();

    let get = registry.find("getRules").unwrap();
    let out = get
        .execute(json!({ "keywords": "getting started" }), &ctx)
        .await
        .unwrap();
    let records: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(records[0]["file"], "example.md");

    let markdown = get
        .execute(json!({ "keywords": "getting started", "format": "markdown" }), &ctx)
        .await
        .unwrap();
    assert!(markdown.starts_with("# Found 1 rule(s)"));
}

#[test]
fn undecodable_file_does_not_hide_its_source() {
    let tmp = TempDir::new().unwrap();
    let ws = Workspace::new(tmp.path());
    init_project(&ws, &local_init("./rules")).unwrap();
    fs::write(tmp.path().join("rules/style.md"), "Use 2-space indentation").unwrap();
    fs::write(tmp.path().join("rules/legacy.md"), b"caf\xe9 rules").unwrap();

    let outcome = search_rules(&ws, "indentation").unwrap();
    assert!(outcome.unavailable.is_empty());
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].file_name, "style.md");
}
