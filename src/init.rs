//! Project initialization.
//!
//! Creates `.rulebased/config.json` with a single `default` source and,
//! for local sources, the rules directory plus a seed `example.md` when
//! that directory is empty. An existing configuration is never touched.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::config::{ProjectConfig, Source, SourceKind, DEFAULT_BRANCH};
use crate::error::{Result, RuleError};
use crate::resolver::resolve_path;
use crate::workspace::Workspace;

/// Default rules directory, relative to the project root.
pub const DEFAULT_RULES_PATH: &str = "./rule-sets";
/// Seed document name.
pub const EXAMPLE_RULE_FILE: &str = "example.md";
/// Seed document content.
pub const EXAMPLE_RULE: &str = "# Example Rules

## Getting Started
This is an example rule file. Add your project-specific rules here.

## Best Practices
- Keep rules clear and actionable
- Use markdown formatting for readability
- Organize rules by category
";

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub kind: SourceKind,
    pub path: String,
    pub repository: Option<String>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            kind: SourceKind::Local,
            path: DEFAULT_RULES_PATH.to_string(),
            repository: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub rules_path: PathBuf,
    /// Path of the seed document, when one was written.
    pub example_rule: Option<PathBuf>,
}

impl fmt::Display for InitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project initialized successfully!")?;
        writeln!(f, "- Configuration: {}", self.config_path.display())?;
        writeln!(f, "- Type: {}", self.kind)?;
        write!(f, "- Rules path: {}", self.rules_path.display())?;
        if let Some(ref example) = self.example_rule {
            write!(f, "\n- Example rule: {}", example.display())?;
        }
        Ok(())
    }
}

fn default_source(opts: &InitOptions) -> Source {
    let description = match opts.kind {
        SourceKind::Git => "Git-based rule sets for this project",
        SourceKind::Local => "Local rule sets for this project",
    };
    let (repository, branch) = match opts.kind {
        SourceKind::Git => (opts.repository.clone(), Some(DEFAULT_BRANCH.to_string())),
        SourceKind::Local => (None, None),
    };

    Source {
        name: "default".to_string(),
        kind: opts.kind,
        path: opts.path.clone(),
        description: description.to_string(),
        repository,
        branch,
    }
}

/// Initialize the project in `workspace`.
///
/// Fails with [`RuleError::AlreadyInitialized`] when a configuration
/// already exists and with [`RuleError::MissingRepository`] for a git
/// source without a repository URL; in both cases nothing is written.
pub fn init_project(workspace: &Workspace, opts: &InitOptions) -> Result<InitOutcome> {
    let store = workspace.config_store();
    if store.exists() {
        return Err(RuleError::AlreadyInitialized {
            path: store.path().to_path_buf(),
        });
    }

    let has_repository = opts
        .repository
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if opts.kind == SourceKind::Git && !has_repository {
        return Err(RuleError::MissingRepository);
    }

    // The rules directory comes first so a failure leaves no configuration.
    let rules_path = resolve_path(workspace.root(), &opts.path);
    let example_rule = match opts.kind {
        SourceKind::Local => seed_rules_dir(&rules_path)?,
        SourceKind::Git => None,
    };

    let config = ProjectConfig::with_source(default_source(opts));
    store.save(&config)?;
    tracing::info!("configuration written to {}", store.path().display());

    Ok(InitOutcome {
        config_path: store.path().to_path_buf(),
        kind: opts.kind,
        rules_path,
        example_rule,
    })
}

/// Create `dir` if needed and write the seed document if it is empty.
fn seed_rules_dir(dir: &std::path::Path) -> Result<Option<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| RuleError::io(dir, e))?;

    let mut entries = std::fs::read_dir(dir).map_err(|e| RuleError::io(dir, e))?;
    if entries.next().is_some() {
        tracing::debug!("{} is not empty; no example rule written", dir.display());
        return Ok(None);
    }

    let example = dir.join(EXAMPLE_RULE_FILE);
    std::fs::write(&example, EXAMPLE_RULE).map_err(|e| RuleError::io(&example, e))?;
    tracing::info!("created example rule file: {}", example.display());
    Ok(Some(example))
}
