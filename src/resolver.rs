//! Source resolution: configured [`Source`] → [`RuleDocument`]s.
//!
//! Relative source paths are resolved against the working directory the
//! command runs in, not the directory holding the configuration file.
//! Only the direct children of a source directory are considered, and
//! only those whose name ends with the literal, case-sensitive `.md`.
//!
//! Git sources are scanned through their `path` exactly like local ones;
//! no checkout is ever performed.

use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{ProjectConfig, Source};
use crate::error::SourceError;
use crate::models::RuleDocument;

/// Rule file suffix.
pub const RULE_EXTENSION: &str = ".md";

/// Outcome of resolving every source of a project, in configuration order.
#[derive(Debug, Default)]
pub struct Resolution {
    pub documents: Vec<RuleDocument>,
    pub errors: Vec<SourceError>,
}

pub fn is_rule_file(file_name: &str) -> bool {
    file_name.ends_with(RULE_EXTENSION)
}

/// Make `path` absolute against `base_dir` and normalize `.`/`..` lexically.
pub fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let joined = base_dir.join(path);
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Enumerate and read the rule documents of one source.
///
/// A missing path, an unreadable directory, or an unreadable file all
/// yield [`SourceError::PathNotFound`] for the whole source. Content that
/// is not valid UTF-8 is decoded lossily. Documents are sorted by file
/// name.
pub fn resolve_source(source: &Source, base_dir: &Path) -> Result<Vec<RuleDocument>, SourceError> {
    let root = resolve_path(base_dir, &source.path);
    let unavailable = || SourceError::PathNotFound {
        source_name: source.name.clone(),
        path: root.clone(),
    };

    if !root.is_dir() {
        return Err(unavailable());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            tracing::debug!(source = %source.name, "enumeration failed: {}", e);
            unavailable()
        })?;
        if entry.path().is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_rule_file(&file_name) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let bytes = std::fs::read(&path).map_err(|e| {
            tracing::debug!(source = %source.name, file = %path.display(), "read failed: {}", e);
            unavailable()
        })?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        documents.push(RuleDocument {
            source_name: source.name.clone(),
            file_name,
            absolute_path: path,
            content,
        });
    }

    documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(documents)
}

/// Resolve every configured source, one at a time, in configuration order.
///
/// Unavailable sources are collected in [`Resolution::errors`] and do not
/// stop the remaining sources from being resolved.
pub fn resolve_all(config: &ProjectConfig, base_dir: &Path) -> Resolution {
    let mut resolution = Resolution::default();
    for source in &config.sources {
        match resolve_source(source, base_dir) {
            Ok(docs) => {
                tracing::debug!(source = %source.name, count = docs.len(), "resolved source");
                resolution.documents.extend(docs);
            }
            Err(e) => {
                tracing::debug!("{}", e);
                resolution.errors.push(e);
            }
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use tempfile::TempDir;

    fn local(name: &str, path: &str) -> Source {
        Source {
            name: name.to_string(),
            kind: SourceKind::Local,
            path: path.to_string(),
            description: String::new(),
            repository: None,
            branch: None,
        }
    }

    #[test]
    fn keeps_only_direct_markdown_children() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules");
        std::fs::create_dir_all(rules.join("nested")).unwrap();
        std::fs::write(rules.join("b.md"), "bravo").unwrap();
        std::fs::write(rules.join("a.md"), "alpha").unwrap();
        std::fs::write(rules.join("notes.txt"), "text").unwrap();
        std::fs::write(rules.join("UPPER.MD"), "upper").unwrap();
        std::fs::write(rules.join("nested").join("deep.md"), "deep").unwrap();

        let docs = resolve_source(&local("default", "rules"), tmp.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
        assert_eq!(docs[0].content, "alpha");
        assert_eq!(docs[0].source_name, "default");
        assert_eq!(docs[0].absolute_path, rules.join("a.md"));
    }

    #[test]
    fn directory_named_like_markdown_is_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("rules").join("folder.md")).unwrap();

        let docs = resolve_source(&local("default", "rules"), tmp.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn invalid_utf8_file_is_read_lossily() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        std::fs::write(rules.join("style.md"), "Use 2-space indentation").unwrap();
        std::fs::write(rules.join("legacy.md"), b"caf\xe9 rules").unwrap();

        let docs = resolve_source(&local("default", "rules"), tmp.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["legacy.md", "style.md"]);
        assert_eq!(docs[0].content, "caf\u{FFFD} rules");
        assert_eq!(docs[1].content, "Use 2-space indentation");
    }

    #[test]
    fn missing_path_is_source_error() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_source(&local("gone", "./missing"), tmp.path()).unwrap_err();
        assert_eq!(
            err,
            SourceError::PathNotFound {
                source_name: "gone".to_string(),
                path: tmp.path().join("missing"),
            }
        );
    }

    #[test]
    fn resolve_all_continues_past_unavailable_sources() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("one")).unwrap();
        std::fs::write(tmp.path().join("one").join("x.md"), "x").unwrap();

        let mut config = crate::config::ProjectConfig::with_source(local("missing", "nope"));
        config.sources.push(local("one", "./one"));

        let resolution = resolve_all(&config, tmp.path());
        assert_eq!(resolution.documents.len(), 1);
        assert_eq!(resolution.documents[0].source_name, "one");
        assert_eq!(resolution.errors.len(), 1);
        assert_eq!(resolution.errors[0].source_name(), "missing");
    }

    #[test]
    fn resolve_path_normalizes() {
        let base = Path::new("/work/project");
        assert_eq!(
            resolve_path(base, "./rule-sets"),
            PathBuf::from("/work/project/rule-sets")
        );
        assert_eq!(
            resolve_path(base, "../shared/rules"),
            PathBuf::from("/work/shared/rules")
        );
        assert_eq!(resolve_path(base, "/abs/rules"), PathBuf::from("/abs/rules"));
    }
}
