//! Installed-version lookup.
//!
//! For a dependency `name`, reads `<modules_path>/<name>/package.json` and
//! takes its `version`. Absence is an ordinary outcome: the caller falls back
//! to the declared range, so nothing here returns an error.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::manifest::MANIFEST_FILE;

/// Default module install prefix.
pub const DEFAULT_MODULES_PATH: &str = "./node_modules/";

/// Why an installed version could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsenceReason {
    /// File missing or unreadable.
    Unreadable(String),
    /// File is not valid JSON.
    Malformed(String),
    /// No usable `version` field (missing, empty, or not a string).
    MissingVersion,
    /// Name would resolve outside the modules prefix.
    InvalidName,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsenceReason::Unreadable(e) => write!(f, "unreadable: {e}"),
            AbsenceReason::Malformed(e) => write!(f, "malformed: {e}"),
            AbsenceReason::MissingVersion => f.write_str("no version field"),
            AbsenceReason::InvalidName => f.write_str("name escapes the modules path"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Installed(String),
    Absent(AbsenceReason),
}

impl Resolution {
    /// Installed version, or `declared` when absent.
    pub fn or_declared(self, declared: &str) -> String {
        match self {
            Resolution::Installed(v) => v,
            Resolution::Absent(_) => declared.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VersionResolver {
    modules_path: PathBuf,
    report_missing: bool,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MODULES_PATH, false)
    }
}

impl VersionResolver {
    pub fn new(modules_path: impl Into<PathBuf>, report_missing: bool) -> Self {
        Self {
            modules_path: modules_path.into(),
            report_missing,
        }
    }

    pub fn modules_path(&self) -> &Path {
        &self.modules_path
    }

    /// `<modules_path>/<name>/package.json`. Scoped names nest one level deeper.
    pub fn probe_path(&self, name: &str) -> PathBuf {
        self.modules_path.join(name).join(MANIFEST_FILE)
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        let res = self.probe(name);
        if let Resolution::Absent(reason) = &res {
            if self.report_missing {
                tracing::warn!(package = %name, reason = %reason, "cannot locate installed package info");
            }
        }
        res
    }

    fn probe(&self, name: &str) -> Resolution {
        if !is_contained(name) {
            return Resolution::Absent(AbsenceReason::InvalidName);
        }
        let path = self.probe_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Resolution::Absent(AbsenceReason::Unreadable(format!("{}: {e}", path.display()))),
        };
        let doc: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => return Resolution::Absent(AbsenceReason::Malformed(e.to_string())),
        };
        match doc.get("version").and_then(|v| v.as_str()) {
            Some(v) if !v.is_empty() => Resolution::Installed(v.to_string()),
            _ => Resolution::Absent(AbsenceReason::MissingVersion),
        }
    }
}

/// Only plain components: no root, drive prefix, `.` or `..`.
fn is_contained(name: &str) -> bool {
    let mut components = Path::new(name).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}
