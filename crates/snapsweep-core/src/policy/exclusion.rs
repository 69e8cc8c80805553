/// Directory exclusion rules.
///
/// A directory is pruned when its *name* contains any rule fragment
/// (case-insensitive substring) or when its absolute path is the
/// destination root. Pruning is final: there is no allow-list, and the
/// scanner never descends into a pruned directory.
use std::path::{Path, PathBuf};

/// Built-in name fragments, stored lowercase.
pub const BUILTIN_FRAGMENTS: &[&str] = &[
    // OS / system
    "windows",
    "program files",
    "programdata",
    "$recycle.bin",
    "system volume information",
    "recovery",
    "perflogs",
    "boot",
    "appdata",
    "$windows.~bt",
    "lost+found",
    // Game platforms
    "steam",
    "epic games",
    "gog galaxy",
    "riot games",
    "battle.net",
    "ubisoft game launcher",
    // Development / vendor trees
    "node_modules",
    ".git",
    "site-packages",
    "__pycache__",
    ".venv",
    ".rustup",
    // Package caches
    ".npm",
    ".cargo",
    ".gradle",
    ".m2",
    ".nuget",
    "chocolatey",
    "scoop",
];

/// Immutable exclusion rule set.
///
/// Constructed from the destination root, so the destination is always a
/// member no matter what custom fragments the operator adds.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    /// Lowercase fragments: built-ins followed by custom ones.
    fragments: Vec<String>,
    destination: PathBuf,
    destination_key: String,
}

impl ExclusionPolicy {
    /// Built-in fragments plus the destination root.
    pub fn new(destination_root: &Path) -> Self {
        Self {
            fragments: BUILTIN_FRAGMENTS.iter().map(|f| f.to_string()).collect(),
            destination: destination_root.to_path_buf(),
            destination_key: path_key(destination_root),
        }
    }

    /// Union operator-supplied fragments into the rule set.
    ///
    /// Custom fragments match exactly like built-ins. Blank entries are
    /// ignored since an empty fragment would match every directory.
    pub fn with_custom_fragments<I, S>(mut self, custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fragment in custom {
            let fragment = fragment.as_ref().trim().to_lowercase();
            if fragment.is_empty() || self.fragments.contains(&fragment) {
                continue;
            }
            self.fragments.push(fragment);
        }
        self
    }

    /// The destination root this policy protects.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Decide whether a directory (bare name or full path) is pruned.
    pub fn is_excluded(&self, dir: &Path) -> bool {
        if self.is_destination(dir) {
            return true;
        }
        match dir.file_name() {
            Some(name) => self.name_matches(&name.to_string_lossy()),
            None => false,
        }
    }

    /// True when `dir` resolves to the destination root.
    pub fn is_destination(&self, dir: &Path) -> bool {
        path_key(dir) == self.destination_key
    }

    fn name_matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.fragments.iter().any(|f| lower.contains(f.as_str()))
    }
}

/// Comparison key for "same absolute path": absolute, no trailing
/// separator. Windows paths compare case-insensitively.
fn path_key(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let text = absolute.to_string_lossy();
    let trimmed = text.trim_end_matches(['/', '\\']);
    let key = if trimmed.is_empty() { &*text } else { trimmed };
    fold_case(key)
}

#[cfg(windows)]
fn fold_case(key: &str) -> String {
    key.to_lowercase()
}

#[cfg(not(windows))]
fn fold_case(key: &str) -> String {
    key.to_string()
}
