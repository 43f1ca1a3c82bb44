//! Path resolution for directory navigation.
//!
//! Turns a spoken or typed path reference into an absolute path relative to
//! the session's working directory. Expansion covers a leading `~`, Unix
//! style `$VAR`/`${VAR}` references, and Windows style `%VAR%` references.
//! Normalization is purely lexical (no filesystem access), which keeps
//! `resolve` idempotent for already absolute, already normalized inputs.

use std::path::{Component, Path, PathBuf};

use directories::UserDirs;

/// Well-known folders reachable by quick-jump phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownFolder {
    Desktop,
    Downloads,
    Documents,
}

impl WellKnownFolder {
    /// Looks up the platform location of this folder.
    ///
    /// Returns `None` when the platform has no such folder configured; the
    /// caller reports an error and leaves the working directory untouched.
    #[must_use]
    pub fn locate(self) -> Option<PathBuf> {
        let dirs = UserDirs::new()?;
        match self {
            Self::Desktop => dirs.desktop_dir().map(Path::to_path_buf),
            Self::Downloads => dirs.download_dir().map(Path::to_path_buf),
            Self::Documents => dirs.document_dir().map(Path::to_path_buf),
        }
    }

    /// Display name used in status messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Downloads => "Downloads",
            Self::Documents => "Documents",
        }
    }
}

/// Expands `~`, `$VAR`, `${VAR}`, and `%VAR%` references in a raw path
/// string. Unset variables are left in place rather than replaced by an
/// empty string, so a bad reference fails loudly at the directory check.
#[must_use]
pub fn expand(raw: &str) -> String {
    let mut s = raw.trim().to_string();

    if s == "~" || s.starts_with("~/") || s.starts_with("~\\") {
        if let Some(dirs) = UserDirs::new() {
            let home = dirs.home_dir().to_string_lossy().into_owned();
            s = format!("{}{}", home, &s[1..]);
        }
    }

    s = expand_percent_vars(&s);
    expand_dollar_vars(&s)
}

fn expand_percent_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find('%') {
            Some(end) => {
                let name = &tail[..end];
                match std::env::var(name) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('%');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn expand_dollar_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let tail = &s[i + 1..];
        let (name, consumed) = if let Some(stripped) = tail.strip_prefix('{') {
            match stripped.find('}') {
                Some(end) => (&stripped[..end], end + 2),
                None => {
                    out.push('$');
                    continue;
                }
            }
        } else {
            let end = tail
                .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
                .unwrap_or(tail.len());
            (&tail[..end], end)
        };
        if name.is_empty() {
            out.push('$');
            continue;
        }
        match std::env::var(name) {
            Ok(val) => out.push_str(&val),
            Err(_) => {
                out.push('$');
                out.push_str(name);
            }
        }
        // Skip the consumed variable reference.
        for _ in 0..consumed {
            chars.next();
        }
    }
    out
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// the preceding component where one exists. No filesystem access.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolves a raw path-like string against the current working directory.
///
/// Absolute inputs resolve to their normalized selves; relative inputs are
/// joined onto `cwd` first. Idempotent for absolute, normalized inputs:
/// `resolve(resolve(p), cwd) == resolve(p, cwd)`.
#[must_use]
pub fn resolve(raw: &str, cwd: &Path) -> PathBuf {
    let expanded = expand(raw);
    let candidate = Path::new(&expanded);
    if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&cwd.join(candidate))
    }
}
