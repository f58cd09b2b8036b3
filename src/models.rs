use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Display width of a progress label, in characters.
pub const LABEL_WIDTH: usize = 25;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*").expect("valid parenthesis pattern"));

static PDF_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf$").expect("valid extension pattern"));

/// One element of the manifest array as served by the file host.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub uid: String,
    pub name: String,
}

/// A downloadable file declared in the manifest.
///
/// The derived names are computed once in [`FileDescriptor::new`] and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    uid: String,
    name: String,
    simplified_name: String,
    labeled_name: String,
}

impl FileDescriptor {
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let simplified_name = simplify_name(&name);
        let labeled_name = label_name(&name);

        Self {
            uid: uid.into(),
            name,
            simplified_name,
            labeled_name,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used for the output file, without its `.pdf` extension.
    pub fn simplified_name(&self) -> &str {
        &self.simplified_name
    }

    /// Fixed-width key used for this file's progress bar.
    pub fn labeled_name(&self) -> &str {
        &self.labeled_name
    }
}

impl From<ManifestEntry> for FileDescriptor {
    fn from(entry: ManifestEntry) -> Self {
        Self::new(entry.uid, entry.name)
    }
}

/// Drops every `(...)` group together with the whitespace around it, then a
/// trailing `.pdf`, then trims.
///
/// The extension is only stripped when it ends the raw name, so
/// `"  a.pdf  "` keeps its extension.
pub fn simplify_name(name: &str) -> String {
    let without_groups = PARENTHESIZED.replace_all(name, "");
    let without_extension = PDF_EXTENSION.replace(&without_groups, "");
    without_extension.trim().to_string()
}

/// Truncates or pads the trimmed name to exactly [`LABEL_WIDTH`] characters.
pub fn label_name(name: &str) -> String {
    let normalized = name.trim();

    if normalized.chars().count() > LABEL_WIDTH {
        let mut label: String = normalized.chars().take(LABEL_WIDTH - 1).collect();
        label.push('…');
        label
    } else {
        format!("{normalized:<LABEL_WIDTH$}")
    }
}
