//! Cache key derivation: path namespace, content hash, artifact kind.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tsr_common::ContentHash;

/// The type of artifact a cache entry holds. Decides the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Compiled output of a source file.
    Output,
    /// A parsed project configuration record.
    Config,
}

impl ArtifactKind {
    /// Returns the extension (with leading dot) used for entries of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Output => ".js",
            ArtifactKind::Config => ".json",
        }
    }
}

/// Identity of one cache entry.
///
/// Equal keys map to the same file and nothing else does. The key is
/// never stored anywhere on its own; it only exists as the entry's path
/// relative to the cache root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Directory grouping every version of one source file.
    pub namespace: String,
    /// Hash of the text the entry was produced from.
    pub content_hash: ContentHash,
    /// What the entry holds.
    pub kind: ArtifactKind,
}

impl CacheKey {
    /// Builds the key for `contents` of `file_path`, namespaced relative to `app_root`.
    pub fn new(app_root: &Path, file_path: &Path, contents: &str, kind: ArtifactKind) -> Self {
        Self {
            namespace: namespace_key(app_root, file_path),
            content_hash: ContentHash::from_text(contents),
            kind,
        }
    }

    /// Returns the entry's file name, e.g. `0a1b2c3d4e.js`.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.content_hash, self.kind.extension())
    }

    /// Returns the entry's path relative to the cache root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.namespace).join(self.file_name())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.file_name())
    }
}

/// Derives the cache namespace for a file.
///
/// The path is made relative to `app_root` and only its normal components
/// are kept, each further split on `\`. The segments are joined with `-`
/// after the last one loses its extension:
/// `<root>/app/Controllers/Home.ts` becomes `app-Controllers-Home` and
/// `<root>/server.ts` becomes `server`. Root, prefix, `.` and `..`
/// components are dropped, so the result never names anything but a
/// single directory below the cache root. A path with no normal component
/// left (the app root itself, `..`) yields an empty namespace, which
/// [`is_valid_namespace`] rejects.
///
/// Hyphens already present in a segment are not escaped, so `a/b-c.ts`
/// and `a-b/c.ts` share the namespace `a-b-c`. Two such files keep
/// distinct entries (their contents hash differently) but evicting one
/// evicts the other.
pub fn namespace_key(app_root: &Path, file_path: &Path) -> String {
    let relative = file_path.strip_prefix(app_root).unwrap_or(file_path);

    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .flat_map(|part| {
            part.split('\\')
                .filter(|s| !s.is_empty() && *s != "." && *s != "..")
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    let Some(file_name) = segments.pop() else {
        return String::new();
    };

    segments.push(strip_extension(&file_name).to_string());
    segments.join("-")
}

/// Returns `true` if `namespace` can safely name a directory directly
/// below the cache root.
pub fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace != "."
        && namespace != ".."
        && !namespace.contains(['/', '\\'])
}

/// Removes one trailing `.<word chars>` run, if there is one and
/// something other than dots precedes it. `.env` stays `.env`.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot)
            if dot + 1 < name.len()
                && name[..dot].bytes().any(|b| b != b'.')
                && name[dot + 1..]
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_') =>
        {
            &name[..dot]
        }
        _ => name,
    }
}
