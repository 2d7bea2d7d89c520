//! Object naming rules shared by the upload authorizer and the derivative generator.
//!
//! An original uploaded as `{basename}-{suffix}{extension}` is published as
//! `{basename}-{suffix}-{size}{extension}` for every derivative size. The
//! authorizer predicts derivative URLs with [`derivative_key_for`] and the
//! generator publishes under the same function's output, so the two can only
//! agree.
//!
//! Keys are flat: only the final path component of a client filename or an
//! object key takes part in naming.

use uuid::Uuid;

/// Server-generated key for an original upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    pub basename: String,
    pub unique_suffix: String,
    /// Extension including the leading dot, e.g. `.jpg`.
    pub extension: String,
}

impl ObjectKey {
    /// Build a key with a fresh random suffix. Two calls never return the same key.
    pub fn generate(basename: &str, extension: &str) -> Self {
        Self {
            basename: basename.to_string(),
            unique_suffix: Uuid::new_v4().to_string(),
            extension: extension.to_string(),
        }
    }

    /// The storage key, `{basename}-{suffix}{extension}`.
    pub fn key(&self) -> String {
        format!("{}-{}{}", self.basename, self.unique_suffix, self.extension)
    }

    /// Key of the derivative of this object at `size`.
    pub fn derivative_key(&self, size: u32) -> String {
        derivative_key_for(&self.key(), size)
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// Final path component of a key or filename.
///
/// Both `/` and `\` count as separators so that browser-supplied Windows paths
/// collapse to the bare file name.
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Split a file name into stem and extension (with leading dot).
///
/// Leading dots belong to the stem, so `.jpg` has no extension. A trailing dot
/// yields the extension `"."`.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => {
            let at = leading_dots + idx;
            (&name[..at], &name[at..])
        }
        None => (name, ""),
    }
}

/// Pure derivative naming rule: `{basename}-{size}{extension}`.
pub fn derivative_key(basename: &str, size: u32, extension: &str) -> String {
    format!("{}-{}{}", basename, size, extension)
}

/// Derivative key for the object stored at `source_key`.
///
/// Directory prefixes of `source_key` are dropped and the extension is kept
/// verbatim.
pub fn derivative_key_for(source_key: &str, size: u32) -> String {
    let (basename, extension) = split_extension(file_name(source_key));
    derivative_key(basename, size, extension)
}
