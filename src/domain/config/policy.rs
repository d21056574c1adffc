use std::{collections::BTreeSet, path::Path};

/// 10 MiB
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

pub const DEFAULT_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub const DEFAULT_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Size and type rules an upload must satisfy before it reaches the object store.
///
/// Content types and extensions are stored lowercase; extensions always carry
/// their leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size: u64,
    pub allowed_content_types: BTreeSet<String>,
    pub allowed_extensions: BTreeSet<String>,
}

impl UploadPolicy {
    pub fn new<C, E, S, T>(max_size: u64, content_types: C, extensions: E) -> Self
    where
        C: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let allowed_content_types = content_types
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let allowed_extensions = extensions
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty() && s != ".")
            .map(|s| {
                if s.starts_with('.') {
                    s
                } else {
                    format!(".{}", s)
                }
            })
            .collect();

        Self {
            max_size,
            allowed_content_types,
            allowed_extensions,
        }
    }

    /// Parameters such as `; charset=...` are ignored.
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let essence = content_type.split(';').next().unwrap_or_default();
        self.allowed_content_types
            .contains(&essence.trim().to_ascii_lowercase())
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .contains(&extension.to_ascii_lowercase())
    }

    pub fn content_types_display(&self) -> String {
        join(&self.allowed_content_types)
    }

    pub fn extensions_display(&self) -> String {
        join(&self.allowed_extensions)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, DEFAULT_CONTENT_TYPES, DEFAULT_EXTENSIONS)
    }
}

/// Lowercase extension of `file_name` with its leading dot, or an empty string.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
