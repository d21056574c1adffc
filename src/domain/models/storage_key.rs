use std::fmt;

use uuid::Uuid;

pub const IMAGE_KEY_PREFIX: &str = "images/";

/// Object key of the shape `images/{id}/{file_name}`.
///
/// The fresh id nested in the path keeps two uploads of the same file name
/// apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    id: Uuid,
    file_name: String,
    key: String,
}

impl StorageKey {
    pub fn generate(file_name: &str) -> Self {
        Self::for_upload(Uuid::new_v4(), file_name)
    }

    pub fn for_upload(id: Uuid, file_name: &str) -> Self {
        Self {
            id,
            file_name: file_name.to_string(),
            key: format!("{}{}/{}", IMAGE_KEY_PREFIX, id, file_name),
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let rest = key.strip_prefix(IMAGE_KEY_PREFIX)?;
        let (id, file_name) = rest.split_once('/')?;
        if file_name.is_empty() || file_name.contains('/') {
            return None;
        }
        let id = Uuid::parse_str(id).ok()?;
        Some(Self::for_upload(id, file_name))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
