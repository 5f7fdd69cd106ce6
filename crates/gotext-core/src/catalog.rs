//! gotext catalog model and its JSON codec.
//!
//! A catalog is a language tag plus an ordered list of messages, stored as
//! `{"language": "...", "messages": [...]}`. Fields this model does not know
//! about are kept in `extra` maps so a read-modify-write cycle does not drop
//! them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::GotextError;

/// File name the single-file mode writes by default. Never used as a source.
pub const GENERATED_FILE_NAME: &str = "out.gotext.json";

/// Suffix shared by every catalog file.
pub const CATALOG_SUFFIX: &str = ".gotext.json";

/// A positional substitution token inside a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub string: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub underlying_type: String,
    #[serde(default)]
    pub expr: String,
    #[serde(default)]
    pub arg_num: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One translatable unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub message: String,
    /// Empty means untranslated.
    #[serde(default)]
    pub translation: String,
    /// Order is the positional substitution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<Placeholder>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub translator_comment: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fuzzy: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Untranslated copy of a source message: id, text and placeholders only.
    pub fn skeleton(source: &Message) -> Self {
        Self {
            id: source.id.clone(),
            message: source.message.clone(),
            placeholders: source.placeholders.clone(),
            ..Default::default()
        }
    }

    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }
}

/// A localization file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Catalog {
    /// Empty catalog for `language`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    /// Parse catalog bytes. `path` is only used for error reporting.
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self, GotextError> {
        serde_json::from_slice(bytes).map_err(|source| GotextError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse the catalog at `path`.
    pub fn read(path: &Path) -> Result<Self, GotextError> {
        let bytes = std::fs::read(path).map_err(|e| GotextError::io(path, e))?;
        Self::from_slice(path, &bytes)
    }

    /// Read the catalog at `path`, or `None` if no file exists there.
    pub fn read_optional(path: &Path) -> Result<Option<Self>, GotextError> {
        match std::fs::read(path) {
            Ok(bytes) => Self::from_slice(path, &bytes).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GotextError::io(path, e)),
        }
    }

    /// Pretty JSON (two-space indent) with a trailing newline.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, GotextError> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Write the catalog to `path`, replacing any previous content.
    ///
    /// The bytes go to a temporary file in the same directory first and are
    /// renamed into place, so readers never observe a half-written catalog.
    pub fn write(&self, path: &Path) -> Result<(), GotextError> {
        let bytes = self.to_json_bytes()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| GotextError::io(dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| GotextError::io(path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| GotextError::io(path, e))?;
        }

        tmp.persist(path).map_err(|e| GotextError::io(path, e.error))?;
        Ok(())
    }

    /// Fail on the first message id that appears twice.
    pub fn ensure_unique_ids(&self, path: &Path) -> Result<(), GotextError> {
        let mut seen = HashSet::with_capacity(self.messages.len());
        for msg in &self.messages {
            if !seen.insert(msg.id.as_str()) {
                return Err(GotextError::DuplicateMessageId {
                    path: path.to_path_buf(),
                    id: msg.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Map from message id to its position in `messages`. Later duplicates win.
    pub fn index(&self) -> HashMap<String, usize> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect()
    }
}

/// Whether `path` names a source catalog (and not generated output).
pub fn is_source_catalog(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(CATALOG_SUFFIX) && name != GENERATED_FILE_NAME)
}
