use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, UiError};

/// A load/save pair registered under a section name.
pub trait StateSection {
    fn section(&self) -> &str;

    /// Apply the persisted record. `Value::Null` is passed when the document
    /// has no entry for this section.
    fn load(&mut self, record: &Value) -> Result<()>;

    fn save(&self) -> Value;
}

/// JSON document made of named sections, optionally backed by a file.
#[derive(Debug, Default)]
pub struct StateStore {
    path: Option<PathBuf>,
    document: Map<String, Value>,
    attached: Vec<String>,
}

impl StateStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read the document at `path`. A missing file yields an empty document;
    /// a top-level value that is not an object is discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Value>(&contents)? {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: Some(path),
            document,
            attached: Vec::new(),
        })
    }

    pub fn from_value(value: Value) -> Self {
        let document = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn attach(&mut self, section: impl Into<String>) {
        let section = section.into();
        if !self.is_attached(&section) {
            self.attached.push(section);
        }
    }

    pub fn is_attached(&self, section: &str) -> bool {
        self.attached.iter().any(|name| name == section)
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.document.get(name)
    }

    pub fn load_into(&self, section: &mut dyn StateSection) -> Result<()> {
        let name = section.section();
        if !self.is_attached(name) {
            return Err(UiError::SectionNotAttached(name.to_string()));
        }
        let record = self.document.get(name).cloned().unwrap_or(Value::Null);
        section.load(&record)
    }

    pub fn save_from(&mut self, section: &dyn StateSection) -> Result<()> {
        let name = section.section();
        if !self.is_attached(name) {
            return Err(UiError::SectionNotAttached(name.to_string()));
        }
        self.document.insert(name.to_string(), section.save());
        Ok(())
    }

    pub fn document(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Write the document back to its file. In-memory stores do nothing.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.document)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
