//! Flat `key = "value"` file model used by cheat lists.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Ordered key/value document. Setting an existing key replaces its value
/// in place, so merging into a loaded file keeps unrelated keys and order.
#[derive(Debug, Clone, Default)]
pub struct KeyValueFile {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl KeyValueFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.format())?;
        Ok(())
    }

    /// Parse `key = value` lines. Blank lines and `#` comments are skipped,
    /// surrounding double quotes are optional; a repeated key keeps the last value.
    pub fn parse(content: &str) -> Self {
        let mut file = Self::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                file.set(key.trim(), unquote(value.trim()));
            }
        }
        file
    }

    pub fn format(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push_str(" = \"");
            out.push_str(value);
            out.push_str("\"\n");
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        // Values are single-line
        let value = value.into().replace(['\r', '\n'], " ");
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
