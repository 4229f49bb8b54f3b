use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use slogscope_types::{GroupColor, SENTINEL_GROUPS};

use crate::error::{ConsoleError, Result};

/// Read-mostly view of the group directory used during ingestion
pub trait GroupRegistry {
    /// Case-insensitive, whitespace-normalized membership check
    fn contains(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    /// Insert a new group. Returns false if the name is empty or already present.
    fn add(&mut self, name: &str, color: GroupColor) -> bool;

    /// Color of a group, white when the group is unknown
    fn color_of(&self, name: &str) -> GroupColor;

    /// Stored spelling of a group matching `name`
    fn canonical_name(&self, name: &str) -> Option<&str>;
}

/// Collapse internal whitespace runs to a single space and trim the ends
pub fn normalize_group_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn group_key(name: &str) -> String {
    normalize_group_name(name).to_lowercase()
}

fn is_sentinel(name: &str) -> bool {
    let key = group_key(name);
    SENTINEL_GROUPS.iter().any(|s| s.to_lowercase() == key)
}

/// Parse a `NAME` or `NAME=COLOR` group argument (as given on the command line)
pub fn parse_group_arg(arg: &str) -> Result<GroupEntry> {
    let (name, color) = match arg.split_once('=') {
        Some((name, color)) => (name, GroupColor::try_from(color.trim().to_string())?),
        None => (arg, GroupColor::WHITE),
    };

    let name = normalize_group_name(name);
    if name.is_empty() {
        return Err(ConsoleError::EmptyGroupName);
    }
    Ok(GroupEntry { name, color })
}

/// A named group with its display color
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub name: String,
    #[serde(default)]
    pub color: GroupColor,
}

/// On-disk layout of the group file
#[derive(Debug, Default, Serialize, Deserialize)]
struct GroupFile {
    #[serde(default)]
    groups: Vec<GroupEntry>,
}

/// Ordered group name -> color directory
///
/// `All` and `General` are always present and cannot be removed.
#[derive(Clone, Debug)]
pub struct GroupDirectory {
    entries: Vec<GroupEntry>,
}

impl GroupDirectory {
    /// Create a directory holding only the sentinel groups
    pub fn new() -> Self {
        Self {
            entries: SENTINEL_GROUPS
                .iter()
                .map(|name| GroupEntry {
                    name: name.to_string(),
                    color: GroupColor::WHITE,
                })
                .collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = group_key(name);
        self.entries.iter().position(|e| e.name.to_lowercase() == key)
    }

    /// Remove a group. Sentinels and unknown names are refused.
    pub fn remove(&mut self, name: &str) -> bool {
        if is_sentinel(name) {
            return false;
        }
        match self.position(name) {
            Some(idx) => {
                let removed = self.entries.remove(idx);
                tracing::debug!(group = %removed.name, "removed group");
                true
            }
            None => false,
        }
    }

    /// Change the color of an existing group
    pub fn set_color(&mut self, name: &str, color: GroupColor) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| ConsoleError::UnknownGroup(name.to_string()))?;
        self.entries[idx].color = color;
        Ok(())
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[GroupEntry] {
        &self.entries
    }

    /// All group names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a directory from a TOML group file
    ///
    /// Duplicate names are dropped and the sentinels are re-added if missing.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: GroupFile = toml::from_str(&content)?;

        let mut directory = Self::new();
        for entry in file.groups {
            if directory.contains(&entry.name) {
                // Keep the stored color for sentinels listed in the file
                if is_sentinel(&entry.name) {
                    directory.set_color(&entry.name, entry.color)?;
                }
                continue;
            }
            directory.add(&entry.name, entry.color);
        }

        tracing::debug!(path = %path.display(), groups = directory.len(), "loaded group file");
        Ok(directory)
    }

    /// Load from `path`, falling back to the sentinel-only directory when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::load(path)
    }

    /// Write the directory to a TOML group file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = GroupFile {
            groups: self.entries.clone(),
        };
        fs::write(path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl Default for GroupDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRegistry for GroupDirectory {
    fn add(&mut self, name: &str, color: GroupColor) -> bool {
        let name = normalize_group_name(name);
        if name.is_empty() || self.position(&name).is_some() {
            return false;
        }
        tracing::debug!(group = %name, %color, "registered group");
        self.entries.push(GroupEntry { name, color });
        true
    }

    fn color_of(&self, name: &str) -> GroupColor {
        self.position(name)
            .map(|idx| self.entries[idx].color)
            .unwrap_or(GroupColor::WHITE)
    }

    fn canonical_name(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].name.as_str())
    }
}
