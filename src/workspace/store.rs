//! Named collections persisted as JSON files.
//!
//! Each collection lives at `<data_dir>/<collection>.json` as a pretty
//! printed array. Writes go to a `.tmp` sibling first and are renamed into
//! place, so a crash mid-write leaves the previous file intact.

use crate::core::errors::{BitError, NotFoundError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const TMP_SUFFIX: &str = ".tmp";

/// Items stored in a [`Store`] are keyed by name.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug)]
pub struct Store<T> {
    path: PathBuf,
    items: Vec<T>,
}

impl<T> Store<T>
where
    T: Named + Serialize + DeserializeOwned + Clone,
{
    /// Open `collection` under `dir`. A missing file is an empty store.
    pub fn open(dir: &Path, collection: &str) -> Result<Self> {
        let path = dir.join(format!("{}.json", collection));
        let items = if path.exists() {
            let raw = fs::read(&path)?;
            if raw.iter().all(u8::is_ascii_whitespace) {
                Vec::new()
            } else {
                serde_json::from_slice(&raw)?
            }
        } else {
            Vec::new()
        };
        log::debug!("opened store {:?} with {} item(s)", path, items.len());
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Insert or replace by name, then save. Returns true when an existing
    /// item was replaced.
    pub fn upsert(&mut self, item: T) -> Result<bool> {
        if item.name().trim().is_empty() {
            return Err(BitError::invalid_parameter("name must not be empty"));
        }
        let replaced = match self.items.iter_mut().find(|i| i.name() == item.name()) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => {
                self.items.push(item);
                false
            }
        };
        self.save()?;
        Ok(replaced)
    }

    /// Remove by name, then save. Returns the removed item.
    pub fn remove(&mut self, name: &str) -> Result<Option<T>> {
        let Some(index) = self.items.iter().position(|item| item.name() == name) else {
            return Ok(None);
        };
        let removed = self.items.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&self.items)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        log::debug!("saved {} item(s) to {:?}", self.items.len(), self.path);
        Ok(())
    }
}

/// Where a catalog entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Builtin,
    User,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Builtin => "builtin",
            Source::User => "user",
        }
    }
}

/// Read-only built-ins overlaid by a user [`Store`].
///
/// A user item with the same name as a built-in shadows it. Built-ins can
/// never be deleted.
#[derive(Debug)]
pub struct Catalog<T> {
    kind: &'static str,
    builtins: Vec<T>,
    store: Store<T>,
}

impl<T> Catalog<T>
where
    T: Named + Serialize + DeserializeOwned + Clone,
{
    /// Parse the embedded TOML built-ins and open the user collection.
    pub fn open(
        kind: &'static str,
        builtin_sources: &[(&str, &str)],
        dir: &Path,
        collection: &str,
    ) -> Result<Self> {
        let builtins = builtin_sources
            .iter()
            .map(|(file, content)| {
                toml::from_str::<T>(content).map_err(|e| {
                    BitError::invalid_parameter(format!("built-in {} {}: {}", kind, file, e))
                })
            })
            .collect::<Result<Vec<T>>>()?;
        Ok(Self {
            kind,
            builtins,
            store: Store::open(dir, collection)?,
        })
    }

    /// Every visible item, sorted by name.
    pub fn entries(&self) -> Vec<(&T, Source)> {
        let mut entries: Vec<(&T, Source)> = self
            .builtins
            .iter()
            .filter(|b| self.store.get(b.name()).is_none())
            .map(|b| (b, Source::Builtin))
            .chain(self.store.list().iter().map(|u| (u, Source::User)))
            .collect();
        entries.sort_by(|a, b| a.0.name().cmp(b.0.name()));
        entries
    }

    pub fn names(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|(item, _)| item.name().to_string())
            .collect()
    }

    pub fn get(&self, name: &str) -> Result<&T> {
        self.lookup(name)
            .map(|(item, _)| item)
            .ok_or_else(|| NotFoundError::with_candidates(self.kind, name, &self.names()).into())
    }

    pub fn lookup(&self, name: &str) -> Option<(&T, Source)> {
        self.store
            .get(name)
            .map(|u| (u, Source::User))
            .or_else(|| {
                self.builtins
                    .iter()
                    .find(|b| b.name() == name)
                    .map(|b| (b, Source::Builtin))
            })
    }

    /// Save a user item. Returns true when it replaced a user item.
    pub fn save(&mut self, item: T) -> Result<bool> {
        self.store.upsert(item)
    }

    /// Delete a user item. Built-ins are read-only.
    pub fn delete(&mut self, name: &str) -> Result<T> {
        if let Some(removed) = self.store.remove(name)? {
            return Ok(removed);
        }
        if self.builtins.iter().any(|b| b.name() == name) {
            return Err(BitError::invalid_parameter(format!(
                "{} '{}' is built in and cannot be deleted",
                self.kind, name
            )));
        }
        Err(NotFoundError::with_candidates(self.kind, name, &self.names()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        value: u32,
    }

    impl Named for Item {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn item(name: &str, value: u32) -> Item {
        Item {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store: Store<Item> = Store::open(dir.path(), "items").unwrap();
        assert!(store.list().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_upsert_persists_and_replaces() {
        let dir = TempDir::new().unwrap();
        let mut store: Store<Item> = Store::open(dir.path(), "items").unwrap();
        assert!(!store.upsert(item("a", 1)).unwrap());
        assert!(!store.upsert(item("b", 2)).unwrap());
        assert!(store.upsert(item("a", 3)).unwrap());

        let reopened: Store<Item> = Store::open(dir.path(), "items").unwrap();
        assert_eq!(reopened.list(), &[item("a", 3), item("b", 2)]);
        assert!(!dir.path().join("items.json.tmp").exists());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store: Store<Item> = Store::open(dir.path(), "items").unwrap();
        store.upsert(item("a", 1)).unwrap();
        assert_eq!(store.remove("a").unwrap(), Some(item("a", 1)));
        assert_eq!(store.remove("a").unwrap(), None);
        let reopened: Store<Item> = Store::open(dir.path(), "items").unwrap();
        assert!(reopened.get("a").is_none());
    }

    #[test]
    fn test_rejects_blank_name_and_bad_json() {
        let dir = TempDir::new().unwrap();
        let mut store: Store<Item> = Store::open(dir.path(), "items").unwrap();
        assert!(store.upsert(item("  ", 1)).is_err());

        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        assert!(matches!(
            Store::<Item>::open(dir.path(), "broken"),
            Err(BitError::Json(_))
        ));
    }

    const BUILTINS: &[(&str, &str)] = &[
        ("a.toml", "name = \"a\"\nvalue = 10\n"),
        ("z.toml", "name = \"z\"\nvalue = 26\n"),
    ];

    #[test]
    fn test_catalog_shadowing() {
        let dir = TempDir::new().unwrap();
        let mut catalog: Catalog<Item> =
            Catalog::open("item", BUILTINS, dir.path(), "items").unwrap();
        assert_eq!(catalog.names(), vec!["a", "z"]);
        assert_eq!(catalog.get("a").unwrap().value, 10);

        catalog.save(item("a", 99)).unwrap();
        catalog.save(item("m", 5)).unwrap();
        let entries = catalog.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (&item("a", 99), Source::User));
        assert_eq!(catalog.lookup("z").unwrap().1, Source::Builtin);

        // Deleting the shadowing item reveals the built-in again
        catalog.delete("a").unwrap();
        assert_eq!(catalog.get("a").unwrap().value, 10);
    }

    #[test]
    fn test_catalog_builtins_are_read_only() {
        let dir = TempDir::new().unwrap();
        let mut catalog: Catalog<Item> =
            Catalog::open("item", BUILTINS, dir.path(), "items").unwrap();
        assert!(matches!(
            catalog.delete("z"),
            Err(BitError::InvalidParameter(_))
        ));
        assert!(matches!(catalog.delete("q"), Err(BitError::NotFound(_))));
        let err = catalog.get("zz").unwrap_err();
        assert!(matches!(err, BitError::NotFound(ref e) if e.suggestion.as_deref() == Some("z")));
    }

    #[test]
    fn test_catalog_rejects_broken_builtin() {
        let dir = TempDir::new().unwrap();
        let broken: &[(&str, &str)] = &[("bad.toml", "name = 3")];
        assert!(Catalog::<Item>::open("item", broken, dir.path(), "items").is_err());
    }
}
