use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};

use crate::types::{AggregatedTable, StoreError, StoreResult, TABLE_FILE_SUFFIX, TableKey};

/// Hand-off point between the collect and plot passes
pub trait TableStore {
    /// All stored keys, sorted
    fn keys(&self) -> StoreResult<Vec<TableKey>>;

    fn read(&self, key: &TableKey) -> StoreResult<AggregatedTable>;

    /// Replace whatever is stored under the table's key
    fn write(&self, table: &AggregatedTable) -> StoreResult<()>;
}

/// Tables as `<target>_<fuzzer>_branch_count.txt` files in one directory
#[derive(Clone, Debug)]
pub struct FsTableStore {
    dir: PathBuf,
}

impl FsTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &TableKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl TableStore for FsTableStore {
    fn keys(&self) -> StoreResult<Vec<TableKey>> {
        let pattern = format!(
            "{}/*{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            TABLE_FILE_SUFFIX
        );
        let paths = glob::glob(&pattern).map_err(|e| StoreError::Pattern(e.to_string()))?;

        let mut keys = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable table entry: {e}");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            match TableKey::from_file_name(&file_name) {
                Some(key) => keys.push(key),
                None => warn!("Could not parse filename: {file_name}"),
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    fn read(&self, key: &TableKey) -> StoreResult<AggregatedTable> {
        let path = self.path_for(key);
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(key.clone()),
            _ => StoreError::Io(e),
        })?;
        AggregatedTable::from_text(key.clone(), &text)
    }

    fn write(&self, table: &AggregatedTable) -> StoreResult<()> {
        let path = self.path_for(&table.key);
        debug!("Writing {}", path.display());
        fs::write(path, table.to_text())?;
        Ok(())
    }
}

/// Keeps the serialized text of each table in memory
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RefCell<BTreeMap<TableKey, String>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw table text, bypassing serialization
    pub fn insert_text(&self, key: TableKey, text: impl Into<String>) {
        self.tables.borrow_mut().insert(key, text.into());
    }

    pub fn text(&self, key: &TableKey) -> Option<String> {
        self.tables.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.borrow().is_empty()
    }
}

impl TableStore for MemoryTableStore {
    fn keys(&self) -> StoreResult<Vec<TableKey>> {
        Ok(self.tables.borrow().keys().cloned().collect())
    }

    fn read(&self, key: &TableKey) -> StoreResult<AggregatedTable> {
        let tables = self.tables.borrow();
        let text = tables
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        AggregatedTable::from_text(key.clone(), text)
    }

    fn write(&self, table: &AggregatedTable) -> StoreResult<()> {
        self.tables
            .borrow_mut()
            .insert(table.key.clone(), table.to_text());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Campaign;
    use pretty_assertions::assert_eq;

    fn sample_table(target: &str, fuzzer: &str) -> AggregatedTable {
        AggregatedTable::from_samples(
            TableKey::new(target, fuzzer),
            vec![
                (Campaign::parse("2").unwrap(), vec![12, 22].into()),
                (Campaign::parse("1").unwrap(), vec![10, 20].into()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn fs_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsTableStore::new(tmp.path());
        let table = sample_table("target_a", "afl");
        store.write(&table).unwrap();

        assert!(tmp.path().join("target_a_afl_branch_count.txt").is_file());
        assert_eq!(store.keys().unwrap(), vec![table.key.clone()]);
        assert_eq!(store.read(&table.key).unwrap(), table);
    }

    #[test]
    fn fs_store_skips_undecodable_names() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("afl_branch_count.txt"), "1 2\n").unwrap();
        fs::write(tmp.path().join("notes.txt"), "hello\n").unwrap();
        fs::write(tmp.path().join("b_libfuzzer_branch_count.txt"), "1 2\n").unwrap();
        fs::write(tmp.path().join("a_afl_branch_count.txt"), "1 2\n").unwrap();

        let store = FsTableStore::new(tmp.path());
        assert_eq!(
            store.keys().unwrap(),
            vec![TableKey::new("a", "afl"), TableKey::new("b", "libfuzzer")]
        );
    }

    #[test]
    fn missing_table_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsTableStore::new(tmp.path());
        let err = store.read(&TableKey::new("x", "y")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let memory = MemoryTableStore::new();
        assert!(matches!(
            memory.read(&TableKey::new("x", "y")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn memory_store_keeps_text_form() {
        let store = MemoryTableStore::new();
        let table = sample_table("t", "afl");
        store.write(&table).unwrap();
        assert_eq!(
            store.text(&table.key).unwrap(),
            "1 10 20\n2 12 22\navg 11.00 21.00\n"
        );
        assert_eq!(store.read(&table.key).unwrap(), table);
    }
}
