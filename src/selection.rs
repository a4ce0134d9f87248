//! Files chosen for upload but not yet sent.

use std::path::PathBuf;

/// A candidate file handed over by the drop zone or the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }

    fn same_identity(&self, other: &FileRef) -> bool {
        self.name == other.name && self.size == other.size
    }
}

pub type PendingFile = FileRef;

/// Result of [`SelectionStore::add`]. Every candidate lands in exactly one
/// of the three lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub accepted: Vec<FileRef>,
    pub rejected_oversize: Vec<FileRef>,
    pub rejected_duplicate: Vec<FileRef>,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionStore {
    files: Vec<PendingFile>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the acceptable candidates in input order.
    ///
    /// A candidate whose (name, size) matches a stored file, or one accepted
    /// earlier in the same call, is a duplicate; that check wins over the
    /// size check. Files strictly larger than `max_size` are oversize.
    pub fn add(&mut self, candidates: Vec<FileRef>, max_size: u64) -> AddOutcome {
        let mut outcome = AddOutcome::default();

        for candidate in candidates {
            if self.files.iter().any(|f| f.same_identity(&candidate)) {
                outcome.rejected_duplicate.push(candidate);
            } else if candidate.size > max_size {
                outcome.rejected_oversize.push(candidate);
            } else {
                self.files.push(candidate.clone());
                outcome.accepted.push(candidate);
            }
        }

        outcome
    }

    /// Removes the file at `index`; out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<PendingFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Drops every stored file whose (name, size) matches one in `sent`,
    /// leaving the rest in their original order.
    pub fn release(&mut self, sent: &[PendingFile]) -> usize {
        let before = self.files.len();
        self.files
            .retain(|f| !sent.iter().any(|done| done.same_identity(f)));
        before - self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingFile> {
        self.files.iter()
    }

    pub fn snapshot(&self) -> Vec<PendingFile> {
        self.files.clone()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MB: u64 = 1024 * 1024;

    fn file(name: &str, size: u64) -> FileRef {
        FileRef::new(name, size, format!("/tmp/{}", name))
    }

    fn names(files: &[FileRef]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn add_partitions_every_candidate() {
        let mut store = SelectionStore::new();
        store.add(vec![file("seen.txt", 10)], 100 * MB);

        let candidates = vec![
            file("a.txt", MB),
            file("seen.txt", 10),
            file("huge.iso", 200 * MB),
            file("b.txt", 2 * MB),
        ];
        let outcome = store.add(candidates.clone(), 100 * MB);

        assert_eq!(names(&outcome.accepted), vec!["a.txt", "b.txt"]);
        assert_eq!(names(&outcome.rejected_duplicate), vec!["seen.txt"]);
        assert_eq!(names(&outcome.rejected_oversize), vec!["huge.iso"]);

        let total = outcome.accepted.len()
            + outcome.rejected_duplicate.len()
            + outcome.rejected_oversize.len();
        assert_eq!(total, candidates.len());
        assert_eq!(
            store.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["seen.txt", "a.txt", "b.txt"]
        );
    }

    #[test]
    fn second_add_of_same_file_is_duplicate() {
        let mut store = SelectionStore::new();
        let first = store.add(vec![file("x", MB)], 500 * MB);
        assert_eq!(first.accepted.len(), 1);

        let second = store.add(vec![file("x", MB)], 500 * MB);
        assert!(second.accepted.is_empty());
        assert_eq!(names(&second.rejected_duplicate), vec!["x"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicates_within_one_call_are_caught() {
        let mut store = SelectionStore::new();
        let outcome = store.add(vec![file("x", 5), file("x", 5), file("x", 6)], 500);
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.rejected_duplicate.len(), 1);
    }

    #[test]
    fn same_name_different_size_is_not_duplicate() {
        let mut store = SelectionStore::new();
        store.add(vec![file("x", 5)], 500);
        let outcome = store.add(vec![file("x", 6)], 500);
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn oversize_regardless_of_uniqueness() {
        let mut store = SelectionStore::new();
        let outcome = store.add(vec![file("unique.bin", 501 * MB)], 500 * MB);
        assert_eq!(names(&outcome.rejected_oversize), vec!["unique.bin"]);
        assert!(store.is_empty());

        let at_limit = store.add(vec![file("edge.bin", 500 * MB)], 500 * MB);
        assert_eq!(at_limit.accepted.len(), 1);
    }

    #[test]
    fn duplicate_check_precedes_size_check() {
        let mut store = SelectionStore::new();
        store.add(vec![file("big", 10)], 100);
        let outcome = store.add(vec![file("big", 10)], 5);
        assert_eq!(outcome.rejected_duplicate.len(), 1);
        assert!(outcome.rejected_oversize.is_empty());
    }

    #[test]
    fn remove_at_preserves_order_and_ignores_bad_index() {
        let mut store = SelectionStore::new();
        store.add(vec![file("a", 1), file("b", 2), file("c", 3)], 100);

        assert!(store.remove_at(7).is_none());
        assert_eq!(store.len(), 3);

        let removed = store.remove_at(1).map(|f| f.name);
        assert_eq!(removed.as_deref(), Some("b"));
        assert_eq!(
            store.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn clear_empties_store() {
        let mut store = SelectionStore::new();
        store.add(vec![file("a", 1), file("b", 2)], 100);
        assert_eq!(store.total_size(), 3);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.total_size(), 0);
    }

    #[test]
    fn release_keeps_only_unsent_files() {
        let mut store = SelectionStore::new();
        store.add(vec![file("a.txt", 1), file("b.txt", 2), file("c.txt", 3)], MB);

        let released = store.release(&[file("c.txt", 3), file("a.txt", 1), file("b.txt", 99)]);
        assert_eq!(released, 2);
        assert_eq!(names(&store.snapshot()), vec!["b.txt"]);
        assert_eq!(store.release(&[]), 0);
    }
}
