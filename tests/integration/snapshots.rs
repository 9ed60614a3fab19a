//! Writer/reader pairs sharing a snapshot file.

use crate::common::{init_tracing, ranked_ids, rose_corpus};
use rose::{Error, Finder, Indexer, MemoryStorage, Normalizer, Query, StorageWrite};
use std::sync::Arc;

#[test]
fn test_reader_sees_writer_changes_after_reload() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.rose");

    let writer = Arc::new(MemoryStorage::open(&path).unwrap());
    let indexer = Indexer::new(Arc::clone(&writer), Normalizer::default()).with_auto_erase(true);
    indexer.index_all(&rose_corpus()).unwrap();
    writer.cleanup().unwrap();
    writer.save().unwrap();

    let finder = Finder::new(MemoryStorage::open(&path).unwrap(), Normalizer::default());
    let results = finder.find(&Query::new("content")).unwrap();
    assert_eq!(ranked_ids(&results), vec!["20:id_2", "20:id_1", "10:id_1"]);

    indexer.remove_by_id("id_2", 20).unwrap();
    writer.save().unwrap();

    // process-local snapshot: stale until reloaded
    assert_eq!(finder.find(&Query::new("content")).unwrap().len(), 3);
    finder.reload().unwrap();
    assert_eq!(
        ranked_ids(&finder.find(&Query::new("content")).unwrap()),
        vec!["20:id_1", "10:id_1"]
    );
}

#[test]
fn test_fresh_snapshot_needs_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.rose");

    let storage = MemoryStorage::open(&path).unwrap();
    assert!(!storage.is_initialized().unwrap());

    let indexer = Indexer::new(&storage, Normalizer::default());
    let doc = rose_corpus().remove(0);
    assert!(matches!(indexer.index(&doc), Err(Error::UninitializedStorage)));

    storage.erase().unwrap();
    indexer.index(&doc).unwrap();
    storage.save().unwrap();
    assert!(path.exists());
}
