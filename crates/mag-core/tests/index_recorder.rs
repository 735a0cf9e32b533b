use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use mag_core::hashing::{bytes_hash, file_hash};
use mag_core::{Catalog, DefaultDescriptor, FileRecord, FsOutputStore, IndexRecorder, InMemoryCatalog,
               MetadataDescriptor, NewFile, OutputStore, Placement, StoreError, SOFTWARE_VERSION};

fn may_2nd() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 2).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn hsk_pw(version: u32) -> DefaultDescriptor {
    DefaultDescriptor::builder().descriptor("hsk-pw")
                                .date(may_2nd())
                                .version(version)
                                .extension("txt")
                                .build()
                                .unwrap()
}

fn write(path: &Path, bytes: &[u8]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
    path.to_path_buf()
}

/// Store de prueba: escribe `payload` en una ruta fija (o nada si es `None`).
struct FakeStore {
    destination: PathBuf,
    payload: Option<&'static [u8]>,
}

impl OutputStore for FakeStore {
    fn place(&mut self, _source: &Path, _descriptor: &mut dyn MetadataDescriptor) -> Result<Placement, StoreError> {
        if let Some(bytes) = self.payload {
            write(&self.destination, bytes);
        }
        Ok(Placement::copied(self.destination.clone()))
    }
}

/// Store que coloca con `FsOutputStore` y después borra la fuente.
struct VanishingSourceStore {
    inner: FsOutputStore,
}

impl OutputStore for VanishingSourceStore {
    fn place(&mut self, source: &Path, descriptor: &mut dyn MetadataDescriptor) -> Result<Placement, StoreError> {
        let placement = self.inner.place(source, descriptor)?;
        fs::remove_file(source).unwrap();
        Ok(placement)
    }
}

/// Catálogo que siempre falla al insertar.
struct BrokenCatalog;

impl Catalog for BrokenCatalog {
    fn insert_files(&mut self, _files: &[NewFile]) -> Result<usize, StoreError> {
        Err(StoreError::Catalog("connection refused".into()))
    }

    fn list_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        Ok(vec![])
    }
}

#[test]
fn records_placed_file_with_verified_hash() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let mut recorder = IndexRecorder::new(FsOutputStore::new(tmp.path().join("output")), InMemoryCatalog::new());

    let mut d = hsk_pw(1);
    let placement = recorder.record_and_place(&source, &mut d).unwrap();

    let rows = recorder.catalog().list_files().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.name, "hsk-pw_20250502_v001.txt");
    assert!(row.path.ends_with("output/2025/05/02/hsk-pw_20250502_v001.txt"));
    assert!(Path::new(&row.path).is_absolute());
    assert_eq!(row.version, 1);
    assert_eq!(row.hash, bytes_hash(b"some content"));
    assert_eq!(row.hash, file_hash(&placement.path).unwrap());
    assert_eq!(row.date, may_2nd());
    assert_eq!(row.software_version, SOFTWARE_VERSION);
}

#[test]
fn placing_twice_keeps_a_single_record() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let mut recorder = IndexRecorder::new(FsOutputStore::new(tmp.path().join("output")), InMemoryCatalog::new());

    let (p1, d1) = recorder.add_default_file(&source, hsk_pw(0)).unwrap();
    let (p2, d2) = recorder.add_default_file(&source, hsk_pw(0)).unwrap();

    assert_eq!(p1, p2);
    assert_eq!(d1.version, d2.version);
    assert_eq!(recorder.catalog().len(), 1);
}

#[test]
fn versioned_placements_are_each_recorded() {
    let tmp = tempfile::tempdir().unwrap();
    let mut recorder = IndexRecorder::new(FsOutputStore::new(tmp.path().join("output")), InMemoryCatalog::new());

    for i in 0..3 {
        let source = write(&tmp.path().join(format!("src{i}")), format!("content {i}").as_bytes());
        recorder.add_default_file(&source, hsk_pw(0)).unwrap();
    }

    let rows = recorder.catalog().list_files().unwrap();
    assert_eq!(rows.iter().map(|r| r.version).collect::<Vec<_>>(), vec![0, 1, 2]);
    for row in rows {
        assert_eq!(file_hash(Path::new(&row.path)).unwrap(), row.hash);
    }
}

#[test]
fn missing_destination_is_an_integrity_error() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let store = FakeStore { destination: tmp.path().join("test_file.txt"),
                            payload: None };
    let mut recorder = IndexRecorder::new(store, InMemoryCatalog::new());

    let err = recorder.record_and_place(&source, &mut hsk_pw(1)).unwrap_err();

    assert!(err.is_integrity(), "got {err:?}");
    assert!(recorder.catalog().is_empty());
}

#[test]
fn hash_mismatch_removes_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let destination = tmp.path().join("test_file.txt");
    let store = FakeStore { destination: destination.clone(),
                            payload: Some(b"some other content") };
    let mut recorder = IndexRecorder::new(store, InMemoryCatalog::new());

    let err = recorder.record_and_place(&source, &mut hsk_pw(1)).unwrap_err();

    assert!(matches!(err, StoreError::Integrity { .. }));
    assert!(!destination.exists());
    assert!(recorder.catalog().is_empty());
}

#[test]
fn catalog_failure_leaves_no_artifact_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let root = tmp.path().join("output");
    let mut recorder = IndexRecorder::new(FsOutputStore::new(&root), BrokenCatalog);

    let err = recorder.add_default_file(&source, hsk_pw(0)).unwrap_err();

    assert!(matches!(err, StoreError::Catalog(_)));
    assert!(!root.join("2025/05/02/hsk-pw_20250502_v000.txt").exists());
}

#[test]
fn catalog_failure_keeps_previously_placed_identical_file() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let root = tmp.path().join("output");
    let existing = write(&root.join("2025/05/02/hsk-pw_20250502_v000.txt"), b"some content");
    let mut recorder = IndexRecorder::new(FsOutputStore::new(&root), BrokenCatalog);

    assert!(recorder.add_default_file(&source, hsk_pw(0)).is_err());
    assert!(existing.exists());
}

#[test]
fn recorder_composes_behind_a_trait_object() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"abc");
    let mut store: Box<dyn OutputStore> =
        Box::new(IndexRecorder::new(FsOutputStore::new(tmp.path().join("output")), InMemoryCatalog::new()));

    let (path, d) = store.add_default_file(&source, hsk_pw(0)).unwrap();

    assert!(path.exists());
    assert_eq!(d.version, 0);
}

#[test]
fn unreadable_source_after_placement_removes_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let root = tmp.path().join("output");
    let store = VanishingSourceStore { inner: FsOutputStore::new(&root) };
    let mut recorder = IndexRecorder::new(store, InMemoryCatalog::new());

    let err = recorder.add_default_file(&source, hsk_pw(0)).unwrap_err();

    assert!(err.is_integrity(), "got {err:?}");
    assert!(!root.join("2025/05/02/hsk-pw_20250502_v000.txt").exists());
    assert!(recorder.catalog().is_empty());
}

#[cfg(unix)]
#[test]
fn non_utf8_destination_is_not_recorded() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = tempfile::tempdir().unwrap();
    let source = write(&tmp.path().join("some_file"), b"some content");
    let destination = tmp.path().join(OsStr::from_bytes(b"bad\xffname.txt"));
    let store = FakeStore { destination: destination.clone(),
                            payload: Some(b"some content") };
    let mut recorder = IndexRecorder::new(store, InMemoryCatalog::new());

    let err = recorder.record_and_place(&source, &mut hsk_pw(0)).unwrap_err();

    assert!(err.is_integrity(), "got {err:?}");
    assert!(!destination.exists());
    assert!(recorder.catalog().is_empty());
}
