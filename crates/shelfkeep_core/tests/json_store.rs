use shelfkeep_core::{
    Catalog, CatalogService, CatalogStore, JsonFileStore, MemoryStore, StoreError,
};

#[test]
fn load_creates_empty_document_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let store = JsonFileStore::new(&path);

    let catalog = store.load().unwrap();
    assert_eq!(catalog, Catalog::empty());

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, serde_json::json!({ "books": [], "members": [] }));
}

#[test]
fn load_treats_blank_file_as_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(&path, "  \n").unwrap();

    let catalog = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(catalog, Catalog::empty());
    assert!(std::fs::read_to_string(&path).unwrap().contains("\"books\""));
}

#[test]
fn save_then_load_reproduces_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.json");
    let service = CatalogService::new(JsonFileStore::new(&path));

    let dune = service.add_book("Dune", "Herbert", 2).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();
    service.borrow(&alice.id, &dune.id).unwrap();
    let saved = service.catalog().unwrap();

    let reopened = JsonFileStore::new(&path);
    reopened.save(&saved).unwrap();
    assert_eq!(reopened.load().unwrap(), saved);
}

#[test]
fn saved_file_uses_four_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    JsonFileStore::new(&path).save(&Catalog::empty()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n    \"books\": []"), "{text}");
}

#[test]
fn malformed_json_is_reported_and_file_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn invalid_counters_are_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(
        &path,
        r#"{"books":[{"id":"B-AAAAA","title":"t","author":"a","total_copies":1,
            "available_copies":4,"added_on":"2024-01-01 00:00:00"}],"members":[]}"#,
    )
    .unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn legacy_file_is_rewritten_with_canonical_field_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(
        &path,
        r#"{"books":[{"id":"B-AAAAA","title":"t","author":"a","total_copies":2,
            "avaliable_copies":2,"added_on":"2024-01-01 00:00:00"}],"members":[]}"#,
    )
    .unwrap();

    let store = JsonFileStore::new(&path);
    let catalog = store.load().unwrap();
    store.save(&catalog).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"available_copies\": 2"));
    assert!(!text.contains("avaliable_copies"));
}

#[test]
fn memory_store_initializes_and_round_trips() {
    let store = MemoryStore::new();
    assert!(store.document().is_none());

    let catalog = store.load().unwrap();
    assert_eq!(catalog, Catalog::empty());
    assert!(store.document().is_some());

    let service = CatalogService::new(&store);
    service.add_book("Emma", "Austen", 1).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.books.len(), 1);
    assert_eq!(MemoryStore::with_catalog(&reloaded).unwrap().load().unwrap(), reloaded);
}

#[test]
fn non_ascii_text_is_written_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let service = CatalogService::new(JsonFileStore::new(&path));
    service.add_book("Cien años de soledad", "García Márquez", 1).unwrap();
    service.add_member("Zoë 東京", "zoe@example.jp").unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"Cien años de soledad\""), "{text}");
    assert!(text.contains("\"Zoë 東京\""), "{text}");
    assert!(!text.contains('\u{FFFD}'));

    let document = shelfkeep_core::store::to_document_string(&service.catalog().unwrap()).unwrap();
    assert_eq!(document, text);
}
