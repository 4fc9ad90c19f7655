use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shelfkeep_core::{
    is_valid_id, parse_position, Catalog, CatalogError, CatalogService, CatalogStore, IdPrefix,
    LedgerIssue, MemoryStore, ReturnSelector,
};
use std::collections::HashSet;

fn assert_ledger_balanced(catalog: &Catalog) {
    for book in &catalog.books {
        let open_records = catalog
            .members
            .iter()
            .flat_map(|member| member.borrowed.iter())
            .filter(|record| record.book_id == book.id)
            .count();
        assert!(book.available_copies <= book.total_copies);
        assert_eq!(
            (book.total_copies - book.available_copies) as usize,
            open_records,
            "ledger drift on {}",
            book.id
        );
    }
}

#[test]
fn add_book_sets_both_counters_and_prefixed_id() {
    let service = CatalogService::new(MemoryStore::new());

    let mut ids = HashSet::new();
    for copies in 1..=20 {
        let book = service.add_book("Title", "Author", copies).unwrap();
        assert_eq!(book.total_copies, copies);
        assert_eq!(book.available_copies, copies);
        assert!(is_valid_id(IdPrefix::Book, &book.id));
        assert!(ids.insert(book.id));
    }
    assert_eq!(service.list_books().unwrap().len(), 20);
}

#[test]
fn add_book_rejects_zero_copies_without_persisting() {
    let store = MemoryStore::new();
    let service = CatalogService::new(&store);

    let err = service.add_book("Empty", "Nobody", 0).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidInput(_)));
    assert!(store.load().unwrap().books.is_empty());
}

#[test]
fn add_member_starts_with_no_loans() {
    let service = CatalogService::new(MemoryStore::new());

    let member = service.add_member("Alice", "a@x.com").unwrap();
    assert!(is_valid_id(IdPrefix::Member, &member.id));
    assert!(member.borrowed.is_empty());
    assert_eq!(service.get_member(&member.id).unwrap(), Some(member));
}

#[test]
fn dune_scenario_borrow_then_return_restores_state() {
    let service = CatalogService::new(MemoryStore::new());
    let dune = service.add_book("Dune", "Herbert", 2).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();

    service.borrow(&alice.id, &dune.id).unwrap();
    assert_eq!(
        service.get_book(&dune.id).unwrap().unwrap().available_copies,
        1
    );
    assert_eq!(
        service.get_member(&alice.id).unwrap().unwrap().borrowed.len(),
        1
    );

    let returned = service
        .return_book(&alice.id, &ReturnSelector::BookId(dune.id.clone()))
        .unwrap();
    assert_eq!(returned.record.title, "Dune");
    assert_eq!(
        service.get_book(&dune.id).unwrap().unwrap().available_copies,
        2
    );
    assert!(service
        .get_member(&alice.id)
        .unwrap()
        .unwrap()
        .borrowed
        .is_empty());
}

#[test]
fn second_borrow_of_same_book_fails_and_decrements_once() {
    let service = CatalogService::new(MemoryStore::new());
    let dune = service.add_book("Dune", "Herbert", 3).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();

    service.borrow(&alice.id, &dune.id).unwrap();
    let err = service.borrow(&alice.id, &dune.id).unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyBorrowed { .. }));
    assert_eq!(err.code(), "already_borrowed");
    assert_eq!(
        service.get_book(&dune.id).unwrap().unwrap().available_copies,
        2
    );
}

#[test]
fn borrow_fails_when_no_copies_remain() {
    let service = CatalogService::new(MemoryStore::new());
    let emma = service.add_book("Emma", "Austen", 1).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();
    let bob = service.add_member("Bob", "b@x.com").unwrap();

    service.borrow(&alice.id, &emma.id).unwrap();
    let err = service.borrow(&bob.id, &emma.id).unwrap_err();
    assert!(matches!(err, CatalogError::NoCopiesAvailable(ref id) if *id == emma.id));
    assert!(service.borrowable_books().unwrap().is_empty());
}

#[test]
fn unknown_ids_map_to_not_found() {
    let service = CatalogService::new(MemoryStore::new());
    let emma = service.add_book("Emma", "Austen", 1).unwrap();

    let err = service.borrow("M-ZZZZZ", &emma.id).unwrap_err();
    assert!(err.is_not_found());
    let err = service
        .return_book("M-ZZZZZ", &ReturnSelector::Position(1))
        .unwrap_err();
    assert!(matches!(err, CatalogError::MemberNotFound(_)));
}

#[test]
fn invalid_return_position_stops_before_mutation() {
    let store = MemoryStore::new();
    let service = CatalogService::new(&store);
    let dune = service.add_book("Dune", "Herbert", 1).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();
    service.borrow(&alice.id, &dune.id).unwrap();
    let before = store.document();

    let err = parse_position("first").unwrap_err();
    assert!(matches!(err, CatalogError::InvalidInput(_)));

    let err = service
        .return_book(&alice.id, &ReturnSelector::Position(5))
        .unwrap_err();
    assert!(matches!(err, CatalogError::BorrowRecordNotFound { .. }));
    assert_eq!(store.document(), before);
}

#[test]
fn members_with_loans_and_summary_track_borrowing() {
    let service = CatalogService::new(MemoryStore::new());
    let dune = service.add_book("Dune", "Herbert", 2).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();
    service.add_member("Bob", "b@x.com").unwrap();

    assert!(service.members_with_loans().unwrap().is_empty());
    service.borrow(&alice.id, &dune.id).unwrap();

    let with_loans = service.members_with_loans().unwrap();
    assert_eq!(with_loans.len(), 1);
    assert_eq!(with_loans[0].id, alice.id);

    let summary = service.summary().unwrap();
    assert_eq!(summary.total_copies, 2);
    assert_eq!(summary.available_copies, 1);
    assert_eq!(summary.member_count, 2);
    assert_eq!(summary.active_borrows, 1);
}

#[test]
fn audit_flags_hand_edited_drift() {
    let store = MemoryStore::new();
    let service = CatalogService::new(&store);
    let dune = service.add_book("Dune", "Herbert", 2).unwrap();
    let alice = service.add_member("Alice", "a@x.com").unwrap();
    service.borrow(&alice.id, &dune.id).unwrap();
    assert!(service.audit().unwrap().is_empty());

    let mut catalog = store.load().unwrap();
    catalog.books[0].available_copies = 2;
    store.save(&catalog).unwrap();

    assert_eq!(
        service.audit().unwrap(),
        vec![LedgerIssue::CopyMismatch {
            book_id: dune.id,
            outstanding_copies: 0,
            open_records: 1,
        }]
    );
}

#[test]
fn random_operation_sequences_keep_ledger_balanced() {
    let store = MemoryStore::new();
    let service = CatalogService::new(&store);
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let books = (1..=4)
        .map(|copies| service.add_book("Title", "Author", copies).unwrap())
        .collect::<Vec<_>>();
    let members = (0..3)
        .map(|_| service.add_member("Name", "mail@x.com").unwrap())
        .collect::<Vec<_>>();

    for _ in 0..300 {
        let member = &members[rng.gen_range(0..members.len())];
        if rng.gen_bool(0.6) {
            let book = &books[rng.gen_range(0..books.len())];
            let _ = service.borrow(&member.id, &book.id);
        } else {
            let position = rng.gen_range(1..=3);
            let _ = service.return_book(&member.id, &ReturnSelector::Position(position));
        }

        let catalog = store.load().unwrap();
        assert_ledger_balanced(&catalog);
        assert!(catalog.audit().is_empty());
    }
}
