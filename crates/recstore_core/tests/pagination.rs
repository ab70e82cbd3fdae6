use recstore_core::{
    ManualClock, MemoryRepository, RecordId, RepoConfig, Repository, User, UserPatch,
};
use std::sync::Arc;

fn seeded(count: usize) -> MemoryRepository<User> {
    let repo = MemoryRepository::<User>::new();
    for n in 0..count {
        repo.create(User::new(format!("user{n:03}"), format!("u{n}@x.com")))
            .unwrap();
    }
    repo
}

#[test]
fn newest_first_with_total() {
    let repo = MemoryRepository::<User>::new();
    let a = repo.create(User::new("aaa", "a@x.com")).unwrap();
    let b = repo.create(User::new("bbb", "b@x.com")).unwrap();
    let c = repo.create(User::new("ccc", "c@x.com")).unwrap();

    let first = repo.list(1, 2).unwrap();
    let ids: Vec<RecordId> = first.items.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![c.id, b.id]);
    assert_eq!(first.total, 3);

    let second = repo.list(2, 2).unwrap();
    let ids: Vec<RecordId> = second.items.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![a.id]);
    assert_eq!(second.total, 3);
}

#[test]
fn created_at_orders_before_id() {
    let clock = Arc::new(ManualClock::new(3_000));
    let repo = MemoryRepository::<User>::with_clock(RepoConfig::default(), clock.clone());

    let late = repo.create(User::new("late", "late@x.com")).unwrap();
    clock.set(1_000);
    let early = repo.create(User::new("early", "early@x.com")).unwrap();

    let page = repo.list(1, 10).unwrap();
    let ids: Vec<RecordId> = page.items.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![late.id, early.id]);
}

#[test]
fn updates_do_not_reorder() {
    let clock = Arc::new(ManualClock::new(1_000));
    let repo = MemoryRepository::<User>::with_clock(RepoConfig::default(), clock.clone());
    let first = repo.create(User::new("first", "f@x.com")).unwrap();
    clock.advance(10);
    let second = repo.create(User::new("second", "s@x.com")).unwrap();
    clock.advance(10);
    repo.update(first.id, &UserPatch::email("f2@x.com")).unwrap();

    let page = repo.list(1, 10).unwrap();
    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.items[1].id, first.id);
    assert_eq!(page.items[1].updated_at, 1_020);
}

#[test]
fn page_and_size_are_normalized() {
    let repo = seeded(120);

    let page = repo.list(0, 0).unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.items.len(), 10);

    let page = repo.list(-4, 500).unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 100);
    assert_eq!(page.items.len(), 100);
    assert_eq!(page.total, 120);
    assert_eq!(page.total_pages(), 2);
}

#[test]
fn page_past_end_is_empty() {
    let repo = seeded(3);
    let page = repo.list(5, 2).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
}

#[test]
fn custom_config_limits_apply() {
    let repo = MemoryRepository::<User>::with_config(RepoConfig::new(2, 4).unwrap());
    for n in 0..6 {
        repo.create(User::new(format!("user{n}"), format!("u{n}@x.com")))
            .unwrap();
    }
    assert_eq!(repo.list(1, 0).unwrap().items.len(), 2);
    assert_eq!(repo.list(1, 50).unwrap().items.len(), 4);
}

#[test]
fn total_excludes_deleted_records() {
    let repo = seeded(4);
    repo.delete(RecordId(2)).unwrap();
    let page = repo.list(1, 10).unwrap();
    assert_eq!(page.total, 3);
    assert!(page.items.iter().all(|record| record.id != RecordId(2)));
}
