use recstore_core::{MemoryRepository, RepoError, Repository, User, UserPatch};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const WORKERS: usize = 50;

fn run_parallel<F, R>(work: F) -> Vec<R>
where
    F: Fn(usize) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    let work = Arc::new(work);
    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|n| {
            let work = Arc::clone(&work);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                work(n)
            })
        })
        .collect();
    handles
        .into_iter()
        .map(|handle| handle.join().expect("worker should not panic"))
        .collect()
}

#[test]
fn parallel_distinct_creates_all_succeed() {
    let repo = Arc::new(MemoryRepository::<User>::new());
    let shared = Arc::clone(&repo);
    let results = run_parallel(move |n| {
        shared.create(User::new(format!("user{n:02}"), format!("u{n}@x.com")))
    });

    let ids: HashSet<_> = results
        .into_iter()
        .map(|result| result.expect("distinct create should succeed").id)
        .collect();
    assert_eq!(ids.len(), WORKERS);
    assert_eq!(repo.len(), WORKERS);

    let emails: HashSet<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|record| record.fields.email)
        .collect();
    assert_eq!(emails.len(), WORKERS);
}

#[test]
fn parallel_duplicate_creates_yield_one_winner() {
    let repo = Arc::new(MemoryRepository::<User>::new());
    let shared = Arc::clone(&repo);
    let results = run_parallel(move |n| {
        shared.create(User::new(format!("user{n:02}"), "same@x.com"))
    });

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| {
            matches!(
                result,
                Err(RepoError::Conflict {
                    field: "email",
                    ..
                })
            )
        })
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, WORKERS - 1);
    assert_eq!(repo.len(), 1);
}

#[test]
fn parallel_updates_to_one_value_yield_one_owner() {
    let repo = Arc::new(MemoryRepository::<User>::new());
    let ids: Vec<_> = (0..WORKERS)
        .map(|n| {
            repo.create(User::new(format!("user{n:02}"), format!("u{n}@x.com")))
                .unwrap()
                .id
        })
        .collect();

    let shared = Arc::clone(&repo);
    let results = run_parallel(move |n| shared.update(ids[n], &UserPatch::email("taken@x.com")));

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    let holders = repo
        .list_all()
        .unwrap()
        .into_iter()
        .filter(|record| record.fields.email == "taken@x.com")
        .count();
    assert_eq!(holders, 1);
}
