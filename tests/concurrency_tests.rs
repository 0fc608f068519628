//! Concurrency and thread safety tests for the verifier

use std::sync::Arc;
use std::thread;

use trifactor::demo_utils::{attempt, enroll_request};
use trifactor::{
    EnrollError, InMemoryTemplateStore, MatchResult, Stage, TemplateStore, Verifier,
    VerifyConfig, VoiceConfig,
};

const DIM: usize = 16;

fn shared_verifier() -> Arc<Verifier> {
    let cfg = VerifyConfig {
        voice: VoiceConfig {
            dimension: DIM,
            threshold: 0.9,
            ..Default::default()
        },
        ..Default::default()
    };
    Arc::new(Verifier::new(cfg).expect("verifier"))
}

#[test]
fn concurrent_verify_same_template() {
    let verifier = shared_verifier();
    let store = InMemoryTemplateStore::new();
    let template = Arc::new(
        verifier
            .enroll_and_store(&store, enroll_request("alice", "open sesame", 1, DIM))
            .expect("enroll"),
    );

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let verifier = Arc::clone(&verifier);
            let template = Arc::clone(&template);
            thread::spawn(move || {
                let (phrase, seed) = match i % 3 {
                    0 => ("open sesame", 1),
                    1 => ("wrong phrase", 1),
                    _ => ("open sesame", 2),
                };
                (i, verifier.verify(&attempt("alice", phrase, seed, DIM), &template))
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.join().unwrap();
        let expected = match i % 3 {
            0 => MatchResult::accepted(),
            1 => MatchResult::rejected(Stage::Passphrase),
            _ => MatchResult::rejected(Stage::Voice),
        };
        assert_eq!(result, expected, "thread {i}");
    }
}

#[test]
fn concurrent_enrollment_of_distinct_users() {
    let verifier = shared_verifier();
    let store = Arc::new(InMemoryTemplateStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let verifier = Arc::clone(&verifier);
            let store = Arc::clone(&store);
            thread::spawn(move || {
                verifier
                    .enroll_and_store(
                        store.as_ref(),
                        enroll_request(&format!("user-{i}"), "open sesame", i, DIM),
                    )
                    .expect("enroll")
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let names = store.usernames().unwrap();
    assert_eq!(names.len(), 8);
    assert_eq!(names[0], "user-0");
    assert_eq!(names[7], "user-7");
}

#[test]
fn concurrent_enrollment_race_has_one_winner() {
    let verifier = shared_verifier();
    let store = Arc::new(InMemoryTemplateStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let verifier = Arc::clone(&verifier);
            let store = Arc::clone(&store);
            thread::spawn(move || {
                verifier.enroll_and_store(
                    store.as_ref(),
                    enroll_request("contested", "open sesame", i, DIM),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(
            result.as_ref().unwrap_err(),
            &EnrollError::DuplicateUser("contested".into())
        );
    }
    assert_eq!(store.len(), 1);
}
