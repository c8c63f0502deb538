//! Admission scenarios against in-memory collaborators.
//!
//! These tests drive `admit_push` end to end with a scripted scanner, the
//! mock lock registry and the mock uploader.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lfsgate::core::locks::LockRecord;
use lfsgate::core::objects::TrackedObject;
use lfsgate::core::refs::RefUpdate;
use lfsgate::core::types::Committer;
use lfsgate::engine::{
    admit_push, DispatchFailure, HookError, HookOutcome, ObjectScanner, PushRequest,
    RemoteValidator, ScanError,
};
use lfsgate::locks::mock::MockLockClient;
use lfsgate::locks::{LockClient, LockError};
use lfsgate::transfer::mock::MockUploader;
use lfsgate::ui::output::Verbosity;

const NULL: &str = "0000000000000000000000000000000000000000";

/// Scanner returning scripted objects per local revision and recording calls.
#[derive(Default)]
struct ScriptedScanner {
    objects: HashMap<String, Vec<TrackedObject>>,
    scanned: Mutex<Vec<RefUpdate>>,
}

impl ScriptedScanner {
    fn with(mut self, revision: &str, paths: &[&str]) -> Self {
        let objects = paths
            .iter()
            .map(|path| TrackedObject {
                name: format!("{}-{}", revision, path),
                path: path.to_string(),
                size: 100,
            })
            .collect();
        self.objects.insert(revision.to_string(), objects);
        self
    }

    fn scanned(&self) -> Vec<RefUpdate> {
        self.scanned.lock().unwrap().clone()
    }
}

impl ObjectScanner for ScriptedScanner {
    fn scan(&self, _remote: &str, update: &RefUpdate) -> Result<Vec<TrackedObject>, ScanError> {
        self.scanned.lock().unwrap().push(update.clone());
        Ok(self
            .objects
            .get(&update.local_revision)
            .cloned()
            .unwrap_or_default())
    }
}

/// Accepts only the listed remote names.
struct Remotes(&'static [&'static str]);

impl RemoteValidator for Remotes {
    fn validate_remote(&self, name: &str) -> Result<(), String> {
        if self.0.contains(&name) {
            Ok(())
        } else {
            Err(format!("unknown remote {}", name))
        }
    }
}

/// Test fixture bundling the collaborators of one run.
struct Harness {
    scanner: ScriptedScanner,
    locks: MockLockClient,
    uploader: MockUploader,
    committer: Committer,
}

impl Harness {
    fn new(scanner: ScriptedScanner, locks: Vec<LockRecord>) -> Self {
        Self {
            scanner,
            locks: MockLockClient::with_locks(locks),
            uploader: MockUploader::new(),
            committer: Committer::new("Bob", "bob@example.com"),
        }
    }

    async fn run(&self, remote: &str, input: &str) -> HookOutcome {
        let locks: Arc<dyn LockClient> = Arc::new(self.locks.clone());
        self.run_with(remote, Ok(locks), input).await
    }

    async fn run_with(
        &self,
        remote: &str,
        locks: Result<Arc<dyn LockClient>, HookError>,
        input: &str,
    ) -> HookOutcome {
        let request = PushRequest {
            remote,
            validator: &Remotes(&["origin"]),
            identity: &self.committer,
            scanner: &self.scanner,
            locks,
            uploader: Arc::new(self.uploader.clone()),
            verbosity: Verbosity::Quiet,
        };
        admit_push(request, input.as_bytes()).await
    }
}

fn alice_lock(path: &str) -> LockRecord {
    LockRecord::new(path, "Alice", "alice@example.com")
}

fn bob_lock(path: &str) -> LockRecord {
    LockRecord::new(path, "Bob", "bob@example.com")
}

// =============================================================================
// Admission
// =============================================================================

#[tokio::test]
async fn no_locks_dispatches_with_remote_exclusion() {
    let harness = Harness::new(ScriptedScanner::default().with("abc123", &["a.bin"]), vec![]);

    let outcome = harness
        .run("origin", "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    match outcome {
        HookOutcome::Admitted {
            dispatched,
            uploaded,
            owned_locks,
        } => {
            assert_eq!(dispatched, 1);
            assert_eq!(uploaded, 1);
            assert!(owned_locks.is_empty());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let scanned = harness.scanner.scanned();
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].local_revision, "abc123");
    assert_eq!(scanned[0].remote_revision.as_deref(), Some("^def456"));
    assert_eq!(harness.uploader.uploaded().len(), 1);
}

#[tokio::test]
async fn every_clean_update_is_dispatched_once() {
    let scanner = ScriptedScanner::default()
        .with("aaa", &["one.bin", "two.bin"])
        .with("bbb", &["three.bin"]);
    let harness = Harness::new(scanner, vec![alice_lock("unrelated.psd")]);

    let outcome = harness
        .run(
            "origin",
            "refs/heads/a aaa refs/heads/a 111\n\nrefs/heads/b bbb refs/heads/b 222\n",
        )
        .await;

    match outcome {
        HookOutcome::Admitted {
            dispatched,
            uploaded,
            ..
        } => {
            assert_eq!(dispatched, 2);
            assert_eq!(uploaded, 3);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(harness.uploader.attempts().len(), 3);
}

#[tokio::test]
async fn own_locks_are_reported_not_rejected() {
    let harness = Harness::new(
        ScriptedScanner::default().with("abc123", &["mine.psd", "free.bin"]),
        vec![bob_lock("mine.psd")],
    );

    let outcome = harness
        .run("origin", "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    match outcome {
        HookOutcome::Admitted { owned_locks, .. } => assert_eq!(owned_locks, vec!["mine.psd"]),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn empty_input_is_admitted() {
    let harness = Harness::new(ScriptedScanner::default(), vec![]);
    let outcome = harness.run("origin", "").await;
    assert!(outcome.is_admitted());
    assert_eq!(outcome.exit_code(), 0);
}

// =============================================================================
// Deletions and malformed lines
// =============================================================================

#[tokio::test]
async fn deletion_is_never_scanned_or_dispatched() {
    let harness = Harness::new(
        ScriptedScanner::default().with(NULL, &["big.psd"]),
        vec![alice_lock("big.psd")],
    );

    let input = format!("refs/heads/topic {} refs/heads/topic def456\n", NULL);
    let outcome = harness.run("origin", &input).await;

    match outcome {
        HookOutcome::Admitted { dispatched, .. } => assert_eq!(dispatched, 0),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(harness.scanner.scanned().is_empty());
    assert!(harness.uploader.attempts().is_empty());
}

#[tokio::test]
async fn deletion_then_push_processes_next_line() {
    let harness = Harness::new(ScriptedScanner::default().with("abc123", &["a.bin"]), vec![]);

    let input = format!(
        "refs/heads/old {} refs/heads/old 999\nrefs/heads/main abc123 refs/heads/main def456\n",
        NULL
    );
    let outcome = harness.run("origin", &input).await;

    match outcome {
        HookOutcome::Admitted { dispatched, .. } => assert_eq!(dispatched, 1),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn single_token_line_is_skipped() {
    let harness = Harness::new(ScriptedScanner::default(), vec![]);
    let outcome = harness.run("origin", "garbage\n").await;
    assert!(outcome.is_admitted());
    assert!(harness.scanner.scanned().is_empty());
}

// =============================================================================
// Conflicts
// =============================================================================

#[tokio::test]
async fn locked_by_someone_else_rejects() {
    let harness = Harness::new(
        ScriptedScanner::default().with("abc123", &["big.psd"]),
        vec![alice_lock("big.psd")],
    );

    let outcome = harness
        .run("origin", "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    assert_eq!(outcome.exit_code(), 1);
    match outcome {
        HookOutcome::Rejected {
            local_revision,
            remote,
            conflicts,
        } => {
            assert_eq!(local_revision, "abc123");
            assert_eq!(remote, "origin");
            assert_eq!(conflicts, vec!["big.psd"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(harness.uploader.attempts().is_empty());
}

#[tokio::test]
async fn conflict_on_second_line_reports_only_that_line() {
    let scanner = ScriptedScanner::default()
        .with("aaa", &["clean.bin"])
        .with("bbb", &["big.psd", "other.psd"])
        .with("ccc", &["never.psd"]);
    let harness = Harness::new(
        scanner,
        vec![alice_lock("big.psd"), alice_lock("other.psd"), alice_lock("never.psd")],
    );

    let outcome = harness
        .run(
            "origin",
            "refs/heads/a aaa refs/heads/a 111\n\
             refs/heads/b bbb refs/heads/b 222\n\
             refs/heads/c ccc refs/heads/c 333\n",
        )
        .await;

    match outcome {
        HookOutcome::Rejected {
            local_revision,
            conflicts,
            ..
        } => {
            assert_eq!(local_revision, "bbb");
            assert_eq!(conflicts, vec!["big.psd", "other.psd"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // Reading stops at the conflicting line
    let scanned: Vec<String> = harness
        .scanner
        .scanned()
        .into_iter()
        .map(|u| u.local_revision)
        .collect();
    assert_eq!(scanned, vec!["aaa", "bbb"]);

    // Nothing from the conflicting update was handed to the uploader
    assert!(harness
        .uploader
        .attempts()
        .iter()
        .all(|(_, name)| name.starts_with("aaa-")));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn missing_remote_fails_before_registry() {
    let harness = Harness::new(ScriptedScanner::default(), vec![]);
    let outcome = harness.run("", "refs/heads/main abc123 refs/heads/main def456\n").await;

    assert!(matches!(outcome, HookOutcome::Failed(HookError::MissingRemote)));
    assert!(harness.locks.searches().is_empty());
}

#[tokio::test]
async fn invalid_remote_fails_before_registry() {
    let harness = Harness::new(ScriptedScanner::default(), vec![]);
    let outcome = harness.run("nope", "").await;

    match outcome {
        HookOutcome::Failed(HookError::InvalidRemote(name)) => assert_eq!(name, "nope"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(harness.locks.searches().is_empty());
}

#[tokio::test]
async fn invalid_remote_is_reported_before_missing_registry() {
    let harness = Harness::new(ScriptedScanner::default(), vec![]);
    let unavailable = Err(HookError::LockSystem("no endpoint".into()));

    let outcome = harness
        .run_with("nope", unavailable, "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    match outcome {
        HookOutcome::Failed(HookError::InvalidRemote(name)) => assert_eq!(name, "nope"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn missing_registry_fails_valid_remote() {
    let harness = Harness::new(ScriptedScanner::default().with("abc123", &["a.bin"]), vec![]);
    let unavailable = Err(HookError::LockSystem("no endpoint".into()));

    let outcome = harness
        .run_with("origin", unavailable, "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    match outcome {
        HookOutcome::Failed(HookError::LockSystem(message)) => assert_eq!(message, "no endpoint"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(harness.scanner.scanned().is_empty());
    assert!(harness.uploader.attempts().is_empty());
}

#[tokio::test]
async fn registry_failure_is_not_an_empty_lock_set() {
    let mut harness = Harness::new(ScriptedScanner::default().with("abc123", &["a.bin"]), vec![]);
    harness.locks = MockLockClient::new().fail_with(LockError::AuthFailed("expired".into()));

    let outcome = harness
        .run("origin", "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    assert!(matches!(
        outcome,
        HookOutcome::Failed(HookError::Registry(LockError::AuthFailed(_)))
    ));
    assert!(harness.scanner.scanned().is_empty());
    assert!(harness.uploader.attempts().is_empty());
}

#[tokio::test]
async fn exactly_one_registry_query_per_run() {
    let scanner = ScriptedScanner::default()
        .with("aaa", &["one.bin"])
        .with("bbb", &["two.bin"]);
    let harness = Harness::new(scanner, vec![]);

    harness
        .run(
            "origin",
            "refs/heads/a aaa refs/heads/a 111\nrefs/heads/b bbb refs/heads/b 222\n",
        )
        .await;

    assert_eq!(harness.locks.searches().len(), 1);
}

#[tokio::test]
async fn upload_failure_fails_after_drain() {
    let mut harness = Harness::new(
        ScriptedScanner::default().with("abc123", &["good.bin", "bad.bin"]),
        vec![],
    );
    harness.uploader = MockUploader::new().fail_on("abc123-bad.bin");

    let outcome = harness
        .run("origin", "refs/heads/main abc123 refs/heads/main def456\n")
        .await;

    assert_eq!(outcome.exit_code(), 1);
    match outcome {
        HookOutcome::Failed(HookError::Upload(failures)) => {
            assert_eq!(failures.len(), 1);
            match &failures[0] {
                DispatchFailure::Upload {
                    local_revision,
                    object,
                    ..
                } => {
                    assert_eq!(local_revision, "abc123");
                    assert_eq!(object.path, "bad.bin");
                }
                other => panic!("unexpected failure: {:?}", other),
            }
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    // The good object still finished
    assert_eq!(harness.uploader.uploaded().len(), 1);
}

#[tokio::test]
async fn duplicate_lock_paths_fail_the_run() {
    let harness = Harness::new(
        ScriptedScanner::default(),
        vec![alice_lock("big.psd"), bob_lock("big.psd")],
    );

    let outcome = harness.run("origin", "").await;

    match outcome {
        HookOutcome::Failed(err @ HookError::DuplicateLock(_)) => {
            assert!(err.to_string().contains("big.psd"))
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}
