//! Property-based tests for ref-update decoding and pointer parsing.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use lfsgate::core::objects::Pointer;
use lfsgate::core::refs::RefUpdate;
use lfsgate::core::types::Oid;

/// Strategy for ref names like `refs/heads/feature-1`.
fn ref_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}".prop_map(|name| format!("refs/heads/{}", name))
}

/// Strategy for 40-character hex revisions.
fn sha1() -> impl Strategy<Value = String> {
    "[0-9a-f]{40}"
}

/// Strategy for arbitrary single-line text.
fn any_line() -> impl Strategy<Value = String> {
    "[^\n\r]{0,120}"
}

proptest! {
    #[test]
    fn decode_is_pure(line in any_line()) {
        prop_assert_eq!(RefUpdate::decode(&line), RefUpdate::decode(&line));
    }

    #[test]
    fn decode_extracts_local_and_excluded_remote(
        local_ref in ref_name(),
        local in sha1(),
        remote_ref in ref_name(),
        remote in sha1(),
    ) {
        let line = format!("{} {} {} {}", local_ref, local, remote_ref, remote);
        let update = RefUpdate::decode(&line);

        prop_assert_eq!(&update.local_revision, &local);
        prop_assert_eq!(update.remote_revision.clone(), Some(format!("^{}", remote)));
        prop_assert!(!update.is_empty());
    }

    #[test]
    fn decode_ignores_surrounding_whitespace(
        local_ref in ref_name(),
        local in sha1(),
        remote_ref in ref_name(),
        remote in sha1(),
        pad in "[ \t]{0,4}",
    ) {
        let line = format!("{} {} {} {}", local_ref, local, remote_ref, remote);
        let padded = format!("{}{}{}", pad, line, pad);
        prop_assert_eq!(RefUpdate::decode(&padded), RefUpdate::decode(&line));
    }

    #[test]
    fn three_tokens_have_no_remote(local_ref in ref_name(), local in sha1(), remote_ref in ref_name()) {
        let update = RefUpdate::decode(&format!("{} {} {}", local_ref, local, remote_ref));
        prop_assert_eq!(update.local_revision, local);
        prop_assert_eq!(update.remote_revision, None);
    }

    #[test]
    fn single_token_is_empty(token in "[^ \t\n\r]{0,40}") {
        prop_assert!(RefUpdate::decode(&token).is_empty());
    }

    #[test]
    fn only_the_null_revision_is_a_deletion(local in sha1(), remote in sha1()) {
        let update = RefUpdate::decode(&format!("refs/heads/a {} refs/heads/a {}", local, remote));
        prop_assert_eq!(update.is_deletion(), local == Oid::NULL_SHA1);
    }

    #[test]
    fn pointers_parse_their_own_fields(
        oid in "[0-9a-f]{64}",
        size in 0u64..u64::MAX,
    ) {
        let text = format!(
            "version https://git-lfs.github.com/spec/v1\noid sha256:{}\nsize {}\n",
            oid, size
        );
        let pointer = Pointer::parse(&text).unwrap();
        prop_assert_eq!(pointer.oid.as_str(), oid.as_str());
        prop_assert_eq!(pointer.size, size);
    }
}
