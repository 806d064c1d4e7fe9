//! Integration tests for full session workflows.
//!
//! These exercise the engine the way a host HTTP layer would: create on
//! first request, reconstruct from the replayed cookie, persist at end of
//! request, destroy on logout.

use filesession::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UserProfile {
    id: u64,
    name: String,
    admin: bool,
}

impl Record for UserProfile {
    const TYPE_NAME: &'static str = "tests::UserProfile";
}

/// Build the request a client would send after receiving `session`'s cookie.
fn replay_request(session: &Session) -> HttpRequest {
    HttpRequest::new().with_header("Cookie", format!("{}={}", COOKIE_NAME, session.id()))
}

// =============================================================================
// Persist / reconstruct symmetry
// =============================================================================

#[tokio::test]
async fn test_persist_then_reconstruct_returns_stored_values() {
    let mut res = HttpResponse::ok();
    let mut session = Session::create(&mut res, CookieOptions::new().with_path("/"))
        .await
        .unwrap();

    session.set("k", "v");
    session.set("visits", 3);
    session.persist().await.unwrap();

    let restored = Session::reconstruct(&replay_request(&session))
        .await
        .unwrap();

    assert_eq!(restored.id(), session.id());
    assert_eq!(restored.get("k").unwrap().as_str(), Some("v"));
    assert_eq!(restored.get("visits").unwrap().as_int(), Some(3));

    let mut res = HttpResponse::ok();
    restored.destroy(&mut res).await.unwrap();
}

#[tokio::test]
async fn test_records_survive_the_full_lifecycle() {
    filesession::codec::register::<UserProfile>();

    let profile = UserProfile {
        id: 1001,
        name: "John Doe".into(),
        admin: false,
    };

    let mut res = HttpResponse::ok();
    let mut session = Session::create(&mut res, CookieOptions::default())
        .await
        .unwrap();

    session.set_record("profile", &profile).unwrap();
    session.set("auth", true);
    session.persist().await.unwrap();

    let restored = Session::reconstruct(&replay_request(&session))
        .await
        .unwrap();

    assert_eq!(
        restored.get_record::<UserProfile>("profile").unwrap(),
        Some(profile)
    );
    assert_eq!(restored.get("auth").unwrap().as_bool(), Some(true));
    assert_eq!(restored.get_record::<UserProfile>("absent").unwrap(), None);

    let mut res = HttpResponse::ok();
    restored.destroy(&mut res).await.unwrap();
}

#[tokio::test]
async fn test_mutate_persist_alternation_keeps_latest_state() {
    let mut res = HttpResponse::ok();
    let mut session = Session::create(&mut res, CookieOptions::default())
        .await
        .unwrap();

    session.set("step", 1);
    session.persist().await.unwrap();

    session.set("step", 2);
    session.remove("missing");
    session.persist().await.unwrap();

    let restored = Session::reconstruct(&replay_request(&session))
        .await
        .unwrap();
    assert_eq!(restored.get("step").unwrap().as_int(), Some(2));

    let mut res = HttpResponse::ok();
    restored.destroy(&mut res).await.unwrap();
}

// =============================================================================
// Destroy finality
// =============================================================================

#[tokio::test]
async fn test_destroy_is_terminal() {
    let mut res = HttpResponse::ok();
    let mut session = Session::create(&mut res, CookieOptions::default())
        .await
        .unwrap();

    session.set("k", "v");
    session.persist().await.unwrap();

    let file_path = session.file_path().to_path_buf();
    let replay = replay_request(&session);

    let mut res = HttpResponse::ok();
    session.destroy(&mut res).await.unwrap();

    assert!(!file_path.exists());

    let err = Session::reconstruct(&replay).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_double_destroy_surfaces_not_found() {
    let mut res = HttpResponse::ok();
    let session = Session::create(&mut res, CookieOptions::default())
        .await
        .unwrap();
    session.persist().await.unwrap();

    // Simulate a second handler holding its own handle to the same session.
    let duplicate = Session::reconstruct(&replay_request(&session))
        .await
        .unwrap();

    let mut res = HttpResponse::ok();
    session.destroy(&mut res).await.unwrap();

    let mut res = HttpResponse::ok();
    let err = duplicate.destroy(&mut res).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));
}

// =============================================================================
// Storage namespace containment
// =============================================================================

#[tokio::test]
async fn test_traversal_shaped_cookie_cannot_escape_namespace() {
    // A decodable session blob sitting outside the gosession_ namespace,
    // plus a directory inside it that a dot-dot segment could pivot on.
    let mut res = HttpResponse::ok();
    let mut session = Session::create(&mut res, CookieOptions::default())
        .await
        .unwrap();
    session.set("k", "v");
    session.persist().await.unwrap();

    let victim = std::path::Path::new("/tmp/filesession_victim_blob");
    std::fs::copy(session.file_path(), victim).unwrap();
    let pivot = std::path::Path::new("/tmp/gosession_pivot");
    std::fs::create_dir_all(pivot).unwrap();

    let req = HttpRequest::new().with_header(
        "Cookie",
        format!("{}=pivot/../../tmp/filesession_victim_blob", COOKIE_NAME),
    );
    let err = Session::reconstruct(&req).await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));

    // The out-of-namespace file was neither read into a session nor removed.
    assert!(victim.exists());

    std::fs::remove_file(victim).unwrap();
    std::fs::remove_dir(pivot).unwrap();
    let mut res = HttpResponse::ok();
    session.destroy(&mut res).await.unwrap();
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_persists_leave_a_decodable_file() {
    let mut res = HttpResponse::ok();
    let session = Session::create(&mut res, CookieOptions::default())
        .await
        .unwrap();

    // Two handlers for overlapping requests mutate diverging copies of the
    // same identifier's state and persist simultaneously.
    for round in 0..50i64 {
        let mut a = session.clone();
        let mut b = session.clone();

        a.set("winner", "a");
        a.set("round", round);
        a.set("padding", "x".repeat(4096));

        b.set("winner", "b");
        b.set("round", round);

        let (ra, rb) = tokio::join!(a.persist(), b.persist());
        ra.unwrap();
        rb.unwrap();

        // Whichever write won, the file must decode cleanly.
        let restored = Session::reconstruct(&replay_request(&session))
            .await
            .unwrap();
        let winner = restored.get("winner").unwrap().as_str().unwrap();
        assert!(winner == "a" || winner == "b");
        assert_eq!(restored.get("round").unwrap().as_int(), Some(round));
    }

    let mut res = HttpResponse::ok();
    session.destroy(&mut res).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_sessions_do_not_interfere() {
    let mut res = HttpResponse::ok();

    let mut handles = Vec::new();
    for n in 0..16i64 {
        let mut session = Session::create(&mut res, CookieOptions::default())
            .await
            .unwrap();
        handles.push(tokio::spawn(async move {
            session.set("n", n);
            session.persist().await.unwrap();

            let replay = HttpRequest::new()
                .with_header("Cookie", format!("{}={}", COOKIE_NAME, session.id()));
            let restored = Session::reconstruct(&replay).await.unwrap();
            assert_eq!(restored.get("n").unwrap().as_int(), Some(n));

            let mut res = HttpResponse::ok();
            restored.destroy(&mut res).await.unwrap();
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

// =============================================================================
// Cookie round-trip
// =============================================================================

#[tokio::test]
async fn test_presented_cookie_attributes_are_kept() {
    let mut res = HttpResponse::ok();
    let mut session = Session::create(
        &mut res,
        CookieOptions::new()
            .with_path("/app")
            .with_domain("example.com")
            .with_http_only(true),
    )
    .await
    .unwrap();

    session.set("k", "v");
    session.persist().await.unwrap();

    // A non-browser client that echoes the attribute fragments back.
    let header = res.headers.get("Set-Cookie").unwrap().clone();
    let req = HttpRequest::new().with_header("Cookie", header);

    let restored = Session::reconstruct(&req).await.unwrap();
    assert_eq!(restored.options().path, "/app");
    assert_eq!(restored.options().domain, "example.com");
    assert!(restored.options().http_only);

    let mut res = HttpResponse::ok();
    restored.destroy(&mut res).await.unwrap();
}
