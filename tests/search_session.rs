mod common;

use common::{drain, repo, FakeBackend, FakeSearch};
use repo_bookmarks::actors::SearchSessionConfig;
use repo_bookmarks::error::BookmarksError;
use repo_bookmarks::notice::{notice_channel, Notice, NoticeReceiver};
use repo_bookmarks::session::Session;
use repo_bookmarks::store::Toggle;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_test::assert_ok;

async fn start(search: Arc<FakeSearch>) -> (Session, NoticeReceiver) {
    start_with_backend(search, Arc::new(FakeBackend::default())).await
}

async fn start_with_backend(
    search: Arc<FakeSearch>,
    backend: Arc<FakeBackend>,
) -> (Session, NoticeReceiver) {
    let (tx, rx) = notice_channel();
    let session = Session::start(SearchSessionConfig::default(), backend, search, tx)
        .await
        .expect("Failed to start session");
    (session, rx)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn test_burst_within_debounce_dispatches_once() {
    let search = Arc::new(FakeSearch::default());
    let (session, _rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("r"));
    sleep(ms(100)).await;
    assert_ok!(session.text_changed("re"));
    sleep(ms(300)).await;
    assert_ok!(session.text_changed("rea"));
    sleep(ms(2000)).await;

    assert_eq!(search.queries(), vec!["rea"]);

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.query, "rea");
    assert!(!snapshot.loading);
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].full_name, "rea");
    assert_eq!(snapshot.search_count, 1);

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_pause_longer_than_debounce_dispatches_each_burst() {
    let search = Arc::new(FakeSearch::default());
    let (session, _rx) = start(search.clone()).await;

    // "re" is quiet for 600ms before "rea" arrives, so it goes out on its own
    assert_ok!(session.text_changed("r"));
    sleep(ms(100)).await;
    assert_ok!(session.text_changed("re"));
    sleep(ms(600)).await;
    assert_ok!(session.text_changed("rea"));
    sleep(ms(2000)).await;

    assert_eq!(search.queries(), vec!["re", "rea"]);
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.results[0].full_name, "rea");
    assert_eq!(snapshot.search_count, 2);

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_text_change_marks_loading() {
    let search = Arc::new(FakeSearch::default());
    let (session, _rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("tokio"));
    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.loading);
    assert_eq!(snapshot.query, "tokio");
    assert_eq!(snapshot.search_count, 0);
    assert!(search.queries().is_empty());

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_submit_bypasses_debounce() {
    let search = Arc::new(FakeSearch::default());
    let (session, mut rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("rust"));
    assert_ok!(session.submit());
    sleep(ms(10)).await;
    assert_eq!(search.queries(), vec!["rust"]);

    // The pending debounced call was replaced, not sent a second time
    sleep(ms(2000)).await;
    assert_eq!(search.queries(), vec!["rust"]);
    assert!(drain(&mut rx).contains(&Notice::ResultsUpdated {
        query: "rust".to_string(),
        count: 1
    }));

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_eleventh_search_triggers_rate_banner() {
    let search = Arc::new(FakeSearch::default());
    let (session, mut rx) = start(search.clone()).await;

    for i in 0..10 {
        assert_ok!(session.text_changed(format!("q{}", i)));
        assert_ok!(session.submit());
    }
    sleep(ms(50)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.search_count, 10);
    assert!(!snapshot.rate_limited);
    assert!(!drain(&mut rx)
        .iter()
        .any(|n| matches!(n, Notice::RateLimited { .. })));

    assert_ok!(session.text_changed("q10"));
    assert_ok!(session.submit());
    sleep(ms(50)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.search_count, 11);
    assert!(snapshot.rate_limited);
    let banners: Vec<Notice> = drain(&mut rx)
        .into_iter()
        .filter(|n| matches!(n, Notice::RateLimited { .. }))
        .collect();
    assert_eq!(banners.len(), 1);

    // Advisory only: the request still went out
    assert_eq!(search.queries().len(), 11);

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let search = Arc::new(
        FakeSearch::default()
            .with_delay("slow", ms(300))
            .with_delay("fast", ms(10)),
    );
    let (session, mut rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("slow"));
    assert_ok!(session.submit());
    sleep(ms(50)).await;
    assert_ok!(session.text_changed("fast"));
    assert_ok!(session.submit());
    sleep(ms(1000)).await;

    assert_eq!(search.queries(), vec!["slow", "fast"]);

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.latest_seq, 2);
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].full_name, "fast");
    assert!(!snapshot.loading);

    let updates: Vec<Notice> = drain(&mut rx)
        .into_iter()
        .filter(|n| matches!(n, Notice::ResultsUpdated { .. }))
        .collect();
    assert_eq!(
        updates,
        vec![Notice::ResultsUpdated {
            query: "fast".to_string(),
            count: 1
        }]
    );

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_keeps_previous_results() {
    let search = Arc::new(FakeSearch::default().failing_on("boom"));
    let (session, mut rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("ok"));
    sleep(ms(600)).await;
    assert_ok!(session.text_changed("boom"));
    sleep(ms(600)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.query, "boom");
    assert!(!snapshot.loading);
    assert_eq!(snapshot.results[0].full_name, "ok");

    // Only the successful search reaches the screen; the failure is log-only
    assert_eq!(
        drain(&mut rx),
        vec![Notice::ResultsUpdated {
            query: "ok".to_string(),
            count: 1
        }]
    );

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_text_change_at_quota_does_not_alert() {
    let search = Arc::new(FakeSearch::default());
    let (session, mut rx) = start(search.clone()).await;

    for i in 0..10 {
        assert_ok!(session.text_changed(format!("q{}", i)));
        assert_ok!(session.submit());
    }
    sleep(ms(50)).await;
    drain(&mut rx);

    // At the quota but not over it: typing alone raises no banner
    assert_ok!(session.text_changed("q10"));
    assert_ok!(session.text_changed("q10x"));
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.search_count, 10);
    assert!(drain(&mut rx).is_empty());

    session.shutdown();
}

#[tokio::test]
async fn test_load_after_shutdown_reports_actor_error() {
    let (session, mut rx) = start(Arc::new(FakeSearch::default())).await;
    session.shutdown();
    common::settle().await;

    // No LoadFailed notice is raised here, so callers must log the error themselves
    assert!(matches!(
        session.load_bookmarks().await,
        Err(BookmarksError::ActorError(_))
    ));
    assert!(!drain(&mut rx)
        .iter()
        .any(|n| matches!(n, Notice::LoadFailed { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_window_ticks_and_resets() {
    let search = Arc::new(FakeSearch::default());
    let (session, _rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("rust"));
    // Dispatch at ~0.5s restarts the window clock
    sleep(ms(30_200)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.search_count, 1);
    assert_eq!(snapshot.seconds_remaining, 30);

    sleep(ms(30_200)).await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.search_count, 1);
    assert_eq!(snapshot.seconds_remaining, 0);

    sleep(ms(1000)).await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.search_count, 0);
    assert_eq!(snapshot.seconds_remaining, 60);

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_search() {
    let search = Arc::new(FakeSearch::default());
    let (session, _rx) = start(search.clone()).await;

    assert_ok!(session.text_changed("never"));
    sleep(ms(100)).await;
    session.shutdown();
    sleep(ms(2000)).await;

    assert!(search.queries().is_empty());
    assert!(matches!(
        session.snapshot().await,
        Err(BookmarksError::ActorError(_))
    ));
}

#[tokio::test]
async fn test_session_bookmark_operations() {
    let backend = Arc::new(FakeBackend::with_repos(vec![repo("a", 5), repo("b", 1)]));
    let (session, mut rx) =
        start_with_backend(Arc::new(FakeSearch::default()), backend.clone()).await;

    assert_eq!(session.load_bookmarks().await.unwrap(), 2);
    assert!(session.is_saved("a").await.unwrap());

    assert_eq!(session.save(repo("c", 9)).await.unwrap(), 3);
    assert_eq!(session.toggle(repo("b", 1)).await.unwrap(), Toggle::Removed);
    assert!(session.remove("a").await.unwrap());

    session.save(repo("d", 2)).await.unwrap();
    session
        .sort(Some(repo_bookmarks::models::SortDirection::Ascending))
        .await
        .unwrap();
    let ids: Vec<String> = session
        .bookmarks()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["d", "c"]);

    common::settle().await;
    assert_eq!(backend.created_ids(), vec!["c", "d"]);
    assert_eq!(backend.deleted_ids(), vec!["b", "a"]);
    assert!(drain(&mut rx).contains(&Notice::BookmarksLoaded { count: 2 }));

    session.shutdown();
}
