mod common;

use std::sync::atomic::Ordering;

use chrono::NaiveDate;
use client::{
    pages::{ComposeError, PLACEHOLDER, reports::MESSAGE_SENT},
    pagination::FetchOutcome,
};
use shared::models::MessageFilters;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

#[tokio::test]
async fn test_users_first_page_summary() {
    let (app, _state, _store) = common::signed_in().await;
    let page = app.users();

    assert_eq!(page.open().await.unwrap(), FetchOutcome::Applied);

    let list = page.list();
    assert_eq!(list.items().len(), 20);
    assert_eq!(list.summary(), "20 of 25");
    assert!(list.can_next());
    assert!(!list.can_previous());
}

#[tokio::test]
async fn test_users_next_page_replaces_rows() {
    let (app, _state, _store) = common::signed_in().await;
    let page = app.users();
    page.open().await.unwrap();

    assert_eq!(page.list().next().await.unwrap(), FetchOutcome::Applied);

    let list = page.list();
    let names: Vec<_> = list.items().into_iter().map(|u| u.username).collect();
    assert_eq!(names, ["user21", "user22", "user23", "user24", "user25"]);
    assert_eq!(list.summary(), "5 of 25");
    assert!(!list.can_next());
    assert!(list.can_previous());
    assert_eq!(list.items()[4].email_or_dash(), "-");

    assert_eq!(list.previous().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(list.page_index(), 1);
    assert_eq!(list.items().len(), 20);
}

#[tokio::test]
async fn test_users_fetch_failure_clears_page() {
    let (app, _state, _store) = common::signed_in().await;
    let page = app.users();
    page.open().await.unwrap();

    assert!(page.list().fetch_page(7).await.is_err());
    assert!(page.list().items().is_empty());
    assert!(!page.list().can_next());
    assert!(app.session().is_authenticated());
}

#[tokio::test]
async fn test_reports_search_sends_date_filters() {
    let (app, state, _store) = common::signed_in().await;
    let reports = app.reports();

    reports
        .search(MessageFilters::between(Some(date(5)), Some(date(10))))
        .await
        .unwrap();

    let ids: Vec<_> = reports.list().items().iter().map(|m| m.id).collect();
    assert_eq!(ids, [5, 6, 7, 8, 9, 10]);
    assert_eq!(reports.summary(), "Showing 6 of 6 results");

    let queries = state.message_queries.lock().unwrap();
    let sent = queries.last().unwrap();
    assert_eq!(sent.get("page").map(String::as_str), Some("1"));
    assert_eq!(sent.get("from_date").map(String::as_str), Some("2024-01-05"));
    assert_eq!(sent.get("to_date").map(String::as_str), Some("2024-01-10"));
}

#[tokio::test]
async fn test_reports_search_without_filters_omits_params() {
    let (app, state, _store) = common::signed_in().await;
    let reports = app.reports();

    reports.search(MessageFilters::default()).await.unwrap();

    assert_eq!(reports.summary(), "Showing 20 of 30 results");
    let queries = state.message_queries.lock().unwrap();
    let sent = queries.last().unwrap();
    assert!(!sent.contains_key("from_date"));
    assert!(!sent.contains_key("to_date"));
}

#[tokio::test]
async fn test_reports_paging_keeps_filters() {
    let (app, state, _store) = common::signed_in().await;
    let reports = app.reports();
    reports
        .search(MessageFilters::between(Some(date(2)), None))
        .await
        .unwrap();

    reports.list().next().await.unwrap();

    assert_eq!(reports.list().page_index(), 2);
    assert_eq!(reports.summary(), "Showing 9 of 29 results");
    let queries = state.message_queries.lock().unwrap();
    assert_eq!(
        queries.last().unwrap().get("from_date").map(String::as_str),
        Some("2024-01-02")
    );
}

#[tokio::test]
async fn test_delete_own_message_removes_row_keeps_total() {
    let (app, _state, _store) = common::signed_in().await;
    let reports = app.reports();
    reports.search(MessageFilters::default()).await.unwrap();

    reports.delete(4).await.unwrap();

    let items = reports.list().items();
    assert_eq!(items.len(), 19);
    assert!(items.iter().all(|m| m.id != 4));
    assert_eq!(reports.list().total_count(), 30);
}

#[tokio::test]
async fn test_delete_forbidden_keeps_row() {
    let (app, _state, _store) = common::signed_in().await;
    let reports = app.reports();
    reports.search(MessageFilters::default()).await.unwrap();

    let err = reports.delete(3).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "You do not have permission to delete this message."
    );
    assert!(err.source.is_forbidden());
    assert!(reports.list().items().iter().any(|m| m.id == 3));
    assert_eq!(reports.list().items().len(), 20);
    assert!(app.session().is_authenticated());
}

#[tokio::test]
async fn test_send_empty_message_is_not_sent() {
    let (app, state, _store) = common::signed_in().await;
    let reports = app.reports();

    let err = reports.send_message("   ").await.unwrap_err();

    assert!(matches!(err, ComposeError::Empty));
    assert_eq!(err.to_string(), "Message cannot be empty.");
    assert_eq!(state.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_send_message_refreshes_current_page() {
    let (app, _state, _store) = common::signed_in().await;
    let reports = app.reports();
    reports
        .search(MessageFilters::between(Some(date(25)), None))
        .await
        .unwrap();
    assert_eq!(reports.list().total_count(), 6);

    let confirmation = reports.send_message("hello from the tests").await.unwrap();

    assert_eq!(confirmation, MESSAGE_SENT);
    assert_eq!(reports.list().total_count(), 7);
    assert!(
        reports
            .list()
            .items()
            .iter()
            .any(|m| m.text == "hello from the tests" && m.author == "alice")
    );
}

#[tokio::test]
async fn test_send_message_failure_reports_retry() {
    let (app, state, _store) = common::signed_in().await;
    state.fail_create.store(true, Ordering::SeqCst);

    let err = app.reports().send_message("hi").await.unwrap_err();

    assert!(matches!(err, ComposeError::Rejected(_)));
    assert_eq!(err.to_string(), "Failed to send message. Please try again.");
}

#[tokio::test]
async fn test_dashboard_stats_and_greeting() {
    let (app, _state, _store) = common::signed_in().await;
    let dashboard = app.dashboard();

    let stats = dashboard.load().await.unwrap();

    assert_eq!(stats.total_users, 25);
    assert_eq!(dashboard.greeting(), "Welcome back, alice!");
    let cards = dashboard.cards();
    assert_eq!(cards[0], ("Total Users", "25".to_string()));
    assert_eq!(cards[2], ("Month Messages", "30".to_string()));
}

#[tokio::test]
async fn test_dashboard_stats_failure_shows_placeholder() {
    let (app, state, _store) = common::signed_in().await;
    state.fail_stats.store(true, Ordering::SeqCst);
    let dashboard = app.dashboard();

    assert!(dashboard.load().await.is_none());

    assert!(dashboard.stats().is_none());
    assert!(dashboard.cards().iter().all(|(_, value)| value == PLACEHOLDER));
    assert!(app.session().is_authenticated());
}

#[tokio::test]
async fn test_reports_search_can_open_later_page() {
    let (app, state, _store) = common::signed_in().await;
    let reports = app.reports();

    reports
        .search_page(MessageFilters::default(), 2)
        .await
        .unwrap();

    assert_eq!(reports.list().page_index(), 2);
    assert_eq!(reports.summary(), "Showing 10 of 30 results");
    assert_eq!(state.message_queries.lock().unwrap().len(), 1);
}
