//! End-to-end store behavior over HTTP.

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tasklist_sync::logging::init_tracing;
use tasklist_sync::{
    ChannelNotifier, HttpTaskService, Notification, Position, Severity, TaskId, TaskListStore,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

type Store = TaskListStore<HttpTaskService, ChannelNotifier>;

async fn server_with_tasks() -> ServerGuard {
    init_tracing("tasklist_sync=debug");

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "tasks": [
                    { "entity_id": "1", "title": "Plan", "completed": true },
                    { "entity_id": "2", "title": "Build", "completed": false },
                    { "entity_id": "3", "title": "Test", "completed": true }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
}

async fn loaded_store(server: &ServerGuard) -> (Store, UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut store = TaskListStore::new(HttpTaskService::new(&server.url()), ChannelNotifier::new(tx))
        .with_position(Position::Top);
    store.fetch_all().await;
    (store, rx)
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut seen = Vec::new();
    while let Ok(n) = rx.try_recv() {
        seen.push(n);
    }
    seen
}

#[tokio::test]
async fn test_fetch_then_views() {
    let server = server_with_tasks().await;
    let (store, mut rx) = loaded_store(&server).await;

    let ids: Vec<&str> = store.all_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(store.active_count(), 1);
    assert_eq!(store.completed_count(), 2);
    assert!(!store.are_all_completed());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_toggle_rolls_back_on_server_error() {
    let mut server = server_with_tasks().await;
    server
        .mock("PUT", "/tasks/2")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let (mut store, mut rx) = loaded_store(&server).await;
    let id = TaskId::from("2");

    store.set_completed(&id, true);
    let task = store.get(&id).cloned().unwrap();
    assert!(!store.toggle(&task).await);

    assert!(!store.get(&id).unwrap().completed);
    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].severity, Severity::Negative);
    assert_eq!(seen[0].message, "Failed to update task");
}

#[tokio::test]
async fn test_toggle_all_completes_everything() {
    let mut server = server_with_tasks().await;
    let put = server
        .mock("PUT", "/tasks/2")
        .match_body(Matcher::Json(json!({ "completed": true })))
        .with_status(200)
        .with_body(
            json!({ "success": true, "task": { "entity_id": "2", "title": "Build", "completed": true } })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let (mut store, _rx) = loaded_store(&server).await;

    assert!(store.toggle_all(true).await);

    put.assert_async().await;
    assert!(store.are_all_completed());
}

#[tokio::test]
async fn test_clear_completed_keeps_tasks_whose_delete_failed() {
    let mut server = server_with_tasks().await;
    server
        .mock("DELETE", "/tasks/1")
        .with_status(200)
        .with_body(json!({ "success": true }).to_string())
        .create_async()
        .await;
    server
        .mock("DELETE", "/tasks/3")
        .with_status(200)
        .with_body(json!({ "success": false }).to_string())
        .create_async()
        .await;
    let (mut store, mut rx) = loaded_store(&server).await;

    assert!(!store.clear_completed().await);

    let ids: Vec<&str> = store.all_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);
    let messages: Vec<String> = drain(&mut rx).into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        vec!["Task deleted successfully", "Failed to delete task"]
    );
}

#[tokio::test]
async fn test_add_blank_title_never_reaches_server() {
    let mut server = server_with_tasks().await;
    let post = server
        .mock("POST", "/tasks")
        .expect(0)
        .create_async()
        .await;
    let (mut store, mut rx) = loaded_store(&server).await;

    assert!(store.add("    ").await.is_none());

    post.assert_async().await;
    assert_eq!(store.all_tasks().len(), 3);
    assert!(drain(&mut rx).is_empty());
}
