//! HTTP task service tests against a mock server.

use mockito::{Matcher, Server};
use serde_json::json;
use tasklist_sync::{
    ClientSettings, HttpTaskService, NewTask, RemoteError, RemoteTaskService, TaskId, TaskUpdate,
};

#[tokio::test]
async fn test_list_returns_tasks_in_server_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "tasks": [
                    { "entity_id": "2", "title": "second", "completed": true },
                    { "entity_id": "1", "title": "first", "description": "d" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = HttpTaskService::new(&server.url());
    let tasks = service.list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::from("2"));
    assert!(tasks[0].completed);
    assert_eq!(tasks[1].description.as_deref(), Some("d"));
    assert!(!tasks[1].completed);
}

#[tokio::test]
async fn test_list_without_success_flag_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body(json!({ "tasks": [] }).to_string())
        .create_async()
        .await;

    let service = HttpTaskService::new(&server.url());
    assert!(matches!(
        service.list().await,
        Err(RemoteError::Unsuccessful)
    ));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let service = HttpTaskService::new(&server.url());
    assert!(matches!(service.list().await, Err(RemoteError::Malformed(_))));
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/tasks/42")
        .with_status(500)
        .with_body("database down")
        .create_async()
        .await;

    let service = HttpTaskService::new(&server.url());
    match service.remove(&TaskId::from("42")).await {
        Err(RemoteError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_posts_trimmed_body_with_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/tasks")
        .match_header("authorization", "Bearer secret")
        .match_body(Matcher::Json(json!({ "title": "Ship it", "description": "" })))
        .with_status(201)
        .with_body(
            json!({
                "success": true,
                "task": { "entity_id": "new-1", "title": "Ship it", "description": "", "completed": false }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = HttpTaskService::new(&server.url()).with_token("secret");
    let draft = NewTask::new("  Ship it ", "").unwrap();
    let task = service.create(&draft).await.unwrap();

    mock.assert_async().await;
    assert_eq!(task.id, TaskId::from("new-1"));
    assert_eq!(task.title, "Ship it");
}

#[tokio::test]
async fn test_update_sends_only_present_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/tasks/7")
        .match_body(Matcher::Json(json!({ "completed": true })))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "task": { "entity_id": "7", "completed": true, "updated_at": "now" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = HttpTaskService::new(&server.url());
    let patch = service
        .update(&TaskId::from("7"), &TaskUpdate::completed(true))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(patch.completed, Some(true));
    assert_eq!(patch.title, None);
    assert_eq!(patch.extra["updated_at"], json!("now"));
}

#[tokio::test]
async fn test_from_settings_uses_base_url_and_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/tasks/9")
        .match_header("authorization", "Bearer from-settings")
        .with_status(200)
        .with_body(json!({ "success": true }).to_string())
        .create_async()
        .await;

    let mut settings = ClientSettings::new(format!("{}/api/", server.url()));
    settings.api_token = Some("from-settings".to_string());
    settings.timeout_secs = Some(5);

    let service = HttpTaskService::from_settings(&settings).unwrap();
    service.remove(&TaskId::from("9")).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let service = HttpTaskService::new(&format!("http://127.0.0.1:{}", port));
    let err = service.list().await.unwrap_err();
    assert_eq!(err.kind(), tasklist_sync::remote::RemoteErrorKind::Transport);
}
