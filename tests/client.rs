//! Client tests against a mock Tracker server.

use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytracker::api::{
    urls, ApiError, ApiRequest, ClientConfig, CommentExpand, CommentRequest,
    CommentUpdateRequest, ComponentRequest, ComponentUpdateRequest, FileUpload,
    IssueCountRequest, IssueCreateRequest, IssueSearchRequest, PagePolicy, PageRequest,
    PriorityLevel, PriorityName, TrackerClient, TransitionKind,
};

fn client_with(server: &MockServer, config: ClientConfig) -> TrackerClient {
    TrackerClient::new(config.with_base_url(&server.uri())).unwrap()
}

fn client(server: &MockServer) -> TrackerClient {
    client_with(server, ClientConfig::oauth("test-token").with_org_id("123"))
}

fn user_json(login: &str) -> serde_json::Value {
    json!({
        "self": "https://api.tracker.yandex.net/v2/users/1",
        "uid": 1,
        "login": login,
        "display": "Test User",
        "email": "test@example.com"
    })
}

fn issue_json(key: &str) -> serde_json::Value {
    json!({
        "self": format!("https://api.tracker.yandex.net/v2/issues/{}", key),
        "id": format!("id-{}", key),
        "key": key,
        "summary": format!("Summary of {}", key),
        "status": {"id": "1", "key": "open", "display": "Open"},
        "queue": {"id": "7", "key": "TEST", "display": "Test"}
    })
}

fn issue_page(keys: &[&str], total_pages: &str) -> ResponseTemplate {
    let issues: Vec<_> = keys.iter().map(|k| issue_json(k)).collect();
    ResponseTemplate::new(200)
        .set_body_json(issues)
        .insert_header("X-Total-Pages", total_pages)
        .insert_header("X-Total-Count", "5")
}

#[tokio::test]
async fn test_persistent_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/myself"))
        .and(header("Authorization", "OAuth test-token"))
        .and(header("Accept-Language", "en"))
        .and(header("X-Org-ID", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("tester")))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::oauth("test-token")
        .with_language("en")
        .with_organization(Some("123"), Some("cloud-1"));
    let user = client_with(&server, config).get_myself().await.unwrap();
    assert_eq!(user.login, "tester");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("X-Cloud-Org-ID").is_none());
}

#[tokio::test]
async fn test_cloud_org_and_fallback_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/myself"))
        .and(header("Authorization", "Bearer iam-token"))
        .and(header("Accept-Language", "ru"))
        .and(header("X-Cloud-Org-ID", "cloud-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("tester")))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::iam("iam-token")
        .with_language("fr")
        .with_cloud_org_id("cloud-1");
    client_with(&server, config).get_myself().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("X-Org-ID").is_none());
}

#[tokio::test]
async fn test_error_status_keeps_raw_body() {
    let server = MockServer::start().await;
    let body = r#"{"errors":{},"errorMessages":["Issue does not exist."],"statusCode":404}"#;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-404"))
        .respond_with(ResponseTemplate::new(404).set_body_string(body))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_issue("TEST-404", false, false)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.body(), Some(body));
}

#[tokio::test]
async fn test_error_status_with_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/issues/TEST-1"))
        .respond_with(ResponseTemplate::new(409).set_body_string("version mismatch"))
        .mount(&server)
        .await;

    let err = client(&server)
        .modify_issue("TEST-1", &Default::default())
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.body(), Some("version mismatch"));
}

#[tokio::test]
async fn test_success_with_wrong_shape_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1/transitions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_issue_transitions("TEST-1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_missing_path_value_sends_nothing() {
    let server = MockServer::start().await;

    let err = client(&server).get_issue("", true, true).await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedRequest(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_issue_expands() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1"))
        .and(query_param("expand", "attachments"))
        .and(query_param("expand", "transitions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json("TEST-1")))
        .expect(1)
        .mount(&server)
        .await;

    let issue = client(&server).get_issue("TEST-1", true, true).await.unwrap();
    assert_eq!(issue.key, "TEST-1");
    assert_eq!(issue.status_key(), Some("open"));
    assert_eq!(issue.queue_key(), Some("TEST"));
}

#[tokio::test]
async fn test_get_issue_without_expand_has_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1"))
        .and(query_param_is_missing("expand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json("TEST-1")))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).get_issue("TEST-1", false, false).await.unwrap();
}

#[tokio::test]
async fn test_create_issue_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/"))
        .and(body_json(json!({
            "summary": "Broken build",
            "queue": {"key": "TEST"},
            "priority": {"id": "4", "key": "critical"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(issue_json("TEST-9")))
        .expect(1)
        .mount(&server)
        .await;

    let req = IssueCreateRequest::new("TEST", "Broken build").with_priority(PriorityLevel::Critical);
    let issue = client(&server).create_issue(&req).await.unwrap();
    assert_eq!(issue.key, "TEST-9");
}

#[tokio::test]
async fn test_count_issues() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/_count"))
        .and(body_json(json!({"query": "Queue: TEST"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .mount(&server)
        .await;

    let req = IssueCountRequest {
        query: Some("Queue: TEST".to_string()),
        ..Default::default()
    };
    assert_eq!(client(&server).count_issues(&req).await.unwrap(), 42);
}

#[tokio::test]
async fn test_search_page_defaults_and_totals() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/_search"))
        .and(query_param("perPage", "5"))
        .and(query_param("page", "1"))
        .respond_with(issue_page(&["TEST-1", "TEST-2"], "3"))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .search_issues_page(&IssueSearchRequest::queue("TEST"), PageRequest::new(0, 0))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.info.total_pages, 3);
    assert_eq!(page.info.total_count, 5);
}

async fn mount_search_pages(server: &MockServer, failing_page: Option<&str>) {
    for (page, keys) in [("1", vec!["TEST-1", "TEST-2"]), ("2", vec!["TEST-3", "TEST-4"]), ("3", vec!["TEST-5"])] {
        let response = if failing_page == Some(page) {
            ResponseTemplate::new(500).set_body_string("internal error")
        } else {
            issue_page(&keys, "3")
        };
        Mock::given(method("POST"))
            .and(path("/issues/_search"))
            .and(query_param("perPage", "50"))
            .and(query_param("page", page))
            .and(body_json(json!({"queue": "TEST"})))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_search_all_issues_fetches_every_page() {
    let server = MockServer::start().await;
    mount_search_pages(&server, None).await;

    let issues = client(&server)
        .search_all_issues(&IssueSearchRequest::queue("TEST"))
        .await
        .unwrap();
    let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, ["TEST-1", "TEST-2", "TEST-3", "TEST-4", "TEST-5"]);
}

#[tokio::test]
async fn test_search_all_issues_strict_fails_on_later_page() {
    let server = MockServer::start().await;
    mount_search_pages(&server, Some("2")).await;

    let err = client(&server)
        .search_all_issues_with_policy(&IssueSearchRequest::queue("TEST"), PagePolicy::Strict)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    server.reset().await;
}

#[tokio::test]
async fn test_search_all_issues_lenient_skips_failed_page() {
    let server = MockServer::start().await;
    mount_search_pages(&server, Some("2")).await;

    let config = ClientConfig::oauth("test-token").with_page_policy(PagePolicy::Lenient);
    let issues = client_with(&server, config)
        .search_all_issues(&IssueSearchRequest::queue("TEST"))
        .await
        .unwrap();
    let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, ["TEST-1", "TEST-2", "TEST-5"]);
}

#[tokio::test]
async fn test_search_all_issues_first_page_error_is_returned() {
    let server = MockServer::start().await;
    mount_search_pages(&server, Some("1")).await;

    let config = ClientConfig::oauth("test-token").with_page_policy(PagePolicy::Lenient);
    let err = client_with(&server, config)
        .search_all_issues(&IssueSearchRequest::queue("TEST"))
        .await
        .unwrap_err();
    assert_eq!(err.body(), Some("internal error"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    server.reset().await;
}

fn comments(ids: &[i64]) -> ResponseTemplate {
    let body: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "longId": format!("long-{}", id), "text": format!("comment {}", id)}))
        .collect();
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_get_all_comments_follows_watermark() {
    let server = MockServer::start().await;
    let comments_path = "/issues/TEST-1/comments";

    Mock::given(method("GET"))
        .and(path(comments_path))
        .and(query_param("perPage", "50"))
        .and(query_param_is_missing("id"))
        .and(query_param_is_missing("expand"))
        .respond_with(comments(&[1, 2]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(comments_path))
        .and(query_param("id", "2"))
        .respond_with(comments(&[3]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(comments_path))
        .and(query_param("id", "3"))
        .respond_with(comments(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let all = client(&server)
        .get_all_comments("TEST-1", CommentExpand::None)
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[tokio::test]
async fn test_comments_page_reports_last_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1/comments"))
        .and(query_param("expand", "html"))
        .and(query_param("perPage", "10"))
        .and(query_param("id", "100"))
        .respond_with(comments(&[101, 105]))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .get_comments_page(
            "TEST-1",
            CommentExpand::Html,
            ytracker::api::CommentCursor::new(10, 100),
        )
        .await
        .unwrap();
    assert_eq!(page.info.last_id, 105);
}

#[tokio::test]
async fn test_create_and_delete_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/TEST-1/comments"))
        .and(body_json(json!({"text": "hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "text": "hello"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/issues/TEST-1/comments/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = client(&server);
    let comment = tracker
        .create_comment("TEST-1", &CommentRequest::new("hello"))
        .await
        .unwrap();
    assert_eq!(comment.id, 9);
    tracker.delete_comment("TEST-1", comment.id).await.unwrap();
}

#[tokio::test]
async fn test_execute_transition_kind_close() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/TEST-1/transitions/close/_execute"))
        .and(body_json(json!({"resolution": "fixed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "reopen", "display": "Reopen", "to": {"key": "open", "display": "Open"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let transitions = client(&server)
        .execute_transition_kind("TEST-1", TransitionKind::Close, Some("ignored"))
        .await
        .unwrap();
    assert_eq!(transitions[0].id, "reopen");
}

#[tokio::test]
async fn test_execute_transition_kind_with_assignee() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/TEST-1/transitions/start_progress/_execute"))
        .and(body_json(json!({"assignee": "jdoe"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .execute_transition_kind("TEST-1", TransitionKind::StartProgress, Some("jdoe"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_user_with_numeric_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/login:12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("12345")))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server).get_user("12345", 0).await.unwrap();
    assert_eq!(user.login, "12345");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/users/login:12345");
}

#[tokio::test]
async fn test_get_user_with_email_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/jane@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("jane@example.com")))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server).get_user("jane@example.com", 0).await.unwrap();
    assert_eq!(user.login, "jane@example.com");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/users/jane@example.com");
}

#[tokio::test]
async fn test_get_user_by_id_and_by_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("by-id")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("jdoe")))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = client(&server);
    assert_eq!(tracker.get_user("", 77).await.unwrap().login, "by-id");
    assert_eq!(tracker.get_user("jdoe", 77).await.unwrap().login, "jdoe");
}

#[tokio::test]
async fn test_get_all_users_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(query_param("perPage", "50"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json("a"), user_json("b")])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client(&server).get_all_users().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_priorities_not_localized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/priorities/"))
        .and(query_param("localized", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4, "key": "critical", "name": {"ru": "Критичный", "en": "Critical"}, "order": 4}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let priorities = client(&server).get_all_priorities(false).await.unwrap();
    assert_eq!(priorities[0].key, "critical");
    assert!(matches!(priorities[0].name, PriorityName::Translations(_)));
    assert_eq!(priorities[0].name.get("en"), Some("Critical"));
}

#[tokio::test]
async fn test_get_priority_localized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/priorities/3"))
        .and(query_param("localized", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "key": "normal", "name": "Normal"})))
        .expect(1)
        .mount(&server)
        .await;

    let priority = client(&server).get_priority(3, true).await.unwrap();
    assert_eq!(priority.name, PriorityName::Localized("Normal".to_string()));
}

#[tokio::test]
async fn test_update_component_sends_version() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/components/12"))
        .and(query_param("version", "3"))
        .and(body_json(json!({"description": "Backend services"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "version": 4, "name": "backend", "description": "Backend services"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = ComponentUpdateRequest {
        description: Some("Backend services".to_string()),
        ..Default::default()
    };
    let component = client(&server).update_component(12, 3, &req).await.unwrap();
    assert_eq!(component.version, 4);
}

#[tokio::test]
async fn test_upload_temporary_attachment_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/attachments/"))
        .and(body_string_contains("name=\"filename\""))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("hello tracker"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "4159", "name": "notes.txt", "mimetype": "text/plain", "size": 13
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = FileUpload::new("notes.txt", b"hello tracker".to_vec()).with_mime_type("text/plain");
    let attachment = client(&server)
        .upload_temporary_attachment(file)
        .await
        .unwrap();
    assert_eq!(attachment.id, "4159");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_attach_list_and_delete_issue_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/issues/TEST-1/attachments"))
        .and(body_string_contains("name=\"filename\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "55", "name": "log.txt"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1/attachments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "55", "name": "log.txt"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/issues/TEST-1/attachments/55"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = client(&server);
    let attached = tracker
        .attach_file("TEST-1", FileUpload::new("log.txt", b"line".to_vec()))
        .await
        .unwrap();
    let listed = tracker.get_issue_attachments("TEST-1").await.unwrap();
    assert_eq!(listed[0].id, attached.id);
    tracker.delete_attachment("TEST-1", &attached.id).await.unwrap();
}

#[tokio::test]
async fn test_get_and_update_comment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1/comments/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "text": "old"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/issues/TEST-1/comments/9"))
        .and(body_json(json!({"text": "new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "text": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = client(&server);
    assert_eq!(tracker.get_comment("TEST-1", 9).await.unwrap().text, "old");

    let req = CommentUpdateRequest {
        text: "new".to_string(),
        ..Default::default()
    };
    let updated = tracker.update_comment("TEST-1", 9, &req).await.unwrap();
    assert_eq!(updated.text, "new");
}

#[tokio::test]
async fn test_component_create_list_and_get() {
    let server = MockServer::start().await;
    let component = json!({"id": 12, "version": 1, "name": "backend", "queue": {"key": "TEST"}});
    Mock::given(method("POST"))
        .and(path("/components/"))
        .and(body_json(json!({"name": "backend", "queue": "TEST"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(component.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/components/"))
        .and(query_param("perPage", "5"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([component.clone()]))
                .insert_header("X-Total-Count", "6"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/components/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(component))
        .expect(1)
        .mount(&server)
        .await;

    let tracker = client(&server);
    let created = tracker
        .create_component(&ComponentRequest::new("TEST", "backend"))
        .await
        .unwrap();
    assert_eq!(created.id, 12);

    let page = tracker
        .get_components_page(PageRequest::new(2, 0))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.info.total_count, 6);
    assert_eq!(page.info.total_pages, 0);

    let fetched = tracker.get_component(12).await.unwrap();
    assert_eq!(fetched.name, "backend");
}

#[tokio::test]
async fn test_get_issue_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/issues/TEST-1/attachments/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "55", "name": "log.txt", "content": "https://files/55", "size": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let attachment = client(&server)
        .get_issue_attachment("TEST-1", "55")
        .await
        .unwrap();
    assert_eq!(attachment.size, 4);
    assert_eq!(attachment.content, "https://files/55");
}

#[tokio::test]
async fn test_json_body_on_upload_endpoint_is_rejected() {
    let server = MockServer::start().await;
    let request = ApiRequest::new(&urls::ATTACHMENT_UPLOAD)
        .json(&json!({"name": "x"}))
        .unwrap();

    let err = client(&server)
        .execute::<serde_json::Value>(request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MalformedRequest(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_port_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let tracker = TrackerClient::new(ClientConfig::oauth("test-token").with_base_url(&uri)).unwrap();
    let err = tracker.get_issue("TEST-1", false, false).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.body(), None);
}

#[tokio::test]
async fn test_validate_connection_unreachable() {
    let tracker = TrackerClient::new(
        ClientConfig::oauth("test-token").with_base_url("http://127.0.0.1:9/v2"),
    )
    .unwrap();

    let err = tracker.validate_connection().await.unwrap_err();
    assert!(matches!(err, ApiError::ConnectionFailed(_)));
}

#[tokio::test]
async fn test_validate_connection_unauthorized_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/myself"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client(&server).validate_connection().await.unwrap_err();
    assert!(err.is_unauthorized());
}
