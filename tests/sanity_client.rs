use std::time::Duration;

use atelier::{
    application::repos::{ContentRepo, RepoError},
    config::SanitySettings,
    domain::entities::Post,
    infra::{
        error::InfraError,
        sanity::{SanityClient, SanityRepository, queries},
    },
};
use httpmock::MockServer;
use serde_json::json;
use url::Url;

const QUERY_PATH: &str = "/v2024-01-01/data/query/production";

fn settings(server: &MockServer, token: Option<&str>) -> SanitySettings {
    SanitySettings {
        project_id: "abc123".to_string(),
        dataset: "production".to_string(),
        api_version: "2024-01-01".to_string(),
        use_cdn: false,
        token: token.map(str::to_string),
        api_base: Url::parse(&format!("{}/", server.base_url())).expect("mock base url"),
        cdn_base: Url::parse("https://cdn.sanity.io/").expect("cdn base"),
        request_timeout: Duration::from_secs(5),
    }
}

fn repository(server: &MockServer) -> SanityRepository {
    SanityRepository::new(SanityClient::new(&settings(server, None)).expect("client"))
}

const POST_JSON: &str = r#"{"result": {
    "_id": "post-1",
    "title": "Hello",
    "slug": {"_type": "slug", "current": "hello"},
    "publishedAt": "2024-05-01T10:00:00Z",
    "category": "work",
    "body": [{"_type": "block", "children": [{"_type": "span", "text": "Hi"}]}]
}}"#;

#[tokio::test]
async fn post_by_slug_sends_json_encoded_parameter() -> Result<(), RepoError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(QUERY_PATH)
            .query_param("query", queries::POST_BY_SLUG.text)
            .query_param("$slug", "\"hello\"");
        then.status(200)
            .header("content-type", "application/json")
            .body(POST_JSON);
    });

    let post = repository(&server)
        .post_by_slug("hello")
        .await?
        .expect("post is present");

    mock.assert();
    assert_eq!(post.title, "Hello");
    assert_eq!(post.slug.as_str(), "hello");
    assert_eq!(post.body.len(), 1);
    Ok(())
}

#[tokio::test]
async fn null_result_means_missing_document() -> Result<(), RepoError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(QUERY_PATH)
            .query_param("query", queries::CONTACT.text);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"result": null, "ms": 3}"#);
    });

    let contact = repository(&server).contact().await?;

    mock.assert();
    assert_eq!(contact, None);
    Ok(())
}

#[tokio::test]
async fn null_list_result_is_empty() -> Result<(), RepoError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(QUERY_PATH)
            .query_param("query", queries::TOOLS.text);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"result": null}"#);
    });

    let tools = repository(&server).list_tools().await?;

    mock.assert();
    assert!(tools.is_empty());
    Ok(())
}

#[tokio::test]
async fn error_status_surfaces_as_cms_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path(QUERY_PATH);
        then.status(500).body("upstream exploded");
    });

    let client = SanityClient::new(&settings(&server, None)).expect("client");
    let err = client
        .fetch::<Option<Post>>(queries::SITE_SETTINGS, &[])
        .await
        .expect_err("500 must fail");

    mock.assert();
    match err {
        InfraError::Cms { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_payload_maps_to_malformed_repo_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path(QUERY_PATH);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"result": 42}"#);
    });

    let err = repository(&server)
        .list_posts()
        .await
        .expect_err("a non-list result is rejected");

    mock.assert();
    assert!(matches!(err, RepoError::Malformed { .. }), "{err}");
}

#[tokio::test]
async fn undecodable_posts_are_skipped_without_dropping_the_list() -> Result<(), RepoError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(QUERY_PATH)
            .query_param("query", queries::ALL_POSTS.text);
        then.status(200)
            .header("content-type", "application/json")
            .body(
                json!({"result": [
                    {
                        "_id": "post-1",
                        "title": "Hello",
                        "slug": {"_type": "slug", "current": "hello"},
                        "publishedAt": "2024-05-01T10:00:00Z",
                        "category": "work"
                    },
                    {
                        "_id": "drafts.post-2",
                        "title": "Unpublished",
                        "slug": {"_type": "slug", "current": "unpublished"},
                        "category": "work"
                    },
                    {
                        "_id": "post-3",
                        "title": "Clip",
                        "slug": {"_type": "slug", "current": "clip"},
                        "publishedAt": "2024-04-01T10:00:00Z",
                        "category": "video"
                    }
                ]})
                .to_string(),
            );
    });

    let posts = repository(&server).list_posts().await?;

    mock.assert();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug.as_str(), "hello");
    Ok(())
}

#[tokio::test]
async fn unreachable_server_maps_to_unavailable() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path(QUERY_PATH);
        then.status(503).body("maintenance");
    });

    let err = repository(&server)
        .cv()
        .await
        .expect_err("503 must fail");

    mock.assert();
    assert!(matches!(err, RepoError::Unavailable(_)), "{err}");
}

#[tokio::test]
async fn token_is_sent_as_bearer_authorization() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(QUERY_PATH)
            .header("authorization", "Bearer secret-token")
            .header_exists("user-agent");
        then.status(200)
            .header("content-type", "application/json")
            .body(json!({"result": {"title": "Portfolio"}}).to_string());
    });

    let client = SanityClient::new(&settings(&server, Some("secret-token"))).expect("client");
    let value: serde_json::Value = client
        .fetch(queries::SITE_SETTINGS, &[])
        .await
        .expect("authorized fetch");

    mock.assert();
    assert_eq!(value["title"], "Portfolio");
}
