mod harness;

use harness::config::ConfigBuilder;
use harness::mock_provider::MockProvider;
use harness::server::TestServer;

#[tokio::test]
async fn root_reports_liveness() {
    let mock = MockProvider::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&ConfigBuilder::new(&mock.base_url(), dir.path()).build())
        .await
        .unwrap();

    let resp = server.client().get(server.url("/")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("alive"));
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let mock = MockProvider::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(&ConfigBuilder::new(&mock.base_url(), dir.path()).build())
        .await
        .unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let mock = MockProvider::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(&mock.base_url(), dir.path()).without_health().build();

    let server = TestServer::start(&config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let mock = MockProvider::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let cors = open_cors();
    let config = ConfigBuilder::new(&mock.base_url(), dir.path()).with_cors(cors).build();

    let server = TestServer::start(&config).await.unwrap();

    let resp = server
        .client()
        .request(reqwest::Method::OPTIONS, server.url("/generate"))
        .header("origin", "https://studio.example")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn colliding_public_prefix_is_a_startup_error() {
    let mock = MockProvider::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    for prefix in ["/health", "/generate"] {
        let config = ConfigBuilder::new(&mock.base_url(), dir.path())
            .with_public_prefix(prefix)
            .build();

        let Err(err) = TestServer::start(&config).await else {
            panic!("server started with public prefix {prefix}");
        };
        assert!(err.to_string().contains("collides"), "{err}");
    }
}

fn open_cors() -> assetgen_config::CorsConfig {
    assetgen_config::CorsConfig {
        origins: assetgen_config::AnyOrList::Any,
        methods: assetgen_config::AnyOrList::List(vec!["GET".to_owned(), "POST".to_owned()]),
        headers: assetgen_config::AnyOrList::Any,
        expose_headers: Vec::new(),
        credentials: false,
        max_age: None,
    }
}
