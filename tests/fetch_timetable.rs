use classease::client::{LoadError, TimetableClient};
use classease::config::Config;
use classease::options;
use mockito::{Matcher, Server};

const BODY: &str = r#"{
    "Update": { "local_time_pkt": "2025-09-07 03:15 PM" },
    "BS": { "CS": { "2023": { "A": {} } } },
    "PHD": {}
}"#;

#[tokio::test]
async fn fetch_appends_cache_buster_and_parses() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/DB/TimeTable.json")
        .match_query(Matcher::Regex(r"^v=\d+$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BODY)
        .create_async()
        .await;

    let client = TimetableClient::new(&format!("{}/DB/TimeTable.json", server.url()), true).unwrap();
    assert!(client.is_remote());
    let tt = client.fetch().await.expect("fetch should succeed");

    mock.assert_async().await;
    assert_eq!(tt.update_stamp(), Some("2025-09-07 03:15 PM"));
    assert_eq!(options::raw_programs(&tt), vec!["BS".to_string()]);
}

#[tokio::test]
async fn cache_buster_can_be_disabled_from_config() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tt.json")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(BODY)
        .create_async()
        .await;

    let config = Config {
        source: format!("{}/tt.json", server.url()),
        allow_insecure_certs: true,
        cache_bust: false,
    };
    let client = TimetableClient::from_config(&config).unwrap();
    assert!(client.fetch().await.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn http_errors_are_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let client = TimetableClient::new(&format!("{}/missing.json", server.url()), true).unwrap();
    match client.fetch().await {
        Err(LoadError::Status(status)) => assert_eq!(status.as_u16(), 404),
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_object_documents_are_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body("[1, 2, 3]")
        .create_async()
        .await;

    let client = TimetableClient::new(&format!("{}/tt.json", server.url()), true).unwrap();
    assert!(matches!(client.fetch().await, Err(LoadError::Parse(_))));
}

#[tokio::test]
async fn local_files_are_read_from_disk() {
    let dir = std::env::temp_dir().join(format!("classease-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("TimeTable.json");
    std::fs::write(&path, BODY).unwrap();

    let client = TimetableClient::new(path.to_str().unwrap(), false).unwrap();
    let tt = client.fetch().await.expect("file should load");
    assert!(!tt.is_empty());

    let missing = TimetableClient::new(dir.join("nope.json").to_str().unwrap(), false).unwrap();
    assert!(matches!(missing.fetch().await, Err(LoadError::Io { .. })));

    let _ = std::fs::remove_dir_all(&dir);
}
