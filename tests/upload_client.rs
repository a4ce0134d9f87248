use board_uploader::selection::FileRef;
use board_uploader::upload::{BoardClient, UploadError};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> FileRef {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    FileRef::new(name, contents.len() as u64, path)
}

#[tokio::test]
async fn upload_file_sends_multipart_and_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("Weekly notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "uploaded" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "notes.txt", "some notes");
    let client = BoardClient::new(server.uri());

    let message = client.upload_file(&file, "Weekly notes").await.unwrap();
    assert_eq!(message, "uploaded");
}

#[tokio::test]
async fn server_error_text_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "File is too large" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "big.bin", "xxxx");
    let client = BoardClient::new(server.uri());

    let err = client.upload_file(&file, "big").await.unwrap_err();
    assert!(matches!(err, UploadError::Server(ref reason) if reason == "File is too large"));
}

#[tokio::test]
async fn message_in_body_wins_over_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/message"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "stored" })))
        .mount(&server)
        .await;

    let client = BoardClient::new(server.uri());
    assert_eq!(client.post_message("t", "c").await.unwrap(), "stored");
}

#[tokio::test]
async fn body_without_message_or_error_is_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = BoardClient::new(server.uri());
    let err = client.post_message("t", "").await.unwrap_err();
    assert!(matches!(err, UploadError::Server(ref reason) if reason == "Upload failed"));
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/message"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = BoardClient::new(server.uri());
    let err = client.post_message("t", "c").await.unwrap_err();
    match err {
        UploadError::Decode(detail) => assert!(detail.starts_with("HTTP 502")),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn message_is_sent_as_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/message"))
        .and(body_string_contains("title=Hello"))
        .and(body_string_contains("content=World"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BoardClient::new(format!("{}/", server.uri()));
    assert_eq!(client.post_message("Hello", "World").await.unwrap(), "ok");
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = BoardClient::new(server.uri());
    let ghost = FileRef::new("ghost.txt", 3, "/definitely/not/here/ghost.txt");
    let err = client.upload_file(&ghost, "").await.unwrap_err();
    assert!(matches!(err, UploadError::Io { ref name, .. } if name == "ghost.txt"));
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = BoardClient::new(format!("http://{}", addr));
    let err = client.post_message("t", "c").await.unwrap_err();
    assert!(matches!(err, UploadError::Network(_)), "got {:?}", err);
    assert!(err.to_string().starts_with("request failed"));
}

#[tokio::test]
async fn file_is_streamed_whole_with_known_length() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let contents: String = (0..200_000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let file = temp_file(&dir, "large.txt", &contents);
    let client = BoardClient::new(server.uri());

    assert_eq!(client.upload_file(&file, "Large").await.unwrap(), "ok");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(&contents));
    assert!(body.contains("filename=\"large.txt\""));
    assert!(requests[0].headers.get("content-length").is_some());
}
