use board_uploader::board::PostKind;
use board_uploader::config::{BoardConfig, PartialSuccessPolicy};
use board_uploader::logging;
use board_uploader::selection::FileRef;
use board_uploader::upload::{
    BatchOutcome, Phase, UploadOrchestrator, UploadStatus, WorkerEvent,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::sync::mpsc::channel;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server_url: String, policy: PartialSuccessPolicy) -> BoardConfig {
    BoardConfig {
        server_url,
        partial_success: policy,
        ..BoardConfig::default()
    }
}

fn write_files(dir: &tempfile::TempDir, names: &[&str]) -> Vec<FileRef> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            let contents = format!("contents of {}", name);
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
            FileRef::new(*name, contents.len() as u64, path)
        })
        .collect()
}

/// An address nothing listens on: bind an ephemeral port, then release it.
fn closed_local_addr() -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

async fn mount_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn failing_middle_file_does_not_abort_batch() {
    logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(body_string_contains("second.txt"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let files = write_files(&dir, &["first.txt", "second.txt", "third.txt"]);
    let mut orch = UploadOrchestrator::new(&config_for(
        server.uri(),
        PartialSuccessPolicy::ClearAndReload,
    ));
    assert_eq!(orch.phase(), Phase::Idle);
    orch.select_files(files).unwrap();

    let batch = orch.begin_file_batch("Holiday").unwrap();
    assert_eq!(orch.phase(), Phase::InProgress);

    let (sender, receiver) = channel();
    let report = batch.run(&sender).await;
    drop(sender);

    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.outcome(), BatchOutcome::PartialSuccess);
    assert!(report.posted.iter().all(|p| p.kind == PostKind::File));

    let finished: Vec<(String, bool)> = receiver
        .iter()
        .filter_map(|event| match event {
            WorkerEvent::File(status) => match status.status {
                UploadStatus::Success(_) => Some((status.name, true)),
                UploadStatus::Error(_) => Some((status.name, false)),
                UploadStatus::Processing => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(
        finished,
        vec![
            ("first.txt".to_string(), true),
            ("second.txt".to_string(), false),
            ("third.txt".to_string(), true),
        ]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    for (request, name) in requests.iter().zip(["first.txt", "second.txt", "third.txt"]) {
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains(name), "request out of order, expected {}", name);
        assert!(body.contains("Holiday"));
    }

    let completion = orch.complete_file_batch(Ok(report));
    assert_eq!(orch.phase(), Phase::Idle);
    assert!(orch.selection().is_empty());
    assert!(completion.reload);
    assert_eq!(completion.posted.len(), 2);
}

#[tokio::test]
async fn blank_title_uses_each_file_name() {
    let server = MockServer::start().await;
    mount_success(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let files = write_files(&dir, &["a.png", "b.png"]);
    let mut orch = UploadOrchestrator::new(&config_for(server.uri(), Default::default()));
    orch.select_files(files).unwrap();

    let batch = orch.begin_file_batch("   ").unwrap();
    let (sender, _receiver) = channel();
    let report = batch.run(&sender).await;

    let titles: Vec<&str> = report.posted.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["a.png", "b.png"]);
}

#[tokio::test]
async fn unreachable_server_fails_every_file_and_keeps_selection() {
    let uri = format!("http://{}", closed_local_addr());

    let dir = tempfile::tempdir().unwrap();
    let files = write_files(&dir, &["one.txt", "two.txt"]);
    let mut orch = UploadOrchestrator::new(&config_for(uri, Default::default()));
    orch.select_files(files).unwrap();

    let batch = orch.begin_file_batch("").unwrap();
    let (sender, receiver) = channel();
    let report = batch.run(&sender).await;
    drop(sender);
    assert_eq!((report.success_count, report.error_count), (0, 2));
    assert!(report.uploaded.is_empty());

    let errors: Vec<String> = receiver
        .iter()
        .filter_map(|event| match event {
            WorkerEvent::File(status) => match status.status {
                UploadStatus::Error(reason) => Some(reason),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 2);
    for reason in &errors {
        assert!(reason.starts_with("request failed"), "unexpected error: {}", reason);
    }

    let completion = orch.complete_file_batch(Ok(report));
    assert_eq!(orch.phase(), Phase::Idle);
    assert_eq!(orch.selection().len(), 2);
    assert!(!completion.reload);
}

#[tokio::test]
async fn retain_policy_keeps_files_after_partial_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(body_string_contains("bad.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "rejected" })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_success(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let files = write_files(&dir, &["good.txt", "bad.txt"]);
    let mut orch = UploadOrchestrator::new(&config_for(server.uri(), PartialSuccessPolicy::Retain));
    orch.select_files(files).unwrap();

    let batch = orch.begin_file_batch("").unwrap();
    let (sender, _receiver) = channel();
    let report = batch.run(&sender).await;
    assert_eq!(report.uploaded.len(), 1);
    let completion = orch.complete_file_batch(Ok(report));

    let kept: Vec<String> = orch.selection().iter().map(|f| f.name.clone()).collect();
    assert_eq!(kept, vec!["bad.txt".to_string()]);
    assert!(!completion.reload);
    assert!(orch.can_submit_files());

    // Retrying sends only the file that failed.
    let retry = orch.begin_file_batch("").unwrap();
    assert_eq!(retry.len(), 1);
}

#[tokio::test]
async fn message_flag_is_released_on_success_and_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/message"))
        .and(body_string_contains("title=Broken"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let mut orch = UploadOrchestrator::new(&config_for(server.uri(), Default::default()));
    assert_eq!(orch.phase(), Phase::Idle);

    let post = orch.begin_message("Hello", "").unwrap();
    assert_eq!(orch.phase(), Phase::InProgress);
    let completion = orch.complete_message(post.run().await);
    assert_eq!(orch.phase(), Phase::Idle);
    assert!(completion.reload);
    assert_eq!(completion.posted[0].title, "Hello");
    assert_eq!(completion.posted[0].kind, PostKind::Message);

    let post = orch.begin_message("Broken", "body").unwrap();
    let completion = orch.complete_message(post.run().await);
    assert_eq!(orch.phase(), Phase::Idle);
    assert!(!completion.reload);
    assert!(!completion.clear_form);
    assert_eq!(completion.notifications[0].text, "db down");
}
