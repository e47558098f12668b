use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use bundler_engine::{
    ensure_artifact_dir, ArchiveError, FetchSettings, Pipeline, ReqwestFetcher, SYSTEM_ERROR_KEY,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(artifact_dir: PathBuf) -> Pipeline {
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).expect("fetcher"));
    Pipeline::new(fetcher, artifact_dir)
}

#[tokio::test]
async fn run_archives_successes_and_records_failures() {
    bundler_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/report.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("alpha"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/missing.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let good = format!("{}/files/report.txt", server.uri());
    let bad = format!("{}/files/missing.txt", server.uri());

    let outcome = pipeline(temp.path().to_path_buf())
        .run("task-1", &[good, bad.clone()])
        .await
        .expect("pipeline run");

    assert_eq!(outcome.archive_file, "task-1.zip");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors.get(&bad).map(String::as_str),
        Some("unexpected status: 404 Not Found")
    );
    assert!(!outcome.errors.contains_key(SYSTEM_ERROR_KEY));

    let mut archive =
        zip::ZipArchive::new(File::open(temp.path().join(&outcome.archive_file)).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_index(0).unwrap();
    assert_eq!(entry.name(), "report.txt");
    let mut contents = String::new();
    entry.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "alpha");
}

#[tokio::test]
async fn run_keeps_going_after_every_kind_of_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.txt"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let urls = vec![
        format!("{}/gone.txt", server.uri()),
        "http://127.0.0.1:1/unreachable.txt".to_string(),
        format!("{}/ok.txt", server.uri()),
    ];

    let outcome = pipeline(temp.path().to_path_buf())
        .run("task-2", &urls)
        .await
        .expect("pipeline run");

    // Both failures recorded, the one success still archived.
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors.contains_key(&urls[0]));
    assert!(outcome.errors.contains_key(&urls[1]));

    let archive =
        zip::ZipArchive::new(File::open(temp.path().join(&outcome.archive_file)).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
}

#[tokio::test]
async fn run_fails_when_archive_cannot_be_allocated() {
    let missing = PathBuf::from("/nonexistent/artifact/dir");
    let err = pipeline(missing)
        .run("task-3", &["https://files.example.com/a.txt".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::Create(_)));
}

#[test]
fn artifact_dir_probe_creates_missing_directories() {
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("artifacts").join("deep");

    ensure_artifact_dir(&nested).unwrap();
    assert!(nested.is_dir());

    // A path occupied by a file is rejected.
    let file_path = temp.path().join("occupied");
    std::fs::write(&file_path, b"x").unwrap();
    assert!(ensure_artifact_dir(&file_path).is_err());
}
