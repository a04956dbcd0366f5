//! HTTP client and content loader against a local mock of the repository API.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tui_repotree::api::{HttpApi, RepoApi};
use tui_repotree::error::ApiError;
use tui_repotree::fetch::Fetch;
use tui_repotree::loader::ContentLoader;
use tui_repotree::model::TreeModel;
use tui_repotree::tree::build_tree;

struct MockServer {
    url: String,
    stop: mpsc::Sender<()>,
    seen: mpsc::Receiver<String>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _ = self.stop.send(());
    }
}

fn route(path: &str) -> (u16, String) {
    match path {
        "/repo/list" => (200, r#"["alpha","beta"]"#.to_string()),
        "/repo/alpha/tree/main/" => (
            200,
            r#"{"files":["README.md","src/lib.rs",".git/HEAD"]}"#.to_string(),
        ),
        "/repo/alpha/history" => (
            200,
            r#"[{"author":"a","commit":"1111111","message":"first"},{"author":"b","commit":"2222222","message":"second"}]"#
                .to_string(),
        ),
        "/repo/alpha/file/main/src/lib.rs" => (200, r#"{"content":"pub fn hi() {}\n"}"#.to_string()),
        "/repo/alpha/file/main/empty.txt" => (200, r#"{"content":""}"#.to_string()),
        "/repo/alpha/file/main/my%20notes.md" => (200, r#"{"content":"spaced"}"#.to_string()),
        "/repo/alpha/file/main/broken.json" => (200, "not json".to_string()),
        _ => (500, r#"{"error":"internal"}"#.to_string()),
    }
}

/// Start a local HTTP server serving a fixed repository `alpha`.
fn start_mock_api() -> MockServer {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
    let port = server.server_addr().to_ip().unwrap().port();
    let url = format!("http://127.0.0.1:{port}");

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let (seen_tx, seen_rx) = mpsc::channel::<String>();

    thread::spawn(move || loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }

        match server.recv_timeout(Duration::from_millis(50)) {
            Ok(Some(request)) => {
                let path = request.url().to_string();
                let _ = seen_tx.send(path.clone());
                let (status, body) = route(&path);
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                            .unwrap(),
                    );
                let _ = request.respond(response);
            }
            Ok(None) => {}
            Err(_) => break,
        }
    });

    MockServer {
        url,
        stop: stop_tx,
        seen: seen_rx,
    }
}

fn client(server: &MockServer) -> HttpApi {
    HttpApi::new(&server.url, Some(Duration::from_secs(5))).unwrap()
}

#[test]
fn lists_repositories() {
    let server = start_mock_api();
    let api = client(&server);
    assert_eq!(api.list_repositories().unwrap(), vec!["alpha", "beta"]);
}

#[test]
fn tree_request_uses_trailing_slash_and_builds_forest() {
    let server = start_mock_api();
    let api = client(&server);

    let files = api.list_files("alpha", "main").unwrap();
    assert_eq!(server.seen.recv().unwrap(), "/repo/alpha/tree/main/");

    let forest = build_tree(&files, "alpha");
    let names: Vec<_> = forest
        .roots()
        .iter()
        .filter_map(|id| forest.node(*id))
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(names, vec!["README.md", "src"]);
}

#[test]
fn history_keeps_received_order() {
    let server = start_mock_api();
    let commits = client(&server).history("alpha").unwrap();
    assert_eq!(commits[0].commit, "1111111");
    assert_eq!(commits[1].short_id(), "22222");
}

#[test]
fn loader_returns_file_content() {
    let server = start_mock_api();
    let api = client(&server);
    let loader = ContentLoader::new(&api);
    assert_eq!(loader.load_content("alpha", "src/lib.rs"), "pub fn hi() {}\n");
    assert_eq!(loader.load_content("alpha", "my notes.md"), "spaced");
}

#[test]
fn server_error_degrades_to_empty_string() {
    let server = start_mock_api();
    let api = client(&server);
    let loader = ContentLoader::new(&api);

    assert_eq!(loader.load_content("alpha", "missing.rs"), "");
    assert_eq!(loader.fetch("alpha", "missing.rs"), Fetch::Failed("server responded with status 500".to_string()));
    assert!(matches!(
        api.file_content("alpha", "main", "missing.rs"),
        Err(ApiError::Status { code: 500 })
    ));
}

#[test]
fn empty_file_and_failure_look_the_same() {
    let server = start_mock_api();
    let api = client(&server);
    let loader = ContentLoader::new(&api);

    // Deliberately indistinguishable through load_content.
    assert_eq!(loader.load_content("alpha", "empty.txt"), "");
    assert_eq!(loader.load_content("alpha", "broken.json"), "");
    assert_eq!(loader.fetch("alpha", "empty.txt"), Fetch::Empty);
    assert!(loader.fetch("alpha", "broken.json").is_failed());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let api = HttpApi::new("http://127.0.0.1:1", Some(Duration::from_secs(2))).unwrap();
    assert!(matches!(api.list_repositories(), Err(ApiError::Transport(_))));
}
