use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;

const PAGE_TWO: &str = r#"{"items":[{"id":21,"title":"Zero-cost futures"},{"id":22,"title":"Pin and Unpin"}],"pageNumber":2,"totalPages":4}"#;
const FIRST_PAGE: &str = r#"{"items":[{"id":1,"title":"Hello, blog"}],"pageNumber":1,"totalPages":1}"#;
const RUST_RESULTS: &str = r#"{"items":[{"id":7,"title":"Why Rust"}],"pageNumber":1,"totalPages":1}"#;

fn postdeck(server: &MockServer) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("postdeck"));
    cmd.env("POSTDECK__API__BASE_URL", server.base_url())
        .env_remove("POSTDECK_CONFIG_FILE")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn list_prints_requested_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/v1/post").query_param("page", "2");
        then.status(200)
            .header("content-type", "application/json")
            .body(PAGE_TWO);
    });

    postdeck(&server)
        .args(["list", "--page", "2"])
        .assert()
        .success()
        .stdout(contains("- Zero-cost futures (21)"))
        .stdout(contains("- Pin and Unpin (22)"))
        .stdout(contains("Pages: 1 [2] 3 4"));

    mock.assert();
}

#[test]
fn keyword_lists_posts_filed_under_keyword() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/v1/post/keyword/rust");
        then.status(200)
            .header("content-type", "application/json")
            .body(RUST_RESULTS);
    });

    postdeck(&server)
        .args(["keyword", "rust"])
        .assert()
        .success()
        .stdout(contains("Keyword: rust"))
        .stdout(contains("- Why Rust (7)"));

    mock.assert();
}

#[test]
fn search_collapses_typed_burst_into_one_request() {
    let server = MockServer::start();
    let index = server.mock(|when, then| {
        when.method("GET").path("/v1/post").query_param("page", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(FIRST_PAGE);
    });
    let partial_r = server.mock(|when, then| {
        when.method("GET").path("/v1/post/title").query_param("q", "r");
        then.status(200)
            .header("content-type", "application/json")
            .body(FIRST_PAGE);
    });
    let partial_ru = server.mock(|when, then| {
        when.method("GET").path("/v1/post/title").query_param("q", "ru");
        then.status(200)
            .header("content-type", "application/json")
            .body(FIRST_PAGE);
    });
    let full = server.mock(|when, then| {
        when.method("GET").path("/v1/post/title").query_param("q", "rust");
        then.status(200)
            .header("content-type", "application/json")
            .body(RUST_RESULTS);
    });

    postdeck(&server)
        .args(["--search-quiet-period-ms", "300", "search"])
        .write_stdin("r\nru\nrust\n")
        .assert()
        .success()
        .stdout(contains("Search: rust"))
        .stdout(contains("- Why Rust (7)"));

    index.assert();
    full.assert_hits(1);
    partial_r.assert_hits(0);
    partial_ru.assert_hits(0);
}

#[test]
fn search_failure_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/v1/post").query_param("page", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(FIRST_PAGE);
    });
    server.mock(|when, then| {
        when.method("GET").path("/v1/post/title");
        then.status(500).body("index offline");
    });

    postdeck(&server)
        .args(["--search-quiet-period-ms", "10", "search"])
        .write_stdin("rust\n")
        .assert()
        .failure()
        .stderr(contains("server failure (status 500)"));
}

#[test]
fn list_server_failure_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/v1/post");
        then.status(502).body("bad gateway");
    });

    postdeck(&server)
        .arg("list")
        .assert()
        .failure()
        .stderr(contains("server failure (status 502)"));
}

#[test]
fn invalid_base_url_fails_fast() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("postdeck"));
    cmd.args(["--api-base-url", "ftp://blog.example", "list"])
        .assert()
        .failure()
        .stderr(contains("api.base_url"));
}
