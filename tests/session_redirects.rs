//! Redirect chains: hop budget, Location classification and replay.

mod helpers;

use helpers::{fixed_response, redirect_response, scripted_server, test_client};
use http_session::{Content, RedirectLimit, Request, SessionError, Url};

fn url_for(addr: std::net::SocketAddr, path: &str) -> Url {
    format!("http://{addr}{path}").parse().expect("valid url")
}

/// N redirects followed by a 200, all on one server.
fn chain(n: usize) -> Vec<Vec<u8>> {
    let mut scripts: Vec<Vec<u8>> = (1..=n)
        .map(|hop| redirect_response("302 Found", &format!("/hop{hop}")))
        .collect();
    scripts.push(fixed_response("200 OK", &[], b"arrived"));
    scripts
}

#[tokio::test]
async fn test_budget_one_short_fails_with_redirect_response() {
    let n = 3;
    let (addr, _requests) = scripted_server(chain(n)).await;
    let failure = test_client()
        .send(
            Request::get(url_for(addr, "/start"))
                .with_redirect_limit(RedirectLimit::Limited(n - 1)),
        )
        .await
        .expect_err("budget exhausted");

    assert!(matches!(
        failure.error,
        SessionError::RedirectBudgetExceeded {
            status: 302,
            limit: 2
        }
    ));
    let response = failure.response.expect("3xx response attached");
    assert_eq!(response.status(), 302);
    assert_eq!(response.header("Location"), Some("/hop3"));
    assert_eq!(response.redirects(), 2);
    assert_eq!(failure.url.path(), "/hop2");
}

#[tokio::test]
async fn test_exact_budget_reaches_final_response() {
    let n = 3;
    let (addr, mut requests) = scripted_server(chain(n)).await;
    let response = test_client()
        .send(Request::get(url_for(addr, "/start")).with_redirect_limit(RedirectLimit::Limited(n)))
        .await
        .expect("chain completes");
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), b"arrived");
    assert_eq!(response.redirects(), n);
    assert_eq!(response.url().path(), "/hop3");

    let mut paths = Vec::new();
    while let Ok(request) = requests.try_recv() {
        let line = String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        paths.push(line);
    }
    assert_eq!(
        paths,
        vec![
            "GET /start HTTP/1.1",
            "GET /hop1 HTTP/1.1",
            "GET /hop2 HTTP/1.1",
            "GET /hop3 HTTP/1.1",
        ]
    );
}

#[tokio::test]
async fn test_unlimited_budget() {
    let (addr, _requests) = scripted_server(chain(12)).await;
    let response = test_client()
        .send(Request::get(url_for(addr, "/")).with_redirect_limit(RedirectLimit::Unlimited))
        .await
        .expect("chain completes");
    assert_eq!(response.redirects(), 12);
}

#[tokio::test]
async fn test_zero_budget_never_follows() {
    let (addr, _requests) = scripted_server(chain(1)).await;
    let failure = test_client()
        .send(Request::get(url_for(addr, "/")).with_redirect_limit(RedirectLimit::Limited(0)))
        .await
        .expect_err("no hops allowed");
    assert!(matches!(
        failure.error,
        SessionError::RedirectBudgetExceeded { limit: 0, .. }
    ));
}

#[tokio::test]
async fn test_absolute_redirect_to_other_server() {
    let (final_addr, _final_requests) =
        scripted_server(vec![fixed_response("200 OK", &[], b"elsewhere")]).await;
    let target = format!("http://{final_addr}/landing");
    let (addr, _requests) =
        scripted_server(vec![redirect_response("301 Moved Permanently", &target)]).await;

    let response = test_client()
        .send(Request::get(url_for(addr, "/old")))
        .await
        .expect("chain completes");
    assert_eq!(response.body(), b"elsewhere");
    assert_eq!(response.url().port(), final_addr.port());
    assert_eq!(response.redirects(), 1);
}

#[tokio::test]
async fn test_relative_redirect_joins_current_path() {
    let (addr, mut requests) = scripted_server(vec![
        redirect_response("302 Found", "sibling?x=1"),
        fixed_response("200 OK", &[], b"ok"),
    ])
    .await;
    test_client()
        .send(Request::get(url_for(addr, "/dir/page")))
        .await
        .expect("chain completes");
    let _first = requests.recv().await.expect("first request");
    let second = requests.recv().await.expect("second request");
    assert!(second.starts_with(b"GET /dir/sibling?x=1 HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_see_other_replays_as_get() {
    let (addr, mut requests) = scripted_server(vec![
        redirect_response("303 See Other", "/result"),
        fixed_response("200 OK", &[], b"done"),
    ])
    .await;
    test_client()
        .send(Request::post(
            url_for(addr, "/submit"),
            Content::new("text/plain", "payload"),
        ))
        .await
        .expect("chain completes");

    let first = requests.recv().await.expect("first request");
    assert!(first.starts_with(b"POST /submit HTTP/1.1\r\n"));
    let second = String::from_utf8(requests.recv().await.expect("second request"))
        .expect("utf-8");
    assert!(second.starts_with("GET /result HTTP/1.1\r\n"));
    assert!(!second.contains("Content-Length"));
    assert!(!second.contains("payload"));
}

#[tokio::test]
async fn test_redirect_without_location_is_status_error() {
    let (addr, _requests) = scripted_server(vec![fixed_response("302 Found", &[], b"")]).await;
    let failure = test_client()
        .send(Request::get(url_for(addr, "/")))
        .await
        .expect_err("no location");
    assert!(matches!(
        failure.error,
        SessionError::ProtocolStatusError { status: 302 }
    ));
    assert!(failure.response.is_some());
}

#[tokio::test]
async fn test_server_relative_redirect_reuses_resolved_endpoint() {
    let (addr, mut requests) = scripted_server(vec![
        redirect_response("302 Found", "/next"),
        fixed_response("200 OK", &[], b"same origin"),
    ])
    .await;
    let start: Url = format!("http://localhost:{}/start", addr.port())
        .parse()
        .expect("valid url");

    let mut session = test_client().session(Request::get(start));
    assert_eq!(session.endpoint(), None);
    let response = session.start().await.expect("chain completes");

    assert_eq!(response.body(), b"same origin");
    assert_eq!(session.redirects(), 1);
    // The replayed hop connects to the endpoint the first hop resolved.
    assert_eq!(session.endpoint(), Some(addr));

    let first = requests.recv().await.expect("first request");
    let second = String::from_utf8(requests.recv().await.expect("second request"))
        .expect("utf-8");
    assert!(first.starts_with(b"GET /start HTTP/1.1\r\n"));
    assert!(second.starts_with("GET /next HTTP/1.1\r\n"));
    let host = format!("Host: localhost:{}\r\n", addr.port());
    assert!(second.contains(&host));
}

#[tokio::test]
async fn test_absolute_redirect_switches_endpoint() {
    let (final_addr, _final_requests) =
        scripted_server(vec![fixed_response("200 OK", &[], b"moved")]).await;
    let target = format!("http://{final_addr}/landing");
    let (addr, _requests) =
        scripted_server(vec![redirect_response("301 Moved Permanently", &target)]).await;

    let mut session = test_client().session(Request::get(url_for(addr, "/old")));
    session.start().await.expect("chain completes");
    assert_ne!(addr, final_addr);
    assert_eq!(session.endpoint(), Some(final_addr));
}
