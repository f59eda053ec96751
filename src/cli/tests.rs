//! Unit tests for CLI commands

use crate::cli::{build_request, Cli, Commands, RouteEntry, RouteTable};
use clap::Parser;
use http::Method;

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["brrtdispatch", "routes", "--table", "routes.yaml"]).unwrap();

    match cli.command {
        Commands::Routes { table } => assert_eq!(table.to_string_lossy(), "routes.yaml"),
        _ => panic!("Expected Routes command"),
    }
}

#[test]
fn test_request_command_with_repeated_flags() {
    let cli = Cli::try_parse_from([
        "brrtdispatch",
        "request",
        "--table",
        "routes.yaml",
        "--method",
        "post",
        "--path",
        "/pets/1",
        "--cookie",
        "a=1",
        "--cookie",
        "b=2",
        "--header",
        "X-Trace: on",
    ])
    .unwrap();

    match cli.command {
        Commands::Request {
            method,
            path,
            cookies,
            headers,
            body,
            ..
        } => {
            assert_eq!(method, "post");
            assert_eq!(path, "/pets/1");
            assert_eq!(cookies, vec!["a=1", "b=2"]);
            assert_eq!(headers, vec!["X-Trace: on"]);
            assert!(body.is_none());
        }
        _ => panic!("Expected Request command"),
    }
}

#[test]
fn test_request_requires_path() {
    assert!(Cli::try_parse_from(["brrtdispatch", "request", "--table", "t.yaml"]).is_err());
}

#[test]
fn test_build_request_merges_cookies_and_headers() {
    let cookies = vec!["theme=dark mode".to_string(), "visits=3".to_string()];
    let headers = vec!["X-Trace: on".to_string()];
    let request = build_request("put", "/pets/1?x=1", &cookies, &headers, Some(r#"{"a":1}"#)).unwrap();

    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/pets/1");
    assert_eq!(request.param("x"), Some("1"));
    assert_eq!(request.header("x-trace"), Some("on"));
    assert_eq!(request.cookies.get("theme").map(String::as_str), Some("dark mode"));
    assert_eq!(request.cookies.get("visits").map(String::as_str), Some("3"));
    assert_eq!(request.body, Some(serde_json::json!({"a": 1})));
}

#[test]
fn test_build_request_rejects_malformed_input() {
    assert!(build_request("GET", "/", &["novalue".to_string()], &[], None).is_err());
    assert!(build_request("GET", "/", &[], &["NoColon".to_string()], None).is_err());
    assert!(build_request("GET", "/", &[], &[], Some("{not json")).is_err());
}

#[test]
fn test_build_router_rejects_unknown_action() {
    let table = RouteTable {
        routes: vec![RouteEntry {
            method: "GET".into(),
            path: "/".into(),
            action: "explode".into(),
        }],
    };
    let err = table.build_router().unwrap_err();
    assert!(format!("{err:#}").contains("no action 'explode'"));
}
