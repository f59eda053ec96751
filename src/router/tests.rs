use super::{PathPattern, Router};
use crate::controller::{ControllerClass, EchoController};
use http::Method;

fn echo() -> ControllerClass {
    ControllerClass::of::<EchoController>()
}

#[test]
fn test_root_path() {
    let pattern = PathPattern::parse("/").unwrap();
    assert!(pattern.is_match("/"));
    assert!(!pattern.is_match("/x"));
    assert!(pattern.param_names().is_empty());
}

#[test]
fn test_parameterized_path() {
    let pattern = PathPattern::parse("/items/{id}").unwrap();
    assert!(pattern.is_match("/items/123"));
    assert!(pattern.is_match("/items/123/"));
    assert!(!pattern.is_match("/items"));
    assert_eq!(pattern.param_names()[0].as_ref(), "id");
}

#[test]
fn test_nested_path() {
    let pattern = PathPattern::parse("/a/{b}/c").unwrap();
    assert!(pattern.is_match("/a/1/c"));
    assert!(!pattern.is_match("/a/1/d"));
    assert_eq!(pattern.param_names()[0].as_ref(), "b");
}

#[test]
fn test_literal_segments_are_escaped() {
    let pattern = PathPattern::parse("/files/v1.0").unwrap();
    assert!(pattern.is_match("/files/v1.0"));
    assert!(!pattern.is_match("/files/v1x0"));
}

#[test]
fn test_extract_arguments_decodes_values() {
    let pattern = PathPattern::parse("/users/{user_id}/posts/{post_id}").unwrap();
    let args = pattern.extract_arguments("/users/j%20doe/posts/42");
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].0.as_ref(), "user_id");
    assert_eq!(args[0].1, "j doe");
    assert_eq!(args[1].1, "42");
    assert!(pattern.extract_arguments("/elsewhere").is_empty());
}

#[test]
fn test_extract_leading_arguments_from_deeper_path() {
    let pattern = PathPattern::parse("/items/{id}").unwrap();
    assert!(pattern.extract_arguments("/items/5/reviews").is_empty());

    let args = pattern.extract_leading_arguments("/items/5/reviews");
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].1, "5");
    assert_eq!(pattern.extract_leading_arguments("/items/5/")[0].1, "5");
    assert!(pattern.extract_leading_arguments("/items5").is_empty());
    assert!(PathPattern::parse("/").unwrap().extract_leading_arguments("/a/b").is_empty());
}

#[test]
fn test_find_nearest_route_drops_trailing_segments() {
    let router = Router::new()
        .route(Method::GET, "/", echo(), "index")
        .unwrap()
        .route(Method::POST, "/items", echo(), "create")
        .unwrap()
        .route(Method::GET, "/items/{id}", echo(), "show")
        .unwrap();

    let nearest = router.find_nearest_route("/items/7/comments/3").unwrap();
    assert_eq!(nearest.path_pattern(), "/items/{id}");

    let nearest = router.find_nearest_route("/items").unwrap();
    assert_eq!(nearest.method(), &Method::POST);

    let nearest = router.find_nearest_route("/nothing/here").unwrap();
    assert_eq!(nearest.path_pattern(), "/");
}

#[test]
fn test_find_nearest_route_prefers_get() {
    let router = Router::new()
        .route(Method::DELETE, "/items/{id}", echo(), "destroy")
        .unwrap()
        .route(Method::GET, "/items/{id}", echo(), "show")
        .unwrap();

    let nearest = router.find_nearest_route("/items/1").unwrap();
    assert_eq!(nearest.action(), "show");
}

#[test]
fn test_find_nearest_route_without_root() {
    let router = Router::new()
        .route(Method::GET, "/items", echo(), "index")
        .unwrap();
    assert!(router.find_nearest_route("/other").is_none());
}

#[test]
fn test_routes_lists_every_registration() {
    let router = Router::new()
        .route(Method::GET, "/a", echo(), "index")
        .unwrap()
        .route(Method::GET, "/a", echo(), "show")
        .unwrap()
        .route(Method::PUT, "/a/{id}", echo(), "update")
        .unwrap();

    let routes = router.routes();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().any(|r| r.action() == "show"));
    assert!(routes.iter().all(|r| r.action() != "index"));
}
