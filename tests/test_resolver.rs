use std::fs;

use staticd::http::error::ServeError;
use staticd::http::resolver::PathResolver;
use tempfile::TempDir;

fn docroot() -> (TempDir, PathResolver) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("www");
    fs::create_dir_all(root.join("css")).unwrap();
    fs::write(root.join("index.html"), "home").unwrap();
    fs::write(root.join("css/site.css"), "body{}").unwrap();
    fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

    let resolver = PathResolver::new(&root).unwrap();
    (dir, resolver)
}

#[test]
fn test_resolve_file_inside_root() {
    let (_dir, resolver) = docroot();
    let resolved = resolver.resolve(b"/css/site.css").unwrap();

    assert_eq!(resolved.as_path(), resolver.root().join("css/site.css"));
}

#[test]
fn test_root_uri_maps_to_index() {
    let (_dir, resolver) = docroot();
    let resolved = resolver.resolve(b"/").unwrap();

    assert_eq!(resolved.as_path(), resolver.root().join("index.html"));
}

#[test]
fn test_dot_segments_inside_root_are_allowed() {
    let (_dir, resolver) = docroot();
    let resolved = resolver.resolve(b"/css/../index.html").unwrap();

    assert_eq!(resolved.as_path(), resolver.root().join("index.html"));
}

#[test]
fn test_directory_resolves_without_index() {
    let (_dir, resolver) = docroot();
    let resolved = resolver.resolve(b"/css").unwrap();

    assert_eq!(resolved.as_path(), resolver.root().join("css"));
}

#[test]
fn test_missing_file_fails() {
    let (_dir, resolver) = docroot();

    assert!(matches!(
        resolver.resolve(b"/nope.html"),
        Err(ServeError::UnresolvedResource(_))
    ));
}

#[test]
fn test_dot_dot_escape_fails() {
    let (_dir, resolver) = docroot();

    // the target exists, one level above the root
    assert!(resolver.resolve(b"/../secret.txt").is_err());
    assert!(resolver.resolve(b"/css/../../secret.txt").is_err());
    assert!(resolver.resolve(b"/../../../../../../etc/passwd").is_err());
}

#[test]
fn test_sibling_with_common_prefix_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("www")).unwrap();
    fs::create_dir(dir.path().join("www-evil")).unwrap();
    fs::write(dir.path().join("www-evil/page.html"), "evil").unwrap();
    let resolver = PathResolver::new(dir.path().join("www")).unwrap();

    assert!(resolver.resolve(b"/../www-evil/page.html").is_err());
}

#[cfg(unix)]
#[test]
fn test_symlink_out_of_root_fails() {
    let (dir, resolver) = docroot();
    std::os::unix::fs::symlink(
        dir.path().join("secret.txt"),
        resolver.root().join("link.txt"),
    )
    .unwrap();

    assert!(resolver.resolve(b"/link.txt").is_err());
}

#[cfg(unix)]
#[test]
fn test_symlink_within_root_is_followed() {
    let (_dir, resolver) = docroot();
    std::os::unix::fs::symlink(
        resolver.root().join("css/site.css"),
        resolver.root().join("alias.css"),
    )
    .unwrap();

    let resolved = resolver.resolve(b"/alias.css").unwrap();
    assert_eq!(resolved.as_path(), resolver.root().join("css/site.css"));
}

#[test]
fn test_resolution_is_idempotent() {
    let (_dir, resolver) = docroot();

    assert_eq!(
        resolver.resolve(b"/css/site.css").unwrap(),
        resolver.resolve(b"/css/site.css").unwrap()
    );
}

#[test]
fn test_non_utf8_uri_fails() {
    let (_dir, resolver) = docroot();

    assert!(resolver.resolve(b"/\xff\xfe").is_err());
}

#[test]
fn test_root_must_be_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, "x").unwrap();

    assert!(PathResolver::new(&file).is_err());
    assert!(PathResolver::new(dir.path().join("missing")).is_err());
}
