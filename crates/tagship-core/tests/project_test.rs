use semver::Version;
use tagship_core::{NodeManifest, ProjectKind};
use tempfile::TempDir;

#[test]
fn detects_node_from_package_json() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("package.json"), "{}").unwrap();

    assert_eq!(ProjectKind::detect(tmp.path()), ProjectKind::Node);
    assert!(ProjectKind::Node.uses_manifest_version());
}

#[test]
fn detects_maven_from_pom() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pom.xml"), "<project/>").unwrap();

    assert_eq!(ProjectKind::detect(tmp.path()), ProjectKind::Maven);
    assert!(!ProjectKind::Maven.uses_manifest_version());
}

#[test]
fn node_manifest_wins_over_pom() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pom.xml"), "<project/>").unwrap();
    std::fs::write(tmp.path().join("package.json"), "{}").unwrap();

    assert_eq!(ProjectKind::detect(tmp.path()), ProjectKind::Node);
}

#[test]
fn falls_back_to_tag_only() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Dockerfile"), "FROM scratch").unwrap();

    assert_eq!(ProjectKind::detect(tmp.path()), ProjectKind::TagOnly);
}

#[test]
fn directory_named_package_json_is_ignored() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("package.json")).unwrap();

    assert_eq!(ProjectKind::detect(tmp.path()), ProjectKind::TagOnly);
}

#[test]
fn manifest_reads_version() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("package.json"),
        r#"{ "name": "widget-ui", "version": "3.4.5", "private": true }"#,
    )
    .unwrap();

    let manifest = NodeManifest::load(tmp.path()).unwrap();
    assert_eq!(manifest.version, Version::new(3, 4, 5));
}

#[test]
fn manifest_without_version_errors() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("package.json"), r#"{ "name": "x" }"#).unwrap();

    let err = NodeManifest::load(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("version"), "got: {err}");
}

#[test]
fn manifest_with_invalid_version_errors() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("package.json"), r#"{ "version": "next" }"#).unwrap();

    let err = NodeManifest::load(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("next"), "got: {err}");
}

#[test]
fn manifest_missing_file_errors() {
    let tmp = TempDir::new().unwrap();

    let err = NodeManifest::load(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("package.json"), "got: {err}");
}
