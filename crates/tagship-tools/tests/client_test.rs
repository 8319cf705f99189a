use mockall::Sequence;
use mockall::mock;
use semver::Version;
use std::path::Path;
use tagship_core::{EnvMap, RegistryConfig, ToolsConfig, WaitDuration};
use tagship_tools::{Invocation, PromotionRequest, ToolClient, ToolError, ToolExecutor};

mock! {
    Executor {}

    impl ToolExecutor for Executor {
        async fn exec(&self, cmd: &Invocation) -> Result<String, ToolError>;
        async fn exec_streaming(&self, cmd: &Invocation) -> Result<(), ToolError>;
    }
}

fn client(mock: MockExecutor) -> ToolClient<MockExecutor> {
    ToolClient::with_executor(mock, ToolsConfig::default())
}

fn failed(code: i32) -> ToolError {
    ToolError::CommandFailed {
        command: "test".to_owned(),
        code: Some(code),
        stderr: String::new(),
    }
}

fn args_are(cmd: &Invocation, expected: &[&str]) -> bool {
    cmd.args.iter().map(String::as_str).eq(expected.iter().copied())
}

// ── Git config ──

#[tokio::test]
async fn config_value_returns_trimmed_value() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|cmd| cmd.program == "git" && args_are(cmd, &["config", "--get", "user.name"]))
        .returning(|_| Ok("Release Bot\n".to_owned()));

    let value = client(mock)
        .config_value(Path::new("/work"), &EnvMap::new(), "user.name")
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("Release Bot"));
}

#[tokio::test]
async fn config_value_unset_key_is_none() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| Err(failed(1)));

    let value = client(mock)
        .config_value(Path::new("/work"), &EnvMap::new(), "user.email")
        .await
        .unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn config_value_blank_is_none() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| Ok("  \n".to_owned()));

    let value = client(mock)
        .config_value(Path::new("/work"), &EnvMap::new(), "user.email")
        .await
        .unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn config_value_other_failures_propagate() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| Err(failed(128)));

    let result = client(mock)
        .config_value(Path::new("/work"), &EnvMap::new(), "user.name")
        .await;
    assert!(matches!(
        result,
        Err(ToolError::CommandFailed {
            code: Some(128),
            ..
        })
    ));
}

#[tokio::test]
async fn set_config_value_runs_in_given_dir() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|cmd| {
            cmd.cwd == Path::new("/work/repo")
                && args_are(cmd, &["config", "user.email", "bot@example.com"])
                && cmd.env.get("XDG_CONFIG_HOME").map(String::as_str) == Some("/home/ci")
        })
        .times(1)
        .returning(|_| Ok(String::new()));

    let env = EnvMap::from([("XDG_CONFIG_HOME".to_owned(), "/home/ci".to_owned())]);
    client(mock)
        .set_config_value(Path::new("/work/repo"), &env, "user.email", "bot@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn credential_store_is_global() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| args_are(cmd, &["config", "--global", "credential.helper", "store"]))
        .times(1)
        .returning(|_| Ok(()));

    client(mock)
        .configure_credential_store(Path::new("/work"), &EnvMap::new())
        .await
        .unwrap();
}

// ── Tags ──

#[tokio::test]
async fn merged_tags_splits_lines() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|cmd| args_are(cmd, &["tag", "--merged", "HEAD"]))
        .returning(|_| Ok("v1.0.0\n\nv1.2.3\nnightly\n".to_owned()));

    let tags = client(mock).merged_tags(Path::new("/work")).await.unwrap();
    assert_eq!(tags, vec!["v1.0.0", "v1.2.3", "nightly"]);
}

#[tokio::test]
async fn commit_and_tag_runs_in_order() {
    let mut mock = MockExecutor::new();
    let mut seq = Sequence::new();

    mock.expect_exec()
        .withf(|cmd| args_are(cmd, &["add", "--all"]))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(String::new()));
    mock.expect_exec()
        .withf(|cmd| args_are(cmd, &["commit", "--allow-empty", "-m", "release 1.2.4"]))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(String::new()));
    mock.expect_exec()
        .withf(|cmd| args_are(cmd, &["tag", "-fa", "v1.2.4", "-m", "Release version 1.2.4"]))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(String::new()));
    mock.expect_exec_streaming()
        .withf(|cmd| args_are(cmd, &["push", "origin", "v1.2.4"]))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    client(mock)
        .commit_and_tag(Path::new("/work"), &EnvMap::new(), &Version::new(1, 2, 4))
        .await
        .unwrap();
}

#[tokio::test]
async fn commit_failure_stops_before_tagging() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|cmd| cmd.has_arg("add"))
        .returning(|_| Ok(String::new()));
    mock.expect_exec()
        .withf(|cmd| cmd.has_arg("commit"))
        .returning(|_| Err(failed(1)));
    mock.expect_exec()
        .withf(|cmd| cmd.has_arg("tag"))
        .never();
    mock.expect_exec_streaming().never();

    let result = client(mock)
        .commit_and_tag(Path::new("/work"), &EnvMap::new(), &Version::new(0, 1, 0))
        .await;
    assert!(result.is_err());
}

// ── Cluster config store ──

#[tokio::test]
async fn registry_lookup_escapes_key() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|cmd| {
            cmd.program == "kubectl"
                && args_are(
                    cmd,
                    &[
                        "get",
                        "configmap",
                        "jenkins-x-docker-registry",
                        "--namespace",
                        "jx",
                        "--output",
                        "jsonpath={.data.docker\\.registry}",
                    ],
                )
        })
        .returning(|_| Ok("10.0.0.7:5000".to_owned()));

    let host = client(mock)
        .registry_from_cluster(Path::new("/work"), &EnvMap::new(), &RegistryConfig::default())
        .await
        .unwrap();
    assert_eq!(host.as_deref(), Some("10.0.0.7:5000"));
}

#[tokio::test]
async fn registry_lookup_empty_output_is_none() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| Ok(String::new()));

    let host = client(mock)
        .registry_from_cluster(Path::new("/work"), &EnvMap::new(), &RegistryConfig::default())
        .await
        .unwrap();
    assert!(host.is_none());
}

// ── Ecosystem builds ──

#[tokio::test]
async fn maven_set_version_passes_version_and_env() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| {
            cmd.program == "mvn"
                && cmd.has_arg("versions:set")
                && cmd.has_arg("-DnewVersion=2.0.1")
                && cmd.env.get("VERSION").map(String::as_str) == Some("2.0.1")
        })
        .times(1)
        .returning(|_| Ok(()));

    let env = EnvMap::from([("VERSION".to_owned(), "2.0.1".to_owned())]);
    client(mock)
        .maven_set_version(Path::new("/work"), &env, &Version::new(2, 0, 1))
        .await
        .unwrap();
}

#[tokio::test]
async fn npm_set_version_skips_git_tag() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| {
            cmd.program == "npm"
                && args_are(
                    cmd,
                    &["version", "3.4.6", "--no-git-tag-version", "--allow-same-version"],
                )
        })
        .times(1)
        .returning(|_| Ok(()));

    client(mock)
        .npm_set_version(Path::new("/work"), &EnvMap::new(), &Version::new(3, 4, 6))
        .await
        .unwrap();
}

#[tokio::test]
async fn skaffold_build_uses_configured_file() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| cmd.program == "skaffold" && args_are(cmd, &["build", "-f", "skaffold.yaml"]))
        .times(1)
        .returning(|_| Ok(()));

    client(mock)
        .skaffold_build(Path::new("/work"), &EnvMap::new(), "skaffold.yaml")
        .await
        .unwrap();
}

// ── Release workflow ──

#[tokio::test]
async fn changelog_includes_build_and_batch_mode() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| {
            cmd.program == "jx"
                && cmd.cwd == Path::new("/work/charts/widget")
                && args_are(cmd, &["step", "changelog", "--build", "42", "--batch-mode"])
        })
        .times(1)
        .returning(|_| Ok(()));

    client(mock)
        .changelog(
            Path::new("/work/charts/widget"),
            &EnvMap::new(),
            Some("42"),
            true,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn post_build_without_batch_mode() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| {
            args_are(
                cmd,
                &["step", "post", "build", "--image", "reg.example.com/acme/widget:1.2.4"],
            )
        })
        .times(1)
        .returning(|_| Ok(()));

    client(mock)
        .post_build(
            Path::new("/work"),
            &EnvMap::new(),
            "reg.example.com/acme/widget:1.2.4",
            false,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn promote_renders_request() {
    let request = PromotionRequest {
        all_automatic: true,
        version: Version::new(1, 2, 4),
        timeout: "1h".parse::<WaitDuration>().unwrap(),
        poll_interval: "20s".parse::<WaitDuration>().unwrap(),
        helm_repo_name: "releases".to_owned(),
        helm_repo_url: "http://chartmuseum:8080".to_owned(),
        build: None,
        batch_mode: true,
    };

    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| {
            args_are(
                cmd,
                &[
                    "promote",
                    "--all-auto",
                    "--version",
                    "1.2.4",
                    "--timeout",
                    "3600s",
                    "--pull-request-poll-time",
                    "20s",
                    "--helm-repo-name",
                    "releases",
                    "--helm-repo-url",
                    "http://chartmuseum:8080",
                    "--batch-mode",
                ],
            )
        })
        .times(1)
        .returning(|_| Ok(()));

    client(mock)
        .promote(Path::new("/work/charts/widget"), &EnvMap::new(), &request)
        .await
        .unwrap();
}

#[tokio::test]
async fn configured_program_names_are_used() {
    let tools = ToolsConfig {
        workflow: "jx3".to_owned(),
        ..Default::default()
    };
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|cmd| cmd.program == "jx3")
        .times(1)
        .returning(|_| Ok(()));

    ToolClient::with_executor(mock, tools)
        .helm_release(Path::new("/work"), &EnvMap::new(), true)
        .await
        .unwrap();
}
