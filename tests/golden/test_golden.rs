use std::fs;
use std::path::{Path, PathBuf};

use pom_mcp_server::config::ServerConfig;
use pom_mcp_server::handlers;
use pom_mcp_server::pom::PomDocument;
use pom_mcp_server::protocol::{JsonRpcRequest, RpcId};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/fixtures")
}

fn expected_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden/expected")
        .join(name)
}

fn read_expected(name: &str) -> String {
    fs::read_to_string(expected_path(name))
        .expect("expected file missing")
        .trim_end()
        .to_string()
}

fn fixture_text() -> String {
    fs::read_to_string(fixtures_root().join("jakarta-pom.xml")).expect("fixture POM missing")
}

/// Copy the fixture into a fresh directory and point a config at it.
fn fixture_copy() -> (tempfile::TempDir, ServerConfig) {
    let dir = tempdir().unwrap();
    let pom = dir.path().join("pom.xml");
    fs::copy(fixtures_root().join("jakarta-pom.xml"), &pom).unwrap();
    (dir, ServerConfig::with_pom_path(pom))
}

fn hash_file(path: &Path) -> Vec<u8> {
    let bytes = fs::read(path).expect("failed to read file for hash");
    Sha256::digest(&bytes).to_vec()
}

fn call(name: &str, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(RpcId::Number(1)),
        method: "tools/call".into(),
        params: Some(json!({ "name": name, "arguments": arguments })),
    }
}

async fn tool_text(config: &ServerConfig, name: &str, arguments: Value) -> String {
    let resp = handlers::dispatch(&call(name, arguments), config)
        .await
        .expect("missing response");
    let result = resp.result.expect("tool calls answer with a result");
    result["content"][0]["text"].as_str().unwrap().to_string()
}

#[test]
fn golden_parse_and_write_is_byte_identical() {
    let original = fixture_text();
    let document = PomDocument::parse(&original).unwrap();
    assert_eq!(document.to_xml_string().unwrap(), original);
}

#[tokio::test]
async fn golden_read_only_tools_leave_file_untouched() {
    let (_dir, config) = fixture_copy();
    let pom = config.pom_path();
    let before = hash_file(&pom);

    let reads = [
        ("pom.list_dependencies", json!({})),
        ("pom.list_dependencies", json!({ "profile_id": "it", "scope": "test" })),
        ("pom.list_managed_dependencies", json!({})),
        ("pom.get_dependency", json!({ "group_id": "org.webjars", "artifact_id": "bootstrap" })),
        ("pom.dependency_exists", json!({ "group_id": "x", "artifact_id": "y", "profile_id": "it" })),
        ("pom.list_plugins", json!({})),
        ("pom.list_properties", json!({ "profile_id": null })),
        ("pom.list_profiles", json!({})),
    ];
    for (name, arguments) in reads {
        tool_text(&config, name, arguments).await;
    }

    let read = JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(RpcId::Number(2)),
        method: "resources/read".into(),
        params: Some(json!({ "uri": "pom://project" })),
    };
    let resp = handlers::dispatch(&read, &config).await.unwrap();
    assert_eq!(
        resp.result.unwrap()["contents"][0]["text"].as_str().unwrap(),
        fixture_text()
    );

    assert_eq!(hash_file(&pom), before, "read-only tools must not touch the POM");
}

#[tokio::test]
async fn golden_list_dependencies_output() {
    let (_dir, config) = fixture_copy();

    let first = tool_text(&config, "pom.list_dependencies", json!({})).await;
    let second = tool_text(&config, "pom.list_dependencies", json!({ "profile_id": "null" })).await;

    assert_eq!(first, second, "a \"null\" profile id must list like an absent one");
    assert_eq!(first, read_expected("list_dependencies.json"));
}

#[tokio::test]
async fn golden_list_plugins_output() {
    let (_dir, config) = fixture_copy();
    let output = tool_text(&config, "pom.list_plugins", json!({})).await;
    assert_eq!(output, read_expected("list_plugins.json"));
}

#[tokio::test]
async fn golden_mcp_error_already_exists() {
    let (_dir, config) = fixture_copy();
    let pom = config.pom_path();
    let before = hash_file(&pom);

    let req = call(
        "pom.add_dependency",
        json!({ "group_id": "org.webjars", "artifact_id": "bootstrap", "version": "5.3.3" }),
    );
    let resp = handlers::dispatch(&req, &config).await.expect("missing response");
    let json = serde_json::to_string(&resp).unwrap();

    assert_eq!(json, read_expected("error_already_exists.json"));
    assert_eq!(hash_file(&pom), before, "a rejected add must not rewrite the POM");
}

#[tokio::test]
async fn golden_add_then_remove_restores_bytes() {
    let (_dir, config) = fixture_copy();
    let pom = config.pom_path();
    let before = hash_file(&pom);

    let edits = [
        (
            "pom.add_dependency",
            json!({ "group_id": "org.slf4j", "artifact_id": "slf4j-api", "version": "2.0.13" }),
            "pom.remove_dependency",
            json!({ "group_id": "org.slf4j", "artifact_id": "slf4j-api" }),
        ),
        (
            "pom.add_managed_dependency",
            json!({ "group_id": "org.junit", "artifact_id": "junit-bom", "version": "5.10.2", "type": "pom", "scope": "import" }),
            "pom.remove_managed_dependency",
            json!({ "group_id": "org.junit", "artifact_id": "junit-bom" }),
        ),
        (
            "pom.add_plugin",
            json!({ "artifact_id": "maven-war-plugin", "version": "3.4.0", "profile_id": "it" }),
            "pom.remove_plugin",
            json!({ "group_id": "org.apache.maven.plugins", "artifact_id": "maven-war-plugin", "profile_id": "it" }),
        ),
        (
            "pom.add_property",
            json!({ "key": "skipTests", "value": "true" }),
            "pom.remove_property",
            json!({ "key": "skipTests" }),
        ),
    ];

    for (add, add_args, remove, remove_args) in edits {
        let added = tool_text(&config, add, add_args).await;
        assert!(added.contains("\"status\":\"ok\""), "{add} failed: {added}");
        assert_ne!(hash_file(&pom), before, "{add} must change the POM");

        let removed = tool_text(&config, remove, remove_args).await;
        assert!(removed.contains("\"status\":\"ok\""), "{remove} failed: {removed}");
        assert_eq!(hash_file(&pom), before, "{remove} must undo {add} exactly");
    }
}

#[tokio::test]
async fn golden_add_dependency_to_profile_without_section() {
    let (_dir, config) = fixture_copy();

    let text = tool_text(
        &config,
        "pom.add_dependency",
        json!({
            "group_id": "org.slf4j",
            "artifact_id": "slf4j-api",
            "version": "2.0.13",
            "scope": "compile",
            "type": "jar",
            "profile_id": "release"
        }),
    )
    .await;
    assert_eq!(
        text,
        r#"{"status":"ok","message":"Dependency 'org.slf4j:slf4j-api' added to profile 'release'"}"#
    );

    let expected = fixture_text().replace(
        "            <id>release</id>\n",
        concat!(
            "            <id>release</id>\n",
            "            <dependencies>\n",
            "                <dependency>\n",
            "                    <groupId>org.slf4j</groupId>\n",
            "                    <artifactId>slf4j-api</artifactId>\n",
            "                    <version>2.0.13</version>\n",
            "                </dependency>\n",
            "            </dependencies>\n",
        ),
    );
    assert_eq!(fs::read_to_string(config.pom_path()).unwrap(), expected);
}

#[tokio::test]
async fn golden_update_property_escapes_value() {
    let (_dir, config) = fixture_copy();

    tool_text(
        &config,
        "pom.update_property",
        json!({ "key": "version.derby", "value": "10.17 & <later>" }),
    )
    .await;

    let expected = fixture_text().replace(
        "<version.derby>10.16.1.1</version.derby>",
        "<version.derby>10.17 &amp; &lt;later&gt;</version.derby>",
    );
    assert_eq!(fs::read_to_string(config.pom_path()).unwrap(), expected);

    let listed = tool_text(&config, "pom.list_properties", json!({})).await;
    assert!(listed.contains(r#"{"profile_id":null,"key":"version.derby","value":"10.17 & <later>"}"#));
}
