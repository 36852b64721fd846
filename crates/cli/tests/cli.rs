#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use bridgegen_cli::run_cli;

const DESCRIPTION: &str = r#"{
  "callback_structs": [
    { "struct": "LobbyEnter_t", "callback_id": 504, "fields": [
        { "fieldname": "m_ulSteamIDLobby", "fieldtype": "uint64" },
        { "fieldname": "m_bLocked", "fieldtype": "bool" },
        { "fieldname": "m_EChatRoomEnterResponse", "fieldtype": "uint32" } ] },
    { "struct": "GameOverlayActivated_t", "callback_id": 331, "fields": [
        { "fieldname": "m_bActive", "fieldtype": "uint8" } ] }
  ],
  "interfaces": [ { "classname": "ISteamMatchmaking", "methods": [
    { "methodname": "JoinLobby", "returntype": "SteamAPICall_t", "callresult": "LobbyEnter_t" } ] } ]
}"#;

const CONFIG: &str = r#"broadcasts = ["GameOverlayActivated_t"]"#;

fn args(items: &[&str]) -> Vec<String> {
    std::iter::once("bridgegen")
        .chain(items.iter().copied())
        .map(str::to_string)
        .collect()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_generate_then_check() {
    let dir = tempfile::tempdir().unwrap();
    let api = dir.path().join("steam_api.json");
    let config = dir.path().join("bridgegen.toml");
    let out = dir.path().join("src").join("bridge.rs");
    fs::write(&api, DESCRIPTION).unwrap();
    fs::write(&config, CONFIG).unwrap();

    let generate = [
        "generate",
        "--api",
        path_str(&api),
        "--config",
        path_str(&config),
        "--out",
        path_str(&out),
    ];
    assert_eq!(run_cli(args(&generate)), 0);

    let code = fs::read_to_string(&out).unwrap();
    assert!(code.contains("pub fn register_lobby_enter<R: rt::Register>(\n"));
    assert!(code.contains("\"Steam-GameOverlayActivated\""));

    let mut check = generate.to_vec();
    check.push("--check");
    assert_eq!(run_cli(args(&check)), 0);

    fs::write(&out, code.replace("register_lobby_enter", "register_stale")).unwrap();
    assert_eq!(run_cli(args(&check)), 1);
}

#[test]
fn test_manifest_backend() {
    let dir = tempfile::tempdir().unwrap();
    let api = dir.path().join("steam_api.json");
    let out = dir.path().join("bridge.json");
    fs::write(&api, DESCRIPTION).unwrap();

    let code = run_cli(args(&[
        "generate",
        "--api",
        path_str(&api),
        "--backend",
        "manifest",
        "--out",
        path_str(&out),
    ]));
    assert_eq!(code, 0);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let keys: Vec<&str> = manifest["one_shot"][0]["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec!["steam_id_lobby", "locked", "e_chat_room_enter_response", "io_failure"]
    );
    assert!(manifest["broadcasts"].as_array().unwrap().is_empty());
}

#[test]
fn test_errors_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let api = dir.path().join("steam_api.json");
    let config = dir.path().join("bridgegen.toml");

    // Missing description
    assert_eq!(run_cli(args(&["inspect", "--api", path_str(&api)])), 1);

    // Unknown config key
    fs::write(&api, DESCRIPTION).unwrap();
    fs::write(&config, "brodcasts = []\n").unwrap();
    assert_eq!(
        run_cli(args(&["inspect", "--api", path_str(&api), "--config", path_str(&config)])),
        1
    );

    // Native types outside the host crate
    let out = dir.path().join("bridge.rs");
    fs::write(&config, "[rust]\nnative_module = \"steamworks_sys\"\n").unwrap();
    let generate = [
        "generate",
        "--api",
        path_str(&api),
        "--config",
        path_str(&config),
        "--out",
        path_str(&out),
    ];
    assert_eq!(run_cli(args(&generate)), 1);
    assert!(!out.exists());

    // Not JSON
    fs::write(&api, "callback_structs:").unwrap();
    assert_eq!(run_cli(args(&["inspect", "--api", path_str(&api)])), 1);
}

#[test]
fn test_inspect_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let api = dir.path().join("steam_api.json");
    fs::write(&api, DESCRIPTION).unwrap();
    assert_eq!(run_cli(args(&["inspect", "--api", path_str(&api)])), 0);
}
