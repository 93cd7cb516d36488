//! CLI commands driven by a JSON fixture on disk

use std::io::Write;

use hearth_cli::{commands::load_fixture, CliAppConfig, CliError, CommandDispatcher, Commands};

const FIXTURE: &str = r#"{
    "users": [
        { "uid": "linus", "email": "linus@example.com", "password": "penguin" }
    ],
    "notifications": [
        {
            "id": "5f1c1b7e-3f5a-4a39-9a0e-2d8f4f6b9c01",
            "recipient": "linus",
            "kind": "poke",
            "content": "poked you",
            "created_at": 0
        },
        {
            "id": "5f1c1b7e-3f5a-4a39-9a0e-2d8f4f6b9c02",
            "recipient": "linus",
            "kind": "friend_accepted",
            "content": "accepted your friend request",
            "actor": { "username": "ken", "full_name": "Ken Thompson" },
            "created_at": 1000,
            "is_read": true
        }
    ],
    "signed_in": "linus"
}"#;

fn write_fixture() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    file
}

async fn run(command: Commands) -> Result<String, CliError> {
    let file = write_fixture();
    let fixture = load_fixture(file.path().to_str()).unwrap();
    let dispatcher = CommandDispatcher::new(CliAppConfig::default(), fixture);

    let mut out = Vec::new();
    dispatcher.execute(command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn old_notifications_show_calendar_dates() {
    let output = run(Commands::Notifications {
        as_user: "linus".to_string(),
    })
    .await
    .unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "  (K) Ken Thompson accepted your friend request  [friend accepted] 1970-01-01"
    );
    assert_eq!(lines[1], "* (U) Someone poked you  [poke] 1970-01-01");
}

#[tokio::test]
async fn fixture_can_start_signed_in() {
    let output = run(Commands::Route {
        path: "/".to_string(),
        as_user: None,
    })
    .await
    .unwrap();
    assert!(output.contains("[Feed]"));
    assert!(output.contains("Notifications (1)"));
}

#[test]
fn missing_fixture_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = load_fixture(path.to_str()).unwrap_err();
    assert!(err.to_string().contains("Failed to load fixture"));
}
