//! Prompt mode end to end: template, ask, history, vault note.

mod common;

use chrono::NaiveDateTime;
use common::{app_config_for, dead_url, MockChat};
use jester::history::TIMESTAMP_FORMAT;
use jester::{
    ask_and_record, Action, ActionFlags, AiClient, HistoryLog, JesterError, NoteSink, PromptKind,
};

#[tokio::test]
async fn k_successful_asks_leave_k_entries_in_order() {
    let mock = MockChat::answering("an answer").await;
    let client = AiClient::new(&mock.app_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let history = HistoryLog::new(dir.path().join("history.json"));

    let topics = ["tides", "entropy", "the Odyssey"];
    for topic in topics {
        let prompt = PromptKind::Summarize.render(topic);
        let exchange = ask_and_record(&client, &history, prompt).await.unwrap();
        assert!(exchange.reply.is_success());
    }

    let entries = history.load().await.unwrap();
    assert_eq!(entries.len(), topics.len());
    for (entry, topic) in entries.iter().zip(topics) {
        assert!(entry.prompt.contains(topic));
        assert_eq!(entry.response, "an answer");
        NaiveDateTime::parse_from_str(&entry.timestamp, TIMESTAMP_FORMAT)
            .unwrap_or_else(|e| panic!("bad timestamp {:?}: {e}", entry.timestamp));
    }
    assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(mock.requests().len(), topics.len());
}

#[tokio::test]
async fn failed_ask_does_not_touch_history() {
    let client = AiClient::new(&app_config_for(&dead_url())).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let history = HistoryLog::new(&path);

    let exchange = ask_and_record(&client, &history, "hi".into())
        .await
        .unwrap();
    assert!(!exchange.reply.is_success());
    assert!(!path.exists());
}

#[tokio::test]
async fn answer_saved_to_vault_verbatim() {
    let mock = MockChat::answering("# Tides\n\nThe moon pulls.\n").await;
    let client = AiClient::new(&mock.app_config()).unwrap();
    let vault = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let history = HistoryLog::new(scratch.path().join("history.json"));

    let exchange = ask_and_record(&client, &history, PromptKind::Question.render("tides?"))
        .await
        .unwrap();
    let path = exchange
        .save_to(&NoteSink::new(vault.path()), "tides.md")
        .await
        .unwrap();

    assert_eq!(path, vault.path().join("tides.md"));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "# Tides\n\nThe moon pulls.\n"
    );
}

#[tokio::test]
async fn missing_vault_directory_is_reported() {
    let vault = tempfile::tempdir().unwrap();
    let gone = vault.path().join("not-created");
    let err = NoteSink::new(&gone).save("note", "x").await.unwrap_err();
    assert!(matches!(err, JesterError::VaultMissing { .. }));
}

#[test]
fn no_flags_is_usage_and_needs_no_network() {
    let action = ActionFlags::default().resolve();
    assert_eq!(action, Action::Usage);
    assert!(!action.uses_network());
    assert!(!action.needs_vault());
}

#[test]
fn vault_dependent_action_without_vault_is_a_config_error() {
    let action = ActionFlags {
        convert: Some("notes.pdf".into()),
        ..Default::default()
    }
    .resolve();
    assert!(action.needs_vault());

    let app = app_config_for("http://127.0.0.1:1/");
    assert!(matches!(
        app.vault_dir(),
        Err(JesterError::VaultNotConfigured)
    ));
}
