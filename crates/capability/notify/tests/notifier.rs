use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storewatch_notify::{
    LogNotifier, Notifier, NotifyError, TelegramConfig, build_notifier, notify_best_effort,
};

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn log_notifier_never_fails() {
    let notifier = LogNotifier;
    assert!(notifier.send("🔴 A Loja 1 foi marcada como offline.").await.is_ok());
    assert!(notify_best_effort(&notifier, "hello").await);
}

#[tokio::test]
async fn best_effort_swallows_channel_failure() {
    let notifier = FailingNotifier;
    assert!(!notify_best_effort(&notifier, "hello").await);
}

#[tokio::test]
async fn missing_credentials_degrade_to_log() {
    let notifier: Arc<dyn Notifier> = build_notifier(None).expect("notifier");
    assert!(notifier.send("hello").await.is_ok());
}

#[test]
fn telegram_channel_builds_from_config() {
    let config = TelegramConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        bot_token: "123:abc".to_string(),
        chat_id: "-100".to_string(),
        timeout: Duration::from_millis(200),
    };
    assert!(build_notifier(Some(config)).is_ok());
}

#[test]
fn rejected_error_mentions_status() {
    let err = NotifyError::Rejected {
        status: 403,
        description: "bot was kicked".to_string(),
    };
    assert_eq!(err.to_string(), "channel rejected message (403): bot was kicked");
}
