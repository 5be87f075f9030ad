use std::sync::Mutex;

/// Blocking dialogs the review actions depend on.
pub trait Prompter: Send + Sync {
    /// Yes/no confirmation. `false` aborts the action.
    fn confirm(&self, message: &str) -> bool;
    /// Free-text answer. `None` means the user dismissed the prompt.
    fn prompt(&self, message: &str) -> Option<String>;
    /// Reports a failed action.
    fn alert(&self, message: &str);
}

/// Answers every dialog the same way and keeps what it was shown.
#[derive(Debug, Default)]
pub struct PresetPrompter {
    confirm: bool,
    reply: Option<String>,
    shown: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl PresetPrompter {
    pub fn new(confirm: bool, reply: Option<String>) -> Self {
        Self {
            confirm,
            reply,
            ..Self::default()
        }
    }

    /// Confirms everything and answers prompts with `reply`.
    pub fn accepting(reply: impl Into<String>) -> Self {
        Self::new(true, Some(reply.into()))
    }

    /// Declines every confirmation and dismisses every prompt.
    pub fn declining() -> Self {
        Self::new(false, None)
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    fn record(&self, message: &str) {
        if let Ok(mut guard) = self.shown.lock() {
            guard.push(message.to_string());
        }
    }
}

impl Prompter for PresetPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.record(message);
        self.confirm
    }

    fn prompt(&self, message: &str) -> Option<String> {
        self.record(message);
        self.reply.clone()
    }

    fn alert(&self, message: &str) {
        if let Ok(mut guard) = self.alerts.lock() {
            guard.push(message.to_string());
        }
    }
}
