use tracing::info;

/// Seam for the platform notification facility. The installed app shows a
/// system notification; headless callers and tests log instead.
/// Implementations must be best-effort: a notification that cannot be shown
/// is dropped silently, and showing one never blocks or fails the operation
/// that triggered it.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Default notifier: writes the notification to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        if body.is_empty() {
            info!("notifica: {}", title);
        } else {
            info!("notifica: {}: {}", title, body);
        }
    }
}
