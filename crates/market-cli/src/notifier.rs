use colored::Colorize;
use market_core::notification::{Notification, NotificationLevel, Notifier};

/// Prints notifications to stderr, one coloured line each.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = match notification.level {
            NotificationLevel::Success => notification.message.green(),
            NotificationLevel::Info => notification.message.bright_blue(),
            NotificationLevel::Warning => notification.message.yellow(),
            NotificationLevel::Error => notification.message.red(),
        };
        eprintln!("{}", line);
    }
}
