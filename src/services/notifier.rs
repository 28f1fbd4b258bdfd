use crate::messages::{Notification, UploadState};
use crate::screens;
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

/// One-shot user-facing alert surface
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

struct Console {
    out: Box<dyn Write + Send>,
    upload_state: Option<watch::Receiver<UploadState>>,
    last_progress: Option<String>,
}

impl Console {
    /// Print the progress line for the latest upload state unless it was the last one shown
    fn show_progress(&mut self) {
        let Some(rx) = &self.upload_state else {
            return;
        };
        let line = screens::render_progress(&rx.borrow());

        if line != self.last_progress {
            if let Some(text) = &line {
                self.write_line(text);
            }
            self.last_progress = line;
        }
    }

    fn write_line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

/// Upload progress lines and framed notifications on stdout
///
/// Both go through one lock, so the settled progress line of an attempt is
/// always printed before the notification that ends it.
pub struct ConsoleNotifier {
    console: Mutex<Console>,
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            console: Mutex::new(Console {
                out,
                upload_state: None,
                last_progress: None,
            }),
        }
    }

    pub fn attach_upload_state(&self, rx: watch::Receiver<UploadState>) {
        self.lock().upload_state = Some(rx);
    }

    pub fn show_progress(&self) {
        self.lock().show_progress();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Console> {
        self.console.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render(notification: &Notification) -> String {
        let width = notification
            .title
            .chars()
            .count()
            .max(notification.message.chars().count())
            + 4;
        let rule = "─".repeat(width);
        format!(
            "┌{rule}┐\n  {}\n  {}\n└{rule}┘",
            notification.title, notification.message
        )
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::debug!("Notify: {} / {}", notification.title, notification.message);
        let mut console = self.lock();
        console.show_progress();
        console.write_line(&Self::render(notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::UploadPhase;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn uploading(progress_percent: f64) -> UploadState {
        UploadState {
            phase: UploadPhase::Uploading,
            progress_percent,
            asset: None,
        }
    }

    #[test]
    fn test_render_contains_title_and_message() {
        let rendered = ConsoleNotifier::render(&Notification::new("Success", "Done!"));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].trim(), "Success");
        assert_eq!(lines[2].trim(), "Done!");
        assert_eq!(lines[0].chars().count(), lines[3].chars().count());
    }

    #[test]
    fn test_final_progress_line_precedes_notification() {
        let buffer = SharedBuffer::default();
        let console = ConsoleNotifier::with_writer(Box::new(buffer.clone()));
        let (tx, rx) = watch::channel(UploadState::default());
        console.attach_upload_state(rx);

        tx.send_replace(uploading(40.0));
        console.show_progress();
        console.show_progress();

        // The reporter never got to see 100 before the result settled
        tx.send_replace(UploadState {
            phase: UploadPhase::Done,
            ..uploading(100.0)
        });
        console.notify(&Notification::new("Success", "Video uploaded successfully!"));
        console.show_progress();

        tx.send_replace(UploadState::default());
        console.show_progress();

        let lines = buffer.lines();
        assert_eq!(lines[0], "40% complete  Uploading...");
        assert_eq!(lines[1], "100% complete  Processing...");
        assert!(lines[2].starts_with('┌'));
        assert_eq!(lines[3].trim(), "Success");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_notification_without_upload_prints_box_only() {
        let buffer = SharedBuffer::default();
        let console = ConsoleNotifier::with_writer(Box::new(buffer.clone()));
        let (_tx, rx) = watch::channel(UploadState::default());
        console.attach_upload_state(rx);

        console.notify(&Notification::new("Success", "Profile updated successfully!"));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].trim(), "Profile updated successfully!");
    }
}
