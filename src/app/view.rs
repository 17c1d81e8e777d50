// SPDX-License-Identifier: MPL-2.0
//! Text rendering of application state for the shell.

use super::App;
use crate::editor::format_date;
use crate::timer::{Clock, Scheduler};
use crate::ui::notifications::{NotificationEvent, NotificationMessage, Toast};
use tokio::sync::broadcast::{self, error::TryRecvError};

fn toast_line(toast: &Toast) -> String {
    format!("[{}] {} ({})", toast.kind(), toast.message(), toast.id())
}

impl<S> App<S>
where
    S: Scheduler<NotificationMessage> + Clock,
{
    pub(super) fn render_header(&self) -> String {
        let directory = self
            .editor
            .directory()
            .map_or_else(|| "no directory".to_string(), |dir| dir.path().display().to_string());
        format!("mdnotes - {directory} - theme: {} (type `help`)", self.theme.get())
    }

    pub(super) fn render_files(&self) -> Vec<String> {
        if !self.editor.is_folder_selected() {
            return vec!["No directory open; use `cd <dir>`".to_string()];
        }
        if self.editor.files().is_empty() {
            return vec!["No notes".to_string()];
        }

        let selected = self.editor.selected().map(|entry| &entry.handle);
        self.editor
            .files()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let marker = if Some(&entry.handle) == selected { '*' } else { ' ' };
                let modified = entry
                    .modified
                    .as_ref()
                    .map(format_date)
                    .unwrap_or_default();
                format!("{marker}{:>3}  {:<32} {modified}", index + 1, entry.name)
            })
            .collect()
    }

    pub(super) fn render_note(&self) -> Vec<String> {
        let Some(entry) = self.editor.selected() else {
            return vec!["No note open".to_string()];
        };

        let dirty = if self.editor.is_dirty() { " (modified)" } else { "" };
        let mut lines = vec![format!("== {}{dirty}", self.editor.title())];
        if let Some(created) = &entry.created {
            lines.push(format!("created {}", format_date(created)));
        }
        lines.extend(self.editor.content().lines().map(str::to_string));
        lines
    }

    pub(super) fn render_toasts(&self) -> Vec<String> {
        let visible = self.notifications.visible().map(|toast| {
            let state = if toast.is_closing() {
                " closing"
            } else if self.notifications.is_paused(toast.id()) {
                " paused"
            } else {
                ""
            };
            format!("{}{state}", toast_line(toast))
        });
        let queued = self
            .notifications
            .queued()
            .map(|toast| format!("{} queued", toast_line(toast)));

        visible.chain(queued).collect()
    }

    /// Renders every pending toast event. Toasts that appear print their
    /// message; removals print a short notice.
    pub(super) fn drain_events(
        &self,
        events: &mut broadcast::Receiver<NotificationEvent>,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            match events.try_recv() {
                Ok(NotificationEvent::Shown(id)) => {
                    if let Some(toast) = self.notifications.get(id) {
                        lines.push(toast_line(toast));
                    }
                }
                Ok(NotificationEvent::Removed(id)) => lines.push(format!("({id} closed)")),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "toast events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, Command, Flags, Flow};
    use crate::timer::ManualScheduler;
    use crate::ui::notifications::EXIT_ANIMATION;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn listing_marks_selected_note() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join("a.md"), "").unwrap();
        fs::write(temp_dir.path().join("b.md"), "").unwrap();
        let flags = Flags {
            directory: Some(temp_dir.path().display().to_string()),
            config_dir: Some(temp_dir.path().join(".config").display().to_string()),
            data_dir: Some(temp_dir.path().join(".data").display().to_string()),
            ..Flags::default()
        };
        let mut app = App::new(flags, ManualScheduler::new());
        app.execute(Command::Open(2));

        let Flow::Continue(lines) = app.execute(Command::List) else {
            panic!("list must not quit");
        };

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(' '));
        assert!(lines[1].starts_with('*'));
        assert!(lines[1].contains("b.md"));
    }

    #[test]
    fn events_render_shown_and_closed() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let flags = Flags {
            config_dir: Some(temp_dir.path().join("config").display().to_string()),
            data_dir: Some(temp_dir.path().join("data").display().to_string()),
            ..Flags::default()
        };
        let mut app = App::new(flags, ManualScheduler::new());
        let mut events = app.notifications().subscribe();

        let id = app.notifications_mut().success("Saved");
        assert_eq!(
            app.drain_events(&mut events),
            vec![format!("[success] Saved ({id})")]
        );

        app.notifications_mut()
            .advance(Duration::from_millis(5000) + EXIT_ANIMATION);
        assert_eq!(app.drain_events(&mut events), vec![format!("({id} closed)")]);
    }
}
