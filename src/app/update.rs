// SPDX-License-Identifier: MPL-2.0
//! Command dispatch for the application root.

use super::message::{Command, ThemeRequest, HELP};
use super::App;
use crate::timer::{Clock, Scheduler};
use crate::ui::notifications::NotificationMessage;
use std::path::PathBuf;

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands; print these lines first.
    Continue(Vec<String>),
    Quit,
}

impl<S> App<S>
where
    S: Scheduler<NotificationMessage> + Clock,
{
    /// Applies one command. Editor failures become error toasts rather than
    /// output lines so they show up the same way whatever triggered them.
    pub fn execute(&mut self, command: Command) -> Flow {
        let output = match command {
            Command::List => self.render_files(),
            Command::Cd(directory) => {
                let unsaved = self.unsaved_title();
                if self.open_directory(PathBuf::from(directory)) {
                    self.warn_discarded(unsaved);
                }
                Vec::new()
            }
            Command::Open(index) => self.handle_open(index),
            Command::Title(title) => {
                self.editor.set_title(title);
                Vec::new()
            }
            Command::Write(text) => {
                self.editor.set_content(text);
                Vec::new()
            }
            Command::Append(text) => {
                let content = if self.editor.content().is_empty() {
                    text
                } else {
                    format!("{}\n{text}", self.editor.content())
                };
                self.editor.set_content(content);
                Vec::new()
            }
            Command::Show => self.render_note(),
            Command::Save => {
                self.handle_save();
                Vec::new()
            }
            Command::New => {
                self.handle_new();
                Vec::new()
            }
            Command::Delete => {
                self.handle_delete();
                Vec::new()
            }
            Command::Theme(request) => self.handle_theme(request),
            Command::Toasts => self.render_toasts(),
            Command::Pause(id) => {
                self.notifications
                    .handle_message(&NotificationMessage::Pause(id));
                Vec::new()
            }
            Command::Resume(id) => {
                self.notifications
                    .handle_message(&NotificationMessage::Resume(id));
                Vec::new()
            }
            Command::Dismiss(id) => {
                self.notifications
                    .handle_message(&NotificationMessage::Dismiss(id));
                Vec::new()
            }
            Command::Clear => {
                self.notifications.clear_all();
                Vec::new()
            }
            Command::Help => HELP.lines().map(str::to_string).collect(),
            Command::Quit => return Flow::Quit,
        };

        Flow::Continue(output)
    }

    /// Title of the note being edited, if it has unsaved edits.
    fn unsaved_title(&self) -> Option<String> {
        self.editor
            .is_dirty()
            .then(|| self.editor.title().to_string())
    }

    /// Reports edits dropped by a switch that has already succeeded.
    fn warn_discarded(&mut self, unsaved: Option<String>) {
        if let Some(name) = unsaved {
            self.notifications
                .warning(format!("Unsaved changes to {name} were discarded"));
        }
    }

    fn handle_open(&mut self, index: usize) -> Vec<String> {
        let entry = index
            .checked_sub(1)
            .and_then(|position| self.editor.files().get(position))
            .cloned();
        let Some(entry) = entry else {
            self.notifications
                .error(format!("No note number {index}; run `ls` to list notes"));
            return Vec::new();
        };

        let unsaved = self.unsaved_title();
        match self.editor.select(&entry.handle) {
            Ok(()) => {
                self.warn_discarded(unsaved);
                self.render_note()
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Vec::new()
            }
        }
    }

    fn handle_save(&mut self) {
        match self.editor.save() {
            Ok(()) => {
                let name = self
                    .editor
                    .selected()
                    .map(|entry| entry.name.clone())
                    .unwrap_or_default();
                self.notifications.success(format!("Saved {name}"));
            }
            Err(err) => {
                self.notifications.error(err.to_string());
            }
        }
    }

    fn handle_new(&mut self) {
        let unsaved = self.unsaved_title();
        match self.editor.create_new_file() {
            Ok(handle) => {
                self.warn_discarded(unsaved);
                self.notifications
                    .success(format!("Created {}", handle.name()));
            }
            Err(err) => {
                self.notifications.error(err.to_string());
            }
        }
    }

    fn handle_delete(&mut self) {
        let name = self.editor.selected().map(|entry| entry.name.clone());
        match self.editor.delete_selected_file() {
            Ok(()) => {
                self.notifications
                    .success(format!("Deleted {}", name.unwrap_or_default()));
            }
            Err(err) => {
                self.notifications.error(err.to_string());
            }
        }
    }

    fn handle_theme(&mut self, request: ThemeRequest) -> Vec<String> {
        match request {
            ThemeRequest::Show => {}
            ThemeRequest::Toggle => {
                self.theme.toggle();
            }
            ThemeRequest::Set(value) => {
                if !self.theme.set_from_str(&value) {
                    self.notifications
                        .warning(format!("Unknown theme `{value}`"));
                }
            }
        }
        vec![format!("theme: {}", self.theme.get())]
    }
}
