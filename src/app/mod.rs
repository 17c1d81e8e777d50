// SPDX-License-Identifier: MPL-2.0
//! Application root wiring the note editor, toasts and theme together.
//!
//! The `App` struct owns one instance of each component and translates shell
//! commands into calls on them. Outcomes of editor operations are reported
//! as toasts; the shell loop in [`run`] renders toast changes as they happen.

pub mod config;
mod message;
pub mod paths;
pub mod persisted_state;
mod update;
mod view;

pub use message::{Command, Flags, ParseCommandError, ThemeRequest, HELP};
pub use update::Flow;

use crate::editor::{Editor, FixedDirectory, LocalFileSystem};
use crate::storage::{
    CookieJar, FileCookieJar, FileStore, KeyValueStore, MemoryCookieJar, NoOpStore,
    SharedAttribute, ThemeAttribute,
};
use crate::timer::{Clock, Scheduler, TokioScheduler};
use crate::ui::notifications::{self, NotificationMessage};
use crate::ui::theming::{self, Theme, ThemeStore};
use config::{COOKIE_FILE, STORAGE_FILE};
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Root application state.
pub struct App<S> {
    editor: Editor<LocalFileSystem>,
    notifications: notifications::Manager<S>,
    theme: ThemeStore,
    /// Same attribute the theme store writes to; read back for display.
    theme_attribute: SharedAttribute,
    app_state: persisted_state::AppState,
    data_dir: Option<PathBuf>,
}

impl<S> fmt::Debug for App<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("directory", &self.editor.directory())
            .field("theme", &self.theme.get())
            .finish_non_exhaustive()
    }
}

impl<S> App<S>
where
    S: Scheduler<NotificationMessage> + Clock,
{
    /// Loads configuration and state, restores the theme and opens the notes
    /// directory, reporting any problem as a toast.
    pub fn new(flags: Flags, scheduler: S) -> Self {
        let config_dir = paths::get_app_config_dir_with_override(flags.config_dir.map(PathBuf::from));
        let data_dir = paths::get_app_data_dir_with_override(flags.data_dir.map(PathBuf::from));

        let (config, config_warning) = config::load_with_override(config_dir.clone());
        let (app_state, state_warning) = persisted_state::AppState::load_from(data_dir.clone());

        let storage: Box<dyn KeyValueStore> = match &config_dir {
            Some(dir) => Box::new(FileStore::new(dir.join(STORAGE_FILE))),
            None => Box::new(NoOpStore),
        };
        let cookies: Box<dyn CookieJar> = match &data_dir {
            Some(dir) => Box::new(FileCookieJar::new(dir.join(COOKIE_FILE))),
            None => Box::new(MemoryCookieJar::new()),
        };

        let mut theme_attribute = SharedAttribute::new();
        theming::seed_attribute_from_cookie(&*cookies, &mut theme_attribute);

        let mut theme = ThemeStore::new(storage, cookies, theme_attribute.clone());
        theme.initialize();

        let mut notifications = notifications::Manager::new(scheduler)
            .with_default_duration(config.notifications.default_duration());

        if let Some(requested) = flags.theme {
            if !theme.set_from_str(&requested) {
                notifications.warning(format!("Unknown theme `{requested}`"));
            }
        }

        for warning in [config_warning, state_warning].into_iter().flatten() {
            notifications.warning(warning);
        }

        let editor = Editor::new(LocalFileSystem)
            .with_sort_order(config.display.sort_order.unwrap_or_default());

        let mut app = Self {
            editor,
            notifications,
            theme,
            theme_attribute,
            app_state,
            data_dir,
        };

        let directory = flags
            .directory
            .map(PathBuf::from)
            .or_else(|| config.general.notes_dir.clone())
            .or_else(|| app.app_state.last_directory.clone());
        if let Some(directory) = directory {
            app.open_directory(directory);
        }

        app
    }

    /// Opens `directory` in the editor, reporting the outcome as a toast.
    /// Returns whether the editor switched to it.
    fn open_directory(&mut self, directory: PathBuf) -> bool {
        let mut picker = FixedDirectory::new(directory.clone());
        match self.editor.load_files(&mut picker) {
            Ok(true) => {
                self.app_state.last_directory = Some(directory);
                self.notifications
                    .info(format!("{} notes", self.editor.files().len()));
                true
            }
            Ok(false) => false,
            Err(err) => {
                self.notifications.error(err.to_string());
                false
            }
        }
    }

    pub fn editor(&self) -> &Editor<LocalFileSystem> {
        &self.editor
    }

    pub fn notifications(&self) -> &notifications::Manager<S> {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut notifications::Manager<S> {
        &mut self.notifications
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// Current value of the theme attribute.
    #[must_use]
    pub fn theme_attribute(&self) -> Option<String> {
        self.theme_attribute.get()
    }

    /// Feeds a delivered timer message back to the toast manager.
    pub fn handle_timer(&mut self, message: &NotificationMessage) {
        self.notifications.handle_message(message);
    }

    /// Dismisses every toast and saves session state.
    pub fn shutdown(&mut self) {
        self.notifications.clear_all();
        if let Some(warning) = self.app_state.save_to(self.data_dir.clone()) {
            tracing::warn!(%warning, "session state not saved");
        }
    }
}

/// Runs the interactive shell on stdin until `quit` or end of input, then
/// shuts the application down.
pub async fn run(flags: Flags) {
    let (scheduler, mut timers) = TokioScheduler::new();
    let mut app = App::new(flags, scheduler);

    drive(
        &mut app,
        BufReader::new(tokio::io::stdin()),
        &mut timers,
        &mut std::io::stdout(),
    )
    .await;

    app.shutdown();
}

/// Reads commands from `input` and timer deliveries from `timers` until
/// `quit`, end of input, or an unrecoverable read or write error. Lines that
/// are not valid UTF-8 are skipped.
async fn drive<S, R, W>(
    app: &mut App<S>,
    input: R,
    timers: &mut mpsc::UnboundedReceiver<NotificationMessage>,
    out: &mut W,
) where
    S: Scheduler<NotificationMessage> + Clock,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut events = app.notifications().subscribe();
    let mut lines = input.lines();

    let mut output = vec![app.render_header()];
    output.extend(app.render_toasts());

    loop {
        if let Err(err) = output.drain(..).try_for_each(|line| writeln!(out, "{line}")) {
            tracing::warn!(%err, "cannot write to output, stopping");
            return;
        }

        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let flow = match line.parse::<Command>() {
                        Ok(command) => app.execute(command),
                        Err(err) if err.0.is_empty() => Flow::Continue(Vec::new()),
                        Err(err) => Flow::Continue(vec![err.to_string()]),
                    };
                    match flow {
                        Flow::Continue(reply) => output.extend(reply),
                        Flow::Quit => return,
                    }
                }
                Ok(None) => return,
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    tracing::warn!(%err, "skipping unreadable input line");
                    output.push("Input line is not valid UTF-8; ignored".to_string());
                }
                Err(err) => {
                    tracing::warn!(%err, "cannot read input, stopping");
                    return;
                }
            },
            Some(message) = timers.recv() => app.handle_timer(&message),
        }

        output.extend(app.drain_events(&mut events));
    }
}
