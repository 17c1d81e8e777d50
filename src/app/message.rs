// SPDX-License-Identifier: MPL-2.0
//! Runtime flags and the commands accepted by the interactive shell.

use crate::ui::notifications::ToastId;
use std::fmt;
use std::str::FromStr;

/// Flags given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Theme requested with `--theme`, applied after the stored preference.
    pub theme: Option<String>,
    /// Notes directory opened at startup.
    pub directory: Option<String>,
    /// Optional data directory override (state, cookies).
    pub data_dir: Option<String>,
    /// Optional config directory override (settings, theme storage).
    pub config_dir: Option<String>,
}

/// A single line typed into the shell, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the notes of the open directory.
    List,
    /// Open a different directory.
    Cd(String),
    /// Open the note at a 1-based position in the listing.
    Open(usize),
    Title(String),
    /// Replace the note body.
    Write(String),
    /// Append a line to the note body.
    Append(String),
    Show,
    Save,
    New,
    Delete,
    Theme(ThemeRequest),
    Toasts,
    Pause(ToastId),
    Resume(ToastId),
    Dismiss(ToastId),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeRequest {
    Show,
    Toggle,
    Set(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(pub String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseCommandError {}

fn required<'a>(name: &str, rest: &'a str) -> Result<&'a str, ParseCommandError> {
    if rest.is_empty() {
        Err(ParseCommandError(format!("`{name}` needs an argument")))
    } else {
        Ok(rest)
    }
}

fn toast_id(name: &str, rest: &str) -> Result<ToastId, ParseCommandError> {
    required(name, rest)?
        .parse()
        .map_err(|_| ParseCommandError(format!("`{rest}` is not a toast id")))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "ls" | "list" => Command::List,
            "cd" => Command::Cd(required(name, rest)?.to_string()),
            "open" => {
                let index = required(name, rest)?
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index > 0)
                    .ok_or_else(|| ParseCommandError(format!("`{rest}` is not a file number")))?;
                Command::Open(index)
            }
            "title" => Command::Title(required(name, rest)?.to_string()),
            // An empty body is a valid note.
            "write" => Command::Write(rest.to_string()),
            "append" => Command::Append(rest.to_string()),
            "show" => Command::Show,
            "save" => Command::Save,
            "new" => Command::New,
            "rm" | "delete" => Command::Delete,
            "theme" => Command::Theme(match rest {
                "" => ThemeRequest::Show,
                "toggle" => ThemeRequest::Toggle,
                value => ThemeRequest::Set(value.to_string()),
            }),
            "toasts" => Command::Toasts,
            "pause" => Command::Pause(toast_id(name, rest)?),
            "resume" => Command::Resume(toast_id(name, rest)?),
            "dismiss" => Command::Dismiss(toast_id(name, rest)?),
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => return Err(ParseCommandError(String::new())),
            other => return Err(ParseCommandError(format!("Unknown command `{other}`"))),
        };

        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  ls                    list notes in the open directory
  cd <dir>              open another directory
  open <n>              open the n-th note from `ls`
  title <name>          set the title, which is the file name
  write <text>          replace the note body
  append <text>         append a line to the note body
  show                  print the open note
  save                  save the open note (renames when the title changed)
  new                   create an untitled note
  rm                    delete the open note
  theme [light|dark|toggle]
  toasts                list notifications
  pause|resume|dismiss <id>
  clear                 dismiss every notification
  quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("ls".parse::<Command>(), Ok(Command::List));
        assert_eq!("  save ".parse::<Command>(), Ok(Command::Save));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn keeps_argument_text_verbatim() {
        assert_eq!(
            "title  My  Note".parse::<Command>(),
            Ok(Command::Title("My  Note".into()))
        );
        assert_eq!(
            "write # Heading".parse::<Command>(),
            Ok(Command::Write("# Heading".into()))
        );
        assert_eq!("write".parse::<Command>(), Ok(Command::Write(String::new())));
    }

    #[test]
    fn open_requires_positive_number() {
        assert_eq!("open 2".parse::<Command>(), Ok(Command::Open(2)));
        assert!("open 0".parse::<Command>().is_err());
        assert!("open two".parse::<Command>().is_err());
        assert!("open".parse::<Command>().is_err());
    }

    #[test]
    fn theme_arguments() {
        assert_eq!(
            "theme".parse::<Command>(),
            Ok(Command::Theme(ThemeRequest::Show))
        );
        assert_eq!(
            "theme toggle".parse::<Command>(),
            Ok(Command::Theme(ThemeRequest::Toggle))
        );
        assert_eq!(
            "theme light".parse::<Command>(),
            Ok(Command::Theme(ThemeRequest::Set("light".into())))
        );
    }

    #[test]
    fn toast_commands_accept_both_id_forms() {
        assert_eq!(
            "pause toast-3".parse::<Command>(),
            Ok(Command::Pause(ToastId::new(3)))
        );
        assert_eq!(
            "dismiss 3".parse::<Command>(),
            Ok(Command::Dismiss(ToastId::new(3)))
        );
        assert!("resume nope".parse::<Command>().is_err());
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = "frobnicate".parse::<Command>().unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }
}
