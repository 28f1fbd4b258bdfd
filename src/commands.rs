use crate::profile::ProfileField;
use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show(Tab),
    Refresh,
    Play(usize),
    ToggleEdit,
    Set(ProfileField, String),
    Save,
    Upload(Option<PathBuf>),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  home | feed          show your videos
  refresh              reload the video list
  play <n>             play or pause video number n
  profile              show your profile
  edit | cancel        start or abandon editing the profile
  set <field> <value>  change name, email or bio while editing
  save                 save profile changes
  upload [path]        upload a video from the media library
  help                 show this help
  quit                 exit";

/// Parse one line of user input
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "home" | "feed" => Command::Show(Tab::Home),
        "refresh" => Command::Refresh,
        "play" => {
            let position = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("Expected a video number, got '{}'", rest))?;
            Command::Play(position)
        }
        "profile" => Command::Show(Tab::Profile),
        "edit" | "cancel" => Command::ToggleEdit,
        "save" => Command::Save,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "upload" => Command::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim()))
                .unwrap_or((rest, ""));
            let field = ProfileField::parse(field)
                .with_context(|| format!("Unknown profile field '{}'", field))?;
            Command::Set(field, value.to_string())
        }
        "" => return Err(anyhow::anyhow!("Empty command")),
        other => return Err(anyhow::anyhow!("Unknown command '{}', try `help`", other)),
    };

    Ok(command)
}

/// Read commands line by line and forward them to the app
///
/// Unparseable lines are reported and skipped. EOF is treated as `quit`.
/// Blocks the calling thread, so it must not run on a runtime worker.
pub fn forward_commands(reader: impl BufRead, tx: &mpsc::Sender<Command>) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("Failed to read command input")?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                tracing::debug!("Command: {:?}", command);
                if tx.blocking_send(command).is_err() {
                    return Ok(());
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    tracing::debug!("Command input closed");
    let _ = tx.blocking_send(Command::Quit);
    Ok(())
}

/// Forward stdin; run it on its own OS thread, never on the blocking pool,
/// or runtime shutdown waits for the next line
pub fn monitor_stdin(tx: mpsc::Sender<Command>) -> Result<()> {
    forward_commands(std::io::stdin().lock(), &tx)
}
