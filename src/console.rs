//! Line-oriented front end for the user manager.
//!
//! Holds no state of its own: every command becomes one manager request and
//! the page is redrawn from a fresh view afterwards.

use std::fmt::Write as _;
use std::io::ErrorKind;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, warn};

use crate::clients::UserManagerClient;
use crate::domain::UserId;
use crate::manager::{ManagerView, SubmitOutcome};
use crate::user_actor::UserError;

const HELP: &str = "\
Commands:
  name <text>    set the draft name
  email <text>   set the draft email
  submit         add the draft, or save the user being edited
  edit <id>      load a user into the form
  cancel         leave edit mode and clear the form
  delete <id>    remove a user
  list           redraw the table (reloads from the service in remote mode)
  help           show this text
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Email(String),
    Submit,
    Edit(UserId),
    Cancel,
    Delete(UserId),
    List,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let id = |rest: &str| {
            if rest.is_empty() {
                Err(format!("`{word}` needs a user id"))
            } else {
                Ok(UserId::from(rest))
            }
        };
        match word {
            "name" => Ok(Command::Name(rest.to_string())),
            "email" => Ok(Command::Email(rest.to_string())),
            "submit" => Ok(Command::Submit),
            "edit" => id(rest).map(Command::Edit),
            "cancel" => Ok(Command::Cancel),
            "delete" => id(rest).map(Command::Delete),
            "list" | "" => Ok(Command::List),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command `{other}`. Type `help`.")),
        }
    }
}

/// Draws the form heading, draft, users table and any notice.
pub fn render(view: &ManagerView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== User Management ==");
    let _ = writeln!(out, "{}", view.heading);
    let _ = writeln!(
        out,
        "  name: {:?}  email: {:?}  [{}]",
        view.draft.name, view.draft.email, view.submit_label
    );

    let id_width = view.users.iter().map(|u| u.id.as_str().chars().count()).chain([2]).max().unwrap_or(2);
    let name_width = view.users.iter().map(|u| u.name.chars().count()).chain([4]).max().unwrap_or(4);
    let _ = writeln!(out, "{:<id_width$}  {:<name_width$}  Email", "ID", "Name");
    for user in &view.users {
        let _ = writeln!(out, "{:<id_width$}  {:<name_width$}  {}", user.id.as_str(), user.name, user.email);
    }
    if view.users.is_empty() {
        let _ = writeln!(out, "(no users)");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

/// Applies one command. Returns a message to print, if any.
async fn dispatch(manager: &UserManagerClient, command: Command) -> Result<Option<String>, UserError> {
    match command {
        Command::Name(name) => manager.set_name(name).await.map(|()| None),
        Command::Email(email) => manager.set_email(email).await.map(|()| None),
        Command::Submit => Ok(match manager.submit().await? {
            SubmitOutcome::Created(user) => Some(format!("Added user {}", user.id)),
            SubmitOutcome::Updated(Some(user)) => Some(format!("Updated user {}", user.id)),
            SubmitOutcome::Updated(None) => Some("The user being edited no longer exists".to_string()),
            SubmitOutcome::Skipped => None,
        }),
        Command::Edit(id) => {
            let view = manager.view().await?;
            match view.users.into_iter().find(|user| user.id == id) {
                Some(user) => manager.begin_edit(user).await.map(|()| None),
                None => Ok(Some(format!("No user with id {id}"))),
            }
        }
        Command::Cancel => manager.cancel_edit().await.map(|()| None),
        Command::Delete(id) => {
            let removed = manager.delete(id.clone()).await?;
            Ok((!removed).then(|| format!("No user with id {id}")))
        }
        Command::List => manager.refresh().await.map(|()| None),
        Command::Help => Ok(Some(HELP.to_string())),
        Command::Quit => Ok(None),
    }
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(manager: &UserManagerClient) -> Result<(), UserError> {
    drive(manager, BufReader::new(tokio::io::stdin())).await
}

/// Lines that are not valid UTF-8 are skipped. Any other read error ends
/// the session.
async fn drive(manager: &UserManagerClient, input: impl AsyncBufRead + Unpin) -> Result<(), UserError> {
    let mut lines = input.lines();
    println!("{}", render(&manager.view().await?));
    println!("Type `help` for commands.");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(error = %e, "Skipping unreadable console line");
                println!("Could not read that line: {e}");
                continue;
            }
            Err(e) => {
                error!(error = %e, "Console input failed");
                println!("Could not read input: {e}");
                break;
            }
        };
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?command, "Console command");
        if command == Command::Quit {
            break;
        }

        // Failures are already on the view as a notice.
        if let Ok(Some(message)) = dispatch(manager, command).await {
            println!("{message}");
        }
        println!("{}", render(&manager.view().await?));
    }
    Ok(())
}
