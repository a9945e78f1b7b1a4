//! Interactive session that keeps one controller alive across actions.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{controller::DirectoryController, view::render_view};

const HELP: &str = "\
commands:
  list                 reload the employee list
  find <matricule>     show one employee
  set <field> <value>  edit the new-employee draft
  draft                show the draft
  clear                empty the draft
  submit               create an employee from the draft
  delete <matricule>   remove an employee
  help                 this text
  quit                 leave
";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Find(String),
    Set { field: String, value: String },
    Draft,
    Clear,
    Submit,
    Delete(String),
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let argument = |name: &str| {
        if rest.is_empty() {
            Err(format!("usage: {word} <{name}>"))
        } else {
            Ok(rest.to_string())
        }
    };
    match word {
        "" => Ok(ShellCommand::Empty),
        "list" | "ls" => Ok(ShellCommand::List),
        "find" | "get" => argument("matricule").map(ShellCommand::Find),
        "delete" | "rm" => argument("matricule").map(ShellCommand::Delete),
        "set" => match rest.split_once(char::is_whitespace) {
            Some((field, value)) => Ok(ShellCommand::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            }),
            None if !rest.is_empty() => Ok(ShellCommand::Set {
                field: rest.to_string(),
                value: String::new(),
            }),
            None => Err("usage: set <field> <value>".into()),
        },
        "draft" => Ok(ShellCommand::Draft),
        "clear" => Ok(ShellCommand::Clear),
        "submit" | "add" => Ok(ShellCommand::Submit),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command {other:?}; type `help`")),
    }
}

/// Runs until `quit` or end of input. The list is loaded once up front.
pub async fn run_shell<R, W>(
    controller: &mut DirectoryController,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    controller.load_employees().await;
    write!(out, "{}", render_view(controller.view()))?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                write!(out, "{HELP}")?;
                continue;
            }
            ShellCommand::List => controller.load_employees().await,
            ShellCommand::Find(matricule) => controller.search_for(&matricule).await,
            ShellCommand::Delete(matricule) => controller.delete_employee(&matricule).await,
            ShellCommand::Submit => controller.add_employee().await,
            ShellCommand::Clear => controller.view_mut().draft.reset(),
            ShellCommand::Draft => {}
            ShellCommand::Set { field, value } => {
                if let Err(err) = controller.view_mut().draft.set(&field, value) {
                    writeln!(out, "{err}")?;
                    continue;
                }
            }
        }
        write!(out, "{}", render_view(controller.view()))?;
    }
    Ok(())
}
