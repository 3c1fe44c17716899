//! Shell input handling
//!
//! Maps one line of user input to either a message for `update` or a
//! shell-local action (printing, quitting).

use std::path::PathBuf;

use crate::messages::{DocumentMsg, Msg, VaultMsg};

/// What a line of input asks for
#[derive(Debug, Clone)]
pub enum ShellCommand {
    /// Blank line
    Nothing,
    /// Forward to `update`
    Dispatch(Msg),
    /// Add text to the end of the buffer
    Append(String),
    Tree,
    Show,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  open-vault PATH   open a folder as the vault
  pick-vault        choose the vault with a dialog
  tree              show the vault tree
  toggle PATH       expand or collapse a folder
  select PATH       open a vault document
  open PATH         open a markdown file outside the vault
  pick-file         choose a file with a dialog
  show              print the active document
  edit TEXT         replace the buffer (\\n for newlines)
  append TEXT       add to the end of the buffer
  save              save now
  close             close the active document
  new PATH          create a document in the vault
  delete PATH       delete a document from the vault
  refresh           rescan the vault
  view              cycle split / editor / preview
  status            show session status
  help              show this help
  quit              save pending edits and exit";

/// Parse one input line
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Ok(ShellCommand::Nothing);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word {
        "open-vault" => ShellCommand::Dispatch(Msg::open_vault(path_arg(word, rest)?)),
        "pick-vault" => ShellCommand::Dispatch(Msg::Vault(VaultMsg::ShowOpenFolderDialog)),
        "tree" => ShellCommand::Tree,
        "toggle" => {
            ShellCommand::Dispatch(Msg::Vault(VaultMsg::ToggleFolder(text_arg(word, rest)?)))
        }
        "select" => ShellCommand::Dispatch(Msg::select(text_arg(word, rest)?)),
        "open" => ShellCommand::Dispatch(Msg::Document(DocumentMsg::OpenExternal(path_arg(
            word, rest,
        )?))),
        "pick-file" => ShellCommand::Dispatch(Msg::Document(DocumentMsg::ShowOpenFileDialog)),
        "show" => ShellCommand::Show,
        "edit" => ShellCommand::Dispatch(Msg::edit(unescape(rest))),
        "append" => ShellCommand::Append(unescape(rest)),
        "save" => ShellCommand::Dispatch(Msg::Document(DocumentMsg::Save)),
        "close" => ShellCommand::Dispatch(Msg::Document(DocumentMsg::Close)),
        "new" => {
            ShellCommand::Dispatch(Msg::Vault(VaultMsg::CreateDocument(text_arg(word, rest)?)))
        }
        "delete" => {
            ShellCommand::Dispatch(Msg::Vault(VaultMsg::DeleteDocument(text_arg(word, rest)?)))
        }
        "refresh" => ShellCommand::Dispatch(Msg::Vault(VaultMsg::Refresh)),
        "view" => ShellCommand::Dispatch(Msg::Document(DocumentMsg::CycleViewMode)),
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command: {} (try 'help')", other)),
    };
    Ok(command)
}

fn text_arg(command: &str, rest: &str) -> Result<String, String> {
    let arg = rest.trim();
    if arg.is_empty() {
        Err(format!("{} needs a path", command))
    } else {
        Ok(arg.to_string())
    }
}

fn path_arg(command: &str, rest: &str) -> Result<PathBuf, String> {
    text_arg(command, rest).map(PathBuf::from)
}

/// Expand `\n`, `\t` and `\\`. Other escapes are kept as written.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
