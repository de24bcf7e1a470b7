use std::path::PathBuf;

use crate::error::{Error, Result};

/// A user command understood by the review session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a group (overview)
    Select(usize),
    /// Write the report to a new file (overview)
    Export(PathBuf),
    /// Change the preview size, clamped later (overview)
    SetPreviewSize(i64),
    /// Leave the session (overview)
    Quit,
    /// Delete one member from disk (group view)
    DeleteMember(usize),
    /// Delete every member except the first (group view)
    DeleteAll,
    /// Take one member out of the group (group view)
    MarkNonDuplicate(usize),
    /// Show all members side by side (group view)
    CompareAll,
    /// Show selected members side by side (group view)
    CompareSubset(Vec<usize>),
    /// Return to the overview (group view)
    Back,
}

fn invalid(message: &str) -> Error {
    Error::InvalidCommand(message.to_string())
}

fn parse_index(token: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| invalid(&format!("'{}' is not an item number", token)))
}

/// Parse a line typed at the overview
///
/// `<n>` selects a group, `e <path>` exports, `s <n>` sets the preview size
/// and `q` quits.
pub fn parse_overview(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Err(invalid("empty command"));
    }
    if line == "q" {
        return Ok(Command::Quit);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match verb {
        "e" => {
            // Everything after the verb is the path, spaces included
            let destination = rest.trim();
            if destination.is_empty() {
                return Err(invalid("usage: e <path>"));
            }
            Ok(Command::Export(PathBuf::from(destination)))
        }
        "s" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [size] => size
                    .parse::<i64>()
                    .map(Command::SetPreviewSize)
                    .map_err(|_| invalid(&format!("'{}' is not a number", size))),
                _ => Err(invalid("usage: s <largest dimension>")),
            }
        }
        _ => line
            .parse::<usize>()
            .map(Command::Select)
            .map_err(|_| invalid(&format!("'{}' is not a group number", line))),
    }
}

/// Parse a line typed while a group is open
///
/// `d <n>` / `d a` delete, `n <n>` marks as non-duplicate, `c a` /
/// `c <n> <m> ...` compare, and `q` or `b` go back.
pub fn parse_group(line: &str) -> Result<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = tokens.split_first() else {
        return Err(invalid("empty command"));
    };

    match (verb, args) {
        ("q" | "b", []) => Ok(Command::Back),
        ("d", ["a"]) => Ok(Command::DeleteAll),
        ("d", [index]) => parse_index(index).map(Command::DeleteMember),
        ("n", [index]) => parse_index(index).map(Command::MarkNonDuplicate),
        ("c", ["a"]) => Ok(Command::CompareAll),
        ("c", indices) if !indices.is_empty() => indices
            .iter()
            .map(|token| parse_index(token))
            .collect::<Result<Vec<_>>>()
            .map(Command::CompareSubset),
        ("d", _) => Err(invalid("usage: d <item> or d a")),
        ("n", _) => Err(invalid("usage: n <item>")),
        ("c", _) => Err(invalid("usage: c <item> <item>... or c a")),
        _ => Err(invalid(&format!("unknown command '{}'", verb))),
    }
}
