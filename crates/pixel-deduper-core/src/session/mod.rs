//! Console review of duplicate groups.
//!
//! A [`Session`] is a two-state machine (overview and group view) that reads
//! one command per line, applies it to a [`DuplicateStore`] and redraws.
//! Every command-level failure becomes a status message shown on the next
//! render; nothing here panics on user input.

mod command;

pub use command::{parse_group, parse_overview, Command};

use log::debug;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::{clamp_largest_dimension, DEFAULT_LARGEST_DIMENSION, MIN_LARGEST_DIMENSION};
use crate::error::{Error, Result};
use crate::processing::ImageCodec;
use crate::safety::FileRemover;
use crate::store::{DuplicateStore, GroupChange};
use crate::viewer::{preview_size, PreviewRequest, Viewer};

const HEADER: &str = "=== pixel-deduper ===";
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Overview,
    GroupView(usize),
}

/// Whether the command loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive review of a [`DuplicateStore`]
pub struct Session<C, V, F> {
    store: DuplicateStore,
    state: SessionState,
    largest_dimension: u32,
    status: Option<String>,
    clear_screen: bool,
    codec: C,
    viewer: V,
    remover: F,
}

impl<C: ImageCodec, V: Viewer, F: FileRemover> Session<C, V, F> {
    pub fn new(store: DuplicateStore, codec: C, viewer: V, remover: F) -> Self {
        Self {
            store,
            state: SessionState::Overview,
            largest_dimension: DEFAULT_LARGEST_DIMENSION,
            status: None,
            clear_screen: false,
            codec,
            viewer,
            remover,
        }
    }

    /// Start with a different preview size; values below the minimum are raised
    pub fn with_largest_dimension(mut self, largest_dimension: u32) -> Self {
        self.largest_dimension = largest_dimension.max(MIN_LARGEST_DIMENSION);
        self
    }

    /// Clear the terminal before every render
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &DuplicateStore {
        &self.store
    }

    pub fn largest_dimension(&self) -> u32 {
        self.largest_dimension
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn into_store(self) -> DuplicateStore {
        self.store
    }

    /// Run the command loop until the user quits, input ends or no group is left
    ///
    /// `read_line` appends one line of input to the buffer and returns the
    /// number of bytes read, like [`std::io::Stdin::read_line`].
    pub fn run<W: Write>(
        &mut self,
        mut read_line: impl FnMut(&mut String) -> io::Result<usize>,
        out: &mut W,
    ) -> Result<()> {
        let mut line = String::new();
        loop {
            if self.state == SessionState::Overview && self.store.is_empty() {
                self.render(out)?;
                out.flush()?;
                return Ok(());
            }

            self.render(out)?;
            out.flush()?;
            self.status = None;

            line.clear();
            if read_line(&mut line)? == 0 {
                debug!("Input closed, leaving review session");
                return Ok(());
            }

            if self.handle_line(&line) == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Parse one line of input for the current state and apply it
    pub fn handle_line(&mut self, line: &str) -> Flow {
        let parsed = match self.state {
            SessionState::Overview => parse_overview(line),
            SessionState::GroupView(_) => parse_group(line),
        };

        match parsed {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                self.status = Some(e.to_string());
                Flow::Continue
            }
        }
    }

    /// Apply a parsed command to the current state
    pub fn dispatch(&mut self, command: Command) -> Flow {
        debug!("{:?}: {:?}", self.state, command);

        match (self.state, command) {
            (SessionState::Overview, Command::Quit) => return Flow::Exit,
            (SessionState::Overview, Command::Select(index)) => match self.store.group(index) {
                Ok(_) => self.state = SessionState::GroupView(index),
                Err(e) => self.status = Some(e.to_string()),
            },
            (SessionState::Overview, Command::Export(destination)) => {
                self.status = Some(match self.store.export_to(&destination) {
                    Ok(()) => format!("File written: {}", destination.display()),
                    Err(e) => e.to_string(),
                });
            }
            (SessionState::Overview, Command::SetPreviewSize(size)) => {
                self.largest_dimension = clamp_largest_dimension(size);
                self.status = Some(format!(
                    "Largest preview dimension set to {}",
                    self.largest_dimension
                ));
            }
            (SessionState::GroupView(_), Command::Back) => self.state = SessionState::Overview,
            (SessionState::GroupView(group), Command::DeleteMember(member)) => {
                self.mutate(group, |store, remover| {
                    store.delete_member(group, member, remover)
                });
            }
            (SessionState::GroupView(group), Command::DeleteAll) => {
                self.mutate(group, |store, remover| {
                    store.delete_all_but_first(group, remover)
                });
            }
            (SessionState::GroupView(group), Command::MarkNonDuplicate(member)) => {
                self.mutate(group, |store, _| store.mark_non_duplicate(group, member));
            }
            (SessionState::GroupView(group), Command::CompareAll) => {
                if let Err(e) = self.compare_all(group) {
                    self.status = Some(e.to_string());
                }
            }
            (SessionState::GroupView(group), Command::CompareSubset(indices)) => {
                if let Err(e) = self.compare_subset(group, &indices) {
                    self.status = Some(e.to_string());
                }
            }
            (_, command) => {
                self.status = Some(
                    Error::InvalidCommand(format!("{:?} is not available here", command))
                        .to_string(),
                );
            }
        }

        Flow::Continue
    }

    /// Draw the header, the status line and the current state's listing
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.clear_screen {
            write!(out, "{}", CLEAR_SCREEN)?;
        }
        writeln!(out, "{}", HEADER)?;
        if let Some(status) = &self.status {
            writeln!(out, "{}", status)?;
        }
        writeln!(out)?;

        match self.state {
            SessionState::Overview => self.render_overview(out),
            SessionState::GroupView(index) => self.render_group(out, index),
        }
    }

    fn render_overview<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.store.is_empty() {
            return writeln!(out, "No duplicate groups left to review.");
        }

        writeln!(
            out,
            "Found {} group(s) of duplicates",
            self.store.group_count()
        )?;
        writeln!(out, "[Group] Size")?;
        for (i, group) in self.store.groups().iter().enumerate() {
            writeln!(out, "[{}] {} items", i, group.len())?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "View group: <n> | Export: e <path> | Preview size (min {}, now {}): s <n> | Quit: q",
            MIN_LARGEST_DIMENSION, self.largest_dimension
        )?;
        write!(out, "Enter command: ")
    }

    fn render_group<W: Write>(&self, out: &mut W, index: usize) -> io::Result<()> {
        let Ok(group) = self.store.group(index) else {
            return self.render_overview(out);
        };

        writeln!(out, "Group {} ({} items)", index, group.len())?;
        for (i, path) in group.iter().enumerate() {
            writeln!(out, "[{}] {}", i, path.display())?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "Delete: d <n> | Delete all but first: d a | Not a duplicate: n <n> | \
             Compare: c <n> <m>... | Compare all: c a | Back: q"
        )?;
        write!(out, "Enter command: ")
    }

    /// Apply a store mutation to the open group and follow it back to the
    /// overview when the group is gone
    fn mutate(
        &mut self,
        group: usize,
        op: impl FnOnce(&mut DuplicateStore, &F) -> Result<GroupChange>,
    ) {
        let groups_before = self.store.group_count();
        match op(&mut self.store, &self.remover) {
            Ok(GroupChange::Shrunk) => {}
            Ok(GroupChange::Dissolved) => {
                self.status = Some(format!("Group {} resolved", group));
                self.state = SessionState::Overview;
            }
            Err(e) => {
                self.status = Some(e.to_string());
                // A partial deletion can still dissolve the group
                if self.store.group_count() != groups_before {
                    self.state = SessionState::Overview;
                }
            }
        }
    }

    fn compare_all(&mut self, group: usize) -> Result<()> {
        let paths = self.store.group(group)?.members().to_vec();
        self.show(paths)
    }

    /// Show the selected members once each, in path order
    fn compare_subset(&mut self, group: usize, indices: &[usize]) -> Result<()> {
        let members = self.store.group(group)?;

        let mut picked: BTreeSet<&PathBuf> = BTreeSet::new();
        for &index in indices {
            let path = members.get(index).ok_or(Error::OutOfRange {
                index,
                len: members.len(),
            })?;
            picked.insert(path);
        }

        let paths = picked.into_iter().cloned().collect();
        self.show(paths)
    }

    fn show(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        let first = paths
            .first()
            .ok_or_else(|| Error::InvalidCommand("nothing to compare".to_string()))?;
        let native = self.codec.dimensions(first)?;
        let size = preview_size(native, self.largest_dimension);

        debug!("Showing {} image(s) at {:?}", paths.len(), size);
        self.viewer.display(&PreviewRequest { paths, size })
    }
}

#[cfg(test)]
mod tests;
