//! Duplicate groups as mutable state for the review phase.

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::persistence::{render_report, write_report};
use crate::safety::FileRemover;
use crate::types::DuplicateGroup;

/// What happened to a group after a member was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChange {
    /// The group still holds two or more members
    Shrunk,
    /// The group fell below two members and was removed from the store
    Dissolved,
}

/// Ordered collection of duplicate groups
///
/// Groups are only ever removed, never added, once the store is built. Every
/// index operation validates its indices before touching disk or memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateStore {
    groups: Vec<DuplicateGroup>,
}

impl DuplicateStore {
    /// Build a store from scan results; groups of fewer than two members are dropped
    pub fn new(groups: Vec<DuplicateGroup>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .filter(DuplicateGroup::is_duplicate_set)
                .collect(),
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Result<&DuplicateGroup> {
        self.groups.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.groups.len(),
        })
    }

    /// Path of one member of one group
    pub fn member(&self, group_index: usize, member_index: usize) -> Result<&Path> {
        let group = self.group(group_index)?;
        group
            .get(member_index)
            .map(PathBuf::as_path)
            .ok_or(Error::OutOfRange {
                index: member_index,
                len: group.len(),
            })
    }

    /// Delete one member from disk and from its group
    ///
    /// The group is left untouched if the file cannot be removed.
    pub fn delete_member(
        &mut self,
        group_index: usize,
        member_index: usize,
        remover: &impl FileRemover,
    ) -> Result<GroupChange> {
        let path = self.member(group_index, member_index)?.to_path_buf();

        remover.remove(&path).map_err(|source| Error::Deletion {
            path: path.clone(),
            source,
        })?;

        info!("Deleted {} from group {}", path.display(), group_index);
        Ok(self.remove_member(group_index, member_index))
    }

    /// Delete every member but the first from disk, then drop the group
    ///
    /// All members are checked before anything is deleted. If the file system
    /// still fails part-way, the members already deleted leave the group and
    /// the failure is returned.
    pub fn delete_all_but_first(
        &mut self,
        group_index: usize,
        remover: &impl FileRemover,
    ) -> Result<GroupChange> {
        let doomed: Vec<PathBuf> = self.group(group_index)?.members()[1..].to_vec();

        for path in &doomed {
            remover.check(path).map_err(|source| Error::Deletion {
                path: path.clone(),
                source,
            })?;
        }

        let mut deleted: Vec<&PathBuf> = Vec::with_capacity(doomed.len());
        for path in &doomed {
            if let Err(source) = remover.remove(path) {
                warn!(
                    "Deleted {} of {} duplicate(s) in group {} before failing on {}",
                    deleted.len(),
                    doomed.len(),
                    group_index,
                    path.display()
                );
                let count = deleted.len();
                if count > 0 {
                    self.groups[group_index].retain(|member| !deleted.contains(&member));
                    self.dissolve_if_collapsed(group_index);
                }
                return Err(Error::PartialDeletion {
                    deleted: count,
                    path: path.clone(),
                    source,
                });
            }
            deleted.push(path);
        }

        info!(
            "Deleted {} duplicate(s) of {}",
            deleted.len(),
            self.groups[group_index][0].display()
        );
        self.groups.remove(group_index);
        Ok(GroupChange::Dissolved)
    }

    /// Take a member out of its group without touching the file
    pub fn mark_non_duplicate(
        &mut self,
        group_index: usize,
        member_index: usize,
    ) -> Result<GroupChange> {
        let path = self.member(group_index, member_index)?.to_path_buf();

        info!("Marked {} as not a duplicate", path.display());
        Ok(self.remove_member(group_index, member_index))
    }

    /// Plain-text report of every surviving group
    pub fn export(&self) -> String {
        render_report(&self.groups)
    }

    /// Write the report to a new file
    pub fn export_to(&self, destination: &Path) -> Result<()> {
        write_report(destination, &self.groups)
    }

    fn remove_member(&mut self, group_index: usize, member_index: usize) -> GroupChange {
        self.groups[group_index].remove(member_index);
        self.dissolve_if_collapsed(group_index)
    }

    fn dissolve_if_collapsed(&mut self, group_index: usize) -> GroupChange {
        if self.groups[group_index].is_duplicate_set() {
            GroupChange::Shrunk
        } else {
            self.groups.remove(group_index);
            GroupChange::Dissolved
        }
    }
}
