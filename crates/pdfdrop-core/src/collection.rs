//! Ordered set of files staged for the next operation
//!
//! Entries are addressed by position, so duplicate names stay unambiguous.

use crate::error::CollectionError;
use crate::file::{FileSummary, SelectedFile};
use crate::policy::{AcceptPolicy, RejectReason};
use serde::Serialize;
use tracing::{debug, warn};

/// A candidate that failed acceptance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectReason,
}

/// Result of one `accept` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceptReport {
    pub accepted: Vec<FileSummary>,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone)]
pub struct FileCollection<P> {
    files: Vec<SelectedFile<P>>,
    policy: AcceptPolicy,
}

impl<P> Default for FileCollection<P> {
    fn default() -> Self {
        Self::new(AcceptPolicy::default())
    }
}

impl<P> FileCollection<P> {
    pub fn new(policy: AcceptPolicy) -> Self {
        Self {
            files: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &AcceptPolicy {
        &self.policy
    }

    /// Validate candidates and append the valid ones in arrival order
    pub fn accept<I>(&mut self, candidates: I) -> AcceptReport
    where
        I: IntoIterator<Item = SelectedFile<P>>,
    {
        let mut report = AcceptReport::default();

        for file in candidates {
            match self.policy.check(&file) {
                Ok(()) => {
                    report.accepted.push(FileSummary {
                        index: self.files.len(),
                        name: file.name.clone(),
                        size: file.size,
                    });
                    self.files.push(file);
                }
                Err(reason) => {
                    warn!(file = %file.name, %reason, "rejected file");
                    report.rejected.push(Rejection {
                        name: file.name,
                        reason,
                    });
                }
            }
        }

        debug!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            total = self.files.len(),
            "accepted files"
        );
        report
    }

    /// Remove a file by index
    pub fn remove(&mut self, index: usize) -> Result<SelectedFile<P>, CollectionError> {
        if index >= self.files.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.files.len(),
            });
        }
        Ok(self.files.remove(index))
    }

    /// Reorder files.
    /// `new_order` is an array of current indices in the desired new order
    pub fn reorder(&mut self, new_order: &[usize]) -> Result<(), CollectionError> {
        if new_order.len() != self.files.len() {
            return Err(CollectionError::InvalidOrder(
                "wrong number of indices".to_string(),
            ));
        }

        let mut seen = vec![false; self.files.len()];
        for &idx in new_order {
            if idx >= self.files.len() {
                return Err(CollectionError::InvalidOrder(format!(
                    "index {} out of bounds",
                    idx
                )));
            }
            if seen[idx] {
                return Err(CollectionError::InvalidOrder(format!(
                    "duplicate index {}",
                    idx
                )));
            }
            seen[idx] = true;
        }

        let mut slots: Vec<Option<SelectedFile<P>>> = self.files.drain(..).map(Some).collect();
        self.files = new_order
            .iter()
            .filter_map(|&idx| slots[idx].take())
            .collect();

        Ok(())
    }

    /// Move a single file, shifting the ones in between
    pub fn move_file(&mut self, from: usize, to: usize) -> Result<(), CollectionError> {
        let len = self.files.len();
        for index in [from, to] {
            if index >= len {
                return Err(CollectionError::IndexOutOfBounds { index, len });
            }
        }
        let file = self.files.remove(from);
        self.files.insert(to, file);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn first(&self) -> Option<&SelectedFile<P>> {
        self.files.first()
    }

    pub fn get(&self, index: usize) -> Option<&SelectedFile<P>> {
        self.files.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedFile<P>> {
        self.files.iter()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Current rows for rendering, in order
    pub fn summaries(&self) -> Vec<FileSummary> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, f)| FileSummary {
                index,
                name: f.name.clone(),
                size: f.size,
            })
            .collect()
    }
}
