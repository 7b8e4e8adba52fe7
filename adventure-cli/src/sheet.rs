//! Client-side grid state with optimistic edits.
//!
//! A [`GridSheet`] holds the text shown in every cell. An edit writes the new
//! text immediately, sends the commit, and on failure puts back the text the
//! cell held right before that edit. Rollback targets the last *local* value,
//! so two failed edits of one cell settled in order end at the first edit's
//! optimistic text rather than the persisted one.

use std::collections::HashMap;

use adventure_core::{format_duration, parse_duration, CellKey, GridMonth, ParseDurationError};
use async_trait::async_trait;

/// Persists one cell. `None` clears it.
#[async_trait]
pub trait CellCommitter: Send + Sync {
    async fn commit(&self, key: CellKey, minutes: Option<u32>) -> anyhow::Result<()>;
}

/// Fetches the persisted cells of a month.
#[async_trait]
pub trait GridLoader: Send + Sync {
    async fn load_cells(&self, month: GridMonth) -> anyhow::Result<Vec<(CellKey, u32)>>;
}

/// An optimistic write waiting for its commit result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending commit must be settled"]
pub struct PendingCommit {
    key: CellKey,
    previous: String,
    minutes: Option<u32>,
}

impl PendingCommit {
    pub fn key(&self) -> CellKey {
        self.key
    }

    /// Value to send: `None` clears the cell.
    pub fn minutes(&self) -> Option<u32> {
        self.minutes
    }
}

#[derive(Debug)]
pub enum EditOutcome {
    Saved,
    /// The commit failed and the cell shows its earlier text again.
    RolledBack {
        restored: String,
        error: anyhow::Error,
    },
    /// Input did not parse. Nothing changed and nothing was sent.
    Rejected(ParseDurationError),
}

#[derive(Debug, Default, Clone)]
pub struct GridSheet {
    cells: HashMap<CellKey, String>,
}

impl GridSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every cell with freshly loaded values.
    pub fn load(&mut self, cells: impl IntoIterator<Item = (CellKey, u32)>) {
        self.cells = cells
            .into_iter()
            .map(|(key, minutes)| (key, format_duration(i64::from(minutes))))
            .filter(|(_, text)| !text.is_empty())
            .collect();
    }

    /// Text shown for `key`; empty when the cell has no value.
    pub fn display(&self, key: &CellKey) -> &str {
        self.cells.get(key).map(String::as_str).unwrap_or("")
    }

    /// Parse `raw` and apply it locally.
    ///
    /// On a parse error the cell keeps its current text.
    pub fn begin_edit(
        &mut self,
        key: CellKey,
        raw: &str,
    ) -> Result<PendingCommit, ParseDurationError> {
        let minutes = parse_duration(raw)?.minutes();
        let previous = self.display(&key).to_string();
        let text = minutes
            .map(|m| format_duration(i64::from(m)))
            .unwrap_or_default();
        self.set_text(key, text);

        Ok(PendingCommit {
            key,
            previous,
            minutes,
        })
    }

    /// Apply the commit result of `pending`. Only its own cell is touched.
    pub fn settle(&mut self, pending: PendingCommit, result: anyhow::Result<()>) -> EditOutcome {
        match result {
            Ok(()) => EditOutcome::Saved,
            Err(error) => {
                tracing::warn!(cell = %pending.key, "commit failed, rolling back: {error:#}");
                self.set_text(pending.key, pending.previous.clone());
                EditOutcome::RolledBack {
                    restored: pending.previous,
                    error,
                }
            }
        }
    }

    /// Parse, apply, commit and settle one edit.
    pub async fn edit<C>(&mut self, committer: &C, key: CellKey, raw: &str) -> EditOutcome
    where
        C: CellCommitter + ?Sized,
    {
        let pending = match self.begin_edit(key, raw) {
            Ok(pending) => pending,
            Err(e) => return EditOutcome::Rejected(e),
        };
        let result = committer.commit(pending.key(), pending.minutes()).await;
        self.settle(pending, result)
    }

    /// [`edit`](Self::edit), then reload `month` after a save so cells show
    /// what the server stored (it clamps long values). A failed reload keeps
    /// the optimistic text.
    pub async fn edit_and_reload<S>(
        &mut self,
        store: &S,
        month: GridMonth,
        key: CellKey,
        raw: &str,
    ) -> EditOutcome
    where
        S: CellCommitter + GridLoader + ?Sized,
    {
        let outcome = self.edit(store, key, raw).await;
        if matches!(outcome, EditOutcome::Saved) {
            match store.load_cells(month).await {
                Ok(cells) => self.load(cells),
                Err(e) => tracing::warn!(%month, "reload after save failed: {e:#}"),
            }
        }
        outcome
    }

    fn set_text(&mut self, key: CellKey, text: String) {
        if text.is_empty() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, text);
        }
    }
}
