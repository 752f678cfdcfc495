//! In-memory notes and the controllers serving them.
//!
//! Controllers know nothing about HTTP: they take plain arguments and return values or
//! [`ApiError`](plainroute_connect::ApiError)s.

use anyhow::Context as _;
use parking_lot::RwLock;
use plainroute_connect::ApiErrors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const NOTES: ApiErrors = ApiErrors::new("notes");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    notes: BTreeMap<u64, Note>,
}

#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    inner: Arc<RwLock<Inner>>,
}

impl NoteStore {
    /// Notes in creation order, at most `limit` of them.
    pub async fn list(self, limit: Option<usize>) -> anyhow::Result<Vec<Note>> {
        let inner = self.inner.read();
        Ok(inner
            .notes
            .values()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    pub async fn get(self, id: String) -> anyhow::Result<Note> {
        let id = parse_id(&id)?;
        self.inner
            .read()
            .notes
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(self, title: Option<String>, text: Option<String>) -> anyhow::Result<Note> {
        let title = title.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(NOTES.bad_request(Some("title is required"), None).into());
        }

        let mut inner = self.inner.write();
        inner.last_id += 1;
        let note = Note {
            id: inner.last_id,
            title,
            text: text.unwrap_or_default(),
        };
        inner.notes.insert(note.id, note.clone());
        tracing::info!(id = note.id, "note created");
        Ok(note)
    }

    pub async fn delete(self, id: String) -> anyhow::Result<()> {
        let id = parse_id(&id)?;
        self.inner
            .write()
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

/// Always fails with an error the adapter does not classify.
pub async fn boom() -> anyhow::Result<()> {
    Err(anyhow::anyhow!("notes backend unavailable")).context("flushing notes")
}

fn parse_id(id: &str) -> anyhow::Result<u64> {
    id.parse().map_err(|_| {
        NOTES
            .bad_request(
                Some("note id must be a positive integer"),
                Some(&format!("got {id:?}")),
            )
            .into()
    })
}

fn not_found(id: u64) -> anyhow::Error {
    NOTES
        .not_found(Some(&format!("note {id} not found")), None)
        .into()
}
