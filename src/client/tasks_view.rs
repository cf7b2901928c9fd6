//! The task list view.
//!
//! Holds the last-fetched task list in server order plus a client-side
//! completion filter. Mutations (toggle, delete) never touch local state
//! directly. They write, then re-fetch the whole list, so the view always
//! reflects what the store actually holds.

use crate::client::http::{ApiClient, ClientError, TaskWrite};
use crate::models::Task;
use std::str::FromStr;
use uuid::Uuid;

/// Client-side completion filter. Never affects persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterStatus {
    #[default]
    All,
    Pending,
    Completed,
}

impl FilterStatus {
    /// The pure predicate the visible set is computed from.
    pub fn matches(self, completed: bool) -> bool {
        match self {
            FilterStatus::All => true,
            FilterStatus::Pending => !completed,
            FilterStatus::Completed => completed,
        }
    }
}

impl FromStr for FilterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FilterStatus::All),
            "pending" => Ok(FilterStatus::Pending),
            "completed" => Ok(FilterStatus::Completed),
            other => Err(format!("unknown filter '{other}' (expected all, pending, or completed)")),
        }
    }
}

pub struct TasksView {
    client: ApiClient,
    tasks: Vec<Task>,
    filter_status: FilterStatus,
    loading: bool,
}

impl TasksView {
    /// The session-bearing client is an explicit dependency; the view has
    /// no ambient way to reach the server.
    pub fn new(client: ApiClient) -> Self {
        TasksView {
            client,
            tasks: Vec::new(),
            filter_status: FilterStatus::All,
            loading: false,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn filter_status(&self) -> FilterStatus {
        self.filter_status
    }

    pub fn set_filter(&mut self, filter: FilterStatus) {
        self.filter_status = filter;
    }

    /// Fetch the caller's full task list and replace local state with it.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.client.list_tasks().await;
        self.loading = false;

        self.tasks = result?;
        Ok(())
    }

    /// The filtered subset, in server order. Never mutates `tasks`.
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter_status.matches(t.completed))
            .collect()
    }

    /// True when the *filtered* set is empty, even if unfiltered tasks
    /// exist. Kept as-is on purpose; see DESIGN.md.
    pub fn should_prompt_add(&self) -> bool {
        self.visible().is_empty()
    }

    /// Delete, then unconditionally re-fetch. No optimistic removal.
    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.client.delete_task(id).await?;
        self.refresh().await
    }

    /// Flip `completed` on one task, leaving its description untouched,
    /// then re-fetch. A task not currently in the view is a no-op.
    pub async fn toggle_completed(&mut self, id: Uuid) -> Result<(), ClientError> {
        let (description, completed) = match self.tasks.iter().find(|t| t.id == id) {
            Some(t) => (t.description.clone(), t.completed),
            None => return Ok(()),
        };

        self.client
            .save_task(&TaskWrite::Update {
                id,
                description,
                completed: !completed,
            })
            .await?;
        self.refresh().await
    }
}

// ── Tests ──────────────────────────────────────────────────────
