//! The add/edit form view.
//!
//! Mode comes from whether the caller has a task id in hand: none → add a
//! fresh task, some → load and edit an existing one. Submission validates
//! first; a failed validation keeps the user on the form with per-field
//! errors and sends nothing over the wire.

use crate::client::http::{ApiClient, ClientError, TaskWrite};
use crate::client::validation::{validate_many_fields, FieldError, FormKind, TaskFormData};
use crate::models::Task;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Update(Uuid),
}

pub struct TaskForm {
    client: ApiClient,
    mode: Mode,
    form: TaskFormData,
    /// Last-fetched server copy, the state reset() rolls back to.
    task: Option<Task>,
    errors: Vec<FieldError>,
    loading: bool,
}

impl TaskForm {
    /// Blank form for a new task.
    pub fn add(client: ApiClient) -> Self {
        TaskForm {
            client,
            mode: Mode::Add,
            form: TaskFormData::default(),
            task: None,
            errors: Vec::new(),
            loading: false,
        }
    }

    /// Edit form for an existing task. Call load() before rendering.
    pub fn update(client: ApiClient, id: Uuid) -> Self {
        TaskForm {
            client,
            mode: Mode::Update(id),
            form: TaskFormData::default(),
            task: None,
            errors: Vec::new(),
            loading: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn description(&self) -> &str {
        &self.form.description
    }

    pub fn completed(&self) -> bool {
        self.form.completed
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.form.completed = completed;
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.err.as_str())
    }

    /// Update mode: fetch the task and populate the form from it. A failed
    /// fetch (not found, unauthorized) propagates instead of being swallowed.
    /// Add mode: nothing to load.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let Mode::Update(id) = self.mode else {
            return Ok(());
        };

        self.loading = true;
        let result = self.client.get_task(id).await;
        self.loading = false;

        let task = result?;
        self.form = TaskFormData {
            description: task.description.clone(),
            completed: task.completed,
        };
        self.task = Some(task);
        Ok(())
    }

    /// Validate, then create or update depending on mode. Returns Ok(true)
    /// on success (caller navigates back to the list), Ok(false) when
    /// validation blocked the submit. In that case no request was made and
    /// errors() holds the per-field messages.
    pub async fn submit(&mut self) -> Result<bool, ClientError> {
        self.errors = validate_many_fields(FormKind::Task, &self.form);
        if !self.errors.is_empty() {
            return Ok(false);
        }

        let write = match self.mode {
            Mode::Add => TaskWrite::Create {
                description: self.form.description.clone(),
                completed: self.form.completed,
            },
            Mode::Update(id) => TaskWrite::Update {
                id,
                description: self.form.description.clone(),
                completed: self.form.completed,
            },
        };

        self.loading = true;
        let result = self.client.save_task(&write).await;
        self.loading = false;

        result?;
        Ok(true)
    }

    /// Roll the fields back to the last-fetched server values, discarding
    /// unsaved edits. A no-op if no task has loaded yet (add mode included).
    pub fn reset(&mut self) {
        if let Some(task) = &self.task {
            self.form = TaskFormData {
                description: task.description.clone(),
                completed: task.completed,
            };
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
