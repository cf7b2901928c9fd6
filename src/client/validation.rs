//! Synchronous field validation, run on submit before any network call.

/// Which form is being validated. Only the task form exists today; the tag
/// keeps call sites honest about what they're checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Task,
}

/// Current values of the task form.
#[derive(Debug, Clone, Default)]
pub struct TaskFormData {
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub err: String,
}

/// Returns zero or more per-field errors. Any non-empty result blocks
/// submission.
pub fn validate_many_fields(kind: FormKind, form: &TaskFormData) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match kind {
        FormKind::Task => {
            if form.description.trim().is_empty() {
                errors.push(FieldError {
                    field: "description",
                    err: "Description is required".to_string(),
                });
            }
        }
    }

    errors
}
