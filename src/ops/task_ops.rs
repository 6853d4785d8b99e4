use chrono::{DateTime, SubsecRound, Utc};

use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};

/// Error type for task validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a task title")]
    EmptyTitle,
    #[error("Please fill all fields")]
    MissingField,
    #[error("Please enter both email and password")]
    MissingCredentials,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim a title, rejecting blank input
pub fn normalize_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Validate a draft, returning it with a trimmed title
pub fn validate_draft(mut draft: TaskDraft) -> Result<TaskDraft, ValidationError> {
    draft.title = normalize_title(&draft.title)?;
    Ok(draft)
}

/// Validate a patch. A present title must not be blank after trimming.
pub fn validate_patch(mut patch: TaskPatch) -> Result<TaskPatch, ValidationError> {
    if let Some(ref title) = patch.title {
        patch.title = Some(normalize_title(title)?);
    }
    Ok(patch)
}

/// Allocate a timestamp-derived id that does not collide with `existing`.
pub fn next_local_id(existing: &[Task], now: DateTime<Utc>) -> TaskId {
    let mut candidate = now.timestamp_millis();
    while existing.iter().any(|t| t.id.as_str() == candidate.to_string()) {
        candidate += 1;
    }
    TaskId::new(candidate.to_string())
}

/// Build a fresh local task from a validated draft.
///
/// `createdAt` is kept at millisecond precision, the precision it is stored at.
pub fn create_local_task(draft: TaskDraft, existing: &[Task], now: DateTime<Utc>) -> Task {
    let now = now.trunc_subsecs(3);
    Task {
        id: next_local_id(existing, now),
        title: draft.title,
        due_date: draft.due_date,
        category: draft.category,
        notification_enabled: draft.notification_enabled,
        completed: false,
        created_at: now,
        description: draft.description,
        priority: draft.priority,
    }
}

/// Registration input checks done before any request is sent
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}
