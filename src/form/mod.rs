//! The recursive create-task form.
//!
//! [`TaskForm`] owns a [`FormTree`] plus validation state for every title
//! in it. Titles are validated synchronously on each change; async rules
//! are deferred until [`TaskForm::settle_validation`] has waited out the
//! debounce window. Submission serializes the whole tree into a single
//! `POST /tasks`.

pub mod tree;
pub mod validate;

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

pub use tree::{FormNode, FormTree, NodeId, NodePath, TaskFormValues, MAX_SUBTASK_DEPTH};
pub use validate::{FieldMeta, TitleRules, Validator};

use crate::error::normalize_error;
use crate::http::HttpError;
use crate::model::{CreateTaskPayload, Task};
use crate::services::TaskService;

const CREATE_TASK_FAILED: &str = "Failed to create task.";

/// Misuse of the form structure or of submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No node at the given path.
    #[error("no subtask at {0}")]
    UnknownPath(String),
    /// The parent already sits at the deepest level.
    #[error("Maximum depth of {max} reached.")]
    DepthLimitReached {
        /// Deepest allowed level.
        max: usize,
    },
    /// The root section is permanent.
    #[error("the root task cannot be removed")]
    CannotRemoveRoot,
    /// Some field has errors or is still validating.
    #[error("the form has validation errors")]
    Invalid,
    /// A submission is already outstanding.
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    /// The backend rejected the submission.
    #[error("{0}")]
    Rejected(String),
}

/// Create-task form state.
#[derive(Debug)]
pub struct TaskForm {
    tree: FormTree,
    rules: TitleRules,
    meta: HashMap<NodeId, FieldMeta>,
    submitting: bool,
    submit_error: Option<String>,
    succeeded: bool,
}

impl TaskForm {
    /// An empty form validated by `rules`.
    #[must_use]
    pub fn new(rules: TitleRules) -> Self {
        let mut form = Self {
            tree: FormTree::new(),
            rules,
            meta: HashMap::new(),
            submitting: false,
            submit_error: None,
            succeeded: false,
        };
        form.reset();
        form
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    /// Validation state of the title at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn meta(&self, path: &NodePath) -> Result<&FieldMeta, FormError> {
        let id = self.tree.resolve(path)?;
        self.meta.get(&id).ok_or_else(|| FormError::UnknownPath(path.to_string()))
    }

    /// Errors to display for the title at `path`. Untouched fields show none.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn field_errors(&self, path: &NodePath) -> Result<Vec<String>, FormError> {
        let meta = self.meta(path)?;
        Ok(if meta.touched { meta.errors() } else { Vec::new() })
    }

    /// Changes a title and revalidates it.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn set_title(&mut self, path: &NodePath, title: &str) -> Result<(), FormError> {
        let id = self.tree.set_title(path, title)?;
        let meta = self.meta.entry(id).or_default();
        meta.touched = true;
        meta.validate(&self.rules, title);
        Ok(())
    }

    /// Marks the title at `path` as visited.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn blur(&mut self, path: &NodePath) -> Result<(), FormError> {
        let id = self.tree.resolve(path)?;
        self.meta.entry(id).or_default().touched = true;
        Ok(())
    }

    /// Toggles a skill pill. Returns whether the skill is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownPath`] if the path does not exist.
    pub fn toggle_skill(&mut self, path: &NodePath, skill_id: u32) -> Result<bool, FormError> {
        self.tree.toggle_skill(path, skill_id)
    }

    /// Appends an empty subtask under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DepthLimitReached`] at the maximum depth and
    /// [`FormError::UnknownPath`] for a missing parent.
    pub fn add_subtask(&mut self, path: &NodePath) -> Result<NodePath, FormError> {
        let (child, id) = self.tree.add_subtask(path)?;
        let mut meta = FieldMeta::default();
        meta.validate(&self.rules, "");
        self.meta.insert(id, meta);
        Ok(child)
    }

    /// Removes the subtask at `path` and its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::CannotRemoveRoot`] for the root and
    /// [`FormError::UnknownPath`] for a missing node.
    pub fn remove_subtask(&mut self, path: &NodePath) -> Result<(), FormError> {
        for id in self.tree.remove_subtask(path)? {
            self.meta.remove(&id);
        }
        Ok(())
    }

    /// Whether every title passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.meta.values().all(FieldMeta::is_valid)
    }

    /// Whether an async check is still pending.
    #[must_use]
    pub fn is_validating(&self) -> bool {
        self.meta.values().any(|meta| meta.validating)
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_validating() && !self.submitting
    }

    /// Whether a submission is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Message from the last failed submission.
    #[must_use]
    pub fn submission_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Whether the last submission succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Waits out the debounce window, then runs async rules on every title
    /// that is waiting for them.
    pub async fn settle_validation(&mut self) {
        if !self.is_validating() {
            return;
        }
        if let Some(debounce) = self.rules.debounce() {
            tokio::time::sleep(debounce).await;
        }
        for (_, id) in self.tree.walk() {
            let title = &self.tree.node(id).title;
            if let Some(meta) = self.meta.get_mut(&id).filter(|meta| meta.validating) {
                meta.finish_async(&self.rules, title);
            }
        }
    }

    /// Checks the form and marks a submission in flight.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::SubmissionInFlight`] while another submission
    /// is outstanding and [`FormError::Invalid`] when any title fails or is
    /// still validating. Invalid fields become touched so their errors show.
    pub fn begin_submit(&mut self) -> Result<CreateTaskPayload, FormError> {
        if self.submitting {
            return Err(FormError::SubmissionInFlight);
        }
        if !self.is_valid() || self.is_validating() {
            for meta in self.meta.values_mut() {
                meta.touched = true;
            }
            return Err(FormError::Invalid);
        }
        self.submitting = true;
        self.submit_error = None;
        self.succeeded = false;
        Ok(self.tree.to_payload())
    }

    /// Records the outcome of a submission started by
    /// [`begin_submit`](Self::begin_submit). Success resets the form;
    /// failure keeps the values.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Rejected`] with the published message on failure.
    pub fn finish_submit(&mut self, result: Result<Option<Task>, HttpError>) -> Result<Option<Task>, FormError> {
        self.submitting = false;
        match result {
            Ok(created) => {
                info!(task_id = ?created.as_ref().map(|t| &t.task_id), "task created");
                self.reset();
                self.succeeded = true;
                Ok(created)
            }
            Err(err) => {
                let message = normalize_error(&err, CREATE_TASK_FAILED);
                warn!(error = %message, "task creation failed");
                self.submit_error = Some(message.clone());
                Err(FormError::Rejected(message))
            }
        }
    }

    /// Validates, then sends the whole tree as one create request.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`begin_submit`](Self::begin_submit) and
    /// [`finish_submit`](Self::finish_submit).
    pub async fn submit(&mut self, service: &TaskService) -> Result<Option<Task>, FormError> {
        self.settle_validation().await;
        let payload = self.begin_submit()?;
        debug!(subtasks = payload.subtasks.as_ref().map_or(0, Vec::len), "submitting task");
        let result = service.create_task(&payload).await;
        self.finish_submit(result)
    }

    /// Replaces the form contents with `values`, replaying them through
    /// the same edits a user would make.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DepthLimitReached`] if `values` nests deeper
    /// than the form allows; the form is left empty in that case.
    pub fn seed(&mut self, values: &TaskFormValues) -> Result<(), FormError> {
        self.reset();
        let mut stack = vec![(values, NodePath::root())];
        while let Some((node, path)) = stack.pop() {
            self.set_title(&path, &node.title)?;
            for &skill_id in &node.skills {
                if !self.tree.get(&path)?.skills.contains(&skill_id) {
                    self.toggle_skill(&path, skill_id)?;
                }
            }
            for subtask in &node.subtasks {
                match self.add_subtask(&path) {
                    Ok(child) => stack.push((subtask, child)),
                    Err(err) => {
                        self.reset();
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.tree = FormTree::new();
        self.meta.clear();
        let mut meta = FieldMeta::default();
        meta.validate(&self.rules, "");
        self.meta.insert(self.tree.root(), meta);
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new(TitleRules::default())
    }
}
