//! Entity actions and their shared dialog context
//!
//! The action controller drives the create/update/delete/details operations
//! of one table against caller-supplied callbacks. The context object holds
//! the state sibling dialog and sheet components share (selected row, current
//! action, details payload, dialog flag, notifications) and is injected
//! explicitly; a controller used without one fails its precondition.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::form::MutationError;

use super::runtime::{ID_FIELD, Row};

/// Errors from driving the action controller outside its contract.
///
/// These are precondition failures; rejected mutations are not errors here,
/// they surface as notifications on the context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("action controller has no context; supply one before running actions")]
    MissingContext,
    #[error("no row is selected")]
    NoRowSelected,
}

/// The mutation a dialog is currently driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient user-facing message queued on the action context
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        }
    }
}

/// Caller-supplied mutation callbacks for one entity.
///
/// Each operation is one asynchronous request/response exchange; the
/// controller awaits it to completion before the triggering affordance
/// re-enables.
#[async_trait(?Send)]
pub trait EntityActions {
    async fn create(&self, values: Map<String, Value>) -> Result<(), MutationError>;

    async fn update(&self, values: Map<String, Value>) -> Result<(), MutationError>;

    async fn delete(&self, id: &Value) -> Result<(), MutationError>;

    async fn fetch_details(&self, id: &Value) -> Result<Value, MutationError>;
}

/// Shared state of one table's action dialogs.
///
/// Exactly one writer (the user-driven event handler) mutates it at a time;
/// the model is cooperative and synchronous between awaits.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    selected_row: Option<Row>,
    current_action: Option<ActionKind>,
    details: Option<Value>,
    dialog_open: bool,
    notifications: Vec<Notification>,
    in_flight: bool,
}

impl ActionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the row an action row-menu was opened on
    pub fn select_row(&mut self, row: Row) {
        self.selected_row = Some(row);
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.selected_row.as_ref()
    }

    pub fn clear_selected_row(&mut self) {
        self.selected_row = None;
    }

    /// Open the dialog for one action kind
    pub fn begin(&mut self, action: ActionKind) {
        self.current_action = Some(action);
        self.dialog_open = true;
    }

    pub fn current_action(&self) -> Option<ActionKind> {
        self.current_action
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    /// Payload of the last successful details fetch
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// True while a request is outstanding; guards re-entrant refresh
    /// affordances. Requests of the same kind are not deduplicated.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hand the queued notifications to the host and clear the queue
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    fn selected_id(&self) -> Result<Value, ActionError> {
        let row = self.selected_row.as_ref().ok_or(ActionError::NoRowSelected)?;
        match row.get(ID_FIELD) {
            Some(id) => Ok(id.clone()),
            None => {
                warn!("selected row carries no id field");
                Err(ActionError::NoRowSelected)
            }
        }
    }
}

/// Drives entity mutations against an explicitly injected context.
///
/// Mutation failures never corrupt the context: they queue an error
/// notification and leave values and selection untouched. The create and
/// update dialogs stay open on failure so the user can retry; the delete
/// dialog always closes, success or not.
#[derive(Debug)]
pub struct ActionController<A: EntityActions> {
    actions: A,
    context: Option<ActionContext>,
}

impl<A: EntityActions> ActionController<A> {
    pub fn new(actions: A) -> Self {
        Self {
            actions,
            context: None,
        }
    }

    pub fn with_context(mut self, context: ActionContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn context(&self) -> Result<&ActionContext, ActionError> {
        self.context.as_ref().ok_or(ActionError::MissingContext)
    }

    pub fn context_mut(&mut self) -> Result<&mut ActionContext, ActionError> {
        self.context.as_mut().ok_or(ActionError::MissingContext)
    }

    /// Create an entity from submitted form values.
    pub async fn run_create(&mut self, values: Map<String, Value>) -> Result<(), ActionError> {
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        ctx.current_action = Some(ActionKind::Create);
        ctx.in_flight = true;
        let outcome = self.actions.create(values).await;
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        ctx.in_flight = false;

        match outcome {
            Ok(()) => {
                ctx.dialog_open = false;
                ctx.notify(NotificationLevel::Success, "created");
            }
            Err(error) => {
                warn!(%error, "create rejected");
                ctx.notify(NotificationLevel::Error, error.to_string());
            }
        }
        Ok(())
    }

    /// Update the selected entity from submitted form values.
    ///
    /// The selected row's identifier is injected into the payload under
    /// `id` before the callback runs.
    pub async fn run_update(&mut self, mut values: Map<String, Value>) -> Result<(), ActionError> {
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        let id = ctx.selected_id()?;
        values.insert(ID_FIELD.to_string(), id);

        ctx.current_action = Some(ActionKind::Update);
        ctx.in_flight = true;
        let outcome = self.actions.update(values).await;
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        ctx.in_flight = false;

        match outcome {
            Ok(()) => {
                ctx.dialog_open = false;
                ctx.notify(NotificationLevel::Success, "updated");
            }
            Err(error) => {
                warn!(%error, "update rejected");
                ctx.notify(NotificationLevel::Error, error.to_string());
            }
        }
        Ok(())
    }

    /// Delete the selected entity.
    ///
    /// The confirmation dialog closes whether or not the callback succeeds;
    /// a failed delete survives only as a notification.
    pub async fn run_delete(&mut self) -> Result<(), ActionError> {
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        let id = ctx.selected_id()?;

        ctx.current_action = Some(ActionKind::Delete);
        ctx.in_flight = true;
        let outcome = self.actions.delete(&id).await;
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        ctx.in_flight = false;
        ctx.dialog_open = false;

        match outcome {
            Ok(()) => {
                ctx.selected_row = None;
                ctx.notify(NotificationLevel::Success, "deleted");
            }
            Err(error) => {
                warn!(%error, "delete rejected");
                ctx.notify(NotificationLevel::Error, error.to_string());
            }
        }
        Ok(())
    }

    /// Fetch the details payload for the selected entity into the context.
    pub async fn run_details(&mut self) -> Result<(), ActionError> {
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        let id = ctx.selected_id()?;

        ctx.current_action = Some(ActionKind::Details);
        ctx.in_flight = true;
        let outcome = self.actions.fetch_details(&id).await;
        let ctx = self.context.as_mut().ok_or(ActionError::MissingContext)?;
        ctx.in_flight = false;

        match outcome {
            Ok(payload) => ctx.details = Some(payload),
            Err(error) => {
                warn!(%error, "details fetch rejected");
                ctx.notify(NotificationLevel::Error, error.to_string());
            }
        }
        Ok(())
    }
}
