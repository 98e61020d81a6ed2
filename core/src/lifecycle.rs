//! Item lifecycle state machine.
//!
//! Every stored list item is in exactly one of three states: active
//! (checked or not), soft-deleted, or moved. Soft-delete and move are
//! alternative terminal actions from the active state; a moved item has
//! no restore path. The checks here are pure preconditions; the service
//! layer applies the matching row mutation only when a check passes.

use std::fmt;

use crate::error::{Error, Result};
use crate::models::ShoppingListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Active { checked: bool },
    Deleted,
    Moved,
}

impl ItemState {
    #[must_use]
    pub fn of(item: &ShoppingListItem) -> ItemState {
        if item.moved_to_list_id.is_some() {
            ItemState::Moved
        } else if item.is_deleted {
            ItemState::Deleted
        } else {
            ItemState::Active {
                checked: item.is_checked,
            }
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Active { checked: false } => f.write_str("active"),
            ItemState::Active { checked: true } => f.write_str("active (checked)"),
            ItemState::Deleted => f.write_str("deleted"),
            ItemState::Moved => f.write_str("moved"),
        }
    }
}

/// Whether a precondition check found work to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Apply,
    /// The item is already in the target state; the operation is an
    /// idempotent no-op, not an error.
    Noop,
}

pub fn check_toggle(state: ItemState) -> Result<Outcome> {
    match state {
        ItemState::Active { .. } => Ok(Outcome::Apply),
        current => Err(Error::InvalidTransition {
            operation: "toggle",
            current,
        }),
    }
}

pub fn check_soft_delete(state: ItemState) -> Result<Outcome> {
    match state {
        ItemState::Active { .. } => Ok(Outcome::Apply),
        ItemState::Deleted => Ok(Outcome::Noop),
        current @ ItemState::Moved => Err(Error::InvalidTransition {
            operation: "delete",
            current,
        }),
    }
}

pub fn check_restore(state: ItemState) -> Result<Outcome> {
    match state {
        ItemState::Deleted => Ok(Outcome::Apply),
        current => Err(Error::InvalidTransition {
            operation: "restore",
            current,
        }),
    }
}

pub fn check_move(state: ItemState) -> Result<Outcome> {
    match state {
        ItemState::Active { .. } => Ok(Outcome::Apply),
        current => Err(Error::InvalidTransition {
            operation: "move",
            current,
        }),
    }
}
