use thiserror::Error;

use crate::models::{BlankUserId, UnknownWindow};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(#[from] BlankUserId),

    #[error(transparent)]
    InvalidWindow(#[from] UnknownWindow),
}
