use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity supplied by the external session layer.
///
/// Only constructed through [`UserId::parse`], so a held value is
/// never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("User id must not be blank")]
pub struct BlankUserId;

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, BlankUserId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BlankUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = BlankUserId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
