//! Session identity: the `(user_id, user_type)` pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage key holding the string-encoded user id.
pub const USER_ID_KEY: &str = "user_id";

/// Storage key holding the user role.
pub const USER_TYPE_KEY: &str = "user_type";

/// Role of a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    Donante,
    CentroSalud,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Donante => "donante",
            UserType::CentroSalud => "centro_salud",
        }
    }

    /// Human-readable role name used in status messages.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Admin => "administrador",
            UserType::Donante => "donante",
            UserType::CentroSalud => "centro de salud",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserType::Admin),
            "donante" => Ok(UserType::Donante),
            "centro_salud" => Ok(UserType::CentroSalud),
            other => Err(IdentityError::UnknownUserType(other.to_string())),
        }
    }
}

/// Why a stored pair could not be read back as an identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("unknown user type '{0}'")]
    UnknownUserType(String),

    #[error("user id '{0}' is not an integer")]
    InvalidUserId(String),

    #[error("identity is incomplete: missing '{0}'")]
    Incomplete(&'static str),
}

/// Client-trusted identity established at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub user_type: UserType,
}

impl Identity {
    pub fn new(user_id: i64, user_type: UserType) -> Self {
        Self { user_id, user_type }
    }

    /// Key/value entries as persisted in a store.
    pub fn to_entries(&self) -> [(&'static str, String); 2] {
        [
            (USER_ID_KEY, self.user_id.to_string()),
            (USER_TYPE_KEY, self.user_type.as_str().to_string()),
        ]
    }

    /// Read an identity back from store entries.
    ///
    /// `Ok(None)` when neither key is present; an error when only one is, or
    /// when a value does not parse.
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Result<Option<Self>, IdentityError> {
        let user_id = entries.get(USER_ID_KEY).filter(|v| !v.is_empty());
        let user_type = entries.get(USER_TYPE_KEY).filter(|v| !v.is_empty());

        match (user_id, user_type) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(IdentityError::Incomplete(USER_TYPE_KEY)),
            (None, Some(_)) => Err(IdentityError::Incomplete(USER_ID_KEY)),
            (Some(id), Some(kind)) => {
                let user_id = id
                    .trim()
                    .parse()
                    .map_err(|_| IdentityError::InvalidUserId(id.clone()))?;
                let user_type = kind.parse()?;
                Ok(Some(Self { user_id, user_type }))
            }
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.user_type, self.user_id)
    }
}
