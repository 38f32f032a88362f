use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::errors::ModelError;
use crate::ids::{self, Id};
use crate::record::{Collection, Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            other => Err(ModelError::validation(format!("role must be manager or user, got {other:?}"))),
        }
    }
}

/// Password is stored as given; there is no hashing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "ids::deserialize_id")]
    pub id: Id,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Id { self.id }

    fn rows(doc: &Document) -> &[Self] { &doc.users }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> { &mut doc.users }
}

impl User {
    pub fn email_matches(&self, other: &str) -> bool {
        self.email.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Registration input after validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

const USER_REQUIRED: &str = "name, email, password, role required";

impl NewUser {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ModelError> {
        serde_json::from_value(Value::Object(body.clone()))
            .map_err(|_| ModelError::validation(USER_REQUIRED))
    }

    pub fn validate(self) -> Result<ValidUser, ModelError> {
        let (Some(name), Some(email), Some(password), Some(role)) = (
            non_blank(self.name),
            non_blank(self.email),
            non_blank(self.password),
            non_blank(self.role),
        ) else {
            return Err(ModelError::validation(USER_REQUIRED));
        };
        Ok(ValidUser { name, email, password, role: role.parse()? })
    }
}

impl ValidUser {
    pub fn into_user(self, id: Id) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role,
            extra: Map::new(),
        }
    }
}

pub(crate) fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
