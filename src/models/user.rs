use serde::Serialize;

use crate::domain::{Role, UserId};

/// Account data returned from the repository. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,

    pub name: String,

    pub email: String,

    pub role: Role,

    #[serde(skip_serializing)]
    pub api_key: String,

    pub created_at: String,

    pub updated_at: String,
}

/// Author information embedded in review responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
