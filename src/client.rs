// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use async_trait::async_trait;
use secrecy::{ExposeSecret as _, Secret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tabled::Tabled;

use crate::{error::Result, session::AccessToken};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct TaskId(String);

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct UserId(String);

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A task as the server reports it. The client never edits one of these in
/// place; every change is followed by fetching the whole list again.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub(crate) id: TaskId,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) completed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct NewTask {
    pub(crate) title: String,
    pub(crate) description: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct TaskUpdate {
    pub(crate) completed: bool,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct Registration {
    pub(crate) username: String,
    pub(crate) email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub(crate) password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) admin_code: Option<String>,
}

fn serialize_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Deserialize)]
pub(crate) struct Login {
    pub(crate) access_token: Secret<AccessToken>,
    #[serde(default)]
    pub(crate) token_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Tabled)]
pub(crate) struct User {
    #[serde(rename = "_id", alias = "id")]
    #[tabled(rename = "ID")]
    pub(crate) id: UserId,
    #[tabled(rename = "Username")]
    pub(crate) username: String,
    #[tabled(rename = "Email")]
    pub(crate) email: String,
    #[serde(default)]
    #[tabled(rename = "Role")]
    pub(crate) role: String,
}

/// The operations the task service offers. Authenticated operations take the
/// bearer token explicitly; they report an expired or invalid token as
/// [`crate::error::Api::Unauthorized`] and leave it to the caller to act on.
#[async_trait]
pub(crate) trait Client {
    async fn login(&self, username: &str, password: &SecretString) -> Result<Login>;

    async fn register(&self, registration: &Registration) -> Result<()>;

    async fn list_tasks(&self, token: &AccessToken) -> Result<Vec<Task>>;

    async fn create_task(&self, token: &AccessToken, task: &NewTask) -> Result<()>;

    async fn complete_task(&self, token: &AccessToken, id: &TaskId) -> Result<()>;

    async fn delete_task(&self, token: &AccessToken, id: &TaskId) -> Result<()>;

    async fn list_users(&self, token: &AccessToken) -> Result<Vec<User>>;

    async fn delete_user(&self, token: &AccessToken, id: &UserId) -> Result<()>;
}


#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret as _;
    use serde_test::{assert_de_tokens, assert_ser_tokens, Token};

    use super::*;

    #[test]
    fn task_from_server_document() {
        assert_de_tokens(
            &Task {
                id: "65f0c0ffee".to_owned().into(),
                title: "Write report".to_owned(),
                description: "Quarterly numbers".to_owned(),
                completed: true,
            },
            &[
                Token::Map { len: Some(4) },
                Token::Str("_id"),
                Token::Str("65f0c0ffee"),
                Token::Str("title"),
                Token::Str("Write report"),
                Token::Str("description"),
                Token::Str("Quarterly numbers"),
                Token::Str("completed"),
                Token::Bool(true),
                Token::MapEnd,
            ],
        );
    }

    #[test]
    fn task_completion_defaults_to_incomplete() {
        assert_de_tokens(
            &Task {
                id: "1".to_owned().into(),
                title: "Write report".to_owned(),
                description: String::new(),
                completed: false,
            },
            &[
                Token::Map { len: Some(2) },
                Token::Str("_id"),
                Token::Str("1"),
                Token::Str("title"),
                Token::Str("Write report"),
                Token::MapEnd,
            ],
        );
    }

    #[test]
    fn registration_omits_missing_admin_code() {
        assert_ser_tokens(
            &Registration {
                username: "jon".to_owned(),
                email: "jon@example.com".to_owned(),
                password: SecretString::new("hunter22".to_owned()),
                admin_code: None,
            },
            &[
                Token::Struct {
                    name: "Registration",
                    len: 3,
                },
                Token::Str("username"),
                Token::Str("jon"),
                Token::Str("email"),
                Token::Str("jon@example.com"),
                Token::Str("password"),
                Token::Str("hunter22"),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn login_response_keeps_token_secret() -> crate::error::Result<()> {
        let login: Login =
            serde_json::from_str(r#"{"access_token": "a.b.c", "token_type": "bearer"}"#)?;
        assert_eq!(login.access_token.expose_secret().as_str(), "a.b.c");
        assert!(!format!("{:?}", login.access_token).contains("a.b.c"));
        Ok(())
    }
}
