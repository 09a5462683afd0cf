// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::debug;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{
    client::{self, Login, NewTask, Registration, Task, TaskId, TaskUpdate, User, UserId},
    error::{self, Error, Result},
    metadata,
    session::AccessToken,
};

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Flattens the `detail` member of an error response into one line. Most
/// errors carry a plain string; request validation failures carry a list of
/// objects with a `msg` member each.
fn detail_message(detail: Value) -> String {
    match detail {
        Value::String(message) => message,
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(mut fields) => match fields.remove("msg") {
                    Some(Value::String(message)) => message,
                    Some(other) => other.to_string(),
                    None => Value::Object(fields).to_string(),
                },
                Value::String(message) => message,
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// A 401 answer to a request that carried our token means the session is
/// over. Any other failure, including a 401 for bad login credentials, is a
/// plain rejection.
fn rejection(status: StatusCode, detail: Option<String>, authenticated: bool) -> error::Api {
    if authenticated && status == StatusCode::UNAUTHORIZED {
        error::Api::Unauthorized { detail }
    } else {
        error::Api::Rejected {
            status: status.as_u16(),
            detail,
        }
    }
}

pub(crate) struct Client {
    http: reqwest::Client,
    base: Url,
}

impl Client {
    pub(crate) fn new(mut base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(metadata::USER_AGENT.as_str())
            .build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn resource(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = self.endpoint(collection)?;
        let _ = url
            .path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base.clone()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn send(&self, req: RequestBuilder, authenticated: bool) -> Result<Response> {
        let res = req.send().await?;
        let status = res.status();
        debug!("{} {}", status, res.url());
        if status.is_success() {
            return Ok(res);
        }

        let detail = match res.json::<ErrorBody>().await {
            Ok(body) => body.detail.map(detail_message),
            Err(e) => {
                debug!("Error response has no readable body: {}", e);
                None
            }
        };

        Err(rejection(status, detail, authenticated).into())
    }
}

#[async_trait]
impl client::Client for Client {
    async fn login(&self, username: &str, password: &SecretString) -> Result<Login> {
        let req = self
            .http
            .post(self.endpoint("auth/login")?)
            .form(&[
                ("username", username),
                ("password", password.expose_secret().as_str()),
            ]);
        Ok(self.send(req, false).await?.json().await?)
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        let req = self
            .http
            .post(self.endpoint("auth/register")?)
            .json(registration);
        let _ = self.send(req, false).await?;
        Ok(())
    }

    async fn list_tasks(&self, token: &AccessToken) -> Result<Vec<Task>> {
        let req = self
            .http
            .get(self.endpoint("tasks/")?)
            .bearer_auth(token.as_str());
        Ok(self.send(req, true).await?.json().await?)
    }

    async fn create_task(&self, token: &AccessToken, task: &NewTask) -> Result<()> {
        let req = self
            .http
            .post(self.endpoint("tasks/")?)
            .bearer_auth(token.as_str())
            .json(task);
        let _ = self.send(req, true).await?;
        Ok(())
    }

    async fn complete_task(&self, token: &AccessToken, id: &TaskId) -> Result<()> {
        let req = self
            .http
            .put(self.resource("tasks/", id.as_ref())?)
            .bearer_auth(token.as_str())
            .json(&TaskUpdate { completed: true });
        let _ = self.send(req, true).await?;
        Ok(())
    }

    async fn delete_task(&self, token: &AccessToken, id: &TaskId) -> Result<()> {
        let req = self
            .http
            .delete(self.resource("tasks/", id.as_ref())?)
            .bearer_auth(token.as_str());
        let _ = self.send(req, true).await?;
        Ok(())
    }

    async fn list_users(&self, token: &AccessToken) -> Result<Vec<User>> {
        let req = self
            .http
            .get(self.endpoint("auth/get-all")?)
            .bearer_auth(token.as_str());
        Ok(self.send(req, true).await?.json().await?)
    }

    async fn delete_user(&self, token: &AccessToken, id: &UserId) -> Result<()> {
        let req = self
            .http
            .delete(self.resource("auth/delete/", id.as_ref())?)
            .bearer_auth(token.as_str());
        let _ = self.send(req, true).await?;
        Ok(())
    }
}
