// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use clap::ValueEnum;
use inflector::Inflector as _;
use log::{debug, info, warn};
use secrecy::{ExposeSecret as _, Secret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    client::Client,
    error::{self, Error, Result},
    storage::Storage,
};

/// The coarse authorization tag the server embeds in its tokens. The client
/// only uses it to decide what to show; the server makes the real decisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.to_possible_value().ok_or(fmt::Error)?;
        write!(f, "{}", value.get_name().to_title_case())
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct AccessToken(String);

impl AccessToken {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl secrecy::Zeroize for AccessToken {
    fn zeroize(&mut self) {
        secrecy::Zeroize::zeroize(&mut self.0);
    }
}

impl secrecy::CloneableSecret for AccessToken {}

impl secrecy::DebugSecret for AccessToken {}

impl secrecy::SerializableSecret for AccessToken {}

#[derive(Deserialize)]
struct Claims {
    role: Option<String>,
}

/// Reads the role claim out of a token's payload without checking its
/// signature. Anything that is not a well-formed token carrying a known role
/// yields no role at all.
pub(crate) fn decode_role(token: &str) -> Option<Role> {
    let Some(payload) = token.split('.').nth(1) else {
        debug!("Token has no payload segment; treating it as carrying no role");
        return None;
    };

    let payload: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    let bytes = match base64::decode_config(
        payload.trim_end_matches('='),
        base64::STANDARD_NO_PAD,
    ) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Token payload is not valid base64 ({e}); treating it as carrying no role");
            return None;
        }
    };

    let claims = match serde_json::from_slice::<Claims>(&bytes) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Token payload is not a JSON object ({e}); treating it as carrying no role");
            return None;
        }
    };

    let Some(role) = claims.role else {
        debug!("Token has no role claim");
        return None;
    };
    match Role::from_str(&role, false) {
        Ok(role) => Some(role),
        Err(_) => {
            debug!(
                r#"Token names the unknown role "{}"; treating it as carrying no role"#,
                role.escape_default()
            );
            None
        }
    }
}

/// What we keep between invocations: the token and the role it carried when
/// we received it. The two are always written and cleared together.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Data {
    token: Secret<AccessToken>,
    role: Option<Role>,
}

impl Data {
    fn new(token: Secret<AccessToken>) -> Self {
        let role = decode_role(token.expose_secret().as_str());
        Self { token, role }
    }

    pub(crate) const fn role(&self) -> Option<Role> {
        self.role
    }
}

pub(crate) struct Store<S> {
    storage: S,
}

impl<S: Storage<Data>> Store<S> {
    pub(crate) const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub(crate) fn is_persistent(&self) -> bool {
        self.storage.is_persistent()
    }

    /// Exchanges credentials for a token and remembers it along with its role.
    /// A failed attempt leaves any existing session untouched.
    pub(crate) async fn login(
        &mut self,
        client: &(dyn Client + Send + Sync),
        username: &str,
        password: &SecretString,
    ) -> Result<Data> {
        let login = client.login(username, password).await?;
        debug!(
            "Received a {} token",
            login.token_type.as_deref().unwrap_or("bearer")
        );

        let data = Data::new(login.access_token);
        if data.role.is_none() {
            warn!("The token we received carries no recognizable role; continuing without privileges");
        }

        self.storage.update(&data).await?;
        if !self.is_persistent() {
            warn!("The session is only kept in memory and will be forgotten when this program exits");
        }
        info!("Logged in as {}", username);
        Ok(data)
    }

    pub(crate) async fn logout(&mut self) -> Result<()> {
        self.storage.clear().await
    }

    pub(crate) async fn current(&mut self) -> Result<Option<Data>> {
        self.storage.get().await
    }

    pub(crate) async fn current_role(&mut self) -> Result<Option<Role>> {
        Ok(self.current().await?.and_then(|data| data.role))
    }

    pub(crate) async fn token(&mut self) -> Result<Secret<AccessToken>> {
        self.current()
            .await?
            .map(|data| data.token)
            .ok_or(Error::NotLoggedIn)
    }

    /// Ends the session if the server refused our token. Every authenticated
    /// request passes its result through here.
    pub(crate) async fn expire_if_unauthorized<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::Api(error::Api::Unauthorized { detail })) => {
                info!(
                    "The server no longer accepts our token ({}); logging out",
                    detail.as_deref().unwrap_or("no detail given")
                );
                self.logout().await?;
                Err(Error::SessionExpired)
            }
            other => other,
        }
    }
}
