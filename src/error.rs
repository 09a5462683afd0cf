// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;
use url::Url;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("cannot connect to server: {0}")]
    Connection(reqwest::Error),
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("the URL {0} cannot be used as an API base URL")]
    InvalidBaseUrl(Url),
    #[error("API error: {0}")]
    Api(#[from] Api),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("{0}")]
    Validation(&'static str),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("session expired; log in again")]
    SessionExpired,
    #[error("command execution failed")]
    Command,
    #[error("operation cancelled")]
    Cancelled,
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Password(Password::Pinentry(value)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() || value.is_timeout() || value.is_request() {
            Self::Connection(value)
        } else {
            Self::Http(value)
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Api {
    #[error("server rejected the request ({status}): {}", .detail.as_deref().unwrap_or("no detail given"))]
    Rejected { status: u16, detail: Option<String> },
    #[error("server rejected our credentials: {}", .detail.as_deref().unwrap_or("no detail given"))]
    Unauthorized { detail: Option<String> },
    #[error("failed to update task")]
    UpdateFailed,
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password prompt available")]
    NoPrompt,
    #[error("Pinentry implementation error: {0}")]
    Pinentry(pinentry::Error),
}
