// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    ffi::OsString,
    io::{self, Write as _},
    path::Path,
};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task;

use crate::{error::Result, metadata};

#[derive(Debug, Clone)]
pub(crate) struct Request {
    description: String,
    label: String,
}

pub(crate) struct RequestBuilder {
    description: String,
    label: String,
}

impl RequestBuilder {
    pub(crate) fn new(description: &str) -> Self {
        Self {
            description: description.to_owned(),
            label: "Password".to_owned(),
        }
    }

    pub(crate) fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub(crate) fn into_request(self) -> Request {
        Request {
            description: self.description,
            label: self.label,
        }
    }
}

/// Asks the user for a secret. Returns `None` when this kind of prompt is not
/// available here so that the next one can be tried.
#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        (**self).prompt(req).await
    }
}

#[async_trait]
impl<T: Prompt> Prompt for Vec<T> {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        for candidate in self {
            if let r @ (Ok(Some(_)) | Err(_)) = candidate.prompt(req.clone()).await {
                return r;
            }
        }

        Ok(None)
    }
}

/// Asks the user to confirm a destructive action. Returns `None` when this
/// kind of dialog is not available here.
#[async_trait]
pub(crate) trait Confirm: Send + Sync {
    async fn confirm(&self, query: &str) -> Result<Option<bool>>;
}

#[async_trait]
impl<T: Confirm + ?Sized> Confirm for Box<T> {
    async fn confirm(&self, query: &str) -> Result<Option<bool>> {
        (**self).confirm(query).await
    }
}

#[async_trait]
impl<T: Confirm> Confirm for Vec<T> {
    async fn confirm(&self, query: &str) -> Result<Option<bool>> {
        for candidate in self {
            if let r @ (Ok(Some(_)) | Err(_)) = candidate.confirm(query).await {
                return r;
            }
        }

        Ok(None)
    }
}

pub(crate) struct Pinentry {
    executable: Option<OsString>,
}

impl Pinentry {
    pub(crate) const fn new() -> Self {
        Self { executable: None }
    }

    pub(crate) fn new_with_executable<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: Some(executable.as_ref().as_os_str().into()),
        }
    }
}

#[async_trait]
impl Prompt for Pinentry {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        fn interact<'input>(
            mut input: pinentry::PassphraseInput<'input>,
            title: &'input str,
            req: &'input Request,
        ) -> Result<SecretString> {
            _ = input.required("A password is required to continue.");
            _ = input.with_title(title);
            _ = input.with_description(&req.description);
            _ = input.with_prompt(&req.label);

            Ok(input.interact()?)
        }

        let title = format!("{} - {}", req.label, *metadata::CLIENT_DISPLAY_NAME);

        let input = self
            .executable
            .as_ref()
            .and_then(pinentry::PassphraseInput::with_binary)
            .or_else(pinentry::PassphraseInput::with_default_binary)
            .map(|input| task::spawn_blocking(move || interact(input, &title, &req)));

        Ok(match input {
            Some(fut) => Some(fut.await??),
            None => None,
        })
    }
}

#[async_trait]
impl Confirm for Pinentry {
    async fn confirm(&self, query: &str) -> Result<Option<bool>> {
        fn interact<'dialog>(
            mut dialog: pinentry::ConfirmationDialog<'dialog>,
            title: &'dialog str,
            query: &str,
        ) -> Result<bool> {
            _ = dialog.with_title(title);
            _ = dialog.with_ok("Delete");
            _ = dialog.with_cancel("Cancel");

            Ok(dialog.confirm(query)?)
        }

        let title = format!("Confirm - {}", *metadata::CLIENT_DISPLAY_NAME);
        let query = query.to_owned();

        let dialog = self
            .executable
            .as_ref()
            .and_then(pinentry::ConfirmationDialog::with_binary)
            .or_else(pinentry::ConfirmationDialog::with_default_binary)
            .map(|dialog| task::spawn_blocking(move || interact(dialog, &title, &query)));

        Ok(match dialog {
            Some(fut) => Some(fut.await??),
            None => None,
        })
    }
}

pub(crate) struct Terminal;

#[async_trait]
impl Prompt for Terminal {
    async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
        let label = format!("{}: ", req.label);
        Ok(Some(
            task::spawn_blocking(move || rpassword::prompt_password(label).map(SecretString::new))
                .await??,
        ))
    }
}

#[async_trait]
impl Confirm for Terminal {
    async fn confirm(&self, query: &str) -> Result<Option<bool>> {
        let query = query.to_owned();
        let answer = task::spawn_blocking(move || -> io::Result<String> {
            let mut stderr = io::stderr();
            write!(stderr, "{query} [y/N] ")?;
            stderr.flush()?;

            let mut line = String::new();
            let _ = io::stdin().read_line(&mut line)?;
            Ok(line)
        })
        .await??;

        Ok(Some(is_affirmative(&answer)))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirms everything without asking, for `--yes`.
pub(crate) struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, _query: &str) -> Result<Option<bool>> {
        Ok(Some(true))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use tokio::sync::Mutex;

    use super::*;

    /// Gives a fixed answer and remembers what it was asked.
    pub(crate) struct Scripted {
        answer: Option<bool>,
        pub(crate) queries: Mutex<Vec<String>>,
    }

    impl Scripted {
        pub(crate) fn new(answer: Option<bool>) -> Self {
            Self {
                answer,
                queries: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl Confirm for Scripted {
        async fn confirm(&self, query: &str) -> Result<Option<bool>> {
            self.queries.lock().await.push(query.to_owned());
            Ok(self.answer)
        }
    }
}
