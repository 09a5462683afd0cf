// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    client::Registration,
    error::{self, Error, Result},
    prompt::{Prompt, RequestBuilder},
};

use super::Context;

/// Create a new account. Log in with it afterwards.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The password for the new account. You are asked for it if it is not
    /// given.
    #[arg(long, env = "TASKGATE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// The code that makes the new account an admin.
    #[arg(long, env = "TASKGATE_ADMIN_CODE", hide_env_values = true)]
    admin_code: Option<String>,

    /// The display name of the account.
    #[clap()]
    username: String,

    /// The email address of the account. You log in with this.
    #[clap()]
    email: String,
}

async fn ask(prompt: &dyn Prompt, description: &str, label: &str) -> Result<SecretString> {
    prompt
        .prompt(
            RequestBuilder::new(description)
                .with_label(label)
                .into_request(),
        )
        .await?
        .ok_or_else(|| error::Password::NoPrompt.into())
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let password = match self.password {
            Some(password) => SecretString::new(password),
            None => {
                let description = format!("Choose a password for {}.", self.email);
                let password = ask(ctx.prompt.as_ref(), &description, "Password").await?;
                let repeated =
                    ask(ctx.prompt.as_ref(), &description, "Repeat password").await?;
                if password.expose_secret() != repeated.expose_secret() {
                    return Err(super::surface(Error::Validation("Passwords do not match.")));
                }
                password
            }
        };

        let registration = Registration {
            username: self.username,
            email: self.email,
            password,
            admin_code: self.admin_code.filter(|code| !code.is_empty()),
        };

        match ctx.client.register(&registration).await {
            Ok(()) => {
                println!("Registration successful! Please log in.");
                Ok(())
            }
            Err(Error::Api(error::Api::Rejected { detail, .. })) => {
                eprintln!("{}", detail.as_deref().unwrap_or("Registration failed"));
                Err(Error::Command)
            }
            Err(e) => Err(super::surface(e)),
        }
    }
}
