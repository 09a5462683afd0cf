// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use secrecy::SecretString;

use crate::{
    error::{self, Error, Result},
    prompt::RequestBuilder,
    view::View,
};

use super::Context;

/// Log in to the task service and show the task list.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The password to log in with. You are asked for it if it is not given.
    #[arg(long, env = "TASKGATE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// The email address of the account.
    #[clap()]
    username: String,
}

fn failure_message(detail: Option<&str>) -> String {
    format!("Login failed: {}", detail.unwrap_or("Unknown error"))
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let password = match self.password {
            Some(password) => SecretString::new(password),
            None => ctx
                .prompt
                .prompt(
                    RequestBuilder::new(&format!("Enter the password for {}.", self.username))
                        .into_request(),
                )
                .await?
                .ok_or(error::Password::NoPrompt)?,
        };

        let data = match ctx
            .session
            .login(ctx.client.as_ref(), &self.username, &password)
            .await
        {
            Ok(data) => data,
            Err(Error::Api(error::Api::Rejected { detail, .. })) => {
                eprintln!("{}", failure_message(detail.as_deref()));
                return Err(Error::Command);
            }
            Err(e) => return Err(super::surface(e)),
        };

        match data.role() {
            Some(role) => println!("Logged in as {} ({role}).", self.username),
            None => println!("Logged in as {}.", self.username),
        }

        let tasks = View::new(ctx.client.as_ref(), &mut ctx.session)
            .list_tasks()
            .await
            .map_err(super::surface)?;
        super::list::print(&tasks, data.role());
        Ok(())
    }
}
