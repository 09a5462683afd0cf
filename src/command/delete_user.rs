// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::info;
use secrecy::ExposeSecret as _;

use crate::{
    client::UserId,
    error::Result,
    prompt::{self, Confirm},
};

use super::Context;

/// Delete an account after asking for confirmation. Only admins are allowed
/// to do this.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,

    /// The ID of the account, as shown by `users`.
    #[clap()]
    id: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let confirm: &dyn Confirm = if self.yes {
            &prompt::AssumeYes
        } else {
            ctx.confirm.as_ref()
        };
        let id = UserId::from(self.id);

        let confirmed = confirm
            .confirm("Are you sure you want to delete this user?")
            .await?
            .unwrap_or(false);
        if !confirmed {
            info!("Not deleting user {}", id);
            return Ok(());
        }

        let token = ctx.session.token().await?;
        let result = ctx.client.delete_user(token.expose_secret(), &id).await;
        ctx.session
            .expire_if_unauthorized(result)
            .await
            .map_err(super::surface)?;
        println!("Deleted user {id}.");
        Ok(())
    }
}
