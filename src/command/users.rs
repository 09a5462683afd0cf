// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use secrecy::ExposeSecret as _;
use tabled::{settings::Style, Table};

use crate::error::Result;

use super::Context;

/// List all accounts. Only admins are allowed to do this.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let token = ctx.session.token().await?;
        let result = ctx.client.list_users(token.expose_secret()).await;
        let users = ctx
            .session
            .expire_if_unauthorized(result)
            .await
            .map_err(super::surface)?;

        if users.is_empty() {
            println!("No users found.");
        } else {
            println!("{}", Table::new(users).with(Style::rounded()));
        }
        Ok(())
    }
}
