// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::error::Result;

use super::Context;

/// Forget the current session, if any.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.session.logout().await?;
        println!("Logged out.");
        Ok(())
    }
}
