// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::error::Result;

use super::Context;

/// Show whether we are logged in and with which role.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        match ctx.session.current().await? {
            Some(data) => match data.role() {
                Some(role) => println!("Logged in with role {role}."),
                None => println!("Logged in without a recognized role."),
            },
            None => println!("Not logged in."),
        }
        println!(
            "Sessions are {}.",
            if ctx.session.is_persistent() {
                "saved between runs"
            } else {
                "only kept in memory"
            }
        );
        Ok(())
    }
}
