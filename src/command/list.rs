// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    client::Task,
    error::Result,
    metadata,
    session::Role,
    view::{self, View},
};

use super::Context;

/// Show all tasks along with the actions available on each.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

pub(super) fn print(tasks: &[Task], role: Option<Role>) {
    println!("{}", view::render(tasks, role));
    if view::can_create(role) {
        println!(
            "Add a task with `{} create <TITLE> <DESCRIPTION>`.",
            *metadata::CLIENT_TYPE_ID
        );
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let mut view = View::new(ctx.client.as_ref(), &mut ctx.session);
        let tasks = view.list_tasks().await.map_err(super::surface)?;
        print(&tasks, view.role().await?);
        Ok(())
    }
}
