// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, view::View};

use super::Context;

/// Add a new task. Only admins are allowed to do this.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// A short title for the task.
    #[clap()]
    title: String,

    /// What needs to be done.
    #[clap()]
    description: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let mut view = View::new(ctx.client.as_ref(), &mut ctx.session);
        let tasks = view
            .create_task(&self.title, &self.description)
            .await
            .map_err(super::surface)?;
        super::list::print(&tasks, view.role().await?);
        Ok(())
    }
}
