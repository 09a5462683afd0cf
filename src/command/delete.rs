// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    error::Result,
    prompt::{self, Confirm},
    view::View,
};

use super::Context;

/// Delete a task after asking for confirmation. Only admins are allowed to do
/// this.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Do not ask for confirmation.
    #[arg(long, short)]
    yes: bool,

    /// The ID of the task, as shown by `list`.
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

        let mut view = View::new(ctx.client.as_ref(), &mut ctx.session);
        if let Some(tasks) = view
            .delete_task(&self.id.into(), confirm)
            .await
            .map_err(super::surface)?
        {
            super::list::print(&tasks, view.role().await?);
        }
        Ok(())
    }
}
