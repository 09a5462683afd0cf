// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, view::View};

use super::Context;

/// Mark a task as completed.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the task, as shown by `list`.
    #[clap()]
    id: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let mut view = View::new(ctx.client.as_ref(), &mut ctx.session);
        let tasks = view
            .complete_task(&self.id.into())
            .await
            .map_err(super::surface)?;
        super::list::print(&tasks, view.role().await?);
        Ok(())
    }
}
