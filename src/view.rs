// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use log::{debug, info};
use secrecy::ExposeSecret as _;
use tabled::{
    settings::{object::Segment, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::{
    client::{Client, NewTask, Task, TaskId},
    error::{self, Error, Result},
    prompt::Confirm,
    session::{self, Role},
    storage::Storage,
};

pub(crate) const NO_TASKS: &str = "No tasks found.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Control {
    Complete,
    Delete,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Complete => "complete",
            Self::Delete => "delete",
        })
    }
}

/// The actions offered on a task's row. Only incomplete tasks can be
/// completed, and only admins are offered deletion.
pub(crate) fn controls(task: &Task, role: Option<Role>) -> Vec<Control> {
    let mut controls = Vec::with_capacity(2);
    if !task.completed {
        controls.push(Control::Complete);
    }
    match role {
        Some(Role::Admin) => controls.push(Control::Delete),
        Some(Role::User) | None => {}
    }
    controls
}

pub(crate) const fn can_create(role: Option<Role>) -> bool {
    match role {
        Some(Role::Admin) => true,
        Some(Role::User) | None => false,
    }
}

#[derive(Tabled)]
struct Row<'task> {
    #[tabled(rename = "ID")]
    id: &'task TaskId,
    #[tabled(rename = "Title")]
    title: &'task str,
    #[tabled(rename = "Description")]
    description: &'task str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Actions")]
    actions: String,
}

impl<'task> Row<'task> {
    fn new(task: &'task Task, role: Option<Role>) -> Self {
        Self {
            id: &task.id,
            title: &task.title,
            description: &task.description,
            status: if task.completed { "Done" } else { "Open" },
            actions: controls(task, role)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Renders the whole task list, replacing whatever was shown before.
pub(crate) fn render(tasks: &[Task], role: Option<Role>) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_owned();
    }

    Table::new(tasks.iter().map(|task| Row::new(task, role)))
        .with(Style::rounded())
        .with(Modify::new(Segment::new(1.., 1..=2)).with(Alignment::left()))
        .to_string()
}

/// The task operations a signed-in user can perform. Every successful change
/// is followed by a fresh copy of the whole list.
pub(crate) struct View<'view, S> {
    client: &'view (dyn Client + Send + Sync),
    session: &'view mut session::Store<S>,
}

impl<'view, S: Storage<session::Data>> View<'view, S> {
    pub(crate) fn new(
        client: &'view (dyn Client + Send + Sync),
        session: &'view mut session::Store<S>,
    ) -> Self {
        Self { client, session }
    }

    pub(crate) async fn role(&mut self) -> Result<Option<Role>> {
        self.session.current_role().await
    }

    pub(crate) async fn list_tasks(&mut self) -> Result<Vec<Task>> {
        let token = self.session.token().await?;
        let result = self.client.list_tasks(token.expose_secret()).await;
        let tasks = self.session.expire_if_unauthorized(result).await?;
        debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    pub(crate) async fn create_task(
        &mut self,
        title: &str,
        description: &str,
    ) -> Result<Vec<Task>> {
        if title.is_empty() || description.is_empty() {
            return Err(Error::Validation("Please fill in both fields."));
        }

        let token = self.session.token().await?;
        let task = NewTask {
            title: title.to_owned(),
            description: description.to_owned(),
        };
        let result = self.client.create_task(token.expose_secret(), &task).await;
        self.session.expire_if_unauthorized(result).await?;
        info!(r#"Created task "{}""#, title.escape_default());

        self.list_tasks().await
    }

    /// Marks a task as completed. The server's reason for refusing is not
    /// passed on; any refusal other than an expired session is reported as
    /// [`error::Api::UpdateFailed`].
    pub(crate) async fn complete_task(&mut self, id: &TaskId) -> Result<Vec<Task>> {
        let token = self.session.token().await?;
        let result = self.client.complete_task(token.expose_secret(), id).await;
        match self.session.expire_if_unauthorized(result).await {
            Ok(()) => info!("Completed task {}", id),
            Err(Error::Api(error::Api::Rejected { status, detail })) => {
                debug!(
                    "Server refused to complete task {} ({}): {}",
                    id,
                    status,
                    detail.as_deref().unwrap_or("no detail given")
                );
                return Err(error::Api::UpdateFailed.into());
            }
            Err(e) => return Err(e),
        }

        self.list_tasks().await
    }

    /// Deletes a task once the user confirms it. Returns `None` without
    /// contacting the server if they do not.
    pub(crate) async fn delete_task(
        &mut self,
        id: &TaskId,
        confirm: &dyn Confirm,
    ) -> Result<Option<Vec<Task>>> {
        let confirmed = confirm
            .confirm("Are you sure you want to delete this task?")
            .await?
            .unwrap_or(false);
        if !confirmed {
            info!("Not deleting task {}", id);
            return Ok(None);
        }

        let token = self.session.token().await?;
        let result = self.client.delete_task(token.expose_secret(), id).await;
        self.session.expire_if_unauthorized(result).await?;
        info!("Deleted task {}", id);

        Ok(Some(self.list_tasks().await?))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use crate::{
        client::testing::{task, token_for, Call, Fake},
        prompt::testing::Scripted,
        storage::Memory,
    };

    use super::*;

    type Store = session::Store<Memory<session::Data>>;

    async fn signed_in(claims: &str, tasks: Vec<Task>) -> Result<(Fake, Store)> {
        let client = Fake::new(token_for(claims), tasks);
        let mut store = session::Store::new(Memory::new());
        let _ = store
            .login(&client, "jon@example.com", &SecretString::new("secret".to_owned()))
            .await?;
        Ok((client, store))
    }

    #[test]
    fn user_is_never_offered_deletion() {
        for role in [Some(Role::User), None] {
            for completed in [false, true] {
                assert!(!controls(&task("1", completed), role).contains(&Control::Delete));
            }
        }
    }

    #[test]
    fn admin_controls_follow_completion() {
        assert_eq!(
            controls(&task("1", false), Some(Role::Admin)),
            vec![Control::Complete, Control::Delete]
        );
        assert_eq!(
            controls(&task("2", true), Some(Role::Admin)),
            vec![Control::Delete]
        );
    }

    #[test]
    fn completed_task_for_user_has_no_controls() {
        assert!(controls(&task("1", true), Some(Role::User)).is_empty());
        assert_eq!(
            controls(&task("2", false), Some(Role::User)),
            vec![Control::Complete]
        );
    }

    #[test]
    fn only_admins_are_offered_creation() {
        assert!(can_create(Some(Role::Admin)));
        assert!(!can_create(Some(Role::User)));
        assert!(!can_create(None));
    }

    #[test]
    fn render_empty_list_shows_placeholder() {
        assert_eq!(render(&[], Some(Role::Admin)), NO_TASKS);
    }

    #[test]
    fn render_shows_one_row_per_task() {
        let tasks = [task("1", false), task("2", true)];

        let admin = render(&tasks, Some(Role::Admin));
        assert!(admin.contains("Task 1"));
        assert!(admin.contains("Description of task 2"));
        assert!(admin.contains("complete, delete"));
        assert_eq!(admin.matches("delete").count(), 2);

        let user = render(&tasks, Some(Role::User));
        assert!(!user.contains("delete"));
        assert_eq!(user.matches("complete").count(), 1);
    }

    #[tokio::test]
    async fn admin_login_then_render() -> Result<()> {
        let (client, mut store) = signed_in(
            r#"{"sub":"jon@example.com","role":"admin"}"#,
            vec![task("1", false), task("2", true)],
        )
        .await?;
        assert_eq!(store.current_role().await?, Some(Role::Admin));

        let mut view = View::new(&client, &mut store);
        let tasks = view.list_tasks().await?;
        let role = view.role().await?;
        let rows: Vec<_> = tasks.iter().map(|task| controls(task, role)).collect();
        assert_eq!(
            rows,
            vec![vec![Control::Complete, Control::Delete], vec![Control::Delete]]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_listing_logs_out() -> Result<()> {
        let (client, mut store) =
            signed_in(r#"{"role":"user"}"#, vec![task("1", false)]).await?;
        client.revoke().await;

        let result = View::new(&client, &mut store).list_tasks().await;
        assert!(matches!(result, Err(Error::SessionExpired)));
        assert!(store.current().await?.is_none());
        assert_eq!(store.current_role().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn listing_without_session_sends_nothing() -> Result<()> {
        let client = Fake::new(token_for(r#"{"role":"admin"}"#), vec![]);
        let mut store = session::Store::new(Memory::new());

        let result = View::new(&client, &mut store).list_tasks().await;
        assert!(matches!(result, Err(Error::NotLoggedIn)));
        assert!(client.calls().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_both_fields() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"admin"}"#, vec![]).await?;
        let mut view = View::new(&client, &mut store);

        for (title, description) in [("", "x"), ("x", ""), ("", "")] {
            let result = view.create_task(title, description).await;
            assert!(matches!(result, Err(Error::Validation(_))));
        }
        assert_eq!(client.calls().await, vec![Call::Login("jon@example.com".to_owned())]);
        Ok(())
    }

    #[tokio::test]
    async fn create_refetches_list() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"admin"}"#, vec![task("1", true)]).await?;

        let tasks = View::new(&client, &mut store)
            .create_task("Write report", "Quarterly numbers")
            .await?;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "Write report");
        assert!(!tasks[1].completed);
        assert_eq!(
            client.calls().await[1..],
            [
                Call::CreateTask(NewTask {
                    title: "Write report".to_owned(),
                    description: "Quarterly numbers".to_owned(),
                }),
                Call::ListTasks,
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_surfaces_server_detail() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"user"}"#, vec![]).await?;

        let result = View::new(&client, &mut store)
            .create_task("Write report", "Quarterly numbers")
            .await;
        assert!(matches!(
            result,
            Err(Error::Api(error::Api::Rejected { status: 403, detail: Some(ref detail) }))
                if detail == "Only admins can create tasks"
        ));
        assert_eq!(client.calls().await.last(), Some(&Call::CreateTask(NewTask {
            title: "Write report".to_owned(),
            description: "Quarterly numbers".to_owned(),
        })));
        assert_eq!(store.current_role().await?, Some(Role::User));
        Ok(())
    }

    #[tokio::test]
    async fn complete_moves_task_to_done() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"user"}"#, vec![task("1", false)]).await?;

        let tasks = View::new(&client, &mut store)
            .complete_task(&"1".to_owned().into())
            .await?;
        assert!(tasks[0].completed);
        assert!(controls(&tasks[0], Some(Role::User)).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn complete_failure_is_generic() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"admin"}"#, vec![task("1", false)]).await?;
        client.reject_updates().await;

        let result = View::new(&client, &mut store)
            .complete_task(&"1".to_owned().into())
            .await;
        assert!(matches!(result, Err(Error::Api(error::Api::UpdateFailed))));
        assert_eq!(client.calls().await.last(), Some(&Call::CompleteTask("1".to_owned().into())));
        Ok(())
    }

    #[tokio::test]
    async fn complete_with_expired_session_logs_out() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"admin"}"#, vec![task("1", false)]).await?;
        client.revoke().await;

        let result = View::new(&client, &mut store)
            .complete_task(&"1".to_owned().into())
            .await;
        assert!(matches!(result, Err(Error::SessionExpired)));
        assert!(store.current().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"admin"}"#, vec![task("1", false)]).await?;
        let confirm = Scripted::new(Some(false));

        let result = View::new(&client, &mut store)
            .delete_task(&"1".to_owned().into(), &confirm)
            .await?;
        assert!(result.is_none());
        assert_eq!(confirm.queries.lock().await.len(), 1);
        assert_eq!(client.calls().await, vec![Call::Login("jon@example.com".to_owned())]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_without_any_dialog_sends_nothing() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"admin"}"#, vec![task("1", false)]).await?;

        let result = View::new(&client, &mut store)
            .delete_task(&"1".to_owned().into(), &Scripted::new(None))
            .await?;
        assert!(result.is_none());
        assert_eq!(client.calls().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn confirmed_delete_refetches_list() -> Result<()> {
        let (client, mut store) =
            signed_in(r#"{"role":"admin"}"#, vec![task("1", false), task("2", true)]).await?;

        let tasks = View::new(&client, &mut store)
            .delete_task(&"1".to_owned().into(), &Scripted::new(Some(true)))
            .await?;
        assert_eq!(tasks, Some(vec![task("2", true)]));
        Ok(())
    }

    #[tokio::test]
    async fn delete_surfaces_server_detail() -> Result<()> {
        let (client, mut store) = signed_in(r#"{"role":"user"}"#, vec![task("1", false)]).await?;

        let result = View::new(&client, &mut store)
            .delete_task(&"1".to_owned().into(), &Scripted::new(Some(true)))
            .await;
        assert!(matches!(
            result,
            Err(Error::Api(error::Api::Rejected { detail: Some(ref detail), .. }))
                if detail == "Only admins can delete tasks"
        ));
        assert!(!client.calls().await.contains(&Call::ListTasks));
        Ok(())
    }
}
