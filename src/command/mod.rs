// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::{
    client::Client,
    error::{self, Error, Result},
    prompt, session,
    storage::Storage,
};

pub(crate) mod complete;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod delete_user;
pub(crate) mod list;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod register;
pub(crate) mod status;
pub(crate) mod users;

/// Everything a command may need: the service, the session and ways to ask
/// the user things.
pub(crate) struct Context {
    pub(crate) client: Box<dyn Client + Send + Sync>,
    pub(crate) session: session::Store<Box<dyn Storage<session::Data>>>,
    pub(crate) prompt: Box<dyn prompt::Prompt>,
    pub(crate) confirm: Box<dyn prompt::Confirm>,
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: &mut Context) -> Result<()>;
}

fn explanation(err: &Error) -> Option<&str> {
    // LINT: Anything not listed here has no user-facing explanation.
    #[allow(clippy::wildcard_enum_match_arm)]
    match err {
        Error::Connection(_) => Some("Cannot connect to server."),
        Error::Validation(message) => Some(*message),
        Error::Api(error::Api::Rejected {
            detail: Some(detail),
            ..
        }) => Some(detail.as_str()),
        Error::Api(error::Api::UpdateFailed) => Some("Failed to update task."),
        _ => None,
    }
}

/// Tells the user why an action failed in the terms they saw it fail, and
/// turns the error into a plain command failure. Errors with nothing to show
/// pass through unchanged.
pub(crate) fn surface(err: Error) -> Error {
    if let Some(message) = explanation(&err) {
        eprintln!("{message}");
        return Error::Command;
    }
    err
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explanations() {
        assert_eq!(
            explanation(
                &error::Api::Rejected {
                    status: 403,
                    detail: Some("Only admins can delete tasks".to_owned()),
                }
                .into()
            ),
            Some("Only admins can delete tasks")
        );
        assert_eq!(
            explanation(&error::Api::UpdateFailed.into()),
            Some("Failed to update task.")
        );
        assert_eq!(
            explanation(&Error::Validation("Please fill in both fields.")),
            Some("Please fill in both fields.")
        );
    }

    #[test]
    fn rejected_detail_is_shown_verbatim() {
        let err = surface(
            error::Api::Rejected {
                status: 403,
                detail: Some("Only admins can delete tasks".to_owned()),
            }
            .into(),
        );
        assert!(matches!(err, Error::Command));
    }

    #[test]
    fn unexplained_errors_pass_through() {
        assert!(matches!(surface(Error::SessionExpired), Error::SessionExpired));
        assert!(matches!(surface(Error::NotLoggedIn), Error::NotLoggedIn));
        assert!(matches!(
            surface(error::Api::Rejected { status: 500, detail: None }.into()),
            Error::Api(error::Api::Rejected { status: 500, .. })
        ));
    }
}
