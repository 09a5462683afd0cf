// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod client;
mod command;
mod error;
mod http;
mod metadata;
mod prompt;
mod session;
mod storage;
mod view;

use std::{path::PathBuf, process};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use command::Command as _;
use error::Result;
use log::{debug, error, warn};
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Command),
    Register(command::register::Command),
    Logout(command::logout::Command),
    Status(command::status::Command),
    List(command::list::Command),
    Create(command::create::Command),
    Complete(command::complete::Command),
    Delete(command::delete::Command),
    Users(command::users::Command),
    DeleteUser(command::delete_user::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, ctx: &mut command::Context) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Register(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Status(cmd) => cmd.execute(ctx).await,
            Self::List(cmd) => cmd.execute(ctx).await,
            Self::Create(cmd) => cmd.execute(ctx).await,
            Self::Complete(cmd) => cmd.execute(ctx).await,
            Self::Delete(cmd) => cmd.execute(ctx).await,
            Self::Users(cmd) => cmd.execute(ctx).await,
            Self::DeleteUser(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the task service API.
    #[arg(long, env = "TASKGATE_URL", default_value = metadata::DEFAULT_API_URL, value_parser = Url::parse)]
    url: Url,

    /// Do not save the session between runs. Every command then needs its own
    /// login, so this is mostly useful for `login` itself.
    #[arg(long)]
    no_persist_session: bool,

    /// The path to the Pinentry program to use when asking for passwords and
    /// confirmations.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(args: &Args) -> Box<dyn storage::Storage<session::Data>> {
    if !args.no_persist_session {
        if let Some(file_storage) = storage::File::new("session.json") {
            debug!("Keeping the session in {}", file_storage.path().display());
            return Box::new(file_storage);
        }
        warn!("We need to fall back to keeping the session in memory because there is no data directory for this user");
    }

    Box::new(storage::Memory::<session::Data>::new())
}

async fn run(args: Args) -> Result<()> {
    let pinentry = || {
        args.pinentry_program
            .clone()
            .map_or_else(prompt::Pinentry::new, prompt::Pinentry::new_with_executable)
    };
    let password_prompt: Vec<Box<dyn prompt::Prompt>> =
        vec![Box::new(pinentry()), Box::new(prompt::Terminal)];
    let confirm: Vec<Box<dyn prompt::Confirm>> =
        vec![Box::new(pinentry()), Box::new(prompt::Terminal)];

    let mut ctx = command::Context {
        client: Box::new(http::Client::new(args.url.clone())?),
        session: session::Store::new(get_session_storage(&args)),
        prompt: Box::new(password_prompt),
        confirm: Box::new(confirm),
    };

    command::Command::execute(args.command, &mut ctx).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("TASKGATE_LOG", "warn")
        .write_style("TASKGATE_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
