//! penman-cli: sign in, then create, edit, publish and list your posts.
//! Output goes to stdout as JSON; logs and notices go to stderr.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;


use std::process::ExitCode;

use clap::Parser;
use penman::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, ctx_from_settings, load_settings};
use handlers::{auth, posts};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(&cli)?;
    telemetry::init(&settings.logging)?;
    let ctx = ctx_from_settings(settings)?;

    match cli.command {
        Commands::Login(args) => auth::login(&ctx, args).await?,
        Commands::Logout => auth::logout(&ctx)?,
        Commands::Whoami => auth::whoami(&ctx)?,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
