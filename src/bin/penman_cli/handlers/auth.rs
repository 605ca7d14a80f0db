#![deny(clippy::all, clippy::pedantic)]

use penman::application::gate::{GateDecision, destination_after_login};
use penman::application::ports::Credentials;
use penman::application::session::SessionPhase;
use penman::domain::session::UserIdentity;
use serde::Serialize;

use crate::args::LoginArgs;
use crate::client::{CliError, Ctx};
use crate::io::read_password;
use crate::print::print_json;

#[derive(Serialize)]
struct SignedIn<'a> {
    user: &'a UserIdentity,
    display_name: Option<String>,
    continue_at: String,
}

#[derive(Serialize)]
struct Whoami {
    authenticated: bool,
    phase: &'static str,
    user: Option<UserIdentity>,
}

pub async fn login(ctx: &Ctx, args: LoginArgs) -> Result<(), CliError> {
    if let GateDecision::Redirect { .. } = ctx.gate.authorize_login_view() {
        eprintln!("already signed in; run `penman-cli logout` to switch accounts");
        return whoami(ctx);
    }

    let password = read_password(args.password_env, args.password_file)?;
    let credentials = Credentials::new(args.username, password);
    let user = ctx.session.login(&credentials).await?;

    print_json(&SignedIn {
        display_name: user.display_name(),
        user: &user,
        continue_at: destination_after_login(args.return_to.as_deref()),
    })
}

pub fn logout(ctx: &Ctx) -> Result<(), CliError> {
    ctx.session.logout();
    print_json(&serde_json::json!({ "signed_out": true }))
}

pub fn whoami(ctx: &Ctx) -> Result<(), CliError> {
    let snapshot = ctx.session.snapshot();
    print_json(&Whoami {
        authenticated: snapshot.authenticated,
        phase: phase_label(snapshot.phase),
        user: snapshot.user,
    })
}

fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Pending => "pending",
        SessionPhase::Anonymous => "anonymous",
        SessionPhase::Restored => "restored",
        SessionPhase::Confirmed => "confirmed",
    }
}
