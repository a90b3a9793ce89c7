//! Login page commands - demo, guest, login, logout, status

use anyhow::{bail, Result};
use horizon_core::{Navigator, SessionStore};

use crate::app::App;
use crate::output::{paint, OutputContext};

/// Enter demo mode
pub fn demo(session: &SessionStore, ctx: &OutputContext) {
    session.enter_demo();
    ctx.success("Entered demo mode");
}

/// Continue as guest
pub fn guest(session: &SessionStore, ctx: &OutputContext) {
    session.enter_guest();
    ctx.success("Continuing as guest");
}

/// Sign in through the configured authenticator
pub async fn login(
    session: &SessionStore,
    email: &str,
    password: &str,
    ctx: &OutputContext,
) -> Result<()> {
    if !session.login(email, password).await {
        bail!("Invalid credentials");
    }
    let name = session
        .identity()
        .map(|identity| identity.display_name)
        .unwrap_or_default();
    ctx.success(&format!("Signed in as {}", name));
    Ok(())
}

/// Log out and return to login
pub fn logout(nav: &mut Navigator, ctx: &OutputContext) {
    nav.logout();
    ctx.success("Logged out");
}

/// Show the current session
pub fn status(app: &App, scope: &str) {
    let session = app.session.snapshot();
    let banner = session.banner();

    if !app.ctx.is_json() && !app.ctx.quiet {
        println!(
            "{} {}",
            paint(banner.label, banner.tone),
            banner.description
        );
    }

    let identity = session.identity();
    let pairs = [
        ("Mode", session.mode().to_string()),
        (
            "User",
            identity
                .map(|i| i.display_name.clone())
                .unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Email",
            identity
                .map(|i| i.email.clone())
                .unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Role",
            identity
                .map(|i| i.role.clone())
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Scope", scope.to_string()),
        ("Server", app.client.base_url().to_string()),
    ];
    app.ctx.print_kv(&pairs);
}
