//! Page-level error boundary
//!
//! Every page runs in its own task. A panic or unhandled error is reported
//! and the user chooses between remounting the page and going back to
//! login. An expired session goes straight to login.

use std::future::Future;
use std::io::{BufRead, IsTerminal, Write};

use anyhow::Result;
use horizon_client::ApiError;
use horizon_core::{Navigator, Route};
use tracing::{debug, error};

use crate::output::OutputContext;

/// Choice offered after a page failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    TryAgain,
    GoHome,
}

impl Recovery {
    /// Parse a prompt answer; empty input means try again
    pub fn parse(answer: &str) -> Option<Recovery> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "" | "r" | "retry" | "t" | "try again" => Some(Recovery::TryAgain),
            "h" | "home" | "q" | "quit" => Some(Recovery::GoHome),
            _ => None,
        }
    }
}

/// How a guarded page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Completed,
    /// The session expired; the shell is back on login
    SessionExpired,
    /// The user chose to go home after a failure
    WentHome,
}

/// A page failure caught by the boundary
#[derive(Debug)]
pub enum Failure {
    Error(anyhow::Error),
    Panic(String),
}

impl Failure {
    pub fn message(&self) -> String {
        match self {
            Failure::Error(e) => e.to_string(),
            Failure::Panic(message) => message.clone(),
        }
    }
}

/// Whether any error in the chain is an expired session
pub fn is_auth_expired(e: &anyhow::Error) -> bool {
    e.chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(ApiError::is_auth_expired)
}

/// Run a page under the boundary
///
/// `mount` builds a fresh page future for every attempt. `ask` decides
/// what to do after a failure.
pub async fn run_page<F, Fut>(
    ctx: &OutputContext,
    nav: &mut Navigator,
    route: Route,
    mut mount: F,
    ask: &mut dyn FnMut(&Failure) -> Recovery,
) -> Result<PageOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    loop {
        debug!(route = %route, "Mounting page");
        let failure = match tokio::spawn(mount()).await {
            Ok(Ok(())) => return Ok(PageOutcome::Completed),
            Ok(Err(e)) if is_auth_expired(&e) => {
                ctx.error(&ApiError::AuthExpired.to_string());
                nav.go_home();
                return Ok(PageOutcome::SessionExpired);
            }
            Ok(Err(e)) => Failure::Error(e),
            Err(join) if join.is_panic() => Failure::Panic(panic_message(join.into_panic())),
            Err(join) => return Err(join.into()),
        };

        error!(route = %route, error = %failure.message(), "Page failed");
        report(ctx, route, &failure);

        match ask(&failure) {
            Recovery::TryAgain => continue,
            Recovery::GoHome => {
                nav.go_home();
                return Ok(PageOutcome::WentHome);
            }
        }
    }
}

fn report(ctx: &OutputContext, route: Route, failure: &Failure) {
    ctx.error(&format!("Something went wrong on {}", route.title()));
    ctx.error(&failure.message());
    if ctx.verbose {
        if let Failure::Error(e) = failure {
            ctx.error(&format!("{:?}", e));
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unexpected failure".to_string()
    }
}

/// Ask on the terminal; non-interactive runs go home
///
/// The read runs under `block_in_place`, so the worker is handed off while
/// waiting and background pollers keep ticking. Needs the multi-threaded
/// runtime.
pub fn prompt_recovery(_failure: &Failure) -> Recovery {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Recovery::GoHome;
    }
    tokio::task::block_in_place(|| read_recovery(stdin.lock()))
}

/// Prompt until `input` yields a valid answer; end of input goes home
fn read_recovery(mut input: impl BufRead) -> Recovery {
    loop {
        eprint!("[r]etry or [h]ome? ");
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return Recovery::GoHome,
            Ok(_) => {
                if let Some(choice) = Recovery::parse(&answer) {
                    return choice;
                }
            }
        }
    }
}
