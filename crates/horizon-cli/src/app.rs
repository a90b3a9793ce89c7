//! Shared state handed to every command

use std::sync::Arc;

use horizon_client::HorizonClient;
use horizon_core::{ModeBanner, SessionStore};

use crate::output::OutputContext;

pub struct App {
    pub ctx: OutputContext,
    pub client: HorizonClient,
    pub session: Arc<SessionStore>,
}

impl App {
    pub fn banner(&self) -> ModeBanner {
        self.session.snapshot().banner()
    }
}
