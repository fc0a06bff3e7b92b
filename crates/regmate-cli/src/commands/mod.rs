use crate::error::invalid_input;
use anyhow::Result;
use regmate_config::AppConfig;
use regmate_rws::client::RegRws;
use regmate_store::TicketCache;
use serde::Serialize;
use std::io::{self, Write};

pub mod completions;
pub mod poc;
pub mod ticket;

pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub cache: &'a TicketCache,
    pub json: bool,
}

impl Context<'_> {
    /// Builds the service client. Commands that stay local never call
    /// this, so they work without an API key.
    pub fn client(&self) -> Result<RegRws> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            invalid_input("no API key configured; set api_key in the config file or pass --api-key")
        })?;
        Ok(RegRws::new(&self.config.service_url, api_key, None)?)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
