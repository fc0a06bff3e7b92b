pub mod error;
pub mod paths;

use crate::error::{Result, StoreError};
use crate::paths::{decode_component, encode_component};
use regmate_core::domain::{Ticket, TicketMessage};
use regmate_rws::element::Element;
use regmate_rws::ticket::{
    element_to_ticket, element_to_ticket_message, ticket_message_to_element, ticket_to_element,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Kind suffix for a ticket's summary entry.
pub const SUMMARY_SUFFIX: &str = "summary";

/// File-backed cache of fetched ticket records, one wire-format XML file
/// per `(identifier, kind)` pair under the workspace directory. Writes
/// replace the file wholesale; the last write wins. Single-process use
/// is assumed and there is no locking.
pub struct TicketCache {
    workspace: PathBuf,
}

impl TicketCache {
    /// Wraps a workspace directory that is known to exist. The directory
    /// is always passed in; nothing here reads ambient process state.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    /// Creates the workspace directory if needed and wraps it.
    pub fn open(workspace: impl Into<PathBuf>) -> Result<Self> {
        let cache = Self::new(workspace);
        fs::create_dir_all(&cache.workspace)?;
        Ok(cache)
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn put(&self, identifier: &str, kind: &str, tree: &Element) -> Result<()> {
        let path = self.entry_path(identifier, kind);
        write_whole(&path, tree.to_xml().as_bytes())?;
        debug!(identifier, kind, path = %path.display(), "cache write");
        Ok(())
    }

    /// Reads an entry back. A missing file is a normal state and comes
    /// back as `None`; only real IO or decode trouble is an error.
    pub fn get(&self, identifier: &str, kind: &str) -> Result<Option<Element>> {
        let path = self.entry_path(identifier, kind);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(Element::parse(&text)?))
    }

    pub fn put_ticket(&self, ticket: &Ticket, kind: &str) -> Result<()> {
        self.put(&ticket.ticket_no, kind, &ticket_to_element(ticket))
    }

    pub fn get_ticket(&self, ticket_no: &str, kind: &str) -> Result<Option<Ticket>> {
        match self.get(ticket_no, kind)? {
            Some(tree) => Ok(Some(element_to_ticket(&tree)?)),
            None => Ok(None),
        }
    }

    pub fn put_ticket_message(&self, ticket_no: &str, message: &TicketMessage) -> Result<()> {
        let id = message.id.as_deref().ok_or(StoreError::MissingMessageId)?;
        self.put(
            ticket_no,
            &message_suffix(id),
            &ticket_message_to_element(message),
        )
    }

    pub fn get_ticket_message(
        &self,
        ticket_no: &str,
        message_id: &str,
    ) -> Result<Option<TicketMessage>> {
        match self.get(ticket_no, &message_suffix(message_id))? {
            Some(tree) => Ok(Some(element_to_ticket_message(&tree)?)),
            None => Ok(None),
        }
    }

    /// Ids of the messages cached for a ticket, in ascending numeric
    /// order (ids the service assigned non-numerically sort last,
    /// lexically). Derived from the directory contents; there is no
    /// index file to maintain.
    pub fn ticket_message_ids(&self, ticket_no: &str) -> Result<Vec<String>> {
        let prefix = format!(
            "{}-{}",
            encode_component(ticket_no),
            encode_component("message-")
        );
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.workspace)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(encoded) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".xml"))
            else {
                continue;
            };
            if let Some(id) = decode_component(encoded) {
                ids.push(id);
            }
        }
        ids.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });
        Ok(ids)
    }

    fn entry_path(&self, identifier: &str, kind: &str) -> PathBuf {
        self.workspace.join(format!(
            "{}-{}.xml",
            encode_component(identifier),
            encode_component(kind)
        ))
    }
}

/// Kind suffix for one message of a ticket, distinct per message id so a
/// summary and all messages coexist under the same ticket number.
pub fn message_suffix(message_id: &str) -> String {
    format!("message-{message_id}")
}

// Entries are written to a sibling temp file first and renamed into
// place, so a reader never sees a truncated entry.
fn write_whole(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("xml.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
