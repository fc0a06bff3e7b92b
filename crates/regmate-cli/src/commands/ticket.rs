use crate::commands::{print_json, Context};
use crate::error::not_found;
use anyhow::Result;
use clap::{Args, Subcommand};
use regmate_core::domain::{Ticket, TicketMessage};
use regmate_rws::ticket::{element_to_ticket, ticket_messages};
use regmate_store::SUMMARY_SUFFIX;
use tracing::warn;

#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    /// List open tickets, caching each summary
    List(ListArgs),
    /// Fetch a ticket and cache its summary and messages
    Fetch(FetchArgs),
    /// Show a ticket summary
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {}

#[derive(Debug, Args)]
pub struct FetchArgs {
    pub ticket_no: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub ticket_no: String,
    /// Read from the local cache instead of the service
    #[arg(long)]
    pub cached: bool,
}

pub fn list(ctx: &Context<'_>, _args: ListArgs) -> Result<()> {
    let client = ctx.client()?;
    let mut tickets = Vec::new();
    for tree in client.get_ticket_summaries()? {
        let ticket = element_to_ticket(&tree)?;
        ctx.cache.put_ticket(&ticket, SUMMARY_SUFFIX)?;
        tickets.push(ticket);
    }

    if ctx.json {
        print_json(&tickets)?;
    } else if tickets.is_empty() {
        println!("no open tickets");
    } else {
        for ticket in &tickets {
            println!(
                "{}  {:<20} {}",
                ticket.ticket_no, ticket.ticket_status, ticket.ticket_type
            );
        }
    }
    Ok(())
}

pub fn fetch(ctx: &Context<'_>, args: FetchArgs) -> Result<()> {
    let client = ctx.client()?;
    let tree = client.get_ticket(&args.ticket_no)?;
    let ticket = element_to_ticket(&tree)?;
    ctx.cache.put_ticket(&ticket, SUMMARY_SUFFIX)?;

    let messages = ticket_messages(&tree)?;
    let mut cached = 0usize;
    for message in &messages {
        if message.id.is_some() {
            ctx.cache.put_ticket_message(&ticket.ticket_no, message)?;
            cached += 1;
        } else {
            warn!(ticket_no = %ticket.ticket_no, "skipping ticket message without id");
        }
    }

    if ctx.json {
        print_json(&ticket)?;
    } else {
        println!(
            "cached {} with {} message{}",
            ticket.ticket_no,
            cached,
            if cached == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let ticket = if args.cached {
        match ctx.cache.get_ticket(&args.ticket_no, SUMMARY_SUFFIX)? {
            Some(ticket) => ticket,
            None => {
                return Err(not_found(format!(
                    "ticket {} is not cached; run \"regmate ticket fetch {}\" first",
                    args.ticket_no, args.ticket_no
                )))
            }
        }
    } else {
        let client = ctx.client()?;
        element_to_ticket(&client.get_ticket(&args.ticket_no)?)?
    };

    if ctx.json {
        print_json(&ticket)?;
    } else {
        print_ticket(&ticket);
        for message in cached_messages(ctx, &ticket.ticket_no)? {
            print_message(&message);
        }
    }
    Ok(())
}

// Messages cached for this ticket by an earlier fetch.
fn cached_messages(ctx: &Context<'_>, ticket_no: &str) -> Result<Vec<TicketMessage>> {
    let mut messages = Vec::new();
    for id in ctx.cache.ticket_message_ids(ticket_no)? {
        if let Some(message) = ctx.cache.get_ticket_message(ticket_no, &id)? {
            messages.push(message);
        }
    }
    Ok(messages)
}

fn print_ticket(ticket: &Ticket) {
    println!("ticket {}", ticket.ticket_no);
    println!("  type:       {}", ticket.ticket_type);
    println!("  status:     {}", ticket.ticket_status);
    if let Some(resolution) = &ticket.ticket_resolution {
        println!("  resolution: {resolution}");
    }
    for (label, value) in [
        ("created", &ticket.created_date),
        ("updated", &ticket.updated_date),
        ("resolved", &ticket.resolved_date),
        ("closed", &ticket.closed_date),
    ] {
        if let Some(value) = value {
            println!("  {:<11}{value}", format!("{label}:"));
        }
    }
}

fn print_message(message: &TicketMessage) {
    println!();
    match (&message.id, &message.created_date) {
        (Some(id), Some(created)) => println!("message {id} ({created})"),
        (Some(id), None) => println!("message {id}"),
        _ => println!("message"),
    }
    if let Some(subject) = &message.subject {
        println!("  subject: {subject}");
    }
    for line in &message.text {
        println!("  | {line}");
    }
    for attachment in &message.attachments {
        println!("  attachment: {} ({})", attachment.file_name, attachment.id);
    }
}
