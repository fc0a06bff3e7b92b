pub mod poc;
pub mod ticket;

pub use poc::{Phone, Poc, PocKind};
pub use ticket::{
    Attachment, MessageCategory, Ticket, TicketMessage, TicketResolution, TicketStatus, TicketType,
};
