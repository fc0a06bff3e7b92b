pub mod client;
pub mod element;
pub mod error;
pub mod poc;
pub mod template;
pub mod ticket;

pub use element::Element;
pub use error::{Result, RwsError};
