use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumerations that travel on the wire as fixed uppercase labels. The
/// registry grows new labels over time, so each enum keeps an `Other`
/// variant carrying the raw value: an unknown label survives
/// decode-then-encode unchanged instead of failing the record.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw,
                }
            }

            pub fn parse(value: &str) -> Self {
                match value {
                    $($label => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

wire_enum!(TicketType {
    Question => "QUESTION",
    AsnRequest => "ASN_REQUEST",
    OrgCreate => "ORG_CREATE",
    NetDeleteRequest => "NET_DELETE_REQUEST",
    PocRecovery => "POC_RECOVERY",
});

wire_enum!(TicketStatus {
    PendingConfirmation => "PENDING_CONFIRMATION",
    PendingReview => "PENDING_REVIEW",
    Assigned => "ASSIGNED",
    InProgress => "IN_PROGRESS",
    Approved => "APPROVED",
    Resolved => "RESOLVED",
    Closed => "CLOSED",
});

wire_enum!(TicketResolution {
    Accepted => "ACCEPTED",
    Denied => "DENIED",
    Abandoned => "ABANDONED",
    Answered => "ANSWERED",
    Processed => "PROCESSED",
    Duplicate => "DUPLICATE",
    Withdrawn => "WITHDRAWN",
});

wire_enum!(MessageCategory {
    None => "NONE",
    Justification => "JUSTIFICATION",
});

/// A support ticket as reported by the registry. Timestamps are kept as
/// the opaque strings the service sent; this layer never does date
/// arithmetic on them and never mutates a decoded ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_no: String,
    pub created_date: Option<String>,
    pub resolved_date: Option<String>,
    pub closed_date: Option<String>,
    pub updated_date: Option<String>,
    pub ticket_type: TicketType,
    pub ticket_status: TicketStatus,
    pub ticket_resolution: Option<TicketResolution>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub category: Option<MessageCategory>,
    pub created_date: Option<String>,
    pub text: Vec<String>,
    pub attachments: Vec<Attachment>,
}

/// A reference to an uploaded file. The payload itself is fetched out of
/// band; without both the id and the name the reference is unusable, so
/// both are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
}
