use crate::element::{lines_of, numbered_lines, required_text, Element, CORE_NAMESPACE};
use crate::error::Result;
use regmate_core::domain::{
    Attachment, MessageCategory, Ticket, TicketMessage, TicketResolution, TicketStatus, TicketType,
};

pub fn ticket_to_element(ticket: &Ticket) -> Element {
    let mut element = Element::new("ticket").attr("xmlns", CORE_NAMESPACE);

    element.push(Element::with_text("ticketNo", ticket.ticket_no.as_str()));
    push_scalar(&mut element, "createdDate", &ticket.created_date);
    push_scalar(&mut element, "resolvedDate", &ticket.resolved_date);
    push_scalar(&mut element, "closedDate", &ticket.closed_date);
    push_scalar(&mut element, "updatedDate", &ticket.updated_date);
    element.push(Element::with_text(
        "webTicketType",
        ticket.ticket_type.as_str(),
    ));
    element.push(Element::with_text(
        "webTicketStatus",
        ticket.ticket_status.as_str(),
    ));
    if let Some(resolution) = &ticket.ticket_resolution {
        element.push(Element::with_text("webTicketResolution", resolution.as_str()));
    }

    element
}

pub fn element_to_ticket(element: &Element) -> Result<Ticket> {
    Ok(Ticket {
        ticket_no: required_text(element, "ticket", "ticketNo")?,
        created_date: optional_scalar(element, "createdDate"),
        resolved_date: optional_scalar(element, "resolvedDate"),
        closed_date: optional_scalar(element, "closedDate"),
        updated_date: optional_scalar(element, "updatedDate"),
        ticket_type: TicketType::parse(&required_text(element, "ticket", "webTicketType")?),
        ticket_status: TicketStatus::parse(&required_text(element, "ticket", "webTicketStatus")?),
        ticket_resolution: element
            .child_text("webTicketResolution")
            .map(TicketResolution::parse),
    })
}

pub fn ticket_message_to_element(message: &TicketMessage) -> Element {
    let mut element = Element::new("message").attr("xmlns", CORE_NAMESPACE);

    push_scalar(&mut element, "messageId", &message.id);
    push_scalar(&mut element, "subject", &message.subject);
    if let Some(category) = &message.category {
        element.push(Element::with_text("category", category.as_str()));
    }
    push_scalar(&mut element, "createdDate", &message.created_date);
    if !message.text.is_empty() {
        element.push(numbered_lines("text", &message.text));
    }
    if !message.attachments.is_empty() {
        let mut attachments = Element::new("attachments");
        for attachment in &message.attachments {
            attachments.push(attachment_to_element(attachment));
        }
        element.push(attachments);
    }

    element
}

pub fn element_to_ticket_message(element: &Element) -> Result<TicketMessage> {
    let mut message = TicketMessage {
        id: optional_scalar(element, "messageId"),
        subject: optional_scalar(element, "subject"),
        category: element.child_text("category").map(MessageCategory::parse),
        created_date: optional_scalar(element, "createdDate"),
        text: lines_of(element.first("text")),
        attachments: Vec::new(),
    };
    if let Some(wrapper) = element.first("attachments") {
        for entry in wrapper.children_named("attachment") {
            message.attachments.push(element_to_attachment(entry)?);
        }
    }
    Ok(message)
}

pub fn attachment_to_element(attachment: &Attachment) -> Element {
    Element::new("attachment")
        .child(Element::with_text("id", attachment.id.as_str()))
        .child(Element::with_text(
            "filename",
            attachment.file_name.as_str(),
        ))
}

/// An attachment reference is only usable with both its id and its file
/// name; a partial one is a malformed record, not a partial success.
pub fn element_to_attachment(element: &Element) -> Result<Attachment> {
    Ok(Attachment {
        id: required_text(element, "attachment", "id")?,
        file_name: required_text(element, "attachment", "filename")?,
    })
}

/// Messages riding inside a fetched ticket payload, in document order.
/// A ticket without a `messages` wrapper simply has none.
pub fn ticket_messages(element: &Element) -> Result<Vec<TicketMessage>> {
    let mut messages = Vec::new();
    if let Some(wrapper) = element.first("messages") {
        for entry in wrapper.children_named("message") {
            messages.push(element_to_ticket_message(entry)?);
        }
    }
    Ok(messages)
}

fn push_scalar(element: &mut Element, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        element.push(Element::with_text(name, value.as_str()));
    }
}

fn optional_scalar(element: &Element, name: &str) -> Option<String> {
    element.child_text(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{
        element_to_ticket, element_to_ticket_message, ticket_message_to_element, ticket_messages,
        ticket_to_element,
    };
    use crate::element::Element;
    use crate::error::RwsError;
    use regmate_core::domain::{
        Attachment, MessageCategory, Ticket, TicketMessage, TicketResolution, TicketStatus,
        TicketType,
    };

    fn summary_fixture() -> Element {
        Element::new("ticket")
            .attr("xmlns", crate::element::CORE_NAMESPACE)
            .child(Element::with_text("ticketNo", "20121012-X1"))
            .child(Element::with_text(
                "createdDate",
                "2012-10-12T11:39:36.724-04:00",
            ))
            .child(Element::with_text(
                "updatedDate",
                "2012-10-12T11:39:36.724-04:00",
            ))
            .child(Element::with_text("webTicketType", "QUESTION"))
            .child(Element::with_text("webTicketStatus", "PENDING_REVIEW"))
    }

    fn message_fixture() -> Element {
        Element::new("message")
            .child(Element::with_text("messageId", "4"))
            .child(Element::with_text("category", "NONE"))
            .child(Element::with_text(
                "createdDate",
                "2012-10-12T11:48:50.281-04:00",
            ))
            .child(
                Element::new("text")
                    .child(Element::with_text("line", "please get back to me").attr("number", "1"))
                    .child(Element::with_text("line", "you bone heads").attr("number", "2")),
            )
            .child(
                Element::new("attachments").child(
                    Element::new("attachment")
                        .child(Element::with_text("id", "8a8180b13a5597b1013a55a9d42f0007"))
                        .child(Element::with_text("filename", "oracle-driver-license.txt")),
                ),
            )
    }

    #[test]
    fn decode_ticket_summary_fixture() {
        let ticket = element_to_ticket(&summary_fixture()).expect("decode");
        assert_eq!(ticket.ticket_no, "20121012-X1");
        assert_eq!(
            ticket.created_date.as_deref(),
            Some("2012-10-12T11:39:36.724-04:00")
        );
        assert_eq!(
            ticket.updated_date.as_deref(),
            Some("2012-10-12T11:39:36.724-04:00")
        );
        assert_eq!(ticket.ticket_status, TicketStatus::PendingReview);
        assert_eq!(ticket.ticket_type, TicketType::Question);
        assert_eq!(ticket.ticket_resolution, None);

        let again = element_to_ticket(&ticket_to_element(&ticket)).expect("re-decode");
        assert_eq!(again, ticket);
    }

    #[test]
    fn decode_message_fixture_and_round_trip() {
        let message = element_to_ticket_message(&message_fixture()).expect("decode");
        assert_eq!(message.id.as_deref(), Some("4"));
        assert_eq!(message.category, Some(MessageCategory::None));
        assert_eq!(
            message.created_date.as_deref(),
            Some("2012-10-12T11:48:50.281-04:00")
        );
        assert_eq!(
            message.text,
            vec!["please get back to me".to_string(), "you bone heads".to_string()]
        );
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(
            message.attachments[0].file_name,
            "oracle-driver-license.txt"
        );
        assert_eq!(
            message.attachments[0].id,
            "8a8180b13a5597b1013a55a9d42f0007"
        );

        let again =
            element_to_ticket_message(&ticket_message_to_element(&message)).expect("re-decode");
        assert_eq!(again, message);
    }

    #[test]
    fn round_trip_full_ticket() {
        let ticket = Ticket {
            ticket_no: "XB85".to_string(),
            created_date: Some("July 18, 2011".to_string()),
            resolved_date: Some("July 19, 2011".to_string()),
            closed_date: Some("July 20, 2011".to_string()),
            updated_date: Some("July 21, 2011".to_string()),
            ticket_type: TicketType::Question,
            ticket_status: TicketStatus::Approved,
            ticket_resolution: Some(TicketResolution::Denied),
        };
        let decoded = element_to_ticket(&ticket_to_element(&ticket)).expect("decode");
        assert_eq!(decoded, ticket);
    }

    #[test]
    fn decode_tolerates_missing_optionals_and_unknown_children() {
        let tree = Element::new("ticket")
            .child(Element::with_text("ticketNo", "XB85"))
            .child(Element::with_text("webTicketType", "QUESTION"))
            .child(Element::with_text("webTicketStatus", "CLOSED"))
            .child(Element::with_text("orgHandle", "EXAMP"));
        let ticket = element_to_ticket(&tree).expect("decode");
        assert_eq!(ticket.created_date, None);
        assert_eq!(ticket.resolved_date, None);
        assert_eq!(ticket.closed_date, None);
        assert_eq!(ticket.updated_date, None);
        assert_eq!(ticket.ticket_resolution, None);
    }

    #[test]
    fn unknown_status_survives_round_trip() {
        let tree = Element::new("ticket")
            .child(Element::with_text("ticketNo", "XB85"))
            .child(Element::with_text("webTicketType", "QUESTION"))
            .child(Element::with_text("webTicketStatus", "WAIT_LIST"));
        let ticket = element_to_ticket(&tree).expect("decode");
        assert_eq!(
            ticket.ticket_status,
            TicketStatus::Other("WAIT_LIST".to_string())
        );
        let again = element_to_ticket(&ticket_to_element(&ticket)).expect("re-decode");
        assert_eq!(again.ticket_status, ticket.ticket_status);
    }

    #[test]
    fn attachment_without_filename_is_malformed() {
        let tree = Element::new("message").child(
            Element::new("attachments").child(
                Element::new("attachment").child(Element::with_text("id", "8a8180b1")),
            ),
        );
        let err = element_to_ticket_message(&tree).expect_err("must fail");
        assert!(matches!(err, RwsError::Malformed { record: "attachment", .. }));
    }

    #[test]
    fn message_round_trip_with_empty_collections() {
        let message = TicketMessage {
            id: Some("9".to_string()),
            subject: Some("Re: question".to_string()),
            category: Some(MessageCategory::Justification),
            created_date: None,
            text: Vec::new(),
            attachments: Vec::new(),
        };
        let again =
            element_to_ticket_message(&ticket_message_to_element(&message)).expect("decode");
        assert_eq!(again, message);
    }

    #[test]
    fn messages_extracted_from_ticket_payload_in_order() {
        let tree = summary_fixture().child(
            Element::new("messages")
                .child(message_fixture())
                .child(
                    Element::new("message")
                        .child(Element::with_text("messageId", "5"))
                        .child(
                            Element::new("text")
                                .child(Element::with_text("line", "any update?").attr("number", "1")),
                        ),
                ),
        );
        let messages = ticket_messages(&tree).expect("messages");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id.as_deref(), Some("4"));
        assert_eq!(messages[1].id.as_deref(), Some("5"));

        let attachment = Attachment {
            id: "8a8180b13a5597b1013a55a9d42f0007".to_string(),
            file_name: "oracle-driver-license.txt".to_string(),
        };
        assert_eq!(messages[0].attachments, vec![attachment]);
    }
}
