use crate::element::{lines_of, numbered_lines, required_text, Element, CORE_NAMESPACE};
use crate::error::{Result, RwsError};
use regmate_core::domain::{Phone, Poc, PocKind};

/// Encodes a point of contact in the service's payload schema. Children
/// are emitted in the schema's fixed order; absent optional fields are
/// omitted entirely rather than sent as empty elements.
pub fn poc_to_element(poc: &Poc) -> Element {
    let mut element = Element::new("poc").attr("xmlns", CORE_NAMESPACE);

    if let Some(handle) = &poc.handle {
        element.push(Element::with_text("handle", handle.as_str()));
    }
    element.push(Element::with_text("contactType", poc.kind.as_str()));
    push_scalar(&mut element, "firstName", &poc.first_name);
    push_scalar(&mut element, "middleName", &poc.middle_name);
    push_scalar(&mut element, "lastName", &poc.last_name);
    push_scalar(&mut element, "companyName", &poc.company_name);
    if !poc.street_address.is_empty() {
        element.push(numbered_lines("streetAddress", &poc.street_address));
    }
    push_scalar(&mut element, "city", &poc.city);
    push_scalar(&mut element, "state", &poc.state);
    push_scalar(&mut element, "country", &poc.country);
    push_scalar(&mut element, "postalCode", &poc.postal_code);
    if !poc.emails.is_empty() {
        let mut emails = Element::new("emails");
        for email in &poc.emails {
            emails.push(Element::with_text("email", email.as_str()));
        }
        element.push(emails);
    }
    if !poc.phones.is_empty() {
        let mut phones = Element::new("phones");
        for (category, phone) in &poc.phones {
            let mut entry = Element::new("phone").attr("type", category.as_str());
            entry.push(Element::with_text("number", phone.number.as_str()));
            if let Some(extension) = &phone.extension {
                entry.push(Element::with_text("extension", extension.as_str()));
            }
            phones.push(entry);
        }
        element.push(phones);
    }
    if !poc.comments.is_empty() {
        element.push(numbered_lines("comment", &poc.comments));
    }

    element
}

/// Decodes a point of contact payload. Children are looked up by name,
/// never by position, and unknown siblings are skipped so new schema
/// elements do not break older clients.
pub fn element_to_poc(element: &Element) -> Result<Poc> {
    let kind = required_text(element, "poc", "contactType")?
        .parse::<PocKind>()
        .map_err(|err| RwsError::malformed("poc", err.to_string()))?;

    let mut poc = Poc {
        kind,
        ..Poc::default()
    };
    poc.handle = optional_scalar(element, "handle");
    poc.first_name = optional_scalar(element, "firstName");
    poc.middle_name = optional_scalar(element, "middleName");
    poc.last_name = optional_scalar(element, "lastName");
    poc.company_name = optional_scalar(element, "companyName");
    poc.street_address = lines_of(element.first("streetAddress"));
    poc.city = optional_scalar(element, "city");
    poc.state = optional_scalar(element, "state");
    poc.country = optional_scalar(element, "country");
    poc.postal_code = optional_scalar(element, "postalCode");
    if let Some(wrapper) = element.first("emails") {
        for email in wrapper.children_named("email") {
            poc.emails.push(email.text.clone().unwrap_or_default());
        }
    }
    if let Some(wrapper) = element.first("phones") {
        for entry in wrapper.children_named("phone") {
            let category = entry
                .attr_value("type")
                .ok_or_else(|| RwsError::malformed("poc", "phone entry missing type attribute"))?;
            let number = required_text(entry, "poc", "number")?;
            let extension = entry.child_text("extension").map(str::to_string);
            // Duplicate categories collapse to the last entry seen; the
            // mapping key is unique by construction.
            poc.phones
                .insert(category.to_string(), Phone { number, extension });
        }
    }
    poc.comments = lines_of(element.first("comment"));

    Ok(poc)
}

fn push_scalar(element: &mut Element, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        element.push(Element::with_text(name, value.as_str()));
    }
}

fn optional_scalar(element: &Element, name: &str) -> Option<String> {
    element.child_text(name).map(str::to_string)
}
