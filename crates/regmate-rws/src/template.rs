use regmate_core::domain::{Phone, Poc, PocKind};

/// Result of parsing an edited template. Warnings are the lines that
/// were skipped; parsing itself never fails, so an operator can always
/// re-open the file and fix it up.
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    pub poc: Poc,
    pub warnings: Vec<String>,
}

const HEADER: &str = "\
# Point of contact record. Lines starting with '#' are ignored.
# Repeat Street Address, Email, Phone, and Comment lines as needed;
# delete a line entirely to leave that field unset.
# Phone lines take the form \"Phone: <category>: <number> x<extension>\".
";

/// Renders a point of contact as a flat, editor-friendly template. One
/// label per scalar field; sequence fields repeat their label once per
/// entry.
pub fn poc_to_template(poc: &Poc) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    if let Some(handle) = &poc.handle {
        push_line(&mut out, "Handle", handle);
    }
    push_line(&mut out, "Type", poc.kind.as_str());
    push_scalar(&mut out, "First Name", &poc.first_name);
    push_scalar(&mut out, "Middle Name", &poc.middle_name);
    push_scalar(&mut out, "Last Name", &poc.last_name);
    push_scalar(&mut out, "Company Name", &poc.company_name);
    for line in &poc.street_address {
        push_line(&mut out, "Street Address", line);
    }
    push_scalar(&mut out, "City", &poc.city);
    push_scalar(&mut out, "State", &poc.state);
    push_scalar(&mut out, "Country", &poc.country);
    push_scalar(&mut out, "Postal Code", &poc.postal_code);
    for email in &poc.emails {
        push_line(&mut out, "Email", email);
    }
    for (category, phone) in &poc.phones {
        out.push_str("Phone: ");
        out.push_str(category);
        out.push_str(": ");
        out.push_str(&phone.number);
        if let Some(extension) = &phone.extension {
            out.push_str(" x");
            out.push_str(extension);
        }
        out.push('\n');
    }
    for comment in &poc.comments {
        push_line(&mut out, "Comment", comment);
    }

    out
}

/// Parses an edited template back into a point of contact. Tolerant by
/// design: blank and comment lines are skipped silently, anything else
/// that does not parse is skipped with a warning, labels match
/// case-insensitively, and every field is optional. Placeholder values
/// pass through verbatim; spotting them is the caller's concern.
pub fn template_to_poc(text: &str) -> ParsedTemplate {
    let mut poc = Poc::default();
    let mut warnings = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((label, value)) = line.split_once(':') else {
            warnings.push(format!("line {}: no label, skipped", index + 1));
            continue;
        };
        let label = normalize_label(label);
        let value = value.trim();

        match label.as_str() {
            "handle" => poc.handle = Some(value.to_string()),
            "type" => match value.to_ascii_uppercase().parse::<PocKind>() {
                Ok(kind) => poc.kind = kind,
                Err(_) => warnings.push(format!(
                    "line {}: unknown contact type {value:?}, skipped",
                    index + 1
                )),
            },
            "first name" => poc.first_name = Some(value.to_string()),
            "middle name" => poc.middle_name = Some(value.to_string()),
            "last name" => poc.last_name = Some(value.to_string()),
            "company name" => poc.company_name = Some(value.to_string()),
            "street address" => poc.street_address.push(value.to_string()),
            "city" => poc.city = Some(value.to_string()),
            "state" => poc.state = Some(value.to_string()),
            "country" => poc.country = Some(value.to_string()),
            "postal code" => poc.postal_code = Some(value.to_string()),
            "email" => poc.emails.push(value.to_string()),
            "comment" => poc.comments.push(value.to_string()),
            "phone" => match parse_phone_line(value) {
                Some((category, phone)) => {
                    poc.phones.insert(category, phone);
                }
                None => warnings.push(format!(
                    "line {}: unparseable phone entry, skipped",
                    index + 1
                )),
            },
            _ => warnings.push(format!(
                "line {}: unrecognized label {label:?}, skipped",
                index + 1
            )),
        }
    }

    ParsedTemplate { poc, warnings }
}

fn push_line(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

fn push_scalar(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        push_line(out, label, value);
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

fn parse_phone_line(value: &str) -> Option<(String, Phone)> {
    let (category, rest) = value.split_once(':')?;
    let category = category.trim();
    let rest = rest.trim();
    if category.is_empty() || rest.is_empty() {
        return None;
    }

    let (number, extension) = match rest.rsplit_once(' ') {
        Some((number, last)) if is_extension(last) => {
            (number.trim_end(), Some(last[1..].to_string()))
        }
        _ => (rest, None),
    };
    if number.is_empty() {
        return None;
    }

    Some((
        category.to_string(),
        Phone {
            number: number.to_string(),
            extension,
        },
    ))
}

// An extension token is "x" followed by digits; anything else stays part
// of the number.
fn is_extension(token: &str) -> bool {
    let mut chars = token.chars();
    if !matches!(chars.next(), Some('x') | Some('X')) {
        return false;
    }
    let rest = chars.as_str();
    !rest.is_empty() && rest.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{poc_to_template, template_to_poc};
    use regmate_core::domain::{Phone, Poc, PocKind};

    fn full_poc() -> Poc {
        let mut poc = Poc {
            handle: Some("KIT-ARIN".to_string()),
            kind: PocKind::Person,
            first_name: Some("Kit".to_string()),
            middle_name: Some("A".to_string()),
            last_name: Some("Walker".to_string()),
            company_name: Some("Example Networks".to_string()),
            street_address: vec!["123 Main St".to_string(), "Suite 4".to_string()],
            city: Some("Chantilly".to_string()),
            state: Some("VA".to_string()),
            country: Some("US".to_string()),
            postal_code: Some("20151".to_string()),
            emails: vec!["kit@example.net".to_string(), "noc@example.net".to_string()],
            comments: vec!["prefers email".to_string()],
            ..Poc::default()
        };
        poc.phones.insert(
            "office".to_string(),
            Phone {
                number: "1-703-555-0100".to_string(),
                extension: Some("123".to_string()),
            },
        );
        poc.phones.insert(
            "mobile".to_string(),
            Phone {
                number: "1-703-555-0199".to_string(),
                extension: None,
            },
        );
        poc
    }

    #[test]
    fn round_trip_full_record() {
        let poc = full_poc();
        let parsed = template_to_poc(&poc_to_template(&poc));
        assert_eq!(parsed.poc, poc);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn round_trip_with_no_contact_methods() {
        let poc = Poc {
            kind: PocKind::Role,
            company_name: Some("Example Networks".to_string()),
            street_address: vec!["123 Main St".to_string()],
            city: Some("Chantilly".to_string()),
            ..Poc::default()
        };
        let parsed = template_to_poc(&poc_to_template(&poc));
        assert_eq!(parsed.poc, poc);
        assert!(parsed.poc.emails.is_empty());
        assert!(parsed.poc.phones.is_empty());
    }

    #[test]
    fn labels_match_case_insensitively() {
        let parsed = template_to_poc("FIRST NAME: Kit\nlast   name: Walker\ntype: role\n");
        assert_eq!(parsed.poc.first_name.as_deref(), Some("Kit"));
        assert_eq!(parsed.poc.last_name.as_deref(), Some("Walker"));
        assert_eq!(parsed.poc.kind, PocKind::Role);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn unrecognized_lines_warn_and_parsing_continues() {
        let text = "City: Chantilly\nFavorite Color: blue\nnot a labelled line\nState: VA\n";
        let parsed = template_to_poc(text);
        assert_eq!(parsed.poc.city.as_deref(), Some("Chantilly"));
        assert_eq!(parsed.poc.state.as_deref(), Some("VA"));
        assert_eq!(parsed.warnings.len(), 2);
    }

    #[test]
    fn placeholder_values_pass_through_verbatim() {
        let parsed = template_to_poc("First Name: PUT FIRST NAME HERE\n");
        assert_eq!(
            parsed.poc.first_name.as_deref(),
            Some("PUT FIRST NAME HERE")
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn phone_lines_parse_category_number_and_extension() {
        let parsed = template_to_poc(
            "Phone: office: 1-703-555-0100 x123\nPhone: mobile: 1-703-555-0199\nPhone: broken\n",
        );
        assert_eq!(parsed.poc.phones.len(), 2);
        assert_eq!(parsed.poc.phones["office"].number, "1-703-555-0100");
        assert_eq!(parsed.poc.phones["office"].extension.as_deref(), Some("123"));
        assert_eq!(parsed.poc.phones["mobile"].extension, None);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped_silently() {
        let parsed = template_to_poc("\n# a note\n\nCity: Chantilly\n");
        assert_eq!(parsed.poc.city.as_deref(), Some("Chantilly"));
        assert!(parsed.warnings.is_empty());
    }
}
