use crate::commands::{print_json, Context};
use crate::editor::edit_file;
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use regmate_core::domain::{Phone, Poc, PocKind};
use regmate_rws::poc::{element_to_poc, poc_to_element};
use regmate_rws::template::{poc_to_template, template_to_poc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const CREATE_TEMPLATE_FILE: &str = "create_poc.txt";
const MODIFY_TEMPLATE_FILE: &str = "modify_poc.txt";

#[derive(Debug, Subcommand)]
pub enum PocCommand {
    /// Fetch a point of contact and print it
    Show(ShowArgs),
    /// Write an editable template for an existing point of contact
    Template(TemplateArgs),
    /// Create a point of contact from an edited template
    Create(CreateArgs),
    /// Modify a point of contact through its template
    Modify(ModifyArgs),
    /// Delete a point of contact
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub handle: String,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    pub handle: String,
    /// Write the template here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Submit this template file as-is instead of opening an editor
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ModifyArgs {
    pub handle: String,
    /// Submit this template file as-is instead of fetching and editing
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub handle: String,
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let client = ctx.client()?;
    let tree = client.get_poc(&args.handle)?;
    let poc = element_to_poc(&tree)?;
    if ctx.json {
        print_json(&poc)?;
    } else {
        print_poc(&poc);
    }
    Ok(())
}

pub fn template(ctx: &Context<'_>, args: TemplateArgs) -> Result<()> {
    let client = ctx.client()?;
    let tree = client.get_poc(&args.handle)?;
    let poc = element_to_poc(&tree)?;
    let text = poc_to_template(&poc);
    match args.out {
        Some(path) => {
            fs::write(&path, &text).with_context(|| format!("write {}", path.display()))?;
            println!("{} saved to {}", args.handle, path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn create(ctx: &Context<'_>, args: CreateArgs) -> Result<()> {
    let (path, interactive) = match args.file {
        Some(path) => (path, false),
        None => {
            let path = ctx.cache.workspace().join(CREATE_TEMPLATE_FILE);
            // A leftover draft means an earlier submission failed; let
            // the operator keep editing it instead of starting over.
            if !path.exists() {
                fs::write(&path, poc_to_template(&draft_poc()))
                    .with_context(|| format!("write {}", path.display()))?;
            }
            (path, true)
        }
    };

    if interactive {
        let changed = edit_file(ctx.config.editor.as_deref(), &path)?;
        if !changed {
            println!("no changes made to {}; aborting", path.display());
            return Ok(());
        }
    }

    let mut poc = read_template(&path)?;
    poc.handle = None; // the registry assigns handles
    poc.validate_for_submit()?;

    let client = ctx.client()?;
    match client.create_poc(&poc_to_element(&poc)) {
        Ok(tree) => {
            let created = element_to_poc(&tree)?;
            if interactive {
                let _ = fs::remove_file(&path);
            }
            match &created.handle {
                Some(handle) => {
                    if ctx.json {
                        print_json(&created)?;
                    } else {
                        println!("new point of contact created with handle {handle}");
                        println!("use \"regmate poc modify {handle}\" to make changes");
                    }
                }
                None => println!("point of contact created, but the service returned no handle"),
            }
            Ok(())
        }
        Err(err) => {
            eprintln!(
                "edit {} and rerun \"regmate poc create{}\" to resubmit",
                path.display(),
                resubmit_flag(&path, interactive)
            );
            Err(err.into())
        }
    }
}

pub fn modify(ctx: &Context<'_>, args: ModifyArgs) -> Result<()> {
    let (path, interactive) = match args.file {
        Some(path) => (path, false),
        None => {
            let path = ctx.cache.workspace().join(MODIFY_TEMPLATE_FILE);
            let client = ctx.client()?;
            let tree = client.get_poc(&args.handle)?;
            let poc = element_to_poc(&tree)?;
            fs::write(&path, poc_to_template(&poc))
                .with_context(|| format!("write {}", path.display()))?;
            (path, true)
        }
    };

    if interactive {
        let changed = edit_file(ctx.config.editor.as_deref(), &path)?;
        if !changed {
            println!("no changes made to {}; aborting", path.display());
            return Ok(());
        }
    }

    let poc = read_template(&path)?;
    poc.validate_for_submit()?;
    let handle = poc
        .handle
        .clone()
        .ok_or_else(|| invalid_input("template has no Handle line; modifying needs one"))?;
    if handle != args.handle {
        return Err(invalid_input(format!(
            "template handle {handle} does not match {}",
            args.handle
        )));
    }

    let client = ctx.client()?;
    match client.modify_poc(&handle, &poc_to_element(&poc)) {
        Ok(_) => {
            if interactive {
                let _ = fs::remove_file(&path);
            }
            println!("{handle} has been modified");
            Ok(())
        }
        Err(err) => {
            eprintln!(
                "edit {} and rerun \"regmate poc modify {}{}\" to resubmit",
                path.display(),
                handle,
                resubmit_flag(&path, interactive)
            );
            Err(err.into())
        }
    }
}

pub fn delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let client = ctx.client()?;
    client.delete_poc(&args.handle)?;
    println!("{} deleted", args.handle);
    Ok(())
}

fn read_template(path: &Path) -> Result<Poc> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let parsed = template_to_poc(&text);
    for warning in &parsed.warnings {
        warn!("{}: {warning}", path.display());
    }
    Ok(parsed.poc)
}

fn resubmit_flag(path: &Path, interactive: bool) -> String {
    if interactive {
        String::new()
    } else {
        format!(" --file {}", path.display())
    }
}

fn print_poc(poc: &Poc) {
    println!(
        "{} ({})",
        poc.handle.as_deref().unwrap_or("<no handle>"),
        poc.kind
    );
    let name: Vec<&str> = [&poc.first_name, &poc.middle_name, &poc.last_name]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();
    if !name.is_empty() {
        println!("  name:    {}", name.join(" "));
    }
    if let Some(company) = &poc.company_name {
        println!("  company: {company}");
    }
    for line in &poc.street_address {
        println!("  street:  {line}");
    }
    for (label, value) in [
        ("city", &poc.city),
        ("state", &poc.state),
        ("country", &poc.country),
        ("postal", &poc.postal_code),
    ] {
        if let Some(value) = value {
            println!("  {:<9}{value}", format!("{label}:"));
        }
    }
    for email in &poc.emails {
        println!("  email:   {email}");
    }
    for (category, phone) in &poc.phones {
        match &phone.extension {
            Some(extension) => println!("  phone:   {category}: {} x{extension}", phone.number),
            None => println!("  phone:   {category}: {}", phone.number),
        }
    }
    for comment in &poc.comments {
        println!("  comment: {comment}");
    }
}

// Mirrors what a fresh draft looks like: every field carries an obvious
// placeholder the operator replaces in the editor. The codec passes
// placeholders through verbatim; the service rejects them if submitted.
fn draft_poc() -> Poc {
    let mut poc = Poc {
        kind: PocKind::Person,
        first_name: Some("PUT FIRST NAME HERE".to_string()),
        middle_name: Some("PUT MIDDLE NAME HERE".to_string()),
        last_name: Some("PUT LAST NAME HERE".to_string()),
        company_name: Some("PUT COMPANY NAME HERE".to_string()),
        street_address: vec![
            "FIRST STREET ADDRESS LINE HERE".to_string(),
            "SECOND STREET ADDRESS LINE HERE".to_string(),
        ],
        city: Some("PUT CITY HERE".to_string()),
        state: Some("PUT STATE, PROVINCE, OR REGION HERE".to_string()),
        country: Some("PUT COUNTRY HERE".to_string()),
        postal_code: Some("PUT POSTAL OR ZIP CODE HERE".to_string()),
        emails: vec!["YOUR_EMAIL_ADDRESS_HERE@EXAMPLE.NET".to_string()],
        comments: vec!["PUT FIRST LINE OF COMMENTS HERE".to_string()],
        ..Poc::default()
    };
    poc.phones.insert(
        "office".to_string(),
        Phone {
            number: "1-XXX-XXX-XXXX".to_string(),
            extension: Some("123".to_string()),
        },
    );
    poc
}

#[cfg(test)]
mod tests {
    use super::draft_poc;
    use regmate_rws::template::{poc_to_template, template_to_poc};

    #[test]
    fn draft_template_parses_back_cleanly() {
        let parsed = template_to_poc(&poc_to_template(&draft_poc()));
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.poc, draft_poc());
    }
}
