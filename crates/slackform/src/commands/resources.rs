//! `resources`: registered types and their field schemas.

use serde::Serialize;
use tabled::Tabled;

use slackform_core::{FieldSchema, Schema, registry};

use crate::cli::{GlobalOpts, ResourcesArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ResourceEntry {
    name: String,
    #[serde(flatten)]
    schema: Schema,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    name: String,
    #[tabled(rename = "Fields")]
    fields: String,
    #[tabled(rename = "Replace on change")]
    force_new: String,
    #[tabled(rename = "Deprecated")]
    deprecated: String,
}

impl From<&ResourceEntry> for ResourceRow {
    fn from(entry: &ResourceEntry) -> Self {
        let force_new: Vec<_> = entry.schema.force_new_fields().collect();
        Self {
            name: entry.name.clone(),
            fields: entry
                .schema
                .fields
                .iter()
                .map(|f| f.name)
                .collect::<Vec<_>>()
                .join(", "),
            force_new: if force_new.is_empty() {
                "-".into()
            } else {
                force_new.join(", ")
            },
            deprecated: if entry.schema.deprecation_message.is_some() {
                "yes".into()
            } else {
                String::new()
            },
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: &'static str,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Presence")]
    presence: String,
    #[tabled(rename = "Replace")]
    force_new: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl From<&FieldSchema> for FieldRow {
    fn from(f: &FieldSchema) -> Self {
        Self {
            name: f.name,
            kind: f.kind.to_string(),
            presence: f.presence.to_string(),
            force_new: if f.force_new { "yes".into() } else { String::new() },
            description: f.description,
        }
    }
}

pub fn handle(args: &ResourcesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = if let Some(ref name) = args.name {
        let resource = registry::lookup(name)?;
        let schema = resource.schema();
        if let Some(message) = schema.deprecation_message {
            if !global.quiet {
                eprintln!("{name} is deprecated: {message}");
            }
        }
        output::render_list(
            &global.output,
            &schema.fields,
            |f| FieldRow::from(f),
            |f| f.name.to_owned(),
        )?
    } else {
        let entries: Vec<ResourceEntry> = registry::all()
            .iter()
            .map(|r| ResourceEntry {
                name: r.kind().to_string(),
                schema: r.schema(),
            })
            .collect();
        output::render_list(
            &global.output,
            &entries,
            |e| ResourceRow::from(e),
            |e| e.name.clone(),
        )?
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
