//! Lifecycle handler shared by the four resource commands.

use std::collections::BTreeMap;

use serde_json::Value;

use slackform_core::{Context, Operation, Provider, ResourceData, ResourceKind, registry};

use crate::cli::{GlobalOpts, OperationArg, StateArgs};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

impl From<OperationArg> for Operation {
    fn from(op: OperationArg) -> Self {
        match op {
            OperationArg::Create => Operation::Create,
            OperationArg::Read => Operation::Read,
            OperationArg::Update => Operation::Update,
            OperationArg::Delete => Operation::Delete,
            OperationArg::Import => Operation::Import,
        }
    }
}

/// One lifecycle step against one resource instance.
pub struct Run {
    kind: ResourceKind,
    operation: Operation,
    state: StateArgs,
}

impl Run {
    pub fn new(kind: ResourceKind, operation: OperationArg, state: StateArgs) -> Self {
        Self {
            kind,
            operation: operation.into(),
            state,
        }
    }

    /// Assemble declared state: file first, then flags, then `--id`.
    fn declared(&self, flags: BTreeMap<String, Value>) -> Result<ResourceData, CliError> {
        let mut data = ResourceData::new();

        if let Some(ref path) = self.state.from_file {
            let (id, fields) = util::split_state("from-file", util::read_json_file(path)?)?;
            if let Some(id) = id {
                data.set_id(id);
            }
            data.fields = fields;
        }

        data.fields.extend(flags);

        if let Some(ref id) = self.state.id {
            data.set_id(id.clone());
        }

        if let Some(ref path) = self.state.prior_file {
            let (_, prior) = util::split_state("prior-file", util::read_json_file(path)?)?;
            data = data.with_prior(prior);
        }

        if matches!(self.operation, Operation::Import) && !data.exists() {
            return Err(CliError::Validation {
                field: "id".into(),
                reason: format!("{} import needs --id", self.kind),
            });
        }

        Ok(data)
    }

    pub async fn execute(
        self,
        provider: &Provider,
        ctx: &Context,
        flags: BTreeMap<String, Value>,
        global: &GlobalOpts,
    ) -> Result<(), CliError> {
        let mut data = self.declared(flags)?;

        let schema = registry::get(self.kind).schema();
        if let (Some(message), Operation::Create) = (schema.deprecation_message, self.operation) {
            tracing::warn!("{}: {message}", self.kind);
        }

        registry::invoke(provider, ctx, self.kind, self.operation, &mut data).await?;

        if !data.exists() && !global.quiet {
            eprintln!("{} {}: no remote object", self.kind, self.operation);
        }

        let color = output::should_color(&global.color);
        let out = output::render_single(
            &global.output,
            &data,
            |d| output::detail_table(d.id(), &d.fields, color),
            |d| d.id().to_owned(),
        )?;
        output::print_output(&out, global.quiet);
        Ok(())
    }
}
