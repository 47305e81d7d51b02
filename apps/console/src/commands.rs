//! Line commands read from stdin and their effect on the toolbar.

use anyhow::Result;
use clap::{Parser, Subcommand};
use list_toolbar::{ListToolbar, Viewport};
use shared::domain::{FilterKind, SortDirection, SortKey, SortState, StatusFilter, TypeFilter};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct CommandLine {
    #[command(subcommand)]
    command: ToolbarCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ToolbarCommand {
    /// Choose which field the filter input edits.
    Kind { kind: FilterKind },
    AddName { token: String },
    RmName { token: String },
    AddNs { token: String },
    RmNs { token: String },
    /// Set the type filter; no value clears it.
    Type { value: Option<TypeFilter> },
    /// Set the status filter; no value clears it.
    Status { value: Option<StatusFilter> },
    Sort {
        key: SortKey,
        #[arg(default_value = "asc")]
        direction: SortDirection,
    },
    Unsort,
    /// Report the filtered item count.
    Count { total: usize },
    Clear,
    Resize { width: u32 },
    Create,
    Close,
    /// Finish the create wizard as if the item was created.
    Done,
    DeleteAll,
    PurgeAll,
    Show,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one input line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ToolbarCommand>, clap::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let parsed = CommandLine::try_parse_from(line.split_whitespace())?;
    Ok(Some(parsed.command))
}

pub async fn execute(
    toolbar: &mut ListToolbar,
    viewport: &Viewport,
    command: ToolbarCommand,
) -> Result<Flow> {
    let changed = match command {
        ToolbarCommand::Kind { kind } => toolbar.filters_mut().set_filter_kind(kind)?,
        ToolbarCommand::AddName { token } => toolbar.filters_mut().add_name_token(&token),
        ToolbarCommand::RmName { token } => toolbar.filters_mut().remove_name_token(&token),
        ToolbarCommand::AddNs { token } => toolbar.filters_mut().add_namespace_token(&token)?,
        ToolbarCommand::RmNs { token } => toolbar.filters_mut().remove_namespace_token(&token),
        ToolbarCommand::Type { value } => toolbar.filters_mut().set_type_filter(value)?,
        ToolbarCommand::Status { value } => toolbar.filters_mut().set_status_filter(value)?,
        ToolbarCommand::Sort { key, direction } => toolbar
            .filters_mut()
            .set_sort(Some(SortState::new(key, direction)))?,
        ToolbarCommand::Unsort => toolbar.filters_mut().set_sort(None)?,
        ToolbarCommand::Count { total } => toolbar.filters_mut().set_total_items(total),
        ToolbarCommand::Clear => toolbar.filters_mut().clear_all(),
        ToolbarCommand::Resize { width } => viewport.resize(width),
        ToolbarCommand::Create => toolbar.create(),
        ToolbarCommand::Close => toolbar.wizard_mut().close(),
        ToolbarCommand::Done => {
            let completed = toolbar.wizard_mut().complete();
            if toolbar.wizard_mut().take_refetch_request() {
                info!("console: item created; list refetch requested");
            }
            completed
        }
        ToolbarCommand::DeleteAll => {
            let dispatch = toolbar.delete_all().await?;
            info!(?dispatch, "console: delete-all");
            false
        }
        ToolbarCommand::PurgeAll => {
            let dispatch = toolbar.purge_all().await?;
            info!(?dispatch, "console: purge-all");
            false
        }
        ToolbarCommand::Show => false,
        ToolbarCommand::Quit => return Ok(Flow::Quit),
    };
    debug!(changed, "console: command applied");
    Ok(Flow::Continue)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
