//! Code actions for unknown icon diagnostics

use serde_json::Value;
use tower_lsp::lsp_types::{CodeActionOrCommand, Command, Diagnostic, NumberOrString};

use crate::lsp::backend::SEARCH_COMMAND;
use crate::lsp::diagnostics::UNKNOWN_ICON_CODE;

pub const SEARCH_ACTION_TITLE: &str = "Search icon";

/// One "Search icon" command per unknown icon diagnostic in `diagnostics`
pub fn search_code_actions(diagnostics: &[Diagnostic]) -> Vec<CodeActionOrCommand> {
    diagnostics
        .iter()
        .filter(|d| {
            matches!(&d.code, Some(NumberOrString::String(code)) if code == UNKNOWN_ICON_CODE)
        })
        .filter_map(unknown_icon_name)
        .map(|name| {
            CodeActionOrCommand::Command(Command {
                title: SEARCH_ACTION_TITLE.to_string(),
                command: SEARCH_COMMAND.to_string(),
                arguments: Some(vec![Value::String(name)]),
            })
        })
        .collect()
}

/// Icon name from the diagnostic's data, or from its message when the
/// client did not send the data back
fn unknown_icon_name(diagnostic: &Diagnostic) -> Option<String> {
    let from_data = diagnostic
        .data
        .as_ref()
        .and_then(|data| data.get("name"))
        .and_then(Value::as_str);

    from_data
        .or_else(|| {
            diagnostic
                .message
                .strip_prefix("MDI: Icon mdi-")?
                .strip_suffix(" not found")
        })
        .map(str::to_string)
}
