//! Diagnostics for icon references that do not resolve

use serde_json::json;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};

use crate::config::LintConfig;
use crate::icons::icon::IconCollection;
use crate::icons::variant::Variant;
use crate::lsp::token::{IconToken, find_tokens};

const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// Diagnostic code attached to unknown icon references
pub const UNKNOWN_ICON_CODE: &str = "unknown-icon";

/// Generate diagnostics for every token of `variant` in `content` whose name
/// is not in `collection`
pub fn generate_diagnostics(
    collection: &IconCollection,
    variant: Variant,
    lint: &LintConfig,
    content: &str,
) -> Vec<Diagnostic> {
    find_tokens(content, variant)
        .into_iter()
        .filter(|token| !lint.ignored_icons.iter().any(|ignored| *ignored == token.text))
        .filter(|token| collection.get(&token.name).is_none())
        .map(create_diagnostic)
        .collect()
}

fn create_diagnostic(token: IconToken) -> Diagnostic {
    Diagnostic {
        range: token.range,
        severity: Some(DiagnosticSeverity::INFORMATION),
        code: Some(NumberOrString::String(UNKNOWN_ICON_CODE.to_string())),
        message: format!("MDI: Icon mdi-{} not found", token.name),
        source: Some(PACKAGE_NAME.to_string()),
        data: Some(json!({ "name": token.name })),
        ..Default::default()
    }
}
