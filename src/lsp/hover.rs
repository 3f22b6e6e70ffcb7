//! Hover content for icon references

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use crate::icons::icon::Icon;
use crate::icons::variant::Variant;
use crate::lsp::token::IconToken;

const DOCS_URL: &str = "https://materialdesignicons.com/icon";

/// Hover for `token`; `icon` is `None` when the name did not resolve
pub fn create_hover(token: &IconToken, icon: Option<&Icon>, variant: Variant) -> Hover {
    let value = match icon {
        Some(icon) => icon_markdown(icon, variant),
        None => format!("no preview available for mdi-{}", token.name),
    };

    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(token.range),
    }
}

/// Markdown description of an icon, shared by hover and completion
pub fn icon_markdown(icon: &Icon, variant: Variant) -> String {
    format!(
        "**{prefix}-{name}**\n\n\
         {tags}\n\n\
         - aliases: {aliases}\n\
         - codepoint: {codepoint}\n\
         - author: {author}\n\
         - version: {version}\n\
         - [docs]({DOCS_URL}/{name})",
        prefix = variant.prefix(),
        name = icon.name(),
        tags = icon.tags().join(", "),
        aliases = icon.names().collect::<Vec<_>>().join(", "),
        codepoint = icon.codepoint(),
        author = icon.author(),
        version = icon.version(),
    )
}
