//! Completion items for partially typed icon names

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, CompletionTextEdit, Documentation,
    MarkupContent, MarkupKind, Range, TextEdit,
};

use crate::icons::icon::IconCollection;
use crate::icons::variant::Variant;
use crate::lsp::hover::icon_markdown;

/// Every icon of `collection` as a completion replacing `range`.
///
/// With `include_aliases`, each alias becomes an extra label that still
/// inserts the canonical name. The list is marked incomplete so clients ask
/// again as the user keeps typing.
pub fn completion_list(
    collection: &IconCollection,
    variant: Variant,
    include_aliases: bool,
    range: Range,
) -> CompletionList {
    let items = collection
        .icons()
        .iter()
        .flat_map(|icon| {
            let labels: Vec<&str> = if include_aliases {
                icon.names().collect()
            } else {
                vec![icon.name()]
            };
            let documentation = icon_markdown(icon, variant);
            let detail = icon.tags().join(", ");

            labels.into_iter().map(move |label| CompletionItem {
                label: label.to_string(),
                kind: Some(CompletionItemKind::TEXT),
                detail: Some(detail.clone()),
                documentation: Some(Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: documentation.clone(),
                })),
                sort_text: Some(label.to_string()),
                filter_text: Some(label.to_string()),
                text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                    range,
                    new_text: icon.name().to_string(),
                })),
                ..Default::default()
            })
        })
        .collect();

    CompletionList {
        is_incomplete: true,
        items,
    }
}
