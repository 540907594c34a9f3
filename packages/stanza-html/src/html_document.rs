use stanza_dom::{Document, DocumentConfig};

use crate::DocumentHtmlParser;

/// Parse markup into a fresh [`Document`] and attach the selection core to
/// its `<body>` (html5ever synthesizes one even for fragments, so snippets
/// like `<span>Hello</span>` work directly).
pub fn parse_html_document(html: &str, config: DocumentConfig) -> Document {
    let mut doc = Document::new(config);
    {
        let mut mutr = doc.mutate();
        DocumentHtmlParser::parse_into_mutator(&mut mutr, html);
    }

    let body = doc
        .nodes
        .iter()
        .find(|(_, node)| {
            node.element_data()
                .is_some_and(|el| el.name.local.as_ref() == "body")
        })
        .map(|(id, _)| id)
        .unwrap_or(0);
    doc.attach(body);
    doc
}
