//! HTML parsing front-end for `stanza-dom`: an html5ever `TreeSink` that
//! builds the document through its mutator API.

mod html_document;
mod html_sink;

pub use html_document::parse_html_document;
pub use html_sink::DocumentHtmlParser;
