//! Tests for the HTML tokenizer, tree builder and renderer.

use kestrel_common::Location;
use kestrel_document::{BlockRole, Document, DocumentStyle, ListMarker, TextRole};
use kestrel_markup::html::{self, HtmlTokenizer, Token, entities};
use kestrel_markup::Node;

const PAGE: &str = "<!DOCTYPE html><html><head><title>Page &amp; Co</title>\
<style>p { color: red }</style></head><body>\
<h1>Head</h1>\
<p>Hello <b>bold</b> and <a href=\"/x\">link</a>.</p>\
<ul><li>one<li>two</ul>\
<pre>\ncode\n  more</pre>\
<script>var x = '<p>';</script>\
</body></html>";

fn render(text: &str) -> Document {
    let root = Location::parse("https://host/page.html").unwrap();
    html::render(text, &root, &DocumentStyle::default())
}

fn texts(doc: &Document) -> Vec<String> {
    doc.blocks.iter().map(|b| b.text()).collect()
}

// ========== tokenizer ==========

#[test]
fn test_tokenizer_attributes() {
    let tokens: Vec<Token> = HtmlTokenizer::new("<a HREF='x' title=y data-flag href=z>").collect();
    assert_eq!(tokens.len(), 1);
    let token = &tokens[0];
    assert_eq!(token.attribute("href"), Some("x"));
    assert_eq!(token.attribute("title"), Some("y"));
    assert_eq!(token.attribute("data-flag"), Some(""));
    assert!(matches!(token, Token::StartTag { name, .. } if name == "a"));
}

#[test]
fn test_tokenizer_raw_text() {
    let tokens: Vec<Token> = HtmlTokenizer::new("<script>a < b && '<p>'</SCRIPT>x").collect();
    assert_eq!(
        tokens[1],
        Token::Text("a < b && '<p>'".to_string())
    );
    assert_eq!(
        tokens[2],
        Token::EndTag {
            name: "script".to_string()
        }
    );
    assert_eq!(tokens[3], Token::Text("x".to_string()));
}

#[test]
fn test_tokenizer_comments_and_doctype() {
    let tokens: Vec<Token> = HtmlTokenizer::new("<!doctype html><!-- note -->").collect();
    assert_eq!(tokens[0], Token::Doctype);
    assert_eq!(tokens[1], Token::Comment(" note ".to_string()));
}

#[test]
fn test_entities() {
    assert_eq!(entities::decode("a &amp; b"), "a & b");
    assert_eq!(entities::decode("&#x41;&#66;"), "AB");
    assert_eq!(entities::decode("&bogus; &"), "&bogus; &");
}

// ========== tree ==========

#[test]
fn test_parse_title_and_skipped_content() {
    let page = html::parse(PAGE);
    assert_eq!(page.title.as_deref(), Some("Page & Co"));
    assert!(!page.body.plain_text().contains("color"));
    assert!(!page.body.plain_text().contains("var x"));
}

#[test]
fn test_implicit_list_items() {
    let page = html::parse("<ul><li>one<li>two</ul>");
    let Node::Document(children) = &page.body else {
        panic!("expected document");
    };
    let Node::List { items, .. } = &children[0] else {
        panic!("expected list");
    };
    assert_eq!(items.len(), 2);
}

// ========== rendering ==========

#[test]
fn test_render_page() {
    let doc = render(PAGE);
    assert_eq!(
        texts(&doc),
        ["Head", "Hello bold and link.", "one", "two", "code", "  more"]
    );
    assert_eq!(doc.title.as_deref(), Some("Page & Co"));
    assert_eq!(doc.blocks[0].style.role, BlockRole::Heading(1));
    assert_eq!(doc.blocks[2].style.list, Some(ListMarker::Bullet));
    assert_eq!(doc.blocks[4].style.role, BlockRole::Preformatted);
}

#[test]
fn test_render_inline_styles() {
    let doc = render(PAGE);
    let runs = &doc.blocks[1].runs;
    let bold = runs.iter().find(|r| r.text == "bold").unwrap();
    assert!(bold.style.bold);
    let link = runs.iter().find(|r| r.text == "link").unwrap();
    assert_eq!(link.style.role, TextRole::InternalLink);
    assert_eq!(link.style.anchor.as_deref(), Some("https://host/x"));
}

#[test]
fn test_heading_becomes_title_without_title_element() {
    let doc = render("<h1>Only</h1><p>x</p>");
    assert_eq!(doc.title.as_deref(), Some("Only"));
    assert_eq!(doc.outline.flatten(), vec![(1, "Only")]);
}

#[test]
fn test_whitespace_collapses() {
    let doc = render("<p>  a \n\n  b&nbsp;c &#x41;&#66; </p>");
    assert_eq!(doc.blocks[0].text(), "a b\u{a0}c AB");
}

#[test]
fn test_line_break_and_blockquote() {
    let doc = render("<p>one<br>two</p><blockquote>q</blockquote><div>after</div>");
    assert_eq!(texts(&doc), ["one", "two", "q", "after"]);
    assert_eq!(doc.blocks[2].style.quote_depth, 1);
    assert_eq!(doc.blocks[3].style.quote_depth, 0);
}

#[test]
fn test_table_rows_become_lines() {
    let doc = render("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>");
    assert_eq!(texts(&doc), ["a | b", "c"]);
}

// ========== nesting limits ==========

fn depth(node: &Node) -> usize {
    1 + node.children().iter().map(depth).max().unwrap_or(0)
}

#[test]
fn test_deeply_nested_inline_tags_are_flattened() {
    let source = format!("<p>{}x", "<em>".repeat(10_000));
    let parsed = html::parse(&source);
    assert!(depth(&parsed.body) <= kestrel_markup::node::MAX_DEPTH + 4);

    let doc = render(&source);
    assert_eq!(doc.plain_text().trim(), "x");
    let run = doc.blocks.iter().flat_map(|b| &b.runs).find(|r| r.text == "x").unwrap();
    assert!(run.style.italic);
}

#[test]
fn test_deeply_nested_blocks_with_stray_end_tags() {
    let source = format!(
        "{}<li>deep{}</b></i></em>after",
        "<blockquote><ul>".repeat(5_000),
        "</ul></blockquote>".repeat(5_000)
    );
    let parsed = html::parse(&source);
    assert!(depth(&parsed.body) <= kestrel_markup::node::MAX_DEPTH + 4);
    let text = render(&source).plain_text();
    assert!(text.contains("deep"), "{text}");
    assert!(text.contains("after"), "{text}");
}
