//! Tests for rendered text, character data and XML output.

use husk_dom::{AttributeMap, DomError, NodeId, Page, XML_DECLARATION};

/// Build `<html><body>...</body></html>` and return (page, body).
fn page_with_body() -> (Page, NodeId) {
    let mut page = Page::blank();
    let root = page.root();
    let html = page.create_element("html", AttributeMap::new());
    let body = page.create_element("body", AttributeMap::new());
    page.append_child(root, html).unwrap();
    page.append_child(html, body).unwrap();
    (page, body)
}

fn append(page: &mut Page, parent: NodeId, tag: &str, text: Option<&str>) -> NodeId {
    let element = page.create_element(tag, AttributeMap::new());
    page.append_child(parent, element).unwrap();
    if let Some(text) = text {
        let node = page.create_text_node(text);
        page.append_child(element, node).unwrap();
    }
    element
}

fn append_text(page: &mut Page, parent: NodeId, text: &str) -> NodeId {
    let node = page.create_text_node(text);
    page.append_child(parent, node).unwrap();
    node
}

#[test]
fn test_rendered_text_collapses_whitespace() {
    let (mut page, body) = page_with_body();
    append_text(&mut page, body, "  Hello,\n\t\u{a0} ");
    append(&mut page, body, "b", Some("big"));
    append_text(&mut page, body, "   world  ");

    assert_eq!(page.as_text(), "Hello, big world");
}

#[test]
fn test_blocks_and_breaks_separate_words() {
    let (mut page, body) = page_with_body();
    append(&mut page, body, "div", Some("one"));
    append(&mut page, body, "p", Some("two"));
    append_text(&mut page, body, "three");
    append(&mut page, body, "br", None);
    append_text(&mut page, body, "four");

    assert_eq!(page.as_text(), "one two three four");
}

#[test]
fn test_hidden_content_is_skipped() {
    let (mut page, body) = page_with_body();
    append(&mut page, body, "script", Some("var x = 1;"));
    append(&mut page, body, "style", Some("p {}"));
    append_text(&mut page, body, "visible");
    append(&mut page, body, "noscript", Some("no js"));

    // Scripting is off, so noscript content shows.
    assert_eq!(page.as_text(), "visible no js");
}

#[test]
fn test_inline_element_keeps_surrounding_space() {
    let (mut page, body) = page_with_body();
    let span = append(&mut page, body, "span", Some(" padded "));
    let div = append(&mut page, body, "div", Some(" padded "));

    assert_eq!(page.rendered_text(span).unwrap(), " padded ");
    assert_eq!(page.rendered_text(div).unwrap(), "padded");
}

#[test]
fn test_text_content_is_raw() {
    let (mut page, body) = page_with_body();
    let p = append(&mut page, body, "p", Some("a  b"));
    append(&mut page, p, "i", Some(" c"));
    assert_eq!(page.text_content(p), "a  b c");
}

#[test]
fn test_title_text() {
    let mut page = Page::blank();
    let root = page.root();
    let html = append(&mut page, root, "html", None);
    let head = append(&mut page, html, "head", None);
    append(&mut page, head, "title", Some("  My \n Page "));
    assert_eq!(page.title_text(), "My Page");
    assert_eq!(page.head(), Some(head));
    assert_eq!(page.document_element(), Some(html));
}

// ========== character data ==========

#[test]
fn test_character_data_operations() {
    let mut page = Page::blank();
    let text = page.create_text_node("héllo");

    page.append_data(text, " wörld").unwrap();
    assert_eq!(page.character_data(text).unwrap(), "héllo wörld");

    page.insert_data(text, 5, ",").unwrap();
    assert_eq!(page.character_data(text).unwrap(), "héllo, wörld");

    page.delete_data(text, 5, 1).unwrap();
    page.replace_data(text, 6, 5, "there").unwrap();
    assert_eq!(page.character_data(text).unwrap(), "héllo there");

    assert_eq!(page.substring_data(text, 1, 4).unwrap(), "éllo");
    page.delete_data(text, 5, 100).unwrap();
    assert_eq!(page.character_data(text).unwrap(), "héllo");
}

#[test]
fn test_offset_past_end_is_rejected() {
    let mut page = Page::blank();
    let text = page.create_text_node("abc");
    assert!(matches!(
        page.insert_data(text, 4, "x"),
        Err(DomError::IllegalArgument(_))
    ));
    assert!(matches!(
        page.substring_data(text, 9, 1),
        Err(DomError::IllegalArgument(_))
    ));
}

#[test]
fn test_character_data_on_element_fails() {
    let mut page = Page::blank();
    let div = page.create_element("div", AttributeMap::new());
    assert!(matches!(
        page.append_data(div, "x"),
        Err(DomError::NotCharacterData(_))
    ));
}

#[test]
fn test_split_text_inserts_tail_after() {
    let (mut page, body) = page_with_body();
    let text = append_text(&mut page, body, "hello world");
    let after = append(&mut page, body, "hr", None);

    let tail = page.split_text(text, 5).unwrap();

    assert_eq!(page.character_data(text).unwrap(), "hello");
    assert_eq!(page.character_data(tail).unwrap(), " world");
    assert_eq!(page.next_sibling(text), Some(tail));
    assert_eq!(page.next_sibling(tail), Some(after));
}

// ========== XML ==========

#[test]
fn test_as_xml_of_element() {
    let (mut page, body) = page_with_body();
    let p = append(&mut page, body, "p", Some("a < b"));
    page.set_attribute(p, "title", "\"q\"").unwrap();
    let comment = page.create_comment(" note ");
    page.append_child(p, comment).unwrap();

    assert_eq!(
        page.node_as_xml(p).unwrap(),
        "<p title=\"&quot;q&quot;\">\n  a &lt; b\n  <!-- note -->\n</p>\n"
    );
    assert!(page.as_xml().starts_with(XML_DECLARATION));
}
