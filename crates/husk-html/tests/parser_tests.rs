//! Tests for converting parsed markup into pages.

use husk_dom::{HtmlTag, NodeKind, Page, ReadyState};
use husk_html::{parse_document, parse_into};
use url::Url;

fn parse(html: &str) -> Page {
    parse_document(html, Url::parse("http://example.com/index.html").unwrap()).unwrap()
}

#[test]
fn test_parse_builds_document_structure() {
    let page = parse("<!DOCTYPE html><title>T</title><p id=greeting>Hello <b>world</b></p>");

    let html = page.document_element().unwrap();
    assert!(page.is_element(html, HtmlTag::Html));
    assert!(page.head().is_some());
    let body = page.body().unwrap();
    assert_eq!(page.title_text(), "T");

    let p = page.element_by_id("greeting").unwrap();
    assert_eq!(page.parent(p), Some(body));
    assert_eq!(page.rendered_text(p).unwrap(), "Hello world");
    assert_eq!(page.document_ready_state(), ReadyState::Loaded);

    let first = page.first_child(page.root()).unwrap();
    assert!(matches!(
        page.get(first).unwrap().kind(),
        NodeKind::DocumentType { name, .. } if name == "html"
    ));
}

#[test]
fn test_attribute_names_are_lower_cased() {
    let page = parse(r#"<input ID="q" NAME="query" Value="x">"#);
    let input = page.element_by_id("q").unwrap();

    let names: Vec<_> = page
        .attributes(input)
        .unwrap()
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["id", "name", "value"]);
    assert_eq!(page.element_by_name("query").unwrap(), input);
}

#[test]
fn test_parser_recovers_from_bad_markup() {
    let page = parse("<table><tr><td>cell<p>para</table><div>after");
    assert_eq!(page.elements_by_tag_name(page.root(), "td").len(), 1);
    assert_eq!(page.elements_by_tag_name(page.root(), "div").len(), 1);
}

#[test]
fn test_foreign_elements_keep_namespace() {
    let page = parse("<svg><clipPath id=c></clipPath></svg>");
    let clip = page.element_by_id("c").unwrap();
    let element = page.element(clip).unwrap();
    assert_eq!(element.namespace_uri(), Some("http://www.w3.org/2000/svg"));
    assert_eq!(element.local_name(), "clipPath");
    assert_eq!(element.tag(), HtmlTag::Unknown);
}

#[test]
fn test_forms_and_links_are_reachable() {
    let page = parse(
        r#"<form name="f" action="/go"><input name="a"></form>
           <a href="/one">1</a><a href="/two">2</a>"#,
    );
    let form = page.form_by_name("f").unwrap();
    assert_eq!(page.forms(), vec![form]);
    assert_eq!(page.anchors().len(), 2);
    assert!(page.anchor_by_href("/two").is_ok());
}

#[test]
fn test_parse_into_existing_page() {
    let mut page = Page::blank();
    parse_into(&mut page, "<p id=x>hi</p>").unwrap();
    let p = page.element_by_id("x").unwrap();
    assert_eq!(page.text_content(p), "hi");
}

#[test]
fn test_comments_are_kept() {
    let page = parse("<body><!-- note --><p>x</p></body>");
    let body = page.body().unwrap();
    let first = page.first_child(body).unwrap();
    assert!(matches!(
        page.get(first).unwrap().kind(),
        NodeKind::Comment(text) if text == " note "
    ));
}
