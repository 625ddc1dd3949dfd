//! Tests for the attribute model and attribute change notification.

use husk_dom::{
    AttributeChangeEvent, AttributeChangeListener, AttributeMap, AttributeValue, DomError,
    ListenerResult, NodeId, Page, TabIndex,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(&'static str, AttributeChangeEvent)>>,
}

impl Recorder {
    fn take(&self) -> Vec<(&'static str, AttributeChangeEvent)> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl AttributeChangeListener for Recorder {
    fn attribute_added(&self, event: &AttributeChangeEvent) -> ListenerResult {
        self.events.lock().unwrap().push(("added", event.clone()));
        Ok(())
    }

    fn attribute_replaced(&self, event: &AttributeChangeEvent) -> ListenerResult {
        self.events.lock().unwrap().push(("replaced", event.clone()));
        Ok(())
    }

    fn attribute_removed(&self, event: &AttributeChangeEvent) -> ListenerResult {
        self.events.lock().unwrap().push(("removed", event.clone()));
        Ok(())
    }
}

fn connected_element(page: &mut Page, tag: &str) -> NodeId {
    let element = page.create_element(tag, AttributeMap::new());
    let root = page.root();
    page.append_child(root, element).unwrap();
    element
}

#[test]
fn test_attribute_names_are_case_insensitive() {
    let mut page = Page::blank();
    let div = connected_element(&mut page, "div");

    page.set_attribute(div, "ID", "x").unwrap();

    assert_eq!(page.get_attribute(div, "id").unwrap().as_str(), "x");
    assert!(page.has_attribute(div, "Id").unwrap());
    assert_eq!(page.element_by_id("x").unwrap(), div);
}

#[test]
fn test_attribute_value_states() {
    let mut page = Page::blank();
    let input = connected_element(&mut page, "input");
    page.set_attribute(input, "disabled", "").unwrap();
    page.set_attribute(input, "value", "v").unwrap();

    assert_eq!(
        page.get_attribute(input, "missing").unwrap(),
        AttributeValue::NotDefined
    );
    assert_eq!(
        page.get_attribute(input, "disabled").unwrap(),
        AttributeValue::Empty
    );
    assert_eq!(
        page.get_attribute(input, "value").unwrap(),
        AttributeValue::Value("v")
    );
    assert_eq!(page.get_attribute(input, "missing").unwrap().as_str(), "");
    assert!(page.element(input).unwrap().is_disabled());
}

#[test]
fn test_attribute_events_carry_new_then_old_values() {
    let mut page = Page::blank();
    let div = connected_element(&mut page, "div");
    let recorder = Arc::new(Recorder::default());
    page.add_attribute_change_listener(div, recorder.clone())
        .unwrap();

    page.set_attribute(div, "title", "first").unwrap();
    page.set_attribute(div, "title", "second").unwrap();
    page.remove_attribute(div, "title").unwrap();

    let events = recorder.take();
    let summary: Vec<_> = events
        .iter()
        .map(|(kind, e)| (*kind, e.name.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("added", "title", "first"),
            ("replaced", "title", "first"),
            ("removed", "title", "second"),
        ]
    );
    assert!(events.iter().all(|(_, e)| e.element == div));
}

#[test]
fn test_removing_absent_attribute_is_silent() {
    let mut page = Page::blank();
    let div = connected_element(&mut page, "div");
    let recorder = Arc::new(Recorder::default());
    page.add_attribute_change_listener(page.root(), recorder.clone())
        .unwrap();

    page.remove_attribute(div, "nope").unwrap();

    assert!(recorder.take().is_empty());
}

#[test]
fn test_attribute_events_bubble_to_document() {
    let mut page = Page::blank();
    let outer = connected_element(&mut page, "div");
    let inner = page.create_element("span", AttributeMap::new());
    page.append_child(outer, inner).unwrap();
    let at_outer = Arc::new(Recorder::default());
    let at_document = Arc::new(Recorder::default());
    page.add_attribute_change_listener(outer, at_outer.clone())
        .unwrap();
    page.add_attribute_change_listener(page.root(), at_document.clone())
        .unwrap();

    page.set_attribute(inner, "lang", "en").unwrap();

    assert_eq!(at_outer.take().len(), 1);
    assert_eq!(at_document.take().len(), 1);
}

#[test]
fn test_detached_element_still_notifies_document() {
    let mut page = Page::blank();
    let detached = page.create_element("p", AttributeMap::new());
    let at_document = Arc::new(Recorder::default());
    page.add_attribute_change_listener(page.root(), at_document.clone())
        .unwrap();

    page.set_attribute(detached, "class", "x").unwrap();

    assert_eq!(at_document.take().len(), 1);
}

#[test]
fn test_attributes_on_text_node_fail() {
    let mut page = Page::blank();
    let text = page.create_text_node("x");
    assert!(matches!(
        page.set_attribute(text, "a", "b"),
        Err(DomError::NotAnElement(_))
    ));
}

#[test]
fn test_tab_index_parsing() {
    let mut page = Page::blank();
    let input = connected_element(&mut page, "input");
    let tab_index = |page: &Page| page.element(input).unwrap().tab_index();

    assert_eq!(tab_index(&page), TabIndex::Unspecified);
    page.set_attribute(input, "tabindex", "3").unwrap();
    assert_eq!(tab_index(&page), TabIndex::Index(3));
    page.set_attribute(input, "tabindex", "99999").unwrap();
    assert_eq!(tab_index(&page), TabIndex::OutOfBounds);
    page.set_attribute(input, "tabindex", "-1").unwrap();
    assert_eq!(tab_index(&page), TabIndex::OutOfBounds);
    page.set_attribute(input, "tabindex", "abc").unwrap();
    assert_eq!(tab_index(&page), TabIndex::Unspecified);
}

#[test]
fn test_serialized_attribute_keeps_last_spelling() {
    let mut page = Page::blank();
    let div = connected_element(&mut page, "div");
    page.set_attribute(div, "data-x", "1").unwrap();
    page.set_attribute(div, "DATA-X", "2").unwrap();

    let names: Vec<_> = page
        .attributes(div)
        .unwrap()
        .iter()
        .map(|a| (a.name.clone(), a.value.clone()))
        .collect();
    assert_eq!(names, vec![("DATA-X".to_string(), "2".to_string())]);
}
