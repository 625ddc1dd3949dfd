//! Tests for focus, tab order and access keys.

use husk_dom::{AttributeMap, DomError, NodeId, Page};

fn control(page: &mut Page, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
    let element = page.create_element(tag, attributes.iter().copied().collect::<AttributeMap>());
    let root = page.root();
    page.append_child(root, element).unwrap();
    element
}

#[test]
fn test_positive_tab_indices_come_first() {
    let mut page = Page::blank();
    let two = control(&mut page, "input", &[("tabindex", "2")]);
    let one = control(&mut page, "input", &[("tabindex", "1")]);
    let unset = control(&mut page, "input", &[]);
    let _out_of_range = control(&mut page, "input", &[("tabindex", "99999")]);

    assert_eq!(page.tabbable_elements(), vec![one, two, unset]);
}

#[test]
fn test_disabled_and_hidden_controls_are_skipped() {
    let mut page = Page::blank();
    let enabled = control(&mut page, "button", &[]);
    let _disabled = control(&mut page, "button", &[("disabled", "")]);
    let _hidden = control(&mut page, "input", &[("type", "hidden")]);
    let _plain = control(&mut page, "div", &[]);
    let link = control(&mut page, "a", &[("href", "/x")]);

    assert_eq!(page.tabbable_elements(), vec![enabled, link]);
}

#[test]
fn test_tabbing_wraps_around() {
    let mut page = Page::blank();
    let a = control(&mut page, "input", &[]);
    let b = control(&mut page, "input", &[]);

    assert_eq!(page.tab_to_next_element().unwrap(), Some(a));
    assert_eq!(page.tab_to_next_element().unwrap(), Some(b));
    assert_eq!(page.tab_to_next_element().unwrap(), Some(a));
    assert_eq!(page.tab_to_previous_element().unwrap(), Some(b));
    assert_eq!(page.focused_element(), Some(b));
}

#[test]
fn test_tab_to_previous_without_focus_goes_to_last() {
    let mut page = Page::blank();
    let _a = control(&mut page, "input", &[]);
    let b = control(&mut page, "input", &[]);
    assert_eq!(page.tab_to_previous_element().unwrap(), Some(b));
}

#[test]
fn test_tabbing_without_candidates() {
    let mut page = Page::blank();
    let _div = control(&mut page, "div", &[]);
    assert_eq!(page.tab_to_next_element().unwrap(), None);
    assert_eq!(page.focused_element(), None);
}

#[test]
fn test_move_focus_reports_change() {
    let mut page = Page::blank();
    let input = control(&mut page, "input", &[]);

    assert!(page.move_focus_to(Some(input)).unwrap());
    assert!(!page.move_focus_to(Some(input)).unwrap());
    assert!(page.move_focus_to(None).unwrap());
    assert_eq!(page.focused_element(), None);
}

#[test]
fn test_focus_on_foreign_node_fails() {
    let mut page = Page::blank();
    let mut other = Page::blank();
    let foreign = control(&mut other, "input", &[]);
    assert!(matches!(
        page.move_focus_to(Some(foreign)),
        Err(DomError::NodeNotFound(_))
    ));
}

#[test]
fn test_removing_focused_subtree_clears_focus() {
    let mut page = Page::blank();
    let form = control(&mut page, "form", &[]);
    let input = page.create_element("input", AttributeMap::new());
    page.append_child(form, input).unwrap();
    page.move_focus_to(Some(input)).unwrap();

    page.remove(form).unwrap();

    assert_eq!(page.focused_element(), None);
}

#[test]
fn test_moving_focused_subtree_out_of_document_clears_focus() {
    let mut page = Page::blank();
    let form = control(&mut page, "form", &[]);
    let input = page.create_element("input", AttributeMap::new());
    page.append_child(form, input).unwrap();
    page.move_focus_to(Some(input)).unwrap();
    let detached = page.create_element("div", AttributeMap::new());

    page.append_child(detached, form).unwrap();

    assert!(!page.is_connected(input));
    assert_eq!(page.focused_element(), None);
    assert!(page.tabbable_elements().is_empty());
}

#[test]
fn test_moving_focused_element_within_document_keeps_focus() {
    let mut page = Page::blank();
    let first = control(&mut page, "div", &[]);
    let second = control(&mut page, "div", &[]);
    let input = page.create_element("input", AttributeMap::new());
    page.append_child(first, input).unwrap();
    page.move_focus_to(Some(input)).unwrap();

    page.append_child(second, input).unwrap();

    assert_eq!(page.focused_element(), Some(input));
}

#[test]
fn test_access_key_focuses_element() {
    let mut page = Page::blank();
    let _other = control(&mut page, "input", &[("accesskey", "x")]);
    let target = control(&mut page, "input", &[("accesskey", "S")]);

    assert_eq!(page.element_by_access_key('s'), Some(target));
    assert_eq!(page.press_access_key('s').unwrap(), Some(target));
    assert_eq!(page.focused_element(), Some(target));
    assert_eq!(page.press_access_key('q').unwrap(), None);
}
