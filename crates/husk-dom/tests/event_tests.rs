//! Tests for structural change notification and listener failure.

use husk_dom::{
    AttributeMap, DomChangeEvent, DomChangeListener, DomError, ListenerResult, NodeId, Page,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    added: Mutex<Vec<DomChangeEvent>>,
    removed: Mutex<Vec<DomChangeEvent>>,
}

impl DomChangeListener for Recorder {
    fn node_added(&self, event: &DomChangeEvent) -> ListenerResult {
        self.added.lock().unwrap().push(*event);
        Ok(())
    }

    fn node_removed(&self, event: &DomChangeEvent) -> ListenerResult {
        self.removed.lock().unwrap().push(*event);
        Ok(())
    }
}

struct Failing;

impl DomChangeListener for Failing {
    fn node_added(&self, _event: &DomChangeEvent) -> ListenerResult {
        Err("listener refused".into())
    }
}

fn element(page: &mut Page, tag: &str) -> NodeId {
    page.create_element(tag, AttributeMap::new())
}

#[test]
fn test_grandparent_sees_child_added_once() {
    let mut page = Page::blank();
    let root = page.root();
    let grandparent = element(&mut page, "div");
    let parent = element(&mut page, "section");
    page.append_child(root, grandparent).unwrap();
    page.append_child(grandparent, parent).unwrap();
    let recorder = Arc::new(Recorder::default());
    page.add_dom_change_listener(grandparent, recorder.clone())
        .unwrap();

    let child = element(&mut page, "p");
    page.append_child(parent, child).unwrap();

    let added = recorder.added.lock().unwrap().clone();
    assert_eq!(
        added,
        vec![DomChangeEvent {
            parent,
            changed: child
        }]
    );
}

#[test]
fn test_removal_is_reported_from_former_parent() {
    let mut page = Page::blank();
    let root = page.root();
    let parent = element(&mut page, "div");
    let child = element(&mut page, "p");
    page.append_child(root, parent).unwrap();
    page.append_child(parent, child).unwrap();
    let at_parent = Arc::new(Recorder::default());
    let at_child = Arc::new(Recorder::default());
    page.add_dom_change_listener(parent, at_parent.clone())
        .unwrap();
    page.add_dom_change_listener(child, at_child.clone())
        .unwrap();

    page.remove(child).unwrap();

    assert_eq!(
        *at_parent.removed.lock().unwrap(),
        vec![DomChangeEvent {
            parent,
            changed: child
        }]
    );
    assert!(at_child.removed.lock().unwrap().is_empty());
}

#[test]
fn test_detached_subtree_notifies_document_last() {
    let mut page = Page::blank();
    let detached = element(&mut page, "div");
    let at_document = Arc::new(Recorder::default());
    page.add_dom_change_listener(page.root(), at_document.clone())
        .unwrap();

    let child = element(&mut page, "p");
    page.append_child(detached, child).unwrap();

    assert_eq!(at_document.added.lock().unwrap().len(), 1);
}

#[test]
fn test_duplicate_registration_notifies_once() {
    let mut page = Page::blank();
    let root = page.root();
    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn DomChangeListener> = recorder.clone();
    page.add_dom_change_listener(root, listener.clone()).unwrap();
    page.add_dom_change_listener(root, listener.clone()).unwrap();

    let child = element(&mut page, "p");
    page.append_child(root, child).unwrap();
    assert_eq!(recorder.added.lock().unwrap().len(), 1);

    assert!(page.remove_dom_change_listener(root, &listener).unwrap());
    let other = element(&mut page, "p");
    page.append_child(root, other).unwrap();
    assert_eq!(recorder.added.lock().unwrap().len(), 1);
}

#[test]
fn test_listener_error_surfaces_after_mutation() {
    let mut page = Page::blank();
    let root = page.root();
    page.add_dom_change_listener(root, Arc::new(Failing)).unwrap();

    let child = element(&mut page, "p");
    let result = page.append_child(root, child);

    assert!(matches!(result, Err(DomError::Listener(_))));
    // The mutation already happened.
    assert_eq!(page.parent(child), Some(root));
}
