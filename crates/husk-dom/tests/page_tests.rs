//! Tests for page-level state: script host boundary, ready state, frames and
//! lookups.

use husk_dom::{
    AttributeMap, ClickOutcome, DomError, EventOutcome, EventType, ListenerError, NodeId, Page,
    ReadyState, ScriptHost, ScriptPeer, WindowId,
};
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

type Log = Rc<RefCell<Vec<String>>>;

/// Script host that records everything and cancels clicks on `#cancel`.
struct RecordingHost {
    log: Log,
}

impl ScriptHost for RecordingHost {
    fn create_peer_for(&mut self, page: &Page, node: NodeId) -> ScriptPeer {
        self.log
            .borrow_mut()
            .push(format!("peer {}", page.node_name(node).unwrap()));
        ScriptPeer::new(node)
    }

    fn dispatch_event(
        &mut self,
        page: &mut Page,
        target: NodeId,
        event: EventType,
    ) -> Result<EventOutcome, ListenerError> {
        self.log.borrow_mut().push(format!("{event} {}", page.node_name(target)?));
        let cancel = page
            .get_attribute(target, "id")
            .is_ok_and(|id| id.as_str() == "cancel");
        Ok(if cancel && event == EventType::Click {
            EventOutcome::Cancelled
        } else {
            EventOutcome::Proceed
        })
    }

    fn execute_script(&mut self, page: &mut Page, source: &str) -> Result<(), ListenerError> {
        if source == "fail" {
            return Err("script error".into());
        }
        // Scripts may mutate the page they run in.
        let root = page.root();
        let marker = page.create_element("hr", AttributeMap::new());
        page.append_child(root, marker)?;
        self.log.borrow_mut().push(format!("run {source}"));
        Ok(())
    }
}

fn scripted_page() -> (Page, Log) {
    let log = Log::default();
    let mut page = Page::new(Url::parse("http://example.com/").unwrap());
    page.set_script_host(Box::new(RecordingHost { log: log.clone() }));
    (page, log)
}

fn add(page: &mut Page, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
    let element = page.create_element(tag, attributes.iter().copied().collect::<AttributeMap>());
    let root = page.root();
    page.append_child(root, element).unwrap();
    element
}

#[test]
fn test_script_peer_is_created_once() {
    let (mut page, log) = scripted_page();
    let div = add(&mut page, "div", &[]);

    let first = page.script_peer(div).unwrap().unwrap();
    let second = page.script_peer(div).unwrap().unwrap();

    assert!(first.same_peer(&second));
    assert_eq!(first.downcast_ref::<NodeId>(), Some(&div));
    assert_eq!(*log.borrow(), vec!["peer div".to_string()]);

    let clone = page.clone_node(div, false).unwrap();
    let cloned_peer = page.script_peer(clone).unwrap().unwrap();
    assert!(!cloned_peer.same_peer(&first));
}

#[test]
fn test_no_host_means_no_peer() {
    let mut page = Page::blank();
    let div = add(&mut page, "div", &[]);
    assert!(page.script_peer(div).unwrap().is_none());
    assert!(!page.is_script_enabled());
}

#[test]
fn test_click_dispatches_focus_then_click() {
    let (mut page, log) = scripted_page();
    let link = add(&mut page, "a", &[("href", "/x")]);

    let outcome = page.click(link).unwrap();

    assert!(matches!(outcome, ClickOutcome::Navigate(_)));
    assert_eq!(*log.borrow(), vec!["focus a".to_string(), "click a".to_string()]);
}

#[test]
fn test_cancelled_click_skips_default_action() {
    let (mut page, _log) = scripted_page();
    let checkbox = add(&mut page, "input", &[("type", "checkbox"), ("id", "cancel")]);

    assert_eq!(page.click(checkbox).unwrap(), ClickOutcome::Stay);
    assert!(!page.is_checked(checkbox).unwrap());
}

#[test]
fn test_javascript_href_runs_script() {
    let (mut page, log) = scripted_page();
    let link = add(&mut page, "a", &[("href", "javascript:go()")]);

    assert_eq!(page.click(link).unwrap(), ClickOutcome::Stay);
    assert!(log.borrow().contains(&"run go()".to_string()));
    assert_eq!(page.elements_by_tag_name(page.root(), "hr").len(), 1);
    // The host survives being moved out and back in.
    assert!(page.is_script_enabled());
    assert!(page.script_peer(link).unwrap().is_some());
}

#[test]
fn test_script_error_is_reported() {
    let (mut page, _log) = scripted_page();
    assert!(matches!(
        page.execute_script("fail"),
        Err(DomError::Script(_))
    ));
}

#[test]
fn test_focus_change_sends_blur() {
    let (mut page, log) = scripted_page();
    let a = add(&mut page, "input", &[]);
    let b = add(&mut page, "textarea", &[]);
    page.move_focus_to(Some(a)).unwrap();
    page.move_focus_to(Some(b)).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "focus input".to_string(),
            "blur input".to_string(),
            "focus textarea".to_string()
        ]
    );
}

#[test]
fn test_noscript_content_hidden_while_scripting() {
    let (mut page, _log) = scripted_page();
    let noscript = add(&mut page, "noscript", &[]);
    let inner = page.create_element("p", [("id", "inner")].into_iter().collect());
    page.append_child(noscript, inner).unwrap();

    let found = page.elements_by_tag_name(page.root(), "p");
    assert!(found.is_empty());
    // Indexing ignores scripting.
    assert_eq!(page.element_by_id("inner").unwrap(), inner);
}

// ========== ready state ==========

#[test]
fn test_load_lifecycle() {
    let (mut page, log) = scripted_page();
    let root = page.root();
    let html = add(&mut page, "html", &[]);
    let body = page.create_element("body", AttributeMap::new());
    page.append_child(html, body).unwrap();
    assert_eq!(page.document_ready_state(), ReadyState::Uninitialized);

    page.begin_loading();
    assert_eq!(page.ready_state(root).unwrap(), ReadyState::Loading);

    page.complete_loading().unwrap();
    assert_eq!(page.document_ready_state(), ReadyState::Complete);
    assert_eq!(page.ready_state(body).unwrap(), ReadyState::Complete);
    assert_eq!(log.borrow().last().map(String::as_str), Some("load body"));
}

#[test]
fn test_ready_state_may_skip() {
    let mut page = Page::blank();
    let script = add(&mut page, "script", &[]);
    assert_eq!(page.ready_state(script).unwrap(), ReadyState::Loading);
    page.set_ready_state(script, ReadyState::Complete).unwrap();
    assert_eq!(page.ready_state(script).unwrap(), ReadyState::Complete);
}

// ========== frames ==========

#[test]
fn test_frame_registry() {
    let mut page = Page::blank();
    let top = add(&mut page, "iframe", &[("name", "top")]);
    let side = add(&mut page, "frame", &[("id", "side")]);
    let div = add(&mut page, "div", &[]);

    assert_eq!(page.frame_elements(), vec![top, side]);
    page.register_frame(top, WindowId(2)).unwrap();
    page.register_frame(side, WindowId(3)).unwrap();
    assert!(matches!(
        page.register_frame(div, WindowId(4)),
        Err(DomError::IllegalArgument(_))
    ));

    assert_eq!(page.frame_by_name("side").unwrap().window, WindowId(3));
    assert!(page.frame_by_name("nope").is_err());

    let removed = page.deregister_frame(WindowId(2)).unwrap();
    assert_eq!(removed.element, top);
    assert_eq!(page.frames().len(), 1);
    assert_eq!(page.take_frames().len(), 1);
    assert!(page.frames().is_empty());
}

// ========== lookups ==========

#[test]
fn test_lookup_helpers() {
    let mut page = Page::blank();
    let form = add(&mut page, "form", &[("name", "login")]);
    let input = page.create_element("input", AttributeMap::new());
    page.append_child(form, input).unwrap();
    let link = add(&mut page, "a", &[("href", "/home")]);

    assert_eq!(page.forms(), vec![form]);
    assert_eq!(page.form_by_name("login").unwrap(), form);
    assert_eq!(page.anchors(), vec![link]);
    assert_eq!(page.anchor_by_href("/home").unwrap(), link);
    assert_eq!(page.enclosing_form(input).unwrap(), Some(form));
    assert_eq!(page.enclosing_element(input, "FORM").unwrap(), Some(form));
    assert!(matches!(
        page.enclosing_element(input, ""),
        Err(DomError::IllegalArgument(_))
    ));
    match page.anchor_by_href("/missing") {
        Err(DomError::ElementNotFound { element_name, .. }) => assert_eq!(element_name, "a"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_blank_pages_are_independent_documents() {
    let first = Page::blank();
    let second = Page::blank();
    assert_eq!(first.url().as_str(), "about:blank");
    assert_eq!(second.url(), first.url());
    assert_ne!(first.id(), second.id());
    assert_eq!(first.document_element(), None);
}
