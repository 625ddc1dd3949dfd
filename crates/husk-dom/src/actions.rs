//! Clicking.
//!
//! [§ 6.1 Activation behavior](https://html.spec.whatwg.org/multipage/interaction.html#activation-behaviour)
//!
//! "Certain elements in HTML have an activation behavior, which means that the
//! user can activate them."
//!
//! The default action of a click depends on the element. Each kind of element
//! maps to one click behaviour; elements without a default action share the
//! no-op behaviour.

use crate::element::{Capabilities, ElementData, HtmlTag};
use crate::page::Page;
use crate::request::WebRequest;
use crate::script::{EventOutcome, EventType};
use crate::{NodeId, Result};

/// What a click asks the enclosing window to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to load; the page stays.
    Stay,
    /// Load a new page.
    Navigate(WebRequest),
}

impl Page {
    /// Click `element`.
    ///
    /// Disabled controls ignore the click. Focusable elements receive focus,
    /// then `click` is dispatched; unless a handler cancels it, the element's
    /// default action runs.
    pub fn click(&mut self, element: NodeId) -> Result<ClickOutcome> {
        let data = self.element(element)?;
        if data.is_disabled() {
            tracing::debug!(%element, "click on disabled element ignored");
            return Ok(ClickOutcome::Stay);
        }
        if data.capabilities().contains(Capabilities::FOCUSABLE) {
            let _ = self.move_focus_to(Some(element))?;
        }
        if self.dispatch_event(element, EventType::Click)? == EventOutcome::Cancelled {
            return Ok(ClickOutcome::Stay);
        }
        behavior_for(self.element(element)?).activate(self, element)
    }
}

/// Default action of a clicked element.
trait ClickBehavior {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome>;
}

fn behavior_for(element: &ElementData) -> &'static dyn ClickBehavior {
    match element.tag() {
        HtmlTag::A | HtmlTag::Area => &FollowLink,
        HtmlTag::Input => match element.input_type().as_str() {
            "checkbox" => &ToggleCheckbox,
            "radio" => &CheckRadio,
            "submit" | "image" => &SubmitForm,
            _ => &NoDefaultAction,
        },
        HtmlTag::Button if element.input_type() == "submit" => &SubmitForm,
        HtmlTag::Label => &ForwardToControl,
        HtmlTag::Option => &SelectOption,
        _ => &NoDefaultAction,
    }
}

struct NoDefaultAction;

impl ClickBehavior for NoDefaultAction {
    fn activate(&self, _page: &mut Page, _element: NodeId) -> Result<ClickOutcome> {
        Ok(ClickOutcome::Stay)
    }
}

/// [§ 4.6.4 Following hyperlinks](https://html.spec.whatwg.org/multipage/links.html#following-hyperlinks-2)
struct FollowLink;

impl ClickBehavior for FollowLink {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome> {
        let data = page.element(element)?;
        let Some(href) = data.attributes().get("href").map(str::trim) else {
            return Ok(ClickOutcome::Stay);
        };
        if href.starts_with('#') {
            return Ok(ClickOutcome::Stay);
        }
        if let Some(script) = strip_javascript_scheme(href) {
            let script = script.to_string();
            page.execute_script(&script)?;
            return Ok(ClickOutcome::Stay);
        }
        let target = data.attributes().get("target").map(str::to_string);
        let url = page.resolve_url(href)?;
        Ok(ClickOutcome::Navigate(
            WebRequest::get(url).with_target(target.as_deref()),
        ))
    }
}

fn strip_javascript_scheme(href: &str) -> Option<&str> {
    const SCHEME: &str = "javascript:";
    href.get(..SCHEME.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
        .map(|_| &href[SCHEME.len()..])
}

struct ToggleCheckbox;

impl ClickBehavior for ToggleCheckbox {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome> {
        let checked = page.is_checked(element)?;
        page.set_checked(element, !checked)?;
        let _ = page.dispatch_event(element, EventType::Change)?;
        Ok(ClickOutcome::Stay)
    }
}

struct CheckRadio;

impl ClickBehavior for CheckRadio {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome> {
        if !page.is_checked(element)? {
            page.set_checked(element, true)?;
            let _ = page.dispatch_event(element, EventType::Change)?;
        }
        Ok(ClickOutcome::Stay)
    }
}

struct SubmitForm;

impl ClickBehavior for SubmitForm {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome> {
        match page.enclosing_form(element)? {
            Some(form) => page.submit_form(form, Some(element)),
            None => Ok(ClickOutcome::Stay),
        }
    }
}

/// [§ 4.10.4 The label element](https://html.spec.whatwg.org/multipage/forms.html#the-label-element)
///
/// "The label element's exact default presentation and behavior ... should
/// match the platform's label behavior."
struct ForwardToControl;

impl ClickBehavior for ForwardToControl {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome> {
        let control = match page.element(element)?.attributes().get("for") {
            Some(id) => page.element_by_id(id).ok(),
            None => page.descendant_elements(element).find(|&id| {
                page.as_element(id)
                    .is_some_and(|e| e.capabilities().contains(Capabilities::SUBMITTABLE))
            }),
        };
        match control {
            Some(control) if !page.is_element(control, HtmlTag::Label) => page.click(control),
            _ => Ok(ClickOutcome::Stay),
        }
    }
}

struct SelectOption;

impl ClickBehavior for SelectOption {
    fn activate(&self, page: &mut Page, element: NodeId) -> Result<ClickOutcome> {
        let select = page.enclosing_element(element, "select")?;
        let multiple = match select {
            Some(select) => page.has_attribute(select, "multiple")?,
            None => false,
        };
        let selected = page.is_selected(element)?;
        if multiple {
            page.set_selected(element, !selected)?;
        } else if !selected {
            page.set_selected(element, true)?;
        } else {
            return Ok(ClickOutcome::Stay);
        }
        if let Some(select) = select {
            let _ = page.dispatch_event(select, EventType::Change)?;
        }
        Ok(ClickOutcome::Stay)
    }
}
