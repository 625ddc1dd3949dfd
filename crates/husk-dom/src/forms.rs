//! Form control state and form submission.
//!
//! [§ 4.10.21 Form submission](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-submission-2)
//!
//! Control state lives in content attributes: `checked` for checkboxes and
//! radio buttons, `selected` for options. Submitting a form builds a
//! [`WebRequest`] from its successful controls; loading it is the client's
//! business.

use crate::actions::ClickOutcome;
use crate::element::{ElementData, HtmlTag};
use crate::page::Page;
use crate::request::WebRequest;
use crate::script::{EventOutcome, EventType};
use crate::text::collapse_whitespace;
use crate::{DomError, NodeId, Result};
use url::form_urlencoded;

impl Page {
    /// The form `node` belongs to (its nearest `form` ancestor).
    pub fn enclosing_form(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.enclosing_element(node, "form")
    }

    /// Whether a checkbox or radio button is checked.
    pub fn is_checked(&self, element: NodeId) -> Result<bool> {
        self.has_attribute(element, "checked")
    }

    /// Check or uncheck a control. Checking a radio button unchecks the
    /// other buttons of its group.
    pub fn set_checked(&mut self, element: NodeId, checked: bool) -> Result<()> {
        if !checked {
            return self.remove_attribute(element, "checked");
        }
        self.set_attribute(element, "checked", "checked")?;
        if is_radio(self.element(element)?) {
            for other in self.radio_group(element)? {
                if other != element {
                    self.remove_attribute(other, "checked")?;
                }
            }
        }
        Ok(())
    }

    /// Radio buttons sharing `radio`'s name within its form, or within the
    /// formless part of the page.
    pub fn radio_group(&self, radio: NodeId) -> Result<Vec<NodeId>> {
        let Some(name) = self.element(radio)?.attributes().get("name") else {
            return Ok(vec![radio]);
        };
        let form = self.enclosing_form(radio)?;
        let scope = form.unwrap_or_else(|| self.root());
        let mut group = Vec::new();
        for id in self.descendant_elements(scope) {
            let Some(element) = self.as_element(id) else {
                continue;
            };
            if is_radio(element)
                && element.attributes().get("name") == Some(name)
                && self.enclosing_form(id)? == form
            {
                group.push(id);
            }
        }
        Ok(group)
    }

    /// Whether an `option` is selected.
    pub fn is_selected(&self, option: NodeId) -> Result<bool> {
        self.has_attribute(option, "selected")
    }

    /// Select or deselect an `option`. Selecting an option of a
    /// single-choice `select` deselects its siblings.
    pub fn set_selected(&mut self, option: NodeId, selected: bool) -> Result<()> {
        if !selected {
            return self.remove_attribute(option, "selected");
        }
        self.set_attribute(option, "selected", "selected")?;
        let Some(select) = self.enclosing_element(option, "select")? else {
            return Ok(());
        };
        if self.has_attribute(select, "multiple")? {
            return Ok(());
        }
        for other in self.options(select) {
            if other != option {
                self.remove_attribute(other, "selected")?;
            }
        }
        Ok(())
    }

    /// The `option` elements of a `select`, in tree order.
    #[must_use]
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendant_elements(select)
            .filter(|&id| self.is_element(id, HtmlTag::Option))
            .collect()
    }

    /// The value an `option` submits: its `value` attribute, else its text.
    pub fn option_value(&self, option: NodeId) -> Result<String> {
        if let Some(value) = self.element(option)?.attributes().get("value") {
            return Ok(value.to_string());
        }
        Ok(collapse_whitespace(&self.text_content(option))
            .trim()
            .to_string())
    }

    /// [§ 4.10.21.3 Form submission algorithm](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-submission-algorithm)
    ///
    /// Dispatches `submit` to `form`; unless a handler cancels it, returns
    /// the request the form asks to load. `submitter` is the button that
    /// triggered the submission, if any.
    pub fn submit_form(&mut self, form: NodeId, submitter: Option<NodeId>) -> Result<ClickOutcome> {
        if !self.is_element(form, HtmlTag::Form) {
            return Err(DomError::IllegalArgument(format!(
                "node {form} is not a form"
            )));
        }
        if self.dispatch_event(form, EventType::Submit)? == EventOutcome::Cancelled {
            return Ok(ClickOutcome::Stay);
        }
        let data = self.element(form)?;
        let action = data.attributes().get("action").unwrap_or_default().trim();
        let mut url = if action.is_empty() {
            self.url().clone()
        } else {
            self.resolve_url(action)?
        };
        let post = data
            .attributes()
            .get("method")
            .is_some_and(|m| m.trim().eq_ignore_ascii_case("post"));
        let target = data.attributes().get("target");
        let pairs = self.form_data(form, submitter)?;
        tracing::debug!(%form, %url, post, fields = pairs.len(), "form submitted");

        let request = if post {
            let body = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&pairs)
                .finish();
            WebRequest::post_form(url, body)
        } else {
            url.set_query(None);
            if !pairs.is_empty() {
                let _ = url.query_pairs_mut().extend_pairs(&pairs);
            }
            WebRequest::get(url)
        };
        Ok(ClickOutcome::Navigate(request.with_target(target)))
    }

    /// [§ 4.10.21.4 Constructing the entry list](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#constructing-the-form-data-set)
    ///
    /// Name/value pairs of the successful controls of `form`, in tree order.
    pub fn form_data(
        &self,
        form: NodeId,
        submitter: Option<NodeId>,
    ) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for id in self.descendant_elements(form) {
            let Some(element) = self.as_element(id) else {
                continue;
            };
            let Some(control) = element.as_submittable() else {
                continue;
            };
            let Some(name) = control.name() else {
                continue;
            };
            if element.is_disabled() {
                continue;
            }
            let is_submitter = submitter == Some(id);
            match element.tag() {
                HtmlTag::Input => match element.input_type().as_str() {
                    "checkbox" | "radio" => {
                        if element.attributes().contains("checked") {
                            let value = element.attributes().get("value").unwrap_or("on");
                            pairs.push((name.to_string(), value.to_string()));
                        }
                    }
                    "image" => {
                        if is_submitter {
                            pairs.push((format!("{name}.x"), "0".to_string()));
                            pairs.push((format!("{name}.y"), "0".to_string()));
                        }
                    }
                    "submit" => {
                        if is_submitter {
                            pairs.push((name.to_string(), control.value().to_string()));
                        }
                    }
                    "button" | "reset" => {}
                    _ => pairs.push((name.to_string(), control.value().to_string())),
                },
                HtmlTag::Button => {
                    if is_submitter && element.input_type() == "submit" {
                        pairs.push((name.to_string(), control.value().to_string()));
                    }
                }
                HtmlTag::Select => {
                    for value in self.selected_values(id, element)? {
                        pairs.push((name.to_string(), value));
                    }
                }
                HtmlTag::Textarea => pairs.push((name.to_string(), self.text_content(id))),
                _ => {}
            }
        }
        Ok(pairs)
    }

    fn selected_values(&self, select: NodeId, data: &ElementData) -> Result<Vec<String>> {
        let options = self.options(select);
        let mut selected: Vec<NodeId> = options
            .iter()
            .copied()
            .filter(|&option| {
                self.as_element(option)
                    .is_some_and(|o| o.attributes().contains("selected") && !o.is_disabled())
            })
            .collect();
        if selected.is_empty() && !data.attributes().contains("multiple") {
            selected.extend(options.first());
        }
        selected
            .into_iter()
            .map(|option| self.option_value(option))
            .collect()
    }
}

fn is_radio(element: &ElementData) -> bool {
    element.is(HtmlTag::Input) && element.input_type() == "radio"
}
