//! Windows and navigation.
//!
//! [§ 7.4 Navigation and session history](https://html.spec.whatwg.org/multipage/browsing-the-web.html)
//!
//! The client owns every window, top-level or nested. A window shows one
//! [`Page`] at a time; loading a new page into a window discards the old
//! one together with every window nested in its frames.

use crate::config::ClientOptions;
use crate::error::BrowserError;
use crate::loader::{HttpLoader, LoadError, PageLoader};
use husk_common::net::DataUrl;
use husk_common::warning::warn_once;
use husk_dom::{ClickOutcome, DomError, NodeId, Page, ReadyState, WebRequest, WindowId};
use husk_js::{JsScriptHost, ScriptSource, page_scripts};
use std::collections::BTreeMap;
use url::Url;

/// How often scripts may navigate away from a page they just loaded before
/// the load is abandoned.
const MAX_SCRIPT_NAVIGATIONS: usize = 20;

type Result<T> = std::result::Result<T, BrowserError>;

/// A top-level window or the window behind a frame.
#[derive(Debug)]
pub struct WebWindow {
    id: WindowId,
    name: String,
    parent: Option<WindowId>,
    page: Page,
    history: Vec<Url>,
}

impl WebWindow {
    /// Identity of this window.
    #[must_use]
    pub const fn id(&self) -> WindowId {
        self.id
    }

    /// Window name; frames take the frame's name, top-level windows the
    /// target they were opened for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The window whose page contains this window's frame.
    #[must_use]
    pub const fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    /// The page shown right now.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// URLs loaded into this window, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Url] {
        &self.history
    }
}

/// A headless browser session.
///
/// ```ignore
/// let mut client = WebClient::new(ClientOptions::default());
/// let window = client.get_page("https://example.com/")?;
/// let link = client.page(window)?.anchor_by_href("/about")?;
/// let window = client.click(window, link)?;
/// println!("{}", client.page(window)?.as_text());
/// ```
pub struct WebClient {
    options: ClientOptions,
    loader: Box<dyn PageLoader>,
    windows: BTreeMap<WindowId, WebWindow>,
    next_window: u32,
    current: Option<WindowId>,
}

impl std::fmt::Debug for WebClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebClient")
            .field("options", &self.options)
            .field("windows", &self.windows.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl WebClient {
    /// A client fetching pages over HTTP.
    #[must_use]
    pub fn new(options: ClientOptions) -> Self {
        let loader = HttpLoader::new(options.fetch_options());
        Self::with_loader(options, loader)
    }

    /// A client fetching pages through `loader`.
    pub fn with_loader(options: ClientOptions, loader: impl PageLoader + 'static) -> Self {
        Self {
            options,
            loader: Box::new(loader),
            windows: BTreeMap::new(),
            next_window: 0,
            current: None,
        }
    }

    /// The client configuration.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    // ----- windows -----

    /// Open an empty top-level window called `name`.
    pub fn open_window(&mut self, name: &str) -> WindowId {
        self.insert_window(name, None)
    }

    fn insert_window(&mut self, name: &str, parent: Option<WindowId>) -> WindowId {
        self.next_window += 1;
        let id = WindowId(self.next_window);
        let mut page = Page::blank();
        page.set_enclosing_window(id);
        tracing::debug!(%id, name, ?parent, "window opened");
        let _ = self.windows.insert(
            id,
            WebWindow {
                id,
                name: name.to_string(),
                parent,
                page,
                history: Vec::new(),
            },
        );
        id
    }

    /// The window `id`.
    pub fn window(&self, id: WindowId) -> Result<&WebWindow> {
        self.windows.get(&id).ok_or(BrowserError::UnknownWindow(id))
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut WebWindow> {
        self.windows
            .get_mut(&id)
            .ok_or(BrowserError::UnknownWindow(id))
    }

    /// Every open window in opening order.
    pub fn windows(&self) -> impl Iterator<Item = &WebWindow> {
        self.windows.values()
    }

    /// The first open window called `name`.
    #[must_use]
    pub fn window_by_name(&self, name: &str) -> Option<WindowId> {
        self.windows
            .values()
            .find(|w| w.name == name)
            .map(|w| w.id)
    }

    /// The top-level window that received the latest top-level navigation.
    #[must_use]
    pub const fn current_window(&self) -> Option<WindowId> {
        self.current
    }

    /// The top-level window containing `id`.
    pub fn top_window(&self, id: WindowId) -> Result<WindowId> {
        let mut window = self.window(id)?;
        while let Some(parent) = window.parent {
            window = self.window(parent)?;
        }
        Ok(window.id)
    }

    /// Number of windows between `id` and its top-level window.
    fn depth(&self, id: WindowId) -> usize {
        let mut depth = 0;
        let mut parent = self.windows.get(&id).and_then(|w| w.parent);
        while let Some(id) = parent {
            depth += 1;
            parent = self.windows.get(&id).and_then(|w| w.parent);
        }
        depth
    }

    /// The page shown in window `id`.
    pub fn page(&self, id: WindowId) -> Result<&Page> {
        Ok(&self.window(id)?.page)
    }

    /// Mutable access to the page shown in window `id`.
    pub fn page_mut(&mut self, id: WindowId) -> Result<&mut Page> {
        Ok(&mut self.window_mut(id)?.page)
    }

    /// Close window `id` and every window nested in its frames.
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        let parent = self.window(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.windows.get_mut(&p)) {
            let _ = parent.page.deregister_frame(id);
        }
        self.remove_window_tree(id);
        if self.current == Some(id) {
            self.current = None;
        }
        Ok(())
    }

    fn remove_window_tree(&mut self, id: WindowId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(mut window) = self.windows.remove(&id) {
                tracing::debug!(%id, "window closed");
                pending.extend(window.page.take_frames().into_iter().map(|f| f.window));
            }
        }
    }

    // ----- navigation -----

    /// Load `url` into the current window, opening one if needed.
    pub fn get_page(&mut self, url: &str) -> Result<WindowId> {
        let url = Url::parse(url).map_err(|source| BrowserError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let window = match self.current {
            Some(id) if self.windows.contains_key(&id) => id,
            _ => self.open_window(""),
        };
        self.navigate(window, WebRequest::get(url))
    }

    /// Show `html` in window `id` as if it had been loaded from `url`.
    pub fn load_html(&mut self, id: WindowId, html: &str, url: Url) -> Result<()> {
        let depth = self.depth(id);
        if let Some(request) = self.install(id, html, url, depth)? {
            self.load(id, request)?;
        }
        Ok(())
    }

    /// [§ 7.4.2.2 Navigate](https://html.spec.whatwg.org/multipage/browsing-the-web.html#navigate)
    ///
    /// Load `request` into the window its target names, relative to
    /// `origin`, and return that window.
    ///
    /// | target | window |
    /// |---|---|
    /// | none, `_self` | `origin` |
    /// | `_blank` | a new top-level window |
    /// | `_parent` | the parent of `origin`, or `origin` itself |
    /// | `_top` | the top-level window of `origin` |
    /// | a name | the first window with that name, else a new one |
    pub fn navigate(&mut self, origin: WindowId, request: WebRequest) -> Result<WindowId> {
        let target = self.resolve_target(origin, request.target.as_deref())?;
        tracing::debug!(%origin, %target, url = %request.url, method = %request.method, "navigate");
        self.load(target, request)?;
        if self.window(target)?.parent.is_none() {
            self.current = Some(target);
        }
        Ok(target)
    }

    fn resolve_target(&mut self, origin: WindowId, target: Option<&str>) -> Result<WindowId> {
        let parent = self.window(origin)?.parent;
        let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(origin);
        };
        let resolved = if target.eq_ignore_ascii_case("_self") {
            origin
        } else if target.eq_ignore_ascii_case("_parent") {
            parent.unwrap_or(origin)
        } else if target.eq_ignore_ascii_case("_top") {
            self.top_window(origin)?
        } else if target.eq_ignore_ascii_case("_blank") {
            self.open_window("")
        } else {
            match self.window_by_name(target) {
                Some(named) => named,
                None => self.open_window(target),
            }
        };
        Ok(resolved)
    }

    /// Load `request` into window `id`, following navigations its scripts
    /// ask for.
    fn load(&mut self, id: WindowId, request: WebRequest) -> Result<()> {
        let depth = self.depth(id);
        let mut next = Some(request);
        let mut hops = 0;
        while let Some(request) = next.take() {
            if hops > MAX_SCRIPT_NAVIGATIONS {
                return Err(BrowserError::NavigationLoop(request.url));
            }
            hops += 1;
            let html = self.fetch(&request)?;
            next = self.install(id, &html, request.url, depth)?;
        }
        Ok(())
    }

    /// `about:` and `data:` URLs are answered here; everything else goes to
    /// the loader.
    fn fetch(&self, request: &WebRequest) -> std::result::Result<String, LoadError> {
        match request.url.scheme() {
            "about" => Ok(String::new()),
            "data" => Ok(DataUrl::new(request.url.to_string()).decode_text()?),
            _ => self.loader.fetch(request),
        }
    }

    /// Build a page from `html`, run its scripts, show it in window `id` and
    /// load its frames. Returns the navigation its scripts asked for.
    fn install(
        &mut self,
        id: WindowId,
        html: &str,
        url: Url,
        depth: usize,
    ) -> Result<Option<WebRequest>> {
        let mut page = husk_html::parse_document(html, url.clone())?;
        page.set_enclosing_window(id);
        if self.options.javascript_enabled {
            JsScriptHost::install(&mut page)?;
        }
        self.run_scripts(&mut page)?;

        let window = self.window_mut(id)?;
        window.history.push(url);
        let mut old = std::mem::replace(&mut window.page, page);
        for frame in old.take_frames() {
            self.remove_window_tree(frame.window);
        }

        self.load_frames(id, depth)?;

        let throw = self.options.throw_on_script_error;
        let page = self.page_mut(id)?;
        let _ = tolerate(page.complete_loading(), throw)?;
        Ok(page.take_script_navigation())
    }

    /// [§ 4.12.1.1 Processing model](https://html.spec.whatwg.org/multipage/scripting.html#script-processing-model)
    ///
    /// Runs classic scripts in document order. External scripts are fetched
    /// through the loader. Each script element is complete once it has run.
    fn run_scripts(&self, page: &mut Page) -> Result<()> {
        if !page.is_script_enabled() {
            return Ok(());
        }
        let throw = self.options.throw_on_script_error;
        for script in page_scripts(page) {
            let code = match script.source {
                ScriptSource::Inline(code) => Some(code),
                ScriptSource::External(url) => match self.fetch(&WebRequest::get(url.clone())) {
                    Ok(code) => Some(code),
                    Err(err) if !throw => {
                        tracing::warn!(%url, %err, "external script not loaded");
                        None
                    }
                    Err(err) => return Err(err.into()),
                },
            };
            if let Some(code) = code {
                let _ = tolerate(page.execute_script(&code), throw)?;
            }
            page.set_ready_state(script.element, ReadyState::Complete)?;
        }
        Ok(())
    }

    /// [§ 4.8.5 The iframe element](https://html.spec.whatwg.org/multipage/iframe-embed-object.html#the-iframe-element)
    ///
    /// Opens a nested window for every frame of the page in window `id` and
    /// loads the frame's `src` into it. A frame that cannot be loaded stays
    /// blank.
    fn load_frames(&mut self, id: WindowId, depth: usize) -> Result<()> {
        let frames: Vec<(NodeId, String)> = {
            let page = self.page(id)?;
            page.frame_elements()
                .into_iter()
                .map(|element| -> husk_dom::Result<(NodeId, String)> {
                    let src = page.get_attribute(element, "src")?.as_str().trim().to_string();
                    Ok((element, src))
                })
                .collect::<husk_dom::Result<_>>()?
        };
        let max_depth = self.options.max_frame_depth;
        for (element, src) in frames {
            let child = self.insert_window("", Some(id));
            let page = self.page_mut(id)?;
            page.register_frame(element, child)?;
            let name = page
                .frames()
                .iter()
                .find(|f| f.window == child)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            let url = if depth >= max_depth {
                let _ = warn_once(
                    "Frames",
                    &format!("frames nested deeper than {max_depth} left blank"),
                );
                None
            } else if src.is_empty() {
                None
            } else {
                match page.resolve_url(&src) {
                    Ok(url) => Some(url),
                    Err(err) => {
                        tracing::warn!(src, %err, "frame src does not resolve");
                        None
                    }
                }
            };
            self.window_mut(child)?.name = name;
            let request = WebRequest::get(url.unwrap_or_else(about_blank));
            match self.load(child, request) {
                Ok(()) => {}
                Err(BrowserError::Load(err)) => {
                    tracing::warn!(%child, %err, "frame left blank");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Go back to the previous URL of window `id`, re-requesting it with
    /// `GET`. Does nothing when there is no previous page.
    pub fn go_back(&mut self, id: WindowId) -> Result<WindowId> {
        let window = self.window_mut(id)?;
        if window.history.len() < 2 {
            return Ok(id);
        }
        let _current = window.history.pop();
        let Some(previous) = window.history.pop() else {
            return Ok(id);
        };
        self.load(id, WebRequest::get(previous))?;
        Ok(id)
    }

    // ----- interaction -----

    /// Click `element` in window `id` and follow the navigation it causes.
    ///
    /// Returns the window showing the result: `id` itself when the click
    /// stays on the page, otherwise the window the navigation targeted.
    pub fn click(&mut self, id: WindowId, element: NodeId) -> Result<WindowId> {
        let throw = self.options.throw_on_script_error;
        let outcome = tolerate(self.page_mut(id)?.click(element), throw)?;
        self.follow(id, outcome.unwrap_or(ClickOutcome::Stay))
    }

    /// Submit `form` in window `id` without a submitter.
    pub fn submit(&mut self, id: WindowId, form: NodeId) -> Result<WindowId> {
        let throw = self.options.throw_on_script_error;
        let outcome = tolerate(self.page_mut(id)?.submit_form(form, None), throw)?;
        self.follow(id, outcome.unwrap_or(ClickOutcome::Stay))
    }

    /// Move focus to the next tabbable element of window `id`.
    pub fn tab(&mut self, id: WindowId) -> Result<Option<NodeId>> {
        let throw = self.options.throw_on_script_error;
        Ok(tolerate(self.page_mut(id)?.tab_to_next_element(), throw)?.flatten())
    }

    fn follow(&mut self, id: WindowId, outcome: ClickOutcome) -> Result<WindowId> {
        let scripted = self.page_mut(id)?.take_script_navigation();
        let request = match outcome {
            ClickOutcome::Navigate(request) => Some(request),
            ClickOutcome::Stay => scripted,
        };
        match request {
            Some(request) => self.navigate(id, request),
            None => Ok(id),
        }
    }
}

fn about_blank() -> Url {
    Page::blank().url().clone()
}

/// Apply the script error policy: with `throw` unset, script errors are
/// logged and turned into `None`.
fn tolerate<T>(result: husk_dom::Result<T>, throw: bool) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DomError::Script(err)) if !throw => {
            tracing::warn!(%err, "script error ignored");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
