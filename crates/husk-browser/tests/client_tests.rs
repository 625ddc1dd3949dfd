//! Tests for windows, navigation and page loading.

use husk_browser::{BrowserError, ClientOptions, LoadError, StaticLoader, WebClient};
use husk_dom::{DomError, HttpMethod, ReadyState};
use std::rc::Rc;

fn client_with(options: ClientOptions, pages: &[(&str, &str)]) -> (WebClient, Rc<StaticLoader>) {
    let loader = Rc::new(
        pages
            .iter()
            .fold(StaticLoader::new(), |loader, (url, html)| loader.with_page(url, html)),
    );
    (WebClient::with_loader(options, Rc::clone(&loader)), loader)
}

fn client(pages: &[(&str, &str)]) -> (WebClient, Rc<StaticLoader>) {
    client_with(ClientOptions::default(), pages)
}

#[test]
fn test_get_page_runs_scripts_and_completes() {
    let (mut client, _) = client(&[(
        "http://test/",
        "<title>Home</title><body><script>document.body.setAttribute('ran', 'yes')</script></body>",
    )]);

    let window = client.get_page("http://test/").unwrap();
    let page = client.page(window).unwrap();

    assert_eq!(page.title_text(), "Home");
    assert_eq!(page.document_ready_state(), ReadyState::Complete);
    let body = page.body().unwrap();
    assert_eq!(page.get_attribute(body, "ran").unwrap().as_str(), "yes");
    let script = page.elements_by_tag_name(page.root(), "script")[0];
    assert_eq!(page.ready_state(script).unwrap(), ReadyState::Complete);
    assert_eq!(client.current_window(), Some(window));
    assert_eq!(page.enclosing_window(), Some(window));
}

#[test]
fn test_javascript_can_be_disabled() {
    let options = ClientOptions {
        javascript_enabled: false,
        ..ClientOptions::default()
    };
    let (mut client, _) = client_with(
        options,
        &[(
            "http://test/",
            "<body><script>document.body.setAttribute('ran', 'yes')</script></body>",
        )],
    );

    let window = client.get_page("http://test/").unwrap();
    let page = client.page(window).unwrap();

    assert!(!page.is_script_enabled());
    assert!(!page.has_attribute(page.body().unwrap(), "ran").unwrap());
}

#[test]
fn test_external_scripts_are_fetched() {
    let (mut client, loader) = client(&[
        ("http://test/", r#"<body><script src="app.js"></script></body>"#),
        ("http://test/app.js", "document.body.id = 'from-app';"),
    ]);

    let window = client.get_page("http://test/").unwrap();

    assert!(client.page(window).unwrap().element_by_id("from-app").is_ok());
    assert_eq!(loader.requests().len(), 2);
}

#[test]
fn test_link_click_navigates_same_window() {
    let (mut client, _) = client(&[
        ("http://test/", r#"<a id=next href="next.html">next</a>"#),
        ("http://test/next.html", "<title>Next</title>"),
    ]);
    let window = client.get_page("http://test/").unwrap();
    let link = client.page(window).unwrap().element_by_id("next").unwrap();

    let shown = client.click(window, link).unwrap();

    assert_eq!(shown, window);
    assert_eq!(client.page(window).unwrap().title_text(), "Next");
    let history: Vec<&str> = client
        .window(window)
        .unwrap()
        .history()
        .iter()
        .map(url::Url::as_str)
        .collect();
    assert_eq!(history, vec!["http://test/", "http://test/next.html"]);

    client.go_back(window).unwrap();
    assert_eq!(client.page(window).unwrap().url().as_str(), "http://test/");
}

#[test]
fn test_targets_open_and_reuse_windows() {
    let (mut client, _) = client(&[
        (
            "http://test/",
            r#"<a id=blank href="a.html" target="_blank">a</a>
               <a id=named href="b.html" target="results">b</a>"#,
        ),
        ("http://test/a.html", "<title>A</title>"),
        ("http://test/b.html", "<title>B</title>"),
    ]);
    let main = client.get_page("http://test/").unwrap();
    let page = client.page(main).unwrap();
    let (blank, named) = (
        page.element_by_id("blank").unwrap(),
        page.element_by_id("named").unwrap(),
    );

    let opened = client.click(main, blank).unwrap();
    assert_ne!(opened, main);
    assert_eq!(client.page(opened).unwrap().title_text(), "A");

    let results = client.click(main, named).unwrap();
    assert_eq!(client.window(results).unwrap().name(), "results");
    assert_eq!(client.click(main, named).unwrap(), results);
    assert_eq!(client.windows().count(), 3);
    assert_eq!(client.page(main).unwrap().url().as_str(), "http://test/");
}

#[test]
fn test_post_form_sends_body() {
    let (mut client, loader) = client(&[
        (
            "http://test/",
            r#"<form id=f method=post action="login"><input name=user value="ann"></form>"#,
        ),
        ("http://test/login", "<title>Welcome</title>"),
    ]);
    let window = client.get_page("http://test/").unwrap();
    let form = client.page(window).unwrap().element_by_id("f").unwrap();

    client.submit(window, form).unwrap();

    let request = loader.requests().pop().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.body.as_deref(), Some("user=ann"));
    assert_eq!(client.page(window).unwrap().title_text(), "Welcome");
}

#[test]
fn test_frames_get_nested_windows() {
    let (mut client, _) = client(&[
        (
            "http://test/",
            r#"<iframe name=main src="a.html"></iframe><a id=go href="b.html" target=main>b</a>"#,
        ),
        ("http://test/a.html", "<title>A</title>"),
        ("http://test/b.html", "<title>B</title>"),
    ]);
    let top = client.get_page("http://test/").unwrap();

    let frame = client.window_by_name("main").unwrap();
    assert_eq!(client.window(frame).unwrap().parent(), Some(top));
    assert_eq!(client.page(frame).unwrap().title_text(), "A");
    assert_eq!(client.page(top).unwrap().frame_by_name("main").unwrap().window, frame);
    assert_eq!(client.top_window(frame).unwrap(), top);

    let link = client.page(top).unwrap().element_by_id("go").unwrap();
    assert_eq!(client.click(top, link).unwrap(), frame);
    assert_eq!(client.page(frame).unwrap().title_text(), "B");
    assert_eq!(client.page(top).unwrap().url().as_str(), "http://test/");
}

#[test]
fn test_replacing_a_page_discards_its_frames() {
    let (mut client, _) = client(&[
        ("http://test/", r#"<iframe name=side src="a.html"></iframe>"#),
        ("http://test/a.html", "<p>a</p>"),
        ("http://test/plain.html", "<p>plain</p>"),
    ]);
    let top = client.get_page("http://test/").unwrap();
    assert_eq!(client.windows().count(), 2);

    client.get_page("http://test/plain.html").unwrap();

    assert_eq!(client.windows().count(), 1);
    assert!(client.window_by_name("side").is_none());
    assert!(client.page(top).unwrap().frames().is_empty());
}

#[test]
fn test_closing_a_frame_window_deregisters_it() {
    let (mut client, _) = client(&[
        ("http://test/", r#"<iframe name=side src="about:blank"></iframe>"#),
    ]);
    let top = client.get_page("http://test/").unwrap();
    let frame = client.window_by_name("side").unwrap();

    client.close_window(frame).unwrap();

    assert!(client.page(top).unwrap().frames().is_empty());
    assert!(matches!(client.page(frame), Err(BrowserError::UnknownWindow(_))));
}

#[test]
fn test_frame_depth_is_limited() {
    let options = ClientOptions {
        max_frame_depth: 1,
        ..ClientOptions::default()
    };
    let (mut client, _) = client_with(
        options,
        &[
            ("http://test/", r#"<iframe src="loop.html"></iframe>"#),
            ("http://test/loop.html", r#"<iframe src="loop.html"></iframe>"#),
        ],
    );

    client.get_page("http://test/").unwrap();

    let urls: Vec<String> = client
        .windows()
        .map(|w| w.page().url().to_string())
        .collect();
    assert_eq!(
        urls,
        vec!["http://test/", "http://test/loop.html", "about:blank"]
    );
}

#[test]
fn test_data_urls_load_without_the_loader() {
    let (mut client, loader) = client(&[]);
    let window = client
        .get_page("data:text/html,%3Ctitle%3EInline%3C/title%3E")
        .unwrap();
    assert_eq!(client.page(window).unwrap().title_text(), "Inline");
    assert!(loader.requests().is_empty());
}

#[test]
fn test_script_navigation_is_followed() {
    let (mut client, _) = client(&[
        ("http://test/", "<script>location.href = 'moved.html';</script>"),
        ("http://test/moved.html", "<title>Moved</title>"),
    ]);
    let window = client.get_page("http://test/").unwrap();
    assert_eq!(client.page(window).unwrap().title_text(), "Moved");
}

#[test]
fn test_script_navigation_loop_is_reported() {
    let (mut client, _) = client(&[(
        "http://test/",
        "<script>location.href = 'http://test/';</script>",
    )]);
    assert!(matches!(
        client.get_page("http://test/"),
        Err(BrowserError::NavigationLoop(_))
    ));
}

#[test]
fn test_script_error_policy() {
    let pages = [(
        "http://test/",
        "<body><script>throw new Error('broken')</script><p id=after>x</p></body>",
    )];

    let (mut strict, _) = client(&pages);
    assert!(matches!(
        strict.get_page("http://test/"),
        Err(BrowserError::Dom(DomError::Script(_)))
    ));

    let lenient_options = ClientOptions {
        throw_on_script_error: false,
        ..ClientOptions::default()
    };
    let (mut lenient, _) = client_with(lenient_options, &pages);
    let window = lenient.get_page("http://test/").unwrap();
    assert!(lenient.page(window).unwrap().element_by_id("after").is_ok());
}

#[test]
fn test_missing_page_is_a_load_error() {
    let (mut client, _) = client(&[]);
    assert!(matches!(
        client.get_page("http://test/missing"),
        Err(BrowserError::Load(LoadError::NotFound(_)))
    ));
    assert!(matches!(
        client.get_page("not a url"),
        Err(BrowserError::InvalidUrl { .. })
    ));
}
