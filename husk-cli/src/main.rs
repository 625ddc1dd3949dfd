//! Husk CLI
//!
//! Loads a page headlessly, optionally clicks elements, and prints the
//! resulting page as XML, text or its tab order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use husk_browser::{ClientOptions, WebClient};
use husk_dom::{Page, WindowId};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Husk - headless page emulation from the terminal
#[derive(Parser, Debug)]
#[command(name = "husk")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print a page as XML
    husk https://example.com

    # Print the text a reader would see
    husk --format text ./index.html

    # Click two elements by id, then show where we ended up
    husk --click accept --click submit ./form.html

    # Parse inline HTML with scripting off
    husk --no-js --html '<a href="/x">x</a>'

Set RUST_LOG=husk=debug to trace navigation and events.
"#)]
struct Cli {
    /// Path to an HTML file or a URL to load
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Parse this HTML string instead of loading a file or URL
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// What to print once the page has loaded
    #[arg(short, long, value_enum, default_value_t = Format::Xml)]
    format: Format,

    /// Click the element with this id (repeatable, applied in order)
    #[arg(short, long, value_name = "ID")]
    click: Vec<String>,

    /// Disable JavaScript
    #[arg(long)]
    no_js: bool,

    /// Read client options from a JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// The page serialized as XML
    Xml,
    /// The rendered text of the page
    Text,
    /// Focusable elements in tab order
    TabOrder,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut options = match &cli.config {
        Some(path) => ClientOptions::from_json_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => ClientOptions::default(),
    };
    if cli.no_js {
        options.javascript_enabled = false;
    }

    let mut client = WebClient::new(options);
    let mut window = load(&mut client, &cli)?;

    for id in &cli.click {
        let element = client
            .page(window)?
            .element_by_id(id)
            .with_context(|| format!("no element with id {id:?} to click"))?;
        window = client
            .click(window, element)
            .with_context(|| format!("clicking #{id}"))?;
        eprintln!(
            "{} #{id} -> {}",
            "clicked".green(),
            client.page(window)?.url().dimmed()
        );
    }

    let page = client.page(window)?;
    match cli.format {
        Format::Xml => print!("{}", page.as_xml()),
        Format::Text => println!("{}", page.as_text()),
        Format::TabOrder => print_tab_order(page)?,
    }
    Ok(())
}

/// Load the page named on the command line into a fresh window.
fn load(client: &mut WebClient, cli: &Cli) -> Result<WindowId> {
    if let Some(html) = &cli.html {
        let window = client.open_window("");
        let url = Url::parse("about:blank")?;
        client.load_html(window, html, url)?;
        return Ok(window);
    }
    let Some(path) = &cli.path else {
        anyhow::bail!("a file path, URL, or --html is required");
    };
    let url = match Url::parse(path) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let absolute = std::fs::canonicalize(path)
                .with_context(|| format!("cannot open {path}"))?;
            Url::from_file_path(&absolute)
                .map_err(|()| anyhow::anyhow!("{} is not a valid file path", absolute.display()))?
        }
        Err(err) => return Err(err).with_context(|| format!("invalid URL {path:?}")),
    };
    client
        .get_page(url.as_str())
        .with_context(|| format!("loading {url}"))
}

/// Print focusable elements in the order Tab visits them.
fn print_tab_order(page: &Page) -> Result<()> {
    let elements = page.tabbable_elements();
    if elements.is_empty() {
        println!("{}", "no focusable elements".dimmed());
        return Ok(());
    }
    for (position, element) in elements.into_iter().enumerate() {
        let name = page.node_name(element)?.to_ascii_lowercase();
        let id = page.get_attribute(element, "id")?;
        let tab_index = page.get_attribute(element, "tabindex")?;
        print!("{:>3}. {}", position + 1, name.cyan());
        if !id.as_str().is_empty() {
            print!(" #{}", id.as_str().yellow());
        }
        if !tab_index.as_str().is_empty() {
            print!(" {}", format!("tabindex={}", tab_index.as_str()).dimmed());
        }
        println!();
    }
    Ok(())
}
