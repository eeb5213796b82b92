//! # Application Module
//!
//! Loads the markdown file, composes the themed document and shows it in a
//! native window with an embedded web view.

use crate::error::ViewerError;
use crate::markdown::{compose_document, MarkdownRenderer};
use crate::theme::{self, ThemeAppearance};
use crate::uri::base_uri_for_file;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop};
use tao::platform::run_return::EventLoopExtRunReturn;
use tao::window::{Window, WindowBuilder};
use wry::{WebView, WebViewBuilder};

/// Prefix of the window title; the file name follows it.
pub const APP_NAME: &str = "mdview";

const WINDOW_WIDTH: f64 = 1100.0;
const WINDOW_HEIGHT: f64 = 760.0;

/// A markdown file converted and ready to be shown.
pub struct MarkdownViewerApp {
    /// Path as given on the command line
    path: PathBuf,
    /// Window and document title
    title: String,
    /// Converted body, without the surrounding document
    body_html: String,
}

impl MarkdownViewerApp {
    /// Reads and converts the markdown file at `path`.
    pub fn load_file(path: impl Into<PathBuf>) -> Result<Self, ViewerError> {
        let path = path.into();
        log::info!("loading {}", path.display());

        let source = fs::read(&path).map_err(|source| ViewerError::Read {
            path: path.clone(),
            source,
        })?;
        let body_html = MarkdownRenderer::new().render_bytes(&source);
        let title = window_title(&path);

        Ok(Self {
            path,
            title,
            body_html,
        })
    }

    /// Builds the document to show for the given appearance.
    pub fn compose(&self, appearance: &ThemeAppearance) -> RenderedDocument {
        let base_uri = base_uri_for_file(&self.path);
        match &base_uri {
            Some(uri) => log::debug!("base uri: {uri}"),
            None => log::warn!(
                "no base uri for {}, relative links will not resolve",
                self.path.display()
            ),
        }

        RenderedDocument {
            html: compose_document(&self.title, &self.body_html, appearance),
            title: self.title.clone(),
            base_uri,
        }
    }

    /// Opens the viewer window and blocks until it is closed, returning the
    /// event loop's exit status.
    pub fn run(self) -> Result<i32> {
        // Creating the event loop initializes the toolkit, which the theme
        // lookup needs for the legacy dark-theme flag.
        let event_loop = EventLoop::new();
        let appearance = theme::resolve_appearance();
        self.compose(&appearance).show(event_loop)
    }
}

/// A complete HTML document and the URI its relative references resolve
/// against.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub title: String,
    pub html: String,
    pub base_uri: Option<String>,
}

impl RenderedDocument {
    /// Shows the document in a new window and runs `event_loop` until the
    /// window is closed.
    pub fn show(self, mut event_loop: EventLoop<()>) -> Result<i32> {
        let window = WindowBuilder::new()
            .with_title(self.title.as_str())
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)
            .context("create window")?;
        set_icon_name(&window);

        let _webview = build_webview(&window, self.html, self.base_uri.as_deref())?;

        let status = event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Wait;
            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } = event
            {
                *control_flow = ControlFlow::Exit;
            }
        });
        Ok(status)
    }
}

/// `"mdview - <file name>"`, or just the app name when the path has no file
/// name component.
fn window_title(path: &Path) -> String {
    match path.file_name() {
        Some(name) => format!("{APP_NAME} - {}", name.to_string_lossy()),
        None => APP_NAME.to_string(),
    }
}

#[cfg(target_os = "linux")]
fn set_icon_name(window: &Window) {
    use gtk::prelude::GtkWindowExt;
    use tao::platform::unix::WindowExtUnix;

    window.gtk_window().set_icon_name(Some(APP_NAME));
}

#[cfg(not(target_os = "linux"))]
fn set_icon_name(_window: &Window) {}

/// Builds the web view inside the window's GTK container and loads the
/// document through WebKitGTK, which accepts a base URI alongside the HTML.
#[cfg(target_os = "linux")]
fn build_webview(window: &Window, html: String, base_uri: Option<&str>) -> Result<WebView> {
    use tao::platform::unix::WindowExtUnix;
    use webkit2gtk::WebViewExt;
    use wry::{WebViewBuilderExtUnix, WebViewExtUnix};

    let vbox = window
        .default_vbox()
        .ok_or_else(|| anyhow!("window has no GTK container"))?;
    let webview = WebViewBuilder::new()
        .build_gtk(vbox)
        .map_err(|e| anyhow!("build webview: {e}"))?;
    webview.webview().load_html(&html, base_uri);
    Ok(webview)
}

/// Other platforms have no base URI hook, so relative references only
/// resolve where the platform web view allows it.
#[cfg(not(target_os = "linux"))]
fn build_webview(window: &Window, html: String, _base_uri: Option<&str>) -> Result<WebView> {
    WebViewBuilder::new()
        .with_html(html)
        .build(window)
        .map_err(|e| anyhow!("build webview: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(target_os = "linux")]
    use serial_test::serial;

    #[test]
    fn title_uses_file_name() {
        assert_eq!(
            window_title(Path::new("/home/me/docs/README.md")),
            "mdview - README.md"
        );
        assert_eq!(window_title(Path::new("notes.md")), "mdview - notes.md");
        assert_eq!(window_title(Path::new("/")), "mdview");
    }

    #[test]
    fn load_file_converts_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hi.md");
        fs::write(&path, "# Hi\n\nSome *text*.\n").unwrap();

        let app = MarkdownViewerApp::load_file(&path).unwrap();
        assert_eq!(app.title, "mdview - hi.md");
        assert!(app.body_html.contains("<h1>Hi</h1>"));
        assert!(app.body_html.contains("<em>text</em>"));
    }

    #[test]
    fn compose_builds_document_and_base_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hi.md");
        fs::write(&path, "# Hi\n\n![logo](img/logo.png)\n").unwrap();

        let app = MarkdownViewerApp::load_file(&path).unwrap();
        let doc = app.compose(&ThemeAppearance::default());
        assert_eq!(doc.title, "mdview - hi.md");
        assert!(doc.html.contains("<title>mdview - hi.md</title>"));
        assert!(doc.html.contains(&app.body_html));
        assert!(doc.html.contains("src=\"img/logo.png\""));

        let base = url::Url::parse(doc.base_uri.as_deref().unwrap()).unwrap();
        assert_eq!(base.join("hi.md").unwrap().to_file_path().unwrap(), path);
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial(cwd)]
    fn compose_without_base_uri_still_renders() {
        let app = MarkdownViewerApp {
            path: PathBuf::from("notes.md"),
            title: window_title(Path::new("notes.md")),
            body_html: "<p><img src=\"a.png\"></p>\n".to_string(),
        };

        let original = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        fs::remove_dir(dir.path()).unwrap();
        let doc = app.compose(&ThemeAppearance::default());
        std::env::set_current_dir(&original).unwrap();

        assert_eq!(doc.base_uri, None);
        assert!(doc.html.starts_with("<!doctype html>"));
        assert!(doc.html.contains("<p><img src=\"a.png\"></p>"));
        assert!(doc.html.ends_with("</body></html>"));
    }

    #[test]
    fn load_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.md");

        let err = MarkdownViewerApp::load_file(&path).err().unwrap();
        assert!(matches!(err, ViewerError::Read { .. }));
        assert!(err.to_string().starts_with("Failed to read '"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn load_file_shows_latin1_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.md");
        fs::write(&path, b"# Caf\xe9\n\nna\xefve\n").unwrap();

        let app = MarkdownViewerApp::load_file(&path).unwrap();
        assert!(app.body_html.contains("<h1>Caf\u{fffd}</h1>"));
        assert!(app.body_html.contains("<p>na\u{fffd}ve</p>"));
    }
}
