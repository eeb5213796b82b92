//! # Theme Module
//!
//! Resolves the desktop's appearance preferences (dark mode and the preferred
//! interface and monospace fonts) and holds the two fixed color palettes the
//! rendered document is styled with.
//!
//! Resolution never fails: a missing preference store, schema or key falls
//! back to [`ThemeAppearance::default`].

/// Preference schema that carries the interface appearance keys.
pub const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";

const COLOR_SCHEME_KEY: &str = "color-scheme";
const FONT_NAME_KEY: &str = "font-name";
const MONOSPACE_FONT_NAME_KEY: &str = "monospace-font-name";

pub const DEFAULT_FONT_NAME: &str = "Sans 11";
pub const DEFAULT_MONOSPACE_FONT_NAME: &str = "Monospace 11";

/// Appearance preferences of the desktop session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeAppearance {
    /// Whether the desktop asks applications for a dark style
    pub prefers_dark: bool,
    /// Font descriptor for body text, e.g. `"Cantarell 11"`
    pub font_name: String,
    /// Font descriptor for code, e.g. `"Source Code Pro 10"`
    pub monospace_font_name: String,
}

impl Default for ThemeAppearance {
    fn default() -> Self {
        Self {
            prefers_dark: false,
            font_name: DEFAULT_FONT_NAME.to_string(),
            monospace_font_name: DEFAULT_MONOSPACE_FONT_NAME.to_string(),
        }
    }
}

impl ThemeAppearance {
    /// The palette matching this appearance.
    pub fn palette(&self) -> &'static Palette {
        if self.prefers_dark {
            &Palette::DARK
        } else {
            &Palette::LIGHT
        }
    }

    /// Value for the CSS `color-scheme` property.
    pub fn color_scheme(&self) -> &'static str {
        if self.prefers_dark {
            "dark"
        } else {
            "light"
        }
    }
}

/// Read-only view of the desktop preference store.
///
/// `string` returns `None` when the key does not exist in the interface
/// schema. An existing key with an empty value returns `Some("")`.
pub trait PreferenceStore {
    fn string(&self, key: &str) -> Option<String>;

    /// The toolkit's legacy "prefer dark theme" flag, `None` when the toolkit
    /// does not expose it.
    fn prefers_dark_theme(&self) -> Option<bool>;
}

/// Resolves the appearance from an optional preference store.
pub fn resolve_appearance_from(store: Option<&dyn PreferenceStore>) -> ThemeAppearance {
    let mut appearance = ThemeAppearance::default();
    let Some(store) = store else {
        return appearance;
    };

    appearance.prefers_dark = match store.string(COLOR_SCHEME_KEY) {
        Some(scheme) => scheme == "prefer-dark",
        None => store.prefers_dark_theme().unwrap_or(false),
    };

    if let Some(font) = store.string(FONT_NAME_KEY).filter(|s| !s.is_empty()) {
        appearance.font_name = font;
    }
    if let Some(font) = store
        .string(MONOSPACE_FONT_NAME_KEY)
        .filter(|s| !s.is_empty())
    {
        appearance.monospace_font_name = font;
    }

    appearance
}

/// Resolves the appearance from the host desktop.
///
/// The legacy dark-theme flag is only readable once the toolkit is
/// initialized, so call this after the event loop exists.
pub fn resolve_appearance() -> ThemeAppearance {
    let appearance = match desktop::open() {
        Some(store) => resolve_appearance_from(Some(&store)),
        None => resolve_appearance_from(None),
    };
    log::debug!("resolved appearance: {appearance:?}");
    appearance
}

#[cfg(target_os = "linux")]
mod desktop {
    use super::{PreferenceStore, INTERFACE_SCHEMA};
    use gtk::gio;
    use gtk::prelude::*;

    const PREFER_DARK_PROPERTY: &str = "gtk-application-prefer-dark-theme";

    /// GSettings-backed store for the interface schema.
    pub struct GSettingsStore {
        schema: gio::SettingsSchema,
        settings: gio::Settings,
    }

    /// Opens the interface schema, `None` when no schema source is installed
    /// or the schema is unknown.
    pub fn open() -> Option<GSettingsStore> {
        let source = gio::SettingsSchemaSource::default()?;
        let Some(schema) = source.lookup(INTERFACE_SCHEMA, true) else {
            log::debug!("settings schema {INTERFACE_SCHEMA} not installed");
            return None;
        };
        let settings = gio::Settings::new(INTERFACE_SCHEMA);
        Some(GSettingsStore { schema, settings })
    }

    impl PreferenceStore for GSettingsStore {
        fn string(&self, key: &str) -> Option<String> {
            if !self.schema.has_key(key) {
                return None;
            }
            Some(self.settings.string(key).to_string())
        }

        fn prefers_dark_theme(&self) -> Option<bool> {
            let settings = gtk::Settings::default()?;
            settings.find_property(PREFER_DARK_PROPERTY)?;
            Some(settings.property::<bool>(PREFER_DARK_PROPERTY))
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod desktop {
    use super::PreferenceStore;

    /// Placeholder for platforms without a GSettings store; never opened.
    pub enum NoStore {}

    pub fn open() -> Option<NoStore> {
        None
    }

    impl PreferenceStore for NoStore {
        fn string(&self, _key: &str) -> Option<String> {
            match *self {}
        }

        fn prefers_dark_theme(&self) -> Option<bool> {
            match *self {}
        }
    }
}

/// Colors of the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub page_bg: &'static str,
    pub text: &'static str,
    /// Background of code blocks
    pub surface_bg: &'static str,
    pub blockquote_text: &'static str,
    pub blockquote_border: &'static str,
    pub link: &'static str,
    pub table_border: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        page_bg: "#f6f7f8",
        text: "#1b1b1b",
        surface_bg: "#eceff3",
        blockquote_text: "#364152",
        blockquote_border: "#a7b3c3",
        link: "#005f9e",
        table_border: "#c8d0da",
    };

    pub const DARK: Palette = Palette {
        page_bg: "#1f2126",
        text: "#e6e8ec",
        surface_bg: "#2b3037",
        blockquote_text: "#b8c0cc",
        blockquote_border: "#4d5766",
        link: "#78b3ff",
        table_border: "#586171",
    };
}
