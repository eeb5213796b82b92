//! # Font Descriptor Module
//!
//! Translates desktop font descriptors such as `"Cantarell Bold Italic 11"`
//! into CSS declarations for the rendered document.
//!
//! Descriptors follow the usual desktop grammar: an optional family list,
//! any number of style options, then an optional size. The size may carry a
//! `px` suffix to mark it as an absolute pixel size, otherwise it is in points.

use std::fmt;
use std::str::FromStr;

/// Size used when a descriptor has no usable size.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Numeric weight at or above which a font renders as bold.
const BOLD_WEIGHT: u16 = 700;

/// Regular weight, also the weight of a descriptor without weight options.
const NORMAL_WEIGHT: u16 = 400;

/// Slant of a font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Oblique,
    Italic,
}

/// A parsed font descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontDescriptor {
    /// Comma separated family list, `None` when the descriptor names none
    pub family: Option<String>,
    /// Declared size, `0.0` when the descriptor has none
    pub size: f64,
    /// Whether the size was given in pixels rather than points
    pub size_is_absolute: bool,
    pub style: FontStyle,
    /// Numeric weight on the 100..=1000 scale
    pub weight: u16,
}

/// What a single style-option word sets on the descriptor.
enum StyleOption {
    Style(FontStyle),
    Weight(u16),
    /// Variant, stretch and gravity words: recognized so they are not taken
    /// for part of the family, but irrelevant to the CSS we emit.
    Ignored,
}

/// Matches a style-option word. Matching ignores case and hyphens, so
/// `SemiBold`, `semi-bold` and `Semi-Bold` are the same option.
fn style_option(word: &str) -> Option<StyleOption> {
    let key: String = word
        .chars()
        .filter(|&c| c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let option = match key.as_str() {
        "normal" | "roman" => StyleOption::Style(FontStyle::Normal),
        "oblique" => StyleOption::Style(FontStyle::Oblique),
        "italic" => StyleOption::Style(FontStyle::Italic),

        "thin" => StyleOption::Weight(100),
        "ultralight" | "extralight" => StyleOption::Weight(200),
        "light" => StyleOption::Weight(300),
        "semilight" | "demilight" => StyleOption::Weight(350),
        "book" => StyleOption::Weight(380),
        "regular" => StyleOption::Weight(400),
        "medium" => StyleOption::Weight(500),
        "semibold" | "demibold" => StyleOption::Weight(600),
        "bold" => StyleOption::Weight(700),
        "ultrabold" | "extrabold" => StyleOption::Weight(800),
        "heavy" | "black" => StyleOption::Weight(900),
        "ultraheavy" | "extraheavy" | "ultrablack" | "extrablack" => StyleOption::Weight(1000),

        "smallcaps" | "allsmallcaps" | "petitecaps" | "allpetitecaps" | "unicase"
        | "titlecaps" | "ultracondensed" | "extracondensed" | "condensed"
        | "semicondensed" | "semiexpanded" | "expanded" | "extraexpanded"
        | "ultraexpanded" | "notrotated" | "south" | "upsidedown" | "north"
        | "rotatedleft" | "east" | "rotatedright" | "west" => StyleOption::Ignored,

        _ => return None,
    };
    Some(option)
}

/// Parses a trailing size word: a non-negative decimal, optionally `px`.
fn parse_size(word: &str) -> Option<(f64, bool)> {
    let (number, absolute) = match word.strip_suffix("px") {
        Some(number) => (number, true),
        None => (word, false),
    };
    // Reject forms f64 accepts but a descriptor never spells, like "inf".
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let size = number.parse::<f64>().ok()?;
    Some((size, absolute))
}

impl FontDescriptor {
    /// Parses a descriptor string. Unrecognized input never fails: whatever
    /// cannot be read as a size or style option is taken as the family.
    pub fn parse(descriptor: &str) -> Self {
        let mut words: Vec<&str> = descriptor.split_whitespace().collect();

        let mut parsed = FontDescriptor {
            weight: NORMAL_WEIGHT,
            ..Default::default()
        };

        if let Some((size, absolute)) = words
            .last()
            .and_then(|word| parse_size(word.trim_end_matches(',')))
        {
            parsed.size = size;
            parsed.size_is_absolute = absolute;
            words.pop();
        }

        // A trailing comma closes the family list, so options stop there.
        while let Some(option) = words
            .last()
            .filter(|word| !word.ends_with(','))
            .and_then(|word| style_option(word))
        {
            match option {
                StyleOption::Style(style) => parsed.style = style,
                StyleOption::Weight(weight) => parsed.weight = weight,
                StyleOption::Ignored => {}
            }
            words.pop();
        }

        let family = words
            .join(" ")
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if !family.is_empty() {
            parsed.family = Some(family);
        }

        parsed
    }

    /// Translates the descriptor to CSS, using `fallback_family` when the
    /// descriptor names no family.
    pub fn to_css(&self, fallback_family: &str) -> FontCss {
        let family = self
            .family
            .as_deref()
            .filter(|family| !family.is_empty())
            .unwrap_or(fallback_family)
            .to_string();

        let size = if self.size > 0.0 {
            self.size
        } else {
            DEFAULT_FONT_SIZE
        };

        FontCss {
            family,
            size,
            size_unit: if self.size_is_absolute {
                SizeUnit::Px
            } else {
                SizeUnit::Pt
            },
            italic: matches!(self.style, FontStyle::Italic | FontStyle::Oblique),
            bold: self.weight >= BOLD_WEIGHT,
        }
    }
}

impl FromStr for FontDescriptor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Px,
    Pt,
}

impl SizeUnit {
    fn as_str(self) -> &'static str {
        match self {
            SizeUnit::Px => "px",
            SizeUnit::Pt => "pt",
        }
    }
}

/// CSS font declarations derived from a [`FontDescriptor`].
///
/// Weights collapse to 400 or 700; intermediate weights are not preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct FontCss {
    pub family: String,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub italic: bool,
    pub bold: bool,
}

impl fmt::Display for FontCss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "font-family:'{}';font-size:{:.1}{};font-style:{};font-weight:{};",
            escape_css_string(&self.family),
            self.size,
            self.size_unit.as_str(),
            if self.italic { "italic" } else { "normal" },
            if self.bold { 700 } else { 400 },
        )
    }
}

fn escape_css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Converts a font descriptor string straight to a CSS declaration string.
pub fn font_descriptor_to_css(descriptor: &str, fallback_family: &str) -> String {
    FontDescriptor::parse(descriptor)
        .to_css(fallback_family)
        .to_string()
}
