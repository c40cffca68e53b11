//! Document style bundle.
//!
//! A [`DocumentStyle`] maps every [`TextRole`] and [`BlockRole`] to concrete
//! attributes. Renderers never hard-code visual values: they ask the style
//! for a [`CharStyle`] or [`BlockStyle`] and only add structure (links,
//! emphasis, nesting) on top.
//!
//! Auto themes derive their palette from the page host, so every site gets a
//! stable color scheme of its own.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::color::Color;
use crate::model::{BlockRole, BlockStyle, CharStyle, TextRole};

/// Concrete character attributes for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFormat {
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub point_size: f64,
    /// Foreground color.
    pub color: Color,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Fixed-width font.
    pub monospace: bool,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            point_size: 10.0,
            color: Color::BLACK,
            bold: false,
            italic: false,
            monospace: false,
        }
    }
}

impl TextFormat {
    fn sized(point_size: f64, bold: bool) -> Self {
        Self {
            point_size,
            bold,
            ..Self::default()
        }
    }

    fn monospace() -> Self {
        Self {
            font_family: "monospace".to_string(),
            monospace: true,
            ..Self::default()
        }
    }

    fn colored(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// How the palette is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ThemeKind {
    /// Use the configured colors as they are.
    #[default]
    Fixed,
    /// Light background, colors derived from the host.
    AutoLight,
    /// Dark background, colors derived from the host.
    AutoDark,
}

/// Full style bundle consumed by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    /// Palette selection.
    pub theme: ThemeKind,
    /// Page background.
    pub background: Color,
    /// Body text.
    pub standard: TextFormat,
    /// First-level headings.
    pub h1: TextFormat,
    /// Second-level headings.
    pub h2: TextFormat,
    /// Third-level (and deeper) headings.
    pub h3: TextFormat,
    /// Preformatted text.
    pub preformatted: TextFormat,
    /// Quoted text.
    pub blockquote: TextFormat,
    /// Same-host links.
    pub internal_link: TextFormat,
    /// Other-host links.
    pub external_link: TextFormat,
    /// Other-scheme links.
    pub cross_protocol_link: TextFormat,
    /// Horizontal page margin, in points.
    pub margin_h: f64,
    /// Vertical page margin, in points.
    pub margin_v: f64,
    /// Width of one indentation level, in points.
    pub indent_size: f64,
    /// Space after ordinary paragraphs, in points.
    pub paragraph_spacing: f64,
    /// Space around headings, in points.
    pub heading_spacing: f64,
    /// Center the first level-1 heading of a page.
    pub centre_h1: bool,
    /// Prefix drawn before same-host gemtext links.
    pub internal_link_prefix: String,
    /// Prefix drawn before other-host gemtext links.
    pub external_link_prefix: String,
    /// Replace straight double quotes with typographic ones.
    pub fancy_quotes: bool,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            theme: ThemeKind::Fixed,
            background: Color::WHITE,
            standard: TextFormat::default(),
            h1: TextFormat::sized(20.0, true),
            h2: TextFormat::sized(16.0, true),
            h3: TextFormat::sized(12.0, true),
            preformatted: TextFormat::monospace(),
            blockquote: TextFormat {
                italic: true,
                ..TextFormat::default()
            },
            internal_link: TextFormat::colored(Color::rgb(0x00, 0x80, 0xff)),
            external_link: TextFormat::colored(Color::rgb(0x00, 0x00, 0xff)),
            cross_protocol_link: TextFormat::colored(Color::rgb(0x80, 0x00, 0xff)),
            margin_h: 30.0,
            margin_v: 55.0,
            indent_size: 15.0,
            paragraph_spacing: 4.0,
            heading_spacing: 8.0,
            centre_h1: false,
            internal_link_prefix: "→ ".to_string(),
            external_link_prefix: "⇒ ".to_string(),
            fancy_quotes: false,
        }
    }
}

impl DocumentStyle {
    /// Attributes configured for a role.
    #[must_use]
    pub const fn format(&self, role: TextRole) -> &TextFormat {
        match role {
            TextRole::Standard => &self.standard,
            TextRole::Heading1 => &self.h1,
            TextRole::Heading2 => &self.h2,
            TextRole::Heading3 => &self.h3,
            TextRole::Preformatted => &self.preformatted,
            TextRole::BlockQuote => &self.blockquote,
            TextRole::InternalLink => &self.internal_link,
            TextRole::ExternalLink => &self.external_link,
            TextRole::CrossProtocolLink => &self.cross_protocol_link,
        }
    }

    /// Character style for a role, without a link target.
    #[must_use]
    pub fn char_style(&self, role: TextRole) -> CharStyle {
        let format = self.format(role);
        CharStyle {
            role,
            color: format.color,
            font_family: format.font_family.clone(),
            point_size: format.point_size,
            bold: format.bold,
            italic: format.italic,
            monospace: format.monospace,
            anchor: None,
        }
    }

    /// Block style for a role at the top level (no list, no quote).
    #[must_use]
    pub fn block_style(&self, role: BlockRole) -> BlockStyle {
        let (margin_top, margin_bottom) = match role {
            BlockRole::Heading(_) => (self.heading_spacing, self.heading_spacing / 2.0),
            BlockRole::Preformatted => (0.0, 0.0),
            BlockRole::Standard | BlockRole::BlockQuote => (0.0, self.paragraph_spacing),
        };
        BlockStyle {
            role,
            margin_top,
            margin_bottom,
            ..BlockStyle::default()
        }
    }

    /// Concrete style for a page served by `host`.
    ///
    /// Fixed themes are returned unchanged. Auto themes replace the
    /// background, heading and link colors with a palette seeded by the
    /// host name; pages without a host use the seed of the empty string.
    #[must_use]
    pub fn derive(&self, host: Option<&str>) -> Self {
        let dark = match self.theme {
            ThemeKind::Fixed => return self.clone(),
            ThemeKind::AutoLight => false,
            ThemeKind::AutoDark => true,
        };

        let seed = fnv1a(host.unwrap_or_default().as_bytes());
        let hue = f64::from(u16::try_from(seed % 360).unwrap_or_default());
        let saturation = f64::from(u8::try_from((seed >> 16) % 40).unwrap_or_default()) / 100.0 + 0.5;

        let (bg_light, fg_light, text) = if dark {
            (0.10, 0.70, Color::rgb(0xdd, 0xdd, 0xdd))
        } else {
            (0.96, 0.30, Color::rgb(0x22, 0x22, 0x22))
        };

        let mut style = self.clone();
        style.background = Color::from_hsl(hue, saturation * 0.4, bg_light);
        style.standard.color = text;
        style.blockquote.color = text;
        style.preformatted.color = text;
        style.h1.color = Color::from_hsl(hue, saturation, fg_light);
        style.h2.color = Color::from_hsl(hue + 20.0, saturation, fg_light);
        style.h3.color = Color::from_hsl(hue + 40.0, saturation, fg_light);
        style.internal_link.color = Color::from_hsl(hue + 180.0, saturation, fg_light);
        style.external_link.color = Color::from_hsl(hue + 210.0, saturation, fg_light);
        style.cross_protocol_link.color = Color::from_hsl(hue + 240.0, saturation, fg_light);
        style
    }
}

/// 64-bit FNV-1a, stable across runs and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}
