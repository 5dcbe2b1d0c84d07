//! Token styling
//!
//! A style is either a dotted chain of named operations such as
//! `"red.bold"` or `"bgBlue.white"`, resolved once into a composed
//! [`Styler`], or a caller supplied function.

use super::log_level::LogLevel;
use colored::{Color, ColoredString, Colorize};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Wraps a string in styling escape codes
pub type Styler = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How a token should be styled
#[derive(Clone)]
pub enum StyleSpec {
    /// Dotted chain of color and modifier names
    Chain(String),
    /// Caller supplied styling function
    Custom(Styler),
}

impl StyleSpec {
    pub fn custom<F>(styler: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        StyleSpec::Custom(Arc::new(styler))
    }

    /// Compose this spec into a styling function
    pub fn resolve(&self) -> Styler {
        match self {
            StyleSpec::Chain(chain) => resolve_chain(chain),
            StyleSpec::Custom(styler) => Arc::clone(styler),
        }
    }
}

impl fmt::Debug for StyleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSpec::Chain(chain) => f.debug_tuple("Chain").field(chain).finish(),
            StyleSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for StyleSpec {
    fn from(chain: &str) -> Self {
        StyleSpec::Chain(chain.to_string())
    }
}

impl From<String> for StyleSpec {
    fn from(chain: String) -> Self {
        StyleSpec::Chain(chain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StyleOp {
    Foreground(Color),
    Background(Color),
    Bold,
    Dimmed,
    Italic,
    Underline,
    Blink,
    Reversed,
    Hidden,
    Strikethrough,
}

impl StyleOp {
    fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let op = match lower.as_str() {
            "bold" => StyleOp::Bold,
            "dim" | "dimmed" => StyleOp::Dimmed,
            "italic" => StyleOp::Italic,
            "underline" => StyleOp::Underline,
            "blink" => StyleOp::Blink,
            "inverse" | "reversed" => StyleOp::Reversed,
            "hidden" => StyleOp::Hidden,
            "strikethrough" => StyleOp::Strikethrough,
            _ => match lower.strip_prefix("bg") {
                Some(color) => StyleOp::Background(parse_color(color)?),
                None => StyleOp::Foreground(parse_color(&lower)?),
            },
        };
        Some(op)
    }

    fn apply(self, text: ColoredString) -> ColoredString {
        match self {
            StyleOp::Foreground(color) => text.color(color),
            StyleOp::Background(color) => text.on_color(color),
            StyleOp::Bold => text.bold(),
            StyleOp::Dimmed => text.dimmed(),
            StyleOp::Italic => text.italic(),
            StyleOp::Underline => text.underline(),
            StyleOp::Blink => text.blink(),
            StyleOp::Reversed => text.reversed(),
            StyleOp::Hidden => text.hidden(),
            StyleOp::Strikethrough => text.strikethrough(),
        }
    }
}

/// Accepts `red`, `redBright`, `brightRed`, `gray`/`grey`
fn parse_color(name: &str) -> Option<Color> {
    let (base, bright) = match name
        .strip_suffix("bright")
        .or_else(|| name.strip_prefix("bright"))
    {
        Some(base) => (base, true),
        None => (name, false),
    };

    let color = match (base, bright) {
        ("black", false) => Color::Black,
        ("red", false) => Color::Red,
        ("green", false) => Color::Green,
        ("yellow", false) => Color::Yellow,
        ("blue", false) => Color::Blue,
        ("magenta", false) => Color::Magenta,
        ("cyan", false) => Color::Cyan,
        ("white", false) => Color::White,
        ("gray" | "grey", false) | ("black", true) => Color::BrightBlack,
        ("red", true) => Color::BrightRed,
        ("green", true) => Color::BrightGreen,
        ("yellow", true) => Color::BrightYellow,
        ("blue", true) => Color::BrightBlue,
        ("magenta", true) => Color::BrightMagenta,
        ("cyan", true) => Color::BrightCyan,
        ("white", true) => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

/// Resolve a dotted style chain. Unknown names are ignored.
pub fn resolve_chain(chain: &str) -> Styler {
    let ops: Vec<StyleOp> = chain
        .split('.')
        .filter(|name| !name.trim().is_empty())
        .filter_map(StyleOp::parse)
        .collect();

    if ops.is_empty() {
        return Arc::new(|text: &str| text.to_string());
    }

    Arc::new(move |text: &str| {
        ops.iter()
            .fold(text.normal(), |styled, op| op.apply(styled))
            .to_string()
    })
}

/// Styler for a single color, used for per-level defaults
pub fn color_styler(color: Color) -> Styler {
    Arc::new(move |text: &str| text.color(color).to_string())
}

/// Built-in style for a token when the level configuration names none
pub fn default_styler(token: &str, level: LogLevel) -> Option<Styler> {
    match token {
        "level" | "label" => Some(color_styler(level.color_code())),
        "name" => Some(resolve_chain("magenta")),
        "duration" | "elapsed" => Some(resolve_chain("cyan")),
        "date" | "file" | "line" | "column" => Some(resolve_chain("gray")),
        _ => None,
    }
}

fn ansi_pattern() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ANSI escape pattern is valid")
    })
}

/// Remove styling escape sequences
pub fn strip_ansi(text: &str) -> String {
    ansi_pattern().replace_all(text, "").into_owned()
}
