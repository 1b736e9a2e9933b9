//! Markup rendering for generated condition text.
//!
//! Condition text carries a tiny tag grammar:
//!
//! | Tag | Form |
//! |---|---|
//! | font-open | `[font=NAME]` |
//! | font-close | `[/font]` |
//! | color-open | `[color=#RRGGBB]` or `[color=#AARRGGBB]` |
//! | color-close | `[/color]` |
//!
//! [`render`] drops font tags and turns color spans into 24-bit ANSI
//! foreground sequences so the bars can be previewed in a terminal. Rendering
//! never fails: tags that cannot be resolved stay in the output verbatim.
//!
//! ```
//! use blockbar::markup::render;
//!
//! assert_eq!(
//!     render("Leading [color=#ABCDEF]Colored[/color] Trailing"),
//!     "Leading \x1b[38;2;171;205;239mColored\x1b[0m Trailing"
//! );
//! ```

use regex::Regex;
use smallvec::SmallVec;
use std::sync::LazyLock;

use crate::color::{ANSI_RESET, ColorTriplet};

static FONT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[font=[^\]]+\]").expect("invalid regex"));

const FONT_CLOSE: &str = "[/font]";

// Well-formed open, close, or the start of an open tag that failed to parse.
// Alternation is leftmost-first, so the malformed arm only wins when the
// well-formed one cannot match at the same position.
static COLOR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[color=#([0-9A-Fa-f]{8}|[0-9A-Fa-f]{6})\]|\[/color\]|\[color=")
        .expect("invalid regex")
});

static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("invalid regex"));

/// How resolved color spans are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOutput {
    /// `ESC[38;2;R;G;Bm` ... `ESC[0m`.
    #[default]
    TrueColor,
    /// Only the span's inner text.
    None,
}

/// A lexical unit of color markup.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    ColorOpen { tag: &'a str, color: ColorTriplet },
    ColorClose(&'a str),
    /// `[color=` not followed by a valid hex code and `]`.
    Malformed(&'a str),
}

/// An open color span waiting for its close tag.
#[derive(Debug)]
struct Frame<'a> {
    tag: &'a str,
    color: ColorTriplet,
    content: String,
}

/// Render markup to terminal text with truecolor escapes.
#[must_use]
pub fn render(markup: &str) -> String {
    render_with(markup, ColorOutput::TrueColor)
}

/// Render markup to plain text: resolved spans keep only their content.
///
/// Unresolved tags are kept, exactly as [`render`] keeps them.
#[must_use]
pub fn plain(markup: &str) -> String {
    render_with(markup, ColorOutput::None)
}

/// Render markup with the given color output.
#[must_use]
pub fn render_with(markup: &str, output: ColorOutput) -> String {
    let stripped = strip_font_tags(markup);
    if !stripped.contains("[color=") && !stripped.contains("[/color]") {
        return stripped;
    }
    resolve_colors(&stripped, output)
}

/// Remove ANSI SGR sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_SGR.replace_all(text, "").into_owned()
}

fn strip_font_tags(markup: &str) -> String {
    FONT_OPEN.replace_all(markup, "").replace(FONT_CLOSE, "")
}

fn tokenize(markup: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for cap in COLOR_TAG.captures_iter(markup) {
        let Some(full) = cap.get(0) else {
            continue;
        };
        if full.start() > last_end {
            tokens.push(Token::Text(&markup[last_end..full.start()]));
        }

        let tag = full.as_str();
        let token = if tag == "[/color]" {
            Token::ColorClose(tag)
        } else {
            match cap.get(1).map(|hex| ColorTriplet::parse_hex(&format!("#{}", hex.as_str()))) {
                Some(Ok(color)) => Token::ColorOpen { tag, color },
                _ => Token::Malformed(tag),
            }
        };
        tokens.push(token);
        last_end = full.end();
    }

    if last_end < markup.len() {
        tokens.push(Token::Text(&markup[last_end..]));
    }
    tokens
}

/// Resolve color spans innermost first with an explicit stack.
///
/// A close tag pairs with the nearest unclosed open tag. Open tags still on
/// the stack at the end are written back literally, as are close tags with
/// nothing to close. A malformed `[color=` can never sit inside a resolved
/// span, so every open tag to its left is written back literally on sight.
fn resolve_colors(markup: &str, output: ColorOutput) -> String {
    let mut root = String::with_capacity(markup.len() + 32);
    let mut stack: SmallVec<[Frame<'_>; 4]> = SmallVec::new();

    for token in tokenize(markup) {
        match token {
            Token::Text(text) => current(&mut root, &mut stack).push_str(text),
            Token::ColorOpen { tag, color } => stack.push(Frame {
                tag,
                color,
                content: String::new(),
            }),
            Token::ColorClose(tag) => match stack.pop() {
                Some(frame) => {
                    let span = wrap(&frame, output);
                    current(&mut root, &mut stack).push_str(&span);
                }
                None => {
                    log::trace!("unmatched {tag} left as text");
                    root.push_str(tag);
                }
            },
            Token::Malformed(tag) => {
                flush_literal(&mut root, &mut stack);
                log::trace!("malformed color tag left as text");
                root.push_str(tag);
            }
        }
    }

    flush_literal(&mut root, &mut stack);
    root
}

fn current<'s>(root: &'s mut String, stack: &'s mut SmallVec<[Frame<'_>; 4]>) -> &'s mut String {
    match stack.last_mut() {
        Some(frame) => &mut frame.content,
        None => root,
    }
}

fn wrap(frame: &Frame<'_>, output: ColorOutput) -> String {
    match output {
        ColorOutput::TrueColor => format!(
            "{}{}{ANSI_RESET}",
            frame.color.ansi_foreground(),
            frame.content
        ),
        ColorOutput::None => frame.content.clone(),
    }
}

fn flush_literal(root: &mut String, stack: &mut SmallVec<[Frame<'_>; 4]>) {
    if !stack.is_empty() {
        log::trace!("{} unterminated color tag(s) left as text", stack.len());
    }
    for frame in stack.drain(..) {
        root.push_str(frame.tag);
        root.push_str(&frame.content);
    }
}
