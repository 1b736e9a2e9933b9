//! Fuzz-style property tests for the markup renderer.
//!
//! Verifies robustness of `markup::render` and `markup::plain` against
//! arbitrary, malformed, and adversarial inputs.
//! Requirements tested:
//!   (1) No panics on any input
//!   (2) Unclosed tags left untouched
//!   (3) Invalid color specs
//!   (4) Deeply nested tags
//!   (5) Mixed valid/invalid
//!   (6) Unicode edge cases
//!   (7) Very long strings
//!   (8) Repeated tags

use proptest::prelude::*;
use blockbar::markup;

// ============================================================================
// Strategies for generating markup-like inputs
// ============================================================================

/// Generates arbitrary strings that may contain bracket characters.
fn arbitrary_markup() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x20-\x7e\[\]/#=]{0,200}").unwrap()
}

/// Generates strings built from tag fragments and plain words.
fn tag_like_strings() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[0-9a-fA-F]{6}".prop_map(|hex| format!("[color=#{hex}]")),
            "[0-9a-fA-F]{8}".prop_map(|hex| format!("[color=#{hex}]")),
            "[a-zA-Z-]{1,12}".prop_map(|font| format!("[font={font}]")),
            Just("[/color]".to_string()),
            Just("[/font]".to_string()),
            Just("[color=".to_string()),
            "[a-zA-Z0-9 ]{1,20}",
        ],
        0..20,
    )
    .prop_map(|parts| parts.join(""))
}

/// Generates `depth` nested color spans around a word.
fn deeply_nested(depth: usize) -> String {
    let open = "[color=#ff0000]".repeat(depth);
    let close = "[/color]".repeat(depth);
    format!("{open}inner{close}")
}

/// Generates `count` sibling color spans.
fn repeated_tags(count: usize) -> String {
    (0..count)
        .map(|i| format!("[color=#00ff00]word{i}[/color]"))
        .collect()
}

// ============================================================================
// (1) No panics on any input
// ============================================================================

proptest! {
    #[test]
    fn fuzz_render_no_panic(input in "\\PC{0,300}") {
        let _ = markup::render(&input);
    }

    #[test]
    fn fuzz_plain_no_panic(input in "\\PC{0,300}") {
        let _ = markup::plain(&input);
    }

    #[test]
    fn fuzz_render_arbitrary_ascii_no_panic(input in arbitrary_markup()) {
        let _ = markup::render(&input);
        let _ = markup::plain(&input);
    }

    #[test]
    fn fuzz_render_tag_like_no_panic(input in tag_like_strings()) {
        let _ = markup::render(&input);
        let _ = markup::plain(&input);
    }
}

// ============================================================================
// (2) Unclosed tags left untouched
// ============================================================================

#[test]
fn unclosed_single_tag() {
    assert_eq!(markup::render("[color=#ff0000]hello"), "[color=#ff0000]hello");
}

#[test]
fn unclosed_nested_tags() {
    let input = "[color=#ff0000][color=#00ff00][color=#0000ff]nested text";
    assert_eq!(markup::render(input), input);
}

#[test]
fn unclosed_outer_with_closed_inner() {
    let rendered = markup::render("[color=#ff0000]a [color=#00ff00]b[/color] c");
    assert_eq!(
        rendered,
        "[color=#ff0000]a \x1b[38;2;0;255;0mb\x1b[0m c"
    );
}

#[test]
fn unclosed_font_tag_still_stripped() {
    assert_eq!(markup::render("[font=x]hello"), "hello");
}

proptest! {
    #[test]
    fn fuzz_unclosed_tags_untouched(
        hex in "[0-9a-f]{6}",
        content in "[a-zA-Z0-9 ]{1,30}",
    ) {
        let input = format!("[color=#{hex}]{content}");
        prop_assert_eq!(markup::render(&input), input.clone());
        prop_assert_eq!(markup::plain(&input), input);
    }

    #[test]
    fn fuzz_multiple_unclosed_tags(count in 1usize..10) {
        let input = format!("{}hello", "[color=#123456]".repeat(count));
        prop_assert_eq!(markup::render(&input), input);
    }
}

// ============================================================================
// (3) Invalid color specs
// ============================================================================

#[test]
fn invalid_hex_colors_untouched() {
    let invalids = [
        "[color=#xyz]text[/color]",
        "[color=#zzzzzz]text[/color]",
        "[color=#]text[/color]",
        "[color=#1]text[/color]",
        "[color=#12]text[/color]",
        "[color=#1234]text[/color]",
        "[color=#12345]text[/color]",
        "[color=#1234567]text[/color]",
        "[color=#123456789]text[/color]",
        "[color=#gggggg]text[/color]",
        "[color=ff0000]text[/color]",
        "[color=red]text[/color]",
    ];
    for input in &invalids {
        assert_eq!(&markup::render(input), input, "changed: {input}");
    }
}

proptest! {
    #[test]
    fn fuzz_random_hex_color(hex in "[0-9a-fA-F]{0,10}") {
        let input = format!("[color=#{hex}]text[/color]");
        let rendered = markup::render(&input);
        if hex.len() == 6 || hex.len() == 8 {
            prop_assert!(rendered.starts_with("\x1b[38;2;"));
            prop_assert_eq!(markup::plain(&input), "text");
        } else {
            prop_assert_eq!(rendered, input);
        }
    }

    #[test]
    fn fuzz_color_with_unicode_no_panic(hex in "\\PC{1,6}") {
        let input = format!("[color=#{hex}]text[/color]");
        let text = markup::plain(&input);
        prop_assert!(text.contains("text"));
    }
}

// ============================================================================
// (4) Deeply nested tags
// ============================================================================

#[test]
fn nested_depth_100() {
    let rendered = markup::render(&deeply_nested(100));
    assert_eq!(rendered.matches("\x1b[0m").count(), 100);
    assert_eq!(markup::strip_ansi(&rendered), "inner");
}

#[test]
fn nested_depth_1000() {
    let rendered = markup::plain(&deeply_nested(1000));
    assert_eq!(rendered, "inner");
}

proptest! {
    #[test]
    fn fuzz_nesting_depth(depth in 1usize..200) {
        let rendered = markup::render(&deeply_nested(depth));
        prop_assert_eq!(rendered.matches("\x1b[38;2;255;0;0m").count(), depth);
        prop_assert_eq!(markup::strip_ansi(&rendered), "inner");
    }
}

// ============================================================================
// (5) Mixed valid/invalid
// ============================================================================

#[test]
fn malformed_open_breaks_enclosing_span() {
    let input = "[color=#ff0000]a[color=oops]b[/color]";
    assert_eq!(markup::render(input), input);
}

#[test]
fn malformed_open_after_closed_span() {
    assert_eq!(
        markup::render("[color=#ff0000]a[/color][color=oops]"),
        "\x1b[38;2;255;0;0ma\x1b[0m[color=oops]"
    );
}

#[test]
fn stray_closes_kept() {
    assert_eq!(markup::render("[/color][/color]x"), "[/color][/color]x");
}

#[test]
fn empty_font_name_not_stripped() {
    assert_eq!(markup::render("[font=]x[/font]"), "[font=]x");
}

proptest! {
    #[test]
    fn fuzz_mixed_preserves_words(input in tag_like_strings()) {
        let plain = markup::plain(&input);
        for word in input
            .split(['[', ']'])
            .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '))
        {
            // Words outside tag brackets can only be dropped if they were a
            // tag body, which the filter above excludes.
            prop_assert!(plain.contains(word), "lost {word:?} from {input:?}");
        }
    }
}

// ============================================================================
// (6) Unicode edge cases
// ============================================================================

#[test]
fn unicode_content() {
    assert_eq!(
        markup::render("[color=#010203]日本語 ▏▎▍▌[/color]"),
        "\x1b[38;2;1;2;3m日本語 ▏▎▍▌\x1b[0m"
    );
}

#[test]
fn unicode_font_name() {
    assert_eq!(markup::render("[font=шрифт]█[/font]"), "█");
}

#[test]
fn emoji_and_combining_marks() {
    let input = "[color=#ffffff]e\u{301} 👍🏽[/color]";
    assert_eq!(markup::plain(input), "e\u{301} 👍🏽");
}

// ============================================================================
// (7) Very long strings
// ============================================================================

#[test]
fn very_long_plain_text() {
    let input = "█".repeat(100_000);
    assert_eq!(markup::render(&input), input);
}

#[test]
fn very_long_span() {
    let body = "x".repeat(100_000);
    let rendered = markup::plain(&format!("[color=#000000]{body}[/color]"));
    assert_eq!(rendered.len(), 100_000);
}

// ============================================================================
// (8) Repeated tags
// ============================================================================

#[test]
fn many_sibling_spans() {
    let rendered = markup::render(&repeated_tags(500));
    assert_eq!(rendered.matches("\x1b[0m").count(), 500);
    assert!(markup::strip_ansi(&rendered).ends_with("word499"));
}

#[test]
fn many_font_tags() {
    let input = "[font=a]x[/font]".repeat(1_000);
    assert_eq!(markup::render(&input), "x".repeat(1_000));
}
