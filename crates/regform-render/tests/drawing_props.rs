//! Property tests for width-aware drawing into buffers.

use proptest::prelude::*;
use regform_render::buffer::Buffer;
use regform_render::drawing::{draw_str, grapheme_byte_offset, grapheme_count};
use regform_render::presenter::Presenter;
use regform_render::style::Style;

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 .@-]{1,8}",
            Just("中文".to_string()),
            Just("e\u{301}".to_string()),
            Just("🎉".to_string()),
        ],
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    /// Drawing never writes past the clip width and never panics.
    #[test]
    fn draw_respects_clip(
        text in text_strategy(),
        x in 0u16..20,
        max_width in 0u16..30,
    ) {
        let mut buf = Buffer::new(24, 1);
        let written = draw_str(&mut buf, x, 0, &text, Style::new(), max_width);
        prop_assert!(written <= max_width);
        let right = x.saturating_add(max_width);
        for col in right..buf.width() {
            let untouched = buf
                .get(col, 0)
                .is_some_and(|c| *c == regform_render::cell::Cell::default());
            prop_assert!(untouched, "column {} written beyond clip", col);
        }
    }

    /// Every grapheme index up to the count maps to a char boundary.
    #[test]
    fn grapheme_offsets_are_boundaries(text in text_strategy()) {
        for i in 0..=grapheme_count(&text) {
            let offset = grapheme_byte_offset(&text, i);
            prop_assert!(text.is_char_boundary(offset));
        }
    }

    /// Presenting arbitrary frames in sequence never fails on an in-memory sink.
    #[test]
    fn present_sequence_succeeds(frames in proptest::collection::vec(text_strategy(), 1..5)) {
        let mut presenter = Presenter::new(Vec::new());
        for text in frames {
            let mut buf = Buffer::new(16, 2);
            draw_str(&mut buf, 0, 1, &text, Style::new().bold(), 16);
            prop_assert!(presenter.present(&buf).is_ok());
        }
    }
}
