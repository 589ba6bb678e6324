//! TextBlock Widget
//!
//! A borderless, scrollable region of styled text. Lines are wrapped to the
//! area width at render time. Content hidden above or below the viewport is
//! hinted by fading the edge rows.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

use crate::theme::{FADE_DARK, FADE_LIGHT};

/// A line of text with its style
pub type StyledLine = (String, Style);

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset in lines, measured from the anchor edge
    pub scroll_offset: usize,
    /// Total wrapped lines at the last render
    pub total_lines: usize,
    /// Visible rows at the last render
    pub viewport: usize,
}

impl TextBlockState {
    /// Scroll away from the anchor edge by `lines`
    pub fn scroll_away(&mut self, lines: usize) {
        let max = self.total_lines.saturating_sub(self.viewport.max(1));
        self.scroll_offset = (self.scroll_offset + lines).min(max);
    }

    /// Scroll towards the anchor edge by `lines`
    pub fn scroll_toward(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump back to the anchor edge
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Wrap styled lines to `width`, keeping empty lines as spacers
pub fn wrap_lines(lines: &[StyledLine], width: usize) -> Vec<StyledLine> {
    let width = width.max(1);
    lines
        .iter()
        .flat_map(|(text, style)| {
            if text.is_empty() {
                vec![(String::new(), *style)]
            } else {
                wrap(text, width)
                    .into_iter()
                    .map(|cow| (cow.into_owned(), *style))
                    .collect()
            }
        })
        .collect()
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    lines: &'a [StyledLine],
    follow_tail: bool,
}

impl<'a> TextBlock<'a> {
    /// Text block anchored at the top (offset counts lines scrolled down)
    pub fn new(lines: &'a [StyledLine]) -> Self {
        Self {
            lines,
            follow_tail: false,
        }
    }

    /// Anchor at the bottom so new lines stay in view (offset counts lines scrolled up)
    pub fn follow_tail(mut self) -> Self {
        self.follow_tail = true;
        self
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let height = area.height as usize;
        let wrapped = wrap_lines(self.lines, area.width as usize);

        state.total_lines = wrapped.len();
        state.viewport = height;

        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let start = if self.follow_tail {
            max_scroll - state.scroll_offset
        } else {
            state.scroll_offset
        };
        let has_above = start > 0;
        let has_below = start + height < state.total_lines;

        for (i, (line, style)) in wrapped.iter().skip(start).take(height).enumerate() {
            let style = if has_above && i < 2 {
                Style::default().fg(if i == 0 { FADE_DARK } else { FADE_LIGHT })
            } else if has_below && i + 2 >= height {
                Style::default().fg(if i + 1 == height { FADE_DARK } else { FADE_LIGHT })
            } else {
                *style
            };

            // i < height <= u16::MAX
            let y = area.y + u16::try_from(i).unwrap_or(u16::MAX);
            let visible: String = line.chars().take(area.width as usize).collect();
            buf.set_string(area.x, y, &visible, style);
        }
    }
}
