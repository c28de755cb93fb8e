use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::input::AnswerInput;
use crate::ui::theme::Theme;

/// Single-line answer entry. Greyed out while it does not accept input.
pub struct AnswerBox<'a> {
    input: &'a AnswerInput,
    enabled: bool,
    accent: Color,
    placeholder: &'a str,
    theme: &'a Theme,
}

impl<'a> AnswerBox<'a> {
    pub fn new(input: &'a AnswerInput, accent: Color, theme: &'a Theme) -> Self {
        Self {
            input,
            enabled: true,
            accent,
            placeholder: "",
            theme,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl Widget for AnswerBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.enabled { self.accent } else { colors.muted() };

        let block = Block::bordered()
            .title(" Your answer ")
            .border_style(Style::default().fg(border));

        let line = if self.input.is_empty() && !self.placeholder.is_empty() {
            Line::from(Span::styled(self.placeholder, Style::default().fg(colors.muted())))
        } else {
            let mut spans = vec![Span::styled(
                self.input.value(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )];
            if self.enabled {
                spans.push(Span::styled("_", Style::default().fg(self.accent)));
            }
            Line::from(spans)
        };

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
