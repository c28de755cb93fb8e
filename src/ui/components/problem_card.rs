use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::drill::{DrillSession, Feedback};
use crate::ui::components::answer_box::AnswerBox;
use crate::ui::theme::Theme;

/// Drill screen body: mode title, session score, the problem or its
/// feedback, and the answer box.
pub struct ProblemCard<'a> {
    drill: &'a DrillSession,
    theme: &'a Theme,
}

impl<'a> ProblemCard<'a> {
    pub fn new(drill: &'a DrillSession, theme: &'a Theme) -> Self {
        Self { drill, theme }
    }
}

impl Widget for ProblemCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mode = self.drill.mode();
        let mode_color = colors.mode(mode);

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} {} ", mode.symbol(), mode.title()),
                Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
            )))
            .title(
                Line::from(Span::styled(
                    format!(" Score: {} ", self.drill.score()),
                    Style::default().fg(colors.score()).add_modifier(Modifier::BOLD),
                ))
                .right_aligned(),
            )
            .border_style(Style::default().fg(mode_color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(inner);

        let body = match self.drill.feedback() {
            Feedback::None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    self.drill.problem().text.as_str(),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )),
            ],
            Feedback::Correct => vec![
                Line::from(Span::styled("✔", Style::default().fg(colors.success()))),
                Line::from(Span::styled(
                    "Correct!",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )),
            ],
            Feedback::Incorrect => vec![
                Line::from(Span::styled("✘", Style::default().fg(colors.error()))),
                Line::from(Span::styled(
                    "Try Again!",
                    Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
                )),
            ],
        };
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        AnswerBox::new(self.drill.input(), mode_color, self.theme)
            .enabled(self.drill.accepts_input())
            .render(layout[1], buf);

        let tally = format!(
            "{} correct of {} tries",
            self.drill.correct_count(),
            self.drill.attempts()
        );
        Paragraph::new(Line::from(Span::styled(tally, Style::default().fg(colors.muted()))))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
    }
}
