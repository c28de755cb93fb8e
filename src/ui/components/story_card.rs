use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::scoring::DAILY_CORRECT;
use crate::session::daily::{DailyPhase, DailyProblemSession};
use crate::ui::components::answer_box::AnswerBox;
use crate::ui::theme::Theme;

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

/// Daily story problem screen body.
pub struct StoryCard<'a> {
    daily: &'a DailyProblemSession,
    tick: u64,
    theme: &'a Theme,
}

impl<'a> StoryCard<'a> {
    pub fn new(daily: &'a DailyProblemSession, tick: u64, theme: &'a Theme) -> Self {
        Self { daily, tick, theme }
    }
}

impl Widget for StoryCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Daily Problem ",
                Style::default()
                    .fg(colors.daily())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.daily()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.daily.phase() == DailyPhase::Loading {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    spinner_frame(self.tick),
                    Style::default().fg(colors.daily()),
                )),
                Line::from(Span::styled(
                    "Generating today's story problem...",
                    Style::default().fg(colors.muted()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        let Some(problem) = self.daily.problem() else {
            return;
        };

        let show_banner = self.daily.load_error().is_some();
        let answered = self.daily.phase() == DailyPhase::AnsweredCorrect;
        let show_retry_box = self.daily.phase() == DailyPhase::AwaitingRetry;
        let show_hint = self.daily.explanation().is_some();

        let mut constraints = Vec::new();
        if show_banner {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(4));
        constraints.push(Constraint::Length(if answered { 4 } else { 3 }));
        if show_retry_box {
            constraints.push(Constraint::Length(4));
        }
        if show_hint {
            constraints.push(Constraint::Percentage(40));
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);
        let mut idx = 0;

        if let Some(err) = self.daily.load_error() {
            Paragraph::new(Line::from(Span::styled(
                err.banner(),
                Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.error()))
                    .style(Style::default().bg(colors.error_bg())),
            )
            .render(layout[idx], buf);
            idx += 1;
        }

        let story_lines = vec![
            Line::from(Span::styled(problem.story.as_str(), Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled(
                problem.question.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
        ];
        Paragraph::new(story_lines)
            .wrap(Wrap { trim: true })
            .render(layout[idx], buf);
        idx += 1;

        if answered {
            let lines = vec![
                Line::from(Span::styled(
                    "Amazing! You got it right!",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("You earned {DAILY_CORRECT} points!"),
                    Style::default().fg(colors.success()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(Style::default().fg(colors.success())))
                .render(layout[idx], buf);
        } else {
            AnswerBox::new(self.daily.input(), colors.daily(), self.theme)
                .enabled(!self.daily.is_explaining())
                .placeholder("Your answer")
                .render(layout[idx], buf);
        }
        idx += 1;

        if show_retry_box {
            let action = if self.daily.is_explaining() {
                Span::styled(
                    format!("{} Thinking...", spinner_frame(self.tick)),
                    Style::default().fg(colors.hint()),
                )
            } else {
                Span::styled(
                    "[h] Explain it to me",
                    Style::default().fg(colors.hint()).add_modifier(Modifier::BOLD),
                )
            };
            let lines = vec![
                Line::from(Span::styled(
                    "Not quite. Try again or ask for a hint!",
                    Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
                )),
                Line::from(action),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(Style::default().fg(colors.error())))
                .render(layout[idx], buf);
            idx += 1;
        }

        if let Some(explanation) = self.daily.explanation() {
            Paragraph::new(explanation)
                .style(Style::default().fg(colors.hint()))
                .wrap(Wrap { trim: false })
                .block(
                    Block::bordered()
                        .title(" Here's a hint: ")
                        .border_style(Style::default().fg(colors.hint())),
                )
                .render(layout[idx], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER_FRAMES.len() as u64));
        assert_ne!(spinner_frame(0), spinner_frame(1));
    }
}
