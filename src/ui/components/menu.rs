use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::generator::arithmetic::Mode;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Drill(Mode),
    Daily,
}

pub struct MenuItem {
    pub key: char,
    pub label: String,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub total_score: u64,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        let mut items: Vec<MenuItem> = Mode::ALL
            .iter()
            .zip('1'..)
            .map(|(&mode, key)| MenuItem {
                key,
                label: format!("{} {}", mode.symbol(), mode.title()),
                action: MenuAction::Drill(mode),
            })
            .collect();
        items.push(MenuItem {
            key: '5',
            label: "Daily Story Problem".to_string(),
            action: MenuAction::Daily,
        });
        Self {
            items,
            selected: 0,
            total_score: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items[self.selected].action
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|i| i.key == key).map(|i| i.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome!",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ready for a challenge?",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let score_lines = vec![
            Line::from(Span::styled(
                "Total Score",
                Style::default().fg(colors.score()),
            )),
            Line::from(Span::styled(
                self.total_score.to_string(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        Paragraph::new(score_lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(colors.border())))
            .render(layout[1], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let item_color = match item.action {
                MenuAction::Drill(mode) => colors.mode(mode),
                MenuAction::Daily => colors.daily(),
            };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let style = Style::default().fg(item_color).add_modifier(if is_selected {
                Modifier::BOLD | Modifier::REVERSED
            } else {
                Modifier::empty()
            });

            if i < menu_layout.len() {
                Paragraph::new(Line::from(Span::styled(label_text, style)))
                    .render(menu_layout[i], buf);
            }
        }
    }
}
