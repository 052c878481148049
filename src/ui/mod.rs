//! Terminal console.
//!
//! Each screen module owns a state struct, a `render_*` function and a
//! `handle_input` function that turns key presses into an action enum. The
//! [`app`] module routes those actions to the repository.

pub mod app;
pub mod components;
pub mod personnel;
pub mod personnel_skills;
pub mod personnel_wizard;
pub mod project_matches;
pub mod project_wizard;
pub mod projects;
pub mod skill_wizard;
pub mod skills;
pub mod utilization;

pub use app::run;

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, ListState, Paragraph, Tabs},
    Frame,
};

/// Top-level tabs, cycled with <Tab>.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Skills,
    Personnel,
    Projects,
    Utilization,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Skills, Tab::Personnel, Tab::Projects, Tab::Utilization];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Skills => "Skills",
            Tab::Personnel => "Personnel",
            Tab::Projects => "Projects",
            Tab::Utilization => "Utilization",
        }
    }

    pub fn next(self) -> Tab {
        match self {
            Tab::Skills => Tab::Personnel,
            Tab::Personnel => Tab::Projects,
            Tab::Projects => Tab::Utilization,
            Tab::Utilization => Tab::Skills,
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }
}

/// Splits the frame into tab bar, body and footer, drawing the bar and footer.
pub fn frame_layout<B: Backend>(frame: &mut Frame<B>, active: Tab, footer: &str) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let titles = Tab::ALL
        .iter()
        .map(|tab| Spans::from(tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(Block::default().borders(Borders::ALL).title("Skills Manager"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let buttons = Paragraph::new(footer.to_string())
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);

    chunks[1]
}

/// Moves a list selection one step, wrapping at both ends.
pub fn step_selection(list_state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        list_state.select(None);
        return;
    }

    let i = match list_state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    list_state.select(Some(i));
}

/// A list state selecting the first row when there is one.
pub fn first_selected(len: usize) -> ListState {
    let mut list_state = ListState::default();
    if len > 0 {
        list_state.select(Some(0));
    }
    list_state
}

pub fn render_confirmation<B: Backend>(frame: &mut Frame<B>, title: &str, lines: &[&str]) {
    let popup_area = centered_rect(50, 20, frame.size());

    let mut text = vec![Spans::from("")];
    for line in lines {
        text.push(Spans::from(*line));
        text.push(Spans::from(""));
    }
    text.push(Spans::from("<Y> Yes  <N> No"));

    let popup = Paragraph::new(text)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(tui::widgets::Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps() {
        let mut state = first_selected(3);
        step_selection(&mut state, 3, false);
        assert_eq!(state.selected(), Some(2));
        step_selection(&mut state, 3, true);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut state = first_selected(0);
        assert_eq!(state.selected(), None);
        step_selection(&mut state, 0, true);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn tabs_cycle() {
        let mut tab = Tab::Skills;
        for _ in 0..4 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Skills);
    }
}
