use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::matching::PersonnelUtilization;
use crate::ui::{frame_layout, Tab};

pub struct UtilizationState {
    rows: Vec<PersonnelUtilization>,
    table_state: TableState,
}

pub enum UtilizationAction {
    Exit,
    NextTab,
    Refresh,
}

impl UtilizationState {
    pub fn new(rows: Vec<PersonnelUtilization>) -> Self {
        let mut table_state = TableState::default();
        if !rows.is_empty() {
            table_state.select(Some(0));
        }
        Self { rows, table_state }
    }

    fn step(&mut self, forward: bool) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<UtilizationAction> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(UtilizationAction::Exit),
            KeyCode::Tab => return Some(UtilizationAction::NextTab),
            KeyCode::Char('r') => return Some(UtilizationAction::Refresh),
            KeyCode::Down => self.step(true),
            KeyCode::Up => self.step(false),
            _ => {}
        }
        None
    }
}

fn load_color(percentage: u32) -> Color {
    match percentage {
        0 => Color::DarkGray,
        1..=50 => Color::Green,
        51..=75 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn render_utilization<B: Backend>(frame: &mut Frame<B>, state: &mut UtilizationState) {
    let body = frame_layout(frame, Tab::Utilization, "<R> Refresh | <Tab> Next | <Q> Quit");

    let rows = state.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.name.clone()),
            Cell::from(row.role.clone().unwrap_or_default()),
            Cell::from(row.project_count.to_string()),
            Cell::from(row.active_project_count.to_string()),
            Cell::from(row.planning_project_count.to_string()),
            Cell::from(row.completed_project_count.to_string()),
            Cell::from(format!("{}%", row.utilization_percentage))
                .style(Style::default().fg(load_color(row.utilization_percentage))),
        ])
    });

    let widths = [
        Constraint::Percentage(24),
        Constraint::Percentage(20),
        Constraint::Percentage(10),
        Constraint::Percentage(10),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
        Constraint::Percentage(12),
    ];
    let table = Table::new(rows)
        .header(
            Row::new(vec![
                "Name", "Role", "Matches", "Active", "Planning", "Completed", "Load",
            ])
            .style(Style::default().fg(Color::Yellow)),
        )
        .block(Block::default().title("Utilization").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&widths);

    frame.render_stateful_widget(table, body, &mut state.table_state);
}

pub fn handle_input(state: &mut UtilizationState) -> Result<Option<UtilizationAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
