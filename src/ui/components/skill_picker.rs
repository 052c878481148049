use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{ProficiencyLevel, Skill};
use crate::ui::{centered_rect, first_selected, step_selection};

pub enum PickerOutcome {
    Cancelled,
    Picked(i32, ProficiencyLevel),
}

/// Popup choosing a skill from the catalog together with a proficiency level.
pub struct SkillPicker {
    title: String,
    skills: Vec<Skill>,
    list_state: ListState,
    pub level: ProficiencyLevel,
}

impl SkillPicker {
    pub fn new(title: impl Into<String>, skills: Vec<Skill>) -> Self {
        let list_state = first_selected(skills.len());
        Self {
            title: title.into(),
            skills,
            list_state,
            level: ProficiencyLevel::Beginner,
        }
    }

    pub fn selected_skill(&self) -> Option<&Skill> {
        self.list_state.selected().and_then(|i| self.skills.get(i))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<PickerOutcome> {
        match key {
            KeyCode::Esc => return Some(PickerOutcome::Cancelled),
            KeyCode::Down => step_selection(&mut self.list_state, self.skills.len(), true),
            KeyCode::Up => step_selection(&mut self.list_state, self.skills.len(), false),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => self.level = self.level.next(),
            KeyCode::Enter => {
                if let Some(skill) = self.selected_skill() {
                    return Some(PickerOutcome::Picked(skill.id, self.level));
                }
            }
            _ => {}
        }
        None
    }
}

pub fn render_skill_picker<B: Backend>(frame: &mut Frame<B>, picker: &mut SkillPicker) {
    let area = centered_rect(60, 60, frame.size());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(area);

    let items: Vec<ListItem> = picker
        .skills
        .iter()
        .map(|skill| {
            ListItem::new(Spans::from(vec![
                Span::raw(skill.name.clone()),
                Span::styled(
                    format!("  {}", skill.category.as_deref().unwrap_or("")),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(picker.title.clone()).borders(Borders::ALL))
        .style(Style::default().bg(Color::Black))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let level = Paragraph::new(Spans::from(vec![
        Span::styled("Level: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            picker.level.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   <L> Cycle level | <Enter> Confirm | <Esc> Cancel"),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, chunks[0], &mut picker.list_state);
    frame.render_widget(level, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn skill(id: i32, name: &str) -> Skill {
        Skill {
            id,
            name: name.to_string(),
            category: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn picks_selected_skill_with_cycled_level() {
        let mut picker = SkillPicker::new("Assign", vec![skill(1, "Go"), skill(2, "Rust")]);
        picker.handle_key(KeyCode::Down);
        picker.handle_key(KeyCode::Char('l'));
        picker.handle_key(KeyCode::Char('l'));

        match picker.handle_key(KeyCode::Enter) {
            Some(PickerOutcome::Picked(id, level)) => {
                assert_eq!(id, 2);
                assert_eq!(level, ProficiencyLevel::Advanced);
            }
            _ => panic!("expected a pick"),
        }
    }

    #[test]
    fn empty_catalog_cannot_pick() {
        let mut picker = SkillPicker::new("Assign", Vec::new());
        assert!(picker.handle_key(KeyCode::Enter).is_none());
        assert!(matches!(
            picker.handle_key(KeyCode::Esc),
            Some(PickerOutcome::Cancelled)
        ));
    }
}
