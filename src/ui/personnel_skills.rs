use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Personnel, PersonnelSkill, ProficiencyLevel, Skill};
use crate::ui::components::skill_picker::{render_skill_picker, PickerOutcome, SkillPicker};
use crate::ui::{first_selected, frame_layout, render_confirmation, step_selection, Tab};

/// Skills held by one person.
pub struct PersonnelSkillsState {
    personnel: Personnel,
    holdings: Vec<PersonnelSkill>,
    list_state: ListState,
    picker: Option<SkillPicker>,
    show_delete_confirmation: bool,
}

pub enum PersonnelSkillsAction {
    Back,
    OpenPicker,
    Assign(i32, ProficiencyLevel),
    ChangeLevel(i32, ProficiencyLevel),
    Remove(i32),
}

impl PersonnelSkillsState {
    pub fn new(personnel: Personnel, holdings: Vec<PersonnelSkill>) -> Self {
        let list_state = first_selected(holdings.len());
        Self {
            personnel,
            holdings,
            list_state,
            picker: None,
            show_delete_confirmation: false,
        }
    }

    pub fn personnel_id(&self) -> i32 {
        self.personnel.id
    }

    pub fn open_picker(&mut self, skills: Vec<Skill>) {
        self.picker = Some(SkillPicker::new("Assign Skill", skills));
    }

    fn selected_holding(&self) -> Option<&PersonnelSkill> {
        self.list_state.selected().and_then(|i| self.holdings.get(i))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<PersonnelSkillsAction> {
        if let Some(picker) = &mut self.picker {
            return match picker.handle_key(key)? {
                PickerOutcome::Cancelled => {
                    self.picker = None;
                    None
                }
                PickerOutcome::Picked(skill_id, level) => {
                    self.picker = None;
                    Some(PersonnelSkillsAction::Assign(skill_id, level))
                }
            };
        }

        if self.show_delete_confirmation {
            match key {
                KeyCode::Char('y') => {
                    self.show_delete_confirmation = false;
                    return self
                        .selected_holding()
                        .map(|h| PersonnelSkillsAction::Remove(h.skill_id));
                }
                KeyCode::Char('n') | KeyCode::Esc => self.show_delete_confirmation = false,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(PersonnelSkillsAction::Back),
            KeyCode::Char('a') => return Some(PersonnelSkillsAction::OpenPicker),
            KeyCode::Char('l') => {
                return self.selected_holding().map(|h| {
                    PersonnelSkillsAction::ChangeLevel(h.skill_id, h.proficiency_level.next())
                });
            }
            KeyCode::Char('d') if self.selected_holding().is_some() => {
                self.show_delete_confirmation = true;
            }
            KeyCode::Down => step_selection(&mut self.list_state, self.holdings.len(), true),
            KeyCode::Up => step_selection(&mut self.list_state, self.holdings.len(), false),
            _ => {}
        }
        None
    }
}

pub fn render_personnel_skills<B: Backend>(frame: &mut Frame<B>, state: &mut PersonnelSkillsState) {
    let body = frame_layout(
        frame,
        Tab::Personnel,
        "<A> Assign Skill | <L> Cycle Level | <D> Remove Skill | <Esc> Back",
    );
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)].as_ref())
        .split(body);

    let person = &state.personnel;
    let header = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled(
                person.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" <{}>", person.email)),
        ]),
        Spans::from(format!(
            "{} | {}",
            person.role.as_deref().unwrap_or("No role"),
            person
                .experience_level
                .map(|level| level.as_str())
                .unwrap_or("No experience level"),
        )),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = state
        .holdings
        .iter()
        .map(|holding| {
            ListItem::new(Spans::from(vec![
                Span::raw(format!("{:<30}", holding.skill_name)),
                Span::styled(
                    holding.proficiency_level.as_str(),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    let holdings_list = List::new(items)
        .block(Block::default().title("Skills").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(holdings_list, chunks[1], &mut state.list_state);

    if let Some(picker) = &mut state.picker {
        render_skill_picker(frame, picker);
    } else if state.show_delete_confirmation {
        render_confirmation(
            frame,
            "Confirm Remove",
            &["Remove this skill from the person?"],
        );
    }
}

pub fn handle_input(state: &mut PersonnelSkillsState) -> Result<Option<PersonnelSkillsAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn state() -> PersonnelSkillsState {
        let personnel = Personnel {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: None,
            experience_level: None,
            created_at: Utc::now(),
        };
        let holdings = vec![PersonnelSkill {
            personnel_id: 7,
            skill_id: 3,
            skill_name: "Rust".to_string(),
            proficiency_level: ProficiencyLevel::Advanced,
        }];
        PersonnelSkillsState::new(personnel, holdings)
    }

    #[test]
    fn level_key_proposes_next_level() {
        let mut state = state();
        assert!(matches!(
            state.handle_key(KeyCode::Char('l')),
            Some(PersonnelSkillsAction::ChangeLevel(3, ProficiencyLevel::Expert))
        ));
    }

    #[test]
    fn picker_captures_keys_until_closed() {
        let mut state = state();
        state.open_picker(Vec::new());

        assert!(state.handle_key(KeyCode::Char('q')).is_none());
        assert!(state.handle_key(KeyCode::Esc).is_none());
        assert!(matches!(
            state.handle_key(KeyCode::Esc),
            Some(PersonnelSkillsAction::Back)
        ));
    }
}
