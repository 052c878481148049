use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::matching::MatchedPersonnel;
use crate::models::{ProficiencyLevel, Project, ProjectRequiredSkill, Skill};
use crate::ui::components::skill_picker::{render_skill_picker, PickerOutcome, SkillPicker};
use crate::ui::{first_selected, frame_layout, render_confirmation, step_selection, Tab};

/// A project's required skills next to the personnel who cover all of them.
pub struct ProjectMatchesState {
    project: Project,
    requirements: Vec<ProjectRequiredSkill>,
    matches: Vec<MatchedPersonnel>,
    list_state: ListState,
    picker: Option<SkillPicker>,
    show_delete_confirmation: bool,
}

pub enum ProjectMatchesAction {
    Back,
    OpenPicker,
    AddRequirement(i32, ProficiencyLevel),
    ChangeMinimum(i32, ProficiencyLevel),
    RemoveRequirement(i32),
}

impl ProjectMatchesState {
    pub fn new(
        project: Project,
        requirements: Vec<ProjectRequiredSkill>,
        matches: Vec<MatchedPersonnel>,
    ) -> Self {
        let list_state = first_selected(requirements.len());
        Self {
            project,
            requirements,
            matches,
            list_state,
            picker: None,
            show_delete_confirmation: false,
        }
    }

    pub fn project_id(&self) -> i32 {
        self.project.id
    }

    /// Offers only skills the project does not require yet.
    pub fn open_picker(&mut self, skills: Vec<Skill>) {
        let available = skills
            .into_iter()
            .filter(|skill| !self.requirements.iter().any(|r| r.skill_id == skill.id))
            .collect();
        self.picker = Some(SkillPicker::new("Add Required Skill", available));
    }

    fn selected_requirement(&self) -> Option<&ProjectRequiredSkill> {
        self.list_state
            .selected()
            .and_then(|i| self.requirements.get(i))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ProjectMatchesAction> {
        if let Some(picker) = &mut self.picker {
            return match picker.handle_key(key)? {
                PickerOutcome::Cancelled => {
                    self.picker = None;
                    None
                }
                PickerOutcome::Picked(skill_id, level) => {
                    self.picker = None;
                    Some(ProjectMatchesAction::AddRequirement(skill_id, level))
                }
            };
        }

        if self.show_delete_confirmation {
            match key {
                KeyCode::Char('y') => {
                    self.show_delete_confirmation = false;
                    return self
                        .selected_requirement()
                        .map(|r| ProjectMatchesAction::RemoveRequirement(r.skill_id));
                }
                KeyCode::Char('n') | KeyCode::Esc => self.show_delete_confirmation = false,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectMatchesAction::Back),
            KeyCode::Char('a') => return Some(ProjectMatchesAction::OpenPicker),
            KeyCode::Char('l') => {
                return self.selected_requirement().map(|r| {
                    ProjectMatchesAction::ChangeMinimum(
                        r.skill_id,
                        r.minimum_proficiency_level.next(),
                    )
                });
            }
            KeyCode::Char('d') if self.selected_requirement().is_some() => {
                self.show_delete_confirmation = true;
            }
            KeyCode::Down => step_selection(&mut self.list_state, self.requirements.len(), true),
            KeyCode::Up => step_selection(&mut self.list_state, self.requirements.len(), false),
            _ => {}
        }
        None
    }
}

pub fn render_project_matches<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectMatchesState) {
    let body = frame_layout(
        frame,
        Tab::Projects,
        "<A> Add Requirement | <L> Cycle Minimum | <D> Remove Requirement | <Esc> Back",
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(body);

    let header = Paragraph::new(Spans::from(vec![
        Span::styled(
            state.project.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [{}]", state.project.status)),
        Span::styled(
            format!("  {}", state.project.description.as_deref().unwrap_or("")),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(rows[1]);

    let items: Vec<ListItem> = state
        .requirements
        .iter()
        .map(|requirement| {
            ListItem::new(Spans::from(vec![
                Span::raw(format!("{:<20}", requirement.skill_name)),
                Span::styled(
                    format!(">= {}", requirement.minimum_proficiency_level),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();
    let requirements_list = List::new(items)
        .block(Block::default().title("Required Skills").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(requirements_list, panes[0], &mut state.list_state);

    let match_rows = state.matches.iter().map(|person| {
        Row::new(vec![
            Cell::from(person.name.clone()),
            Cell::from(
                person
                    .experience_level
                    .map(|level| level.as_str())
                    .unwrap_or("-"),
            ),
            Cell::from(person.matched_skills.clone()),
            Cell::from(format!("{}%", person.match_percentage)),
        ])
    });
    let matches_title = format!("Matching Personnel ({})", state.matches.len());
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(15),
        Constraint::Percentage(50),
        Constraint::Percentage(10),
    ];
    let table = Table::new(match_rows)
        .header(
            Row::new(vec!["Name", "Level", "Skills", "Match"])
                .style(Style::default().fg(Color::Yellow)),
        )
        .block(Block::default().title(matches_title).borders(Borders::ALL))
        .widths(&widths);
    frame.render_widget(table, panes[1]);

    if let Some(picker) = &mut state.picker {
        render_skill_picker(frame, picker);
    } else if state.show_delete_confirmation {
        render_confirmation(
            frame,
            "Confirm Remove",
            &["Remove this required skill from the project?"],
        );
    }
}

pub fn handle_input(state: &mut ProjectMatchesState) -> Result<Option<ProjectMatchesAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::ProjectStatus;

    fn skill(id: i32, name: &str) -> Skill {
        Skill {
            id,
            name: name.to_string(),
            category: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn state() -> ProjectMatchesState {
        let project = Project {
            id: 1,
            name: "Apollo".to_string(),
            description: None,
            start_date: None,
            end_date: None,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        };
        let requirements = vec![ProjectRequiredSkill {
            project_id: 1,
            skill_id: 10,
            skill_name: "Rust".to_string(),
            minimum_proficiency_level: ProficiencyLevel::Expert,
        }];
        ProjectMatchesState::new(project, requirements, Vec::new())
    }

    #[test]
    fn picker_hides_already_required_skills() {
        let mut state = state();
        state.open_picker(vec![skill(10, "Rust"), skill(11, "Go")]);

        match state.handle_key(KeyCode::Enter) {
            Some(ProjectMatchesAction::AddRequirement(11, ProficiencyLevel::Beginner)) => {}
            _ => panic!("expected Go to be the only choice"),
        }
    }

    #[test]
    fn minimum_wraps_from_expert() {
        let mut state = state();
        assert!(matches!(
            state.handle_key(KeyCode::Char('l')),
            Some(ProjectMatchesAction::ChangeMinimum(10, ProficiencyLevel::Beginner))
        ));
    }
}
