use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::matching::PersonnelSearch;
use crate::models::{ExperienceLevel, Personnel, Skill};
use crate::ui::components::skill_picker::{render_skill_picker, PickerOutcome, SkillPicker};
use crate::ui::{first_selected, frame_layout, render_confirmation, step_selection, Tab};

pub struct PersonnelState {
    personnel: Vec<Personnel>,
    list_state: ListState,
    show_delete_confirmation: bool,
    /// Filters the list was loaded with.
    pub search: PersonnelSearch,
    /// Name of the skill in `search.skill_id`, for the title.
    skill_name: Option<String>,
    picker: Option<SkillPicker>,
}

impl PersonnelState {
    pub fn new(personnel: Vec<Personnel>, search: PersonnelSearch, skill_name: Option<String>) -> Self {
        let list_state = first_selected(personnel.len());
        Self {
            personnel,
            list_state,
            show_delete_confirmation: false,
            search,
            skill_name,
            picker: None,
        }
    }

    pub fn open_skill_filter(&mut self, skills: Vec<Skill>) {
        let mut picker = SkillPicker::new("Filter by Skill (minimum level)", skills);
        if let Some(level) = self.search.min_proficiency {
            picker.level = level;
        }
        self.picker = Some(picker);
    }

    fn is_filtered(&self) -> bool {
        self.search != PersonnelSearch::default()
    }

    fn title(&self) -> String {
        let mut filters = Vec::new();
        if let Some(level) = self.search.experience_level {
            filters.push(level.to_string());
        }
        if let Some(name) = &self.skill_name {
            let minimum = self.search.min_proficiency.map(|level| format!(" >= {level}"));
            filters.push(format!("{name}{}", minimum.unwrap_or_default()));
        }
        if filters.is_empty() {
            "Personnel".to_string()
        } else {
            format!("Personnel ({})", filters.join(", "))
        }
    }

    pub fn next(&mut self) {
        step_selection(&mut self.list_state, self.personnel.len(), true);
    }

    pub fn previous(&mut self) {
        step_selection(&mut self.list_state, self.personnel.len(), false);
    }

    pub fn selected_personnel(&self) -> Option<&Personnel> {
        self.list_state.selected().and_then(|i| self.personnel.get(i))
    }

    fn selected_id(&self) -> Option<i32> {
        self.selected_personnel().map(|p| p.id)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<PersonnelAction> {
        if let Some(picker) = &mut self.picker {
            return match picker.handle_key(key)? {
                PickerOutcome::Cancelled => {
                    self.picker = None;
                    None
                }
                PickerOutcome::Picked(skill_id, level) => {
                    self.picker = None;
                    Some(PersonnelAction::Filter(PersonnelSearch {
                        skill_id: Some(skill_id),
                        min_proficiency: Some(level),
                        ..self.search.clone()
                    }))
                }
            };
        }

        if self.show_delete_confirmation {
            match key {
                KeyCode::Char('y') => {
                    self.show_delete_confirmation = false;
                    return self.selected_id().map(PersonnelAction::DeletePersonnel);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.show_delete_confirmation = false,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(PersonnelAction::Exit),
            KeyCode::Tab => return Some(PersonnelAction::NextTab),
            KeyCode::Char('n') => return Some(PersonnelAction::NewPersonnel),
            KeyCode::Char('e') => return self.selected_id().map(PersonnelAction::EditPersonnel),
            KeyCode::Enter => return self.selected_id().map(PersonnelAction::ViewSkills),
            KeyCode::Char('x') => {
                return Some(PersonnelAction::Filter(PersonnelSearch {
                    experience_level: ExperienceLevel::cycle(self.search.experience_level),
                    ..self.search.clone()
                }));
            }
            KeyCode::Char('k') => return Some(PersonnelAction::OpenSkillFilter),
            KeyCode::Char('c') if self.is_filtered() => {
                return Some(PersonnelAction::Filter(PersonnelSearch::default()));
            }
            KeyCode::Char('d') if self.selected_personnel().is_some() => {
                self.show_delete_confirmation = true;
            }
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            _ => {}
        }
        None
    }
}

pub enum PersonnelAction {
    Exit,
    NextTab,
    NewPersonnel,
    EditPersonnel(i32),
    DeletePersonnel(i32),
    ViewSkills(i32),
    OpenSkillFilter,
    Filter(PersonnelSearch),
}

pub fn render_personnel<B: Backend>(frame: &mut Frame<B>, state: &mut PersonnelState) {
    let footer = if state.selected_personnel().is_some() {
        "<N> New | <E> Edit | <D> Delete | <Enter> Skills | <X> Level | <K> Skill | <C> Clear | <Tab> Next | <Q> Quit"
    } else {
        "<N> New | <X> Level | <K> Skill | <C> Clear | <Tab> Next | <Q> Quit"
    };
    let body = frame_layout(frame, Tab::Personnel, footer);

    let items: Vec<ListItem> = state
        .personnel
        .iter()
        .map(|person| {
            let level = person
                .experience_level
                .map(|level| level.as_str())
                .unwrap_or("-");
            ListItem::new(Spans::from(vec![
                Span::styled(
                    person.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" <{}>", person.email)),
                Span::raw(format!("  {}", person.role.as_deref().unwrap_or(""))),
                Span::styled(format!("  {level}"), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let title = state.title();
    let personnel_list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(personnel_list, body, &mut state.list_state);

    if state.show_delete_confirmation {
        render_confirmation(
            frame,
            "Confirm Delete",
            &[
                "Are you sure you want to delete this person?",
                "Their skill assignments will also be deleted.",
            ],
        );
    }

    if let Some(picker) = &mut state.picker {
        render_skill_picker(frame, picker);
    }
}

pub fn handle_input(state: &mut PersonnelState) -> Result<Option<PersonnelAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
