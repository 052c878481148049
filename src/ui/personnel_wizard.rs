use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{ExperienceLevel, Personnel};

#[derive(Clone, Debug, Default)]
pub struct PersonnelForm {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub experience_level: Option<ExperienceLevel>,
}

pub enum PersonnelWizardAction {
    Cancel,
    Save(PersonnelForm),
}

#[derive(Clone, PartialEq, Copy)]
pub enum PersonnelField {
    Name,
    Email,
    Role,
    ExperienceLevel,
}

pub struct PersonnelWizardState {
    pub form: PersonnelForm,
    pub current_field: PersonnelField,
    pub editing: bool,
    pub error: Option<String>,
}

impl PersonnelWizardState {
    pub fn new() -> Self {
        Self {
            form: PersonnelForm::default(),
            current_field: PersonnelField::Name,
            editing: false,
            error: None,
        }
    }

    pub fn from_existing(personnel: Personnel) -> Self {
        Self {
            form: PersonnelForm {
                id: Some(personnel.id),
                name: personnel.name,
                email: personnel.email,
                role: personnel.role.unwrap_or_default(),
                experience_level: personnel.experience_level,
            },
            ..Self::new()
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            PersonnelField::Name => PersonnelField::Email,
            PersonnelField::Email => PersonnelField::Role,
            PersonnelField::Role => PersonnelField::ExperienceLevel,
            PersonnelField::ExperienceLevel => PersonnelField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            PersonnelField::Name => PersonnelField::ExperienceLevel,
            PersonnelField::Email => PersonnelField::Name,
            PersonnelField::Role => PersonnelField::Email,
            PersonnelField::ExperienceLevel => PersonnelField::Role,
        };
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.current_field {
            PersonnelField::Name => Some(&mut self.form.name),
            PersonnelField::Email => Some(&mut self.form.email),
            PersonnelField::Role => Some(&mut self.form.role),
            PersonnelField::ExperienceLevel => None,
        }
    }

    /// Enter on the experience field cycles the level instead of editing text.
    fn activate_field(&mut self) {
        if self.current_field == PersonnelField::ExperienceLevel {
            self.form.experience_level = ExperienceLevel::cycle(self.form.experience_level);
        } else {
            self.editing = !self.editing;
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        if let Some(value) = self.text_field() {
            match key {
                KeyCode::Char(c) => value.push(c),
                KeyCode::Backspace => {
                    value.pop();
                }
                _ => {}
            }
        }
    }

    pub fn validation_error(&self) -> Option<&'static str> {
        if self.form.name.trim().is_empty() {
            Some("Name is required")
        } else if self.form.email.trim().is_empty() {
            Some("Email is required")
        } else {
            None
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<PersonnelWizardAction> {
        match key {
            KeyCode::Esc if self.editing => self.editing = false,
            KeyCode::Esc => return Some(PersonnelWizardAction::Cancel),
            KeyCode::Enter => self.activate_field(),
            KeyCode::Up if !self.editing => self.previous_field(),
            KeyCode::Down if !self.editing => self.next_field(),
            KeyCode::Char('s') if !self.editing => match self.validation_error() {
                None => return Some(PersonnelWizardAction::Save(self.form.clone())),
                Some(message) => self.error = Some(message.to_string()),
            },
            _ if self.editing => self.edit_current_field(key),
            _ => {}
        }
        None
    }
}

pub fn render_personnel_wizard<B: Backend>(f: &mut Frame<B>, state: &mut PersonnelWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = if state.form.id.is_none() {
        "Personnel Creation Wizard"
    } else {
        "Personnel Editing Wizard"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help = match (&state.error, state.editing) {
        (_, true) => Paragraph::new("Enter - Save field | Esc - Cancel editing")
            .style(Style::default().fg(Color::Gray)),
        (Some(error), false) => {
            Paragraph::new(error.clone()).style(Style::default().fg(Color::Red))
        }
        (None, false) => Paragraph::new(
            "Enter - Edit field / cycle level | Up/Down - Navigate fields | S - Save | Esc - Cancel",
        )
        .style(Style::default().fg(Color::Gray)),
    };
    f.render_widget(help.block(Block::default().borders(Borders::ALL)), chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &PersonnelWizardState, area: Rect) {
    let level = state
        .form
        .experience_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| "Not set".to_string());
    let fields = [
        (PersonnelField::Name, "Name", state.form.name.clone()),
        (PersonnelField::Email, "Email", state.form.email.clone()),
        (PersonnelField::Role, "Role", state.form.role.clone()),
        (PersonnelField::ExperienceLevel, "Experience Level", level),
    ];

    let items: Vec<ListItem> = fields
        .into_iter()
        .map(|(field, label, value)| {
            let selected = field == state.current_field;
            let (label_style, value_span) = if selected && state.editing {
                (
                    Style::default().fg(Color::Yellow),
                    Span::styled(
                        format!("{value}|"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                )
            } else if selected {
                (Style::default().fg(Color::Yellow), Span::raw(value))
            } else {
                (Style::default(), Span::raw(value))
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{label}: "), label_style),
                value_span,
            ]))
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Personnel Details"));
    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut PersonnelWizardState) -> Result<Option<PersonnelWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
