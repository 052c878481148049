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

use crate::models::Skill;

#[derive(Clone, Debug, Default)]
pub struct SkillForm {
    pub id: Option<i32>,
    pub name: String,
    pub category: String,
    pub description: String,
}

pub enum SkillWizardAction {
    Cancel,
    Save(SkillForm),
}

#[derive(Clone, PartialEq, Copy)]
pub enum SkillField {
    Name,
    Category,
    Description,
}

pub struct SkillWizardState {
    pub form: SkillForm,
    pub current_field: SkillField,
    pub editing: bool,
    pub error: Option<String>,
}

impl SkillWizardState {
    pub fn new() -> Self {
        Self {
            form: SkillForm::default(),
            current_field: SkillField::Name,
            editing: false,
            error: None,
        }
    }

    pub fn from_existing(skill: Skill) -> Self {
        Self {
            form: SkillForm {
                id: Some(skill.id),
                name: skill.name,
                category: skill.category.unwrap_or_default(),
                description: skill.description.unwrap_or_default(),
            },
            ..Self::new()
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            SkillField::Name => SkillField::Category,
            SkillField::Category => SkillField::Description,
            SkillField::Description => SkillField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            SkillField::Name => SkillField::Description,
            SkillField::Category => SkillField::Name,
            SkillField::Description => SkillField::Category,
        };
    }

    fn current_value(&mut self) -> &mut String {
        match self.current_field {
            SkillField::Name => &mut self.form.name,
            SkillField::Category => &mut self.form.category,
            SkillField::Description => &mut self.form.description,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) => self.current_value().push(c),
            KeyCode::Backspace => {
                self.current_value().pop();
            }
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.form.name.trim().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<SkillWizardAction> {
        match key {
            KeyCode::Esc if self.editing => self.editing = false,
            KeyCode::Esc => return Some(SkillWizardAction::Cancel),
            KeyCode::Enter => self.editing = !self.editing,
            KeyCode::Up if !self.editing => self.previous_field(),
            KeyCode::Down if !self.editing => self.next_field(),
            KeyCode::Char('s') if !self.editing => {
                if self.is_valid() {
                    return Some(SkillWizardAction::Save(self.form.clone()));
                }
                self.error = Some("Skill name is required".to_string());
            }
            _ if self.editing => self.edit_current_field(key),
            _ => {}
        }
        None
    }
}

pub fn render_skill_wizard<B: Backend>(f: &mut Frame<B>, state: &mut SkillWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = if state.form.id.is_none() {
        "Skill Creation Wizard"
    } else {
        "Skill Editing Wizard"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let (help_text, help_style) = match (&state.error, state.editing) {
        (Some(error), false) => (error.clone(), Style::default().fg(Color::Red)),
        (_, true) => (
            "Enter - Save field | Esc - Cancel editing".to_string(),
            Style::default().fg(Color::Gray),
        ),
        (None, false) => (
            "Enter - Edit field | Up/Down - Navigate fields | S - Save skill | Esc - Cancel"
                .to_string(),
            Style::default().fg(Color::Gray),
        ),
    };
    let help = Paragraph::new(help_text)
        .style(help_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &SkillWizardState, area: Rect) {
    let fields = [
        (SkillField::Name, "Name", &state.form.name),
        (SkillField::Category, "Category", &state.form.category),
        (SkillField::Description, "Description", &state.form.description),
    ];

    let items: Vec<ListItem> = fields
        .iter()
        .map(|(field, label, value)| {
            let selected = *field == state.current_field;
            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{value}|"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{label}: "), style),
                    Span::raw(value.to_string()),
                ])
            };
            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Skill Details"));
    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut SkillWizardState) -> Result<Option<SkillWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
