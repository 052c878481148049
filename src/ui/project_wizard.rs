use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Project, ProjectStatus};
use crate::ui::components::date_input::DateInputState;

#[derive(Clone, Debug, Default)]
pub struct ProjectForm {
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

pub enum ProjectWizardAction {
    Cancel,
    Save(ProjectForm),
}

#[derive(Clone, PartialEq, Copy)]
pub enum ProjectField {
    Name,
    Description,
    StartDate,
    EndDate,
    Status,
}

pub struct ProjectWizardState {
    pub form: ProjectForm,
    pub current_field: ProjectField,
    pub editing: bool,
    pub start_date_state: DateInputState,
    pub end_date_state: DateInputState,
    pub error: Option<String>,
}

impl ProjectWizardState {
    pub fn new() -> Self {
        Self::with_form(ProjectForm::default())
    }

    pub fn from_existing(project: Project) -> Self {
        Self::with_form(ProjectForm {
            id: Some(project.id),
            name: project.name,
            description: project.description.unwrap_or_default(),
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
        })
    }

    fn with_form(form: ProjectForm) -> Self {
        Self {
            start_date_state: DateInputState::new(form.start_date),
            end_date_state: DateInputState::new(form.end_date),
            form,
            current_field: ProjectField::Name,
            editing: false,
            error: None,
        }
    }

    fn date_state(&mut self) -> Option<&mut DateInputState> {
        match self.current_field {
            ProjectField::StartDate => Some(&mut self.start_date_state),
            ProjectField::EndDate => Some(&mut self.end_date_state),
            _ => None,
        }
    }

    fn sync_dates(&mut self) {
        self.form.start_date = self.start_date_state.date;
        self.form.end_date = self.end_date_state.date;
    }

    pub fn toggle_editing(&mut self) {
        if self.current_field == ProjectField::Status {
            self.form.status = self.form.status.next();
            return;
        }

        self.editing = !self.editing;
        if let Some(date) = self.date_state() {
            date.toggle_editing();
        }
        self.sync_dates();
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::Description,
            ProjectField::Description => ProjectField::StartDate,
            ProjectField::StartDate => ProjectField::EndDate,
            ProjectField::EndDate => ProjectField::Status,
            ProjectField::Status => ProjectField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProjectField::Name => ProjectField::Status,
            ProjectField::Description => ProjectField::Name,
            ProjectField::StartDate => ProjectField::Description,
            ProjectField::EndDate => ProjectField::StartDate,
            ProjectField::Status => ProjectField::EndDate,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let text = match self.current_field {
            ProjectField::Name => &mut self.form.name,
            ProjectField::Description => &mut self.form.description,
            ProjectField::StartDate | ProjectField::EndDate => {
                if let Some(date) = self.date_state() {
                    date.handle_input(key);
                }
                self.sync_dates();
                return;
            }
            ProjectField::Status => return,
        };

        match key {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => {}
        }
    }

    /// Unsets the date under the cursor.
    pub fn clear_date(&mut self) {
        if let Some(date) = self.date_state() {
            date.clear();
        }
        self.sync_dates();
    }

    pub fn validation_error(&self) -> Option<&'static str> {
        if self.form.name.trim().is_empty() {
            return Some("Project name is required");
        }
        match (self.form.start_date, self.form.end_date) {
            (Some(start), Some(end)) if end < start => Some("End date is before start date"),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ProjectWizardAction> {
        match key {
            KeyCode::Esc if self.editing => self.toggle_editing(),
            KeyCode::Esc => return Some(ProjectWizardAction::Cancel),
            KeyCode::Enter => self.toggle_editing(),
            KeyCode::Up if !self.editing => self.previous_field(),
            KeyCode::Down if !self.editing => self.next_field(),
            KeyCode::Char('c') if !self.editing => self.clear_date(),
            KeyCode::Char('s') if !self.editing => match self.validation_error() {
                None => return Some(ProjectWizardAction::Save(self.form.clone())),
                Some(message) => self.error = Some(message.to_string()),
            },
            _ if self.editing => self.edit_current_field(key),
            _ => {}
        }
        None
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(9),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    // Title with appropriate text based on whether we're editing or creating
    let title_text = if state.form.id.is_none() {
        "Project Creation Wizard"
    } else {
        "Project Editing Wizard"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help = if state.editing {
        let text = match state.current_field {
            ProjectField::StartDate | ProjectField::EndDate => {
                "Enter - Save field | Left/Right - Switch date part | Esc - Done"
            }
            _ => "Enter - Save field | Esc - Cancel editing",
        };
        Paragraph::new(text).style(Style::default().fg(Color::Gray))
    } else if let Some(error) = &state.error {
        Paragraph::new(error.clone()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new(
            "Enter - Edit field / cycle status | Up/Down - Navigate | C - Clear date | S - Save | Esc - Cancel",
        )
        .style(Style::default().fg(Color::Gray))
    };
    f.render_widget(help.block(Block::default().borders(Borders::ALL)), chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState, area: Rect) {
    let fields = [
        (ProjectField::Name, "Name", state.form.name.clone()),
        (
            ProjectField::Description,
            "Description",
            state.form.description.clone(),
        ),
        (
            ProjectField::StartDate,
            "Start Date",
            state.start_date_state.display(),
        ),
        (
            ProjectField::EndDate,
            "End Date",
            state.end_date_state.display(),
        ),
        (
            ProjectField::Status,
            "Status",
            state.form.status.as_str().to_string(),
        ),
    ];

    let items: Vec<ListItem> = fields
        .into_iter()
        .map(|(field, label, value)| {
            let selected = field == state.current_field;
            let is_text = matches!(field, ProjectField::Name | ProjectField::Description);
            let content = if selected && state.editing {
                let value = if is_text { format!("{value}|") } else { value };
                Spans::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
                    Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{label}: "), style),
                    Span::raw(value),
                ])
            };
            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"));
    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
