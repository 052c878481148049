use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::{Project, ProjectStatus};
use crate::ui::{first_selected, frame_layout, render_confirmation, step_selection, Tab};

// Represents the state of the project selection screen
pub struct ProjectsState {
    projects: Vec<Project>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let list_state = first_selected(projects.len());
        Self {
            projects,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<i32> {
        self.selected_project().map(|p| p.id)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ProjectAction> {
        if self.show_delete_confirmation {
            match key {
                KeyCode::Char('y') => {
                    self.show_delete_confirmation = false;
                    return self.selected_project_id().map(ProjectAction::DeleteProject);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.show_delete_confirmation = false,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectAction::Exit),
            KeyCode::Tab => return Some(ProjectAction::NextTab),
            KeyCode::Char('n') => return Some(ProjectAction::NewProject),
            KeyCode::Char('e') => return self.selected_project_id().map(ProjectAction::EditProject),
            KeyCode::Enter => return self.selected_project_id().map(ProjectAction::ViewMatches),
            KeyCode::Char('d') if self.selected_project().is_some() => {
                self.show_delete_confirmation = true;
            }
            KeyCode::Down => step_selection(&mut self.list_state, self.projects.len(), true),
            KeyCode::Up => step_selection(&mut self.list_state, self.projects.len(), false),
            _ => {}
        }
        None
    }
}

pub enum ProjectAction {
    Exit,
    NextTab,
    NewProject,
    EditProject(i32),
    DeleteProject(i32),
    ViewMatches(i32),
}

fn status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::Active => Color::Green,
        ProjectStatus::Planning => Color::Cyan,
        ProjectStatus::OnHold => Color::Yellow,
        ProjectStatus::Completed => Color::Gray,
        ProjectStatus::Cancelled | ProjectStatus::Archived => Color::DarkGray,
    }
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    let footer = if state.selected_project().is_some() {
        "<N> New Project | <E> Edit | <D> Delete | <Enter> Requirements & Matches | <Tab> Next | <Q> Quit"
    } else {
        "<N> New Project | <Tab> Next | <Q> Quit"
    };
    let body = frame_layout(frame, Tab::Projects, footer);

    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            let dates = match (project.start_date, project.end_date) {
                (Some(start), Some(end)) => {
                    format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
                }
                (Some(start), None) => format!("{} to Present", start.format("%Y-%m-%d")),
                (None, Some(end)) => format!("until {}", end.format("%Y-%m-%d")),
                (None, None) => "No dates".to_string(),
            };

            ListItem::new(Spans::from(vec![
                Span::styled(
                    format!("{:<12}", project.status.as_str()),
                    Style::default().fg(status_color(project.status)),
                ),
                Span::styled(
                    project.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" ({dates})")),
            ]))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(projects_list, body, &mut state.list_state);

    if state.show_delete_confirmation {
        render_confirmation(
            frame,
            "Confirm Delete",
            &[
                "Are you sure you want to delete this project?",
                "Its skill requirements will also be deleted.",
            ],
        );
    }
}

pub fn handle_input(state: &mut ProjectsState) -> Result<Option<ProjectAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
