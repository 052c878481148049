use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::Skill;
use crate::ui::{first_selected, frame_layout, render_confirmation, step_selection, Tab};

// Represents the state of the skill catalog screen
pub struct SkillsState {
    skills: Vec<Skill>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl SkillsState {
    pub fn new(skills: Vec<Skill>) -> Self {
        let list_state = first_selected(skills.len());
        Self {
            skills,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        step_selection(&mut self.list_state, self.skills.len(), true);
    }

    pub fn previous(&mut self) {
        step_selection(&mut self.list_state, self.skills.len(), false);
    }

    pub fn selected_skill(&self) -> Option<&Skill> {
        self.list_state.selected().and_then(|i| self.skills.get(i))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<SkillAction> {
        if self.show_delete_confirmation {
            match key {
                KeyCode::Char('y') => {
                    self.show_delete_confirmation = false;
                    return self.selected_skill().map(|s| SkillAction::DeleteSkill(s.id));
                }
                KeyCode::Char('n') | KeyCode::Esc => self.show_delete_confirmation = false,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(SkillAction::Exit),
            KeyCode::Tab => return Some(SkillAction::NextTab),
            KeyCode::Char('n') => return Some(SkillAction::NewSkill),
            KeyCode::Char('e') | KeyCode::Enter => {
                return self.selected_skill().map(|s| SkillAction::EditSkill(s.id));
            }
            KeyCode::Char('d') if self.selected_skill().is_some() => {
                self.show_delete_confirmation = true;
            }
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            _ => {}
        }
        None
    }
}

pub enum SkillAction {
    Exit,
    NextTab,
    NewSkill,
    EditSkill(i32),
    DeleteSkill(i32),
}

pub fn render_skills<B: Backend>(frame: &mut Frame<B>, state: &mut SkillsState) {
    let footer = if state.selected_skill().is_some() {
        "<N> New Skill | <E> Edit Skill | <D> Delete Skill | <Tab> Next | <Q> Quit"
    } else {
        "<N> New Skill | <Tab> Next | <Q> Quit"
    };
    let body = frame_layout(frame, Tab::Skills, footer);

    let items: Vec<ListItem> = state
        .skills
        .iter()
        .map(|skill| {
            let mut spans = vec![Span::styled(
                skill.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(category) = &skill.category {
                spans.push(Span::raw(format!(" [{category}]")));
            }
            if let Some(description) = &skill.description {
                spans.push(Span::styled(
                    format!("  {description}"),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Spans::from(spans))
        })
        .collect();

    let skills_list = List::new(items)
        .block(Block::default().title("Skills").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(skills_list, body, &mut state.list_state);

    if state.show_delete_confirmation {
        render_confirmation(
            frame,
            "Confirm Delete",
            &[
                "Are you sure you want to delete this skill?",
                "It will be removed from every person and project.",
            ],
        );
    }
}

pub fn handle_input(state: &mut SkillsState) -> Result<Option<SkillAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
