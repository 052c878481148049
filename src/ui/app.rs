use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::db::Store;
use crate::error::Error;
use crate::matching::{MatchingEngine, PersonnelSearch};
use crate::models::{
    NewPersonnel, NewProject, NewSkill, PersonnelPatch, ProjectPatch, SkillPatch,
};
use crate::ui::{
    personnel::{handle_input as handle_personnel_input, render_personnel, PersonnelAction, PersonnelState},
    personnel_skills::{
        handle_input as handle_personnel_skills_input, render_personnel_skills,
        PersonnelSkillsAction, PersonnelSkillsState,
    },
    personnel_wizard::{
        handle_input as handle_personnel_wizard_input, render_personnel_wizard, PersonnelForm,
        PersonnelWizardAction, PersonnelWizardState,
    },
    project_matches::{
        handle_input as handle_project_matches_input, render_project_matches,
        ProjectMatchesAction, ProjectMatchesState,
    },
    project_wizard::{
        handle_input as handle_project_wizard_input, render_project_wizard, ProjectForm,
        ProjectWizardAction, ProjectWizardState,
    },
    projects::{handle_input as handle_projects_input, render_projects, ProjectAction, ProjectsState},
    skill_wizard::{
        handle_input as handle_skill_wizard_input, render_skill_wizard, SkillForm,
        SkillWizardAction, SkillWizardState,
    },
    skills::{handle_input as handle_skills_input, render_skills, SkillAction, SkillsState},
    utilization::{
        handle_input as handle_utilization_input, render_utilization, UtilizationAction,
        UtilizationState,
    },
    Tab,
};

// Represents the current screen in the app
enum AppScreen {
    Skills(SkillsState),
    SkillWizard(SkillWizardState),
    Personnel(PersonnelState),
    PersonnelWizard(PersonnelWizardState),
    PersonnelSkills(PersonnelSkillsState),
    Projects(ProjectsState),
    ProjectWizard(ProjectWizardState),
    ProjectMatches(ProjectMatchesState),
    Utilization(UtilizationState),
}

struct App {
    store: Store,
    engine: MatchingEngine,
    personnel_search: PersonnelSearch,
    screen: AppScreen,
}

/// Takes over the terminal until the user quits.
pub async fn run(store: Store, engine: MatchingEngine) -> Result<()> {
    let skills = store.list_skills().await?;
    let mut app = App {
        store,
        engine,
        personnel_search: PersonnelSearch::default(),
        screen: AppScreen::Skills(SkillsState::new(skills)),
    };

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| match &mut app.screen {
            AppScreen::Skills(state) => render_skills(f, state),
            AppScreen::SkillWizard(state) => render_skill_wizard(f, state),
            AppScreen::Personnel(state) => render_personnel(f, state),
            AppScreen::PersonnelWizard(state) => render_personnel_wizard(f, state),
            AppScreen::PersonnelSkills(state) => render_personnel_skills(f, state),
            AppScreen::Projects(state) => render_projects(f, state),
            AppScreen::ProjectWizard(state) => render_project_wizard(f, state),
            AppScreen::ProjectMatches(state) => render_project_matches(f, state),
            AppScreen::Utilization(state) => render_utilization(f, state),
        })?;

        let should_quit = match &app.screen {
            AppScreen::Skills(_) => handle_skills_screen(app).await?,
            AppScreen::SkillWizard(_) => handle_skill_wizard_screen(app).await?,
            AppScreen::Personnel(_) => handle_personnel_screen(app).await?,
            AppScreen::PersonnelWizard(_) => handle_personnel_wizard_screen(app).await?,
            AppScreen::PersonnelSkills(_) => handle_personnel_skills_screen(app).await?,
            AppScreen::Projects(_) => handle_projects_screen(app).await?,
            AppScreen::ProjectWizard(_) => handle_project_wizard_screen(app).await?,
            AppScreen::ProjectMatches(_) => handle_project_matches_screen(app).await?,
            AppScreen::Utilization(_) => handle_utilization_screen(app).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Client-side failures become a message for the form; anything else aborts the console.
fn form_error(err: Error) -> Result<String> {
    if err.status_code().is_client_error() {
        Ok(err.to_string())
    } else {
        Err(err.into())
    }
}

async fn open_tab(app: &mut App, tab: Tab) -> Result<()> {
    app.screen = match tab {
        Tab::Skills => AppScreen::Skills(SkillsState::new(app.store.list_skills().await?)),
        Tab::Personnel => {
            let mut skill_name = None;
            if let Some(skill_id) = app.personnel_search.skill_id {
                match app.store.get_skill(skill_id).await? {
                    Some(skill) => skill_name = Some(skill.name),
                    None => {
                        app.personnel_search.skill_id = None;
                        app.personnel_search.min_proficiency = None;
                    }
                }
            }
            let personnel = app.engine.search_personnel(&app.personnel_search).await?;
            AppScreen::Personnel(PersonnelState::new(
                personnel,
                app.personnel_search.clone(),
                skill_name,
            ))
        }
        Tab::Projects => AppScreen::Projects(ProjectsState::new(app.store.list_projects().await?)),
        Tab::Utilization => {
            AppScreen::Utilization(UtilizationState::new(app.engine.utilization().await?))
        }
    };
    Ok(())
}

async fn open_personnel_skills(app: &mut App, personnel_id: i32) -> Result<()> {
    let Some(personnel) = app.store.get_personnel(personnel_id).await? else {
        return open_tab(app, Tab::Personnel).await;
    };
    let holdings = app.store.list_personnel_skills(personnel_id).await?;
    app.screen = AppScreen::PersonnelSkills(PersonnelSkillsState::new(personnel, holdings));
    Ok(())
}

async fn open_project_matches(app: &mut App, project_id: i32) -> Result<()> {
    let Some(project) = app.store.get_project(project_id).await? else {
        return open_tab(app, Tab::Projects).await;
    };
    let requirements = app.store.list_project_requirements(project_id).await?;
    let matches = app.engine.match_project(project_id).await?;
    app.screen = AppScreen::ProjectMatches(ProjectMatchesState::new(project, requirements, matches));
    Ok(())
}

async fn handle_skills_screen(app: &mut App) -> Result<bool> {
    let AppScreen::Skills(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_skills_input(state)? {
        Some(SkillAction::Exit) => return Ok(true),
        Some(SkillAction::NextTab) => open_tab(app, Tab::Skills.next()).await?,
        Some(SkillAction::NewSkill) => {
            app.screen = AppScreen::SkillWizard(SkillWizardState::new());
        }
        Some(SkillAction::EditSkill(id)) => {
            if let Some(skill) = app.store.get_skill(id).await? {
                app.screen = AppScreen::SkillWizard(SkillWizardState::from_existing(skill));
            }
        }
        Some(SkillAction::DeleteSkill(id)) => {
            app.store.delete_skill(id).await?;
            open_tab(app, Tab::Skills).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn save_skill(store: &Store, form: SkillForm) -> crate::Result<()> {
    match form.id {
        None => {
            let skill = NewSkill::new(form.name, Some(form.category), Some(form.description))?;
            store.create_skill(skill).await?;
        }
        Some(id) => {
            let patch = SkillPatch::new(Some(form.name), Some(form.category), Some(form.description));
            store
                .update_skill(id, patch)
                .await?
                .ok_or_else(|| Error::not_found("Skill"))?;
        }
    }
    Ok(())
}

async fn handle_skill_wizard_screen(app: &mut App) -> Result<bool> {
    let AppScreen::SkillWizard(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_skill_wizard_input(state)? {
        Some(SkillWizardAction::Cancel) => open_tab(app, Tab::Skills).await?,
        Some(SkillWizardAction::Save(form)) => match save_skill(&app.store, form).await {
            Ok(()) => open_tab(app, Tab::Skills).await?,
            Err(err) => state.error = Some(form_error(err)?),
        },
        None => {}
    }

    Ok(false)
}

async fn handle_personnel_screen(app: &mut App) -> Result<bool> {
    let AppScreen::Personnel(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_personnel_input(state)? {
        Some(PersonnelAction::Exit) => return Ok(true),
        Some(PersonnelAction::NextTab) => open_tab(app, Tab::Personnel.next()).await?,
        Some(PersonnelAction::NewPersonnel) => {
            app.screen = AppScreen::PersonnelWizard(PersonnelWizardState::new());
        }
        Some(PersonnelAction::EditPersonnel(id)) => {
            if let Some(personnel) = app.store.get_personnel(id).await? {
                app.screen =
                    AppScreen::PersonnelWizard(PersonnelWizardState::from_existing(personnel));
            }
        }
        Some(PersonnelAction::DeletePersonnel(id)) => {
            app.store.delete_personnel(id).await?;
            open_tab(app, Tab::Personnel).await?;
        }
        Some(PersonnelAction::ViewSkills(id)) => open_personnel_skills(app, id).await?,
        Some(PersonnelAction::OpenSkillFilter) => {
            let skills = app.store.list_skills().await?;
            state.open_skill_filter(skills);
        }
        Some(PersonnelAction::Filter(search)) => {
            app.personnel_search = search;
            open_tab(app, Tab::Personnel).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn save_personnel(store: &Store, form: PersonnelForm) -> crate::Result<()> {
    match form.id {
        None => {
            let personnel =
                NewPersonnel::new(form.name, form.email, Some(form.role), form.experience_level)?;
            store.create_personnel(personnel).await?;
        }
        Some(id) => {
            let patch = PersonnelPatch::new(
                Some(form.name),
                Some(form.email),
                Some(form.role),
                form.experience_level,
            );
            store
                .update_personnel(id, patch)
                .await?
                .ok_or_else(|| Error::not_found("Personnel"))?;
        }
    }
    Ok(())
}

async fn handle_personnel_wizard_screen(app: &mut App) -> Result<bool> {
    let AppScreen::PersonnelWizard(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_personnel_wizard_input(state)? {
        Some(PersonnelWizardAction::Cancel) => open_tab(app, Tab::Personnel).await?,
        Some(PersonnelWizardAction::Save(form)) => match save_personnel(&app.store, form).await {
            Ok(()) => open_tab(app, Tab::Personnel).await?,
            Err(err) => state.error = Some(form_error(err)?),
        },
        None => {}
    }

    Ok(false)
}

async fn handle_personnel_skills_screen(app: &mut App) -> Result<bool> {
    let AppScreen::PersonnelSkills(state) = &mut app.screen else {
        return Ok(false);
    };
    let personnel_id = state.personnel_id();

    match handle_personnel_skills_input(state)? {
        Some(PersonnelSkillsAction::Back) => open_tab(app, Tab::Personnel).await?,
        Some(PersonnelSkillsAction::OpenPicker) => {
            let skills = app.store.list_skills().await?;
            state.open_picker(skills);
        }
        Some(PersonnelSkillsAction::Assign(skill_id, level)) => {
            app.store.assign_skill(personnel_id, skill_id, level).await?;
            open_personnel_skills(app, personnel_id).await?;
        }
        Some(PersonnelSkillsAction::ChangeLevel(skill_id, level)) => {
            app.store
                .update_personnel_skill(personnel_id, skill_id, level)
                .await?;
            open_personnel_skills(app, personnel_id).await?;
        }
        Some(PersonnelSkillsAction::Remove(skill_id)) => {
            app.store.remove_personnel_skill(personnel_id, skill_id).await?;
            open_personnel_skills(app, personnel_id).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_projects_screen(app: &mut App) -> Result<bool> {
    let AppScreen::Projects(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_projects_input(state)? {
        Some(ProjectAction::Exit) => return Ok(true),
        Some(ProjectAction::NextTab) => open_tab(app, Tab::Projects.next()).await?,
        Some(ProjectAction::NewProject) => {
            app.screen = AppScreen::ProjectWizard(ProjectWizardState::new());
        }
        Some(ProjectAction::EditProject(id)) => {
            if let Some(project) = app.store.get_project(id).await? {
                app.screen = AppScreen::ProjectWizard(ProjectWizardState::from_existing(project));
            }
        }
        Some(ProjectAction::DeleteProject(id)) => {
            app.store.delete_project(id).await?;
            open_tab(app, Tab::Projects).await?;
        }
        Some(ProjectAction::ViewMatches(id)) => open_project_matches(app, id).await?,
        None => {}
    }

    Ok(false)
}

async fn save_project(store: &Store, form: ProjectForm) -> crate::Result<()> {
    match form.id {
        None => {
            let project = NewProject::new(
                form.name,
                Some(form.description),
                form.start_date,
                form.end_date,
                Some(form.status),
            )?;
            store.create_project(project).await?;
        }
        Some(id) => {
            let patch = ProjectPatch::new(
                Some(form.name),
                Some(form.description),
                form.start_date,
                form.end_date,
                Some(form.status),
            );
            store
                .update_project(id, patch)
                .await?
                .ok_or_else(|| Error::not_found("Project"))?;
        }
    }
    Ok(())
}

async fn handle_project_wizard_screen(app: &mut App) -> Result<bool> {
    let AppScreen::ProjectWizard(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_project_wizard_input(state)? {
        Some(ProjectWizardAction::Cancel) => open_tab(app, Tab::Projects).await?,
        Some(ProjectWizardAction::Save(form)) => match save_project(&app.store, form).await {
            Ok(()) => open_tab(app, Tab::Projects).await?,
            Err(err) => state.error = Some(form_error(err)?),
        },
        None => {}
    }

    Ok(false)
}

async fn handle_project_matches_screen(app: &mut App) -> Result<bool> {
    let AppScreen::ProjectMatches(state) = &mut app.screen else {
        return Ok(false);
    };
    let project_id = state.project_id();

    match handle_project_matches_input(state)? {
        Some(ProjectMatchesAction::Back) => open_tab(app, Tab::Projects).await?,
        Some(ProjectMatchesAction::OpenPicker) => {
            let skills = app.store.list_skills().await?;
            state.open_picker(skills);
        }
        Some(ProjectMatchesAction::AddRequirement(skill_id, minimum)) => {
            app.store.add_requirement(project_id, skill_id, minimum).await?;
            open_project_matches(app, project_id).await?;
        }
        Some(ProjectMatchesAction::ChangeMinimum(skill_id, minimum)) => {
            app.store
                .update_requirement(project_id, skill_id, minimum)
                .await?;
            open_project_matches(app, project_id).await?;
        }
        Some(ProjectMatchesAction::RemoveRequirement(skill_id)) => {
            app.store.remove_requirement(project_id, skill_id).await?;
            open_project_matches(app, project_id).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_utilization_screen(app: &mut App) -> Result<bool> {
    let AppScreen::Utilization(state) = &mut app.screen else {
        return Ok(false);
    };

    match handle_utilization_input(state)? {
        Some(UtilizationAction::Exit) => return Ok(true),
        Some(UtilizationAction::NextTab) => open_tab(app, Tab::Utilization.next()).await?,
        Some(UtilizationAction::Refresh) => open_tab(app, Tab::Utilization).await?,
        None => {}
    }

    Ok(false)
}
