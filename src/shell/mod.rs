//! Interactive terminal shell.
//!
//! Reads one command per line, dispatches it to the repository and renders
//! the result. A failing command is reported and the prompt comes back; it
//! never ends the session.

pub mod command;
pub mod forms;
pub mod render;

pub use command::{Command, ParseCommandError, ProjectCommand, WeekSelector};

use crate::application::{WeekMatrix, WeekSummary, fetch_week};
use crate::domain::{NewRecording, RecordingId};
use crate::infra::db::{RepositoryError, SqliteRepository};
use crate::utils::{current_week, week_range};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, Utc};
use colored::Colorize;
use std::io::{BufRead, Write};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP: &[(&str, &str)] = &[
    ("week, w [year] [week]", "Show the recordings of a week"),
    ("week matrix, w m [year] [week]", "Show hours per project and weekday"),
    ("list, l", "List all recordings"),
    ("start <tag> <name>", "Start a recording for a project"),
    ("stop [id]", "Stop a recording (default: the latest running one)"),
    ("project, p", "Manage projects"),
    ("project new", "Create a project"),
    ("help", "Show this help"),
    ("exit", "Exit the application"),
];

/// Erase the display and home the cursor.
const CLEAR_SCREEN: &str = "\r\x1b[2J\r\x1b[H";

const PROJECT_MENU_HELP: &str =
    "Available commands: [new, edit (tag), delete (tag), all, active, exit]";

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<R, W> {
    repo: SqliteRepository,
    input: R,
    out: W,
    /// Attached to a terminal: screens are cleared, output pauses for the
    /// user and forms are available.
    interactive: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(repo: SqliteRepository, input: R, out: W, interactive: bool) -> Self {
        Self {
            repo,
            input,
            out,
            interactive,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.clear_screen()?;
            self.top_bar()?;
            self.prompt("Enter command: -> ")?;
            let Some(line) = self.read_line()? else {
                break;
            };

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(ParseCommandError::Empty) => continue,
                Err(err) => {
                    self.error(&err.to_string())?;
                    self.pause()?;
                    continue;
                }
            };

            match self.execute(command) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    log::warn!("Command '{}' failed: {err:#}", line.trim());
                    self.error(&format!("{err:#}"))?;
                    self.pause()?;
                }
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        log::debug!("Executing {command:?}");
        match command {
            Command::Help => {
                self.help()?;
                self.pause()?;
            }
            Command::Week(selector) => {
                self.week(selector)?;
                self.pause()?;
            }
            Command::WeekMatrix(selector) => {
                self.week_matrix(selector)?;
                self.pause()?;
            }
            Command::List => {
                self.list()?;
                self.pause()?;
            }
            Command::Start { tag, name } => {
                self.start(&tag, &name)?;
                self.pause()?;
            }
            Command::Stop { id } => {
                self.stop(id)?;
                self.pause()?;
            }
            Command::Projects => return self.project_menu(),
            Command::NewProject => {
                self.clear_screen()?;
                self.add_project()?;
                self.pause()?;
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn help(&mut self) -> Result<()> {
        self.info("Available commands:")?;
        for (usage, description) in HELP {
            writeln!(self.out, "  {usage:<32} {description}")?;
        }
        Ok(())
    }

    fn week(&mut self, selector: WeekSelector) -> Result<()> {
        let (year, week) = selector.resolve(current_week());
        let range = week_range(year, week).ok_or_else(|| anyhow!("invalid week {year}-W{week}"))?;
        let recordings = fetch_week(&self.repo, &range, &Local)?;
        let summary = WeekSummary::build(range, &recordings, &Local);

        self.clear_screen()?;
        self.notice(&format!(
            "Week {week} of {year} ({} - {})",
            range.start, range.end
        ))?;
        writeln!(self.out, "{}", render::summary_table(&summary, &Local))?;
        self.info(&format!(
            "Billable {} h, non-billable {} h",
            render::format_hours(summary.billable_hours),
            render::format_hours(summary.non_billable_hours())
        ))?;
        Ok(())
    }

    fn week_matrix(&mut self, selector: WeekSelector) -> Result<()> {
        let (year, week) = selector.resolve(current_week());
        let range = week_range(year, week).ok_or_else(|| anyhow!("invalid week {year}-W{week}"))?;
        let recordings = fetch_week(&self.repo, &range, &Local)?;
        let matrix = WeekMatrix::build(range, &recordings, &Local);

        self.clear_screen()?;
        self.notice(&format!(
            "Week {week} of {year} ({} - {})",
            range.start, range.end
        ))?;
        writeln!(self.out, "{}", render::matrix_table(&matrix))?;
        self.info(&format!(
            "Total week: {} h",
            render::format_hours(matrix.total())
        ))?;
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        let recordings = self.repo.all_recordings()?;
        self.clear_screen()?;
        self.notice("Recordings")?;
        writeln!(self.out, "{}", render::recordings_table(&recordings, &Local))?;
        Ok(())
    }

    fn start(&mut self, tag: &str, name: &str) -> Result<()> {
        let project = match self.repo.get_project_by_tag(tag) {
            Ok(project) => project,
            Err(RepositoryError::NotFound) => return self.info("Project not found"),
            Err(err) => return Err(err.into()),
        };
        if !project.status.is_active() {
            return self.info(&format!("Project {tag} is inactive"));
        }

        let recording = self.repo.create_recording(NewRecording::new(tag, name))?;
        log::info!("Started recording {} for {tag}", recording.id);
        self.notice(&format!(
            "Started recording #{} '{}' on {}",
            recording.id, recording.name, project.name
        ))
    }

    fn stop(&mut self, id: Option<RecordingId>) -> Result<()> {
        let recording = match id {
            Some(id) => match self.repo.get_recording(id) {
                Ok(recording) => recording,
                Err(RepositoryError::NotFound) => {
                    return self.info(&format!("Recording #{id} not found"));
                }
                Err(err) => return Err(err.into()),
            },
            None => match self.repo.latest_open_recording()? {
                Some(recording) => recording,
                None => return self.info("No running recording"),
            },
        };
        if !recording.is_open() {
            return self.info(&format!("Recording #{} is already stopped", recording.id));
        }

        let mut stopped = recording;
        stopped.end_time = Some(Utc::now());
        let stopped = self.repo.update_recording(stopped.id, &stopped)?;
        log::info!("Stopped recording {}", stopped.id);
        self.notice(&format!(
            "Stopped recording #{} after {}",
            stopped.id,
            stopped
                .duration()
                .map(render::format_duration)
                .unwrap_or_default()
        ))
    }

    fn project_menu(&mut self) -> Result<Flow> {
        let mut only_active = true;
        loop {
            self.clear_screen()?;
            if let Err(err) = self.project_list(only_active) {
                self.error(&format!("{err:#}"))?;
            }
            self.info(PROJECT_MENU_HELP)?;
            self.prompt("Enter command: -> ")?;
            let Some(line) = self.read_line()? else {
                return Ok(Flow::Exit);
            };

            let command = match line.parse::<ProjectCommand>() {
                Ok(command) => command,
                Err(ParseCommandError::Empty) => continue,
                Err(err) => {
                    self.error(&err.to_string())?;
                    self.pause()?;
                    continue;
                }
            };

            let result = match command {
                ProjectCommand::New => {
                    self.clear_screen()?;
                    self.add_project()
                }
                ProjectCommand::Edit(tag) => self.edit_project(&tag),
                ProjectCommand::Delete(tag) => self.delete_project(&tag),
                ProjectCommand::All => {
                    only_active = false;
                    continue;
                }
                ProjectCommand::Active => {
                    only_active = true;
                    continue;
                }
                ProjectCommand::Exit => return Ok(Flow::Continue),
            };
            if let Err(err) = result {
                log::warn!("Project command '{}' failed: {err:#}", line.trim());
                self.error(&format!("{err:#}"))?;
            }
            self.pause()?;
        }
    }

    fn project_list(&mut self, only_active: bool) -> Result<()> {
        let (title, projects) = if only_active {
            ("Project List - Active Projects", self.repo.all_active_projects()?)
        } else {
            ("Project List - All Projects", self.repo.all_projects()?)
        };
        self.notice(title)?;
        writeln!(self.out, "{}", render::projects_table(&projects))?;
        Ok(())
    }

    fn add_project(&mut self) -> Result<()> {
        if !self.interactive {
            return self.info("Creating projects requires an interactive terminal");
        }
        let existing = self
            .repo
            .all_projects()?
            .into_iter()
            .map(|p| p.tag)
            .collect();
        let Some(project) = forms::add_project_form(existing)? else {
            return self.info("Project creation canceled");
        };

        self.info("Creating project ...")?;
        let created = self
            .repo
            .create_project(&project)
            .with_context(|| format!("Failed to create project {}", project.tag))?;
        // New projects start active; apply an inactive choice afterwards.
        if created.status != project.status {
            self.repo.update_project(&created.tag, &project)?;
        }
        log::info!("Created project {}", project.tag);
        self.notice("Project created successfully!")
    }

    fn edit_project(&mut self, tag: &str) -> Result<()> {
        let project = match self.repo.get_project_by_tag(tag) {
            Ok(project) => project,
            Err(RepositoryError::NotFound) => return self.info("Project not found"),
            Err(err) => return Err(err.into()),
        };
        if !self.interactive {
            return self.info("Editing projects requires an interactive terminal");
        }

        self.clear_screen()?;
        self.notice(&format!("Edit project '{tag}'"))?;
        let Some(updated) = forms::edit_project_form(&project)? else {
            return self.info("Project update canceled");
        };
        self.info(&format!("Editing project {tag} ..."))?;
        self.repo.update_project(tag, &updated)?;
        log::info!("Updated project {tag}");
        self.notice("Project updated successfully!")
    }

    fn delete_project(&mut self, tag: &str) -> Result<()> {
        match self.repo.delete_project(tag) {
            Ok(()) => {}
            Err(RepositoryError::DeleteFailed) => return self.info("Project not found"),
            Err(err) => return Err(err.into()),
        }
        log::info!("Deleted project {tag}");
        self.notice("Project deleted successfully!")?;

        let kept = self.repo.count_recordings_for_project(tag)?;
        if kept > 0 {
            self.info(&format!("{kept} recording(s) keep the tag {tag}"))?;
        }
        Ok(())
    }

    fn top_bar(&mut self) -> Result<()> {
        let (year, week) = current_week();
        self.info("=================================")?;
        self.info(&format!(
            "Time Tracking v{VERSION}  Week: {week} Year: {year}"
        ))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn pause(&mut self) -> Result<()> {
        if !self.interactive {
            return Ok(());
        }
        self.info("Press enter to continue ...")?;
        self.read_line()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        if self.interactive {
            write!(self.out, "{CLEAR_SCREEN}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{}", text.bold())?;
        self.out.flush()?;
        Ok(())
    }

    fn info(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.white().bold())?;
        Ok(())
    }

    fn notice(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.green().bold())?;
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.red().bold())?;
        Ok(())
    }
}
