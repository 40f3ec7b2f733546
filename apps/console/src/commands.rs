//! Terminal commands and their translation into controller actions.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::{
    controller::events::UiAction,
    ui::files::{select_file, select_files},
};

pub const HELP: &str = "\
Commands:
  select <path>               choose one PDF for outline extraction
  select-many <path> [...]    choose PDFs for persona analysis
  upload                      extract the outline of the selected PDF
  upload-all                  upload every selected PDF, in order
  persona <text>              set the persona
  job <text>                  set the job to be done
  analyze [<persona> | <job>] run the persona analysis
  clear                       delete all uploaded files on the server
  health                      check the analysis service
  dismiss                     hide the status banner
  state                       print the current ui state
  help                        show this help
  quit                        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Option<PathBuf>),
    SelectMany(Vec<PathBuf>),
    Upload,
    UploadAll,
    Persona(String),
    Job(String),
    Analyze(Option<(String, String)>),
    Clear,
    Health,
    Dismiss,
    State,
    Help,
    Quit,
}

/// Parses one input line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "select" => Command::Select((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "select-many" => Command::SelectMany(rest.split_whitespace().map(PathBuf::from).collect()),
        "upload" => Command::Upload,
        "upload-all" => Command::UploadAll,
        "persona" => Command::Persona(rest.to_string()),
        "job" => Command::Job(rest.to_string()),
        "analyze" if rest.is_empty() => Command::Analyze(None),
        "analyze" => match rest.split_once('|') {
            Some((persona, job)) => {
                Command::Analyze(Some((persona.trim().to_string(), job.trim().to_string())))
            }
            None => bail!("usage: analyze <persona> | <job>"),
        },
        "clear" => Command::Clear,
        "health" => Command::Health,
        "dismiss" => Command::Dismiss,
        "state" => Command::State,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}', try 'help'"),
    };
    Ok(Some(command))
}

impl Command {
    /// Controller actions for this command. File paths are resolved here, so an
    /// unreadable path fails before the controller sees anything.
    pub fn into_actions(self) -> Result<Vec<UiAction>> {
        let actions = match self {
            Command::Select(path) => {
                let file = path.as_deref().map(select_file).transpose()?;
                vec![UiAction::SelectSingleFile(file)]
            }
            Command::SelectMany(paths) => vec![UiAction::SelectMultipleFiles(select_files(&paths)?)],
            Command::Upload => vec![UiAction::UploadSingle],
            Command::UploadAll => vec![UiAction::UploadBatch],
            Command::Persona(persona) => vec![UiAction::SetPersona(persona)],
            Command::Job(job) => vec![UiAction::SetJob(job)],
            Command::Analyze(None) => vec![UiAction::Analyze],
            Command::Analyze(Some((persona, job))) => vec![
                UiAction::SetPersona(persona),
                UiAction::SetJob(job),
                UiAction::Analyze,
            ],
            Command::Clear => vec![UiAction::Clear],
            Command::Health => vec![UiAction::CheckHealth],
            Command::Dismiss => vec![UiAction::DismissStatus],
            Command::State | Command::Help | Command::Quit => Vec::new(),
        };
        Ok(actions)
    }
}
