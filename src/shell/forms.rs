//! Interactive forms for creating and editing projects.

use crate::domain::{MAX_NAME_LEN, MAX_TAG_LEN, PROJECT_TYPES, Project, Status};
use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};

const STATUS_OPTIONS: [&str; 2] = ["Active", "Inactive"];

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("please enter a name.".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("name is too long (max {MAX_NAME_LEN} characters)"));
    }
    Ok(())
}

pub fn validate_tag(tag: &str, existing: &[String]) -> Result<(), String> {
    if tag.trim().is_empty() {
        return Err("please enter a tag.".to_string());
    }
    if tag.chars().any(char::is_whitespace) {
        return Err("tag must not contain spaces".to_string());
    }
    if tag.chars().count() > MAX_TAG_LEN {
        return Err("tag is too long".to_string());
    }
    if existing.iter().any(|t| t == tag) {
        return Err("tag already exists".to_string());
    }
    Ok(())
}

fn to_validation(result: Result<(), String>) -> Validation {
    match result {
        Ok(()) => Validation::Valid,
        Err(message) => Validation::Invalid(message.into()),
    }
}

/// Cancelling a prompt is not an error; it yields `None`.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn prompt_type(current: Option<&str>) -> Result<Option<String>> {
    let labels: Vec<&str> = PROJECT_TYPES.iter().map(|(label, _)| *label).collect();
    let cursor = current
        .and_then(|value| PROJECT_TYPES.iter().position(|(_, v)| *v == value))
        .unwrap_or(0);
    let Some(label) = answer(
        Select::new("Project type", labels)
            .with_starting_cursor(cursor)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    Ok(PROJECT_TYPES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, value)| value.to_string()))
}

fn prompt_status(current: Status) -> Result<Option<Status>> {
    let cursor = if current.is_active() { 0 } else { 1 };
    let choice = answer(
        Select::new("Status", STATUS_OPTIONS.to_vec())
            .with_starting_cursor(cursor)
            .prompt(),
    )?;
    Ok(choice.map(|label| {
        if label == STATUS_OPTIONS[0] {
            Status::Active
        } else {
            Status::Inactive
        }
    }))
}

fn prompt_name(initial: Option<&str>) -> Result<Option<String>> {
    let mut text = Text::new("Project name").with_validator(
        |input: &str| -> Result<Validation, CustomUserError> {
            Ok(to_validation(validate_name(input)))
        },
    );
    if let Some(initial) = initial {
        text = text.with_initial_value(initial);
    }
    Ok(answer(text.prompt())?.map(|name| name.trim().to_string()))
}

/// Collect the fields of a new project. `existing_tags` are rejected.
pub fn add_project_form(existing_tags: Vec<String>) -> Result<Option<Project>> {
    let Some(name) = prompt_name(None)? else {
        return Ok(None);
    };
    let Some(tag) = answer(
        Text::new("Project tag")
            .with_help_message("at most 10 characters")
            .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(to_validation(validate_tag(input, &existing_tags)))
            })
            .prompt(),
    )?
    else {
        return Ok(None);
    };
    let Some(project_type) = prompt_type(None)? else {
        return Ok(None);
    };
    let Some(status) = prompt_status(Status::Active)? else {
        return Ok(None);
    };
    let confirmed = answer(
        Confirm::new("Create new project?")
            .with_default(true)
            .prompt(),
    )?
    .unwrap_or(false);

    Ok(confirmed.then(|| Project::new(tag, name, project_type).with_status(status)))
}

/// Edit name, type and status of `project`. The tag cannot change.
pub fn edit_project_form(project: &Project) -> Result<Option<Project>> {
    let Some(name) = prompt_name(Some(&project.name))? else {
        return Ok(None);
    };
    let Some(project_type) = prompt_type(Some(&project.project_type))? else {
        return Ok(None);
    };
    let Some(status) = prompt_status(project.status)? else {
        return Ok(None);
    };
    let confirmed = answer(
        Confirm::new(&format!("Save changes to project '{}'?", project.tag))
            .with_default(true)
            .prompt(),
    )?
    .unwrap_or(false);

    Ok(confirmed.then(|| {
        Project::new(project.tag.clone(), name, project_type).with_status(status)
    }))
}
