use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Parameters, Project, ProjectStatus};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML fixture: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid project {id}: {reason}")]
    Invalid { id: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    projects: Vec<Project>,
}

pub fn load_seed(path: &Path) -> Result<Vec<Project>, FixtureError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!(
                event = "fixtures.seed.missing",
                path = %path.display(),
                "seed file not found, using sample projects"
            );
            return Ok(sample_projects());
        }
        Err(err) => return Err(FixtureError::Io(err)),
    };

    let seed: SeedFile = toml::from_str(&raw)?;
    validate(&seed.projects)?;
    tracing::debug!(
        event = "fixtures.seed.loaded",
        path = %path.display(),
        count = seed.projects.len()
    );
    Ok(seed.projects)
}

fn validate(projects: &[Project]) -> Result<(), FixtureError> {
    let mut seen = HashSet::new();
    for project in projects {
        let invalid = |reason: &str| FixtureError::Invalid {
            id: project.id.clone(),
            reason: reason.to_string(),
        };

        if !seen.insert(project.id.as_str()) {
            return Err(invalid("duplicate id"));
        }
        if project.title.trim().is_empty() {
            return Err(invalid("title is empty"));
        }
        if !project.parameters.is_in_range() {
            return Err(invalid("parameters must be within -5..=5"));
        }
        if project.is_done() != project.end_date.is_some() {
            return Err(invalid("end_date must be set exactly when status is done"));
        }
    }
    Ok(())
}

pub fn sample_projects() -> Vec<Project> {
    vec![
        sample(
            "1",
            "Dashboard UI refresh",
            (2025, 1, 15),
            None,
            Parameters::new(2, 1, 1, 3, 1),
        ),
        sample(
            "2",
            "API performance tuning",
            (2025, 1, 10),
            None,
            Parameters::new(-1, 2, -2, 2, 0),
        ),
        sample(
            "3",
            "Team study sessions",
            (2024, 12, 20),
            None,
            Parameters::new(1, 2, 2, 1, 3),
        ),
        sample(
            "4",
            "Legacy code refactoring",
            (2024, 11, 1),
            Some((2024, 12, 28)),
            Parameters::new(-2, 1, -1, 2, 1),
        ),
    ]
}

fn sample(
    id: &str,
    title: &str,
    start: (i32, u32, u32),
    end: Option<(i32, u32, u32)>,
    parameters: Parameters,
) -> Project {
    let to_date = |(year, month, day): (i32, u32, u32)| {
        NaiveDate::from_ymd_opt(year, month, day).expect("sample date must be valid")
    };
    Project {
        id: id.to_string(),
        title: title.to_string(),
        start_date: to_date(start),
        end_date: end.map(to_date),
        status: if end.is_some() {
            ProjectStatus::Done
        } else {
            ProjectStatus::Active
        },
        memo: None,
        parameters,
    }
}
