use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PARAMETER_MIN: i32 = -5;
pub const PARAMETER_MAX: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Energy,
    Trust,
    Qol,
    Skill,
    Social,
}

impl Axis {
    /// Canonical order. Highlight ties resolve to the earliest axis here.
    pub const ALL: [Axis; 5] = [
        Axis::Energy,
        Axis::Trust,
        Axis::Qol,
        Axis::Skill,
        Axis::Social,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Axis::Energy => "Energy",
            Axis::Trust => "Trust",
            Axis::Qol => "QoL",
            Axis::Skill => "Skill",
            Axis::Social => "Social",
        }
    }

    pub fn chart_label(self) -> &'static str {
        match self {
            Axis::Energy => "Energy",
            Axis::Trust => "Trust",
            Axis::Qol => "Quality of life",
            Axis::Skill => "Skill",
            Axis::Social => "Social capital",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Axis::Energy => "E",
            Axis::Trust => "C",
            Axis::Qol => "Q",
            Axis::Skill => "S",
            Axis::Social => "So",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub energy: i32,
    pub trust: i32,
    pub qol: i32,
    pub skill: i32,
    pub social: i32,
}

impl Parameters {
    pub fn new(energy: i32, trust: i32, qol: i32, skill: i32, social: i32) -> Self {
        Self {
            energy,
            trust,
            qol,
            skill,
            social,
        }
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Energy => self.energy,
            Axis::Trust => self.trust,
            Axis::Qol => self.qol,
            Axis::Skill => self.skill,
            Axis::Social => self.social,
        }
    }

    pub fn set(&mut self, axis: Axis, value: i32) {
        let slot = match axis {
            Axis::Energy => &mut self.energy,
            Axis::Trust => &mut self.trust,
            Axis::Qol => &mut self.qol,
            Axis::Skill => &mut self.skill,
            Axis::Social => &mut self.social,
        };
        *slot = value;
    }

    pub fn clamped(self) -> Self {
        let mut clamped = self;
        for axis in Axis::ALL {
            clamped.set(axis, self.get(axis).clamp(PARAMETER_MIN, PARAMETER_MAX));
        }
        clamped
    }

    pub fn is_in_range(&self) -> bool {
        Axis::ALL
            .iter()
            .all(|axis| (PARAMETER_MIN..=PARAMETER_MAX).contains(&self.get(*axis)))
    }
}

/// Per-axis sums over a subset of projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub energy: i32,
    pub trust: i32,
    pub qol: i32,
    pub skill: i32,
    pub social: i32,
}

impl Totals {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Energy => self.energy,
            Axis::Trust => self.trust,
            Axis::Qol => self.qol,
            Axis::Skill => self.skill,
            Axis::Social => self.social,
        }
    }

    pub fn add_parameters(&mut self, parameters: &Parameters) {
        self.energy += parameters.energy;
        self.trust += parameters.trust;
        self.qol += parameters.qol;
        self.skill += parameters.skill;
        self.social += parameters.social;
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(mut self, rhs: Totals) -> Totals {
        self += rhs;
        self
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Totals) {
        self.energy += rhs.energy;
        self.trust += rhs.trust;
        self.qol += rhs.qol;
        self.skill += rhs.skill;
        self.social += rhs.social;
    }
}

impl std::iter::Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::zero(), |acc, totals| acc + totals)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub parameters: Parameters,
}

impl Project {
    pub fn is_done(&self) -> bool {
        self.status == ProjectStatus::Done
    }

    pub fn parameter_line(&self) -> String {
        Axis::ALL
            .iter()
            .map(|axis| {
                format!(
                    "{}:{}",
                    axis.code(),
                    format_signed(self.parameters.get(*axis))
                )
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardMode {
    #[default]
    Current,
    Done,
    Virtual,
}

impl DashboardMode {
    /// Unknown names resolve to `Virtual`, which aggregates everything.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "current" => DashboardMode::Current,
            "done" => DashboardMode::Done,
            _ => DashboardMode::Virtual,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DashboardMode::Current => "current",
            DashboardMode::Done => "done",
            DashboardMode::Virtual => "virtual",
        }
    }

    pub fn shows_active(self) -> bool {
        matches!(self, DashboardMode::Current | DashboardMode::Virtual)
    }

    pub fn shows_done(self) -> bool {
        matches!(self, DashboardMode::Done | DashboardMode::Virtual)
    }
}

impl Display for DashboardMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub start_date: NaiveDate,
    pub memo: Option<String>,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEdit {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub memo: Option<String>,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub end_date: NaiveDate,
    pub parameters: Parameters,
}

pub fn format_signed(value: i32) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
