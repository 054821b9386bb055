use serde::Serialize;

use crate::domain::{Axis, DashboardMode, Project, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightVariant {
    Top,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub axis: Axis,
    pub label: &'static str,
}

impl Highlight {
    fn new(axis: Axis) -> Self {
        Self {
            axis,
            label: axis.label(),
        }
    }
}

pub fn compute_totals<'a, I>(projects: I) -> Totals
where
    I: IntoIterator<Item = &'a Project>,
{
    let mut totals = Totals::zero();
    for project in projects {
        totals.add_parameters(&project.parameters);
    }
    totals
}

pub fn select_totals(mode: DashboardMode, current: Totals, done: Totals, all: Totals) -> Totals {
    match mode {
        DashboardMode::Current => current,
        DashboardMode::Done => done,
        _ => all,
    }
}

pub fn total_sum(totals: &Totals) -> i32 {
    Axis::ALL.iter().map(|axis| totals.get(*axis)).sum()
}

/// `Top` always yields an axis. `Low` yields one only when some axis is
/// net negative.
pub fn highlight(totals: &Totals, variant: HighlightVariant) -> Option<Highlight> {
    let mut selected = Axis::ALL[0];
    for axis in Axis::ALL.into_iter().skip(1) {
        let value = totals.get(axis);
        let current = totals.get(selected);
        let better = match variant {
            HighlightVariant::Top => value > current,
            HighlightVariant::Low => value < current,
        };
        if better {
            selected = axis;
        }
    }

    if variant == HighlightVariant::Low && totals.get(selected) >= 0 {
        return None;
    }

    Some(Highlight::new(selected))
}
