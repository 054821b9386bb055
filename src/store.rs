use chrono::{DateTime, Duration, Utc};

use crate::aggregator::{Highlight, HighlightVariant, compute_totals, highlight, select_totals, total_sum};
use crate::domain::{Completion, DashboardMode, NewProject, Project, ProjectEdit, ProjectStatus, Totals};

pub const TOAST_DISMISS_AFTER_MS: i64 = 5_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub is_open: bool,
    pub project: Option<Project>,
}

impl ModalState {
    pub fn closed() -> Self {
        Self::default()
    }

    fn open(project: Project) -> Self {
        Self {
            is_open: true,
            project: Some(project),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub project_id: String,
}

/// Handle for a scheduled toast dismissal. Only the most recently
/// scheduled handle can clear the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimer {
    token: u64,
    due_at: DateTime<Utc>,
}

impl ToastTimer {
    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }
}

#[derive(Debug, Clone)]
pub struct DashboardStore {
    projects: Vec<Project>,
    mode: DashboardMode,
    done_section_expanded: bool,
    toast: Option<Toast>,
    toast_timer: Option<ToastTimer>,
    timer_sequence: u64,
    create_modal_open: bool,
    edit_modal: ModalState,
    complete_modal: ModalState,
    last_issued_id: i64,
}

impl DashboardStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            mode: DashboardMode::default(),
            done_section_expanded: false,
            toast: None,
            toast_timer: None,
            timer_sequence: 0,
            create_modal_open: false,
            edit_modal: ModalState::closed(),
            complete_modal: ModalState::closed(),
            last_issued_id: 0,
        }
    }

    pub fn with_mode(mut self, mode: DashboardMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn mode(&self) -> DashboardMode {
        self.mode
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn pending_toast_timer(&self) -> Option<ToastTimer> {
        self.toast_timer
    }

    pub fn is_create_modal_open(&self) -> bool {
        self.create_modal_open
    }

    pub fn edit_modal(&self) -> &ModalState {
        &self.edit_modal
    }

    pub fn complete_modal(&self) -> &ModalState {
        &self.complete_modal
    }

    pub fn set_mode(&mut self, mode: DashboardMode) {
        tracing::debug!(event = "store.mode.changed", from = %self.mode, to = %mode);
        self.mode = mode;
    }

    pub fn toggle_done_section_expanded(&mut self) {
        self.done_section_expanded = !self.done_section_expanded;
    }

    pub fn open_create_modal(&mut self) {
        self.create_modal_open = true;
    }

    pub fn close_create_modal(&mut self) {
        self.create_modal_open = false;
    }

    pub fn create_project(&mut self, input: NewProject, now: DateTime<Utc>) -> String {
        let id = self.next_id(now);
        self.projects.push(Project {
            id: id.clone(),
            title: input.title,
            start_date: input.start_date,
            end_date: None,
            status: ProjectStatus::Active,
            memo: input.memo,
            parameters: input.parameters,
        });
        tracing::info!(event = "store.project.created", project_id = %id);
        id
    }

    pub fn open_complete_modal(&mut self, id: &str) {
        if let Some(project) = self.project(id).cloned() {
            self.complete_modal = ModalState::open(project);
        } else {
            tracing::debug!(event = "store.complete_modal.unknown_project", project_id = %id);
        }
    }

    pub fn close_complete_modal(&mut self) {
        self.complete_modal = ModalState::closed();
    }

    pub fn complete_project(&mut self, completion: Completion, now: DateTime<Utc>) -> Option<ToastTimer> {
        let target_id = self.complete_modal.project.as_ref()?.id.clone();
        let project = self.project_mut(&target_id)?;
        project.status = ProjectStatus::Done;
        project.end_date = Some(completion.end_date);
        project.parameters = completion.parameters;
        let title = project.title.clone();

        let timer = self.show_completion_toast(&target_id, &title, now);
        self.complete_modal = ModalState::closed();
        tracing::info!(
            event = "store.project.completed",
            project_id = %target_id,
            end_date = %completion.end_date
        );
        Some(timer)
    }

    /// Completes an active project without the modal, dated `now` and
    /// keeping its parameters.
    pub fn quick_complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<ToastTimer> {
        let project = self.project_mut(id)?;
        if project.is_done() {
            return None;
        }
        project.status = ProjectStatus::Done;
        project.end_date = Some(now.date_naive());
        let title = project.title.clone();

        let timer = self.show_completion_toast(id, &title, now);
        tracing::info!(event = "store.project.quick_completed", project_id = %id);
        Some(timer)
    }

    /// Parameters stay as they were set at completion.
    pub fn undo_complete(&mut self, id: &str) {
        if let Some(project) = self.project_mut(id) {
            project.status = ProjectStatus::Active;
            project.end_date = None;
            tracing::info!(event = "store.project.completion_undone", project_id = %id);
        }
        self.clear_toast();
    }

    pub fn dismiss_toast(&mut self) {
        self.clear_toast();
    }

    pub fn open_edit_modal(&mut self, id: &str) {
        if let Some(project) = self.project(id).cloned() {
            self.edit_modal = ModalState::open(project);
        } else {
            tracing::debug!(event = "store.edit_modal.unknown_project", project_id = %id);
        }
    }

    pub fn close_edit_modal(&mut self) {
        self.edit_modal = ModalState::closed();
    }

    /// Active projects never carry an end date; done projects never lose theirs.
    pub fn edit_project(&mut self, edit: ProjectEdit) {
        let Some(target_id) = self.edit_modal.project.as_ref().map(|project| project.id.clone()) else {
            return;
        };
        let Some(project) = self.project_mut(&target_id) else {
            return;
        };

        project.title = edit.title;
        project.start_date = edit.start_date;
        project.end_date = if project.is_done() {
            edit.end_date.or(project.end_date)
        } else {
            None
        };
        project.memo = edit.memo;
        project.parameters = edit.parameters;

        self.edit_modal = ModalState::closed();
        tracing::info!(event = "store.project.edited", project_id = %target_id);
    }

    /// Fires the pending dismissal once `now` reaches its deadline.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let Some(timer) = self.toast_timer else {
            return false;
        };
        if now < timer.due_at {
            return false;
        }
        self.expire_toast(timer)
    }

    pub fn expire_toast(&mut self, timer: ToastTimer) -> bool {
        if self.toast_timer != Some(timer) {
            tracing::trace!(event = "store.toast.stale_timer", token = timer.token);
            return false;
        }

        self.toast = None;
        self.toast_timer = None;
        tracing::debug!(event = "store.toast.expired", token = timer.token);
        true
    }

    pub fn view(&self) -> DashboardView<'_> {
        let active_projects = self
            .projects
            .iter()
            .filter(|project| project.status == ProjectStatus::Active)
            .collect::<Vec<_>>();
        let done_projects = self
            .projects
            .iter()
            .filter(|project| project.status == ProjectStatus::Done)
            .collect::<Vec<_>>();

        let current_total = compute_totals(active_projects.iter().copied());
        let done_total = compute_totals(done_projects.iter().copied());
        let all_total = compute_totals(&self.projects);
        let selected_total = select_totals(self.mode, current_total, done_total, all_total);

        DashboardView {
            mode: self.mode,
            done_section_expanded: self.done_section_expanded,
            active_projects,
            done_projects,
            current_total,
            done_total,
            all_total,
            selected_total,
            total_sum: total_sum(&selected_total),
            top_highlight: highlight(&selected_total, HighlightVariant::Top),
            low_highlight: highlight(&selected_total, HighlightVariant::Low),
        }
    }

    fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }

    fn show_completion_toast(&mut self, project_id: &str, title: &str, now: DateTime<Utc>) -> ToastTimer {
        self.timer_sequence += 1;
        let timer = ToastTimer {
            token: self.timer_sequence,
            due_at: now + Duration::milliseconds(TOAST_DISMISS_AFTER_MS),
        };
        self.toast = Some(Toast {
            message: format!("Completed \"{title}\""),
            project_id: project_id.to_string(),
        });
        self.toast_timer = Some(timer);
        timer
    }

    fn clear_toast(&mut self) {
        self.toast = None;
        self.toast_timer = None;
    }

    /// Millisecond timestamps, bumped past the last issued id and past any
    /// id already present.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis().max(self.last_issued_id + 1);
        while self.projects.iter().any(|project| project.id == candidate.to_string()) {
            candidate += 1;
        }
        self.last_issued_id = candidate;
        candidate.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub mode: DashboardMode,
    pub done_section_expanded: bool,
    pub active_projects: Vec<&'a Project>,
    pub done_projects: Vec<&'a Project>,
    pub current_total: Totals,
    pub done_total: Totals,
    pub all_total: Totals,
    pub selected_total: Totals,
    pub total_sum: i32,
    pub top_highlight: Option<Highlight>,
    pub low_highlight: Option<Highlight>,
}

impl DashboardView<'_> {
    pub fn is_empty_state(&self) -> bool {
        self.mode == DashboardMode::Current && self.active_projects.is_empty()
    }

    pub fn shows_active_section(&self) -> bool {
        self.mode.shows_active() && !self.active_projects.is_empty()
    }

    pub fn shows_done_section(&self) -> bool {
        self.mode.shows_done() && !self.done_projects.is_empty()
    }

    /// Current and done totals drawn together in virtual mode.
    pub fn radar_overlay(&self) -> Option<(Totals, Totals)> {
        if self.mode == DashboardMode::Virtual {
            Some((self.current_total, self.done_total))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    use crate::aggregator::compute_totals;
    use crate::domain::{
        Axis, Completion, DashboardMode, NewProject, Parameters, ProjectEdit, ProjectStatus,
    };
    use crate::fixtures::sample_projects;

    use super::{DashboardStore, TOAST_DISMISS_AFTER_MS};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn store() -> DashboardStore {
        DashboardStore::new(sample_projects())
    }

    fn new_project(title: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            start_date: date(2025, 1, 1),
            memo: None,
            parameters: Parameters::default(),
        }
    }

    fn complete_via_modal(store: &mut DashboardStore, id: &str) {
        store.open_complete_modal(id);
        store
            .complete_project(
                Completion {
                    end_date: date(2025, 3, 1),
                    parameters: Parameters::new(0, 0, 0, 0, 0),
                },
                now(),
            )
            .expect("completion should schedule a dismissal");
    }

    #[test]
    fn rapid_creates_get_distinct_active_ids() {
        let mut store = DashboardStore::new(Vec::new());
        let first = store.create_project(new_project("X"), now());
        let second = store.create_project(new_project("X"), now());

        assert_ne!(first, second);
        assert_eq!(store.projects().len(), 2);
        assert!(store.projects().iter().all(|project| project.status == ProjectStatus::Active));
        assert!(store.projects().iter().all(|project| project.end_date.is_none()));
    }

    #[test]
    fn created_ids_skip_existing_ids() {
        let mut store = store();
        let millis = now().timestamp_millis();
        let first = store.create_project(new_project("Seeded"), now());
        assert_eq!(first, millis.to_string());

        let mut reloaded = DashboardStore::new(store.projects().to_vec());
        let second = reloaded.create_project(new_project("Y"), now());
        assert_eq!(second, (millis + 1).to_string());
    }

    #[test]
    fn opening_complete_modal_for_unknown_project_is_noop() {
        let mut store = store();
        store.open_complete_modal("missing");
        assert!(!store.complete_modal().is_open);
        assert!(store.complete_modal().project.is_none());

        store.open_complete_modal("2");
        assert!(store.complete_modal().is_open);
        assert_eq!(store.complete_modal().project.as_ref().map(|project| project.id.as_str()), Some("2"));
    }

    #[test]
    fn completing_replaces_parameters_and_closes_modal() {
        let mut store = store();
        store.open_complete_modal("2");
        let timer = store
            .complete_project(
                Completion {
                    end_date: date(2025, 3, 1),
                    parameters: Parameters::new(1, 1, 1, 1, 1),
                },
                now(),
            )
            .expect("completion should schedule a dismissal");

        let project = store.project("2").expect("project 2");
        assert_eq!(project.status, ProjectStatus::Done);
        assert_eq!(project.end_date, Some(date(2025, 3, 1)));
        assert_eq!(project.parameters, Parameters::new(1, 1, 1, 1, 1));
        assert!(!store.complete_modal().is_open);
        assert!(store.complete_modal().project.is_none());
        assert_eq!(store.toast().map(|toast| toast.project_id.as_str()), Some("2"));
        assert!(store.toast().expect("toast").message.contains(&project.title));
        assert_eq!(timer.due_at(), now() + Duration::milliseconds(TOAST_DISMISS_AFTER_MS));
    }

    #[test]
    fn completing_without_modal_project_changes_nothing() {
        let mut store = store();
        let before = store.projects().to_vec();
        let result = store.complete_project(
            Completion {
                end_date: date(2025, 3, 1),
                parameters: Parameters::default(),
            },
            now(),
        );

        assert!(result.is_none());
        assert_eq!(store.projects(), before.as_slice());
        assert!(store.toast().is_none());
    }

    #[test]
    fn toast_expires_after_delay() {
        let mut store = store();
        complete_via_modal(&mut store, "1");

        assert!(!store.tick(now() + Duration::milliseconds(TOAST_DISMISS_AFTER_MS - 1)));
        assert!(store.toast().is_some());
        assert!(store.tick(now() + Duration::milliseconds(TOAST_DISMISS_AFTER_MS)));
        assert!(store.toast().is_none());
        assert!(store.pending_toast_timer().is_none());
    }

    #[test]
    fn undo_restores_active_and_clears_toast() {
        let mut store = store();
        let before = store.project("1").cloned().expect("project 1");
        complete_via_modal(&mut store, "1");
        store.undo_complete("1");

        let project = store.project("1").expect("project 1");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.end_date, None);
        assert_ne!(project.parameters, before.parameters);
        assert!(store.toast().is_none());
        assert!(!store.tick(now() + Duration::seconds(10)));
        assert!(store.view().active_projects.iter().any(|project| project.id == "1"));
        assert!(store.view().done_projects.iter().all(|project| project.id != "1"));
    }

    #[test]
    fn stale_timer_never_clears_newer_toast() {
        let mut store = store();
        store.open_complete_modal("1");
        let first = store
            .complete_project(
                Completion {
                    end_date: date(2025, 3, 1),
                    parameters: Parameters::default(),
                },
                now(),
            )
            .expect("first timer");

        let later = now() + Duration::seconds(3);
        let second = store.quick_complete("2", later).expect("second timer");

        assert!(!store.expire_toast(first));
        assert_eq!(store.toast().map(|toast| toast.project_id.as_str()), Some("2"));
        assert!(!store.tick(now() + Duration::milliseconds(TOAST_DISMISS_AFTER_MS)));
        assert!(store.toast().is_some());
        assert!(store.expire_toast(second));
        assert!(store.toast().is_none());
    }

    #[test]
    fn dismissed_toast_ignores_pending_timer() {
        let mut store = store();
        let timer = store.quick_complete("3", now()).expect("timer");
        store.dismiss_toast();
        store.dismiss_toast();

        assert!(store.toast().is_none());
        assert!(!store.expire_toast(timer));
        assert_eq!(store.project("3").map(|project| project.status), Some(ProjectStatus::Done));
    }

    #[test]
    fn quick_complete_uses_today_and_keeps_parameters() {
        let mut store = store();
        let before = store.project("1").cloned().expect("project 1");
        store.quick_complete("1", now()).expect("timer");

        let project = store.project("1").expect("project 1");
        assert_eq!(project.status, ProjectStatus::Done);
        assert_eq!(project.end_date, Some(date(2025, 3, 1)));
        assert_eq!(project.parameters, before.parameters);
        assert!(store.quick_complete("1", now()).is_none());
        assert!(store.quick_complete("missing", now()).is_none());
    }

    #[test]
    fn editing_title_leaves_everything_else_untouched() {
        let mut store = store();
        let before = store.projects().to_vec();
        let original = store.project("1").cloned().expect("project 1");

        store.open_edit_modal("1");
        assert_eq!(store.edit_modal().project.as_ref().map(|project| project.id.as_str()), Some("1"));
        store.edit_project(ProjectEdit {
            title: "Renamed".to_string(),
            start_date: original.start_date,
            end_date: original.end_date,
            memo: original.memo.clone(),
            parameters: original.parameters,
        });

        let edited = store.project("1").expect("project 1");
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.status, original.status);
        assert_eq!(edited.start_date, original.start_date);
        assert_eq!(edited.parameters, original.parameters);
        assert!(!store.edit_modal().is_open);
        for (after, before) in store.projects().iter().zip(before.iter()).filter(|(after, _)| after.id != "1") {
            assert_eq!(after, before);
        }
    }

    #[test]
    fn edit_without_modal_project_is_noop() {
        let mut store = store();
        let before = store.projects().to_vec();
        store.open_edit_modal("missing");
        store.edit_project(ProjectEdit {
            title: "Nope".to_string(),
            start_date: date(2025, 1, 1),
            end_date: None,
            memo: None,
            parameters: Parameters::default(),
        });
        assert!(!store.edit_modal().is_open);
        assert!(store.edit_modal().project.is_none());
        assert_eq!(store.projects(), before.as_slice());
    }

    #[test]
    fn editing_done_project_without_end_date_keeps_existing_one() {
        let mut store = store();
        let before = store.project("4").cloned().expect("project 4");
        store.open_edit_modal("4");
        store.edit_project(ProjectEdit {
            title: "Retitled".to_string(),
            start_date: before.start_date,
            end_date: None,
            memo: None,
            parameters: before.parameters,
        });

        let project = store.project("4").expect("project 4");
        assert_eq!(project.title, "Retitled");
        assert_eq!(project.status, ProjectStatus::Done);
        assert_eq!(project.end_date, before.end_date);
        assert!(project.end_date.is_some());

        store.open_edit_modal("4");
        store.edit_project(ProjectEdit {
            title: "Retitled".to_string(),
            start_date: before.start_date,
            end_date: Some(date(2025, 1, 5)),
            memo: None,
            parameters: before.parameters,
        });
        assert_eq!(store.project("4").and_then(|project| project.end_date), Some(date(2025, 1, 5)));
    }

    #[test]
    fn completing_again_after_undo_reenters_done() {
        let mut store = store();
        let first = store.quick_complete("1", now()).expect("first timer");
        store.undo_complete("1");
        assert_eq!(store.project("1").map(|project| project.status), Some(ProjectStatus::Active));

        let later = now() + Duration::seconds(2);
        store.open_complete_modal("1");
        let second = store
            .complete_project(
                Completion {
                    end_date: date(2025, 3, 3),
                    parameters: Parameters::new(1, 1, 1, 1, 1),
                },
                later,
            )
            .expect("second timer");

        let project = store.project("1").expect("project 1");
        assert_eq!(project.status, ProjectStatus::Done);
        assert_eq!(project.end_date, Some(date(2025, 3, 3)));
        assert_eq!(project.parameters, Parameters::new(1, 1, 1, 1, 1));

        assert!(!store.expire_toast(first));
        assert!(!store.tick(now() + Duration::milliseconds(TOAST_DISMISS_AFTER_MS)));
        assert_eq!(store.toast().map(|toast| toast.project_id.as_str()), Some("1"));
        assert!(store.tick(later + Duration::milliseconds(TOAST_DISMISS_AFTER_MS)));
        assert!(store.toast().is_none());
        assert_ne!(first, second);
    }

    #[test]
    fn undo_unknown_id_clears_toast_only() {
        let mut store = store();
        let timer = store.quick_complete("2", now()).expect("timer");
        let before = store.projects().to_vec();

        store.undo_complete("missing");

        assert_eq!(store.projects(), before.as_slice());
        assert!(store.toast().is_none());
        assert!(!store.expire_toast(timer));
    }

    #[test]
    fn editing_active_project_keeps_end_date_unset() {
        let mut store = store();
        store.open_edit_modal("2");
        store.edit_project(ProjectEdit {
            title: "Still active".to_string(),
            start_date: date(2025, 1, 10),
            end_date: Some(date(2025, 6, 1)),
            memo: Some("planned".to_string()),
            parameters: Parameters::default(),
        });

        let project = store.project("2").expect("project 2");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.end_date, None);
        assert_eq!(project.memo.as_deref(), Some("planned"));
    }

    #[test]
    fn view_partitions_and_selects_totals_by_mode() {
        let mut store = store();
        let view = store.view();
        assert_eq!(view.active_projects.len(), 3);
        assert_eq!(view.done_projects.len(), 1);
        assert_eq!(view.selected_total, view.current_total);
        assert_eq!(view.all_total, view.current_total + view.done_total);
        assert_eq!(view.current_total, compute_totals(view.active_projects.iter().copied()));
        assert!(view.radar_overlay().is_none());
        assert!(view.shows_active_section());
        assert!(!view.shows_done_section());

        store.set_mode(DashboardMode::Done);
        let view = store.view();
        assert_eq!(view.selected_total, view.done_total);
        assert!(!view.shows_active_section());
        assert!(view.shows_done_section());

        store.set_mode(DashboardMode::Virtual);
        let view = store.view();
        assert_eq!(view.selected_total, view.all_total);
        assert_eq!(view.radar_overlay(), Some((view.current_total, view.done_total)));
        assert_eq!(
            view.total_sum,
            Axis::ALL.iter().map(|axis| view.all_total.get(*axis)).sum::<i32>()
        );
    }

    #[test]
    fn empty_state_only_in_current_mode() {
        let mut store = DashboardStore::new(Vec::new());
        assert!(store.view().is_empty_state());
        assert!(store.view().top_highlight.is_some());
        assert!(store.view().low_highlight.is_none());
        store.set_mode(DashboardMode::Virtual);
        assert!(!store.view().is_empty_state());
    }

    #[test]
    fn modal_and_section_toggles() {
        let mut store = store();
        store.open_create_modal();
        assert!(store.is_create_modal_open());
        store.create_project(new_project("Z"), now());
        assert!(store.is_create_modal_open());
        store.close_create_modal();
        assert!(!store.is_create_modal_open());

        store.toggle_done_section_expanded();
        assert!(store.view().done_section_expanded);
        store.toggle_done_section_expanded();
        assert!(!store.view().done_section_expanded);

        store.open_complete_modal("1");
        store.close_complete_modal();
        assert!(!store.complete_modal().is_open);
    }
}
