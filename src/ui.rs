use std::error::Error;
use std::f64::consts::TAU;
use std::io;
use std::time::Duration as StdDuration;

use chrono::{NaiveDate, Utc};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};

use crate::domain::{
	format_signed, Axis, Completion, DashboardMode, NewProject, Parameters, Project, ProjectEdit, Totals,
	PARAMETER_MAX, PARAMETER_MIN,
};
use crate::store::{DashboardStore, DashboardView, Toast};

const FOCUSED_FIELD_COLOR: Color = Color::Yellow;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);
const CURRENT_POLYGON_COLOR: Color = Color::Rgb(37, 99, 235);
const DONE_POLYGON_COLOR: Color = Color::Rgb(107, 114, 128);
const GRID_COLOR: Color = Color::DarkGray;
const RADAR_RADIUS: f64 = 1.0;
const RADAR_BOUND: f64 = 1.45;
const MODE_BUTTONS: [DashboardMode; 3] = [DashboardMode::Done, DashboardMode::Current, DashboardMode::Virtual];

pub fn run_dashboard(store: &mut DashboardStore) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, store);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	store: &mut DashboardStore,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::default();

	loop {
		store.tick(Utc::now());

		let selected_id = {
			let snapshot: &DashboardStore = store;
			let view = snapshot.view();
			app.clamp_selection(&view);
			terminal.draw(|frame| draw_dashboard(frame, &app, snapshot, &view))?;
			app.selected_project_id(&view)
		};

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				let should_quit = if app.form.is_some() {
					handle_form_key(&mut app, key.code, store);
					false
				} else {
					handle_normal_key(&mut app, key.code, store, selected_id.as_deref())
				};

				if should_quit {
					break;
				}
			}
		}
	}

	Ok(())
}

fn draw_dashboard(frame: &mut Frame, app: &App, store: &DashboardStore, view: &DashboardView) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(3), Constraint::Min(12), Constraint::Length(4)])
		.split(frame.area());

	let body = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
		.split(layout[1]);

	render_header(frame, layout[0], view.mode);
	render_radar_panel(frame, body[0], view);
	render_projects_panel(frame, body[1], app, view);
	render_footer(frame, layout[2], app);

	if let Some(toast) = store.toast() {
		let seconds_left = store
			.pending_toast_timer()
			.map(|timer| (timer.due_at() - Utc::now()).num_seconds().max(0) + 1);
		render_toast(frame, layout[1], toast, seconds_left);
	}

	if let Some(form) = &app.form {
		render_form_popup(frame, form);
	}
}

fn render_header(frame: &mut Frame, area: Rect, mode: DashboardMode) {
	let mut spans = vec![Span::styled(
		"My Dashboard   ",
		Style::default().add_modifier(Modifier::BOLD),
	)];
	for button in MODE_BUTTONS {
		let style = if button == mode {
			Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
		} else {
			Style::default().fg(Color::Gray)
		};
		spans.push(Span::styled(format!(" {} ", mode_label(button)), style));
		spans.push(Span::raw(" "));
	}

	let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
	frame.render_widget(header, area);
}

fn render_radar_panel(frame: &mut Frame, area: Rect, view: &DashboardView) {
	let sections = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(10), Constraint::Length(3)])
		.split(area);

	let selected = view.selected_total;
	let overlay = view.radar_overlay();
	let title = match overlay {
		Some(_) => "Impact (current vs done)".to_string(),
		None => format!("Impact ({})", mode_label(view.mode)),
	};

	let canvas = Canvas::default()
		.block(Block::default().borders(Borders::ALL).title(title))
		.marker(Marker::Braille)
		.x_bounds([-RADAR_BOUND, RADAR_BOUND])
		.y_bounds([-RADAR_BOUND, RADAR_BOUND])
		.paint(move |ctx| {
			draw_radar_grid(ctx);
			match overlay {
				Some((current, done)) => {
					draw_radar_polygon(ctx, &done, DONE_POLYGON_COLOR);
					draw_radar_polygon(ctx, &current, CURRENT_POLYGON_COLOR);
				}
				None => draw_radar_polygon(ctx, &selected, CURRENT_POLYGON_COLOR),
			}
			for (index, axis) in Axis::ALL.into_iter().enumerate() {
				let (x, y) = radar_point(PARAMETER_MAX, index, RADAR_RADIUS + 0.2);
				ctx.print(x - 0.2, y, Span::styled(axis.chart_label(), Style::default().fg(axis_color(axis))));
			}
		});
	frame.render_widget(canvas, sections[0]);

	let mut badges = vec![Span::styled(
		format!(" Total {} ", format_signed(view.total_sum)),
		Style::default().fg(Color::Black).bg(Color::Gray),
	)];
	if let Some(top) = view.top_highlight {
		badges.push(Span::raw(" "));
		badges.push(Span::styled(
			format!(" {} strong ", top.label),
			Style::default().fg(Color::White).bg(axis_color(top.axis)),
		));
	}
	if let Some(low) = view.low_highlight {
		badges.push(Span::raw(" "));
		badges.push(Span::styled(
			format!(" {} dipping ", low.label),
			Style::default().fg(Color::White).bg(axis_color(low.axis)),
		));
	}
	if overlay.is_some() {
		badges.push(Span::raw("  "));
		badges.push(Span::styled("■ current", Style::default().fg(CURRENT_POLYGON_COLOR)));
		badges.push(Span::raw(" "));
		badges.push(Span::styled("■ done", Style::default().fg(DONE_POLYGON_COLOR)));
	}

	let badge_row = Paragraph::new(Line::from(badges)).block(Block::default().borders(Borders::ALL));
	frame.render_widget(badge_row, sections[1]);
}

fn draw_radar_grid(ctx: &mut Context) {
	for level in 1..=5 {
		let value = PARAMETER_MIN + level * 2;
		let ring = Axis::ALL
			.iter()
			.enumerate()
			.map(|(index, _)| radar_point(value, index, RADAR_RADIUS))
			.collect::<Vec<_>>();
		draw_closed_path(ctx, &ring, GRID_COLOR);
	}

	for index in 0..Axis::ALL.len() {
		let (x, y) = radar_point(PARAMETER_MAX, index, RADAR_RADIUS);
		ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, GRID_COLOR));
	}
}

fn draw_radar_polygon(ctx: &mut Context, totals: &Totals, color: Color) {
	let points = Axis::ALL
		.iter()
		.enumerate()
		.map(|(index, axis)| radar_point(totals.get(*axis), index, RADAR_RADIUS))
		.collect::<Vec<_>>();
	draw_closed_path(ctx, &points, color);
}

fn draw_closed_path(ctx: &mut Context, points: &[(f64, f64)], color: Color) {
	for (index, (x1, y1)) in points.iter().enumerate() {
		let (x2, y2) = points[(index + 1) % points.len()];
		ctx.draw(&CanvasLine::new(*x1, *y1, x2, y2, color));
	}
}

/// Axes start at twelve o'clock and run clockwise. `-5` sits at the
/// centre, `+5` on the rim; values outside that range are clamped.
fn radar_point(value: i32, index: usize, radius: f64) -> (f64, f64) {
	let normalized = f64::from(value.clamp(PARAMETER_MIN, PARAMETER_MAX));
	let distance = (normalized - f64::from(PARAMETER_MIN)) / f64::from(PARAMETER_MAX - PARAMETER_MIN) * radius;
	let angle = TAU / Axis::ALL.len() as f64 * index as f64;
	(distance * angle.sin(), distance * angle.cos())
}

fn render_projects_panel(frame: &mut Frame, area: Rect, app: &App, view: &DashboardView) {
	if view.is_empty_state() {
		let lines = vec![
			Line::from(Span::styled("No data yet", Style::default().add_modifier(Modifier::BOLD))),
			Line::from(""),
			Line::from("Create your first project to see where your current work is heading."),
			Line::from(""),
			Line::from("Press a to create a project"),
		];
		let empty = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Projects"));
		frame.render_widget(empty, area);
		return;
	}

	let shows_active = view.shows_active_section();
	let shows_done = view.shows_done_section();
	match (shows_active, shows_done) {
		(true, true) => {
			let done_height = if view.done_section_expanded {
				Constraint::Percentage(45)
			} else {
				Constraint::Length(3)
			};
			let split = Layout::default()
				.direction(Direction::Vertical)
				.constraints([Constraint::Min(6), done_height])
				.split(area);
			render_active_list(frame, split[0], app, view);
			render_done_section(frame, split[1], view);
		}
		(true, false) => render_active_list(frame, area, app, view),
		(false, true) => render_done_section(frame, area, view),
		(false, false) => {
			let empty = Paragraph::new("(no projects in this view)")
				.block(Block::default().borders(Borders::ALL).title("Projects"));
			frame.render_widget(empty, area);
		}
	}
}

fn render_active_list(frame: &mut Frame, area: Rect, app: &App, view: &DashboardView) {
	let items = view
		.active_projects
		.iter()
		.map(|project| ListItem::new(project_lines(project)))
		.collect::<Vec<_>>();

	let mut state = ListState::default();
	if !view.active_projects.is_empty() {
		state.select(Some(app.selected.min(view.active_projects.len() - 1)));
	}

	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(format!("In progress ({})", view.active_projects.len())),
		)
		.highlight_symbol("> ")
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_done_section(frame: &mut Frame, area: Rect, view: &DashboardView) {
	let marker = if view.done_section_expanded { "v" } else { ">" };
	let block = Block::default()
		.borders(Borders::ALL)
		.title(format!("{marker} Done ({})", view.done_projects.len()))
		.border_style(Style::default().fg(Color::DarkGray));

	if !view.done_section_expanded {
		frame.render_widget(Paragraph::new("press t to expand").block(block), area);
		return;
	}

	let items = view
		.done_projects
		.iter()
		.map(|project| ListItem::new(project_lines(project)).style(Style::default().fg(Color::Gray)))
		.collect::<Vec<_>>();
	frame.render_widget(List::new(items).block(block), area);
}

fn project_lines(project: &Project) -> Vec<Line<'static>> {
	let dates = match project.end_date {
		Some(end_date) => format!("{} - {}", format_date(project.start_date), format_date(end_date)),
		None => format!("since {}", format_date(project.start_date)),
	};
	let mut title = vec![Span::styled(
		project.title.clone(),
		Style::default().add_modifier(Modifier::BOLD),
	)];
	if project.is_done() {
		title.insert(0, Span::styled("✓ ", Style::default().fg(Color::Green)));
	}

	let mut parameters = Vec::new();
	for (index, axis) in Axis::ALL.into_iter().enumerate() {
		if index > 0 {
			parameters.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
		}
		parameters.push(Span::styled(
			format!("{}:{}", axis.code(), format_signed(project.parameters.get(axis))),
			Style::default().fg(axis_color(axis)),
		));
	}

	let mut lines = vec![
		Line::from(title),
		Line::from(Span::styled(dates, Style::default().fg(Color::DarkGray))),
		Line::from(parameters),
	];
	if let Some(memo) = &project.memo {
		lines.push(Line::from(Span::styled(memo.clone(), Style::default().fg(Color::Gray))));
	}
	lines
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let footer_lines = vec![
		Line::from("c/d/v mode | j/k select | a add | e edit | Enter complete | space quick complete | t done list | q quit"),
		Line::from("u undo last completion | x dismiss notification"),
		Line::from(app.status.clone()),
	];
	let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_toast(frame: &mut Frame, area: Rect, toast: &Toast, seconds_left: Option<i64>) {
	let width = area.width.min(60);
	let height = area.height.min(3);
	let toast_area = Rect::new(
		area.x + area.width - width,
		area.y + area.height - height,
		width,
		height,
	);
	frame.render_widget(Clear, toast_area);

	let mut spans = vec![
		Span::styled("✓ ", Style::default().fg(Color::Green)),
		Span::raw(toast.message.clone()),
		Span::styled("  u undo  x close", Style::default().fg(Color::DarkGray)),
	];
	if let Some(seconds) = seconds_left {
		spans.push(Span::styled(format!(" ({seconds}s)"), Style::default().fg(Color::DarkGray)));
	}
	let line = Line::from(spans);
	let panel = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
	frame.render_widget(panel, toast_area);
}

fn render_form_popup(frame: &mut Frame, form: &ProjectForm) {
	let area = centered_rect(60, 70, frame.area());
	frame.render_widget(Clear, area);

	let focused = form.focused_field();
	let mut lines = Vec::new();
	for field in form.fields() {
		let label_style = if field == focused {
			Style::default().fg(FOCUSED_FIELD_COLOR).add_modifier(Modifier::BOLD)
		} else {
			Style::default()
		};
		let value = match field {
			FormField::Axis(axis) => {
				let value = form.parameters.get(axis);
				Line::from(vec![
					Span::styled(format!("{:<16}", axis.chart_label()), label_style),
					Span::styled(format!("{:>3} ", format_signed(value)), Style::default().fg(axis_color(axis))),
					Span::raw(slider(value)),
				])
			}
			_ => Line::from(vec![
				Span::styled(format!("{:<16}", field_label(field)), label_style),
				Span::raw(form.text(field).to_string()),
				Span::styled(if field == focused { "_" } else { "" }, label_style),
			]),
		};
		lines.push(value);
	}

	lines.push(Line::from(""));
	if let Some(error) = &form.error {
		lines.push(Line::from(Span::styled(format!("error: {error}"), Style::default().fg(Color::Red))));
	}
	lines.push(Line::from("Tab/Shift-Tab field | Left/Right adjust | Enter submit | Esc cancel"));

	let popup = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(form.heading.clone()));
	frame.render_widget(popup, area);
}

fn slider(value: i32) -> String {
	(PARAMETER_MIN..=PARAMETER_MAX)
		.map(|step| if step == value { 'o' } else if step == 0 { '|' } else { '-' })
		.collect()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

fn handle_normal_key(
	app: &mut App,
	code: KeyCode,
	store: &mut DashboardStore,
	selected_id: Option<&str>,
) -> bool {
	match code {
		KeyCode::Char('q') | KeyCode::Esc => true,
		KeyCode::Char('c') => {
			store.set_mode(DashboardMode::Current);
			false
		}
		KeyCode::Char('d') => {
			store.set_mode(DashboardMode::Done);
			false
		}
		KeyCode::Char('v') => {
			store.set_mode(DashboardMode::Virtual);
			false
		}
		KeyCode::Up | KeyCode::Char('k') => {
			app.selected = app.selected.saturating_sub(1);
			false
		}
		KeyCode::Down | KeyCode::Char('j') => {
			app.selected = app.selected.saturating_add(1);
			false
		}
		KeyCode::Char('t') => {
			store.toggle_done_section_expanded();
			false
		}
		KeyCode::Char('a') => {
			store.open_create_modal();
			if store.is_create_modal_open() {
				app.form = Some(ProjectForm::create(today()));
			}
			false
		}
		KeyCode::Char('e') => {
			match selected_id {
				Some(id) => {
					store.open_edit_modal(id);
					if let Some(project) = &store.edit_modal().project {
						app.form = Some(ProjectForm::edit(project));
					}
				}
				None => app.status = "No active project selected".to_string(),
			}
			false
		}
		KeyCode::Enter => {
			match selected_id {
				Some(id) => {
					store.open_complete_modal(id);
					if let Some(project) = &store.complete_modal().project {
						app.form = Some(ProjectForm::complete(project, today()));
					}
				}
				None => app.status = "No active project selected".to_string(),
			}
			false
		}
		KeyCode::Char(' ') => {
			if let Some(id) = selected_id {
				app.status = match store.quick_complete(id, Utc::now()) {
					Some(_) => "Project completed".to_string(),
					None => "Nothing to complete".to_string(),
				};
			}
			false
		}
		KeyCode::Char('u') => {
			if let Some(project_id) = store.toast().map(|toast| toast.project_id.clone()) {
				store.undo_complete(&project_id);
				app.status = "Completion undone".to_string();
			}
			false
		}
		KeyCode::Char('x') => {
			store.dismiss_toast();
			false
		}
		_ => false,
	}
}

fn handle_form_key(app: &mut App, code: KeyCode, store: &mut DashboardStore) {
	let Some(form) = app.form.as_mut() else {
		return;
	};

	match code {
		KeyCode::Esc => {
			close_modal(store, form.kind);
			app.form = None;
			app.status = "Input cancelled".to_string();
		}
		KeyCode::Tab | KeyCode::Down => form.focus_next(),
		KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
		KeyCode::Left => form.adjust(-1),
		KeyCode::Right => form.adjust(1),
		KeyCode::Backspace => form.pop_char(),
		KeyCode::Char(value) => form.push_char(value),
		KeyCode::Enter => match form.submit() {
			Ok(submission) => {
				app.form = None;
				app.status = apply_submission(store, submission);
			}
			Err(err) => form.error = Some(err),
		},
		_ => {}
	}
}

fn close_modal(store: &mut DashboardStore, kind: FormKind) {
	match kind {
		FormKind::Create => store.close_create_modal(),
		FormKind::Edit => store.close_edit_modal(),
		FormKind::Complete => store.close_complete_modal(),
	}
}

fn apply_submission(store: &mut DashboardStore, submission: FormSubmission) -> String {
	match submission {
		FormSubmission::Create(input) => {
			let title = input.title.clone();
			store.create_project(input, Utc::now());
			store.close_create_modal();
			format!("created project: {title}")
		}
		FormSubmission::Edit(edit) => {
			let title = edit.title.clone();
			store.edit_project(edit);
			format!("updated project: {title}")
		}
		FormSubmission::Complete(completion) => match store.complete_project(completion, Utc::now()) {
			Some(_) => "Project completed".to_string(),
			None => "Nothing to complete".to_string(),
		},
	}
}

fn required_text(input: &str, field_name: &str) -> Result<String, String> {
	let value = input.trim();
	if value.is_empty() {
		Err(format!("{field_name} is required"))
	} else {
		Ok(value.to_string())
	}
}

fn optional_text(input: &str) -> Option<String> {
	let value = input.trim();
	if value.is_empty() {
		None
	} else {
		Some(value.to_string())
	}
}

fn parse_date(input: &str, field_name: &str) -> Result<NaiveDate, String> {
	let value = required_text(input, field_name)?;
	NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| format!("{field_name} must be YYYY-MM-DD"))
}

fn format_date(date: NaiveDate) -> String {
	date.format("%d %b %Y").to_string()
}

fn today() -> NaiveDate {
	Utc::now().date_naive()
}

fn mode_label(mode: DashboardMode) -> &'static str {
	match mode {
		DashboardMode::Current => "Current",
		DashboardMode::Done => "Done",
		DashboardMode::Virtual => "Virtual",
	}
}

fn field_label(field: FormField) -> &'static str {
	match field {
		FormField::Title => "Title",
		FormField::StartDate => "Start date",
		FormField::EndDate => "End date",
		FormField::Memo => "Memo",
		FormField::Axis(axis) => axis.chart_label(),
	}
}

fn axis_color(axis: Axis) -> Color {
	match axis {
		Axis::Energy => Color::Rgb(234, 88, 12),
		Axis::Trust => Color::Rgb(37, 99, 235),
		Axis::Qol => Color::Rgb(22, 163, 74),
		Axis::Skill => Color::Rgb(147, 51, 234),
		Axis::Social => Color::Rgb(202, 138, 4),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKind {
	Create,
	Edit,
	Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
	Title,
	StartDate,
	EndDate,
	Memo,
	Axis(Axis),
}

#[derive(Debug, Clone)]
enum FormSubmission {
	Create(NewProject),
	Edit(ProjectEdit),
	Complete(Completion),
}

#[derive(Debug, Clone)]
struct ProjectForm {
	kind: FormKind,
	heading: String,
	title: String,
	start_date: String,
	end_date: String,
	memo: String,
	parameters: Parameters,
	focus: usize,
	error: Option<String>,
}

impl ProjectForm {
	fn create(today: NaiveDate) -> Self {
		Self {
			kind: FormKind::Create,
			heading: "New project".to_string(),
			title: String::new(),
			start_date: today.format("%Y-%m-%d").to_string(),
			end_date: String::new(),
			memo: String::new(),
			parameters: Parameters::default(),
			focus: 0,
			error: None,
		}
	}

	fn edit(project: &Project) -> Self {
		Self {
			kind: FormKind::Edit,
			heading: format!("Edit: {}", project.title),
			title: project.title.clone(),
			start_date: project.start_date.format("%Y-%m-%d").to_string(),
			end_date: project
				.end_date
				.map(|date| date.format("%Y-%m-%d").to_string())
				.unwrap_or_default(),
			memo: project.memo.clone().unwrap_or_default(),
			parameters: project.parameters,
			focus: 0,
			error: None,
		}
	}

	fn complete(project: &Project, today: NaiveDate) -> Self {
		Self {
			kind: FormKind::Complete,
			heading: format!("Complete: {}", project.title),
			title: project.title.clone(),
			start_date: project.start_date.format("%Y-%m-%d").to_string(),
			end_date: today.format("%Y-%m-%d").to_string(),
			memo: project.memo.clone().unwrap_or_default(),
			parameters: project.parameters,
			focus: 0,
			error: None,
		}
	}

	fn fields(&self) -> Vec<FormField> {
		let mut fields = match self.kind {
			FormKind::Create | FormKind::Edit => vec![FormField::Title, FormField::StartDate, FormField::Memo],
			FormKind::Complete => vec![FormField::EndDate],
		};
		fields.extend(Axis::ALL.into_iter().map(FormField::Axis));
		fields
	}

	fn focused_field(&self) -> FormField {
		let fields = self.fields();
		fields[self.focus.min(fields.len() - 1)]
	}

	fn focus_next(&mut self) {
		self.focus = (self.focus + 1) % self.fields().len();
	}

	fn focus_prev(&mut self) {
		let count = self.fields().len();
		self.focus = (self.focus + count - 1) % count;
	}

	fn text(&self, field: FormField) -> &str {
		match field {
			FormField::Title => &self.title,
			FormField::StartDate => &self.start_date,
			FormField::EndDate => &self.end_date,
			FormField::Memo => &self.memo,
			FormField::Axis(_) => "",
		}
	}

	fn text_mut(&mut self) -> Option<&mut String> {
		match self.focused_field() {
			FormField::Title => Some(&mut self.title),
			FormField::StartDate => Some(&mut self.start_date),
			FormField::EndDate => Some(&mut self.end_date),
			FormField::Memo => Some(&mut self.memo),
			FormField::Axis(_) => None,
		}
	}

	fn push_char(&mut self, value: char) {
		match self.text_mut() {
			Some(text) => text.push(value),
			None => match value {
				'+' => self.adjust(1),
				'-' => self.adjust(-1),
				_ => {}
			},
		}
	}

	fn pop_char(&mut self) {
		if let Some(text) = self.text_mut() {
			text.pop();
		}
	}

	fn adjust(&mut self, delta: i32) {
		if let FormField::Axis(axis) = self.focused_field() {
			let value = (self.parameters.get(axis) + delta).clamp(PARAMETER_MIN, PARAMETER_MAX);
			self.parameters.set(axis, value);
		}
	}

	fn submit(&self) -> Result<FormSubmission, String> {
		let parameters = self.parameters.clamped();
		match self.kind {
			FormKind::Create => Ok(FormSubmission::Create(NewProject {
				title: required_text(&self.title, "title")?,
				start_date: parse_date(&self.start_date, "start date")?,
				memo: optional_text(&self.memo),
				parameters,
			})),
			FormKind::Edit => {
				let end_date = match optional_text(&self.end_date) {
					Some(raw) => Some(parse_date(&raw, "end date")?),
					None => None,
				};
				Ok(FormSubmission::Edit(ProjectEdit {
					title: required_text(&self.title, "title")?,
					start_date: parse_date(&self.start_date, "start date")?,
					end_date,
					memo: optional_text(&self.memo),
					parameters,
				}))
			}
			FormKind::Complete => Ok(FormSubmission::Complete(Completion {
				end_date: parse_date(&self.end_date, "end date")?,
				parameters,
			})),
		}
	}
}

#[derive(Debug, Clone)]
struct App {
	selected: usize,
	form: Option<ProjectForm>,
	status: String,
}

impl Default for App {
	fn default() -> Self {
		Self {
			selected: 0,
			form: None,
			status: "Ready".to_string(),
		}
	}
}

impl App {
	fn clamp_selection(&mut self, view: &DashboardView) {
		if view.active_projects.is_empty() {
			self.selected = 0;
		} else {
			self.selected = self.selected.min(view.active_projects.len() - 1);
		}
	}

	fn selected_project_id(&self, view: &DashboardView) -> Option<String> {
		if !view.shows_active_section() {
			return None;
		}
		view.active_projects.get(self.selected).map(|project| project.id.clone())
	}
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;

	use crate::domain::{Axis, Parameters, PARAMETER_MAX, PARAMETER_MIN};
	use crate::fixtures::sample_projects;
	use crate::store::DashboardStore;

	use super::{apply_submission, radar_point, FormField, FormSubmission, ProjectForm};

	fn today() -> NaiveDate {
		NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
	}

	fn approx(left: f64, right: f64) -> bool {
		(left - right).abs() < 1e-9
	}

	#[test]
	fn radar_minimum_is_centre_and_maximum_is_rim() {
		let (x, y) = radar_point(PARAMETER_MIN, 0, 1.0);
		assert!(approx(x, 0.0) && approx(y, 0.0));

		let (x, y) = radar_point(PARAMETER_MAX, 0, 1.0);
		assert!(approx(x, 0.0) && approx(y, 1.0));

		let (x, y) = radar_point(0, 0, 1.0);
		assert!(approx(x, 0.0) && approx(y, 0.5));
	}

	#[test]
	fn radar_clamps_out_of_range_totals() {
		assert_eq!(radar_point(12, 2, 1.0), radar_point(PARAMETER_MAX, 2, 1.0));
		assert_eq!(radar_point(-9, 3, 1.0), radar_point(PARAMETER_MIN, 3, 1.0));
		let (x, _) = radar_point(PARAMETER_MAX, 1, 1.0);
		assert!(x > 0.0);
	}

	#[test]
	fn create_form_requires_title() {
		let form = ProjectForm::create(today());
		assert_eq!(form.submit().err().as_deref(), Some("title is required"));
	}

	#[test]
	fn create_form_rejects_malformed_dates() {
		let mut form = ProjectForm::create(today());
		form.title = "Side project".to_string();
		form.start_date = "03/01/2025".to_string();
		assert_eq!(form.submit().err().as_deref(), Some("start date must be YYYY-MM-DD"));
	}

	#[test]
	fn axis_adjustments_stay_in_range() {
		let mut form = ProjectForm::create(today());
		while form.focused_field() != FormField::Axis(Axis::Skill) {
			form.focus_next();
		}
		for _ in 0..8 {
			form.adjust(1);
		}
		form.push_char('-');
		assert_eq!(form.parameters.skill, PARAMETER_MAX - 1);

		form.focus_prev();
		for _ in 0..8 {
			form.adjust(-1);
		}
		assert_eq!(form.parameters.qol, PARAMETER_MIN);
	}

	#[test]
	fn complete_form_prefills_parameters_and_today() {
		let projects = sample_projects();
		let form = ProjectForm::complete(&projects[0], today());
		assert_eq!(form.fields()[0], FormField::EndDate);

		match form.submit().expect("completion form should submit") {
			FormSubmission::Complete(completion) => {
				assert_eq!(completion.end_date, today());
				assert_eq!(completion.parameters, Parameters::new(2, 1, 1, 3, 1));
			}
			other => panic!("unexpected submission {other:?}"),
		}
	}

	#[test]
	fn submitted_create_form_adds_project_and_closes_modal() {
		let mut store = DashboardStore::new(sample_projects());
		store.open_create_modal();

		let mut form = ProjectForm::create(today());
		for value in "Night course".chars() {
			form.push_char(value);
		}
		let submission = form.submit().expect("form should submit");
		apply_submission(&mut store, submission);

		assert!(!store.is_create_modal_open());
		assert!(store.view().active_projects.iter().any(|project| project.title == "Night course"));
	}
}
