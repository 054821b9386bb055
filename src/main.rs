mod aggregator;
mod config;
mod domain;
mod fixtures;
mod logging;
mod store;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::aggregator::Highlight;
use crate::config::{load_config, resolve_config_path};
use crate::domain::{format_signed, Axis, DashboardMode, Project, Totals};
use crate::fixtures::{load_seed, sample_projects};
use crate::logging::{init_logging, LogTarget};
use crate::store::DashboardStore;
use crate::ui::run_dashboard;

#[derive(Debug, Parser)]
#[command(name = "impact-dashboard", about = "Terminal dashboard for the impact of your projects")]
struct Cli {
	#[arg(long)]
	config: Option<PathBuf>,
	#[arg(long)]
	seed: Option<PathBuf>,
	/// current, done or virtual
	#[arg(long)]
	mode: Option<String>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Dashboard,
	Summary {
		#[arg(long)]
		json: bool,
	},
	Projects,
}

#[derive(Debug, Serialize)]
struct SummaryReport {
	mode: DashboardMode,
	totals: Totals,
	total_sum: i32,
	top: Option<Highlight>,
	low: Option<Highlight>,
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();
	let command = cli.command.unwrap_or(Command::Dashboard);

	let config_path = resolve_config_path(cli.config);
	let config = load_config(config_path.as_deref())?;

	let log_target = match command {
		Command::Dashboard => LogTarget::Discard,
		Command::Summary { .. } | Command::Projects => LogTarget::Stderr,
	};
	init_logging(&config.log_filter, config.log_file.as_deref(), log_target)?;

	let projects = match cli.seed.or(config.seed) {
		Some(path) => load_seed(&path)?,
		None => sample_projects(),
	};
	let mode = cli
		.mode
		.as_deref()
		.map(DashboardMode::from_name)
		.unwrap_or(config.initial_mode);
	let mut store = DashboardStore::new(projects).with_mode(mode);
	tracing::debug!(event = "app.started", projects = store.projects().len(), mode = %store.mode());

	match command {
		Command::Dashboard => run_dashboard(&mut store)?,
		Command::Summary { json } => print_summary(&store, json)?,
		Command::Projects => print_projects(&store),
	}

	Ok(())
}

fn print_summary(store: &DashboardStore, json: bool) -> Result<(), Box<dyn Error>> {
	let view = store.view();
	let report = SummaryReport {
		mode: view.mode,
		totals: view.selected_total,
		total_sum: view.total_sum,
		top: view.top_highlight,
		low: view.low_highlight,
	};

	if json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("summary for {} mode", report.mode);
	for axis in Axis::ALL {
		println!("{:<16} {:>4}", axis.chart_label(), format_signed(report.totals.get(axis)));
	}
	println!("\ntotal {}", format_signed(report.total_sum));
	if let Some(top) = report.top {
		println!("strong: {}", top.label);
	}
	if let Some(low) = report.low {
		println!("dipping: {}", low.label);
	}

	Ok(())
}

fn print_projects(store: &DashboardStore) {
	let view = store.view();
	if view.is_empty_state() {
		println!("no active projects yet");
		return;
	}

	if view.mode.shows_active() {
		println!("in progress ({}):", view.active_projects.len());
		for project in &view.active_projects {
			print_project_row(project);
		}
	}

	if view.mode.shows_done() {
		if view.mode.shows_active() {
			println!();
		}
		println!("done ({}):", view.done_projects.len());
		for project in &view.done_projects {
			print_project_row(project);
		}
	}
}

fn print_project_row(project: &Project) {
	let dates = match project.end_date {
		Some(end_date) => format!("{} -> {}", project.start_date, end_date),
		None => format!("{} ->", project.start_date),
	};
	println!(
		"{} | {} | {} | {}",
		project.id,
		project.title,
		dates,
		project.parameter_line()
	);
}
