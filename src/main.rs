use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use muffle_cli::reader::user_suppressions_path;
use muffle_cli::suppressions::{Suppression, SuppressionRegistry};

/// Tool name used in fatal suppression diagnostics.
const TOOL_NAME: &str = "muffle";

#[derive(Parser)]
#[command(name = "muffle")]
#[command(
	author,
	version,
	about = "Suppression rule checker for diagnostic tools"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Parse suppression files and report what they contain
	Check {
		#[command(flatten)]
		source: SourceArgs,
	},

	/// List every loaded suppression rule
	Show {
		#[command(flatten)]
		source: SourceArgs,

		/// Emit the rules as JSON
		#[arg(long)]
		json: bool,
	},

	/// Match subject strings against suppression rules
	Match {
		#[command(flatten)]
		source: SourceArgs,

		/// Category to query
		#[arg(short, long, value_name = "NAME")]
		category: String,

		/// Also list rules that never matched
		#[arg(long)]
		unused: bool,

		/// Emit results as JSON
		#[arg(long)]
		json: bool,

		/// Subject strings to test
		#[arg(required = true, value_name = "SUBJECT")]
		subjects: Vec<String>,
	},
}

/// Where rules come from and which categories are recognized.
#[derive(Args)]
struct SourceArgs {
	/// Suppression file(s), in load order
	#[arg(short, long = "file", value_name = "FILE", env = "MUFFLE_SUPPRESSIONS")]
	files: Vec<PathBuf>,

	/// Recognized category names, in recognition order
	#[arg(
		short,
		long,
		value_delimiter = ',',
		required = true,
		value_name = "NAME"
	)]
	types: Vec<String>,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Check { source } => handle_check(&source),
		Commands::Show { source, json } => handle_show(&source, json),
		Commands::Match {
			source,
			category,
			unused,
			json,
			subjects,
		} => handle_match(&source, &category, unused, json, &subjects),
	}
}

/// Explicit files, or the user-level suppressions file when none are given.
fn resolve_files(source: &SourceArgs) -> Result<Vec<PathBuf>> {
	if !source.files.is_empty() {
		return Ok(source.files.clone());
	}

	let user_path = user_suppressions_path().context("Failed to resolve user suppressions path")?;
	if user_path.exists() {
		Ok(vec![user_path])
	} else {
		bail!(
			"no suppressions file given and {} does not exist",
			user_path.display()
		);
	}
}

fn type_refs(source: &SourceArgs) -> Vec<&str> {
	source.types.iter().map(String::as_str).collect()
}

fn load_registry<'t>(
	types: &'t [&'t str],
	files: &[PathBuf],
) -> SuppressionRegistry<'t> {
	let mut registry = SuppressionRegistry::new(TOOL_NAME, types);
	for file in files {
		registry.load_file(file);
	}
	registry
}

fn handle_check(source: &SourceArgs) -> Result<ExitCode> {
	let files = resolve_files(source)?;
	let types = type_refs(source);

	for file in &files {
		let mut registry = SuppressionRegistry::new(TOOL_NAME, &types);
		registry.load_file(file);

		println!("{} ({} rules)", file.display(), registry.count());
		for ty in &types {
			if registry.has_category(ty) {
				let count = registry.iter().filter(|rule| rule.category == *ty).count();
				println!("  {ty}: {count}");
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_show(source: &SourceArgs, json: bool) -> Result<ExitCode> {
	let files = resolve_files(source)?;
	let types = type_refs(source);
	let registry = load_registry(&types, &files);

	if json {
		let rules: Vec<&Suppression> = registry.iter().collect();
		let output =
			serde_json::to_string_pretty(&rules).context("Failed to serialize rules")?;
		println!("{output}");
		return Ok(ExitCode::SUCCESS);
	}

	if registry.is_empty() {
		println!("No suppression rules loaded.");
		return Ok(ExitCode::SUCCESS);
	}

	for (index, rule) in registry.iter().enumerate() {
		println!("{index:4}  {}:{}", rule.category, rule.pattern);
	}

	Ok(ExitCode::SUCCESS)
}

/// Outcome of matching one subject string.
#[derive(Serialize)]
struct SubjectVerdict<'a> {
	subject: &'a str,
	suppressed: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	category: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pattern: Option<String>,
}

#[derive(Serialize)]
struct MatchReport<'a, 't> {
	results: Vec<SubjectVerdict<'a>>,
	matched: Vec<&'a Suppression<'t>>,
	unused: Vec<&'a Suppression<'t>>,
}

fn handle_match(
	source: &SourceArgs,
	category: &str,
	unused: bool,
	json: bool,
	subjects: &[String],
) -> Result<ExitCode> {
	let files = resolve_files(source)?;
	let types = type_refs(source);

	if !types.contains(&category) {
		bail!(
			"unknown category '{category}' (recognized: {})",
			types.join(", ")
		);
	}

	let mut registry = load_registry(&types, &files);

	let mut verdicts = Vec::with_capacity(subjects.len());
	for subject in subjects {
		let verdict = match registry.find_match(subject, category) {
			Some(rule) => SubjectVerdict {
				subject,
				suppressed: true,
				category: Some(rule.category),
				pattern: Some(rule.pattern.clone()),
			},
			None => SubjectVerdict {
				subject,
				suppressed: false,
				category: None,
				pattern: None,
			},
		};
		verdicts.push(verdict);
	}

	let all_suppressed = verdicts.iter().all(|verdict| verdict.suppressed);

	if json {
		let report = MatchReport {
			results: verdicts,
			matched: registry.collect_matched(),
			unused: registry.iter().filter(|rule| rule.hit_count == 0).collect(),
		};
		let output =
			serde_json::to_string_pretty(&report).context("Failed to serialize match report")?;
		println!("{output}");
	} else {
		for verdict in &verdicts {
			match (&verdict.category, &verdict.pattern) {
				(Some(cat), Some(pattern)) => {
					println!("{}: suppressed by {cat}:{pattern}", verdict.subject);
				}
				_ => println!("{}: not suppressed", verdict.subject),
			}
		}

		if unused {
			println!();
			println!("Unused suppressions:");
			for rule in registry.iter().filter(|rule| rule.hit_count == 0) {
				println!("  {}:{}", rule.category, rule.pattern);
			}
		}
	}

	Ok(if all_suppressed {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}
