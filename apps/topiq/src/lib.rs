use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use serde::Serialize;

use topiq_domain::TopicDraft;
use topiq_service::{ThemeRecord, ThemeSaveRequest, TopicService};

#[derive(Debug, Parser)]
#[command(
	version = topiq_cli::VERSION,
	rename_all = "kebab",
	styles = topiq_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Print the compiled draft and saved queries of a theme.
	Preview {
		#[arg(long, short = 't', value_name = "FILE")]
		theme: PathBuf,
	},
	/// Draft a theme from a free-text description.
	Suggest {
		#[arg(long, short = 'd', value_name = "TEXT")]
		description: String,
	},
	/// Fill in missing translations for one additional language of a theme.
	Translate {
		#[arg(long, short = 't', value_name = "FILE")]
		theme: PathBuf,
		#[arg(long, value_name = "LANG")]
		target: String,
		/// Write the updated theme here instead of printing it.
		#[arg(long, short = 'o', value_name = "FILE")]
		output: Option<PathBuf>,
	},
}

#[derive(Debug, Serialize)]
struct QueryPreview {
	/// Zero for the draft, otherwise the saved slot number.
	slot: u8,
	text: String,
}

#[derive(Debug, Serialize)]
struct PreviewOutput {
	title: String,
	queries: Vec<QueryPreview>,
}

#[derive(Debug, Serialize)]
struct SuggestOutput {
	theme: ThemeSaveRequest,
	preview: String,
}

#[derive(Debug, Serialize)]
struct TranslateOutput {
	changed: usize,
	theme: ThemeSaveRequest,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = topiq_config::load(&args.config)?;

	topiq_cli::init_tracing(&config.service.log_level);

	let mut service = TopicService::new(config);

	match args.command {
		Command::Preview { theme } => {
			service.load_theme(load_theme(&theme)?)?;

			print_json(&preview(service.draft()))
		},
		Command::Suggest { description } => {
			service.draft_mut().set_description(&description);
			service.suggest_from_description().await?;

			print_json(&SuggestOutput {
				theme: service.save_request(),
				preview: service.draft().compile_draft(),
			})
		},
		Command::Translate { theme, target, output } => {
			service.load_theme(load_theme(&theme)?)?;

			let changed = service.translate_missing(&target).await?;
			let output_json = TranslateOutput { changed, theme: service.save_request() };

			match output {
				Some(path) => {
					fs::write(&path, serde_json::to_string_pretty(&output_json.theme)?)?;

					tracing::info!(path = %path.display(), changed, "Theme written.");

					Ok(())
				},
				None => print_json(&output_json),
			}
		},
	}
}

fn preview(draft: &TopicDraft) -> PreviewOutput {
	let mut queries = vec![QueryPreview { slot: 0, text: draft.compile_draft() }];

	queries.extend(draft.slots().saved_queries().filter_map(|(index, _)| {
		draft.compile_saved(index).map(|text| QueryPreview { slot: index.get(), text })
	}));

	PreviewOutput { title: draft.theme().title.clone(), queries }
}

fn load_theme(path: &Path) -> color_eyre::Result<ThemeRecord> {
	let raw = fs::read_to_string(path)
		.map_err(|err| eyre::eyre!("Failed to read theme {}: {err}.", path.display()))?;

	Ok(serde_json::from_str(&raw)?)
}

fn print_json<T>(value: &T) -> color_eyre::Result<()>
where
	T: Serialize,
{
	let json = serde_json::to_string_pretty(value)?;

	println!("{json}");

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_translate_subcommand() {
		let args = Args::try_parse_from([
			"topiq", "-c", "topiq.toml", "translate", "-t", "theme.json", "--target", "en",
		])
		.expect("arguments must parse");

		assert!(matches!(
			args.command,
			Command::Translate { ref target, output: None, .. } if target == "en"
		));
	}

	#[test]
	fn preview_lists_draft_then_saved_slots() {
		let mut draft = TopicDraft::new(vec!["en".to_string()]);

		draft.add_search_term(topiq_domain::TermKind::Keyword, "sonar");
		draft.save_current_query();

		let output = preview(&draft);
		let slots: Vec<u8> = output.queries.iter().map(|query| query.slot).collect();

		assert_eq!(slots, vec![0, 1]);
		assert_eq!(output.queries[1].text, "(sonar)");
	}
}
