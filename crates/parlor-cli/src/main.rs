// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parlor operator CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use parlor_common_i18n::{available_locales, Params};
use parlor_server_config::{LogFormat, ServerConfig};
use parlor_server_db::{SettingsRepository, UserId};
use parlor_server_interaction::{ChatId, ContextService, Interaction, MessageTemplate, Originator, Text};
use parlor_server_settings::SettingsService;
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod stdout_sink;

use stdout_sink::StdoutSink;

/// Parlor - inspect and edit user settings, preview localized replies.
#[derive(Parser, Debug)]
#[command(name = "parlor", about = "Parlor settings operator tool", version)]
struct Args {
	/// Config file to load instead of /etc/parlor/server.toml
	#[arg(long, env = "PARLOR_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// List supported locales
	Locales,

	#[command(flatten)]
	Store(StoreCommand),
}

/// Commands that open the settings database.
#[derive(Subcommand, Debug)]
enum StoreCommand {
	/// Print a user's settings record, creating it if needed
	Show { user_id: i64 },

	/// Merge one key into a user's settings
	Set {
		user_id: i64,
		key: String,
		/// JSON value; anything that does not parse is stored as a string
		value: String,
	},

	/// Mark a user as onboarded
	Onboard { user_id: i64 },

	/// Render a catalog key in the user's locale
	Render {
		user_id: i64,
		key: String,
		/// Placeholder values as name=value
		#[arg(value_parser = parse_param)]
		params: Vec<(String, String)>,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let command = match args.command {
		Command::Locales => {
			for info in available_locales() {
				println!("{}\t{}\t{}", info.code, info.name, info.native_name);
			}
			return Ok(());
		}
		Command::Store(command) => command,
	};

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => parlor_server_config::load_config_with_file(path),
		None => parlor_server_config::load_config(),
	}
	.context("failed to load configuration")?;

	init_tracing(&config);

	let pool = parlor_server_db::create_pool_with_max_connections(
		&config.database.url,
		config.database.max_connections,
	)
	.await
	.with_context(|| format!("failed to open {}", config.database.url))?;
	parlor_server_db::run_migrations(&pool)
		.await
		.context("failed to migrate settings database")?;

	let repo = Arc::new(SettingsRepository::new(pool));
	let settings = SettingsService::new(repo, config.store.clone());

	run(command, settings, &config).await
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	// stdout carries command output; logs go to stderr.
	match config.logging.format {
		LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init(),
		LogFormat::Plain => registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init(),
	}
}

async fn run(command: StoreCommand, settings: SettingsService, config: &ServerConfig) -> Result<()> {
	match command {
		StoreCommand::Show { user_id } => {
			let record = settings.get_or_create(UserId::new(user_id)).await?;
			println!("{}", serde_json::to_string_pretty(&record)?);
		}
		StoreCommand::Set {
			user_id,
			key,
			value,
		} => {
			let mut patch = Map::new();
			patch.insert(key, parse_value(&value));
			let record = settings.merge_patch(UserId::new(user_id), patch).await?;
			println!("{}", serde_json::to_string_pretty(&record)?);
		}
		StoreCommand::Onboard { user_id } => {
			let record = settings.set_onboarded(UserId::new(user_id)).await?;
			tracing::info!(user_id, version = record.version, "user marked as onboarded");
			println!("{}", serde_json::to_string_pretty(&record)?);
		}
		StoreCommand::Render {
			user_id,
			key,
			params,
		} => {
			let service = ContextService::new(settings, config.i18n.default_locale);
			let params: Params = params.into_iter().collect();
			let template = MessageTemplate::new(Text::key_with(key, params));
			let mut interaction = Interaction::fresh(
				ChatId(user_id),
				Some(Originator::new(UserId::new(user_id))),
			);
			service
				.responder()
				.respond(&mut interaction, &StdoutSink::default(), &template)
				.await?;
		}
	}
	Ok(())
}

fn parse_value(raw: &str) -> Value {
	serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_param(raw: &str) -> Result<(String, String)> {
	let (name, value) = raw
		.split_once('=')
		.ok_or_else(|| anyhow!("expected name=value, got {raw:?}"))?;
	if name.is_empty() {
		return Err(anyhow!("placeholder name is empty in {raw:?}"));
	}
	Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use serde_json::json;

	#[test]
	fn test_cli_definition_is_valid() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_parse_param() {
		assert_eq!(
			parse_param("name=Ana").unwrap(),
			("name".to_string(), "Ana".to_string())
		);
		assert_eq!(
			parse_param("expr=a=b").unwrap(),
			("expr".to_string(), "a=b".to_string())
		);
		assert!(parse_param("name").is_err());
		assert!(parse_param("=x").is_err());
	}

	#[test]
	fn test_parse_value_prefers_json() {
		assert_eq!(parse_value("5"), json!(5));
		assert_eq!(parse_value("true"), json!(true));
		assert_eq!(parse_value("\"es\""), json!("es"));
		assert_eq!(parse_value("es"), json!("es"));
	}

	#[test]
	fn test_render_args_parse() {
		let args = Args::try_parse_from([
			"parlor",
			"render",
			"42",
			"screens.start.welcome_back",
			"name=Ana",
		])
		.unwrap();
		match args.command {
			Command::Store(StoreCommand::Render {
				user_id, params, ..
			}) => {
				assert_eq!(user_id, 42);
				assert_eq!(params, vec![("name".to_string(), "Ana".to_string())]);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn test_locales_is_separate_from_store_commands() {
		let args = Args::try_parse_from(["parlor", "locales"]).unwrap();
		assert!(matches!(args.command, Command::Locales));

		let args = Args::try_parse_from(["parlor", "onboard", "7"]).unwrap();
		assert!(matches!(
			args.command,
			Command::Store(StoreCommand::Onboard { user_id: 7 })
		));
	}
}
