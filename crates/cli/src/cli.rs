use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "cargomax")]
#[command(about = "CargoMax CLI - logistics dashboard from the command line")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// API base URL (defaults to $CARGOMAX_API_URL, then http://localhost:8080)
	#[arg(long, global = true, value_name = "URL")]
	pub api_url: Option<String>,

	/// Session file holding the login cookies
	#[arg(long, global = true, value_name = "FILE")]
	pub session_file: Option<PathBuf>,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Sign in and keep the session cookie for later commands
	Login {
		#[arg(long)]
		email: String,
		#[arg(long)]
		password: String,
	},

	/// Show the signed-in user
	#[command(alias = "me")]
	Whoami,

	/// Sign out and forget the stored session
	Logout,

	/// Run a raw query and print its data
	Query {
		/// Query text
		text: String,
		/// Variables as a JSON object
		#[arg(long, value_name = "JSON")]
		vars: Option<String>,
	},

	/// Dashboard counters
	Stats,

	/// List shipments
	Shipments {
		/// Only shipments with this status (e.g. in_transit, delayed)
		#[arg(long)]
		status: Option<String>,
		#[arg(long, default_value_t = 1)]
		page: u32,
		#[arg(long, default_value_t = 50)]
		per_page: u32,
	},

	/// Look a shipment up by tracking number
	Track { tracking_number: String },

	/// List fleet vehicles
	Vehicles {
		#[arg(long, default_value_t = 1)]
		page: u32,
		#[arg(long, default_value_t = 50)]
		per_page: u32,
	},

	/// List drivers
	Drivers {
		#[arg(long, default_value_t = 1)]
		page: u32,
		#[arg(long, default_value_t = 50)]
		per_page: u32,
	},
}

impl Commands {
	/// Name reported in the result envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Login { .. } => "login",
			Commands::Whoami => "whoami",
			Commands::Logout => "logout",
			Commands::Query { .. } => "query",
			Commands::Stats => "stats",
			Commands::Shipments { .. } => "shipments",
			Commands::Track { .. } => "track",
			Commands::Vehicles { .. } => "vehicles",
			Commands::Drivers { .. } => "drivers",
		}
	}
}
