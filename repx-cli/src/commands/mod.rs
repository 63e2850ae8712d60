//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod judge;
mod reference;

pub use judge::JudgeArgs;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use repx_core::domain::{CameraAngle, Discipline};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Judge a video locally against the configured model backend
    Judge(JudgeArgs),
    /// Upload a video to the server for asynchronous judging
    Submit {
        /// Video file
        video: PathBuf,

        /// Discipline: pull_up, dip or squat
        #[arg(short, long)]
        discipline: Discipline,

        /// Camera angle: front, side, parallel or auto
        #[arg(long, default_value = "auto")]
        camera_angle: CameraAngle,

        /// Additional context for the judge
        #[arg(long)]
        context: Option<String>,
    },
    /// Get the status of an asynchronous judgment
    Status {
        /// Judgment ID returned by `submit`
        judgment_id: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Show the regulations for a discipline
    Regulations {
        /// Discipline: pull_up, dip or squat
        discipline: Discipline,
    },
    /// List the judged disciplines
    Disciplines,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Judge(args) => judge::handle_judge_command(args).await,
        Commands::Submit {
            video,
            discipline,
            camera_angle,
            context,
        } => job::submit(config, &video, discipline, camera_angle, context.as_deref()).await,
        Commands::Status { judgment_id, json } => job::status(config, &judgment_id, json).await,
        Commands::Regulations { discipline } => {
            reference::show_regulations(discipline);
            Ok(())
        }
        Commands::Disciplines => {
            reference::list_disciplines();
            Ok(())
        }
    }
}
