//! Server-side judgment commands

use anyhow::Result;
use colored::*;
use std::path::Path;

use repx_core::domain::{CameraAngle, Discipline};

use crate::api::ApiClient;
use crate::config::Config;
use crate::output::print_status;

/// Upload a video for asynchronous judging
pub async fn submit(
    config: &Config,
    video: &Path,
    discipline: Discipline,
    camera_angle: CameraAngle,
    context: Option<&str>,
) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    let submitted = client
        .submit(video, discipline, camera_angle, context)
        .await?;

    println!("{}", "✓ Video submitted".green());
    println!("  Judgment ID: {}", submitted.judgment_id.to_string().cyan());
    println!("  Status:      {}", submitted.status.as_str().yellow());
    println!(
        "\n{}",
        format!("Check progress with: repx status {}", submitted.judgment_id).dimmed()
    );

    Ok(())
}

/// Get and display an async judgment
pub async fn status(config: &Config, judgment_id: &str, json: bool) -> Result<()> {
    let client = ApiClient::new(&config.server_url);

    let status = client.get_status(judgment_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status(&status);
    }

    Ok(())
}
