//! Terminal rendering of judgments and reference data

use colored::*;

use repx_core::domain::{JobStatus, OverallJudgment};
use repx_core::dto::job::JudgmentStatusResponse;
use repx_core::dto::judgment::JudgmentResponse;
use repx_core::dto::regulations::{DisciplineInfo, RegulationsResponse};

/// Print a full judgment
pub fn print_judgment(judgment: &JudgmentResponse) {
    println!("{}", "Judgment:".bold());
    println!("  ID:          {}", judgment.judgment_id.to_string().dimmed());
    println!("  Discipline:  {}", judgment.discipline.display_name());
    println!("  Verdict:     {}", colorize_verdict(judgment.overall_judgment));
    println!(
        "  Confidence:  {}",
        format!("{:.0}%", judgment.confidence * 100.0).cyan()
    );
    println!("  Reps:        {}", judgment.rep_count);
    println!("  Model:       {}", judgment.model_used.dimmed());

    if judgment.below_confidence_threshold {
        println!(
            "\n{}",
            "⚠ Confidence below threshold, human review recommended".yellow()
        );
    }

    if !judgment.invalid_reasons.is_empty() {
        println!("\n{}", "Invalid reasons:".bold());
        for reason in &judgment.invalid_reasons {
            println!("  {} {}", "✗".red(), reason);
        }
    }

    if !judgment.details.is_empty() {
        println!("\n{}", "Criteria:".bold());
        for detail in &judgment.details {
            let mark = if detail.passed { "✓".green() } else { "✗".red() };
            println!(
                "  {} {} {}",
                mark,
                detail.criteria,
                format!("({})", detail.explanation).dimmed()
            );
        }
    }

    if let Some(recommendations) = judgment
        .frame_analysis
        .get("recommendations")
        .and_then(|r| r.as_str())
        .filter(|r| !r.is_empty())
    {
        println!("\n{}", "Recommendations:".bold());
        println!("  {}", recommendations);
    }
}

/// Print the state of an async judgment
pub fn print_status(status: &JudgmentStatusResponse) {
    println!("{}", "Judgment Status:".bold());
    println!("  ID:          {}", status.judgment_id.to_string().cyan());
    println!("  Status:      {}", colorize_status(status.status));
    println!(
        "  Submitted:   {}",
        status.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(started) = status.started_at {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(completed) = status.completed_at {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = status.started_at {
            let duration = completed.signed_duration_since(started);
            println!("  Duration:    {}s", duration.num_seconds());
        }
    }

    if let Some(error) = &status.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if let Some(result) = &status.result {
        println!();
        print_judgment(result);
    }
}

/// Print regulation text, checklist and invalid-reason catalogue
pub fn print_regulations(regulations: &RegulationsResponse) {
    println!("{}", regulations.regulations.trim());

    println!("\n{}", "Visual checklist:".bold());
    for section in &regulations.visual_criteria {
        println!("  {}", section.section.cyan());
        for item in &section.items {
            println!("    - {}", item);
        }
    }

    println!("\n{}", "Common invalid reasons:".bold());
    for reason in &regulations.common_invalid_reasons {
        let severity = match reason.severity.as_str() {
            "critical" => reason.severity.red(),
            "major" => reason.severity.yellow(),
            _ => reason.severity.dimmed(),
        };
        println!("  {} [{}] {}", reason.code.bold(), severity, reason.description);
    }
}

/// Print one discipline summary
pub fn print_discipline(info: &DisciplineInfo) {
    let angles = |list: &[repx_core::domain::CameraAngle]| {
        list.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
    };

    println!("  {} {} ({})", "▸".cyan(), info.name.bold(), info.id);
    println!("    {}", info.description);
    println!("    Required angles: {}", angles(&info.required_camera_angles));
    if !info.optional_camera_angles.is_empty() {
        println!(
            "    Optional angles: {}",
            angles(&info.optional_camera_angles).dimmed()
        );
    }
    println!();
}

fn colorize_verdict(verdict: OverallJudgment) -> ColoredString {
    match verdict {
        OverallJudgment::Valid => verdict.as_str().green().bold(),
        OverallJudgment::Invalid => verdict.as_str().red().bold(),
        OverallJudgment::NeedsReview => verdict.as_str().yellow().bold(),
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    match status {
        JobStatus::Pending => status.as_str().yellow(),
        JobStatus::Processing => status.as_str().cyan(),
        JobStatus::Completed => status.as_str().green(),
        JobStatus::Failed => status.as_str().red(),
    }
}
