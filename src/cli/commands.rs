//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::container::AppContainer;
use crate::app::JobPlan;
use crate::cli::args::{InspectArgs, PlanArgs, RunArgs};
use crate::domain::model::JobReport;
use crate::utils::time::format_timestamp;
use crate::utils::Utils;

/// Execute the run command
pub async fn run(container: &dyn AppContainer, identity: Option<&str>, args: RunArgs) -> Result<()> {
    container.gate().admit(identity)?;

    let job = args
        .to_job_config()
        .context("Invalid job configuration")?;
    info!(
        source = %job.source().display(),
        clip_duration = job.clip_duration(),
        captions = job.add_captions(),
        vertical = job.vertical_crop(),
        mute = job.mute_audio(),
        "Starting clip run"
    );

    let report = container
        .pipeline()
        .run(&job, &args.output)
        .await
        .with_context(|| format!("Failed to process {}", job.source().display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize job report")?
        );
    } else {
        print!("{}", render_report(&report));
    }

    info!(
        archive = %report.package.path.display(),
        clips = report.artifacts.len(),
        elapsed = %Utils::format_duration(report.elapsed),
        "Clip run completed successfully"
    );
    Ok(())
}

/// Execute the plan command
pub async fn plan(container: &dyn AppContainer, identity: Option<&str>, args: PlanArgs) -> Result<()> {
    container.gate().admit(identity)?;

    let job = args
        .to_job_config()
        .context("Invalid job configuration")?;
    let plan = container
        .pipeline()
        .plan(&job)
        .await
        .with_context(|| format!("Failed to plan {}", job.source().display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?
        );
    } else {
        print!("{}", render_plan(&plan));
    }
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(
    container: &dyn AppContainer,
    identity: Option<&str>,
    args: InspectArgs,
) -> Result<()> {
    container.gate().admit(identity)?;

    let response = container
        .inspect_interactor()
        .execute(&args.input, args.json)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    println!("{}", response.summary);
    Ok(())
}

/// Human-readable run summary
pub fn render_report(report: &JobReport) -> String {
    let mut out = format!("Archive: {}\n", report.package.path.display());
    for artifact in &report.artifacts {
        out.push_str(&format!(
            "  {}  {}\n",
            artifact.file_name,
            format_timestamp(artifact.duration)
        ));
    }
    if report.dropped_remainder > 0.0 {
        out.push_str(&format!(
            "Dropped trailing {:.3}s of source\n",
            report.dropped_remainder
        ));
    }
    out
}

/// Human-readable segment table
pub fn render_plan(plan: &JobPlan) -> String {
    let mut out = format!(
        "Source: {} ({}, {})\n",
        plan.source.path.display(),
        format_timestamp(plan.source.duration),
        plan.source.frame_size()
    );
    out.push_str(&format!(
        "Clips:  {} x {}s at {}\n",
        plan.parts.len(),
        plan.clip_duration,
        plan.output_frame
    ));
    for part in &plan.parts {
        out.push_str(&format!(
            "  {:>3}  {} - {}  {}\n",
            part.segment.part_number(),
            format_timestamp(part.segment.start),
            format_timestamp(part.segment.end),
            part.file_name
        ));
    }
    if plan.dropped_remainder > 0.0 {
        out.push_str(&format!(
            "Dropped trailing {:.3}s of source\n",
            plan.dropped_remainder
        ));
    }
    out
}
