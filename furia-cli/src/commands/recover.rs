//! # Password Recovery Commands
//!
//! Drive the e-mail confirmation workflow from the terminal until it reaches
//! an outcome. Ctrl-C tears the workflow down.

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

use furia_core::recovery::RecoverySnapshot;
use furia_core::{EmailConfirmationWorkflow, PollStatus, RecoveryPolicy};

use crate::console::ConsoleHooks;
use crate::context::AppContext;

const PROGRESS_EVERY: Duration = Duration::from_secs(5);

pub async fn recover(ctx: &AppContext, email: &str, json: bool) -> Result<()> {
    let hooks = Arc::new(ConsoleHooks::new());
    let workflow = build_workflow(ctx, &hooks);

    if let Err(e) = workflow.submit(email).await {
        bail!("password recovery not started: {}", e);
    }

    if !json {
        println!("📧 Reset e-mail sent to {}.", email.trim());
        println!("   Open the link in it; waiting for confirmation (Ctrl-C to stop)...");
    }

    wait_for_outcome(&workflow, &hooks, json).await
}

pub async fn resume(ctx: &AppContext, json: bool) -> Result<()> {
    let hooks = Arc::new(ConsoleHooks::new());
    let workflow = build_workflow(ctx, &hooks);

    if !workflow.resume().await? {
        println!("No password recovery is pending. Start one with `furia recover <email>`.");
        return Ok(());
    }

    if !json {
        if let Some(request) = workflow.snapshot().request {
            println!("⏳ Waiting for {} to be confirmed (Ctrl-C to stop)...", request.email);
        }
    }

    wait_for_outcome(&workflow, &hooks, json).await
}

fn build_workflow(ctx: &AppContext, hooks: &Arc<ConsoleHooks>) -> EmailConfirmationWorkflow {
    EmailConfirmationWorkflow::new(
        ctx.transport.clone(),
        ctx.store.clone(),
        hooks.clone(),
        hooks.clone(),
        RecoveryPolicy::from(&ctx.config.recovery),
    )
}

async fn wait_for_outcome(
    workflow: &EmailConfirmationWorkflow,
    hooks: &ConsoleHooks,
    json: bool,
) -> Result<()> {
    let mut progress = tokio::time::interval(PROGRESS_EVERY);
    progress.tick().await;

    loop {
        tokio::select! {
            _ = hooks.finished() => break,
            _ = tokio::signal::ctrl_c() => {
                workflow.shutdown();
                eprintln!("Stopped waiting. Run `furia resume` to continue later.");
                break;
            }
            _ = progress.tick() => {
                if !json {
                    print_progress(&workflow.snapshot());
                }
            }
        }
    }

    let snapshot = workflow.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    match snapshot.poll.status {
        PollStatus::TimedOut => bail!("e-mail not confirmed in time"),
        PollStatus::Failed(reason) => bail!(reason),
        _ => Ok(()),
    }
}

fn print_progress(snapshot: &RecoverySnapshot) {
    let poll = &snapshot.poll;
    if poll.status != PollStatus::Polling {
        return;
    }

    let resend = if snapshot.cooldown.can_resend() {
        "resend available".to_string()
    } else {
        format!("resend in {}s", snapshot.cooldown.remaining_secs)
    };
    eprintln!(
        "   check {}/{}, {}",
        poll.attempts_made, poll.max_attempts, resend
    );
}
