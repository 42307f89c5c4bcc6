//! Riskboard CLI
//!
//! Offline front end for the Riskboard library: lists the pipeline stages and
//! replays captured generator responses through the validation loop.

use anyhow::{bail, Context, Result};
use riskboard::prelude::*;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("riskboard");

    if args.len() < 2 {
        print_usage(program);
        return Ok(());
    }

    match args[1].as_str() {
        "stages" => list_stages(),
        "schema" => {
            let Some(stage) = args.get(2) else {
                bail!("please specify a stage id");
            };
            show_schema(stage)
        }
        "validate" => {
            if args.len() < 5 {
                eprintln!("Usage: {} validate <stage> <upstream.json> <artifact.json>", program);
                bail!("missing arguments");
            }
            let passed = replay(&args[2], Path::new(&args[3]), &[PathBuf::from(&args[4])], Some(1))?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        "replay" => {
            let (config, rest) = split_config(&args[2..])?;
            if rest.len() < 3 {
                eprintln!(
                    "Usage: {} replay [--config <file>] <stage> <upstream.json> <response>...",
                    program
                );
                bail!("missing arguments");
            }
            let stage: StageId = rest[0].parse().map_err(anyhow::Error::msg)?;
            let responses: Vec<PathBuf> = rest[2..].iter().map(PathBuf::from).collect();
            let budget = config.budget_for(stage);
            let passed = replay(&rest[0], Path::new(&rest[1]), &responses, Some(budget))?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            Ok(())
        }
    }
}

fn print_usage(program: &str) {
    println!("Riskboard v{}", riskboard::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  stages                                   List pipeline stages");
    println!("  schema <stage>                           Show the output shape of a stage");
    println!("  validate <stage> <upstream> <artifact>   Check one candidate artifact");
    println!("  replay [--config <file>] <stage> <upstream> <response>...");
    println!("                                           Replay captured generator responses");
    println!("  help                                     Show this help message");
    println!();
    println!("Upstream files hold a JSON object with any of: intake, profile,");
    println!("classification, flags, portfolio. Set RUST_LOG=debug to trace attempts.");
}

fn list_stages() -> Result<()> {
    let registry = StageRegistry::with_builtins();
    println!("Pipeline stages ({} total):", registry.len());
    println!();
    for descriptor in registry.descriptors() {
        println!(
            "  {:<20} {} (needs: {})",
            descriptor.id.as_str(),
            descriptor.id.display_name(),
            descriptor.upstream.join(", ")
        );
    }
    Ok(())
}

fn show_schema(stage: &str) -> Result<()> {
    let stage: StageId = stage.parse().map_err(anyhow::Error::msg)?;
    let registry = StageRegistry::with_builtins();
    let descriptor = registry
        .get(stage)
        .with_context(|| format!("stage '{}' is not registered", stage))?;
    println!("{}", descriptor.instructions);
    println!();
    print!("{}", descriptor.schema.outline());
    Ok(())
}

fn split_config(args: &[String]) -> Result<(OrchestratorConfig, &[String])> {
    match args {
        [flag, path, rest @ ..] if flag == "--config" => {
            let config = OrchestratorConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path))?;
            Ok((config, rest))
        }
        _ => Ok((OrchestratorConfig::default(), args)),
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Feed captured responses to one stage; returns whether it was accepted.
fn replay(stage: &str, upstream: &Path, responses: &[PathBuf], budget: Option<u32>) -> Result<bool> {
    let stage: StageId = stage.parse().map_err(anyhow::Error::msg)?;
    let upstream: UpstreamArtifacts = serde_json::from_str(&read(upstream)?)
        .with_context(|| format!("parsing upstream artifacts {}", upstream.display()))?;
    let texts = responses.iter().map(|p| read(p)).collect::<Result<Vec<_>>>()?;
    if texts.is_empty() {
        bail!("no responses to replay");
    }

    let generator = ScriptedGenerator::from_texts(texts);
    let budget = budget.unwrap_or(riskboard::core::config::DEFAULT_ATTEMPT_BUDGET);

    match run_stage(&generator, stage, &upstream, budget)? {
        StageOutcome::Accepted(artifact) => {
            eprintln!(
                "✓ {} accepted on attempt {} (artifact {})",
                stage.display_name(),
                artifact.attempt(),
                artifact.id()
            );
            println!("{}", serde_json::to_string_pretty(artifact.payload())?);
            Ok(true)
        }
        StageOutcome::Failed(diagnostics) => {
            eprintln!(
                "✗ {} rejected after {} attempt(s)",
                stage.display_name(),
                diagnostics.attempts_consumed
            );
            if let Some(error) = &diagnostics.structural_error {
                eprintln!("  structural: {}", error);
            }
            for line in diagnostics.violations.detailed() {
                eprintln!("  {}", line);
            }
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
            Ok(false)
        }
    }
}
