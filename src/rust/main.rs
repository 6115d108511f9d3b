use std::io::{self, BufRead};
use std::time::Instant;
use anyhow::{Context, Result};
use bounce_classifier::{
    extract_retry_timing, extract_smtp_codes, get_action, get_code_based_fallback,
    identify_blocklist, runtime, ClassificationResult, InitOptions,
};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Classify SMTP bounce messages", long_about = None)]
struct Args {
    /// Messages to classify. Reads one message per line from stdin when omitted
    messages: Vec<String>,

    /// Directory or base URL of the model bundle
    #[arg(short, long)]
    model_path: Option<String>,

    /// Expected SHA-256 of weights.bin
    #[arg(long)]
    weights_sha256: Option<String>,

    /// Print results as JSON lines
    #[arg(short, long)]
    json: bool,

    /// Skip the model and only run the rule cascade
    #[arg(short, long)]
    rules_only: bool,
}

fn read_messages(args: &Args) -> Result<Vec<String>> {
    if !args.messages.is_empty() {
        return Ok(args.messages.clone());
    }
    let stdin = io::stdin();
    let mut messages = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if !line.trim().is_empty() {
            messages.push(line);
        }
    }
    Ok(messages)
}

fn print_rules(message: &str, json: bool) -> Result<()> {
    let codes = extract_smtp_codes(message);
    let label = get_code_based_fallback(message);
    let action = get_action(label.unwrap_or_default());
    let retry = extract_retry_timing(message);
    let blocklist = identify_blocklist(message);

    if json {
        let value = serde_json::json!({
            "message": message,
            "codes": codes,
            "label": label,
            "action": action,
            "retryAfterSeconds": retry,
            "blocklist": blocklist,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    println!("\nMessage: {}", message);
    println!("  SMTP codes: main={:?} extended={:?}", codes.main_code, codes.extended_code);
    println!("  Rule label: {}", label.unwrap_or("(none)"));
    println!("  Action: {}", action);
    if let Some(seconds) = retry {
        println!("  Retry after: {}s", seconds);
    }
    if let Some(found) = blocklist {
        println!("  Blocklist: {}", found.names().join(", "));
    }
    Ok(())
}

fn print_result(message: &str, result: &ClassificationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    println!("\nMessage: {}", message);
    println!("  Label: {}{}", result.label, if result.used_fallback { " (rule fallback)" } else { "" });
    println!("  Confidence: {:.1}%", result.confidence * 100.0);
    println!("  Action: {}", result.action);
    if let Some(seconds) = result.retry_after_seconds {
        println!("  Retry after: {}s", seconds);
    }
    if let Some(found) = &result.blocklist {
        println!("  Blocklist: {}", found.names().join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let messages = read_messages(&args)?;

    if args.rules_only {
        for message in &messages {
            print_rules(message, args.json)?;
        }
        return Ok(());
    }

    let options = InitOptions {
        model_path: args.model_path.clone(),
        weights_sha256: args.weights_sha256.clone(),
        ..InitOptions::default()
    };

    let start_time = Instant::now();
    let manager = runtime::default_manager();
    manager
        .initialize(options)
        .await
        .context("Failed to load the model bundle")?;
    info!("Model loaded in {:.2?}", start_time.elapsed());

    let classify_start = Instant::now();
    for message in &messages {
        match manager.classify(message).await {
            Ok(result) => print_result(message, &result, args.json)?,
            Err(e) => eprintln!("\nError classifying '{}': {}", message, e),
        }
    }

    if !messages.is_empty() {
        info!(
            "Classified {} messages, average {:.2?} per message",
            messages.len(),
            classify_start.elapsed() / messages.len() as u32
        );
    }
    Ok(())
}
