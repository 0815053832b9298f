//! notes-ai CLI: 单次生成调用的命令行工具
//!
//! Usage:
//!   notes-ai-cli generate --system <text> --user <text|@file> [OPTIONS]
//!   notes-ai-cli check-model <provider/model>
//!   notes-ai-cli version

use anyhow::Context;
use notes_ai::telemetry::TracingUsageSink;
use notes_ai::{
    ClientConfig, GenerationClient, GenerationParameters, GenerationRequest, SchemaDescriptor,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notes_ai=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]).await,
        "check-model" => cmd_check_model(&args[2..]),
        "version" | "--version" | "-V" => cmd_version(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"notes-ai-cli: 会议笔记生成命令行工具

USAGE:
    notes-ai-cli <COMMAND> [OPTIONS]

COMMANDS:
    generate                    Run one generation call and print the result as JSON
        --system <text>         System prompt (required)
        --user <text|@file>     User message, or @path to read it from a file (required)
        --model <id>            provider/model identifier
        --schema <file.json>    Schema descriptor; enables structured output
        --temperature <f>       Sampling temperature (0-2)
        --max-tokens <n>        Completion token limit
        --log-usage             Log a usage record through tracing
    check-model <id>            Check a model identifier's format
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    OPENROUTER_API_KEY          API key (required for generate)
    NOTES_AI_BASE_URL           Endpoint base URL
    NOTES_AI_TIMEOUT_MS         Per-attempt deadline
    NOTES_AI_RETRY_ATTEMPTS     Additional attempts after the first
    NOTES_AI_DEFAULT_MODEL      Model used when --model is absent
    NOTES_AI_PROXY_URL          Proxy for all outbound requests
    RUST_LOG                    Log filter (default notes_ai=info)"#
    );
}

fn cmd_version() {
    println!("notes-ai-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// `@path` reads the file, anything else is taken literally.
fn text_or_file(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => Ok(value.to_string()),
    }
}

fn build_request(args: &[String]) -> anyhow::Result<GenerationRequest> {
    let system = flag_value(args, "--system").context("--system is required")?;
    let user = flag_value(args, "--user").context("--user is required")?;
    let mut request = GenerationRequest::new(system, text_or_file(user)?);

    if let Some(model) = flag_value(args, "--model") {
        request = request.with_model(model);
    }
    if let Some(path) = flag_value(args, "--schema") {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let schema: SchemaDescriptor =
            serde_json::from_str(&raw).with_context(|| format!("parsing schema {path}"))?;
        request = request.with_schema(schema);
    }

    let mut params = GenerationParameters::new();
    let mut any_param = false;
    if let Some(t) = flag_value(args, "--temperature") {
        params = params.temperature(t.parse().context("--temperature must be a number")?);
        any_param = true;
    }
    if let Some(n) = flag_value(args, "--max-tokens") {
        params = params.max_tokens(n.parse().context("--max-tokens must be an integer")?);
        any_param = true;
    }
    if any_param {
        request = request.with_parameters(params);
    }
    Ok(request)
}

async fn cmd_generate(args: &[String]) {
    let request = match build_request(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    let client = ClientConfig::from_env().and_then(|config| {
        let mut builder = GenerationClient::builder().from_config(config);
        if has_flag(args, "--log-usage") {
            builder = builder.usage_sink(Arc::new(TracingUsageSink));
        }
        builder.build()
    });
    let client = match client {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", e.code(), e);
            std::process::exit(1);
        }
    };

    let outcome = client.generate(request).await;
    if has_flag(args, "--log-usage") {
        // Usage records are written on detached tasks.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    match outcome {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}: {}", e.code(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_check_model(args: &[String]) {
    let Some(model) = args.first() else {
        eprintln!("Usage: notes-ai-cli check-model <provider/model>");
        std::process::exit(1);
    };
    if notes_ai::client::is_valid_model_name(model) {
        println!("✅ {model}");
    } else {
        println!("❌ {model}: expected provider/model-identifier");
        std::process::exit(1);
    }
}
