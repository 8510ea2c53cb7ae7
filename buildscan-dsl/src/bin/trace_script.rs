/// Build Script Tracer - Shows the flow through Tokens → Tree → Model
///
/// Usage: cargo run --bin trace_script <build.gradle.kts> [extractor.toml]
///
/// Set `RUST_LOG=buildscan_dsl=debug` to see extractor events.
use buildscan_core::ExtractorConfig;
use buildscan_dsl::{pretty_print, Extractor, Lexer, Parser, TokenKind};
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin trace_script <build.gradle.kts> [extractor.toml]");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --bin trace_script app/build.gradle.kts");
        std::process::exit(1);
    }

    let script_path = &args[1];

    println!("╔═══════════════════════════════════════════════════════════════");
    println!("║ BUILD SCRIPT TRACER");
    println!("╚═══════════════════════════════════════════════════════════════\n");

    let source = match fs::read_to_string(script_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", script_path, e);
            std::process::exit(1);
        }
    };

    let config = match args.get(2) {
        Some(config_path) => match fs::read_to_string(config_path)
            .map_err(|e| e.to_string())
            .and_then(|doc| ExtractorConfig::from_toml_str(&doc).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load {}: {}", config_path, e);
                std::process::exit(1);
            }
        },
        None => ExtractorConfig::default(),
    };

    // Step 1: tokens
    println!("🔍 TOKENS:");
    println!("─────────────────────────────────────────────────────────────");
    let mut tokens = Vec::new();
    for result in Lexer::new(&source) {
        match result {
            Ok(token) => {
                if token.kind != TokenKind::Newline {
                    println!("  {:>4}:{:<3} {:?}", token.span.line, token.span.column, token.kind);
                }
                tokens.push(token);
            }
            Err(e) => {
                eprintln!("❌ Lex error: {}", e);
                std::process::exit(1);
            }
        }
    }
    println!();

    // Step 2: tree
    println!("🌳 CANONICAL TREE:");
    println!("─────────────────────────────────────────────────────────────");
    match Parser::new(tokens).parse() {
        Ok(script) => println!("{}", pretty_print(&script)),
        Err(e) => {
            eprintln!("❌ Syntax error: {}", e);
            std::process::exit(1);
        }
    }

    // Step 3: model
    println!("📦 EXTRACTION REPORT:");
    println!("─────────────────────────────────────────────────────────────");
    let extractor = match Extractor::new(config) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    match extractor.extract(&source) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                println!("⚠️  {}", diagnostic);
            }
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("❌ Failed to serialize report: {}", e),
            }
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
