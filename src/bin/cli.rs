use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::prelude::*;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing::subscriber as tracing_subscriber_global;
use anyhow::{Result, Context};
use music_file_naming as lib;
use lib::config::Config;
use lib::models::Album;
use lib::naming::Namer;

#[derive(Parser)]
#[command(name = "music-naming", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single template
    Render {
        /// Template text, e.g. '$num(%TRACK%,2) %TITLE%'
        template: String,

        /// Placeholder value, repeatable: --set TITLE='When we return'
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// JSON or TOML file with placeholder values (--set wins on conflicts)
        #[arg(long, value_name = "FILE")]
        metadata: Option<PathBuf>,
    },
    /// Print every target path for an album description
    Plan {
        /// JSON or TOML album file
        album: PathBuf,

        /// File extension of the audio files
        #[arg(long, default_value = ".flac")]
        file_type: String,
    },
    /// Validate config file templates and exit
    ConfigValidate,
    /// List the built-in template functions
    Functions,
}

fn init_logging(cfg: &Config) -> Option<WorkerGuard> {
    let _ = LogTracer::init();

    // Honor RUST_LOG if set, otherwise default to warn. Stdout carries the
    // rendered names, so log lines go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(lib::config::DEFAULT_LOG_FILTER));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &cfg.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "music-naming.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer);

    if let Err(e) = tracing_subscriber_global::set_global_default(subscriber) {
        eprintln!("failed to set global tracing subscriber: {}", e);
    }
    guard
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load(cli.config.as_deref())
        .with_context(|| "loading config".to_string())?;
    let _guard = init_logging(&cfg);

    match cli.command {
        Commands::Render { template, set, metadata } => {
            let mut values: HashMap<String, String> = match &metadata {
                Some(p) => lib::util::load_metadata(p)?,
                None => HashMap::new(),
            };
            for s in &set {
                let (k, v) = lib::util::parse_assignment(s)?;
                values.insert(k, v);
            }
            let eval = lib::evaluate_with_diagnostics(&template, &values)
                .with_context(|| format!("evaluating template '{}'", template))?;
            for d in &eval.diagnostics {
                eprintln!("warning: {}", d);
            }
            println!("{}", eval.output);
        }
        Commands::Plan { album, file_type } => {
            let album: Album = lib::util::read_data_file(&album)?;
            let namer = Namer::new(&cfg.file_formatting, &cfg.details);
            let plan = namer.plan(&album, &file_type)
                .with_context(|| format!("naming release {}", album.id))?;
            println!("{}", plan.album_dir.display());
            for t in &plan.tracks {
                println!("{}", plan.album_dir.join(&t.relative_path).display());
            }
            println!("{}", plan.album_dir.join(&plan.m3u).display());
            println!("{}", plan.album_dir.join(&plan.nfo).display());
            for image in &plan.images {
                println!("{}", plan.album_dir.join(image).display());
            }
        }
        Commands::ConfigValidate => {
            let mut failed = false;
            for (name, template) in cfg.file_formatting.templates() {
                match lib::formatting::validate(template) {
                    Ok(eval) if eval.is_clean() => {}
                    Ok(eval) => {
                        failed = true;
                        for d in &eval.diagnostics {
                            eprintln!("{}: {}", name, d);
                        }
                    }
                    Err(e) => {
                        failed = true;
                        eprintln!("{}: {}", name, e);
                    }
                }
            }
            if failed {
                eprintln!("Config validation failed");
                std::process::exit(2);
            }
            println!("OK");
        }
        Commands::Functions => {
            for name in lib::formatting::functions::names() {
                if let Some(f) = lib::formatting::functions::lookup(name) {
                    println!("${} ({} args)", f.name, f.arity());
                }
            }
        }
    }

    Ok(())
}
