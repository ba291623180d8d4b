use anyhow::{Context, Result, anyhow, bail};
use chrono::Datelike;
use clap::Parser;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::str::FromStr;
use syllabai::cli::{Cli, Command, CompareArgs, ConfigCommand, OutputFormat, SectionsArgs};
use syllabai::client::BackendClient;
use syllabai::config::Config;
use syllabai::context::{AppContext, StandardContext};
use syllabai::export::{EXPORT_ERROR_MESSAGE, ExportOptions, export_to_file};
use syllabai::format::render_text_comparison;
use syllabai::model::{NamedSyllabus, Section};
use syllabai::session::{
    RATE_LIMIT_BANNER, SectionSelection, SyllabusSelections, UploadSession,
};
use syllabai::storage::LocalStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = TermLogger::init(
        cli.log_level(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let ctx = StandardContext::new(cli.root.clone());
    match &cli.command {
        Command::Config(cmd) => run_config(cmd, &ctx),
        Command::Sections(args) => {
            let config = load_config(&cli, &ctx)?;
            run_sections(&cli, args, &config).await
        }
        Command::Compare(args) => {
            let config = load_config(&cli, &ctx)?;
            run_compare(&cli, args, &config).await
        }
    }
}

fn load_config(cli: &Cli, ctx: &dyn AppContext) -> Result<Config> {
    let mut config = Config::load_or_default(ctx)?.with_process_env();
    if let Some(url) = cli.backend_url.as_deref().filter(|u| !u.trim().is_empty()) {
        config.backend_url = url.trim().to_string();
    }
    Ok(config)
}

fn run_config(cmd: &ConfigCommand, ctx: &dyn AppContext) -> Result<()> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", Config::get_path_string(ctx)?);
        }
        ConfigCommand::Init { force } => {
            let path = ctx.get_config_file_path()?;
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(ctx)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Uploads (or loads) every file, reports per-file status on stderr and
/// returns the successfully parsed syllabuses.
async fn collect(cli: &Cli, files: &[PathBuf], config: &Config) -> Result<Vec<NamedSyllabus>> {
    let mut session = UploadSession::new();
    if cli.from_json {
        session.load_analyzed(files).await;
    } else {
        let client = BackendClient::from_config(config)?;
        log::info!("Using backend {}", client.base_url());
        session
            .upload(&client, files, config.upload_concurrency())
            .await;
    }

    if session.is_rate_limited() {
        eprintln!("{}", RATE_LIMIT_BANNER);
    }
    for file in session.files() {
        match file.error() {
            Some(message) if file.is_local_failure() => eprintln!("  skipped {}", message),
            Some(message) => eprintln!("  x {}", message),
            None => eprintln!("  ok {}", file.name),
        }
    }

    let syllabuses = session.syllabuses();
    if syllabuses.is_empty() {
        bail!("None of the files could be processed");
    }
    Ok(syllabuses)
}

async fn run_sections(cli: &Cli, args: &SectionsArgs, config: &Config) -> Result<()> {
    let syllabuses = collect(cli, &args.files, config).await?;
    let selections = SyllabusSelections::from_syllabuses(&syllabuses);
    let common = selections.common_sections();

    if args.json {
        let report = serde_json::json!({
            "files": selections.to_matrix(),
            "common": common.iter().map(Section::key).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if common.is_empty() {
        println!("No sections are shared by every file.");
        return Ok(());
    }
    println!("Common sections:");
    for section in &common {
        println!("  {:<20} {}", section.key(), section.display_name());
    }
    Ok(())
}

async fn run_compare(cli: &Cli, args: &CompareArgs, config: &Config) -> Result<()> {
    let syllabuses = collect(cli, &args.files, config).await?;
    let common = SyllabusSelections::from_syllabuses(&syllabuses).common_sections();

    let selection = if args.sections.is_empty() {
        SectionSelection::from_sections(common.iter().cloned())
    } else {
        SectionSelection::from_sections(args.sections.iter().filter_map(|s| Section::from_str(s).ok()))
    };
    if selection.is_empty() {
        bail!("Please select at least one section to compare.");
    }
    let missing = selection.missing_from(&common);
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(Section::display_name).collect();
        bail!("Not every file has these sections: {}", names.join(", "));
    }

    let year = args.year.unwrap_or_else(|| chrono::Local::now().year());
    match args.format {
        OutputFormat::Text => {
            let text = render_text_comparison(&syllabuses, &selection.ordered());
            match &args.output {
                Some(path) => LocalStorage::atomic_write(path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", text),
            }
        }
        OutputFormat::Pdf => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.output_file));
            let options = ExportOptions::from_config(config, year);
            export_to_file(&path, &syllabuses, &selection, &options).map_err(|e| {
                log::error!("Error exporting PDF: {:#}", e);
                anyhow!(EXPORT_ERROR_MESSAGE)
            })?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}
