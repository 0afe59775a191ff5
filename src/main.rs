use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use contact_restorer::{find_duplicates, parse_contacts, ExportFormat, Session, Settings};

#[derive(Parser)]
#[command(
    name = "contact-restorer",
    about = "Recover contacts from exported HTML and convert them to CSV, vCard or JSON"
)]
struct Cli {
    /// Settings file (default: ./contact_restorer.{toml,json,yaml} if present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the contacts and duplicate phones found in a file
    Parse {
        input: PathBuf,
    },
    /// Resolve duplicates and export
    Convert {
        input: PathBuf,
        /// csv, vcard or json (default from settings)
        #[arg(short, long)]
        format: Option<ExportFormat>,
        /// Output directory (default from settings)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pick the name to keep for each duplicate phone
        #[arg(short, long)]
        interactive: bool,
    },
}

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading settings")?;
    init_tracing(&settings.log_filter);

    match cli.command {
        Commands::Parse { input } => parse(&input),
        Commands::Convert {
            input,
            format,
            out,
            interactive,
        } => convert(
            &input,
            format.unwrap_or(settings.default_format),
            &out.unwrap_or(settings.output_dir),
            interactive,
        ),
    }
}

fn read_input(input: &Path) -> Result<String> {
    std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

fn parse(input: &Path) -> Result<()> {
    let html = read_input(input)?;
    let contacts = parse_contacts(&html);
    let duplicates = find_duplicates(&contacts);

    println!("{} contacts", contacts.len());
    for group in &duplicates {
        println!("\n{} is shared by:", group.phone);
        for contact in &group.contacts {
            println!("  - {}", contact.name);
        }
    }

    Ok(())
}

fn convert(input: &Path, format: ExportFormat, out_dir: &Path, interactive: bool) -> Result<()> {
    let html = read_input(input)?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = Session::new();
    let count = session.load(&file_name, &html)?;
    println!("Loaded {} contacts from {}", count, file_name);

    if !session.duplicates().is_empty() {
        if interactive {
            resolve_interactively(&mut session)?;
        }
        let merged = session.complete_merge()?;
        println!("Merged duplicates, {} unique contacts", merged);
    }

    let export = session.export(format, chrono::Utc::now().date_naive())?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(&export.file_name);
    std::fs::write(&path, export.content.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), mime = export.mime_type, "export written");
    println!("Saved {}", path.display());
    Ok(())
}

/// Prompt for a name per duplicate group; an empty answer keeps the default
fn resolve_interactively(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let groups = session.duplicates().to_vec();
    for group in &groups {
        let names = group.names();
        let current = session.selections().get(&group.phone).unwrap_or_default().to_string();

        println!("\n{} is shared by:", group.phone);
        for (i, name) in names.iter().enumerate() {
            let marker = if *name == current { "*" } else { " " };
            println!(" {} {}) {}", marker, i + 1, name);
        }

        loop {
            print!("Keep which name? [Enter = *] ");
            io::stdout().flush()?;

            let Some(answer) = lines.next().transpose()? else {
                return Ok(());
            };
            let answer = answer.trim();
            if answer.is_empty() {
                break;
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=names.len()).contains(&n) => {
                    session.select(&group.phone, names[n - 1])?;
                    break;
                }
                _ => println!("Enter a number between 1 and {}", names.len()),
            }
        }
    }

    Ok(())
}
