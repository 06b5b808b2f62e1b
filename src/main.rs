use std::path::PathBuf;

use clap::{Parser, Subcommand};
use course_mark::{
    audit::{self, AuditConfig},
    config::Config,
    error::Result,
    migrate::Migrator,
    render::{MarkdownRenderer, RenderContext, Renderer},
    renumber::{self, Outcome},
    sync::{self, SyncConfig, SyncOutcome},
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Migrate and maintain course content for the CMS")]
struct Cli {
    /// Project root, where content.toml lives.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log everything.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Convert the legacy course catalogue into author, learning path and course documents.
    Migrate {
        /// Also render every course to markdown.
        #[arg(long)]
        markdown: bool,
    },
    /// Render the course documents on disk to front-matter markdown.
    Render,
    /// Shift the second lesson numbered NUMBER and every later lesson up by one.
    Renumber { section: PathBuf, number: u64 },
    /// Copy changed lesson markdown into the course documents.
    Sync {
        /// Changed files relative to the root. Defaults to the output of the configured command.
        files: Vec<PathBuf>,
    },
    /// Check lesson directories for missing captions and markdown.
    Audit {
        #[arg(required = true)]
        courses: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::TRACE
    } else if cli.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let config = Config::load_or_default(&cli.root)?;

    match cli.command {
        Cmd::Migrate { markdown } => {
            let mut migrator = Migrator::load_with_config(&cli.root, config);
            if markdown {
                migrator.with_renderer(MarkdownRenderer::new());
            }

            let report = migrator.run()?;
            for skipped in &report.skipped {
                tracing::warn!("Skipped {skipped}");
            }
        }
        Cmd::Render => {
            let ctx = RenderContext::load(&cli.root, config)?;
            let report = MarkdownRenderer::new().render(&ctx)?;
            tracing::info!(
                "Rendered {} courses, {} failed",
                report.written.len(),
                report.failed.len()
            );
        }
        Cmd::Renumber { section, number } => {
            let section = cli.root.join(section);
            if let Outcome::Renamed(renamed) = renumber::renumber(&section, number)? {
                tracing::info!("Renamed {} lessons", renamed.len());
            }
        }
        Cmd::Sync { files } => {
            let files = if files.is_empty() {
                let sync_config: SyncConfig = config.get("sync")?;
                sync::changed_files(&cli.root, &sync_config.changed_files_command)?
            } else {
                files
            };

            let outcomes = sync::sync_files(&cli.root, &config, &files);
            let updated = outcomes
                .iter()
                .filter(|outcome| matches!(outcome, SyncOutcome::Updated { .. }))
                .count();
            tracing::info!("Updated {updated} of {} lesson files", outcomes.len());
        }
        Cmd::Audit { courses } => {
            let audit_config: AuditConfig = config.get("audit")?;
            let mut audits = Vec::new();

            for course in &courses {
                if let Err(err) = audit::prepare_course(&cli.root, &audit_config, course) {
                    tracing::error!("{err:#}");
                    continue;
                }

                match audit::audit_course(&cli.root, &config.content, &audit_config, course) {
                    Ok(audit) => audits.push(audit),
                    Err(err) => tracing::error!("{err:#}"),
                }
            }

            audit::append_report(&cli.root.join(&audit_config.report), &audits)?;
        }
    }

    Ok(())
}
