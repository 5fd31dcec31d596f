//! Command-line entry point for the editorial core.
//!
//! # Responsibility
//! - Expose publication use-cases as subcommands over a local SQLite file.
//! - Print one JSON envelope per invocation: `{ok, code, message, data}`.
//!
//! # Invariants
//! - Domain failures are reported in the envelope, never as panics.
//! - Exit status is non-zero whenever `ok` is false.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use editorial_core::db::open_db;
use editorial_core::{
    init_logging, parse_status, AnyAuthorDirectory, AuthorDirectory, AuthorLookupError,
    CreatePublicationRequest, PageRequest, PublicationService, PublicationServiceError,
    PublicationStatus, SqlitePublicationRepository, StaticAuthorDirectory, TransitionPolicy,
    UpdateStatusRequest, WorkflowConfig,
};
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "editorial", version, about = "Editorial publication lifecycle console")]
struct Cli {
    /// SQLite database file.
    #[arg(long, default_value = "editorial.sqlite3")]
    db: PathBuf,

    /// Enforce the ordered editorial lifecycle.
    #[arg(long)]
    strict_workflow: bool,

    /// JSON workflow config file (`{"strictWorkflow": true}`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Known author ids; when omitted every author id is accepted.
    #[arg(long = "author", value_name = "AUTHOR_ID")]
    authors: Vec<i64>,

    #[arg(long, default_value_t = editorial_core::default_log_level().to_string())]
    log_level: String,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a draft publication.
    Create(CreateArgs),
    /// Show one publication.
    Show {
        id: Uuid,
        /// Count this read as a view.
        #[arg(long)]
        count_view: bool,
    },
    /// List publications, optionally filtered by status and author.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        author_id: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Search titles and descriptions.
    Search {
        keyword: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Move a publication to another status.
    Transition {
        id: Uuid,
        status: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        rejection_reason: Option<String>,
    },
    /// Soft-delete a publication.
    Delete { id: Uuid },
    /// Count active publications.
    Stats {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        author_id: Option<i64>,
    },
    /// Print the active transition table.
    Policy,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    author_id: i64,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    keywords: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    language: Option<String>,
}

#[derive(Debug, Args)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long)]
    size: Option<u32>,
}

impl From<PageArgs> for PageRequest {
    fn from(value: PageArgs) -> Self {
        PageRequest {
            page: value.page,
            size: value.size,
        }
    }
}

#[derive(Debug, Serialize)]
struct Envelope {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl Envelope {
    fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            ok: true,
            code: None,
            message: message.into(),
            data: Some(data),
        }
    }

    fn failure(err: &PublicationServiceError) -> Self {
        Self {
            ok: false,
            code: Some(err.code()),
            message: err.to_string(),
            data: None,
        }
    }
}

/// Author directory selected by `--author` flags.
enum CliAuthors {
    Any(AnyAuthorDirectory),
    Known(StaticAuthorDirectory),
}

impl AuthorDirectory for CliAuthors {
    fn author_exists(&self, author_id: i64) -> Result<bool, AuthorLookupError> {
        match self {
            Self::Any(directory) => directory.author_exists(author_id),
            Self::Known(directory) => directory.author_exists(author_id),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(envelope) => {
            let ok = envelope.ok;
            match serde_json::to_string_pretty(&envelope) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => {
                    eprintln!("failed to render response: {err}");
                    return ExitCode::FAILURE;
                }
            }
            if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Envelope> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir).context("failed to initialize logging")?;
    }

    let mut config = match &cli.config {
        Some(path) => WorkflowConfig::from_json_file(path)?,
        None => WorkflowConfig::default(),
    };
    config.strict_workflow |= cli.strict_workflow;
    info!(
        "event=cli_start module=cli status=ok strict_workflow={} db={}",
        config.strict_workflow,
        cli.db.display()
    );

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let repo = SqlitePublicationRepository::try_new(&conn)?;
    let authors = if cli.authors.is_empty() {
        CliAuthors::Any(AnyAuthorDirectory)
    } else {
        CliAuthors::Known(StaticAuthorDirectory::new(cli.authors.iter().copied()))
    };
    let service = PublicationService::new(repo, authors, config);

    let envelope = match execute(&service, &config, cli.command) {
        Ok(envelope) => envelope,
        Err(err) if err.is_client_error() => Envelope::failure(&err),
        Err(err) => return Err(err.into()),
    };
    Ok(envelope)
}

fn execute(
    service: &PublicationService<SqlitePublicationRepository<'_>, CliAuthors>,
    config: &WorkflowConfig,
    command: Command,
) -> Result<Envelope, PublicationServiceError> {
    match command {
        Command::Create(args) => {
            let request = CreatePublicationRequest {
                title: args.title,
                description: args.description,
                content: args.content,
                author_id: args.author_id,
                keywords: args.keywords,
                category: args.category,
                language: args.language,
            };
            let created = service.create_publication(&request)?;
            Ok(Envelope::success("publication created", to_value(&created)))
        }
        Command::Show { id, count_view } => {
            let publication = if count_view {
                service.view_publication(id)?
            } else {
                service.get_publication(id)?
            };
            let summary = publication.summary();
            Ok(Envelope::success(summary, to_value(&publication)))
        }
        Command::List {
            status,
            author_id,
            page,
        } => {
            let page = PageRequest::from(page);
            let result = match (status.as_deref().map(parse_status).transpose()?, author_id) {
                (Some(status), Some(author_id)) => {
                    service.list_by_author_and_status(author_id, status, page)?
                }
                (Some(status), None) => service.list_by_status(status, page)?,
                (None, Some(author_id)) => service.list_by_author(author_id, page)?,
                (None, None) => service.list_publications(page)?,
            };
            let message = format!("{} of {} publications", result.items.len(), result.total_items);
            Ok(Envelope::success(message, to_value(&result)))
        }
        Command::Search { keyword, page } => {
            let result = service.search_publications(&keyword, page.into())?;
            let message = format!("{} matches", result.total_items);
            Ok(Envelope::success(message, to_value(&result)))
        }
        Command::Transition {
            id,
            status,
            notes,
            rejection_reason,
        } => {
            let request = UpdateStatusRequest {
                status: parse_status(&status)?,
                reviewer_notes: notes,
                rejection_reason,
            };
            let updated = service.update_status(id, &request)?;
            let message = format!("publication moved to {}", updated.status);
            Ok(Envelope::success(message, to_value(&updated)))
        }
        Command::Delete { id } => {
            service.delete_publication(id)?;
            Ok(Envelope::success("publication deleted", json!({ "id": id })))
        }
        Command::Stats { status, author_id } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let total = match (status, author_id) {
                (Some(status), Some(author_id)) => {
                    service.total_by_author_and_status(author_id, status)?
                }
                (Some(status), None) => service.total_by_status(status)?,
                (None, Some(author_id)) => service.total_by_author(author_id)?,
                (None, None) => service.total_publications()?,
            };
            Ok(Envelope::success(
                format!("{total} publications"),
                json!({ "total": total }),
            ))
        }
        Command::Policy => Ok(policy_envelope(config)),
    }
}

fn policy_envelope(config: &WorkflowConfig) -> Envelope {
    let policy = TransitionPolicy::from_config(config);
    let transitions = PublicationStatus::ALL
        .into_iter()
        .map(|from| {
            let targets = policy
                .allowed_targets(from)
                .into_iter()
                .map(PublicationStatus::as_str)
                .collect::<Vec<_>>();
            (from.as_str().to_string(), json!(targets))
        })
        .collect::<serde_json::Map<_, _>>();
    let mode = if config.strict_workflow {
        "strict"
    } else {
        "permissive"
    };
    Envelope::success(
        format!("{mode} workflow"),
        json!({ "strictWorkflow": config.strict_workflow, "transitions": transitions }),
    )
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
