mod display;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use enrollment_client::config::{DEFAULT_API_URL, DEFAULT_UPLOADS_URL};
use enrollment_client::{
    ClientConfig, DeleteScreen, EditScreen, EnrollScreen, HttpTransport, ListScreen, RetryPolicy,
    StudentService, ViewScreen,
};
use enrollment_core::{EnrollmentWizard, FieldPath, FlowError, FormModel, Step, set_path};
use serde_json::Value;
use tracing::Level;

#[derive(Parser)]
#[command(name = "enroll", version, about = "Student enrollment client")]
struct Cli {
    /// Base URL of the student REST API.
    #[arg(long, env = "ENROLLMENT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Prefix for stored photo and document paths.
    #[arg(long, env = "ENROLLMENT_UPLOADS_URL", default_value = DEFAULT_UPLOADS_URL, global = true)]
    uploads_url: String,

    #[arg(long, env = "ENROLLMENT_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Attempts for idempotent requests that fail at the transport level.
    #[arg(long, env = "ENROLLMENT_RETRY_ATTEMPTS", default_value_t = 3, global = true)]
    retry_attempts: u32,

    #[arg(long, env = "ENROLLMENT_RETRY_DELAY_MS", default_value_t = 1000, global = true)]
    retry_delay_ms: u64,

    /// Accept self-signed TLS certificates.
    #[arg(long, env = "ENROLLMENT_INSECURE", global = true)]
    insecure: bool,

    /// Log requests and mapping decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all students.
    List,

    /// Show one student by internal id or PID.
    View { id: String },

    /// Delete a student after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Load a student into the form, change fields and save the full record.
    Edit {
        id: String,
        /// Form field assignment, e.g. `personalDetails.email=a@b.co`.
        #[arg(long = "set", value_name = "PATH=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Send a partial update of backend record fields.
    Patch {
        id: String,
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Walk the enrollment wizard and submit a new student.
    Enroll {
        /// JSON form to start from (see `template`).
        #[arg(long)]
        form: Option<PathBuf>,
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,
    },

    /// Print an empty enrollment form as JSON.
    Template,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = ClientConfig {
        api_base_url: cli.api_url.clone(),
        uploads_base_url: cli.uploads_url.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
        retry: RetryPolicy {
            max_attempts: cli.retry_attempts,
            delay: Duration::from_millis(cli.retry_delay_ms),
        },
        accept_invalid_certs: cli.insecure,
    };

    let service = StudentService::new(HttpTransport::new(&config)?);
    run(cli.command, &service, &config).await
}

async fn run(
    command: Command,
    service: &StudentService<HttpTransport>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let mut screen = ListScreen::default();
            screen.load(service).await;
            if let Some(error) = screen.status.error {
                bail!(error);
            }
            display::print_student_table(&screen.students);
        }

        Command::View { id } => {
            let mut screen = ViewScreen::new(config.uploads_base_url.clone());
            screen.search(service, &id).await;
            if let Some(error) = screen.status.error {
                bail!(error);
            }
            if let Some(record) = &screen.record {
                let form = enrollment_core::from_backend_record(record);
                display::print_student_card(record, &form, &screen.attachments);
            }
        }

        Command::Delete { id, yes } => {
            let mut screen = DeleteScreen::default();
            screen.search(service, &id).await;
            if let Some(error) = screen.status.error {
                bail!(error);
            }
            let name = screen
                .record
                .as_ref()
                .map(enrollment_client::StudentSummary::from_record)
                .map(|s| s.name)
                .unwrap_or_default();
            screen.request_delete();
            if !yes && !confirm(&format!("Delete student {id} ({name})?"))? {
                screen.cancel();
                println!("Cancelled");
                return Ok(());
            }
            screen.confirm_delete(service).await;
            if let Some(error) = screen.status.error {
                bail!(error);
            }
            println!("{}", screen.status.success.unwrap_or_default());
        }

        Command::Edit { id, set } => {
            let mut screen = EditScreen::default();
            screen.search(service, &id).await;
            if let Some(error) = screen.status.error {
                bail!(error);
            }
            for raw in &set {
                let (path, value) = parse_assignment(raw)?;
                screen
                    .set_field(&path, value)
                    .with_context(|| format!("cannot set `{path}`"))?;
            }
            screen.save(service).await;
            if let Some(error) = screen.status.error {
                bail!(error);
            }
            println!("{}", screen.status.success.unwrap_or_default());
        }

        Command::Patch { id, set } => {
            let changes = partial_changes(&set)?;
            let response = service.update_student_partial(&id, &changes).await;
            if !response.success {
                bail!(response.summary().to_string());
            }
            println!("{}", response.summary());
        }

        Command::Enroll { form, set } => {
            let mut form = match form {
                Some(path) => load_form(&path)?,
                None => FormModel::default(),
            };
            for raw in &set {
                let (path, value) = parse_assignment(raw)?;
                let path = FieldPath::parse(&path)?;
                form = form.set(&path, value)?;
            }

            let mut screen = EnrollScreen::new(EnrollmentWizard::with_form(form));
            walk_to_declaration(&mut screen.wizard)?;
            let response = match screen.submit(service).await {
                Ok(response) => response,
                Err(FlowError::FormInvalid(errors)) => {
                    display::print_field_errors(&errors);
                    bail!("form has {} validation error(s)", errors.len());
                }
                Err(err) => return Err(err.into()),
            };
            if !response.success {
                bail!(response.summary().to_string());
            }
            println!("{}", response.summary());
        }

        Command::Template => {
            println!("{}", serde_json::to_string_pretty(&FormModel::default())?);
        }
    }
    Ok(())
}

/// Advance through every step before the declaration, stopping at the first invalid one.
fn walk_to_declaration(wizard: &mut EnrollmentWizard) -> anyhow::Result<()> {
    while wizard.step() != Step::LAST {
        let step = wizard.step();
        match wizard.next() {
            Ok(_) => println!("  ok  {step}"),
            Err(FlowError::Invalid { step, errors }) => {
                eprintln!("  --  {step}");
                display::print_field_errors(&errors);
                bail!("{step} has {} validation error(s)", errors.len());
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

// ── Argument parsing ──

/// `true`/`false` become booleans, `[...]` and `{...}` are parsed as JSON, anything else is text.
fn parse_cli_value(raw: &str) -> anyhow::Result<Value> {
    let trimmed = raw.trim();
    match trimmed {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ if trimmed.starts_with('[') || trimmed.starts_with('{') => {
            serde_json::from_str(trimmed).with_context(|| format!("invalid JSON value: {trimmed}"))
        }
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn parse_assignment(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((path, value)) = raw.split_once('=') else {
        bail!("expected PATH=VALUE, got `{raw}`");
    };
    let path = path.trim();
    if path.is_empty() {
        bail!("missing field path in `{raw}`");
    }
    Ok((path.to_string(), parse_cli_value(value)?))
}

fn partial_changes(assignments: &[String]) -> anyhow::Result<Value> {
    let mut changes = Value::Object(Default::default());
    for raw in assignments {
        let (path, value) = parse_assignment(raw)?;
        let path = FieldPath::parse(&path)?;
        changes = set_path(&changes, &path, value);
    }
    Ok(changes)
}

fn load_form(path: &Path) -> anyhow::Result<FormModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    FormModel::from_json(&text).with_context(|| format!("invalid form in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cli_values() {
        assert_eq!(parse_cli_value("true").unwrap(), json!(true));
        assert_eq!(parse_cli_value("[\"Music\",\"Art\"]").unwrap(), json!(["Music", "Art"]));
        assert_eq!(parse_cli_value("{\"a\":1}").unwrap(), json!({"a": 1}));
        assert_eq!(parse_cli_value("9841000000").unwrap(), json!("9841000000"));
        assert!(parse_cli_value("[broken").is_err());
    }

    #[test]
    fn assignments() {
        let (path, value) = parse_assignment("personalDetails.email=a=b@c.co").unwrap();
        assert_eq!(path, "personalDetails.email");
        assert_eq!(value, json!("a=b@c.co"));
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn partial_changes_nest_paths() {
        let changes = partial_changes(&[
            "email=new@example.com".to_string(),
            "contactDetail.primaryMobile=9800000000".to_string(),
        ])
        .unwrap();
        assert_eq!(
            changes,
            json!({
                "email": "new@example.com",
                "contactDetail": {"primaryMobile": "9800000000"}
            })
        );
    }

    #[test]
    fn form_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"personalDetails": {{"firstName": "Sita"}}, "declaration": {{"place": "Kathmandu"}}}}"#
        )
        .unwrap();
        let form = load_form(file.path()).unwrap();
        assert_eq!(form.personal_details.first_name, "Sita");
        assert_eq!(form.declaration.place, "Kathmandu");

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{"personalDetails": {{"nickname": "x"}}}}"#).unwrap();
        assert!(load_form(bad.path()).is_err());
    }

    #[test]
    fn empty_form_stops_at_first_step() {
        let mut wizard = EnrollmentWizard::new();
        assert!(walk_to_declaration(&mut wizard).is_err());
        assert_eq!(wizard.step(), Step::Personal);
        assert!(!wizard.errors().is_empty());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["enroll", "--api-url", "http://x/api", "view", "P042"]).unwrap();
        assert_eq!(cli.api_url, "http://x/api");
        assert!(matches!(cli.command, Command::View { ref id } if id == "P042"));

        assert!(Cli::try_parse_from(["enroll", "edit", "42"]).is_err());
    }
}
