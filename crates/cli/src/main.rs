//! Reunite command-line client entry point.

mod args;
mod render;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Command, SubmitArgs};
use render::{print_dashboard, print_page, print_record};
use reunite_client::{
    ApiClient, DASHBOARD_PAGE_SIZE, DraftReport, FilterCriteria, HttpTransport, LoginInput,
    PhotoAttachment, QueryController, RECENT_REPORTS_CAP, RegisterInput, ReportUpdate, Submission,
    partition_reports,
};
use reunite_common::{Config, FileSessionStore, SessionGuard, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // User-facing output goes to stdout, logs to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reunite=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let store: Box<dyn SessionStore> = match config.session.file.clone() {
        Some(path) => Box::new(FileSessionStore::new(path)),
        None => Box::new(FileSessionStore::default_location()?),
    };
    let guard = Arc::new(SessionGuard::new(store).await?);
    let transport = Arc::new(HttpTransport::from_config(&config.api, Arc::clone(&guard))?);
    let client = ApiClient::new(transport, guard);

    run(cli.command, &client).await
}

async fn run(command: Command, client: &ApiClient) -> Result<()> {
    match command {
        Command::Register {
            username,
            email,
            password,
            phone,
        } => {
            let session = client
                .register(RegisterInput {
                    username,
                    email,
                    password,
                    phone,
                })
                .await?;
            println!("Registered and signed in as {}", session.user.username);
        }

        Command::Login { username, password } => {
            let session = client.login(LoginInput { username, password }).await?;
            println!("Signed in as {}", session.user.username);
        }

        Command::Logout => {
            client.logout().await;
            println!("Signed out.");
        }

        Command::Whoami => {
            require_credential(client).await?;
            let user = client.current_user().await?;
            println!("{} <{}>", user.username, user.email);
        }

        Command::Submit(args) => submit(client, args).await?,

        Command::Search {
            query,
            gender,
            status,
            page,
            per_page,
        } => {
            let mut criteria = FilterCriteria {
                search: query,
                gender,
                ..FilterCriteria::default()
            };
            if let Some(status) = status {
                criteria.status = status;
            }
            if let Some(page) = page {
                criteria.page = page;
            }
            if let Some(per_page) = per_page {
                criteria.per_page = per_page;
            }

            let mut controller = QueryController::new(criteria);
            controller.refresh(client).await?;
            if let Some(result) = controller.last_page() {
                print_page(result);
            }
        }

        Command::Show { id } => {
            let record = client.get_report(id).await?;
            print_record(&record);
        }

        Command::Status { id, status } => {
            require_credential(client).await?;
            let update = ReportUpdate {
                status: Some(status),
                ..ReportUpdate::default()
            };
            let record = client.update_report(id, update).await?;
            println!("Report #{} is now {}", record.id, record.status);
        }

        Command::Delete { id, yes } => {
            require_credential(client).await?;
            if !yes && !confirm(&format!("Delete report #{id}?"))? {
                println!("Aborted.");
                return Ok(());
            }
            client.delete_report(id).await?;
            println!("Report #{id} deleted.");
        }

        Command::Dashboard => {
            require_credential(client).await?;
            let user = client.current_user().await?;

            let mut controller = QueryController::new(FilterCriteria {
                per_page: DASHBOARD_PAGE_SIZE,
                ..FilterCriteria::default()
            });
            controller.refresh(client).await?;

            let grouped = partition_reports(controller.results(), user.id, RECENT_REPORTS_CAP);
            print_dashboard(&grouped);
        }
    }

    Ok(())
}

/// File a report from command-line arguments.
async fn submit(client: &ApiClient, args: SubmitArgs) -> Result<()> {
    require_credential(client).await?;

    let mut draft = DraftReport::new();
    draft.full_name = args.full_name;
    draft.age = args.age;
    draft.gender = args.gender;
    draft.height = args.height;
    draft.weight = args.weight;
    draft.hair_color = args.hair_color;
    draft.eye_color = args.eye_color;
    draft.last_seen_location = args.last_seen_location;
    draft.last_seen_date = args.last_seen_date;
    draft.description = args.description;

    for (index, arg) in args.relatives.into_iter().enumerate() {
        if index > 0 {
            draft.add_relative();
        }
        if let Some(slot) = draft.relative_mut(index) {
            slot.name = arg.name;
            slot.relationship = arg.relationship;
            slot.phone = arg.phone;
            slot.email = arg.email;
            slot.address = arg.address;
        }
    }

    for path in &args.photos {
        let photo = PhotoAttachment::from_path(path).await?;
        draft.add_photo(photo);
    }

    let mut submission = Submission::new(draft);
    let record = submission.submit(client).await?;
    println!("Report #{} filed for {}", record.id, record.full_name);
    Ok(())
}

/// Refuse to proceed without a stored credential.
async fn require_credential(client: &ApiClient) -> Result<()> {
    anyhow::ensure!(
        client.guard().has_credential().await,
        "Not signed in. Run `reunite login` first."
    );
    Ok(())
}

/// Ask for confirmation on stdin.
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;

    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
