//! bloody-cli: command-line front end for the blood donation client.
//!
//! Every command opens a page or runs a page action, prints the resulting
//! view, and follows its redirect (after the configured delay).

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use bloody_client::api::{Credentials, FormFields, UserStatus};
use bloody_client::config::validation::validate_config;
use bloody_client::config::{load_or_default, ConfigError};
use bloody_client::gateway::Method;
use bloody_client::observability::logging::init_logging;
use bloody_client::pages::{AdminTab, App, History, Page, PageView};

#[derive(Parser)]
#[command(name = "bloody-cli")]
#[command(about = "Command-line client for the blood donation platform", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Follow redirects immediately
    #[arg(long, global = true)]
    no_wait: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page (index, login, register, contact, faq, profile, admin, workspace)
    Open {
        page: Page,
        /// Admin dashboard tab (estadisticas, gestion-usuarios, mensajes)
        #[arg(long)]
        tab: Option<AdminTab>,
    },
    /// Log in and store the session identity
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Keep the session across runs. Without it the session only lasts
        /// for this run, unless `session.tab_scoped_path` is configured.
        #[arg(long)]
        remember: bool,
    },
    /// Clear the stored session identity
    Logout,
    /// Show the current session identity
    Whoami,
    /// Register a new account
    Register {
        /// Form field as key=value (repeatable)
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Send a contact message
    Contact {
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Call an action directly and print the raw JSON response
    Call {
        action: String,
        #[arg(long, default_value = "GET")]
        method: Method,
        /// JSON body
        #[arg(long)]
        body: Option<String>,
        /// Pre-encoded query string, without the leading '&'
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Donor: confirm an appointment
    ConfirmCita { cita_id: i64 },
    /// Donor: cancel an appointment
    CancelCita { cita_id: i64 },
    /// Donor: mark one notification, or all with --all, as read
    MarkRead {
        #[arg(required_unless_present = "all")]
        notif_id: Option<i64>,
        #[arg(long)]
        all: bool,
    },
    /// Donor: schedule an appointment
    AddCita {
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Admin: change a user's status
    SetUserStatus { user_id: i64, estado: UserStatus },
    /// Admin: mark a contact message as read
    MarkMessageRead { message_id: i64 },
    /// Health center: confirm attendance to an appointment
    ConfirmAttendance { cita_id: i64 },
    /// Health center: cancel an appointment
    CancelCenterCita { cita_id: i64 },
    /// Health center: set the stock of a blood type
    UpdateInventory {
        tipo_sangre: String,
        #[arg(allow_negative_numbers = true)]
        cantidad: i64,
    },
    /// Health center: record a donation result
    AddDonation {
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Health center: send a notification to a donor
    SendNotification {
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if cli.no_wait {
        config.session = config.session.without_delays();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability.log_level);
    tracing::debug!(
        base_url = %config.api.base_url,
        endpoint_path = %config.api.endpoint_path,
        remembered_path = %config.session.remembered_path.display(),
        "Configuration loaded"
    );

    let history = Arc::new(History::new());
    let app = App::from_config(&config, history)?;

    let view: PageView = match cli.command {
        Commands::Whoami => {
            match app.guard().current_identity() {
                Some(identity) => println!("{} ({})", identity, identity.user_type.label()),
                None => println!("Sin sesión activa."),
            }
            return Ok(());
        }
        Commands::Call {
            action,
            method,
            body,
            query,
        } => {
            let body = body.map(|raw| serde_json::from_str::<Value>(&raw)).transpose()?;
            let response = app.api().gateway().call(&action, method, body, &query).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }
        Commands::Open {
            page: Page::AdminDashboard,
            tab: Some(tab),
        } => app.open_admin(tab).await,
        Commands::Open { page, .. } => app.open(page).await,
        Commands::Login {
            email,
            password,
            remember,
        } => app.login(&Credentials::new(email, password), remember).await,
        Commands::Logout => app.logout(),
        Commands::Register { fields } => app.register(&fields.into_iter().collect()).await,
        Commands::Contact { fields } => app.submit_contact(&fields.into_iter().collect()).await,
        Commands::ConfirmCita { cita_id } => app.confirm_cita(cita_id).await,
        Commands::CancelCita { cita_id } => app.cancel_cita(cita_id).await,
        Commands::MarkRead { all: true, .. } => app.mark_all_notifications_read().await,
        Commands::MarkRead { notif_id, .. } => {
            app.mark_notification_read(notif_id.unwrap_or_default()).await
        }
        Commands::AddCita { fields } => {
            app.schedule_appointment(fields.into_iter().collect::<FormFields>()).await
        }
        Commands::SetUserStatus { user_id, estado } => app.update_user_status(user_id, estado).await,
        Commands::MarkMessageRead { message_id } => app.mark_contact_message_read(message_id).await,
        Commands::ConfirmAttendance { cita_id } => app.confirm_attendance(cita_id).await,
        Commands::CancelCenterCita { cita_id } => app.cancel_center_cita(cita_id).await,
        Commands::UpdateInventory { tipo_sangre, cantidad } => {
            app.update_inventory(&tipo_sangre, cantidad).await
        }
        Commands::AddDonation { fields } => app.add_donation_result(fields.into_iter().collect()).await,
        Commands::SendNotification { fields } => {
            app.send_notification(&fields.into_iter().collect()).await
        }
    };

    print!("{}", view);
    if let Some(target) = app.follow(&view).await {
        println!("Redirigido a {}", target.path());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_remember_help_mentions_single_run() {
        let cmd = Cli::command();
        let login = cmd.find_subcommand("login").unwrap();
        let remember = login.get_arguments().find(|a| a.get_id() == "remember").unwrap();
        let help = remember.get_help().unwrap().to_string();
        assert!(help.contains("only lasts"), "help was {:?}", help);
        assert!(help.contains("session.tab_scoped_path"));
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("email=a=b").unwrap(), ("email".to_string(), "a=b".to_string()));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
