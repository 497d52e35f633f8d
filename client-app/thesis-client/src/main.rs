mod app;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use thesis_core::services::{MountOutcome, NavigationOutcome, SessionNotice, WizardPhase, WizardStep};
use thesis_shared::config::AppConfig;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(
    name = "thesis-client",
    version,
    about = "Thesis management client - group session and navigation"
)]
struct Args {
    /// Access token; overrides `auth.access_token`
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the groups visible to you
    Groups,
    /// Select the current group by slug
    Select { slug: String },
    /// Clear the current group
    Clear,
    /// Resolve a location the way the router would
    Open { location: String },
    /// Start the application wizard at a location
    Wizard {
        location: String,
        /// Jump back to this step index after mounting
        #[arg(long)]
        back_to: Option<usize>,
    },
    /// Issue a development token signed with `auth.jwt_secret`
    Token {
        #[arg(long)]
        user_id: Option<Uuid>,
        #[arg(long, default_value_t = false)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load()?;
    thesis_shared::telemetry::init_telemetry(&config.log)?;
    info!("{} starting ({})", config.app.name, config.app.env);

    let token = args.token.or_else(|| config.auth.access_token.clone());
    let app = App::build(&config, token)?;

    if let Command::Token { user_id, admin } = &args.command {
        if config.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret is not configured");
        }
        let user_id = user_id.unwrap_or_else(Uuid::new_v4);
        let roles = if *admin { vec![config.auth.admin_role.as_str()] } else { Vec::new() };
        println!("{}", app.jwt().generate_access_token(&user_id, &roles)?);
        return Ok(());
    }

    let auth = app.start_session().await?;
    info!("Session ready (admin: {})", auth.is_admin);

    match args.command {
        Command::Groups => list_groups(&app),
        Command::Select { slug } => match app.session.resolve_from_slug(&slug)? {
            Some(group) => println!("Current group: {} ({})", group.name, group.slug),
            None => bail!("groups are not available yet"),
        },
        Command::Clear => {
            app.session.set_current_group(None)?;
            println!("Current group cleared");
        }
        Command::Open { location } => open(&app, &location),
        Command::Wizard { location, back_to } => wizard(&app, &location, back_to).await?,
        Command::Token { .. } => {}
    }

    print_notices(&app);
    Ok(())
}

fn list_groups(app: &App) {
    let state = app.session.snapshot();
    if let Some(e) = &state.error {
        println!("! {} [{}]", e, e.code());
    }
    let resolver = state.resolver();
    for group in &state.available_groups {
        let marker = if state.current_group_id() == Some(group.id) { "*" } else { " " };
        let role = resolver
            .role_in(&group.id)
            .map(|r| r.as_str())
            .unwrap_or("-");
        println!("{} {:<24} {:<14} {}", marker, group.slug, role, group.name);
    }
}

fn open(app: &App, location: &str) {
    match app.navigator.navigate(location) {
        NavigationOutcome::Render(route) => {
            println!("render {}", route);
            for link in app.navigator.group_links() {
                println!("  {:<16} {}", link.label, link.path);
            }
        }
        NavigationOutcome::Redirect(path) => println!("redirect {}", path),
        NavigationOutcome::Pending => println!("pending"),
        NavigationOutcome::NotFound => println!("not found"),
        NavigationOutcome::Failed(e) => println!("error: {}", e),
    }
}

async fn wizard(app: &App, location: &str, back_to: Option<usize>) -> Result<()> {
    match app.wizard.mount_location(location).await {
        MountOutcome::Ready(_) => {}
        MountOutcome::Failed(e) => bail!("wizard could not start: {}", e),
        MountOutcome::Superseded => bail!("wizard was closed"),
    }

    if let Some(index) = back_to {
        let Some(step) = WizardStep::from_index(index) else {
            bail!("no wizard step {}", index);
        };
        if !app.wizard.update_step(step) {
            println!("step {} is not reachable from here", step);
        }
    }

    if let WizardPhase::Active(state) = app.wizard.phase() {
        println!("step: {} ({})", state.step, state.step.index());
        let navigable: Vec<_> = state.navigable_steps().iter().map(|s| s.label()).collect();
        println!("navigable: {}", navigable.join(", "));
    }
    if let Some(url) = app.history.current() {
        println!("url: {}", url);
    }
    Ok(())
}

fn print_notices(app: &App) {
    for notice in app.session.take_notices() {
        match notice {
            SessionNotice::GroupChanged { name, .. } => println!("notice: switched to {}", name),
            SessionNotice::SelectionReset { group_id } => {
                println!("notice: group {} is no longer available, selection cleared", group_id)
            }
        }
    }
}
