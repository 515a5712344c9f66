use sekolah::cli::{
    format_effective, format_menu, format_report, format_rows, load_editor, reset_all_overrides,
    reset_override, set_custom_override, set_override,
};
use sekolah::modules::{OverrideEditor, PermissionResolver, SaveReport, school_menu};
use sekolah::sekolah_client::OverrideClient;
use sekolah::sekolah_config::BackendConfig;
use sekolah::sekolah_core::{AccessLevel, Action, AppError, NONE, Permission, Role};
use sekolah::sekolah_models::OverrideTarget;
use sekolah::sekolah_observability::init_tracing;
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "sekolah-cli")]
#[command(about = "Sekolah CLI - Inspect and manage permission overrides", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu as a role sees it
    Menu {
        /// Role, e.g. Guru or Petugas_Keuangan
        #[arg(short = 'r', long, value_parser = parse_role)]
        role: Role,

        /// Also apply overrides for this user id
        #[arg(short = 'u', long)]
        user: Option<String>,

        /// Skip the backend and use static permissions only
        #[arg(long)]
        offline: bool,
    },
    /// List the effective permission of every resource
    Effective {
        #[arg(short = 'r', long, value_parser = parse_role)]
        role: Role,

        #[arg(short = 'u', long)]
        user: Option<String>,

        #[arg(long)]
        offline: bool,
    },
    /// Manage persisted overrides
    #[command(subcommand)]
    Overrides(OverrideCommands),
}

#[derive(Subcommand)]
enum OverrideCommands {
    /// Show the override matrix for a role or user
    List(TargetArgs),
    /// Override one resource
    Set {
        #[command(flatten)]
        target: TargetArgs,

        /// Resource key, e.g. nilai
        #[arg(short = 'k', long)]
        resource: String,

        /// none, view, view-create, view-edit or full
        #[arg(short = 'l', long, conflicts_with = "actions", value_parser = parse_level)]
        level: Option<AccessLevel>,

        /// Comma-separated actions for a custom permission, e.g. view,delete
        #[arg(short = 'a', long, value_delimiter = ',', value_parser = parse_action)]
        actions: Option<Vec<Action>>,
    },
    /// Remove the override on one resource
    Reset {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(short = 'k', long)]
        resource: String,
    },
    /// Remove every override of a role or user
    ResetAll {
        #[command(flatten)]
        target: TargetArgs,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Role whose overrides are edited, or the user's role when --user is set
    #[arg(short = 'r', long, value_parser = parse_role)]
    role: Role,

    /// Edit overrides of this user instead of the role
    #[arg(short = 'u', long)]
    user: Option<String>,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse().map_err(|e: AppError| e.error.to_string())
}

fn parse_level(s: &str) -> Result<AccessLevel, String> {
    s.parse().map_err(|e: AppError| e.error.to_string())
}

fn parse_action(s: &str) -> Result<Action, String> {
    s.parse().map_err(|e: AppError| e.error.to_string())
}

impl TargetArgs {
    fn target(&self) -> OverrideTarget {
        match &self.user {
            Some(id) => OverrideTarget::user(id.clone()),
            None => OverrideTarget::Role(self.role),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let client = match OverrideClient::new(BackendConfig::from_env()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("\n❌ Error creating backend client: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Menu {
            role,
            user,
            offline,
        } => {
            let resolver = resolve(&client, role, user.as_deref(), offline).await;
            print!("{}", format_menu(&resolver));
        }
        Commands::Effective {
            role,
            user,
            offline,
        } => {
            let resolver = resolve(&client, role, user.as_deref(), offline).await;
            print!("{}", format_effective(&resolver));
        }
        Commands::Overrides(command) => handle_overrides(client, command).await,
    }
}

async fn resolve(
    client: &OverrideClient,
    role: Role,
    user: Option<&str>,
    offline: bool,
) -> PermissionResolver {
    if offline {
        PermissionResolver::new(school_menu(), role, NONE)
    } else {
        PermissionResolver::load(client, school_menu(), role, user, NONE).await
    }
}

async fn open_editor(client: OverrideClient, args: &TargetArgs) -> OverrideEditor<OverrideClient> {
    let editor = OverrideEditor::new(client, school_menu(), args.target(), args.role, NONE);
    match load_editor(editor).await {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("\n❌ Error loading overrides for {}: {}", args.target(), e);
            std::process::exit(1);
        }
    }
}

fn permission_from_actions(actions: &[Action]) -> Permission {
    Permission::new(
        actions.contains(&Action::View),
        actions.contains(&Action::Create),
        actions.contains(&Action::Edit),
        actions.contains(&Action::Delete),
    )
}

async fn handle_overrides(client: OverrideClient, command: OverrideCommands) {
    let result = match command {
        OverrideCommands::List(args) => {
            let editor = open_editor(client, &args).await;
            println!("Overrides for {}", args.target());
            print!("{}", format_rows(&editor.rows()));
            return;
        }
        OverrideCommands::Set {
            target,
            resource,
            level,
            actions,
        } => {
            let mut editor = open_editor(client, &target).await;
            match (level, actions) {
                (Some(level), _) => set_override(&mut editor, &resource, level).await,
                (None, Some(actions)) => {
                    set_custom_override(&mut editor, &resource, permission_from_actions(&actions))
                        .await
                }
                (None, None) => {
                    eprintln!("\n❌ Either --level or --actions is required");
                    std::process::exit(2);
                }
            }
        }
        OverrideCommands::Reset { target, resource } => {
            let mut editor = open_editor(client, &target).await;
            reset_override(&mut editor, &resource).await
        }
        OverrideCommands::ResetAll { target, yes } => {
            let mut editor = open_editor(client, &target).await;
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("Remove every override of {}?", target.target()))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
            if !confirmed {
                println!("Cancelled.");
                return;
            }
            reset_all_overrides(&mut editor).await
        }
    };

    match result {
        Ok(report) => finish(&report),
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn finish(report: &SaveReport) {
    print!("{}", format_report(report));
    if !report.is_success() {
        std::process::exit(1);
    }
}
