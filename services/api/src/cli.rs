use crate::commands::{self, ListArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use counsel_review::error::AppError;
use counsel_review::session::AuthScope;

#[derive(Parser, Debug)]
#[command(
    name = "Counsel Review",
    about = "Review counselor applications, accounts, and appointments from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the reference backend (default command)
    Serve(ServeArgs),
    /// Store or clear the bearer token used for a scope
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
    /// Review counselor applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
    /// Browse verified counselors
    Counselors {
        #[command(subcommand)]
        command: CounselorsCommand,
    },
    /// Activate or deactivate user accounts
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Browse registered couples
    Couples {
        #[command(subcommand)]
        command: CouplesCommand,
    },
    /// Browse and cancel appointments
    Appointments {
        #[command(subcommand)]
        command: AppointmentsCommand,
    },
    /// Print the admin dashboard counts
    Stats,
    /// Walk through the review workflow against an in-process backend
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub(crate) enum ScopeArg {
    Admin,
    Couple,
}

impl From<ScopeArg> for AuthScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Admin => AuthScope::Admin,
            ScopeArg::Couple => AuthScope::Couple,
        }
    }
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Save a token for later commands
    Set {
        #[arg(value_enum)]
        scope: ScopeArg,
        token: String,
    },
    /// Forget the stored token
    Clear {
        #[arg(value_enum)]
        scope: ScopeArg,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// List applications; status defaults to every status
    List(ListArgs),
    /// Verify a pending application
    Approve { id: u64 },
    /// Reject a pending application; prompts for a reason when none is given
    Reject {
        id: u64,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CounselorsCommand {
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List(ListArgs),
    Activate { id: u64 },
    Deactivate { id: u64 },
}

#[derive(Subcommand, Debug)]
enum CouplesCommand {
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum AppointmentsCommand {
    List(ListArgs),
    /// Cancel a scheduled or confirmed appointment
    Cancel {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Token { command } => match command {
            TokenCommand::Set { scope, token } => commands::set_token(scope.into(), &token),
            TokenCommand::Clear { scope } => commands::clear_token(scope.into()),
        },
        Command::Applications { command } => match command {
            ApplicationsCommand::List(args) => commands::list_applications(args).await,
            ApplicationsCommand::Approve { id } => commands::approve_application(id).await,
            ApplicationsCommand::Reject { id, reason } => {
                commands::reject_application(id, reason).await
            }
        },
        Command::Counselors {
            command: CounselorsCommand::List(args),
        } => commands::list_counselors(args).await,
        Command::Users { command } => match command {
            UsersCommand::List(args) => commands::list_users(args).await,
            UsersCommand::Activate { id } => commands::set_user_active(id, true).await,
            UsersCommand::Deactivate { id } => commands::set_user_active(id, false).await,
        },
        Command::Couples {
            command: CouplesCommand::List(args),
        } => commands::list_couples(args).await,
        Command::Appointments { command } => match command {
            AppointmentsCommand::List(args) => commands::list_appointments(args).await,
            AppointmentsCommand::Cancel { id, yes } => {
                commands::cancel_appointment(id, yes).await
            }
        },
        Command::Stats => commands::show_stats().await,
        Command::Demo(args) => run_demo(args).await,
    }
}
