pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use libris_core::config::{AppConfig, LoadOptions, LogFormat};

use commands::{CommandContext, CommandResult};

#[derive(Debug, Parser)]
#[command(
    name = "libris",
    about = "Church Library client",
    long_about = "Browse the Church Library catalog, borrow and purchase books, and manage the \
                  catalog, borrow records and accounts as an administrator.",
    after_help = "Examples:\n  libris books\n  libris borrow 64f0c2a9e13b7a0012ab34cd\n  libris checkout\n  libris admin dashboard"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file path (defaults to libris.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List the book catalog")]
    Books,
    #[command(about = "Show one book in detail")]
    Book {
        #[arg(help = "Book id")]
        id: String,
    },
    #[command(about = "Borrow a book; the due date defaults to seven days out")]
    Borrow {
        #[arg(help = "Book id")]
        book_id: String,
        #[arg(long, default_value_t = 7, help = "Borrow period in days")]
        days: i64,
    },
    #[command(about = "Walk through the four-stage purchase checkout")]
    Checkout,
    #[command(about = "Sign in and persist the session")]
    Login {
        #[arg(long)]
        email: String,
    },
    #[command(about = "Create an account and persist the session")]
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    #[command(about = "Clear the persisted session")]
    Logout,
    #[command(about = "Show the signed-in profile")]
    Whoami,
    #[command(subcommand, about = "Administrator views")]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    #[command(about = "Summarize catalog, borrow record and account counts")]
    Dashboard,
    #[command(about = "Add a book to the catalog")]
    AddBook {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        description: String,
        #[arg(long, help = "Price, e.g. 99.00")]
        price: String,
        #[arg(long, help = "Path to a cover image file")]
        cover: Option<PathBuf>,
    },
    #[command(about = "Edit a book; omitted fields keep their current value")]
    EditBook {
        #[arg(help = "Book id")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long, help = "Path to a replacement cover image file")]
        cover: Option<PathBuf>,
    },
    #[command(about = "Delete a book from the catalog")]
    DeleteBook {
        #[arg(help = "Book id")]
        id: String,
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
    #[command(about = "List borrow records")]
    Borrows,
    #[command(about = "Mark a borrow record as returned")]
    MarkReturned {
        #[arg(help = "Borrow record id")]
        id: String,
    },
    #[command(about = "List accounts")]
    Users,
    #[command(about = "Grant administrator rights to an account")]
    GrantAdmin {
        #[arg(help = "User id")]
        id: String,
    },
    #[command(about = "Revoke administrator rights from an account")]
    RevokeAdmin {
        #[arg(help = "User id")]
        id: String,
    },
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let base = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);
    match config.logging.format {
        LogFormat::Compact => base.compact().init(),
        LogFormat::Pretty => base.pretty().init(),
        LogFormat::Json => base.json().init(),
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let context = match CommandContext::initialize(LoadOptions {
        config_path: cli.config,
        ..LoadOptions::default()
    }) {
        Ok(context) => context,
        Err(result) => {
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&context.config);

    let result = dispatch(&context, cli.command);
    // Interactive commands write as they run and return nothing further.
    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

fn dispatch(context: &CommandContext, command: Command) -> CommandResult {
    match command {
        Command::Books => commands::catalog::books(context),
        Command::Book { id } => commands::catalog::book(context, &id),
        Command::Borrow { book_id, days } => commands::catalog::borrow(context, &book_id, days),
        Command::Checkout => commands::checkout::run(),
        Command::Login { email } => commands::auth::login(context, &email),
        Command::Register { name, email } => commands::auth::register(context, &name, &email),
        Command::Logout => commands::auth::logout(context),
        Command::Whoami => commands::auth::whoami(context),
        Command::Admin(admin) => dispatch_admin(context, admin),
    }
}

fn dispatch_admin(context: &CommandContext, command: AdminCommand) -> CommandResult {
    match command {
        AdminCommand::Dashboard => commands::admin::dashboard(context),
        AdminCommand::AddBook { title, author, description, price, cover } => {
            commands::admin::add_book(
                context,
                commands::admin::AddBookArgs { title, author, description, price, cover },
            )
        }
        AdminCommand::EditBook { id, title, author, description, price, cover } => {
            commands::admin::edit_book(
                context,
                &id,
                commands::admin::EditBookArgs { title, author, description, price, cover },
            )
        }
        AdminCommand::DeleteBook { id, yes } => commands::admin::delete_book(context, &id, yes),
        AdminCommand::Borrows => commands::admin::borrows(context),
        AdminCommand::MarkReturned { id } => commands::admin::mark_returned(context, &id),
        AdminCommand::Users => commands::admin::users(context),
        AdminCommand::GrantAdmin { id } => commands::admin::set_admin(context, &id, true),
        AdminCommand::RevokeAdmin { id } => commands::admin::set_admin(context, &id, false),
    }
}
