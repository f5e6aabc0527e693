use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{CategoryCmd, CategoryKind, Engine};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "ledger_admin")]
#[command(about = "Admin utilities for Ledger (users, roles, global categories)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./ledger.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Category(Category),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    ResetPassword(UsernameArgs),
    GrantRole(GrantRoleArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct UsernameArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct GrantRoleArgs {
    #[arg(long)]
    username: String,
    /// Role name, stored uppercase (e.g. `ADMIN`).
    #[arg(long)]
    role: String,
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Create a category shared by every user.
    Create(CategoryCreateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Income,
    Expense,
    Both,
}

impl From<KindArg> for CategoryKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Income => CategoryKind::Income,
            KindArg::Expense => CategoryKind::Expense,
            KindArg::Both => CategoryKind::Both,
        }
    }
}

#[derive(Args, Debug)]
struct CategoryCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_enum, default_value = "expense")]
    kind: KindArg,
    #[arg(long)]
    description: Option<String>,
    /// `#RRGGBB`
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    icon: Option<String>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn print_line(message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            print_line("Password must not be empty.")?;
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }
        print_line("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run_user(engine: &Engine, command: UserCommand) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        UserCommand::Create(args) => {
            let password = prompt_password_twice()?;
            let user = engine
                .register(&args.username, &args.email, &password)
                .await?;
            println!("created user: {} ({})", user.username, user.id);
        }
        UserCommand::ResetPassword(args) => {
            let user = engine.user_by_username(&args.username).await?;
            let password = prompt_password_twice()?;
            engine.change_password(user.id, &password).await?;
            println!("password updated: {}", user.username);
        }
        UserCommand::GrantRole(args) => {
            let user = engine.user_by_username(&args.username).await?;
            let user = engine.grant_role(user.id, &args.role).await?;
            println!("roles of {}: {}", user.username, user.roles.join(", "));
        }
    }
    Ok(())
}

async fn run_category(
    engine: &Engine,
    command: CategoryCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        CategoryCommand::Create(args) => {
            let mut cmd = CategoryCmd::new(args.name, args.kind.into());
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            if let Some(color) = args.color {
                cmd = cmd.color(color);
            }
            if let Some(icon) = args.icon {
                cmd = cmd.icon(icon);
            }
            let category = engine.create_global_category(cmd).await?;
            println!("created global category: {} ({})", category.name, category.id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    let result = match cli.command {
        Command::User(User { command }) => run_user(&engine, command).await,
        Command::Category(Category { command }) => run_category(&engine, command).await,
    };
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }

    Ok(())
}
