use std::{error::Error, io::Write, sync::Arc};

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{
    Engine, EngineError, NewUser, PushGateway, Role, StkPushRequest, StkPushResponse,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "tumapesa_admin")]
#[command(about = "Admin utilities for TumaPesa (bootstrap accounts, reverse transfers)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./tumapesa.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Transaction(Transaction),
    /// Print system-wide totals.
    Stats,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    /// Grant the admin role. This is the only way to mint an admin.
    #[arg(long)]
    admin: bool,
}

#[derive(Args, Debug)]
struct Transaction {
    #[command(subcommand)]
    command: TransactionCommand,
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    /// Reverse a completed transfer, refunding amount and fee to the sender.
    Reverse(TransactionReverseArgs),
}

#[derive(Args, Debug)]
struct TransactionReverseArgs {
    transaction_id: Uuid,
}

/// The CLI never initiates deposits, so the engine gets a gateway that
/// refuses every push.
#[derive(Debug)]
struct OfflineGateway;

#[async_trait]
impl PushGateway for OfflineGateway {
    async fn initiate_push(
        &self,
        _request: StkPushRequest,
    ) -> Result<StkPushResponse, EngineError> {
        Err(EngineError::Gateway(
            "mobile-money gateway unavailable in the admin CLI".to_string(),
        ))
    }
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

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .gateway(Arc::new(OfflineGateway))
        .build()
        .await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            let role = if args.admin { Role::Admin } else { Role::User };
            match engine
                .create_user(NewUser {
                    name: args.name,
                    email: args.email,
                    phone: args.phone,
                    password,
                    role,
                })
                .await
            {
                Ok(user) => {
                    println!("created user: {} ({})", user.email, user.id);
                }
                Err(EngineError::AlreadyExists(email)) => {
                    eprintln!("user already exists: {email}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Transaction(Transaction {
            command: TransactionCommand::Reverse(args),
        }) => {
            let outcome = engine.reverse_transaction(args.transaction_id).await?;
            println!(
                "reversed transaction {}: refunded {} (+{} fee)",
                outcome.original.id,
                outcome.refund.amount(),
                outcome.original.fee(),
            );
            if !outcome.recipient_entry_reversed {
                println!("note: no matching recipient entry was found to reverse");
            }
        }
        Command::Stats => {
            let stats = engine.system_stats().await?;
            println!("users:        {}", stats.total_users);
            println!("wallets:      {}", stats.total_wallets);
            println!("transactions: {}", stats.total_transactions);
            println!("total balance (minor units): {}", stats.total_balance_minor);
        }
    }

    Ok(())
}
