use std::{error::Error, io::Write, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "terrenos_admin")]
#[command(about = "Admin utilities for Terrenos (bootstrap admins/parcels)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./terrenos.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Admin(Admin),
    Parcel(Parcel),
}

#[derive(Args, Debug)]
struct Admin {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    Create(AdminCreateArgs),
}

#[derive(Args, Debug)]
struct AdminCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Parcel {
    #[command(subcommand)]
    command: ParcelCommand,
}

#[derive(Subcommand, Debug)]
enum ParcelCommand {
    Create(ParcelCreateArgs),
    Import(ParcelImportArgs),
}

#[derive(Args, Debug)]
struct ParcelCreateArgs {
    /// Lot code, e.g. "A1".
    #[arg(long)]
    id: String,
    /// Area in square meters.
    #[arg(long)]
    area: Decimal,
    /// Sale price.
    #[arg(long)]
    price: Decimal,
}

#[derive(Args, Debug)]
struct ParcelImportArgs {
    /// JSON file holding an array of {id, area_m2, price}.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ParcelRecord {
    id: String,
    area_m2: Decimal,
    price: Decimal,
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
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Admin(Admin {
            command: AdminCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            match engine.create_admin(&args.username, &password).await {
                Ok(admin) => println!("created admin: {}", admin.username),
                Err(EngineError::Conflict(msg)) => {
                    eprintln!("{msg}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Parcel(Parcel {
            command: ParcelCommand::Create(args),
        }) => match engine.create_parcel(&args.id, args.area, args.price).await {
            Ok(parcel) => println!("created parcel: {}", parcel.id),
            Err(EngineError::Conflict(msg)) => {
                eprintln!("{msg}");
                std::process::exit(1);
            }
            Err(EngineError::Validation(msg)) => {
                eprintln!("{msg}");
                std::process::exit(2);
            }
            Err(err) => return Err(err.into()),
        },
        Command::Parcel(Parcel {
            command: ParcelCommand::Import(args),
        }) => {
            let raw = std::fs::read_to_string(&args.file)?;
            let records: Vec<ParcelRecord> = serde_json::from_str(&raw)?;

            let mut created = 0usize;
            let mut skipped = 0usize;
            for record in records {
                match engine
                    .create_parcel(&record.id, record.area_m2, record.price)
                    .await
                {
                    Ok(_) => created += 1,
                    Err(EngineError::Conflict(_)) => skipped += 1,
                    Err(err) => {
                        eprintln!("parcel {}: {err}", record.id);
                        std::process::exit(2);
                    }
                }
            }

            println!("imported {created} parcels, skipped {skipped} existing");
        }
    }

    Ok(())
}
