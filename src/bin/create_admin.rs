//! create_admin
//!
//! Creates an admin account or resets its password.
//!
//! ```text
//! create_admin <email> <password>              # insert or update in `admins`
//! create_admin <email> <password> --print-hash # only print the Argon2 hash
//! ```
//!
//! Uses `DATABASE_URL` (and `.env`) like the server. Two-factor settings of an
//! existing admin are left untouched.

use ayzek_backend::{
    auth::{hash_password, validate_password_strength},
    repository::{PostgresRepository, Repository},
};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::{env, process::ExitCode};
use validator::ValidateEmail;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Parser, Debug)]
#[command(about = "Create an admin account or reset its password")]
struct Args {
    /// Login email; stored lowercased.
    email: String,

    password: String,

    /// Print the Argon2 hash and exit without touching the database.
    #[arg(long)]
    print_hash: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let email = args.email.trim().to_lowercase();
    let password = args.password.as_str();

    if !email.validate_email() {
        eprintln!("error: '{email}' is not a valid email address");
        return ExitCode::FAILURE;
    }
    if let Err(msg) = validate_password_strength(password, MIN_PASSWORD_LENGTH) {
        eprintln!("error: {msg}");
        return ExitCode::FAILURE;
    }

    let hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("error: hashing failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.print_hash {
        println!("{hash}");
        return ExitCode::SUCCESS;
    }

    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("error: DATABASE_URL must be set (or pass --print-hash)");
        return ExitCode::FAILURE;
    };

    let pool = match PgPoolOptions::new().max_connections(1).connect(&db_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("error: could not connect to Postgres: {e}");
            return ExitCode::FAILURE;
        }
    };

    match PostgresRepository::new(pool).upsert_admin(&email, &hash).await {
        Ok(admin) => {
            println!("admin #{} ready: {}", admin.id, admin.email);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: could not save admin: {e}");
            ExitCode::FAILURE
        }
    }
}
