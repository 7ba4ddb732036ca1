//! iBank CLI - retail banking operations from the command line
//!
//! Usage:
//! ```bash
//! ibank init
//! ibank register --username alice --password s3cret-pass --phone 0901234567 --address "Hanoi"
//! ibank account -u alice -p s3cret-pass open --type savings --initial 100
//! ibank withdraw -u alice -p s3cret-pass 1 30
//! ibank transfer -u alice -p s3cret-pass 1 2 50 --note rent
//! ibank history -u alice -p s3cret-pass 1
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{account, beneficiary, branch, customer, loan, money, Output};

/// iBank - retail banking ledger on SQLite
#[derive(Parser)]
#[command(name = "ibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path (overrides IBANK_DATABASE_URL)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Customer login, required by every customer command
#[derive(Args, Clone)]
pub struct Identity {
    #[arg(long, short = 'u')]
    pub username: String,
    #[arg(long, short = 'p')]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and run migrations
    Init {
        /// Delete an existing database file first
        #[arg(long)]
        force: bool,
    },

    /// Branch reference data
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Register a new customer
    Register {
        #[arg(long, short = 'u')]
        username: String,
        #[arg(long, short = 'p')]
        password: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
    },

    /// Check credentials and show lockout status
    Login {
        #[command(flatten)]
        identity: Identity,
    },

    /// Account management
    Account {
        #[command(flatten)]
        identity: Identity,
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Deposit into one of your accounts
    Deposit {
        #[command(flatten)]
        identity: Identity,
        account_id: i64,
        /// Amount, e.g. 100 or 12.50
        amount: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Withdraw from one of your accounts
    Withdraw {
        #[command(flatten)]
        identity: Identity,
        account_id: i64,
        amount: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Transfer to any active account
    Transfer {
        #[command(flatten)]
        identity: Identity,
        from_account_id: i64,
        to_account_id: i64,
        amount: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Transaction history, newest first
    History {
        #[command(flatten)]
        identity: Identity,
        /// Account ID (omit for all accounts)
        account_id: Option<i64>,
        #[arg(long, default_value_t = ibank_business::accounts::DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },

    /// Saved beneficiaries
    Beneficiary {
        #[command(flatten)]
        identity: Identity,
        #[command(subcommand)]
        action: BeneficiaryAction,
    },

    /// Loan applications
    Loan {
        #[command(flatten)]
        identity: Identity,
        #[command(subcommand)]
        action: LoanAction,
    },
}

#[derive(Subcommand)]
pub enum BranchAction {
    /// Add a branch
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        contact: String,
    },
    /// List branches
    List,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Open a new account
    Open {
        #[arg(long, short = 't', default_value = "savings")]
        r#type: AccountTypeArg,
        #[arg(long)]
        branch: Option<i64>,
        /// Opening balance
        #[arg(long, default_value = "0")]
        initial: String,
    },
    /// List your accounts
    List,
    /// Show account details
    Show { account_id: i64 },
    /// Deactivate an account
    Close { account_id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AccountTypeArg {
    Savings,
    Current,
}

impl AccountTypeArg {
    /// Tên type như service nhận
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTypeArg::Savings => "savings",
            AccountTypeArg::Current => "current",
        }
    }
}

#[derive(Subcommand)]
pub enum BeneficiaryAction {
    /// Save a beneficiary
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        account_number: String,
        #[arg(long)]
        bank: String,
        #[arg(long)]
        ifsc: Option<String>,
    },
    /// List saved beneficiaries
    List,
    /// Remove a beneficiary
    Remove { beneficiary_id: i64 },
}

#[derive(Subcommand)]
pub enum LoanAction {
    /// Apply for a loan
    Apply {
        #[arg(long)]
        amount: String,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        branch: Option<i64>,
    },
    /// List your loans
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let out = Output::new(cli.json);

    if let Commands::Init { force: true } = cli.command {
        db::remove_database(cli.db.as_deref(), &out)?;
    }

    let ctx = db::connect(cli.db.as_deref()).await?;

    match cli.command {
        Commands::Init { .. } => db::show_status(&ctx, &out).await?,

        Commands::Branch { action } => branch::handle(&ctx, &out, action).await?,

        Commands::Register {
            username,
            password,
            phone,
            address,
        } => customer::register(&ctx, &out, &username, &password, &phone, &address).await?,

        Commands::Login { identity } => customer::login(&ctx, &out, &identity).await?,

        Commands::Account { identity, action } => {
            account::handle(&ctx, &out, &identity, action).await?
        }

        Commands::Deposit {
            identity,
            account_id,
            amount,
            note,
        } => money::deposit(&ctx, &out, &identity, account_id, &amount, &note).await?,

        Commands::Withdraw {
            identity,
            account_id,
            amount,
            note,
        } => money::withdraw(&ctx, &out, &identity, account_id, &amount, &note).await?,

        Commands::Transfer {
            identity,
            from_account_id,
            to_account_id,
            amount,
            note,
        } => {
            money::transfer(
                &ctx,
                &out,
                &identity,
                from_account_id,
                to_account_id,
                &amount,
                &note,
            )
            .await?
        }

        Commands::History {
            identity,
            account_id,
            limit,
        } => account::history(&ctx, &out, &identity, account_id, limit).await?,

        Commands::Beneficiary { identity, action } => {
            beneficiary::handle(&ctx, &out, &identity, action).await?
        }

        Commands::Loan { identity, action } => loan::handle(&ctx, &out, &identity, action).await?,
    }

    ctx.db().close().await;
    Ok(())
}
