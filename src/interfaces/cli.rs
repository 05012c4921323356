use crate::application::flow::{FlowEvent, PaymentFlow};
use crate::application::gate::{self, GateOutcome};
use crate::application::review::ReviewDesk;
use crate::config::AppConfig;
use crate::domain::payment::PaymentStatus;
use crate::domain::ports::{PaymentApiBox, RoutineApiBox};
use crate::domain::routine::Routine;
use crate::error::{AppError, Result};
use crate::infrastructure::http::RestBackend;
use crate::infrastructure::in_memory::InMemoryBackend;
use crate::interfaces::csv::payment_writer::PaymentWriter;
use crate::session::{Role, Session};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about = "Client for the training-management backend", long_about = None)]
pub struct Cli {
    /// Run against a seeded in-memory backend instead of the REST API
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse assigned routines
    #[command(subcommand)]
    Routines(RoutinesCommand),
    /// Pay to unlock a routine
    #[command(subcommand)]
    Pay(PayCommand),
    /// Review and settle payments (trainer side)
    #[command(subcommand)]
    Payments(PaymentsCommand),
    /// Manage the stored session
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Subcommand)]
pub enum RoutinesCommand {
    /// List the signed-in client's routines
    List,
    /// Open a routine: detail view, or the payment options if it is locked
    Open { routine_id: u32 },
}

#[derive(Subcommand)]
pub enum PayCommand {
    /// Hosted checkout: prints the redirect URL
    Checkout { routine_id: u32 },
    /// Bank transfer: creates the payment and prints the bank details
    Transfer {
        routine_id: u32,
        /// Also report the transfer as sent in the same run
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Subcommand)]
pub enum PaymentsCommand {
    /// List payments, optionally filtered by status
    List {
        /// Wire status token, e.g. PENDIENTE_VERIFICACION
        #[arg(long)]
        status: Option<PaymentStatus>,
        /// Emit CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Payment statistics
    Stats,
    /// Approve a reported transfer, unlocking the routine
    Approve { payment_id: u32 },
    /// Reject a reported transfer
    Reject { payment_id: u32 },
    /// Mark a payment notification as seen
    Seen { payment_id: u32 },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Store the bearer token and identity
    Login {
        #[arg(long)]
        token: String,
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        user_id: u32,
    },
    /// Remove the stored session
    Logout,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Trainer,
    Client,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Trainer => Role::Trainer,
            RoleArg::Client => Role::Client,
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let Cli { demo, command } = cli;
    let command = match command {
        Command::Session(session_command) => return run_session(session_command, &config),
        other => other,
    };

    let session = Session::load(&config.session_path)?;
    let (routines, payments): (RoutineApiBox, PaymentApiBox) = if demo {
        let backend = InMemoryBackend::new();
        backend.seed_demo().await?;
        (Box::new(backend.clone()), Box::new(backend))
    } else {
        let token = session.as_ref().map(|s| s.token.clone());
        let backend = RestBackend::new(config.api_base_url.clone(), token);
        (Box::new(backend.clone()), Box::new(backend))
    };

    // Identity is resolved here, once, and injected into the use cases. In
    // demo mode the seeded identities apply when no session is stored.
    let (client_id, trainer_id) = match &session {
        Some(s) => (s.client_id(), s.trainer_id()),
        None if demo => (
            Some(InMemoryBackend::DEMO_CLIENT),
            Some(InMemoryBackend::DEMO_TRAINER),
        ),
        None => (None, None),
    };

    match command {
        Command::Routines(command) => run_routines(command, routines, client_id).await,
        Command::Pay(command) => run_pay(command, routines, payments, client_id).await,
        Command::Payments(command) => {
            run_payments(command, ReviewDesk::new(payments, trainer_id)).await
        }
        Command::Session(_) => unreachable!("handled above"),
    }
}

fn run_session(command: SessionCommand, config: &AppConfig) -> Result<()> {
    match command {
        SessionCommand::Login {
            token,
            role,
            user_id,
        } => {
            let session = Session {
                token,
                role: role.into(),
                user_id,
            };
            session.save(&config.session_path)?;
            println!("session stored at {}", config.session_path.display());
        }
        SessionCommand::Logout => {
            Session::clear(&config.session_path)?;
            println!("session cleared");
        }
    }
    Ok(())
}

async fn run_routines(
    command: RoutinesCommand,
    routines: RoutineApiBox,
    client_id: Option<u32>,
) -> Result<()> {
    match command {
        RoutinesCommand::List => {
            let Some(client_id) = client_id else {
                debug!("no client identity in session, routine listing skipped");
                return Ok(());
            };
            for routine in routines.client_routines(client_id).await? {
                let marker = if routine.status.is_locked() {
                    " [locked]"
                } else {
                    ""
                };
                println!(
                    "#{} {} - {}{}",
                    routine.id, routine.name, routine.status, marker
                );
            }
        }
        RoutinesCommand::Open { routine_id } => {
            let routine = fetch_routine(&routines, routine_id).await?;
            match gate::press(&routine) {
                GateOutcome::Navigate { .. } => print_routine_detail(&routine),
                GateOutcome::OpenPaymentSelector { amount, .. } => {
                    println!("routine #{} \"{}\" is locked", routine.id, routine.name);
                    println!("amount due: ${}", amount);
                    println!("pay with:");
                    println!("  rutina pay checkout {}", routine.id);
                    println!("  rutina pay transfer {}", routine.id);
                }
                GateOutcome::Unavailable => {
                    println!(
                        "routine #{} is not available ({})",
                        routine.id, routine.status
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_pay(
    command: PayCommand,
    routines: RoutineApiBox,
    payments: PaymentApiBox,
    client_id: Option<u32>,
) -> Result<()> {
    let (routine_id, by_transfer, confirm) = match command {
        PayCommand::Checkout { routine_id } => (routine_id, false, false),
        PayCommand::Transfer {
            routine_id,
            confirm,
        } => (routine_id, true, confirm),
    };

    let routine = fetch_routine(&routines, routine_id).await?;
    let amount = routine.price;
    let flow = PaymentFlow::new(routines, payments, client_id);

    match flow.press(&routine).await {
        FlowEvent::SelectorOpened { .. } => {}
        FlowEvent::Navigated { .. } => {
            println!("routine #{} is already unlocked", routine.id);
            return Ok(());
        }
        _ => {
            println!(
                "routine #{} is not available ({})",
                routine.id, routine.status
            );
            return Ok(());
        }
    }

    if by_transfer {
        if let FlowEvent::TransferPrepared { payment_id, bank } = flow.pay_by_transfer().await {
            println!("transfer ${} to:", amount);
            println!("  alias: {}", bank.alias);
            println!("  cvu:   {}", bank.cvu);
            println!("payment #{} created", payment_id);

            if confirm {
                if let FlowEvent::TransferConfirmed { routine } = flow.confirm_transfer().await {
                    println!("transfer reported, awaiting verification");
                    if let Some(routine) = routine {
                        println!("routine status is now {}", routine.status);
                    }
                }
            } else {
                println!("after sending it, run: rutina pay transfer {} --confirm", routine_id);
            }
        }
    } else if let FlowEvent::Redirected { url } = flow.pay_by_checkout().await {
        println!("redirecting to: {}", url);
    }

    Ok(())
}

async fn run_payments(command: PaymentsCommand, desk: ReviewDesk) -> Result<()> {
    match command {
        PaymentsCommand::List { status, csv } => {
            let payments = desk.payments(status).await?;
            if csv {
                PaymentWriter::new(io::stdout().lock()).write_payments(&payments)?;
            } else {
                for payment in payments {
                    let seen = if payment.seen { "seen" } else { "new" };
                    println!(
                        "#{} client {} routine {} ${} {} {} [{}]",
                        payment.id,
                        payment.client_id,
                        payment.routine_id,
                        payment.amount,
                        payment.status,
                        payment.rail,
                        seen
                    );
                }
            }
        }
        PaymentsCommand::Stats => {
            if let Some(stats) = desk.stats().await? {
                println!("pending:              {}", stats.pending);
                println!("pending verification: {}", stats.pending_verification);
                println!("approved:             {}", stats.approved);
                println!("rejected:             {}", stats.rejected);
                println!("collected:            ${}", stats.collected);
            }
        }
        PaymentsCommand::Approve { payment_id } => {
            let payment = desk.approve(payment_id).await?;
            println!("payment #{} is now {}", payment.id, payment.status);
        }
        PaymentsCommand::Reject { payment_id } => {
            let payment = desk.reject(payment_id).await?;
            println!("payment #{} is now {}", payment.id, payment.status);
        }
        PaymentsCommand::Seen { payment_id } => {
            desk.mark_seen(payment_id).await?;
            println!("payment #{} marked as seen", payment_id);
        }
    }
    Ok(())
}

async fn fetch_routine(routines: &RoutineApiBox, routine_id: u32) -> Result<Routine> {
    routines
        .routine(routine_id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("routine {} not found", routine_id)))
}

fn print_routine_detail(routine: &Routine) {
    println!("#{} {} ({})", routine.id, routine.name, routine.focus);
    println!("status: {}", routine.status);
    println!("from {} to {}", routine.start_date, routine.end_date);
    println!("price: ${}", routine.price);
    let entries = routine.schedule_entries();
    if !entries.is_empty() {
        println!("schedule:");
        for entry in entries {
            println!("  day {}: {}", entry.day, entry.muscle);
        }
    }
}
