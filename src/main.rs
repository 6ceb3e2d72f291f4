use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, Color, Table};
use inquire::{DateSelect, Select, Text};
use tracing_subscriber::EnvFilter;

use billed::config::{self, AppSettings};
use billed::fixtures::EXPENSE_TYPES;
use billed::session::{self, FileStorage};
use billed::{
    AttachedFile, AttachmentState, BillStatus, JsonFileStore, NewBillInput, Navigator,
    RawBillFields, RemoteBillsClient, Route, Router, SessionError, SessionUser, UserType,
    format_date,
};

// ==========================================
// Structs & Enums
// ==========================================

#[derive(Parser)]
#[command(name = "billed", about = "Employee expense reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an employee
    Login {
        email: String,
        /// Sign in as an administrator instead
        #[arg(long)]
        admin: bool,
    },
    /// Forget the signed-in user
    Logout,
    /// List my bills, most recent first
    Bills {
        /// Print the HTML page instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Show the receipt of a bill (row number from `bills`)
    View { row: usize },
    /// Send a new bill with the given receipt image
    New { file: PathBuf },
    /// Configure data directory and attachment URL
    Config,
}

// ==========================================
// Main Function
// ==========================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("billed=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Config => {
            setup_config_wizard()?;
        }
        command => {
            // 1. Initialize configuration
            let settings = match config::load_settings()? {
                Some(settings) => settings,
                None => setup_config_wizard()?,
            };
            run(command, &settings).await?;
        }
    }

    Ok(())
}

async fn run(command: Commands, settings: &AppSettings) -> Result<()> {
    match command {
        Commands::Login { email, admin } => {
            let mut storage = FileStorage::open(settings.session_path())?;
            let kind = if admin { UserType::Admin } else { UserType::Employee };
            session::sign_in(&mut storage, &SessionUser { kind, email: email.clone() })?;
            println!("✅ Signed in as {}", email);
        }
        Commands::Logout => {
            let mut storage = FileStorage::open(settings.session_path())?;
            session::sign_out(&mut storage)?;
            println!("👋 Signed out.");
        }
        Commands::Bills { html } => {
            let router = build_router(settings)?;
            if html {
                println!("{}", router.render(Route::Bills).await?);
            } else {
                list_bills(&router).await;
            }
        }
        Commands::View { row } => {
            let router = build_router(settings)?;
            view_attachment(&router, row).await?;
        }
        Commands::New { file } => {
            let router = build_router(settings)?;
            new_bill(&router, &file).await?;
        }
        Commands::Config => {
            setup_config_wizard()?;
        }
    }

    Ok(())
}

fn build_router(settings: &AppSettings) -> Result<Router> {
    let storage = FileStorage::open(settings.session_path())?;
    let user = match session::current_user(&storage) {
        Ok(user) => user,
        Err(SessionError::SignedOut) => {
            bail!("No user signed in. Run `billed login <email>` first.")
        }
        Err(e) => return Err(e.into()),
    };
    if !user.is_employee() {
        bail!("Only employees can manage bills.");
    }

    let store: Arc<dyn RemoteBillsClient> = Arc::new(JsonFileStore::new(settings.bills_path()));
    let navigator: Arc<dyn Navigator> = Arc::new(|route: Route| {
        tracing::debug!(path = route.path(), "navigate");
        println!("➡️  {}", route);
    });

    Ok(Router::new(user, store, navigator, settings.attachment_base_url.clone())?)
}

// ==========================================
// 1. Bills List
// ==========================================

async fn list_bills(router: &Router) {
    let bills = match router.bills().get_bills().await {
        Ok(bills) => bills,
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    };

    println!("--- Mes notes de frais ---");
    if bills.is_empty() {
        println!("(None found)");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Date"),
        Cell::new("Type"),
        Cell::new("Nom"),
        Cell::new("Montant"),
        Cell::new("Statut"),
    ]);

    for (i, bill) in bills.iter().enumerate() {
        let status_cell = Cell::new(bill.status.label());
        let status_cell = match bill.status {
            BillStatus::Accepted => status_cell.fg(Color::Rgb { r: 4, g: 120, b: 87 }),
            BillStatus::Refused => status_cell.fg(Color::Rgb { r: 185, g: 28, b: 28 }),
            BillStatus::Pending => status_cell,
        };
        let amount = format!("{} €", billed::views::format_amount(bill.amount));

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format_date(&bill.date)),
            Cell::new(&bill.expense_type),
            Cell::new(&bill.expense_name),
            Cell::new(amount).add_attribute(Attribute::Bold),
            status_cell,
        ]);
    }

    println!("{table}");
}

async fn view_attachment(router: &Router, row: usize) -> Result<()> {
    let list = router.bills();
    let bills = list.get_bills().await?;
    let Some(bill) = row.checked_sub(1).and_then(|i| bills.get(i)) else {
        bail!("No bill at row {} ({} bills)", row, bills.len());
    };

    let preview = list.handle_click_icon_eye(bill);
    println!("🧾 {}", preview.file_name);
    println!("{}", preview.file_url);
    Ok(())
}

// ==========================================
// 2. New Bill
// ==========================================

fn guess_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn prompt_fields() -> Result<RawBillFields> {
    println!("\n--- Envoyer une note de frais ---");
    let expense_type = Select::new("Type de dépense:", EXPENSE_TYPES.to_vec()).prompt()?;
    let expense_name = Text::new("Nom de la dépense:").prompt()?;
    let date = DateSelect::new("Date:")
        .with_default(Local::now().date_naive())
        .prompt()?;
    let amount = Text::new("Montant TTC (€):").prompt()?;
    let vat_amount = Text::new("TVA (€):").prompt()?;
    let vat_percent = Text::new("TVA (%):").with_default("20").prompt()?;
    let commentary = Text::new("Commentaire (optional):").prompt()?;

    Ok(RawBillFields {
        expense_type: expense_type.to_string(),
        expense_name,
        amount,
        date: date.format("%Y-%m-%d").to_string(),
        vat_amount,
        vat_percent,
        commentary,
    })
}

async fn new_bill(router: &Router, file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let attached = AttachedFile::new(file.to_string_lossy(), guess_mime(file), bytes);

    let mut form = router.new_bill_form();
    if let AttachmentState::Invalid(err) = form.handle_file_selection(attached) {
        println!("❌ {}", err);
        return Ok(());
    }

    let input = NewBillInput::parse(prompt_fields()?)?;
    let submission = form.submit(input);

    // The form has already moved on; report the store's answer once it lands.
    match submission.settled().await {
        Some(Ok(())) => println!("✅ Bill sent."),
        Some(Err(e)) => println!("❌ {}", e),
        None => println!("❌ Bill not sent."),
    }
    Ok(())
}

// ==========================================
// 3. Config
// ==========================================

fn setup_config_wizard() -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let current = config::load_settings()?.unwrap_or_default();

    let data_root = Text::new("Data Directory:")
        .with_default(&current.data_root)
        .prompt()?;
    let attachment_base_url = Text::new("Attachment base URL:")
        .with_default(&current.attachment_base_url)
        .prompt()?;

    let settings = AppSettings { data_root, attachment_base_url };
    config::save_settings(&settings)?;
    println!("✅ Settings saved to {}", config::get_config_path().display());
    Ok(settings)
}
