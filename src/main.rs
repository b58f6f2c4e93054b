mod dashboard;
mod scanner;

use dashboard::filter::FilterOptions;
use dashboard::session::Session;
use dashboard::view;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use scanner::error::ScanError;
use scanner::report::{ScanResult, Severity};

use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut session = Session::new();
    let mut filters = FilterOptions::default();

    // ==============================
    // 🎛 INTERACTIVE MENU LOOP
    // ==============================
    loop {
        let choice = display_menu()?;

        match choice {
            0 => scan_image(&mut session).await?,
            1 => show_summary(&session),
            2 => list_findings(&session, &filters),
            3 => adjust_filters(&mut filters)?,
            4 => browse_findings(&session, &mut filters)?,
            5 => {
                println!("👋 Goodbye!");
                break;
            }
            _ => println!("❌ Invalid choice."),
        }
    }

    Ok(())
}

fn display_menu() -> Result<usize, Box<dyn Error>> {
    println!("\n{}", "=".repeat(80));
    println!("🛡️  VulnLens - Container Security Dashboard");
    println!("{}", "=".repeat(80));

    let items = vec![
        "🛡️ Scan a container image",
        "📊 Show summary metrics",
        "🔍 List filtered findings",
        "🎚 Adjust filters",
        "🖥 Browse findings (interactive)",
        "❌ Quit",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose an option")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(selection)
}

// ==============================
// 🚨 SCAN TRIGGER
// ==============================
async fn scan_image(session: &mut Session) -> Result<(), Box<dyn Error>> {
    let image: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Docker image to scan")
        .default("nginx:1.14".to_string())
        .interact_text()?;

    println!("\n🕵️  Running Trivy against {}...", image);

    // A failed scan never reaches commit, so the previous result (if
    // any) stays addressable for every view below.
    match scanner::invoker::run_scan(&image).await {
        Ok(report) => {
            let records = scanner::normalize::normalize(&report);
            println!("✅ Scan finished: {} findings.", records.len());

            session.commit(ScanResult {
                image,
                scanned_at: chrono::Local::now(),
                records,
            });
        }
        Err(ScanError::EmptyOutput) => {
            println!("⚠️  Trivy returned no output. Keeping the previous result.");
        }
        Err(e) => {
            println!("❌ {}", e);
        }
    }

    Ok(())
}

fn show_summary(session: &Session) {
    match session.current() {
        Some(result) => view::print_summary(result),
        None => println!("👈 Run a scan first to populate the dashboard."),
    }
}

fn list_findings(session: &Session, filters: &FilterOptions) {
    match session.current() {
        Some(result) => view::print_findings(result, filters),
        None => println!("👈 Run a scan first to populate the dashboard."),
    }
}

fn browse_findings(
    session: &Session,
    filters: &mut FilterOptions,
) -> Result<(), Box<dyn Error>> {
    match session.current() {
        Some(result) => view::browse(result, filters),
        None => {
            println!("👈 Run a scan first to populate the dashboard.");
            Ok(())
        }
    }
}

// ==============================
// 🎚 FILTER CONTROLS
// ==============================
fn adjust_filters(filters: &mut FilterOptions) -> Result<(), Box<dyn Error>> {
    let labels: Vec<&str> = Severity::ALL.iter().map(|s| s.label()).collect();
    let checked: Vec<bool> = Severity::ALL
        .iter()
        .map(|s| filters.severities.contains(s))
        .collect();

    let picked = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Severities to show (empty = all)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;

    filters.severities = picked.into_iter().map(|i| Severity::ALL[i]).collect();

    filters.fixable_only = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Show only findings with a fix available?")
        .default(filters.fixable_only)
        .interact()?;

    println!("🎚  Active filter: {}", filters.describe());
    Ok(())
}
