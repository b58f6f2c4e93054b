use colored::Colorize;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

use crate::dashboard::aggregate;
use crate::dashboard::filter::{self, FilterOptions};
use crate::scanner::report::{ScanResult, Severity, VulnRecord};

const BAR_MAX: usize = 40;

/// Summary panel: headline metrics, severity distribution and the
/// riskiest packages. Always computed over the full record set; only
/// the findings listing respects the active filter.
pub fn print_summary(result: &ScanResult) {
    println!("\n{}", "=".repeat(80));
    println!("🛡️  Container Security Dashboard");
    println!("{}", "=".repeat(80));
    println!(
        "📦 Image: {} | 🕐 Scanned: {}",
        result.image,
        result.scanned_at.format("%d-%m-%Y %H:%M")
    );

    if result.records.is_empty() {
        println!("\n🎉 Clean! No vulnerabilities found in this image.");
        println!("{}", "=".repeat(80));
        return;
    }

    let summary = aggregate::aggregate(&result.records);

    println!(
        "\n📈 Total: {}   🔥 Critical: {}   ⚠️  High: {}   🔧 Fixable: {}",
        summary.total,
        summary.by_severity[&Severity::Critical],
        summary.by_severity[&Severity::High],
        summary.fixable
    );

    println!("\n📊 Severity distribution:");
    for (severity, count) in &summary.by_severity {
        let label = format!("{:>8}", severity.label()).color(severity.color());
        let bar = "█".repeat((*count).min(BAR_MAX)).color(severity.color());
        println!("  {} : {} ({})", label, bar, count);
    }

    println!("\n📦 Riskiest packages:");
    for (name, count) in &summary.top_packages {
        let bar = "█".repeat((*count).min(BAR_MAX));
        println!("  {:<24} {} ({})", name, bar, count);
    }

    println!("{}", "=".repeat(80));
}

/// Flat listing of the findings that pass the active filter.
pub fn print_findings(result: &ScanResult, options: &FilterOptions) {
    let filtered = filter::apply(&result.records, options);

    println!(
        "\n🔍 {} of {} findings match: {}",
        filtered.len(),
        result.records.len(),
        options.describe()
    );

    if filtered.is_empty() {
        println!("   Nothing matches the active filter.");
        return;
    }

    for record in &filtered {
        let tag = format!("[{:^8}]", record.severity.label()).color(record.severity.color());
        println!(
            "\n{} {}  {} {}",
            tag,
            record.id_display(),
            record.package,
            record.installed_version
        );
        println!("   🎯 Target: {} ({})", record.target, record.target_type);
        println!("   🔧 Fix: {}", record.fixed_version_display());

        let first_line = record.description_display().lines().next().unwrap_or("");
        println!("   💬 {}", first_line);
        println!("{}", "─".repeat(80));
    }
}

/// Interactive raw-mode browser over the retained scan result. Filter
/// toggles re-run the pure filter on the session records; the scanner
/// is never re-invoked from here.
pub fn browse(
    result: &ScanResult,
    options: &mut FilterOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();

    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    enable_raw_mode()?;

    // The terminal is restored even when the loop errors out.
    let outcome = browse_loop(&mut stdout, result, options);

    disable_raw_mode()?;
    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;

    outcome
}

fn browse_loop(
    stdout: &mut io::Stdout,
    result: &ScanResult,
    options: &mut FilterOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut selected = 0usize;
    let mut filtered = filter::apply(&result.records, options);

    redraw(stdout, result, &filtered, options, selected)?;

    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let mut state_changed = false;

            match key.code {
                KeyCode::Char('q') => break,

                KeyCode::Up => {
                    if selected > 0 {
                        selected -= 1;
                        state_changed = true;
                    }
                }

                KeyCode::Down => {
                    if selected + 1 < filtered.len() {
                        selected += 1;
                        state_changed = true;
                    }
                }

                KeyCode::Char(c @ ('c' | 'h' | 'm' | 'l' | 'u' | 'f')) => {
                    if c == 'f' {
                        options.fixable_only = !options.fixable_only;
                    } else {
                        options.toggle_severity(severity_for_key(c));
                    }

                    filtered = filter::apply(&result.records, options);
                    if selected >= filtered.len() {
                        selected = filtered.len().saturating_sub(1);
                    }
                    state_changed = true;
                }

                KeyCode::Enter => {
                    if let Some(record) = filtered.get(selected) {
                        show_detail(stdout, record)?;
                        state_changed = true;
                    }
                }

                _ => {}
            }

            if state_changed {
                redraw(stdout, result, &filtered, options, selected)?;
            }
        }
    }

    Ok(())
}

fn severity_for_key(key: char) -> Severity {
    match key {
        'c' => Severity::Critical,
        'h' => Severity::High,
        'm' => Severity::Medium,
        'l' => Severity::Low,
        _ => Severity::Unknown,
    }
}

fn redraw(
    stdout: &mut io::Stdout,
    result: &ScanResult,
    filtered: &[VulnRecord],
    options: &FilterOptions,
    selected: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    execute!(stdout, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    render(stdout, result, filtered, options, selected)?;
    stdout.flush()?;
    Ok(())
}

fn render(
    stdout: &mut io::Stdout,
    result: &ScanResult,
    filtered: &[VulnRecord],
    options: &FilterOptions,
    selected: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = size()?;
    let width = width as usize;
    let height = height as usize;

    if width < 60 || height < 12 {
        write!(stdout, "Terminal too small. Please resize the window.")?;
        return Ok(());
    }

    let mut output = String::new();

    output.push_str(&format!("{}\r\n", "=".repeat(width)));
    output.push_str(&format!(
        "🛡️  {}  |  scanned {}\r\n",
        result.image,
        result.scanned_at.format("%d-%m-%Y %H:%M")
    ));
    output.push_str(&format!(
        "🔍 {} of {} findings  |  filter: {}\r\n",
        filtered.len(),
        result.records.len(),
        options.describe()
    ));
    output.push_str(&format!("{}\r\n\r\n", "=".repeat(width)));

    let header_lines = 5;
    let footer_lines = 4;
    let available_height = height
        .saturating_sub(header_lines + footer_lines)
        .max(1);

    if filtered.is_empty() {
        output.push_str("  Nothing matches the active filter.\r\n");
    } else {
        let half = available_height / 2;
        let start = selected.saturating_sub(half);
        let end = (start + available_height).min(filtered.len());

        for index in start..end {
            let record = &filtered[index];
            let pointer = if index == selected { "→ " } else { "  " };

            let severity =
                format!("{:>8}", record.severity.label()).color(record.severity.color());
            let fix_mark = if record.is_fixable() { "🔧" } else { "  " };

            // Only the severity column carries color codes, so the tail
            // can be truncated on visible length.
            let mut tail = format!(
                "{:<18} {} {} {}",
                record.id_display(),
                fix_mark,
                record.package,
                record.installed_version
            );
            let tail_budget = width.saturating_sub(12);
            if tail.chars().count() > tail_budget {
                tail = tail.chars().take(tail_budget.saturating_sub(1)).collect();
            }

            output.push_str(&format!("{}{} {}\r\n", pointer, severity, tail));
        }
    }

    output.push_str(&format!("\r\n{}\r\n", "─".repeat(width)));
    output.push_str("💡 Controls:\r\n");
    output.push_str("   ↑/↓: Navigate | Enter: Details | c/h/m/l/u: Toggle severity\r\n");
    output.push_str("   f: Fixable only | q: Quit\r\n");

    write!(stdout, "{}", output)?;
    Ok(())
}

fn show_detail(
    stdout: &mut io::Stdout,
    record: &VulnRecord,
) -> Result<(), Box<dyn std::error::Error>> {
    execute!(stdout, cursor::MoveTo(0, 0), Clear(ClearType::All))?;

    let (width, _) = size()?;
    let width = width as usize;

    let mut output = String::new();

    output.push_str(&format!("{}\r\n", "=".repeat(width)));
    output.push_str(&format!("🔍 {}\r\n", record.id_display()));
    output.push_str(&format!("{}\r\n\r\n", "=".repeat(width)));

    let severity = record.severity.label().color(record.severity.color());
    output.push_str(&format!("   Severity:  {}\r\n", severity));
    output.push_str(&format!(
        "   Package:   {} {}\r\n",
        record.package, record.installed_version
    ));
    output.push_str(&format!("   Fix:       {}\r\n", record.fixed_version_display()));
    output.push_str(&format!(
        "   Target:    {} ({})\r\n",
        record.target, record.target_type
    ));

    output.push_str("\r\n   Description:\r\n");
    for line in wrap(record.description_display(), width.saturating_sub(6)) {
        output.push_str(&format!("   {}\r\n", line));
    }

    output.push_str(&format!("\r\n{}\r\n", "─".repeat(width)));
    output.push_str("💡 Press any key to go back.\r\n");

    write!(stdout, "{}", output)?;
    stdout.flush()?;

    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                break;
            }
        }
    }

    Ok(())
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(20);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();

        for word in raw_line.split_whitespace() {
            if !current.is_empty()
                && current.chars().count() + word.chars().count() + 1 > width
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_splits_on_word_boundaries() {
        let lines = wrap("one two three four five six seven", 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn wrap_of_empty_text_yields_one_blank_line() {
        assert_eq!(wrap("", 40), vec![String::new()]);
    }
}
