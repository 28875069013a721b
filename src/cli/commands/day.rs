use std::path::PathBuf;

use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::core::format::{money, two_decimals};
use crate::core::services::{DaySummary, SummaryService};
use crate::domain::Totals;
use crate::errors::LedgerError;

use super::sale::describe_sale;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("today", "Show today's totals", "today", cmd_today),
        CommandEntry::new(
            "history",
            "Show grand totals and every day, newest first",
            "history",
            cmd_history,
        ),
        CommandEntry::new(
            "new-day",
            "Reset today's record to zero",
            "new-day",
            cmd_new_day,
        ),
        CommandEntry::new(
            "export",
            "Export today's sales to GasSales_<date>.csv",
            "export [directory]",
            cmd_export,
        ),
        CommandEntry::new(
            "backups",
            "List ledger snapshots taken before day resets",
            "backups",
            cmd_backups,
        ),
    ]
}

fn print_totals(totals: &Totals, transactions: Option<usize>) {
    output::detail(format!("Total KG: {}", two_decimals(totals.kg)));
    output::detail(format!("Total Amount: {}", money(totals.amount)));
    output::detail(format!("Total Profit: {}", money(totals.profit)));
    if let Some(count) = transactions {
        output::detail(format!("Total Transactions: {}", count));
    }
}

pub(crate) fn print_today(context: &ShellContext) -> CommandResult {
    let today = context.manager.today();
    context.manager.get_or_create_today()?;
    let ledger = context.manager.load();
    let day = SummaryService::day(&ledger, today).ok_or(LedgerError::UnknownDay(today))?;
    output::section(format!("Date: {}", today));
    print_totals(&day.totals, Some(day.transactions));
    Ok(())
}

fn print_day(day: &DaySummary<'_>) {
    output::section(day.date);
    print_totals(&day.totals, Some(day.transactions));
    for (index, sale) in &day.sales {
        output::detail(format!("#{} {}", index + 1, describe_sale(sale)));
    }
}

fn cmd_today(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(context.usage_error("today"));
    }
    print_today(context)
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(context.usage_error("history"));
    }
    let ledger = context.manager.load();
    output::section("Grand Total Across All Days");
    print_totals(&SummaryService::aggregate_all(&ledger), None);
    for day in SummaryService::history(&ledger) {
        print_day(&day);
    }
    Ok(())
}

fn cmd_new_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(context.usage_error("new-day"));
    }
    if !context.confirm("Start a new business day?")? {
        output::info("New day cancelled.");
        return Ok(());
    }
    let report = context.manager.start_new_day()?;
    if report.discarded_sales > 0 {
        output::warning(format!(
            "Discarded {} sale(s) recorded on {}.",
            report.discarded_sales, report.date
        ));
    }
    if let Some(backup) = report.backup {
        output::hint(format!("Previous ledger saved as backup `{}`.", backup));
    }
    output::success("Started a new business day.");
    print_today(context)
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => PathBuf::from("."),
        [dir] => PathBuf::from(*dir),
        _ => return Err(context.usage_error("export")),
    };
    if !context.confirm("Export today's sales to CSV?")? {
        output::info("Export cancelled.");
        return Ok(());
    }
    let path = context.manager.export_today(&dir)?;
    output::success(format!("Exported today's sales to {}", path.display()));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(context.usage_error("backups"));
    }
    let backups = context.manager.storage().list_backups()?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    output::section("Backups (newest first)");
    for name in backups {
        output::detail(name);
    }
    Ok(())
}
