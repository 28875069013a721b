use crate::cli::core::{parse_date, parse_sale_number, CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::core::format::{money, two_decimals};
use crate::core::services::SaleService;
use crate::domain::{InputMode, Sale};
use crate::errors::LedgerError;

use super::day::print_today;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "sell",
            "Register a sale using the current input mode",
            "sell <amount|kg>",
            cmd_sell,
        ),
        CommandEntry::new(
            "quote",
            "Preview a sale without recording it",
            "quote <amount|kg>",
            cmd_quote,
        ),
        CommandEntry::new("undo", "Undo today's last sale", "undo", cmd_undo),
        CommandEntry::new(
            "delete",
            "Delete one sale from any day",
            "delete <YYYY-MM-DD> <#>",
            cmd_delete,
        ),
    ]
}

pub(crate) fn describe_sale(sale: &Sale) -> String {
    format!(
        "{} - {}kg | {} | Profit: {}",
        sale.time,
        two_decimals(sale.weight),
        money(sale.amount),
        money(sale.profit)
    )
}

fn cmd_sell(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(context.usage_error("sell"));
    };
    let value = SaleService::parse_quantity(raw)?;
    if !context.confirm("Do you really want to register this sale?")? {
        output::info("Sale cancelled.");
        return Ok(());
    }
    let sale = context.manager.sell(
        value,
        context.settings.input_mode,
        &context.settings.pricing(),
    )?;
    output::success(format!("Sale recorded: {}", describe_sale(&sale)));
    print_today(context)
}

fn cmd_quote(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(context.usage_error("quote"));
    };
    let value = SaleService::parse_quantity(raw)?;
    let mode = context.settings.input_mode;
    let quote = SaleService::quote(value, mode, &context.settings.pricing())?;
    match mode {
        InputMode::Money => output::info(format!("Stop at: {} KG", two_decimals(quote.weight))),
        InputMode::Weight => {
            output::info(format!("Customer should pay: {}", money(quote.amount)))
        }
    }
    Ok(())
}

fn cmd_undo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(context.usage_error("undo"));
    }
    if !context.confirm("Do you really want to undo the last sale?")? {
        output::info("Undo cancelled.");
        return Ok(());
    }
    let sale = context.manager.undo_last()?;
    output::success(format!("Undid sale: {}", describe_sale(&sale)));
    print_today(context)
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_date, raw_number] = args else {
        return Err(context.usage_error("delete"));
    };
    let date = parse_date(raw_date)?;
    let index = parse_sale_number(raw_number)?;
    if !context.confirm("Delete this sale?")? {
        output::info("Delete cancelled.");
        return Ok(());
    }
    let sale = context
        .manager
        .delete_sale(date, index)
        .map_err(|err| match err {
            LedgerError::IndexOutOfRange { len, .. } => CommandError::InvalidArguments(format!(
                "sale #{} does not exist on {} (day has {} sales)",
                index + 1,
                date,
                len
            )),
            other => other.into(),
        })?;
    output::success(format!("Deleted sale #{} on {}: {}", index + 1, date, describe_sale(&sale)));
    Ok(())
}
