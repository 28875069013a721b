use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::core::format::money;
use crate::domain::InputMode;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "mode",
            "Show or switch between selling by money and by weight",
            "mode [money|weight]",
            cmd_mode,
        ),
        CommandEntry::new(
            "price",
            "Show or set the selling and cost price per KG",
            "price [sell|cost <value>]",
            cmd_price,
        ),
    ]
}

fn cmd_mode(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [raw] => {
            context.settings.input_mode = raw.parse::<InputMode>()?;
            context.save_settings()?;
        }
        _ => return Err(context.usage_error("mode")),
    }
    let hint = match context.settings.input_mode {
        InputMode::Money => "enter amounts",
        InputMode::Weight => "enter KG",
    };
    output::info(format!(
        "Input mode: {} ({})",
        context.settings.input_mode, hint
    ));
    Ok(())
}

fn cmd_price(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [field, raw] => {
            let value = raw.trim().parse::<f64>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{}` is not a number", raw))
            })?;
            match field.to_ascii_lowercase().as_str() {
                "sell" | "selling" => context.settings.set_selling_price(value)?,
                "cost" => context.settings.set_cost_price(value)?,
                _ => return Err(context.usage_error("price")),
            }
            context.save_settings()?;
        }
        _ => return Err(context.usage_error("price")),
    }
    output::info(format!(
        "Selling price: {} per KG",
        money(context.settings.selling_price_per_kg)
    ));
    output::info(format!(
        "Cost price: {} per KG",
        money(context.settings.cost_price_per_kg)
    ));
    Ok(())
}
