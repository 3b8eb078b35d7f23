//! Plain-text rendering of recipes, plans and optimizer results.

use std::fmt::{self, Write as _};

use rust_decimal::{prelude::FromPrimitive as _, Decimal};

use crate::{
    aggregate::Report,
    entities::{Item, Rate, Recipe},
    error::{FactoryError, FactoryResult},
    optimizer::Optimization,
};

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.kind)?;
        if self.is_manual() {
            writeln!(f, "   Manual: x {}", self.time.as_secs_f64())?;
        } else {
            writeln!(f, "   {} ({} secs)", self.machine, self.time.as_secs_f64())?;
        }

        writeln!(f, "   Outputs:")?;
        for output in &self.outputs {
            writeln!(
                f,
                "     {} x{} ({} / min)",
                output.item, output.quantity, output.rate
            )?;
        }

        write!(f, "   Inputs:")?;
        for input in &self.inputs {
            write!(
                f,
                "\n     {} x{} ({} / min)",
                input.item, input.quantity, input.rate
            )?;
        }

        Ok(())
    }
}

/// Round an amount to two decimals for display.
pub fn rounded(amount: Rate) -> FactoryResult<Decimal> {
    // Avoids rendering -0.00
    let amount = if amount == 0.0 { 0.0 } else { amount };

    Decimal::from_f64(amount)
        .map(|decimal| decimal.round_dp(2))
        .ok_or(FactoryError::CantRepresentAmountAsDecimal(amount))
}

fn amounts_table(out: &mut String, title: &str, rows: &[(&Item, Rate)]) -> FactoryResult<()> {
    writeln!(out, "{title}")?;
    if rows.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (item, amount) in rows {
        writeln!(out, "  {:<40} {:>12.2}", item.name, rounded(*amount)?)?;
    }
    writeln!(out)?;

    Ok(())
}

pub fn render_plan(report: &Report) -> FactoryResult<String> {
    let mut out = String::new();

    amounts_table(&mut out, "Base ingredients", &report.base_ingredients)?;
    amounts_table(&mut out, "All ingredients", &report.ingredients)?;

    writeln!(out, "Total machines")?;
    writeln!(
        out,
        "  {:<30} {:>16} {:>16}",
        "Machine", "No overclock", "+1 crystal"
    )?;
    for total in &report.machine_totals {
        writeln!(
            out,
            "  {:<30} {:>16} {:>16}",
            total.machine.name, total.no_overclock, total.with_crystal
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Machines per recipe")?;
    writeln!(
        out,
        "  {:<24} {:<30} {:>8} {:>14} {:>12}",
        "Machine", "Recipe", "Usage", "No overclock", "+1 crystal"
    )?;
    for usage in &report.recipe_usage {
        writeln!(
            out,
            "  {:<24} {:<30} {:>8.2} {:>14} {:>12}",
            usage.machine.name,
            usage.recipe.name,
            rounded(usage.usage)?,
            usage.machines_no_overclock(),
            usage.machines_with_crystal()
        )?;
    }

    Ok(out)
}

pub fn render_optimization(optimization: &Optimization) -> FactoryResult<String> {
    let mut out = String::new();

    match optimization {
        Optimization::NotApplicable => {
            writeln!(out, "Not applicable: give at least one input and one output")?
        }
        Optimization::Infeasible => writeln!(out, "No feasible plan")?,
        Optimization::Solved(plan) => {
            amounts_table(&mut out, "Required ingredients", &plan.needed)?;
            amounts_table(&mut out, "Remaining items", &plan.remaining)?;
            amounts_table(&mut out, "Output items", &plan.produced)?;
        }
    }

    Ok(out)
}
