//! Accounts command - list the chart of accounts.

use clap::Args;
use console::style;

use belegscan_core::AccountChart;

/// Arguments for the accounts command.
#[derive(Args)]
pub struct AccountsArgs {
    /// Emit the chart as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: AccountsArgs) -> anyhow::Result<()> {
    let chart = AccountChart::standard();

    if args.json {
        let accounts: Vec<_> = chart.iter().collect();
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    for account in chart.iter() {
        print!(
            "{}  {}",
            style(&account.number).cyan().bold(),
            account.name
        );
        if let Some(description) = &account.description {
            print!("  {}", style(description).dim());
        }
        println!();
    }

    Ok(())
}
