//! Subscription plan listing handler

use crate::api::types::Plan;
use crate::commands::{api_client, durable_session};
use crate::config::Config;
use crate::error::Result;
use prettytable::{row, Table};

/// Fetch and print the available subscription plans
pub async fn run(config: Config) -> Result<()> {
    let session = durable_session()?;
    let api = api_client(&config, session)?;

    let plans = api.list_plans().await?.require_payload()?;
    print_plans(&plans);
    Ok(())
}

/// Render the plan table
pub(crate) fn print_plans(plans: &[Plan]) {
    let mut table = Table::new();
    table.add_row(row!["ID", "NAME", "PRICE", "FEATURES"]);
    for plan in plans {
        table.add_row(row![
            plan.plan,
            plan.name,
            format!("{:.2} {}", plan.price, plan.currency),
            plan.features.join(", "),
        ]);
    }
    table.printstd();
}
