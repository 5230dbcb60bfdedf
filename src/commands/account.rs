//! Login, logout, and whoami handlers

use crate::commands::{api_client, durable_session, print_landing, read_required};
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use rustyline::DefaultEditor;

/// Log in with an existing account, prompting for missing credentials
pub async fn run_login(config: Config, email: Option<String>) -> Result<()> {
    let session = durable_session()?;
    let api = api_client(&config, session)?;
    let mut rl = DefaultEditor::new()?;

    let email = match email {
        Some(email) => email,
        None => match read_required(&mut rl, "Email address: ")? {
            Some(email) => email,
            None => return Ok(()),
        },
    };
    let Some(password) = read_required(&mut rl, "Password: ")? else {
        return Ok(());
    };

    let user = crate::account::login(&api, &email, &password).await?;
    print_landing(&user);
    Ok(())
}

/// Clear the stored session
pub fn run_logout() -> Result<()> {
    let session = durable_session()?;
    crate::account::logout(&session);
    println!("{}", "Logged out.".green());
    Ok(())
}

/// Show the currently authenticated user
pub fn run_whoami() -> Result<()> {
    let session = durable_session()?;
    match session.current_user() {
        Some(user) if session.access_token().is_some() => {
            println!("{} {} <{}>", user.firstname, user.lastname, user.email);
            let kind = user
                .account_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("Account type: {}", kind);
            if let Some(plan) = &user.plan {
                println!("Plan: {}", plan);
            }
            if let Some(business) = &user.business {
                println!("Business: {} ({})", business.business_name, business.business_type);
            }
        }
        _ => {
            println!("{}", "Not logged in.".yellow());
        }
    }
    Ok(())
}
