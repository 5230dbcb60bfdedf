//! Interactive registration flow handler
//!
//! Drives the step machine from a readline loop. Each iteration checks
//! the step's entry guard, prompts for that step's input, and advances
//! (or stays put on a recoverable error).

use crate::api::types::{AccountType, BusinessDetails};
use crate::commands::{api_client, durable_session, read_line, read_required};
use crate::config::Config;
use crate::error::{format_error, Result};
use crate::flow::{
    FlowStep, RegisterOutcome, RegistrationFlow, RegistrationForm, ResendCooldown, StepEntry,
    DEFAULT_PLAN,
};
use crate::store::{MemoryStore, SessionDraft};
use colored::Colorize;
use rustyline::DefaultEditor;
use std::sync::Arc;

/// Walk the user through the registration flow
pub async fn run(config: Config) -> Result<()> {
    let session = durable_session()?;
    if session.is_authenticated() {
        println!(
            "{}",
            "You are already logged in. Run `echoledger logout` to register a new account."
                .yellow()
        );
        return Ok(());
    }

    let api = api_client(&config, session)?;
    let draft = SessionDraft::new(Arc::new(MemoryStore::new()));
    let flow = RegistrationFlow::new(api.clone(), draft);
    let mut rl = DefaultEditor::new()?;
    let mut cooldown = ResendCooldown::new();
    let mut step = FlowStep::AccountType;

    println!("{}", "Echo Ledger account registration".bold());
    println!("Press Ctrl-C at any prompt to abort.\n");

    loop {
        if let StepEntry::Redirect(target) = flow.entry(step, None) {
            println!("{}", format!("Returning to {}.", target).yellow());
            step = target;
            continue;
        }

        step = match step {
            FlowStep::AccountType => {
                let Some(choice) = prompt_account_type(&mut rl)? else {
                    return Ok(());
                };
                flow.choose_account_type(choice)
            }

            FlowStep::PlanSelection => {
                show_plans(&api).await;
                let Some(input) =
                    read_line(&mut rl, &format!("Plan id (empty for {}): ", DEFAULT_PLAN))?
                else {
                    return Ok(());
                };
                if input.is_empty() {
                    flow.skip_plan()
                } else {
                    flow.select_plan(&input)
                }
            }

            FlowStep::EmailVerification => {
                let Some(email) = read_required(&mut rl, "Email address: ")? else {
                    return Ok(());
                };
                match flow.submit_email(&email).await {
                    Ok(next) => {
                        println!("{}", format!("A verification code was sent to {}.", email).green());
                        if config.dev_mode {
                            if let Some(otp) = flow.draft().issued_otp() {
                                println!("{}", format!("Dev backend echoed OTP: {}", otp).cyan());
                            }
                        }
                        next
                    }
                    Err(e) => {
                        println!("{}", format_error(&e).red());
                        FlowStep::EmailVerification
                    }
                }
            }

            FlowStep::OtpVerification => {
                let Some(input) = read_required(&mut rl, "6-digit code ('r' to resend): ")? else {
                    return Ok(());
                };
                if input.eq_ignore_ascii_case("r") {
                    match flow.resend_code(&mut cooldown).await {
                        Ok(()) => println!("{}", "Code resent.".green()),
                        Err(e) => println!("{}", format_error(&e).red()),
                    }
                    FlowStep::OtpVerification
                } else {
                    match flow.verify_code(&input).await {
                        Ok(next) => {
                            println!("{}", "Code verified.".green());
                            next
                        }
                        Err(e) => {
                            println!("{}", format_error(&e).red());
                            FlowStep::OtpVerification
                        }
                    }
                }
            }

            FlowStep::Register => {
                let account_type = flow.draft().account_type();
                let Some(form) = collect_form(&mut rl, account_type)? else {
                    return Ok(());
                };
                match flow.register(form).await {
                    Ok(RegisterOutcome::Authenticated(user)) => {
                        crate::commands::print_landing(&user);
                        FlowStep::Authenticated
                    }
                    Ok(RegisterOutcome::Redirect(target)) => target,
                    Err(e) => {
                        println!("{}", format_error(&e).red());
                        FlowStep::Register
                    }
                }
            }

            FlowStep::Authenticated => break,
        };
    }

    Ok(())
}

fn prompt_account_type(rl: &mut DefaultEditor) -> Result<Option<AccountType>> {
    println!("  1) Personal — manage your own finances");
    println!("  2) Business — manage company finances");
    loop {
        let Some(input) = read_required(rl, "Account type [1/2]: ")? else {
            return Ok(None);
        };
        match input.as_str() {
            "1" => return Ok(Some(AccountType::Personal)),
            "2" => return Ok(Some(AccountType::Business)),
            other => {
                if let Some(parsed) = AccountType::parse_str(other) {
                    return Ok(Some(parsed));
                }
                println!("{}", "Enter 1 or 2.".yellow());
            }
        }
    }
}

async fn show_plans(api: &crate::api::ApiClient) {
    match api.list_plans().await {
        Ok(envelope) => {
            if let Some(plans) = envelope.into_payload() {
                crate::commands::plans::print_plans(&plans);
            }
        }
        Err(e) => {
            // The plan table is informational; a fetch failure does not
            // block the step.
            tracing::warn!("Could not fetch plans: {}", e);
            println!("{}", format_error(&e).yellow());
        }
    }
}

fn collect_form(
    rl: &mut DefaultEditor,
    account_type: Option<AccountType>,
) -> Result<Option<RegistrationForm>> {
    let Some(firstname) = read_required(rl, "First name: ")? else {
        return Ok(None);
    };
    let Some(lastname) = read_required(rl, "Last name: ")? else {
        return Ok(None);
    };
    let Some(password) = read_required(rl, "Password: ")? else {
        return Ok(None);
    };
    let Some(confirm_password) = read_required(rl, "Confirm password: ")? else {
        return Ok(None);
    };

    let mut form = RegistrationForm {
        firstname,
        lastname,
        password,
        confirm_password,
        ..Default::default()
    };

    match account_type {
        Some(AccountType::Business) => {
            let Some(business_name) = read_required(rl, "Business name: ")? else {
                return Ok(None);
            };
            let Some(business_type) = read_required(rl, "Business type: ")? else {
                return Ok(None);
            };
            let Some(employees) = read_line(rl, "Employee count (optional): ")? else {
                return Ok(None);
            };
            form.business = Some(BusinessDetails {
                business_name,
                business_type,
                employee_count: employees.parse().ok(),
            });
        }
        _ => {
            let Some(ai_name) = read_line(rl, "Assistant name (optional): ")? else {
                return Ok(None);
            };
            let Some(ai_role) = read_line(rl, "Assistant persona (optional): ")? else {
                return Ok(None);
            };
            form.ai_name = Some(ai_name).filter(|s| !s.is_empty());
            form.ai_role = Some(ai_role).filter(|s| !s.is_empty());
        }
    }

    Ok(Some(form))
}
