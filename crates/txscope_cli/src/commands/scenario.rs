//! Scenario command implementation.

use crate::demo::{Account, AuditMode, Bank};
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;
use txscope_core::{Config, NestedFailurePolicy, Propagation};
use txscope_store::StoreCall;

/// Propagation scenarios the CLI can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// REQUIRED inside REQUIRED: one atomic write
    A,
    /// REQUIRES_NEW inside REQUIRED: inner write lands first
    B,
    /// Committing the same transaction twice
    C,
    /// Committing a transaction that recorded nothing
    D,
    /// A REQUIRES_NEW call fails inside a REQUIRED one
    NestedFailure,
}

/// Scenario result for output.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub scenario: String,
    /// What the caller observed.
    pub outcome: String,
    /// Every call the store received, in order.
    pub calls: Vec<StoreCall>,
}

/// Runs the scenario command.
pub fn run(
    scenario: Scenario,
    commit_enclosing: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if commit_enclosing {
        NestedFailurePolicy::CommitEnclosing
    } else {
        NestedFailurePolicy::Propagate
    };
    let bank = Bank::new(Config::new().nested_failure_policy(policy));
    info!("Running scenario {:?} ({:?})", scenario, policy);

    let outcome = execute(&bank, scenario);
    let report = ScenarioReport {
        scenario: format!("{scenario:?}"),
        outcome,
        calls: bank.store.calls(),
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_text_output(&report);
        }
    }

    Ok(())
}

fn execute(bank: &Bank, scenario: Scenario) -> String {
    let mut alice = Account::new("alice", 100);
    let mut bob = Account::new("bob", 20);

    let result = match scenario {
        Scenario::A | Scenario::B | Scenario::NestedFailure => {
            let mode = AuditMode {
                propagation: if scenario == Scenario::A {
                    Propagation::Required
                } else {
                    Propagation::RequiresNew
                },
                reject: scenario == Scenario::NestedFailure,
            };
            bank.transfer(&mut alice, &mut bob, 30, mode)
                .map_err(|e| e.to_string())
        }
        Scenario::C => {
            let manager = bank.tx.factory().create();
            manager
                .save(bank.accounts.table(), &alice)
                .and_then(|()| manager.commit())
                .and_then(|()| manager.commit())
                .map_err(|e| e.to_string())
        }
        Scenario::D => bank
            .tx
            .factory()
            .create()
            .commit()
            .map_err(|e| e.to_string()),
    };

    match result {
        Ok(()) => "ok".to_string(),
        Err(message) => format!("error: {message}"),
    }
}

fn print_text_output(report: &ScenarioReport) {
    println!("Scenario: {}", report.scenario);
    println!("Outcome:  {}", report.outcome);
    println!("Store calls: {}", report.calls.len());

    for (n, call) in report.calls.iter().enumerate() {
        match call {
            StoreCall::PutItem { table, key } => {
                println!("  #{n} PutItem {table} {key}");
            }
            StoreCall::DeleteItem { table, key } => {
                println!("  #{n} DeleteItem {table} {key}");
            }
            StoreCall::TransactWriteItems { operations } => {
                println!("  #{n} TransactWriteItems ({} ops)", operations.len());
                for op in operations {
                    println!("       {op}");
                }
            }
        }
    }
}
