//! Paradex trade run
//!
//! onboard → authenticate → create order → list open orders → account info,
//! with every step's outcome recorded. Onboarding is advisory (already
//! onboarded accounts are rejected by the exchange); an authentication
//! failure skips every later step.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::errors::ExchangeResult;
use crate::adapters::paradex::{OrderIntent, ParadexAccount, ParadexClient};

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Onboard,
    Authenticate,
    CreateOrder,
    ListOrders,
    AccountInfo,
}

impl FlowStep {
    /// Steps whose failure fails the run
    pub fn is_required(&self) -> bool {
        !matches!(self, FlowStep::Onboard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Ok,
    Failed,
    Skipped,
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: FlowStep,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ordered outcomes of a trade run
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowReport {
    pub steps: Vec<StepOutcome>,
}

impl FlowReport {
    fn record(&mut self, step: FlowStep, result: ExchangeResult<Value>) -> bool {
        let outcome = match result {
            Ok(data) => StepOutcome {
                step,
                status: StepStatus::Ok,
                data: Some(data),
                error: None,
            },
            Err(e) => {
                if step.is_required() {
                    error!(step = ?step, error = %e, "Paradex step failed");
                } else {
                    warn!(step = ?step, error = %e, "Paradex step failed, continuing");
                }
                StepOutcome {
                    step,
                    status: StepStatus::Failed,
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        };
        let ok = outcome.status == StepStatus::Ok;
        self.steps.push(outcome);
        ok
    }

    fn skip(&mut self, step: FlowStep) {
        self.steps.push(StepOutcome {
            step,
            status: StepStatus::Skipped,
            data: None,
            error: None,
        });
    }

    /// First required step that failed
    pub fn failed_step(&self) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Failed && s.step.is_required())
    }

    /// True when every required step succeeded
    pub fn is_success(&self) -> bool {
        self.failed_step().is_none()
    }

    pub fn outcome(&self, step: FlowStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step)
    }
}

// =============================================================================
// Flows
// =============================================================================

/// Run the full Paradex trade sequence for `account` and `intent`
///
/// The JWT obtained here lives only in the local copy of the account.
pub async fn run_paradex_trade(
    client: &ParadexClient,
    account: &ParadexAccount,
    intent: &OrderIntent,
) -> FlowReport {
    let mut account = account.clone();
    account.jwt_token = None;
    let mut report = FlowReport::default();

    info!(
        account = %account.address,
        market = %intent.market,
        side = intent.side.as_str(),
        "Starting Paradex trade run"
    );

    report.record(FlowStep::Onboard, client.onboard_user(&account).await);

    let auth = client.authenticate(&mut account).await.map(|_| Value::Null);
    if !report.record(FlowStep::Authenticate, auth) {
        for step in [FlowStep::CreateOrder, FlowStep::ListOrders, FlowStep::AccountInfo] {
            report.skip(step);
        }
        return report;
    }

    report.record(FlowStep::CreateOrder, client.create_order(&account, intent).await);
    report.record(FlowStep::ListOrders, client.get_open_orders(&account).await);
    report.record(FlowStep::AccountInfo, client.get_account_info(&account).await);

    info!(success = report.is_success(), "Paradex trade run finished");
    report
}

/// Authenticate, then cancel all open orders (optionally in one market)
pub async fn cancel_all_orders(
    client: &ParadexClient,
    account: &ParadexAccount,
    market: Option<&str>,
) -> ExchangeResult<Value> {
    let mut account = account.clone();
    client.authenticate(&mut account).await?;
    client.cancel_all_open_orders(&account, market).await
}
