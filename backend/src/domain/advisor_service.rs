//! AI financial advisor.
//!
//! Builds a compact JSON context out of a budget (totals, recent
//! transactions, goals) and sends it to the Gemini `generateContent`
//! endpoint together with either a free-form question or a standing
//! analysis prompt. Without a configured API key every call fails fast
//! with a configuration error instead of reaching the network.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::budget_service::BudgetService;
use crate::domain::report_service::summarize;
use crate::storage::{DbConnection, GoalRepository, TransactionRepository};
use shared::AdvisorReply;

/// Most recent transactions included in the advisor context; keeps the
/// request payload bounded.
const MAX_CONTEXT_TRANSACTIONS: usize = 50;

/// Configuration for the Gemini-backed advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// API key; advice endpoints answer 503 while this is unset.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ContextTransaction {
    label: String,
    amount: f64,
    kind: String,
    date: String,
    category: String,
}

#[derive(Debug, Serialize)]
struct ContextGoal {
    name: String,
    target_amount: f64,
    current_amount: f64,
}

#[derive(Debug, Serialize)]
struct AdvisorContext {
    total_income: f64,
    total_expense: f64,
    balance: f64,
    transactions: Vec<ContextTransaction>,
    goals: Vec<ContextGoal>,
}

/// Service answering financial questions about a budget.
#[derive(Clone)]
pub struct AdvisorService {
    config: AdvisorConfig,
    client: reqwest::Client,
    transaction_repository: TransactionRepository,
    goal_repository: GoalRepository,
    budget_service: BudgetService,
}

impl AdvisorService {
    pub fn new(db: DbConnection, budget_service: BudgetService, config: AdvisorConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            transaction_repository: TransactionRepository::new(db.clone()),
            goal_repository: GoalRepository::new(db),
            budget_service,
        }
    }

    /// Answer a free-form question using the budget's data as context.
    pub async fn ask(&self, budget_id: &str, question: &str) -> Result<AdvisorReply> {
        let question = question.trim();
        if question.is_empty() {
            return Err(anyhow!("Question cannot be empty"));
        }

        info!("Advisor question on budget {}", budget_id);
        let context = self.build_context(budget_id).await?;
        let reply = self.generate(&ask_prompt(&context, question)).await?;
        Ok(AdvisorReply { reply })
    }

    /// Produce a structured analysis of the budget with three suggestions.
    pub async fn analyze(&self, budget_id: &str) -> Result<AdvisorReply> {
        info!("Advisor analysis on budget {}", budget_id);
        let context = self.build_context(budget_id).await?;
        let reply = self.generate(&analyze_prompt(&context)).await?;
        Ok(AdvisorReply { reply })
    }

    async fn build_context(&self, budget_id: &str) -> Result<String> {
        let (_, budget) = self.budget_service.member_budget(budget_id).await?;

        let transactions = self
            .transaction_repository
            .list_transactions(&budget.id, None, None)
            .await?;
        let goals = self.goal_repository.list_goals(&budget.id).await?;
        let summary = summarize(&transactions);

        let context = AdvisorContext {
            total_income: summary.total_income,
            total_expense: summary.total_expense,
            balance: summary.balance,
            transactions: transactions
                .iter()
                .take(MAX_CONTEXT_TRANSACTIONS)
                .map(|t| ContextTransaction {
                    label: t.label.clone(),
                    amount: t.amount,
                    kind: t.kind.as_str().to_string(),
                    date: t.date.to_string(),
                    category: t.category.clone(),
                })
                .collect(),
            goals: goals
                .iter()
                .map(|g| ContextGoal {
                    name: g.name.clone(),
                    target_amount: g.target_amount,
                    current_amount: g.current_amount,
                })
                .collect(),
        };
        Ok(serde_json::to_string(&context)?)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("Advisor is not configured: missing API key"))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base, self.config.model, api_key
        );
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        debug!("Sending advisor request to model {}", self.config.model);
        let response = self.client.post(&url).json(&payload).send().await?;
        let body: Value = response.json().await?;
        extract_reply(&body)
    }
}

fn ask_prompt(context: &str, question: &str) -> String {
    format!(
        "You are \"Budget Tracker AI\", a personal finance expert.\n\
         The financial context (JSON) is:\n{context}\n\n\
         The user asks: \"{question}\"\n\n\
         Answer concisely, precisely and kindly. Use the provided data to \
         justify your answer. If the answer is not in the data, say so \
         politely.\n\
         Format: plain text (no Markdown beyond bold/italic), at most 3 \
         sentences if possible."
    )
}

fn analyze_prompt(context: &str) -> String {
    format!(
        "You are \"Budget Tracker AI\", a personal finance expert.\n\
         Analyze the following monthly budget data (JSON) and give 3 \
         concrete, brief tips (bullet points) to save money or manage the \
         budget better. Be encouraging but direct. Use emojis.\n\n\
         Data:\n{context}\n\n\
         Desired response format (Markdown):\n\
         ### 📊 Analysis\n\
         [Short summary]\n\n\
         ### 💡 Advice\n\
         1. [Tip 1]\n\
         2. [Tip 2]\n\
         3. [Tip 3]"
    )
}

/// Pull the reply text out of a `generateContent` response body.
fn extract_reply(body: &Value) -> Result<String> {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Could not extract text from the advisor response"))
}
