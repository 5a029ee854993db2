//! A placeholder financial assistant that gives fixed answers.

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{extract::ApiJson, user::UserId};

/// The JSON body for asking for an analysis.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Defaults to "general".
    pub focus_area: Option<String>,
}

/// The assistant's analysis of one area of the user's finances.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub focus_area: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// The JSON body for chatting with the assistant.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// The assistant's reply to a chat message.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// A general tip.
#[derive(Debug, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub description: &'static str,
    /// "tip" or "info".
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Something the user could act on.
#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
    /// "high", "medium" or "low".
    pub priority: &'static str,
}

const INSIGHTS: &[Insight] = &[
    Insight {
        title: "Smart Spending",
        description: "Track your daily expenses to identify savings opportunities",
        kind: "tip",
    },
    Insight {
        title: "Budget Goals",
        description: "Setting monthly budgets helps you stay on track",
        kind: "info",
    },
];

const RECOMMENDATIONS: &[Recommendation] = &[
    Recommendation {
        title: "Emergency Fund",
        description: "Consider building an emergency fund with 3-6 months of expenses",
        priority: "high",
    },
    Recommendation {
        title: "Review Subscriptions",
        description: "Check your recurring payments for any unused subscriptions",
        priority: "medium",
    },
];

/// A route handler for analysing an area of the user's finances.
pub async fn analyze(
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let focus_area = request
        .focus_area
        .map(|focus_area| focus_area.trim().to_owned())
        .filter(|focus_area| !focus_area.is_empty())
        .unwrap_or_else(|| "general".to_owned());
    tracing::debug!("User {user_id} asked for an analysis of {focus_area}");

    Json(AnalyzeResponse {
        analysis: format!(
            "Based on your {focus_area} financial data, you're doing well! \
             Consider reviewing your spending categories for optimization opportunities."
        ),
        focus_area,
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// A route handler for chatting with the assistant. The reply does not depend on the message.
pub async fn chat(
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::debug!(
        "User {user_id} sent a chat message of {} characters",
        request.message.as_deref().map_or(0, |message| message.chars().count())
    );

    Json(ChatResponse {
        reply: "I'm your Fintrack financial assistant. I can help you track expenses, \
                set budgets, and achieve your financial goals. How can I help you today?"
            .to_owned(),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// A route handler for general tips.
pub async fn get_insights() -> Json<&'static [Insight]> {
    Json(INSIGHTS)
}

/// A route handler for suggested actions.
pub async fn get_recommendations() -> Json<&'static [Recommendation]> {
    Json(RECOMMENDATIONS)
}
