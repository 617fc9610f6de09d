// src/routes/stats.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::models::{DashboardStats, Department};
use crate::query;
use crate::AppState;

#[derive(Deserialize)]
pub struct StatsQ {
    /// Staff callers pass their own department; admins omit it.
    pub department: Option<Department>,
}

/// GET /api/v1/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Query(q): Query<StatsQ>,
) -> Json<DashboardStats> {
    let all = state.store.all().await;
    Json(query::dashboard_stats(&all, q.department))
}
