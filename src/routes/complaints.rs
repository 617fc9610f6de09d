// src/routes/complaints.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::store_error;
use crate::models::{Complaint, ComplaintStatus, Department, NewComplaint};
use crate::query;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQ {
    pub department: Option<Department>,
    pub status: Option<ComplaintStatus>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintBody {
    pub citizen_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Department,
    pub subject: String,
    pub description: String,
    pub location: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    pub status: ComplaintStatus,
    pub response_message: Option<String>,
    pub author: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponseBody {
    pub message: String,
    pub author: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody {
    pub staff_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Submission validation (the store accepts input as-is)
// ─────────────────────────────────────────────────────────────────────────────

const MIN_DESCRIPTION_LEN: usize = 30;

fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

fn valid_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .rsplit_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Keeps only digits; a valid phone normalizes to exactly 10 of them.
fn normalize_phone(raw: &str) -> Result<String, (StatusCode, String)> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        Ok(digits)
    } else {
        Err(bad_request("phone must contain 10 digits"))
    }
}

fn validate(body: CreateComplaintBody) -> Result<NewComplaint, (StatusCode, String)> {
    let citizen_name = body.citizen_name.trim().to_string();
    if citizen_name.is_empty() {
        return Err(bad_request("citizenName is required"));
    }

    let email = body.email.trim().to_string();
    if !valid_email(&email) {
        return Err(bad_request("email is invalid"));
    }

    let subject = body.subject.trim().to_string();
    if subject.is_empty() {
        return Err(bad_request("subject is required"));
    }

    let description = body.description.trim().to_string();
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(bad_request(format!(
            "description must be at least {MIN_DESCRIPTION_LEN} characters"
        )));
    }

    let phone = match body.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Some(normalize_phone(p)?),
        None => None,
    };

    Ok(NewComplaint {
        citizen_name,
        email,
        phone,
        department: body.department,
        subject,
        description,
        location: body
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/complaints
pub async fn create_complaint(
    State(state): State<AppState>,
    Json(body): Json<CreateComplaintBody>,
) -> Result<Json<Complaint>, (StatusCode, String)> {
    let input = validate(body)?;
    let row = state.store.create(input).await.map_err(store_error)?;
    Ok(Json(row))
}

/// GET /api/v1/complaints
pub async fn list_complaints(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Json<Vec<Complaint>> {
    let limit = q.limit.unwrap_or(10).clamp(1, 100) as usize;
    let offset = q.offset.unwrap_or(0).max(0) as usize;
    let search = q.q.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let filtered = match (q.department, q.status, search) {
        (Some(d), None, None) => {
            query::sort_newest_first(state.store.list_by_department(d).await)
        }
        (None, Some(s), None) => query::sort_newest_first(state.store.list_by_status(s).await),
        (department, status, search) => {
            let all = state.store.all().await;
            query::filter_complaints(&all, department, status, search)
        }
    };
    Json(query::paginate(filtered, limit, offset))
}

/// GET /api/v1/complaints/:id — the public ticket-tracking lookup.
pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Complaint>, (StatusCode, String)> {
    match state.store.get_by_id(&id).await {
        Some(row) => Ok(Json(row)),
        None => Err((StatusCode::NOT_FOUND, format!("complaint not found: {id}"))),
    }
}

/// PATCH /api/v1/complaints/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(b): Json<UpdateStatusBody>,
) -> Result<Json<Complaint>, (StatusCode, String)> {
    let row = state
        .store
        .update_status(&id, b.status, b.response_message, b.author)
        .await
        .map_err(store_error)?;
    Ok(Json(row))
}

/// POST /api/v1/complaints/:id/response
pub async fn add_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(b): Json<AddResponseBody>,
) -> Result<Json<Complaint>, (StatusCode, String)> {
    if b.message.trim().is_empty() {
        return Err(bad_request("message is required"));
    }
    let row = state
        .store
        .add_response(&id, b.message, b.author)
        .await
        .map_err(store_error)?;
    Ok(Json(row))
}

#[derive(Serialize)]
pub struct DepartmentInfo {
    pub code: &'static str,
    pub name: &'static str,
}

/// GET /api/v1/departments — the submission form's fixed category list.
pub async fn list_departments() -> Json<Vec<DepartmentInfo>> {
    Json(
        Department::ALL
            .iter()
            .map(|d| DepartmentInfo {
                code: d.as_str(),
                name: d.display_name(),
            })
            .collect(),
    )
}

/// POST /api/v1/complaints/:id/assign
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(b): Json<AssignBody>,
) -> Result<Json<Complaint>, (StatusCode, String)> {
    let row = state
        .store
        .assign(&id, b.staff_id)
        .await
        .map_err(store_error)?;
    Ok(Json(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> CreateComplaintBody {
        CreateComplaintBody {
            citizen_name: "Ada Citizen".into(),
            email: "a@b.com".into(),
            phone: Some("(555) 123-4567".into()),
            department: Department::Roads,
            subject: "Pothole".into(),
            description: "A very large pothole has appeared on Main St. near the school.".into(),
            location: Some("Main St.".into()),
        }
    }

    #[test]
    fn valid_submission_passes_and_normalizes_phone() {
        let input = validate(body()).unwrap();
        assert_eq!(input.phone.as_deref(), Some("5551234567"));
        assert_eq!(input.citizen_name, "Ada Citizen");
    }

    #[test]
    fn short_description_is_rejected() {
        let mut b = body();
        b.description = "Too short.".into();
        let (status, msg) = validate(b).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("30"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["", "nope", "a@b", "a b@c.com"] {
            let mut b = body();
            b.email = bad.into();
            assert!(validate(b).is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn short_phone_is_rejected_but_absent_phone_is_fine() {
        let mut b = body();
        b.phone = Some("12345".into());
        assert!(validate(b).is_err());

        let mut b = body();
        b.phone = None;
        assert!(validate(b).unwrap().phone.is_none());

        // Whitespace-only counts as absent.
        let mut b = body();
        b.phone = Some("   ".into());
        assert!(validate(b).unwrap().phone.is_none());
    }
}
