// src/query/mod.rs

use std::collections::HashMap;

use crate::models::{Complaint, ComplaintStatus, DashboardStats, Department};

/// How many complaints the dashboard's recency panel shows.
pub const RECENT_LIMIT: usize = 5;

/// Conjunction of the optional filters, applied department -> status ->
/// search text, then sorted newest first. Pure projection; callers pass
/// whatever scope the authenticated user is allowed to see.
pub fn filter_complaints(
    complaints: &[Complaint],
    department: Option<Department>,
    status: Option<ComplaintStatus>,
    search: Option<&str>,
) -> Vec<Complaint> {
    let filtered: Vec<Complaint> = complaints
        .iter()
        .filter(|c| department.map_or(true, |d| c.department == d))
        .filter(|c| status.map_or(true, |s| c.status == s))
        .filter(|c| search.map_or(true, |q| matches_search(c, q)))
        .cloned()
        .collect();
    sort_newest_first(filtered)
}

/// The fixed list ordering every view uses.
pub fn sort_newest_first(mut complaints: Vec<Complaint>) -> Vec<Complaint> {
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    complaints
}

/// Case-insensitive substring match over id, citizen name, subject and
/// description.
fn matches_search(c: &Complaint, query: &str) -> bool {
    let q = query.to_lowercase();
    c.id.to_lowercase().contains(&q)
        || c.citizen_name.to_lowercase().contains(&q)
        || c.subject.to_lowercase().contains(&q)
        || c.description.to_lowercase().contains(&q)
}

/// One page out of an already filtered-and-sorted list.
pub fn paginate(complaints: Vec<Complaint>, limit: usize, offset: usize) -> Vec<Complaint> {
    complaints.into_iter().skip(offset).take(limit).collect()
}

/// Counts and recency for the admin dashboard. `department` scopes the
/// numbers for non-admin staff; admins pass `None` and see everything.
pub fn dashboard_stats(
    complaints: &[Complaint],
    department: Option<Department>,
) -> DashboardStats {
    let scoped = filter_complaints(complaints, department, None, None);
    let count = |s: ComplaintStatus| scoped.iter().filter(|c| c.status == s).count();

    let mut department_counts: HashMap<String, usize> = HashMap::new();
    for c in &scoped {
        *department_counts
            .entry(c.department.as_str().to_string())
            .or_insert(0) += 1;
    }

    DashboardStats {
        total: scoped.len(),
        pending: count(ComplaintStatus::Pending),
        in_progress: count(ComplaintStatus::InProgress),
        resolved: count(ComplaintStatus::Resolved),
        rejected: count(ComplaintStatus::Rejected),
        department_counts,
        recent: scoped.into_iter().take(RECENT_LIMIT).collect(),
    }
}
