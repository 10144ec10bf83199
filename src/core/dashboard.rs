//! Dashboard summary for the signed-in member.

use crate::{
    core::{activity, assignment},
    entities::{TaskModel, TripModel, User},
    errors::Result,
    gateway::{Gateway, fetch_by_id},
};
use chrono::NaiveDate;

/// How many upcoming trips and open tasks the dashboard lists
pub const DASHBOARD_LIST_LIMIT: usize = 3;

/// What the dashboard shows for one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardSummary {
    pub full_name: String,
    pub points: i32,
    pub badge_count: usize,
    pub certificate_count: usize,
    /// Soonest upcoming trips
    pub upcoming_trips: Vec<TripModel>,
    /// Open tasks due soonest
    pub open_tasks: Vec<TaskModel>,
}

/// Builds the dashboard for `user_id`, reading the user fresh so points are
/// current.
pub async fn summary<G: Gateway>(gateway: &G, user_id: i64, today: NaiveDate) -> Result<DashboardSummary> {
    let (user, badges, certificates, trips, tasks) = tokio::join!(
        fetch_by_id::<G, User>(gateway, user_id),
        assignment::badges_for_user(gateway, user_id),
        assignment::certificates_for_user(gateway, user_id),
        activity::upcoming_trips(gateway, today),
        activity::open_tasks(gateway),
    );
    let user = user?;
    let mut upcoming_trips = trips?;
    upcoming_trips.truncate(DASHBOARD_LIST_LIMIT);
    let mut open_tasks = tasks?;
    open_tasks.truncate(DASHBOARD_LIST_LIMIT);

    Ok(DashboardSummary {
        full_name: user.full_name,
        points: user.points,
        badge_count: badges?.len(),
        certificate_count: certificates?.len(),
        upcoming_trips,
        open_tasks,
    })
}
