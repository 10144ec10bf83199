//! Read-only activity listings: trips, tasks and programs.

use crate::{
    entities::{Program, Task, Trip, program, task, trip},
    errors::Result,
    gateway::{Gateway, Query},
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Order};

/// All trips by start date.
pub async fn list_trips<G: Gateway>(gateway: &G) -> Result<Vec<trip::Model>> {
    gateway
        .fetch::<Trip>(Query::all().order_by(trip::Column::StartDate, Order::Asc))
        .await
}

/// All tasks by due date.
pub async fn list_tasks<G: Gateway>(gateway: &G) -> Result<Vec<task::Model>> {
    gateway
        .fetch::<Task>(Query::all().order_by(task::Column::DueDate, Order::Asc))
        .await
}

/// All programs by start date.
pub async fn list_programs<G: Gateway>(gateway: &G) -> Result<Vec<program::Model>> {
    gateway
        .fetch::<Program>(Query::all().order_by(program::Column::StartDate, Order::Asc))
        .await
}

/// Trips marked upcoming that start on or after `today`.
pub async fn upcoming_trips<G: Gateway>(gateway: &G, today: NaiveDate) -> Result<Vec<trip::Model>> {
    gateway
        .fetch::<Trip>(
            Query::all()
                .filter(trip::Column::Status.eq(trip::TripStatus::Upcoming))
                .filter(trip::Column::StartDate.gte(today))
                .order_by(trip::Column::StartDate, Order::Asc),
        )
        .await
}

/// Tasks not completed yet, by due date.
pub async fn open_tasks<G: Gateway>(gateway: &G) -> Result<Vec<task::Model>> {
    gateway
        .fetch::<Task>(
            Query::all()
                .filter(task::Column::Status.ne(task::TaskStatus::Completed))
                .order_by(task::Column::DueDate, Order::Asc),
        )
        .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::task::{TaskPriority, TaskStatus};
    use crate::entities::NameList;
    use crate::entities::trip::TripStatus;
    use crate::test_utils::*;
    use sea_orm::Set;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(title: &str, start: NaiveDate, status: TripStatus) -> trip::ActiveModel {
        trip::ActiveModel {
            title: Set(title.to_string()),
            description: Set(String::new()),
            start_date: Set(start),
            end_date: Set(start),
            location: Set("Camp".to_string()),
            max_participants: Set(20),
            participants: Set(NameList::default()),
            requirements: Set(vec!["Sleeping bag".to_string()].into()),
            image_url: Set(String::new()),
            status: Set(status),
            ..Default::default()
        }
    }

    fn task(title: &str, due: NaiveDate, status: TaskStatus) -> task::ActiveModel {
        task::ActiveModel {
            title: Set(title.to_string()),
            description: Set(String::new()),
            assigned_to: Set(vec!["Fahd".to_string()].into()),
            due_date: Set(due),
            status: Set(status),
            priority: Set(TaskPriority::High),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upcoming_trips_excludes_past_and_other_statuses() -> Result<()> {
        let gw = setup_test_gateway("activity-trips").await?;
        gw.insert::<Trip>(vec![
            trip("Summer", date(2024, 7, 1), TripStatus::Upcoming),
            trip("Spring", date(2024, 3, 15), TripStatus::Upcoming),
            trip("Winter", date(2024, 1, 10), TripStatus::Upcoming),
            trip("Autumn", date(2024, 10, 1), TripStatus::Cancelled),
        ])
        .await?;

        let all = list_trips(&gw).await?;
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].title, "Winter");
        assert_eq!(all[0].requirements.joined(), "Sleeping bag");

        let upcoming = upcoming_trips(&gw, date(2024, 3, 1)).await?;
        let titles: Vec<_> = upcoming.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Spring", "Summer"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_tasks() -> Result<()> {
        let gw = setup_test_gateway("activity-tasks").await?;
        gw.insert::<Task>(vec![
            task("Gear", date(2024, 3, 25), TaskStatus::InProgress),
            task("Report", date(2024, 3, 20), TaskStatus::Completed),
            task("Menu", date(2024, 3, 22), TaskStatus::Pending),
        ])
        .await?;

        let open = open_tasks(&gw).await?;
        let titles: Vec<_> = open.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Menu", "Gear"]);
        assert_eq!(list_tasks(&gw).await?.len(), 3);
        assert!(list_programs(&gw).await?.is_empty());
        Ok(())
    }
}
