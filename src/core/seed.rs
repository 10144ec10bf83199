//! Seeds members and activities listed in the configuration file.
//!
//! Members are matched by `auth_id` and only created when missing.
//! Activities are only inserted into a collection that is still empty, so
//! edits made after the first start are never overwritten.

use crate::{
    config::{AppConfig, ProgramConfig, TaskConfig, TripConfig},
    core::user::{Registration, create_member, find_by_auth_id},
    entities::{Program, Task, Trip, program, task, trip},
    errors::Result,
    gateway::{Collection, Gateway, Query},
};
use sea_orm::Set;
use tracing::{debug, info};

impl TripConfig {
    fn to_active_model(&self) -> trip::ActiveModel {
        trip::ActiveModel {
            title: Set(self.title.clone()),
            description: Set(self.description.clone()),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            location: Set(self.location.clone()),
            max_participants: Set(self.max_participants),
            participants: Set(self.participants.clone().into()),
            requirements: Set(self.requirements.clone().into()),
            image_url: Set(self.image_url.clone()),
            status: Set(self.status),
            ..Default::default()
        }
    }
}

impl TaskConfig {
    fn to_active_model(&self) -> task::ActiveModel {
        task::ActiveModel {
            title: Set(self.title.clone()),
            description: Set(self.description.clone()),
            assigned_to: Set(self.assigned_to.clone().into()),
            due_date: Set(self.due_date),
            status: Set(self.status),
            priority: Set(self.priority),
            ..Default::default()
        }
    }
}

impl ProgramConfig {
    fn to_active_model(&self) -> program::ActiveModel {
        program::ActiveModel {
            title: Set(self.title.clone()),
            description: Set(self.description.clone()),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            location: Set(self.location.clone()),
            responsible: Set(self.responsible.clone()),
            image_url: Set(self.image_url.clone()),
            status: Set(self.status),
            ..Default::default()
        }
    }
}

/// Inserts `records` only when `E` has no rows yet. Returns how many were
/// inserted.
async fn seed_if_empty<G: Gateway, E: Collection>(
    gateway: &G,
    records: Vec<E::ActiveModel>,
) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    if !gateway.fetch::<E>(Query::all()).await?.is_empty() {
        debug!("{} already has data, skipping seed", E::NAME);
        return Ok(0);
    }
    let count = records.len();
    gateway.insert::<E>(records).await?;
    info!("Seeded {} {}", count, E::NAME);
    Ok(count)
}

/// Creates missing members and fills empty activity collections from
/// `config`.
pub async fn seed_from_config<G: Gateway>(gateway: &G, config: &AppConfig) -> Result<()> {
    let mut created = 0;
    for member in &config.members {
        if find_by_auth_id(gateway, &member.auth_id).await?.is_some() {
            continue;
        }
        let registration = Registration {
            auth_id: member.auth_id.clone(),
            national_id: member.national_id.clone(),
            full_name: member.full_name.clone(),
            email: member.email.clone(),
        };
        create_member(gateway, registration, member.role).await?;
        created += 1;
    }
    if created > 0 {
        info!("Seeded {} members", created);
    }

    seed_if_empty::<G, Trip>(gateway, config.trips.iter().map(TripConfig::to_active_model).collect())
        .await?;
    seed_if_empty::<G, Task>(gateway, config.tasks.iter().map(TaskConfig::to_active_model).collect())
        .await?;
    seed_if_empty::<G, Program>(
        gateway,
        config.programs.iter().map(ProgramConfig::to_active_model).collect(),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{activity, user::list_users};
    use crate::entities::Role;
    use crate::test_utils::*;

    const CONFIG: &str = r#"
        [[members]]
        auth_id = "111"
        national_id = "1000000001"
        full_name = "Leader Abdullah"
        role = "admin"

        [[members]]
        auth_id = "222"
        national_id = "1000000002"
        full_name = "Khalid"

        [[trips]]
        title = "Spring trip"
        description = "Camping skills"
        start_date = "2024-03-15"
        end_date = "2024-03-17"
        location = "Wadi Hanifa"
        max_participants = 30
        status = "upcoming"

        [[programs]]
        title = "Leadership"
        description = "Leadership skills"
        start_date = "2024-04-01"
        end_date = "2024-04-30"
        location = "Training center"
        responsible = "Leader Abdullah"
        status = "planned"
    "#;

    #[tokio::test]
    async fn test_seed_is_idempotent() -> Result<()> {
        let gw = setup_test_gateway("seed").await?;
        let config: AppConfig = toml::from_str(CONFIG).unwrap();

        seed_from_config(&gw, &config).await?;
        seed_from_config(&gw, &config).await?;

        let users = list_users(&gw).await?;
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].role, Role::Admin);
        assert_eq!(activity::list_trips(&gw).await?.len(), 1);
        assert_eq!(activity::list_programs(&gw).await?.len(), 1);
        assert!(activity::list_tasks(&gw).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_leaves_existing_member_untouched() -> Result<()> {
        let gw = setup_test_gateway("seed-existing").await?;
        create_test_user(&gw, "222", "Khalid Renamed").await?;
        let config: AppConfig = toml::from_str(CONFIG).unwrap();

        seed_from_config(&gw, &config).await?;

        let khalid = find_by_auth_id(&gw, "222").await?.unwrap();
        assert_eq!(khalid.full_name, "Khalid Renamed");
        Ok(())
    }
}
