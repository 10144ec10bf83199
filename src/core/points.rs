//! Points transaction flow - grants or removes points for a set of users.
//!
//! A grant records one transaction per selected user and then moves each
//! user's cached total by the same delta. How the totals move depends on
//! [`PointsMode`]: sequentially, stopping at the first failure without
//! rolling back, or atomically in one backend transaction.

use crate::{
    config::PointsMode,
    entities::{
        PointsTransaction, User, points_transaction, points_transaction::NewPointsTransaction,
        user,
    },
    errors::{Error, Result},
    gateway::{Gateway, Query, fetch_by_id},
    presenter::Searchable,
};
use sea_orm::{ColumnTrait, Order, Set};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// A points grant as entered in the points dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointsGrant {
    /// Selected users, in selection order
    pub user_ids: Vec<i64>,
    /// Signed delta applied to every selected user
    pub points: i32,
    pub reason: String,
    /// Leader granting the points
    pub created_by: i64,
}

impl PointsGrant {
    /// Selects `user_id`, or deselects it when already selected.
    pub fn toggle(&mut self, user_id: i64) {
        if let Some(pos) = self.user_ids.iter().position(|&id| id == user_id) {
            self.user_ids.remove(pos);
        } else {
            self.user_ids.push(user_id);
        }
    }

    /// Selects every user in `users`, or clears the selection when all of
    /// them are already selected.
    pub fn toggle_all(&mut self, users: &[user::Model]) {
        let all_selected = !users.is_empty()
            && users.iter().all(|u| self.user_ids.contains(&u.id));
        if all_selected {
            self.user_ids.clear();
        } else {
            self.user_ids = users.iter().map(|u| u.id).collect();
        }
    }

    /// Checks the grant before anything is written.
    pub fn validate(&self) -> Result<()> {
        if self.user_ids.is_empty() {
            return Err(Error::validation("Please select at least one member"));
        }
        if self.points == 0 {
            return Err(Error::validation("Points must be a non-zero number"));
        }
        if self.reason.trim().is_empty() {
            return Err(Error::validation("Please give a reason for the points"));
        }
        Ok(())
    }

    fn entries(&self) -> Vec<NewPointsTransaction> {
        self.user_ids
            .iter()
            .map(|&user_id| NewPointsTransaction {
                user_id,
                points: self.points,
                reason: self.reason.trim().to_string(),
                created_by: self.created_by,
            })
            .collect()
    }
}

/// Where the points dialog is in its lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Submitting,
    Success {
        /// Number of users whose totals moved
        updated: usize,
    },
    Failed {
        message: String,
    },
}

/// Drives one points dialog through Idle → Submitting → Success/Failed.
#[derive(Debug, Default)]
pub struct PointsFlow {
    mode: PointsMode,
    state: FlowState,
}

impl PointsFlow {
    #[must_use]
    pub const fn new(mode: PointsMode) -> Self {
        Self {
            mode,
            state: FlowState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    /// Validates and applies `grant`, returning the ids of users whose
    /// totals moved.
    ///
    /// A validation error leaves the flow Idle. Any later error moves it to
    /// Failed; in sequential mode that error is [`Error::PartialFailure`]
    /// once the transactions were written. A grant that would leave a
    /// balance negative is refused before anything is written.
    #[instrument(skip(self, gateway, grant), fields(mode = ?self.mode, users = grant.user_ids.len(), points = grant.points))]
    pub async fn submit<G: Gateway>(&mut self, gateway: &G, grant: &PointsGrant) -> Result<Vec<i64>> {
        grant.validate()?;
        self.state = FlowState::Submitting;

        let result = match self.mode {
            PointsMode::Sequential => grant_sequential(gateway, grant).await,
            PointsMode::Atomic => gateway
                .apply_points(grant.entries())
                .await
                .map(|()| grant.user_ids.clone()),
        };

        self.state = match &result {
            Ok(updated) => {
                info!("Granted {} points to {} users", grant.points, updated.len());
                FlowState::Success {
                    updated: updated.len(),
                }
            }
            Err(e) => {
                warn!("Points grant failed: {}", e);
                FlowState::Failed {
                    message: e.to_string(),
                }
            }
        };
        result
    }
}

/// Fails with [`Error::InvalidPoints`] if the grant would take any selected
/// user below zero. Nothing is written.
async fn check_balances<G: Gateway>(gateway: &G, grant: &PointsGrant) -> Result<()> {
    if grant.points >= 0 {
        return Ok(());
    }
    let selected = gateway
        .fetch::<User>(Query::all().filter(user::Column::Id.is_in(grant.user_ids.clone())))
        .await?;
    match selected.iter().find(|u| u.points + grant.points < 0) {
        Some(short) => Err(Error::InvalidPoints {
            current: short.points,
            delta: grant.points,
        }),
        None => Ok(()),
    }
}

async fn grant_sequential<G: Gateway>(gateway: &G, grant: &PointsGrant) -> Result<Vec<i64>> {
    check_balances(gateway, grant).await?;
    let now = chrono::Utc::now();
    let rows: Vec<points_transaction::ActiveModel> = grant
        .entries()
        .into_iter()
        .map(|entry| entry.into_active_model(now))
        .collect();
    gateway.insert::<PointsTransaction>(rows).await?;
    debug!("Recorded {} points transactions", grant.user_ids.len());

    let total = grant.user_ids.len();
    let mut completed = Vec::with_capacity(total);
    for &user_id in &grant.user_ids {
        let step = async {
            let current = fetch_by_id::<G, User>(gateway, user_id).await?;
            let new_total = current.points + grant.points;
            if new_total < 0 {
                return Err(Error::InvalidPoints {
                    current: current.points,
                    delta: grant.points,
                });
            }
            let patch = user::ActiveModel {
                points: Set(new_total),
                ..Default::default()
            };
            gateway.update::<User>(user_id, patch).await
        };

        if let Err(e) = step.await {
            return Err(Error::PartialFailure {
                completed,
                failed: user_id,
                total,
                message: e.to_string(),
            });
        }
        completed.push(user_id);
    }
    Ok(completed)
}

/// A history row with the names resolved for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub transaction: points_transaction::Model,
    /// Recipient's full name, empty if the user is gone
    pub user_name: String,
    /// Granting leader's full name, empty if the user is gone
    pub creator_name: String,
}

impl Searchable for HistoryEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.user_name.as_str(), self.transaction.reason.as_str()]
    }
}

/// Every points transaction, newest first, with recipient and creator names.
pub async fn points_history<G: Gateway>(gateway: &G) -> Result<Vec<HistoryEntry>> {
    let (transactions, users) = tokio::join!(
        gateway.fetch::<PointsTransaction>(
            Query::all().order_by(points_transaction::Column::CreatedAt, Order::Desc)
        ),
        gateway.fetch::<User>(Query::all()),
    );
    let names: HashMap<i64, String> = users?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();
    let name_of = |id: i64| names.get(&id).cloned().unwrap_or_default();

    Ok(transactions?
        .into_iter()
        .map(|transaction| HistoryEntry {
            user_name: name_of(transaction.user_id),
            creator_name: name_of(transaction.created_by),
            transaction,
        })
        .collect())
}
