//! User business logic - registration, lookup and profile edits.

use crate::{
    entities::{Role, User, user},
    errors::{Error, Result},
    form::{FormMode, FormRecord, FormState, FormValues},
    gateway::{Gateway, Query, fetch_by_id},
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Order, Set};
use tracing::info;

/// Fields a profile form must have filled in
pub const PROFILE_REQUIRED_FIELDS: &[&str] = &["full_name"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Details collected at registration.
#[derive(Clone, Debug)]
pub struct Registration {
    /// Identity issued by the auth provider
    pub auth_id: String,
    pub national_id: String,
    pub full_name: String,
    pub email: Option<String>,
}

/// User bound to `auth_id`, if one is registered.
pub async fn find_by_auth_id<G: Gateway>(gateway: &G, auth_id: &str) -> Result<Option<user::Model>> {
    Ok(gateway
        .fetch::<User>(Query::all().filter(user::Column::AuthId.eq(auth_id)))
        .await?
        .into_iter()
        .next())
}

/// User with the given national id, if any.
pub async fn find_by_national_id<G: Gateway>(
    gateway: &G,
    national_id: &str,
) -> Result<Option<user::Model>> {
    Ok(gateway
        .fetch::<User>(Query::all().filter(user::Column::NationalId.eq(national_id.trim())))
        .await?
        .into_iter()
        .next())
}

/// Every user ordered by full name.
pub async fn list_users<G: Gateway>(gateway: &G) -> Result<Vec<user::Model>> {
    gateway
        .fetch::<User>(Query::all().order_by(user::Column::FullName, Order::Asc))
        .await
}

/// Creates a scout account for a new identity.
///
/// Fails with [`Error::AlreadyRegistered`] when the identity is taken.
pub async fn register<G: Gateway>(gateway: &G, registration: Registration) -> Result<user::Model> {
    create_member(gateway, registration, Role::Scout).await
}

/// Creates a member with `role`; used by registration and seeding.
pub async fn create_member<G: Gateway>(
    gateway: &G,
    registration: Registration,
    role: Role,
) -> Result<user::Model> {
    let national_id = registration.national_id.trim().to_string();
    let full_name = registration.full_name.trim().to_string();
    if national_id.is_empty() || full_name.is_empty() {
        return Err(Error::validation(
            "National id and full name are required to register",
        ));
    }
    if find_by_auth_id(gateway, &registration.auth_id).await?.is_some() {
        return Err(Error::AlreadyRegistered);
    }

    let record = user::ActiveModel {
        auth_id: Set(registration.auth_id.clone()),
        national_id: Set(national_id),
        full_name: Set(full_name),
        email: Set(registration.email.filter(|e| !e.trim().is_empty())),
        role: Set(role),
        points: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    gateway.insert::<User>(vec![record]).await?;

    let created = find_by_auth_id(gateway, &registration.auth_id)
        .await?
        .ok_or_else(|| Error::Database("registered user could not be read back".to_string()))?;
    info!("Registered user {} ({})", created.id, created.full_name);
    Ok(created)
}

impl FormRecord for user::Model {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        vec![
            ("full_name", self.full_name.clone()),
            ("email", text(&self.email)),
            ("phone_number", text(&self.phone_number)),
            ("address", text(&self.address)),
            (
                "date_of_birth",
                self.date_of_birth
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
            ("bio", text(&self.bio)),
        ]
    }
}

/// Profile form seeded from `existing`.
#[must_use]
pub fn profile_form(existing: &user::Model) -> FormState {
    FormState::editing(PROFILE_REQUIRED_FIELDS, existing)
}

fn parse_date(values: &FormValues) -> Result<Option<NaiveDate>> {
    values
        .optional("date_of_birth")
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
                Error::validation(format!("Date of birth '{raw}' must be YYYY-MM-DD"))
            })
        })
        .transpose()
}

/// Saves a profile form and returns the updated user.
///
/// Blank optional fields are cleared.
pub async fn update_profile<G: Gateway>(gateway: &G, form: &mut FormState) -> Result<user::Model> {
    form.submit(|values: FormValues| async move {
        let FormMode::Edit { id } = values.mode() else {
            return Err(Error::validation("A profile can only be edited, not created"));
        };
        let date_of_birth = parse_date(&values)?;

        let patch = user::ActiveModel {
            full_name: Set(values.get("full_name").to_string()),
            email: Set(values.optional("email")),
            phone_number: Set(values.optional("phone_number")),
            address: Set(values.optional("address")),
            date_of_birth: Set(date_of_birth),
            bio: Set(values.optional("bio")),
            ..Default::default()
        };
        gateway.update::<User>(id, patch).await?;
        info!("Updated profile of user {}", id);
        fetch_by_id::<G, User>(gateway, id).await
    })
    .await
}

/// Finds the member `input` refers to.
///
/// Accepts a national id, a full name (ignoring case), or the
/// `Full Name (national_id)` label offered by autocomplete.
#[must_use]
pub fn resolve_member<'a>(users: &'a [user::Model], input: &str) -> Option<&'a user::Model> {
    let input = input.trim();
    let national_id = input
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once('('))
        .map_or(input, |(_, id)| id.trim());

    let name = input.to_lowercase();
    users
        .iter()
        .find(|u| u.national_id == national_id)
        .or_else(|| users.iter().find(|u| u.full_name.to_lowercase() == name))
}

/// Label used to present a member in pickers.
#[must_use]
pub fn member_label(user: &user::Model) -> String {
    format!("{} ({})", user.full_name, user.national_id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn registration(auth_id: &str, name: &str) -> Registration {
        Registration {
            auth_id: auth_id.to_string(),
            national_id: format!("10{auth_id}"),
            full_name: name.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_scout_with_zero_points() -> Result<()> {
        let gw = setup_test_gateway("user-register").await?;

        let user = register(&gw, registration("42", "Fahd Saleh")).await?;
        assert_eq!(user.role, Role::Scout);
        assert_eq!(user.points, 0);
        assert_eq!(user.national_id, "1042");

        let again = register(&gw, registration("42", "Someone else")).await;
        assert!(matches!(again, Err(Error::AlreadyRegistered)));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_requires_name_and_national_id() -> Result<()> {
        let gw = setup_test_gateway("user-register-invalid").await?;
        let mut reg = registration("7", " ");
        reg.national_id = String::new();

        let result = register(&gw, reg).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(list_users(&gw).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_national_id() -> Result<()> {
        let gw = setup_test_gateway("user-lookup").await?;
        let created = register(&gw, registration("5", "Yousef")).await?;

        let found = find_by_national_id(&gw, " 105 ").await?.unwrap();
        assert_eq!(found.id, created.id);
        assert!(find_by_national_id(&gw, "999").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile() -> Result<()> {
        let gw = setup_test_gateway("user-profile").await?;
        let created = register(&gw, registration("5", "Yousef")).await?;

        let mut form = profile_form(&created);
        form.set("phone_number", "0500000000");
        form.set("date_of_birth", "2008-02-29");
        let updated = update_profile(&gw, &mut form).await?;

        assert_eq!(updated.phone_number.as_deref(), Some("0500000000"));
        assert_eq!(updated.date_of_birth, NaiveDate::from_ymd_opt(2008, 2, 29));
        assert_eq!(updated.full_name, "Yousef");
        assert_eq!(updated.points, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_date() -> Result<()> {
        let gw = setup_test_gateway("user-profile-date").await?;
        let created = register(&gw, registration("5", "Yousef")).await?;

        let mut form = profile_form(&created);
        form.set("date_of_birth", "29/02/2008");
        let result = update_profile(&gw, &mut form).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(form.values().get("date_of_birth"), "29/02/2008");
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_member() -> Result<()> {
        let gw = setup_test_gateway("user-resolve").await?;
        register(&gw, registration("1", "Ali Hassan")).await?;
        register(&gw, registration("2", "Sara Nasser")).await?;
        let users = list_users(&gw).await?;

        assert_eq!(resolve_member(&users, "101").unwrap().full_name, "Ali Hassan");
        assert_eq!(resolve_member(&users, "sara nasser").unwrap().national_id, "102");
        let label = member_label(&users[1]);
        assert_eq!(resolve_member(&users, &label).unwrap().full_name, "Sara Nasser");
        assert!(resolve_member(&users, "Nobody").is_none());
        Ok(())
    }
}
