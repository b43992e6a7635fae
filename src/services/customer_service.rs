//! Customer Service - customers and the identity records they hang off

use sea_orm::*;

use crate::domain::DomainError;
use crate::domain::validation::{self, EMAIL_MAX, PHONE_NUMBER_MAX, USERNAME_MAX};
use crate::models::UploadDir;
use crate::models::customer::{self, CustomerDto, CustomerProfile, Entity as Customer};
use crate::models::user::{self, Entity as User};

fn profile_picture(value: Option<String>) -> Result<Option<String>, DomainError> {
    Ok(validation::optional("profile_picture", value, 255)?
        .map(|p| UploadDir::CustomerProfiles.stored_path(&p)))
}

/// Create the identity and the customer in one transaction.
pub async fn create_customer(
    db: &DatabaseConnection,
    dto: CustomerDto,
) -> Result<CustomerProfile, DomainError> {
    let username = validation::required("username", &dto.username, USERNAME_MAX)?;
    let email = match validation::optional("email", dto.email, EMAIL_MAX)? {
        Some(email) => Some(validation::email("email", &email, EMAIL_MAX)?),
        None => None,
    };
    let phone_number = validation::optional("phone_number", dto.phone_number, PHONE_NUMBER_MAX)?;
    let date_of_birth = validation::date("date_of_birth", dto.date_of_birth)?;
    let profile_picture = profile_picture(dto.profile_picture)?;
    let now = chrono::Utc::now().to_rfc3339();

    let txn = db.begin().await?;

    let identity = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        first_name: Set(validation::optional("first_name", dto.first_name, 150)?),
        last_name: Set(validation::optional("last_name", dto.last_name, 150)?),
        password_hash: Set(None),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let saved = customer::ActiveModel {
        user_id: Set(identity.id),
        phone_number: Set(phone_number),
        profile_picture: Set(profile_picture),
        date_of_birth: Set(date_of_birth),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!("Created customer {} ({})", saved.id, identity.username);
    Ok(CustomerProfile::from_parts(saved, identity))
}

/// Get a single customer by ID
pub async fn get_customer(db: &DatabaseConnection, id: i32) -> Result<CustomerProfile, DomainError> {
    let (found, identity) = Customer::find_by_id(id)
        .find_also_related(User)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("customer"))?;
    let identity = identity.ok_or(DomainError::NotFound("user"))?;

    Ok(CustomerProfile::from_parts(found, identity))
}

pub async fn find_by_phone(
    db: &DatabaseConnection,
    phone_number: &str,
) -> Result<Option<CustomerProfile>, DomainError> {
    let found = Customer::find()
        .filter(customer::Column::PhoneNumber.eq(phone_number.trim()))
        .find_also_related(User)
        .one(db)
        .await?;

    Ok(found.and_then(|(c, u)| u.map(|u| CustomerProfile::from_parts(c, u))))
}

/// List all customers, oldest first
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<CustomerProfile>, DomainError> {
    let rows = Customer::find()
        .find_also_related(User)
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(c, u)| u.map(|u| CustomerProfile::from_parts(c, u)))
        .collect())
}

/// Update an existing customer and its identity
pub async fn update_customer(
    db: &DatabaseConnection,
    dto: CustomerDto,
) -> Result<CustomerProfile, DomainError> {
    let id = dto.id.ok_or(DomainError::Validation(
        "Customer ID is required for update".to_string(),
    ))?;

    let (existing, identity) = Customer::find_by_id(id)
        .find_also_related(User)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("customer"))?;
    let identity = identity.ok_or(DomainError::NotFound("user"))?;

    let email = match validation::optional("email", dto.email, EMAIL_MAX)? {
        Some(email) => Some(validation::email("email", &email, EMAIL_MAX)?),
        None => None,
    };
    let now = chrono::Utc::now().to_rfc3339();

    let mut identity_model: user::ActiveModel = identity.into();
    identity_model.username = Set(validation::required("username", &dto.username, USERNAME_MAX)?);
    identity_model.email = Set(email);
    identity_model.first_name = Set(validation::optional("first_name", dto.first_name, 150)?);
    identity_model.last_name = Set(validation::optional("last_name", dto.last_name, 150)?);
    identity_model.updated_at = Set(now.clone());

    let mut customer_model: customer::ActiveModel = existing.into();
    customer_model.phone_number = Set(validation::optional(
        "phone_number",
        dto.phone_number,
        PHONE_NUMBER_MAX,
    )?);
    customer_model.profile_picture = Set(profile_picture(dto.profile_picture)?);
    customer_model.date_of_birth = Set(validation::date("date_of_birth", dto.date_of_birth)?);
    customer_model.updated_at = Set(now);

    let txn = db.begin().await?;
    let identity = identity_model.update(&txn).await?;
    let updated = customer_model.update(&txn).await?;
    txn.commit().await?;

    Ok(CustomerProfile::from_parts(updated, identity))
}

/// Delete a customer. Removing the identity cascades to the customer row
/// and from there to its leads and sales.
pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let found = Customer::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("customer"))?;

    User::delete_by_id(found.user_id).exec(db).await?;
    tracing::info!("Deleted customer {} (user {})", id, found.user_id);
    Ok(())
}

/// Count total customers
pub async fn count_customers(db: &DatabaseConnection) -> Result<u64, DomainError> {
    Ok(Customer::find().count(db).await?)
}
