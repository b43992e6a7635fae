use brokerage::db;
use brokerage::domain::{
    AgentRepository, CreateAgentInput, CreatePropertyInput, DomainError, PropertyRepository,
};
use brokerage::infrastructure::{SeaOrmAgentRepository, SeaOrmPropertyRepository};
use brokerage::models::customer::CustomerDto;
use brokerage::models::lead::{self, LeadDto, LeadStatus};
use brokerage::models::sale::{self, SaleDto};
use brokerage::models::task::{self, TaskDto, TaskStatus};
use brokerage::models::{account_balance, commission};
use brokerage::models::account_balance::AccountBalanceDto;
use brokerage::models::commission::CommissionDto;
use brokerage::services::{
    account_service, catalog_service, commission_service, customer_service, lead_service,
    sale_service, task_service,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

struct Fixture {
    property_id: i32,
    agent_id: i32,
    customer_id: i32,
}

async fn create_agent(db: &DatabaseConnection, user_name: &str, location: Option<&str>) -> i32 {
    SeaOrmAgentRepository::new(db.clone())
        .create(CreateAgentInput {
            profile_picture: format!("{}.png", user_name),
            user_name: user_name.to_string(),
            password: "secret".to_string(),
            email: format!("{}@example.com", user_name),
            phone: "555-0100".to_string(),
            location: location.map(str::to_string),
        })
        .await
        .expect("Failed to create agent")
        .id
}

async fn create_fixture(db: &DatabaseConnection) -> Fixture {
    let district = catalog_service::create_district(db, "Springvale").await.unwrap();
    let city = catalog_service::create_city(db, "Lakeside").await.unwrap();
    let category = catalog_service::create_category(db, "Apartment").await.unwrap();

    let property = SeaOrmPropertyRepository::new(db.clone())
        .create(CreatePropertyInput {
            price: Decimal::new(25_000_000, 2),
            district_id: district.id,
            city_id: city.id,
            address: "12 Elm St".to_string(),
            sqft: 900,
            bhk: 2,
            category_id: category.id,
            year_of_construction: 2010,
            images: [
                "a.jpg".to_string(),
                "b.jpg".to_string(),
                "c.jpg".to_string(),
                "d.jpg".to_string(),
            ],
            admin_approval: false,
        })
        .await
        .expect("Failed to create property");

    let agent_id = create_agent(db, "jane", Some("Springvale")).await;

    let customer = customer_service::create_customer(
        db,
        CustomerDto {
            username: "bob".to_string(),
            phone_number: Some("555-1234".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create customer");

    Fixture {
        property_id: property.id,
        agent_id,
        customer_id: customer.id,
    }
}

fn lead_dto(f: &Fixture, status: &str) -> LeadDto {
    LeadDto {
        id: None,
        customer_id: f.customer_id,
        property_id: f.property_id,
        agent_id: f.agent_id,
        lead_status: status.to_string(),
    }
}

async fn record_fixture_sale(db: &DatabaseConnection, f: &Fixture) -> sale::Model {
    sale_service::record_sale(
        db,
        SaleDto {
            agent_id: f.agent_id,
            property_id: f.property_id,
            customer_id: f.customer_id,
            sale_price: 245_000,
        },
    )
    .await
    .expect("Failed to record sale")
}

fn task_dto(agent_id: i32, status: Option<&str>) -> TaskDto {
    TaskDto {
        id: None,
        agent_id,
        deadline: "2026-11-01T10:00:00Z".to_string(),
        description: "Call the buyer".to_string(),
        task_status: status.map(str::to_string),
    }
}

#[tokio::test]
async fn test_duplicate_phone_number_is_rejected() {
    let db = setup_test_db().await;

    let first = CustomerDto {
        username: "alice".to_string(),
        phone_number: Some("555-0001".to_string()),
        ..Default::default()
    };
    customer_service::create_customer(&db, first).await.unwrap();

    let second = CustomerDto {
        username: "carol".to_string(),
        phone_number: Some("555-0001".to_string()),
        ..Default::default()
    };
    let err = customer_service::create_customer(&db, second)
        .await
        .unwrap_err();
    assert!(err.is_duplicate(), "expected duplicate, got {:?}", err);

    // The identity row of the failed customer is rolled back too
    assert_eq!(customer_service::count_customers(&db).await.unwrap(), 1);
    assert_eq!(
        brokerage::models::user::Entity::find().count(&db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let db = setup_test_db().await;

    let dto = CustomerDto {
        username: "alice".to_string(),
        ..Default::default()
    };
    customer_service::create_customer(&db, dto.clone()).await.unwrap();

    let err = customer_service::create_customer(&db, dto).await.unwrap_err();
    assert!(err.is_duplicate(), "expected duplicate, got {:?}", err);
    assert_eq!(customer_service::count_customers(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_customers_without_phone_do_not_collide() {
    let db = setup_test_db().await;

    for name in ["alice", "carol"] {
        let dto = CustomerDto {
            username: name.to_string(),
            phone_number: Some("  ".to_string()),
            ..Default::default()
        };
        let created = customer_service::create_customer(&db, dto).await.unwrap();
        assert_eq!(created.phone_number, None);
    }

    assert_eq!(customer_service::list_customers(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_customer_profile_fields() {
    let db = setup_test_db().await;

    let created = customer_service::create_customer(
        &db,
        CustomerDto {
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            profile_picture: Some("alice.png".to_string()),
            date_of_birth: Some("1990-04-02".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(created.to_string(), "alice");
    assert_eq!(
        created.profile_picture.as_deref(),
        Some("customer_profiles/alice.png")
    );

    let bad_date = customer_service::create_customer(
        &db,
        CustomerDto {
            username: "carol".to_string(),
            date_of_birth: Some("02/04/1990".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_date, Err(DomainError::Validation(_))));

    let updated = customer_service::update_customer(
        &db,
        CustomerDto {
            id: Some(created.id),
            username: "alice".to_string(),
            phone_number: Some("555-0009".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.phone_number.as_deref(), Some("555-0009"));

    let by_phone = customer_service::find_by_phone(&db, " 555-0009 ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_phone.id, created.id);
    assert!(
        customer_service::find_by_phone(&db, "555-0000")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_customer_email_allows_long_addresses() {
    let db = setup_test_db().await;

    let long = format!("{}@example.com", "a".repeat(120));
    let created = customer_service::create_customer(
        &db,
        CustomerDto {
            username: "alice".to_string(),
            email: Some(long.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(created.email.as_deref(), Some(long.as_str()));

    let too_long = format!("{}@example.com", "a".repeat(250));
    let err = customer_service::create_customer(
        &db,
        CustomerDto {
            username: "carol".to_string(),
            email: Some(too_long),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_lead_status_must_be_known() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    for status in ["boiling", " warm ", "Warm", ""] {
        let err = lead_service::create_lead(&db, lead_dto(&f, status))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "accepted {:?}", status);
    }

    let created = lead_service::create_lead(&db, lead_dto(&f, "warm"))
        .await
        .unwrap();
    assert_eq!(created.lead_status, LeadStatus::Warm);

    let err = lead_service::update_lead_status(&db, created.id, "Lukewarm")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let updated = lead_service::update_lead_status(&db, created.id, "hot")
        .await
        .unwrap();
    assert_eq!(updated.lead_status, LeadStatus::Hot);
}

#[tokio::test]
async fn test_lead_requires_existing_rows() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    let mut dto = lead_dto(&f, "cold");
    dto.property_id = 9999;
    let err = lead_service::create_lead(&db, dto).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound("property")));
}

#[tokio::test]
async fn test_lead_display_and_filters() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    let created = lead_service::create_lead(&db, lead_dto(&f, "warm"))
        .await
        .unwrap();
    lead_service::create_lead(&db, lead_dto(&f, "cold"))
        .await
        .unwrap();

    let details = lead_service::get_lead(&db, created.id).await.unwrap();
    assert_eq!(details.to_string(), "Lead for 12 Elm St (warm)");
    assert_eq!(details.agent_name, "jane");
    assert_eq!(details.customer_name, "bob");

    let warm = lead_service::list_leads(
        &db,
        lead_service::LeadFilter {
            lead_status: Some(LeadStatus::Warm),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(warm.len(), 1);

    let counts = lead_service::count_by_status(&db).await.unwrap();
    assert_eq!(counts[&LeadStatus::Cold], 1);
    assert_eq!(counts[&LeadStatus::Hot], 0);
}

#[tokio::test]
async fn test_inactive_agent_gets_no_new_leads() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    let lead = lead_service::create_lead(&db, lead_dto(&f, "cold"))
        .await
        .unwrap();

    let repo = SeaOrmAgentRepository::new(db.clone());
    let other = create_agent(&db, "sam", None).await;
    repo.set_active(other, false).await.unwrap();

    let err = lead_service::reassign_lead(&db, lead.id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    repo.set_active(other, true).await.unwrap();
    let moved = lead_service::reassign_lead(&db, lead.id, other).await.unwrap();
    assert_eq!(moved.agent_id, other);
}

#[tokio::test]
async fn test_task_defaults_to_not_accepted() {
    let db = setup_test_db().await;
    let agent_id = create_agent(&db, "jane", None).await;

    let created = task_service::create_task(&db, task_dto(agent_id, None))
        .await
        .unwrap();
    assert_eq!(created.task_status, TaskStatus::NotAccepted);
    assert_eq!(created.task_status.as_str(), "Not accepted");

    let details = task_service::get_task(&db, created.id).await.unwrap();
    assert_eq!(details.to_string(), "Task for jane - Not accepted");
}

#[tokio::test]
async fn test_task_status_moves_freely() {
    let db = setup_test_db().await;
    let agent_id = create_agent(&db, "jane", None).await;

    let created = task_service::create_task(&db, task_dto(agent_id, Some("Completed")))
        .await
        .unwrap();
    assert_eq!(created.task_status, TaskStatus::Completed);

    for status in ["Not accepted", "Completed", "Accepted", "Not accepted"] {
        let updated = task_service::update_task_status(&db, created.id, status)
            .await
            .unwrap();
        assert_eq!(updated.task_status.as_str(), status);
    }

    let err = task_service::update_task_status(&db, created.id, "Done")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_blank_task_status_is_rejected_on_create() {
    let db = setup_test_db().await;
    let agent_id = create_agent(&db, "jane", None).await;

    for status in ["", "   ", " Accepted"] {
        let err = task_service::create_task(&db, task_dto(agent_id, Some(status)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "accepted {:?}", status);
    }
    assert_eq!(task::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_task_status_is_rejected_on_update() {
    let db = setup_test_db().await;
    let agent_id = create_agent(&db, "jane", None).await;

    let created = task_service::create_task(&db, task_dto(agent_id, Some("Completed")))
        .await
        .unwrap();

    let err = task_service::update_task(&db, created.id, task_dto(agent_id, Some("   ")))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let unchanged = task_service::get_task(&db, created.id).await.unwrap();
    assert_eq!(unchanged.task.task_status, TaskStatus::Completed);

    // Leaving the status out keeps the current one
    let mut dto = task_dto(agent_id, None);
    dto.description = "Send the contract".to_string();
    let updated = task_service::update_task(&db, created.id, dto).await.unwrap();
    assert_eq!(updated.task_status, TaskStatus::Completed);
    assert_eq!(updated.description, "Send the contract");
}

#[tokio::test]
async fn test_task_rejects_bad_deadline() {
    let db = setup_test_db().await;
    let agent_id = create_agent(&db, "jane", None).await;

    let mut dto = task_dto(agent_id, None);
    dto.deadline = "next friday".to_string();
    let err = task_service::create_task(&db, dto).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_record_sale_marks_property_sold() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    let sale = sale_service::record_sale(
        &db,
        SaleDto {
            agent_id: f.agent_id,
            property_id: f.property_id,
            customer_id: f.customer_id,
            sale_price: 245_000,
        },
    )
    .await
    .unwrap();

    let property = SeaOrmPropertyRepository::new(db.clone())
        .find_by_id(f.property_id)
        .await
        .unwrap()
        .unwrap();
    assert!(property.sold_out);

    let details = sale_service::get_sale(&db, sale.id).await.unwrap();
    assert_eq!(details.to_string(), "Sale for 12 Elm St");

    let by_agent = sale_service::list_sales(
        &db,
        sale_service::SaleFilter {
            agent_id: Some(f.agent_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_agent.len(), 1);
    assert_eq!(by_agent[0].property_address, "12 Elm St");
    assert_eq!(
        sale_service::total_sales_for_agent(&db, f.agent_id)
            .await
            .unwrap(),
        245_000
    );

    // A sold property cannot be sold again
    let again = sale_service::record_sale(
        &db,
        SaleDto {
            agent_id: f.agent_id,
            property_id: f.property_id,
            customer_id: f.customer_id,
            sale_price: 1,
        },
    )
    .await;
    assert!(matches!(again, Err(DomainError::Validation(_))));

    sale_service::delete_sale(&db, sale.id).await.unwrap();
    assert!(matches!(
        sale_service::delete_sale(&db, sale.id).await,
        Err(DomainError::NotFound("sale"))
    ));
}

#[tokio::test]
async fn test_deleting_property_cascades() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    lead_service::create_lead(&db, lead_dto(&f, "hot"))
        .await
        .unwrap();
    sale_service::record_sale(
        &db,
        SaleDto {
            agent_id: f.agent_id,
            property_id: f.property_id,
            customer_id: f.customer_id,
            sale_price: 200_000,
        },
    )
    .await
    .unwrap();

    SeaOrmPropertyRepository::new(db.clone())
        .delete(f.property_id)
        .await
        .unwrap();

    assert_eq!(lead::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(sale::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_catalog_entry_cascades_to_properties() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;
    lead_service::create_lead(&db, lead_dto(&f, "cold"))
        .await
        .unwrap();

    let district_id = catalog_service::list_districts(&db).await.unwrap()[0].id;
    catalog_service::delete_district(&db, district_id).await.unwrap();

    let repo = SeaOrmPropertyRepository::new(db.clone());
    assert!(repo.find_by_id(f.property_id).await.unwrap().is_none());
    assert_eq!(lead::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_agent_cascades() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    lead_service::create_lead(&db, lead_dto(&f, "cold"))
        .await
        .unwrap();
    task_service::create_task(&db, task_dto(f.agent_id, None))
        .await
        .unwrap();
    commission_service::create_commission(
        &db,
        CommissionDto {
            agent_id: f.agent_id,
            percentage: 2.5,
            commission_amount: 6125.0,
        },
    )
    .await
    .unwrap();
    account_service::create_balance(
        &db,
        AccountBalanceDto {
            agent_id: f.agent_id,
            total_sales: 245_000.0,
            commission_earned: 6125.0,
            balance: 6125.0,
        },
    )
    .await
    .unwrap();
    record_fixture_sale(&db, &f).await;

    SeaOrmAgentRepository::new(db.clone())
        .delete(f.agent_id)
        .await
        .unwrap();

    assert_eq!(lead::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(task::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(commission::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(account_balance::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(sale::Entity::find().count(&db).await.unwrap(), 0);

    // The property and customer are untouched
    assert!(
        SeaOrmPropertyRepository::new(db.clone())
            .find_by_id(f.property_id)
            .await
            .unwrap()
            .is_some()
    );
    assert!(customer_service::get_customer(&db, f.customer_id).await.is_ok());
}

#[tokio::test]
async fn test_deleting_customer_cascades() {
    let db = setup_test_db().await;
    let f = create_fixture(&db).await;

    lead_service::create_lead(&db, lead_dto(&f, "warm"))
        .await
        .unwrap();
    record_fixture_sale(&db, &f).await;
    customer_service::delete_customer(&db, f.customer_id)
        .await
        .unwrap();

    assert_eq!(lead::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(sale::Entity::find().count(&db).await.unwrap(), 0);
    assert!(matches!(
        customer_service::get_customer(&db, f.customer_id).await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(
        brokerage::models::user::Entity::find().count(&db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_commission_and_balance_are_independent() {
    let db = setup_test_db().await;
    let agent_id = create_agent(&db, "jane", None).await;

    // Amount is stored as given, not derived from the percentage
    let created = commission_service::create_commission(
        &db,
        CommissionDto {
            agent_id,
            percentage: 10.0,
            commission_amount: 42.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.commission_amount, 42.0);

    let details = commission_service::get_commission(&db, created.id)
        .await
        .unwrap();
    assert_eq!(details.to_string(), "Commission for jane");

    let balance = account_service::create_balance(
        &db,
        AccountBalanceDto {
            agent_id,
            total_sales: 100.0,
            commission_earned: 42.0,
            balance: -5.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(balance.balance, -5.0);

    let shown = account_service::get_balance(&db, balance.id).await.unwrap();
    assert_eq!(shown.to_string(), "Balance for jane");

    let negative = commission_service::create_commission(
        &db,
        CommissionDto {
            agent_id,
            percentage: 5.0,
            commission_amount: -1.0,
        },
    )
    .await;
    assert!(matches!(negative, Err(DomainError::Validation(_))));

    commission_service::create_commission(
        &db,
        CommissionDto {
            agent_id,
            percentage: 5.0,
            commission_amount: 8.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        commission_service::total_for_agent(&db, agent_id).await.unwrap(),
        50.0
    );
    assert_eq!(
        commission_service::list_commissions(&db, Some(agent_id))
            .await
            .unwrap()
            .len(),
        2
    );

    let balances = account_service::list_balances(&db).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].agent_name, "jane");
    assert_eq!(
        account_service::get_balances_for_agent(&db, agent_id)
            .await
            .unwrap()[0]
            .id,
        balance.id
    );
}
