/// Integration tests for entity CRUD against PostgreSQL
///
/// Skipped when DATABASE_URL is not set.

use orderly_shared::codec::{decode_list, encode_list};
use orderly_shared::db::migrations::run_migrations;
use orderly_shared::db::pool::{create_pool, DatabaseConfig};
use orderly_shared::error::StoreError;
use orderly_shared::models::company::{Company, CreateCompany, UpdateCompany};
use orderly_shared::models::item::{CreateItem, Item, ItemFilter, ItemStatus, UpdateItem};
use orderly_shared::models::order::{CreateOrder, Order, OrderRelations, OrderStatus, UpdateOrder};
use orderly_shared::models::user::{CreateUser, UpdateUser, User};
use orderly_shared::models::ListParams;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

async fn setup() -> Option<PgPool> {
    let url = env::var("DATABASE_URL").ok()?;
    let pool = create_pool(DatabaseConfig {
        url,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations failed");
    Some(pool)
}

fn new_user() -> CreateUser {
    CreateUser {
        name: "Test User".to_string(),
        phone: "0123456789".to_string(),
        role: "admin".to_string(),
        status: "active".to_string(),
        location: "Lagos".to_string(),
        email: format!("user-{}@example.com", Uuid::new_v4()),
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

fn new_item(name: &str) -> CreateItem {
    CreateItem {
        name: name.to_string(),
        unit: "piece".to_string(),
        unit_price: Decimal::new(1999, 2),
        status: ItemStatus::Available,
        category: format!("cat-{}", Uuid::new_v4()),
    }
}

#[tokio::test]
async fn test_user_lifecycle() {
    let Some(pool) = setup().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let user = User::create(&pool, new_user()).await.expect("create");
    assert_eq!(User::get(&pool, user.id).await.expect("get").email, user.email);
    assert!(User::find_by_email(&pool, &user.email).await.expect("find").is_some());

    // Identical values change nothing
    let same = UpdateUser {
        name: Some(user.name.clone()),
        phone: Some(user.phone.clone()),
        ..Default::default()
    };
    assert!(matches!(
        User::update(&pool, user.id, same).await,
        Err(StoreError::NoRowsAffected { .. })
    ));

    // Empty patch is a no-op too
    assert!(matches!(
        User::update(&pool, user.id, UpdateUser::default()).await,
        Err(StoreError::NoRowsAffected { .. })
    ));

    let updated = User::update(
        &pool,
        user.id,
        UpdateUser {
            status: Some("suspended".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.status, "suspended");
    assert_eq!(updated.name, user.name);

    User::delete(&pool, user.id).await.expect("delete");
    assert!(User::get(&pool, user.id).await.unwrap_err().is_not_found());
    assert!(User::delete(&pool, user.id).await.unwrap_err().is_not_found());
    assert!(matches!(
        User::update(&pool, user.id, UpdateUser { name: Some("x".into()), ..Default::default() }).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_email_is_unique_violation() {
    let Some(pool) = setup().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let data = new_user();
    User::create(&pool, data.clone()).await.expect("create");

    let err = User::create(&pool, data).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_unique_violation());
    assert_eq!(db_err.constraint(), Some("users_email_key"));
}

#[tokio::test]
async fn test_item_filters() {
    let Some(pool) = setup().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let name = format!("merchant-{}", Uuid::new_v4());
    let item = Item::create(&pool, new_item(&name)).await.expect("create");
    assert_eq!(item.get_status(), Some(ItemStatus::Available));
    assert_eq!(item.unit_price, Decimal::new(1999, 2));

    let by_category = Item::find_by(
        &pool,
        &ItemFilter {
            category: Some(item.category.clone()),
            name: None,
        },
        ListParams::default(),
    )
    .await
    .expect("find_by");
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].id, item.id);

    let by_name = Item::find_by(
        &pool,
        &ItemFilter {
            category: None,
            name: Some(name),
        },
        ListParams::default(),
    )
    .await
    .expect("find_by");
    assert_eq!(by_name.len(), 1);

    let updated = Item::update(
        &pool,
        item.id,
        UpdateItem {
            status: Some(ItemStatus::OutOfStock),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.status, "out_of_stock");
    assert_eq!(updated.unit_price, item.unit_price);
}

#[tokio::test]
async fn test_order_reference_checks() {
    let Some(pool) = setup().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let user = User::create(&pool, new_user()).await.expect("user");
    let item = Item::create(&pool, new_item("Widget")).await.expect("item");

    let before = Order::count(&pool).await.expect("count");
    let missing = Uuid::new_v4();
    let err = Order::create(
        &pool,
        CreateOrder {
            user_id: missing,
            item_id: item.id,
            quantity: 1,
            total_price: Decimal::ONE,
            status: OrderStatus::Pending,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::ReferenceNotFound { entity: "user", id } if id == missing));
    assert_eq!(Order::count(&pool).await.expect("count"), before);

    let order = Order::create(
        &pool,
        CreateOrder {
            user_id: user.id,
            item_id: item.id,
            quantity: 3,
            total_price: Decimal::new(5997, 2),
            status: OrderStatus::Pending,
        },
    )
    .await
    .expect("create");

    let updated = Order::update(
        &pool,
        order.id,
        UpdateOrder {
            status: Some(OrderStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.quantity, 3);
    assert_eq!(updated.total_price, Decimal::new(5997, 2));
    assert_eq!(updated.get_status(), Some(OrderStatus::Completed));

    // Dangling references are tolerated on read
    Item::delete(&pool, item.id).await.expect("delete item");
    let relations = OrderRelations::load(&pool, std::slice::from_ref(&updated))
        .await
        .expect("relations");
    assert!(relations.user(user.id).is_some());
    assert!(relations.item(item.id).is_none());
}

#[tokio::test]
async fn test_company_lists_round_trip() {
    let Some(pool) = setup().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };

    let markets = vec!["EU".to_string(), "ASIA".to_string()];
    let company = Company::create(
        &pool,
        CreateCompany {
            company_name: "Acme".to_string(),
            merchant_url: "https://acme.example".to_string(),
            date_of_incorporation: "2020-01-01".to_string(),
            company_reg_number: "RC123".to_string(),
            country_of_incorporation: "NG".to_string(),
            company_email: "info@acme.example".to_string(),
            contact_person_full_name: "Jane Doe".to_string(),
            contact_person_telephone: "0123456789".to_string(),
            contact_person_email: "jane@acme.example".to_string(),
            business_description: "Widgets".to_string(),
            company_source_of_funds: "Revenue".to_string(),
            business_relationship_purpose: "Payments".to_string(),
            is_licensed: true,
            bank_name: "Bank".to_string(),
            swift_code: "BANKNGLA".to_string(),
            target_markets: encode_list("target_markets", &markets).unwrap(),
            countries_of_operation: "[]".to_string(),
            previously_used_payment_gateways: "[]".to_string(),
        },
    )
    .await
    .expect("create");

    let stored = Company::get(&pool, company.id).await.expect("get");
    assert_eq!(decode_list("target_markets", &stored.target_markets).unwrap(), markets);
    assert!(decode_list("countries_of_operation", &stored.countries_of_operation)
        .unwrap()
        .is_empty());

    let updated = Company::update(
        &pool,
        company.id,
        UpdateCompany {
            is_licensed: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    assert!(!updated.is_licensed);
    assert_eq!(updated.target_markets, stored.target_markets);

    Company::delete(&pool, company.id).await.expect("delete");
}
