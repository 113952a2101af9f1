use crate::db::connect;
use crate::counter;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use anyhow::Result;
use migration::MigratorTrait;
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Test counter row CRUD operations
#[tokio::test]
async fn test_counter_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let counter_name = format!("test_counter_{}", Uuid::new_v4());

    // Test Create
    let am = counter::ActiveModel { name: Set(counter_name.clone()), value: Set(5) };
    let created = am.insert(&db).await?;
    assert_eq!(created.name, counter_name);
    assert_eq!(created.value, 5);

    // Test Read via helper
    let found = counter::find_by_name(&db, &counter_name).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().value, 5);

    // Test Update
    let mut am: counter::ActiveModel = counter::Entity::find_by_id(counter_name.clone())
        .one(&db)
        .await?
        .expect("row exists")
        .into();
    am.value = Set(6);
    let updated = am.update(&db).await?;
    assert_eq!(updated.value, 6);

    // Test Delete
    counter::Entity::delete_by_id(counter_name.clone()).exec(&db).await?;
    let after = counter::find_by_name(&db, &counter_name).await?;
    assert!(after.is_none());

    Ok(())
}

/// Values are signed; negative initials must round-trip
#[tokio::test]
async fn test_counter_negative_value() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let counter_name = format!("test_negative_{}", Uuid::new_v4());
    let am = counter::ActiveModel { name: Set(counter_name.clone()), value: Set(-42) };
    let created = am.insert(&db).await?;
    assert_eq!(created.value, -42);

    counter::Entity::delete_by_id(counter_name).exec(&db).await?;
    Ok(())
}
