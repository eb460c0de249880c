use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;
use std::env;
use uuid::Uuid;

use super::m20230904_101500_create_users::USER_TYPE_ENUM;
use super::support::ensure_no_violations;
use crate::utils::password;

const DEFAULT_ADMIN_EMAIL: &str = "admin@catalogue.local";
const GENERATED_PASSWORD_LENGTH: usize = 24;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let email = admin_email();
        let backend = manager.get_database_backend();
        let db = manager.get_connection();

        let existing = Query::select()
            .expr_as(Expr::col(Users::Id).count(), Alias::new("count"))
            .from(Users::Table)
            .and_where(Expr::col(Users::Email).eq(email.as_str()))
            .to_owned();
        let already_there = match db.query_one(backend.build(&existing)).await? {
            Some(row) => row.try_get::<i64>("", "count")? > 0,
            None => false,
        };
        if already_there {
            log::info!("Admin account {} already exists, skipping seed", email);
            return Ok(());
        }

        let plain_password = match env::var("SEED_ADMIN_PASSWORD") {
            Ok(password) if !password.is_empty() => password,
            _ => {
                let generated: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(GENERATED_PASSWORD_LENGTH)
                    .map(char::from)
                    .collect();
                log::warn!(
                    "SEED_ADMIN_PASSWORD not set: admin account {} created with generated password {}",
                    email,
                    generated
                );
                generated
            }
        };

        let password_hash = password::hash_password(&plain_password)
            .map_err(|e| DbErr::Migration(format!("failed to hash admin password: {}", e)))?;
        let now = Utc::now().fixed_offset();

        let insert = Query::insert()
            .into_table(Users::Table)
            .columns([
                Users::Id,
                Users::Email,
                Users::Name,
                Users::Type,
                Users::Password,
                Users::IsAdmin,
                Users::IsActivated,
                Users::CreatedAt,
                Users::UpdatedAt,
            ])
            .values_panic([
                Uuid::new_v4().into(),
                email.clone().into(),
                "Administrator".into(),
                Expr::val("none").as_enum(Alias::new(USER_TYPE_ENUM)),
                password_hash.into(),
                true.into(),
                true.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();
        db.execute(backend.build(&insert)).await?;

        log::info!("Seeded admin account {}", email);
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let email = admin_email();

        // La suppression du compte emporterait ses datasets en cascade
        ensure_no_violations(
            manager,
            &format!(
                r#"SELECT COUNT(*) AS count FROM "datasets" WHERE "user_id" IN
                    (SELECT "id" FROM "users" WHERE "email" = '{}' AND "is_admin" = TRUE)"#,
                email.replace('\'', "''")
            ),
            "removal of the seeded admin while it owns datasets",
        )
        .await?;

        let delete = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Email).eq(email))
            .and_where(Expr::col(Users::IsAdmin).eq(true))
            .to_owned();

        manager
            .get_connection()
            .execute(manager.get_database_backend().build(&delete))
            .await?;
        Ok(())
    }
}

fn admin_email() -> String {
    normalize_admin_email(env::var("SEED_ADMIN_EMAIL").ok())
}

/// Même forme que les emails enregistrés par l'API, sinon le compte est injoignable.
fn normalize_admin_email(raw: Option<String>) -> String {
    match raw.map(|email| email.trim().to_lowercase()) {
        Some(email) if !email.is_empty() => email,
        _ => DEFAULT_ADMIN_EMAIL.to_string(),
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    Type,
    Password,
    IsAdmin,
    IsActivated,
    CreatedAt,
    UpdatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_email_is_normalized() {
        assert_eq!(
            normalize_admin_email(Some("  Admin@Example.org ".to_string())),
            "admin@example.org"
        );
    }

    #[test]
    fn test_admin_email_falls_back_to_default() {
        assert_eq!(normalize_admin_email(None), DEFAULT_ADMIN_EMAIL);
        assert_eq!(normalize_admin_email(Some("   ".to_string())), DEFAULT_ADMIN_EMAIL);
    }
}
