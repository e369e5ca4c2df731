use async_trait::async_trait;

use super::{AccountStore, PgStore};
use crate::models::account::{Account, NewAccount};
use crate::models::person::PersonRef;
use crate::utils::errors::{conflict_error, is_unique_violation, AppError, AppResult};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, is_superuser, created_at";

fn map_username_error(e: sqlx::Error, username: &str) -> AppError {
    if is_unique_violation(&e) {
        conflict_error("Account", "username", username)
    } else {
        AppError::Database(e)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, account: &NewAccount) -> AppResult<Account> {
        let query = format!(
            r#"
            INSERT INTO accounts (username, email, password_hash, is_superuser)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.is_superuser)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_username_error(e, &account.username))
    }

    async fn create_linked_account(&self, account: &NewAccount, person: PersonRef) -> AppResult<Account> {
        let mut tx = self.pool.begin().await?;

        // Bloquear la persona mientras se crea y vincula la cuenta
        let lock_query = format!("SELECT account_id FROM {} WHERE id = $1 FOR UPDATE", person.kind.table());
        let current: Option<(Option<i64>,)> = sqlx::query_as(&lock_query)
            .bind(person.id)
            .fetch_optional(&mut *tx)
            .await?;

        match current {
            None => {
                return Err(AppError::NotFound(format!(
                    "{} with id '{}' not found",
                    person.kind.label(),
                    person.id
                )))
            }
            Some((Some(_),)) => {
                return Err(AppError::Conflict(format!("{} ya tiene una cuenta vinculada", person)));
            }
            Some((None,)) => {}
        }

        let insert_query = format!(
            r#"
            INSERT INTO accounts (username, email, password_hash, is_superuser)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );
        let created = sqlx::query_as::<_, Account>(&insert_query)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.is_superuser)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_username_error(e, &account.username))?;

        let link_query = format!("UPDATE {} SET account_id = $2 WHERE id = $1", person.kind.table());
        sqlx::query(&link_query)
            .bind(person.id)
            .bind(created.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn find_account(&self, id: i64) -> AppResult<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE username = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }
}
