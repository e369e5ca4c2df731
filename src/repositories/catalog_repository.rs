use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};

use super::{CatalogStore, PgStore};
use crate::models::catalog::{Brand, Copier, CopierImage, CopierValues, Feature};
use crate::utils::errors::{conflict_error, is_foreign_key_violation, is_unique_violation, AppError, AppResult};

const COPIER_COLUMNS: &str = "id, model, manufacturer, description, cartridge, characteristics, speed, brand_id";

fn map_brand_error(e: sqlx::Error, name: &str) -> AppError {
    if is_unique_violation(&e) {
        conflict_error("Marca", "nome", name)
    } else {
        AppError::Database(e)
    }
}

fn map_copier_error(e: sqlx::Error, values: &CopierValues) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::NotFound(format!(
            "Marca '{}' o funcionalidades {:?} no encontradas",
            values.brand_id, values.feature_ids
        ))
    } else {
        AppError::Database(e)
    }
}

/// Reemplaza funcionalidades e imágenes de la copiadora dentro de la transacción
async fn replace_copier_relations(
    conn: &mut PgConnection,
    copier_id: i64,
    values: &CopierValues,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM copier_features WHERE copier_id = $1")
        .bind(copier_id)
        .execute(&mut *conn)
        .await?;

    for feature_id in values.unique_feature_ids() {
        sqlx::query("INSERT INTO copier_features (copier_id, feature_id) VALUES ($1, $2)")
            .bind(copier_id)
            .bind(feature_id)
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query("DELETE FROM copier_images WHERE copier_id = $1")
        .bind(copier_id)
        .execute(&mut *conn)
        .await?;

    for image in &values.images {
        sqlx::query("INSERT INTO copier_images (copier_id, url, description) VALUES ($1, $2, $3)")
            .bind(copier_id)
            .bind(&image.url)
            .bind(&image.description)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

async fn finish_copier_write(
    mut tx: Transaction<'_, Postgres>,
    copier: Copier,
    values: &CopierValues,
) -> AppResult<Copier> {
    replace_copier_relations(&mut tx, copier.id, values)
        .await
        .map_err(|e| map_copier_error(e, values))?;
    tx.commit().await?;
    Ok(copier)
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(brands)
    }

    async fn find_brand(&self, id: i64) -> AppResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(brand)
    }

    async fn create_brand(&self, name: &str) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>("INSERT INTO brands (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_brand_error(e, name))
    }

    async fn update_brand(&self, id: i64, name: &str) -> AppResult<Option<Brand>> {
        sqlx::query_as::<_, Brand>("UPDATE brands SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_brand_error(e, name))
    }

    async fn delete_brand(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_features(&self) -> AppResult<Vec<Feature>> {
        let features = sqlx::query_as::<_, Feature>("SELECT id, name FROM features ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(features)
    }

    async fn find_feature(&self, id: i64) -> AppResult<Option<Feature>> {
        let feature = sqlx::query_as::<_, Feature>("SELECT id, name FROM features WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(feature)
    }

    async fn create_feature(&self, name: &str) -> AppResult<Feature> {
        let feature = sqlx::query_as::<_, Feature>("INSERT INTO features (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(feature)
    }

    async fn update_feature(&self, id: i64, name: &str) -> AppResult<Option<Feature>> {
        let feature =
            sqlx::query_as::<_, Feature>("UPDATE features SET name = $2 WHERE id = $1 RETURNING id, name")
                .bind(id)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(feature)
    }

    async fn delete_feature(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_copiers(&self) -> AppResult<Vec<Copier>> {
        let query = format!("SELECT {} FROM copiers ORDER BY id", COPIER_COLUMNS);
        let copiers = sqlx::query_as::<_, Copier>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(copiers)
    }

    async fn find_copier(&self, id: i64) -> AppResult<Option<Copier>> {
        let query = format!("SELECT {} FROM copiers WHERE id = $1", COPIER_COLUMNS);
        let copier = sqlx::query_as::<_, Copier>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(copier)
    }

    async fn create_copier(&self, values: &CopierValues) -> AppResult<Copier> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO copiers (model, manufacturer, description, cartridge, characteristics, speed, brand_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            COPIER_COLUMNS
        );
        let copier = sqlx::query_as::<_, Copier>(&query)
            .bind(&values.model)
            .bind(&values.manufacturer)
            .bind(&values.description)
            .bind(&values.cartridge)
            .bind(&values.characteristics)
            .bind(&values.speed)
            .bind(values.brand_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_copier_error(e, values))?;

        finish_copier_write(tx, copier, values).await
    }

    async fn update_copier(&self, id: i64, values: &CopierValues) -> AppResult<Option<Copier>> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE copiers
            SET model = $2, manufacturer = $3, description = $4, cartridge = $5,
                characteristics = $6, speed = $7, brand_id = $8
            WHERE id = $1
            RETURNING {}
            "#,
            COPIER_COLUMNS
        );
        let copier = sqlx::query_as::<_, Copier>(&query)
            .bind(id)
            .bind(&values.model)
            .bind(&values.manufacturer)
            .bind(&values.description)
            .bind(&values.cartridge)
            .bind(&values.characteristics)
            .bind(&values.speed)
            .bind(values.brand_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_copier_error(e, values))?;

        match copier {
            Some(copier) => finish_copier_write(tx, copier, values).await.map(Some),
            None => Ok(None),
        }
    }

    async fn delete_copier(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM copiers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn copier_features(&self, copier_id: i64) -> AppResult<Vec<Feature>> {
        let features = sqlx::query_as::<_, Feature>(
            r#"
            SELECT f.id, f.name
            FROM features f
            JOIN copier_features cf ON cf.feature_id = f.id
            WHERE cf.copier_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(copier_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(features)
    }

    async fn copier_images(&self, copier_id: i64) -> AppResult<Vec<CopierImage>> {
        let images = sqlx::query_as::<_, CopierImage>(
            "SELECT id, copier_id, url, description FROM copier_images WHERE copier_id = $1 ORDER BY id",
        )
        .bind(copier_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }
}
