use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::classification::{ClassificationRecord, ClassificationSummary};
use crate::models::prediction::PredictionForm;

/// Inserts one immutable classification row and returns its id.
///
/// The three result blobs arrive already serialized; they are stored as
/// text and never reinterpreted on the way in.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &Pool,
    user_id: Uuid,
    form: &PredictionForm,
    lama_rawat: i32,
    drug_results: &str,
    radio_results: &str,
    laborat_results: &str,
    api_timestamp: DateTime<Utc>,
) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO classif_history (
                user_id,
                icd_primer,
                icd_sekunder1,
                icd_sekunder2,
                icd_sekunder3,
                lama_rawat,
                tipe_pasien,
                kode_rujukan,
                drug_results,
                radio_results,
                laborat_results,
                api_timestamp
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            ) RETURNING id
            "#,
            &[
                &user_id,
                &form.icd_primer,
                &form.icd_sekunder1,
                &form.icd_sekunder2,
                &form.icd_sekunder3,
                &lama_rawat,
                &form.tipe_pasien,
                &form.kode_rujukan,
                &drug_results,
                &radio_results,
                &laborat_results,
                &api_timestamp,
            ],
        )
        .await?;
    Ok(row.get("id"))
}

/// Lists a user's classification history, newest first.
pub async fn list_for_user(pool: &Pool, user_id: Uuid) -> Result<Vec<ClassificationSummary>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT
                id,
                icd_primer,
                icd_sekunder1,
                icd_sekunder2,
                icd_sekunder3,
                lama_rawat,
                tipe_pasien,
                kode_rujukan,
                created_at
            FROM classif_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(ClassificationSummary::from).collect())
}

/// Fetches one classification record by id, scoped to its owner.
pub async fn find_by_id(
    pool: &Pool,
    id: i64,
    user_id: Uuid,
) -> Result<Option<ClassificationRecord>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT
                id,
                user_id,
                icd_primer,
                icd_sekunder1,
                icd_sekunder2,
                icd_sekunder3,
                lama_rawat,
                tipe_pasien,
                kode_rujukan,
                drug_results,
                radio_results,
                laborat_results,
                api_timestamp,
                created_at
            FROM classif_history
            WHERE id = $1 AND user_id = $2
            "#,
            &[&id, &user_id],
        )
        .await?;
    Ok(row.as_ref().map(ClassificationRecord::from))
}
