use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::prediction::{PredictResults, PredictionForm, PredictionRecord, PredictionSummary};

/// Inserts one immutable cost-prediction row and returns its id.
///
/// Monetary amounts are stored exactly as relayed from the cost service;
/// nothing is recomputed here.
pub async fn insert(
    pool: &Pool,
    user_id: Uuid,
    form: &PredictionForm,
    lama_rawat: i32,
    results: &PredictResults,
) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO prediction_history (
                user_id,
                icd_primer,
                icd_sekunder1,
                icd_sekunder2,
                icd_sekunder3,
                lama_rawat,
                tipe_pasien,
                non_bedah,
                bedah,
                konsul_dokter,
                konsul_tenaga_ahli,
                tind_keperawatan,
                penunjang,
                radiologi,
                laboratorium,
                pelayanan_darah,
                rehabilitasi,
                akomodasi,
                akomodasi_intensif,
                bmhp,
                alat_medis,
                obat,
                obat_kronis,
                obat_kemoterapi,
                alkes,
                total_cost,
                kode_rujukan
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
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
                &results.non_bedah,
                &results.bedah,
                &results.konsul_dokter,
                &results.konsul_tenaga_ahli,
                &results.tind_keperawatan,
                &results.penunjang,
                &results.radiologi,
                &results.laboratorium,
                &results.pelayanan_darah,
                &results.rehabilitasi,
                &results.akomodasi,
                &results.akomodasi_intensif,
                &results.bmhp,
                &results.alat_medis,
                &results.obat,
                &results.obat_kronis,
                &results.obat_kemoterapi,
                &results.alkes,
                &results.total_cost,
                &form.kode_rujukan,
            ],
        )
        .await?;
    Ok(row.get("id"))
}

/// Lists a user's prediction history, newest first.
pub async fn list_for_user(pool: &Pool, user_id: Uuid) -> Result<Vec<PredictionSummary>> {
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
                total_cost,
                kode_rujukan,
                created_at
            FROM prediction_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
            &[&user_id],
        )
        .await?;
    Ok(rows.iter().map(PredictionSummary::from).collect())
}

/// Fetches one prediction record by id, scoped to its owner.
///
/// The owner filter lives in the statement itself: a row owned by someone
/// else comes back as `None`, exactly like a missing id.
pub async fn find_by_id(pool: &Pool, id: i64, user_id: Uuid) -> Result<Option<PredictionRecord>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM prediction_history
            WHERE id = $1 AND user_id = $2
            "#,
            &[&id, &user_id],
        )
        .await?;
    Ok(row.as_ref().map(PredictionRecord::from))
}
