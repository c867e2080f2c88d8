use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// The clinical form submitted by the dashboard.
///
/// `lama_rawat` (length of stay) arrives as text and is parsed before any
/// insert; secondary codes and the referral code may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionForm {
    pub icd_primer: String,
    #[serde(default)]
    pub icd_sekunder1: Option<String>,
    #[serde(default)]
    pub icd_sekunder2: Option<String>,
    #[serde(default)]
    pub icd_sekunder3: Option<String>,
    pub lama_rawat: String,
    pub tipe_pasien: String,
    #[serde(default)]
    pub kode_rujukan: Option<String>,
}

/// Request body for the external cost-prediction service.
///
/// The field names are the upstream contract, not ours.
#[derive(Debug, Serialize)]
pub struct CpCostRequest<'a> {
    #[serde(rename = "ICDPrimer")]
    pub icd_primer: &'a str,
    #[serde(rename = "ICDSekunder1")]
    pub icd_sekunder1: &'a str,
    #[serde(rename = "ICDSekunder2")]
    pub icd_sekunder2: &'a str,
    #[serde(rename = "ICDSekunder3")]
    pub icd_sekunder3: &'a str,
    #[serde(rename = "LamaRawat")]
    pub lama_rawat: &'a str,
    #[serde(rename = "TipePasien")]
    pub tipe_pasien: &'a str,
}

/// The itemized cost breakdown returned by the cost-prediction service.
///
/// Stored as-is; this service never recomputes any of the amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResults {
    #[serde(rename = "non_Bedah")]
    pub non_bedah: f64,
    pub bedah: f64,
    #[serde(rename = "konsul_Dokter")]
    pub konsul_dokter: f64,
    #[serde(rename = "konsul_Tenaga_Ahli")]
    pub konsul_tenaga_ahli: f64,
    #[serde(rename = "tind_Keperawatan")]
    pub tind_keperawatan: f64,
    pub penunjang: f64,
    pub radiologi: f64,
    pub laboratorium: f64,
    #[serde(rename = "pelayanan_Darah")]
    pub pelayanan_darah: f64,
    pub rehabilitasi: f64,
    pub akomodasi: f64,
    #[serde(rename = "akomodasi_Intensif")]
    pub akomodasi_intensif: f64,
    pub bmhp: f64,
    #[serde(rename = "alat_Medis")]
    pub alat_medis: f64,
    pub obat: f64,
    #[serde(rename = "obat_Kronis")]
    pub obat_kronis: f64,
    #[serde(rename = "obat_Kemoterapi")]
    pub obat_kemoterapi: f64,
    pub alkes: f64,
    #[serde(rename = "total_Cost")]
    pub total_cost: f64,
}

/// A row of the prediction history list (summary columns only).
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSummary {
    pub id: i64,
    pub icd_primer: String,
    pub icd_sekunder1: Option<String>,
    pub icd_sekunder2: Option<String>,
    pub icd_sekunder3: Option<String>,
    pub lama_rawat: i32,
    pub tipe_pasien: String,
    pub kode_rujukan: Option<String>,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for PredictionSummary {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            icd_primer: row.get("icd_primer"),
            icd_sekunder1: row.get("icd_sekunder1"),
            icd_sekunder2: row.get("icd_sekunder2"),
            icd_sekunder3: row.get("icd_sekunder3"),
            lama_rawat: row.get("lama_rawat"),
            tipe_pasien: row.get("tipe_pasien"),
            kode_rujukan: row.get("kode_rujukan"),
            total_cost: row.get("total_cost"),
            created_at: row.get("created_at"),
        }
    }
}

/// A complete, immutable prediction history record.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub icd_primer: String,
    pub icd_sekunder1: Option<String>,
    pub icd_sekunder2: Option<String>,
    pub icd_sekunder3: Option<String>,
    pub lama_rawat: i32,
    pub tipe_pasien: String,
    pub kode_rujukan: Option<String>,
    pub non_bedah: f64,
    pub bedah: f64,
    pub konsul_dokter: f64,
    pub konsul_tenaga_ahli: f64,
    pub tind_keperawatan: f64,
    pub penunjang: f64,
    pub radiologi: f64,
    pub laboratorium: f64,
    pub pelayanan_darah: f64,
    pub rehabilitasi: f64,
    pub akomodasi: f64,
    pub akomodasi_intensif: f64,
    pub bmhp: f64,
    pub alat_medis: f64,
    pub obat: f64,
    pub obat_kronis: f64,
    pub obat_kemoterapi: f64,
    pub alkes: f64,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for PredictionRecord {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            icd_primer: row.get("icd_primer"),
            icd_sekunder1: row.get("icd_sekunder1"),
            icd_sekunder2: row.get("icd_sekunder2"),
            icd_sekunder3: row.get("icd_sekunder3"),
            lama_rawat: row.get("lama_rawat"),
            tipe_pasien: row.get("tipe_pasien"),
            kode_rujukan: row.get("kode_rujukan"),
            non_bedah: row.get("non_bedah"),
            bedah: row.get("bedah"),
            konsul_dokter: row.get("konsul_dokter"),
            konsul_tenaga_ahli: row.get("konsul_tenaga_ahli"),
            tind_keperawatan: row.get("tind_keperawatan"),
            penunjang: row.get("penunjang"),
            radiologi: row.get("radiologi"),
            laboratorium: row.get("laboratorium"),
            pelayanan_darah: row.get("pelayanan_darah"),
            rehabilitasi: row.get("rehabilitasi"),
            akomodasi: row.get("akomodasi"),
            akomodasi_intensif: row.get("akomodasi_intensif"),
            bmhp: row.get("bmhp"),
            alat_medis: row.get("alat_medis"),
            obat: row.get("obat"),
            obat_kronis: row.get("obat_kronis"),
            obat_kemoterapi: row.get("obat_kemoterapi"),
            alkes: row.get("alkes"),
            total_cost: row.get("total_cost"),
            created_at: row.get("created_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cp_cost_request_uses_the_upstream_field_names() {
        let req = CpCostRequest {
            icd_primer: "A00",
            icd_sekunder1: "Z03",
            icd_sekunder2: "",
            icd_sekunder3: "",
            lama_rawat: "3",
            tipe_pasien: "IN",
        };
        let json = sonic_rs::to_string(&req).unwrap();
        assert!(json.contains(r#""ICDPrimer":"A00""#));
        assert!(json.contains(r#""LamaRawat":"3""#));
        assert!(json.contains(r#""TipePasien":"IN""#));
    }

    #[test]
    fn predict_results_parse_the_upstream_shape() {
        let body = r#"{
            "non_Bedah": 150000.0, "bedah": 0.0, "konsul_Dokter": 80000.0,
            "konsul_Tenaga_Ahli": 0.0, "tind_Keperawatan": 45000.5,
            "penunjang": 0.0, "radiologi": 120000.0, "laboratorium": 95000.0,
            "pelayanan_Darah": 0.0, "rehabilitasi": 0.0, "akomodasi": 300000.0,
            "akomodasi_Intensif": 0.0, "bmhp": 25000.0, "alat_Medis": 0.0,
            "obat": 175000.0, "obat_Kronis": 0.0, "obat_Kemoterapi": 0.0,
            "alkes": 30000.0, "total_Cost": 1020000.5
        }"#;
        let results: PredictResults = sonic_rs::from_str(body).unwrap();
        assert_eq!(results.non_bedah, 150000.0);
        assert_eq!(results.tind_keperawatan, 45000.5);
        assert_eq!(results.total_cost, 1020000.5);
    }

    #[test]
    fn form_accepts_missing_secondary_codes() {
        let body = r#"{"icdPrimer":"A00","lamaRawat":"3","tipePasien":"IN","kodeRujukan":"R1"}"#;
        let form: PredictionForm = sonic_rs::from_str(body).unwrap();
        assert_eq!(form.icd_primer, "A00");
        assert!(form.icd_sekunder1.is_none());
        assert_eq!(form.kode_rujukan.as_deref(), Some("R1"));
    }
}
