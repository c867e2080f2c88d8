use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Request body for the external procedure-classification service.
///
/// Unlike the cost service, this one takes the length of stay as a number.
#[derive(Debug, Serialize)]
pub struct CpClasifRequest<'a> {
    #[serde(rename = "ICDPrimer")]
    pub icd_primer: &'a str,
    #[serde(rename = "ICDSekunder1")]
    pub icd_sekunder1: &'a str,
    #[serde(rename = "ICDSekunder2")]
    pub icd_sekunder2: &'a str,
    #[serde(rename = "ICDSekunder3")]
    pub icd_sekunder3: &'a str,
    #[serde(rename = "LamaRawat")]
    pub lama_rawat: i32,
    #[serde(rename = "TipePasien")]
    pub tipe_pasien: &'a str,
    #[serde(rename = "KodeRujukan")]
    pub kode_rujukan: &'a str,
}

/// One classified procedure inside a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub probability: f64,
    pub message: String,
}

/// One ranked category with its candidate procedures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_name: String,
    pub probability: f64,
    pub procedures: Vec<Procedure>,
}

/// The top-categories report for one classification axis (drug,
/// radiology or laboratory).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    pub top_categories: Vec<Category>,
}

/// The full response of the classification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResults {
    pub drug: CategoryReport,
    pub radio: CategoryReport,
    pub laborat: CategoryReport,
    pub timestamp: String,
}

/// One stored result blob, decoded on the way out.
///
/// Blobs are persisted as serialized JSON text. Each one is parsed
/// independently when a record is read; a blob that no longer parses is
/// handed back verbatim instead of failing the whole record.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResultBlob {
    Parsed(CategoryReport),
    Raw(String),
}

impl ResultBlob {
    /// Decodes one stored blob, falling back to the raw text.
    pub fn decode(text: String) -> Self {
        match sonic_rs::from_str::<CategoryReport>(&text) {
            Ok(report) => ResultBlob::Parsed(report),
            Err(e) => {
                tracing::warn!("Stored classification blob failed to parse: {}", e);
                ResultBlob::Raw(text)
            }
        }
    }
}

/// A row of the classification history list (summary columns only).
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationSummary {
    pub id: i64,
    pub icd_primer: String,
    pub icd_sekunder1: Option<String>,
    pub icd_sekunder2: Option<String>,
    pub icd_sekunder3: Option<String>,
    pub lama_rawat: i32,
    pub tipe_pasien: String,
    pub kode_rujukan: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for ClassificationSummary {
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
            created_at: row.get("created_at"),
        }
    }
}

/// A complete classification history record with the blobs still as text.
#[derive(Debug, Clone)]
pub struct ClassificationRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub icd_primer: String,
    pub icd_sekunder1: Option<String>,
    pub icd_sekunder2: Option<String>,
    pub icd_sekunder3: Option<String>,
    pub lama_rawat: i32,
    pub tipe_pasien: String,
    pub kode_rujukan: Option<String>,
    pub drug_results: Option<String>,
    pub radio_results: Option<String>,
    pub laborat_results: Option<String>,
    pub api_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for ClassificationRecord {
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
            drug_results: row.get("drug_results"),
            radio_results: row.get("radio_results"),
            laborat_results: row.get("laborat_results"),
            api_timestamp: row.get("api_timestamp"),
            created_at: row.get("created_at"),
        }
    }
}

/// The detail view of a classification record, blobs decoded per field.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationDetail {
    pub id: i64,
    pub icd_primer: String,
    pub icd_sekunder1: Option<String>,
    pub icd_sekunder2: Option<String>,
    pub icd_sekunder3: Option<String>,
    pub lama_rawat: i32,
    pub tipe_pasien: String,
    pub kode_rujukan: Option<String>,
    pub drug_results: Option<ResultBlob>,
    pub radio_results: Option<ResultBlob>,
    pub laborat_results: Option<ResultBlob>,
    pub api_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ClassificationRecord> for ClassificationDetail {
    fn from(rec: ClassificationRecord) -> Self {
        Self {
            id: rec.id,
            icd_primer: rec.icd_primer,
            icd_sekunder1: rec.icd_sekunder1,
            icd_sekunder2: rec.icd_sekunder2,
            icd_sekunder3: rec.icd_sekunder3,
            lama_rawat: rec.lama_rawat,
            tipe_pasien: rec.tipe_pasien,
            kode_rujukan: rec.kode_rujukan,
            drug_results: rec.drug_results.map(ResultBlob::decode),
            radio_results: rec.radio_results.map(ResultBlob::decode),
            laborat_results: rec.laborat_results.map(ResultBlob::decode),
            api_timestamp: rec.api_timestamp,
            created_at: rec.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_BLOB: &str = r#"{
        "topCategories": [{
            "categoryName": "Antibiotics",
            "probability": 0.91,
            "procedures": [
                {"name": "Ceftriaxone", "probability": 0.77, "message": "commonly indicated"}
            ]
        }]
    }"#;

    #[test]
    fn good_blob_decodes_into_a_report() {
        match ResultBlob::decode(GOOD_BLOB.to_string()) {
            ResultBlob::Parsed(report) => {
                assert_eq!(report.top_categories.len(), 1);
                assert_eq!(report.top_categories[0].category_name, "Antibiotics");
                assert_eq!(report.top_categories[0].procedures[0].name, "Ceftriaxone");
            }
            ResultBlob::Raw(_) => panic!("expected a parsed report"),
        }
    }

    #[test]
    fn malformed_blob_is_returned_verbatim() {
        let text = "{\"topCategories\": [broken".to_string();
        match ResultBlob::decode(text.clone()) {
            ResultBlob::Raw(raw) => assert_eq!(raw, text),
            ResultBlob::Parsed(_) => panic!("expected raw fallback"),
        }
    }

    #[test]
    fn one_bad_blob_does_not_poison_the_others() {
        let rec = ClassificationRecord {
            id: 7,
            user_id: uuid::Uuid::new_v4(),
            icd_primer: "A00".into(),
            icd_sekunder1: None,
            icd_sekunder2: None,
            icd_sekunder3: None,
            lama_rawat: 3,
            tipe_pasien: "IN".into(),
            kode_rujukan: Some("R1".into()),
            drug_results: Some(GOOD_BLOB.to_string()),
            radio_results: Some("not json at all".to_string()),
            laborat_results: Some(GOOD_BLOB.to_string()),
            api_timestamp: None,
            created_at: chrono::Utc::now(),
        };

        let detail = ClassificationDetail::from(rec);
        assert!(matches!(detail.drug_results, Some(ResultBlob::Parsed(_))));
        assert!(matches!(detail.radio_results, Some(ResultBlob::Raw(_))));
        assert!(matches!(detail.laborat_results, Some(ResultBlob::Parsed(_))));
    }

    #[test]
    fn clasif_request_uses_numeric_length_of_stay() {
        let req = CpClasifRequest {
            icd_primer: "A00",
            icd_sekunder1: "",
            icd_sekunder2: "",
            icd_sekunder3: "",
            lama_rawat: 3,
            tipe_pasien: "IN",
            kode_rujukan: "R1",
        };
        let json = sonic_rs::to_string(&req).unwrap();
        assert!(json.contains(r#""LamaRawat":3"#));
        assert!(json.contains(r#""KodeRujukan":"R1""#));
    }
}
