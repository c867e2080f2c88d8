use crate::error::{AppError, Result};
use crate::models::classification::{ClassificationResults, CpClasifRequest};
use crate::models::prediction::{CpCostRequest, PredictResults, PredictionForm};
use crate::state::AppState;

/// Calls the external cost-prediction service with the submitted form.
///
/// A non-success status or an unparseable body surfaces as an upstream
/// error. The only timeout is the fixed one on the shared client; there
/// is no retry.
pub async fn predict_cost(state: &AppState, form: &PredictionForm) -> Result<PredictResults> {
    let url = format!("{}/api/CpCost/predict", state.config.predict_base_url);
    let body = CpCostRequest {
        icd_primer: &form.icd_primer,
        icd_sekunder1: form.icd_sekunder1.as_deref().unwrap_or(""),
        icd_sekunder2: form.icd_sekunder2.as_deref().unwrap_or(""),
        icd_sekunder3: form.icd_sekunder3.as_deref().unwrap_or(""),
        lama_rawat: &form.lama_rawat,
        tipe_pasien: &form.tipe_pasien,
    };

    let response = state
        .http
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| classify_transport_error("cost prediction", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "cost prediction service returned {}",
            status
        )));
    }

    response
        .json::<PredictResults>()
        .await
        .map_err(|e| AppError::Upstream(format!("cost prediction body unparseable: {}", e)))
}

/// Calls the external procedure-classification service.
///
/// Only ever invoked after a successful cost prediction; the two calls are
/// sequenced, not raced.
pub async fn classify_procedures(
    state: &AppState,
    form: &PredictionForm,
    lama_rawat: i32,
) -> Result<ClassificationResults> {
    let url = format!("{}/api/CpClasif/predict", state.config.predict_base_url);
    let body = CpClasifRequest {
        icd_primer: &form.icd_primer,
        icd_sekunder1: form.icd_sekunder1.as_deref().unwrap_or(""),
        icd_sekunder2: form.icd_sekunder2.as_deref().unwrap_or(""),
        icd_sekunder3: form.icd_sekunder3.as_deref().unwrap_or(""),
        lama_rawat,
        tipe_pasien: &form.tipe_pasien,
        kode_rujukan: form.kode_rujukan.as_deref().unwrap_or(""),
    };

    let response = state
        .http
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| classify_transport_error("classification", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "classification service returned {}",
            status
        )));
    }

    response
        .json::<ClassificationResults>()
        .await
        .map_err(|e| AppError::Upstream(format!("classification body unparseable: {}", e)))
}

fn classify_transport_error(service: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Upstream(format!("{} service timed out", service))
    } else if e.is_connect() {
        AppError::Upstream(format!("{} service unreachable: {}", service, e))
    } else {
        AppError::Upstream(format!("{} request failed: {}", service, e))
    }
}

/// Parses the textual length of stay from the form.
///
/// The dashboard submits it as a string; anything non-numeric is a
/// validation error before any external call or insert happens.
pub fn parse_lama_rawat(form: &PredictionForm) -> Result<i32> {
    form.lama_rawat
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation("lamaRawat must be a number".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(lama_rawat: &str) -> PredictionForm {
        PredictionForm {
            icd_primer: "A00".into(),
            icd_sekunder1: None,
            icd_sekunder2: None,
            icd_sekunder3: None,
            lama_rawat: lama_rawat.into(),
            tipe_pasien: "IN".into(),
            kode_rujukan: Some("R1".into()),
        }
    }

    #[test]
    fn numeric_length_of_stay_parses() {
        assert_eq!(parse_lama_rawat(&form("3")).unwrap(), 3);
        assert_eq!(parse_lama_rawat(&form(" 14 ")).unwrap(), 14);
    }

    #[test]
    fn non_numeric_length_of_stay_is_invalid_input() {
        for bad in ["", "abc", "3 days", "8+"] {
            match parse_lama_rawat(&form(bad)) {
                Err(AppError::Validation(_)) => {}
                other => panic!("expected validation error for {:?}, got {:?}", bad, other),
            }
        }
    }
}
