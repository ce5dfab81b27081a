use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use tornlink_core::{ApiError, BankRates, BankTerm, Course, EducationCourses, Result};

use super::decode;

#[derive(Debug, Deserialize)]
struct BankV1 {
    bank: BTreeMap<String, Value>,
}

/// v1 `torn/bank`: rates keyed by term code, as numbers or numeric strings
///
/// Unknown term codes are skipped.
pub(super) fn bank_rates_v1(raw: &Value) -> Result<BankRates> {
    let wire: BankV1 = decode("v1 bank", raw)?;

    let mut rates = BTreeMap::new();
    for (code, rate) in &wire.bank {
        let Some(term) = BankTerm::from_code(code) else {
            continue;
        };
        let rate = match rate {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| ApiError::Malformed(format!("v1 bank: invalid rate for {code}")))?;
        rates.insert(term, rate);
    }

    Ok(BankRates { rates })
}

#[derive(Debug, Deserialize)]
struct CourseV1 {
    name: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EducationV1 {
    education: BTreeMap<u32, CourseV1>,
}

pub(super) fn education_v1(raw: &Value) -> Result<EducationCourses> {
    let wire: EducationV1 = decode("v1 education", raw)?;
    let courses = wire
        .education
        .into_iter()
        .map(|(id, course)| {
            (
                id,
                Course {
                    name: course.name,
                    code: course.code,
                    duration: course.duration,
                },
            )
        })
        .collect();
    Ok(EducationCourses { courses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bank_rates_mixed_types() {
        let body = json!({"bank": {"1w": "0.81", "2w": 0.92, "1m": "1.03", "2m": "1.2", "3m": 1.4, "6m": "9.9"}});
        let rates = bank_rates_v1(&body).unwrap();
        assert_eq!(rates.rates.len(), 5);
        assert_eq!(rates.rates[&BankTerm::OneWeek], 0.81);
        assert_eq!(rates.rates[&BankTerm::ThreeMonths], 1.4);
    }

    #[test]
    fn test_bank_rate_garbage_rejected() {
        let body = json!({"bank": {"1w": "soon"}});
        assert!(matches!(bank_rates_v1(&body), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_education_v1() {
        let body = json!({
            "education": {
                "1": {"name": "Bachelor of Biology", "code": "BIO1000", "duration": 604800},
                "12": {"name": "Introduction to Law"}
            }
        });
        let courses = education_v1(&body).unwrap();
        assert_eq!(courses.name(1), Some("Bachelor of Biology"));
        assert_eq!(courses.courses[&12].duration, None);
        assert_eq!(courses.name(2), None);
    }
}
