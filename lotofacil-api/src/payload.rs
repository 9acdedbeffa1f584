use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use lotofacil_core::error::{CoreError, Result};
use lotofacil_core::models::{Draw, GameRules, validate_draw};

/// Contest as served by the results API. Only the fields the pipeline needs
/// are kept; numbers arrive either as strings ("07") or as integers.
#[derive(Debug, Clone, Deserialize)]
pub struct DrawPayload {
    pub concurso: u32,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub dezenas: Vec<Value>,
}

impl DrawPayload {
    /// Converts into a strict draw, rejecting anything the game cannot produce.
    pub fn into_draw(self, rules: &GameRules) -> Result<Draw> {
        let index = self.concurso;
        let numbers = self
            .dezenas
            .iter()
            .map(|v| parse_number(index, v))
            .collect::<Result<Vec<u8>>>()?;

        let mut draw = Draw::new(index, numbers)?;
        validate_draw(&draw, rules)?;

        if let Some(raw) = self.data.as_deref().filter(|s| !s.trim().is_empty()) {
            draw = draw.with_date(parse_date(index, raw)?);
        }
        Ok(draw)
    }
}

fn parse_number(index: u32, value: &Value) -> Result<u8> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<u8>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        _ => None,
    };
    parsed.ok_or_else(|| CoreError::malformed(index, format!("unparsable number {value}")))
}

fn parse_date(index: u32, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map_err(|e| CoreError::malformed(index, format!("invalid date '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "loteria": "lotofacil",
        "concurso": 3001,
        "data": "13/01/2024",
        "local": "ESPAÇO DA SORTE em SÃO PAULO, SP",
        "dezenas": ["01","03","04","06","08","09","11","13","15","17","18","20","22","24","25"],
        "acumulou": false
    }"#;

    #[test]
    fn test_payload_to_draw() {
        let payload: DrawPayload = serde_json::from_str(SAMPLE).unwrap();
        let draw = payload.into_draw(&GameRules::LOTOFACIL).unwrap();
        assert_eq!(draw.index(), 3001);
        assert_eq!(draw.numbers().len(), 15);
        assert_eq!(draw.numbers()[0], 1);
        assert_eq!(draw.numbers()[14], 25);
        assert_eq!(draw.date(), NaiveDate::from_ymd_opt(2024, 1, 13));
    }

    #[test]
    fn test_integer_numbers_accepted() {
        let json = r#"{"concurso": 12, "dezenas": [15,14,13,12,11,10,9,8,7,6,5,4,3,2,1]}"#;
        let payload: DrawPayload = serde_json::from_str(json).unwrap();
        let draw = payload.into_draw(&GameRules::LOTOFACIL).unwrap();
        assert_eq!(draw.numbers(), (1..=15).collect::<Vec<u8>>().as_slice());
        assert_eq!(draw.date(), None);
    }

    #[test]
    fn test_garbage_number_rejected() {
        let json = r#"{"concurso": 12, "dezenas": ["01", "xx"]}"#;
        let payload: DrawPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_draw(&GameRules::LOTOFACIL).unwrap_err();
        assert!(matches!(err, CoreError::MalformedDraw { index: 12, .. }));
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let json = r#"{"concurso": 5, "dezenas": ["01","02","03","04","05","06","07","08","09","10","11","12","13","14","26"]}"#;
        let payload: DrawPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_draw(&GameRules::LOTOFACIL).is_err());
    }

    #[test]
    fn test_wrong_cardinality_rejected() {
        let json = r#"{"concurso": 5, "dezenas": ["01","02","03"]}"#;
        let payload: DrawPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_draw(&GameRules::LOTOFACIL).is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        let json = r#"{"concurso": 5, "data": "2024-01-13", "dezenas": [1,2,3,4,5,6,7,8,9,10,11,12,13,14,15]}"#;
        let payload: DrawPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_draw(&GameRules::LOTOFACIL).is_err());
    }
}
