use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settings_data_type_enum")]
#[serde(rename_all = "lowercase")]
pub enum SettingDataType {
    #[sea_orm(string_value = "string")]
    String,
    #[sea_orm(string_value = "number")]
    Number,
    #[sea_orm(string_value = "boolean")]
    Boolean,
    #[sea_orm(string_value = "json")]
    Json,
    #[sea_orm(string_value = "html")]
    Html,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String, // Toujours du texte en base, interprété selon data_type
    pub data_type: SettingDataType,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn typed_value(&self) -> Result<SettingValue, SettingValueError> {
        SettingValue::parse(self.data_type, &self.value)
    }
}

/// Valeur d'un réglage, déjà interprétée selon son type
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Json(serde_json::Value),
    Html(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingValueError {
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("'{0}' is not a valid boolean (expected true or false)")]
    InvalidBoolean(String),
    #[error("invalid JSON value: {0}")]
    InvalidJson(String),
}

impl SettingValue {
    /// Une écriture passe toujours par ici avant d'atteindre la BD
    pub fn parse(data_type: SettingDataType, raw: &str) -> Result<Self, SettingValueError> {
        match data_type {
            SettingDataType::String => Ok(SettingValue::String(raw.to_string())),
            SettingDataType::Html => Ok(SettingValue::Html(raw.to_string())),
            SettingDataType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(SettingValue::Number)
                .ok_or_else(|| SettingValueError::InvalidNumber(raw.to_string())),
            SettingDataType::Boolean => match raw.trim() {
                "true" => Ok(SettingValue::Boolean(true)),
                "false" => Ok(SettingValue::Boolean(false)),
                _ => Err(SettingValueError::InvalidBoolean(raw.to_string())),
            },
            SettingDataType::Json => serde_json::from_str(raw)
                .map(SettingValue::Json)
                .map_err(|e| SettingValueError::InvalidJson(e.to_string())),
        }
    }

    pub fn data_type(&self) -> SettingDataType {
        match self {
            SettingValue::String(_) => SettingDataType::String,
            SettingValue::Number(_) => SettingDataType::Number,
            SettingValue::Boolean(_) => SettingDataType::Boolean,
            SettingValue::Json(_) => SettingDataType::Json,
            SettingValue::Html(_) => SettingDataType::Html,
        }
    }

    /// Représentation texte stockée dans `settings.value`
    pub fn to_raw(&self) -> String {
        match self {
            SettingValue::String(s) | SettingValue::Html(s) => s.clone(),
            SettingValue::Number(n) => n.to_string(),
            SettingValue::Boolean(b) => b.to_string(),
            SettingValue::Json(v) => v.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rejects_text() {
        assert_eq!(
            SettingValue::parse(SettingDataType::Number, "abc"),
            Err(SettingValueError::InvalidNumber("abc".to_string()))
        );
        assert!(SettingValue::parse(SettingDataType::Number, "NaN").is_err());
        assert_eq!(
            SettingValue::parse(SettingDataType::Number, " 12.5 "),
            Ok(SettingValue::Number(12.5))
        );
    }

    #[test]
    fn test_boolean_is_strict() {
        assert_eq!(
            SettingValue::parse(SettingDataType::Boolean, "true"),
            Ok(SettingValue::Boolean(true))
        );
        assert!(SettingValue::parse(SettingDataType::Boolean, "yes").is_err());
    }

    #[test]
    fn test_json_must_parse() {
        assert!(SettingValue::parse(SettingDataType::Json, "{\"a\": 1}").is_ok());
        assert!(matches!(
            SettingValue::parse(SettingDataType::Json, "{a: 1}"),
            Err(SettingValueError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_html_and_string_are_kept_verbatim() {
        let html = SettingValue::parse(SettingDataType::Html, "<p>Hi</p>").unwrap();
        assert_eq!(html.to_raw(), "<p>Hi</p>");
        assert_eq!(html.data_type(), SettingDataType::Html);
    }
}
