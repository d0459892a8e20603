use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::MutualFundMetaRow;
use crate::validate::{optional_text, required_text, FieldErrors, Validate};

/// Mutual fund metadata as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualFundMeta {
    pub id: i64,
    pub fund_house: String,
    pub scheme_type: String,
    pub scheme_category: String,
    pub scheme_code: String,
    pub scheme_name: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub deleted_on: Option<DateTime<Utc>>,
}

/// Payload for creating a record. Timestamps are never taken from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMutualFundMeta {
    pub fund_house: String,
    pub scheme_type: String,
    pub scheme_category: String,
    pub scheme_code: String,
    pub scheme_name: String,
}

/// Payload for a partial update. `None` or a blank value leaves the field as is,
/// so a field cannot be cleared through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMutualFundMeta {
    pub fund_house: Option<String>,
    pub scheme_type: Option<String>,
    pub scheme_category: Option<String>,
    pub scheme_code: Option<String>,
    pub scheme_name: Option<String>,
}

impl Validate for NewMutualFundMeta {
    fn validate(&self, errors: &mut FieldErrors) {
        required_text(errors, "fund_house", &self.fund_house);
        required_text(errors, "scheme_type", &self.scheme_type);
        required_text(errors, "scheme_category", &self.scheme_category);
        required_text(errors, "scheme_code", &self.scheme_code);
        required_text(errors, "scheme_name", &self.scheme_name);
    }
}

impl Validate for UpdateMutualFundMeta {
    fn validate(&self, errors: &mut FieldErrors) {
        optional_text(errors, "fund_house", self.fund_house.as_deref());
        optional_text(errors, "scheme_type", self.scheme_type.as_deref());
        optional_text(errors, "scheme_category", self.scheme_category.as_deref());
        optional_text(errors, "scheme_code", self.scheme_code.as_deref());
        optional_text(errors, "scheme_name", self.scheme_name.as_deref());
    }
}

impl UpdateMutualFundMeta {
    /// Applies every provided, non-blank field to `row`. Returns whether any
    /// stored value actually changed.
    pub(crate) fn apply_to(&self, row: &mut MutualFundMetaRow) -> bool {
        let mut changed = false;
        changed |= apply_field(&mut row.fund_house, self.fund_house.as_deref());
        changed |= apply_field(&mut row.scheme_type, self.scheme_type.as_deref());
        changed |= apply_field(&mut row.scheme_category, self.scheme_category.as_deref());
        changed |= apply_field(&mut row.scheme_code, self.scheme_code.as_deref());
        changed |= apply_field(&mut row.scheme_name, self.scheme_name.as_deref());
        changed
    }
}

fn apply_field(current: &mut String, incoming: Option<&str>) -> bool {
    match incoming.map(str::trim) {
        Some(v) if !v.is_empty() && v != current.as_str() => {
            *current = v.to_string();
            true
        }
        _ => false,
    }
}

impl From<MutualFundMetaRow> for MutualFundMeta {
    fn from(row: MutualFundMetaRow) -> Self {
        Self {
            id: row.id,
            fund_house: row.fund_house,
            scheme_type: row.scheme_type,
            scheme_category: row.scheme_category,
            scheme_code: row.scheme_code,
            scheme_name: row.scheme_name,
            created_on: row.created_on,
            updated_on: row.updated_on,
            deleted_on: row.deleted_on,
        }
    }
}
