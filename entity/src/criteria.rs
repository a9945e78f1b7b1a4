use serde::{Deserialize, Serialize};

use crate::employee::EmployeeType;

/// Multi-field search filter. Every field is optional and only the ones
/// that are set become query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub departement: Option<String>,
    pub employee_type: Option<EmployeeType>,
    pub is_active: Option<bool>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Query parameters in a stable order; blank strings are treated as unset.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text = [
            ("nom", &self.nom),
            ("prenom", &self.prenom),
            ("departement", &self.departement),
        ];
        for (key, value) in text {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        if let Some(kind) = self.employee_type {
            pairs.push(("employeeType", kind.as_str().to_string()));
        }
        if let Some(active) = self.is_active {
            pairs.push(("isActive", active.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_present_fields_become_parameters() {
        let criteria = SearchCriteria {
            nom: Some("doe".into()),
            prenom: Some("   ".into()),
            employee_type: Some(EmployeeType::MedicalStaff),
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(
            criteria.query_pairs(),
            vec![
                ("nom", "doe".to_string()),
                ("employeeType", "MEDICAL_STAFF".to_string()),
                ("isActive", "false".to_string()),
            ]
        );
    }

    #[test]
    fn default_criteria_is_empty() {
        assert!(SearchCriteria::default().is_empty());
    }
}
