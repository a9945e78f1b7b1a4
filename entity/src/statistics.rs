use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::employee::EmployeeType;

/// Active head count per department, broken down by employee type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStatistics {
    #[serde(default)]
    pub department_breakdown: BTreeMap<String, BTreeMap<EmployeeType, u64>>,
}

impl DepartmentStatistics {
    pub fn department_total(&self, department: &str) -> u64 {
        self.department_breakdown
            .get(department)
            .map(|by_type| by_type.values().sum())
            .unwrap_or(0)
    }
}

/// Directory-wide counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStatistics {
    pub total_employees: u64,
    pub active_employees: u64,
    pub inactive_employees: u64,
    pub active_administration: u64,
    pub active_medical_staff: u64,
    #[serde(default)]
    pub employees_by_type: BTreeMap<EmployeeType, u64>,
    #[serde(default)]
    pub employees_by_department: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn breakdown_decodes_enum_keys() {
        let stats: DepartmentStatistics = serde_json::from_value(json!({
            "departmentBreakdown": {
                "Cardiology": { "MEDICAL_STAFF": 3, "ADMINISTRATION": 1 },
                "Finance": { "ADMINISTRATION": 2 }
            }
        }))
        .unwrap();
        assert_eq!(stats.department_total("Cardiology"), 4);
        assert_eq!(stats.department_total("Radiology"), 0);
        assert_eq!(
            stats.department_breakdown["Finance"].get(&EmployeeType::Administration),
            Some(&2)
        );
    }
}
