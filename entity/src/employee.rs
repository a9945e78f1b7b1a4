use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Staff classification used by every type-scoped endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeType {
    Administration,
    MedicalStaff,
}

impl EmployeeType {
    pub const ALL: [EmployeeType; 2] = [EmployeeType::Administration, EmployeeType::MedicalStaff];

    /// Name used in URLs and JSON bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeType::Administration => "ADMINISTRATION",
            EmployeeType::MedicalStaff => "MEDICAL_STAFF",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EmployeeType::Administration => "Administration",
            EmployeeType::MedicalStaff => "Medical Staff",
        }
    }
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for EmployeeType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("employee type", s))
    }
}

/// Day of the week an employee is scheduled on. Ordered Monday first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WorkDay {
    pub const ALL: [WorkDay; 7] = [
        WorkDay::Monday,
        WorkDay::Tuesday,
        WorkDay::Wednesday,
        WorkDay::Thursday,
        WorkDay::Friday,
        WorkDay::Saturday,
        WorkDay::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkDay::Monday => "MONDAY",
            WorkDay::Tuesday => "TUESDAY",
            WorkDay::Wednesday => "WEDNESDAY",
            WorkDay::Thursday => "THURSDAY",
            WorkDay::Friday => "FRIDAY",
            WorkDay::Saturday => "SATURDAY",
            WorkDay::Sunday => "SUNDAY",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            WorkDay::Monday => "Monday",
            WorkDay::Tuesday => "Tuesday",
            WorkDay::Wednesday => "Wednesday",
            WorkDay::Thursday => "Thursday",
            WorkDay::Friday => "Friday",
            WorkDay::Saturday => "Saturday",
            WorkDay::Sunday => "Sunday",
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, WorkDay::Saturday | WorkDay::Sunday)
    }

    pub fn is_weekday(self) -> bool {
        !self.is_weekend()
    }
}

impl fmt::Display for WorkDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for WorkDay {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("work day", s))
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace('-', "_")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// One employee record as exchanged with the directory API.
///
/// Optional fields the server omits (or sends as `null`) stay `None`, and
/// `None` fields are left out of request bodies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub matricule: String,
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(default)]
    pub poste: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_type: Option<EmployeeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_embauche: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_naissance: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_securite_sociale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licence_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor_matricule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_days: Option<BTreeSet<WorkDay>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Employee {
    pub fn new(matricule: impl Into<String>, nom: impl Into<String>) -> Self {
        Self {
            matricule: matricule.into(),
            nom: nom.into(),
            ..Default::default()
        }
    }

    /// "nom prenom", or just the family name when no given name is set.
    pub fn full_name(&self) -> String {
        match self.prenom.as_deref().filter(|p| !p.is_empty()) {
            Some(prenom) => format!("{} {}", self.nom, prenom),
            None => self.nom.clone(),
        }
    }

    pub fn is_medical_staff(&self) -> bool {
        self.employee_type == Some(EmployeeType::MedicalStaff)
    }

    pub fn is_administration(&self) -> bool {
        self.employee_type == Some(EmployeeType::Administration)
    }

    pub fn works_on(&self, day: WorkDay) -> bool {
        self.work_days
            .as_ref()
            .is_some_and(|days| days.contains(&day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_record_serializes_only_present_fields() {
        let mut employee = Employee::new("E1", "Doe");
        employee.poste = "Nurse".into();
        employee.date_embauche = NaiveDate::from_ymd_opt(2024, 1, 1);

        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(
            value,
            json!({
                "matricule": "E1",
                "nom": "Doe",
                "poste": "Nurse",
                "dateEmbauche": "2024-01-01"
            })
        );
    }

    #[test]
    fn server_payload_with_nulls_decodes() {
        let payload = json!({
            "matricule": "MED2401001",
            "nom": "Benali",
            "prenom": "Amina",
            "poste": "Doctor",
            "employeeType": "MEDICAL_STAFF",
            "departement": "Cardiology",
            "email": null,
            "dateEmbauche": "2024-01-15",
            "isActive": true,
            "workDays": ["FRIDAY", "MONDAY"],
            "shiftStart": "08:00",
            "shiftEnd": "16:00",
            "createdAt": "2024-01-15T09:30:12.345678",
            "updatedAt": "2024-01-15T09:30:12.345678"
        });

        let employee: Employee = serde_json::from_value(payload).unwrap();
        assert_eq!(employee.employee_type, Some(EmployeeType::MedicalStaff));
        assert_eq!(employee.email, None);
        assert!(employee.is_medical_staff());
        assert!(employee.works_on(WorkDay::Monday));
        assert!(!employee.works_on(WorkDay::Tuesday));
        assert_eq!(employee.full_name(), "Benali Amina");
        assert!(employee.created_at.is_some());
        let days: Vec<_> = employee.work_days.unwrap().into_iter().collect();
        assert_eq!(days, vec![WorkDay::Monday, WorkDay::Friday]);
    }

    #[test]
    fn enums_parse_loosely_and_render_wire_names() {
        assert_eq!(
            "medical-staff".parse::<EmployeeType>().unwrap(),
            EmployeeType::MedicalStaff
        );
        assert_eq!(" monday ".parse::<WorkDay>().unwrap(), WorkDay::Monday);
        assert_eq!(WorkDay::Sunday.as_str(), "SUNDAY");
        assert_eq!(EmployeeType::Administration.to_string(), "Administration");
        assert!(WorkDay::Saturday.is_weekend());
        assert!(WorkDay::Wednesday.is_weekday());

        let err = "nurse".parse::<EmployeeType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown employee type: \"nurse\"");
    }
}
