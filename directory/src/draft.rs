use chrono::NaiveDate;
use entity::{Employee, EmployeeType, UnknownVariant};
use thiserror::Error;

/// Field names accepted by [`EmployeeDraft::set`], in display order.
pub const DRAFT_FIELDS: [&str; 9] = [
    "matricule",
    "nom",
    "prenom",
    "poste",
    "departement",
    "employeeType",
    "email",
    "telephone",
    "dateEmbauche",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("unknown field {0:?} (expected one of: {fields})", fields = DRAFT_FIELDS.join(", "))]
    UnknownField(String),
    #[error("hire date {0:?} is not an ISO date (YYYY-MM-DD)")]
    InvalidDate(String),
    #[error(transparent)]
    InvalidType(#[from] UnknownVariant),
}

/// Text state of the "new employee" form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub poste: String,
    pub departement: String,
    pub employee_type: String,
    pub email: String,
    pub telephone: String,
    pub date_embauche: String,
}

impl EmployeeDraft {
    /// Sets a field by its JSON name; snake_case spellings are accepted too.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), DraftError> {
        let slot = match field.trim() {
            "matricule" => &mut self.matricule,
            "nom" => &mut self.nom,
            "prenom" => &mut self.prenom,
            "poste" => &mut self.poste,
            "departement" => &mut self.departement,
            "employeeType" | "employee_type" | "type" => &mut self.employee_type,
            "email" => &mut self.email,
            "telephone" => &mut self.telephone,
            "dateEmbauche" | "date_embauche" => &mut self.date_embauche,
            other => return Err(DraftError::UnknownField(other.to_string())),
        };
        *slot = value.into();
        Ok(())
    }

    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            (DRAFT_FIELDS[0], self.matricule.as_str()),
            (DRAFT_FIELDS[1], self.nom.as_str()),
            (DRAFT_FIELDS[2], self.prenom.as_str()),
            (DRAFT_FIELDS[3], self.poste.as_str()),
            (DRAFT_FIELDS[4], self.departement.as_str()),
            (DRAFT_FIELDS[5], self.employee_type.as_str()),
            (DRAFT_FIELDS[6], self.email.as_str()),
            (DRAFT_FIELDS[7], self.telephone.as_str()),
            (DRAFT_FIELDS[8], self.date_embauche.as_str()),
        ]
    }

    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.trim().is_empty())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Builds the request body. Only text-to-type conversion happens here;
    /// required-field checks are left to the server.
    pub fn to_employee(&self) -> Result<Employee, DraftError> {
        let date_embauche = match non_empty(&self.date_embauche) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| DraftError::InvalidDate(raw))?,
            ),
            None => None,
        };
        let employee_type = non_empty(&self.employee_type)
            .map(|raw| raw.parse::<EmployeeType>())
            .transpose()?;

        Ok(Employee {
            matricule: self.matricule.trim().to_string(),
            nom: self.nom.trim().to_string(),
            prenom: non_empty(&self.prenom),
            poste: self.poste.trim().to_string(),
            employee_type,
            departement: non_empty(&self.departement),
            telephone: non_empty(&self.telephone),
            email: non_empty(&self.email),
            date_embauche,
            ..Default::default()
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_filled_draft() {
        let mut draft = EmployeeDraft::default();
        draft.set("matricule", "E1").unwrap();
        draft.set("nom", " Doe ").unwrap();
        draft.set("poste", "Nurse").unwrap();
        draft.set("date_embauche", "2024-01-01").unwrap();
        draft.set("type", "medical_staff").unwrap();

        let employee = draft.to_employee().unwrap();
        assert_eq!(employee.matricule, "E1");
        assert_eq!(employee.nom, "Doe");
        assert_eq!(employee.prenom, None);
        assert_eq!(employee.employee_type, Some(EmployeeType::MedicalStaff));
        assert_eq!(employee.date_embauche, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn rejects_unknown_field_and_bad_date() {
        let mut draft = EmployeeDraft::default();
        assert!(matches!(
            draft.set("salary", "1"),
            Err(DraftError::UnknownField(_))
        ));
        draft.set("dateEmbauche", "01/02/2024").unwrap();
        assert_eq!(
            draft.to_employee().unwrap_err(),
            DraftError::InvalidDate("01/02/2024".into())
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut draft = EmployeeDraft::default();
        assert!(draft.is_blank());
        draft.set("email", "a@b.test").unwrap();
        assert!(!draft.is_blank());
        draft.reset();
        assert!(draft.is_blank());
    }
}
