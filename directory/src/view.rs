//! Plain-text rendering of the directory view.

use std::fmt::Write as _;

use entity::{DepartmentStatistics, Employee, EmployeeStatistics};

use crate::controller::DirectoryView;

const HEADERS: [&str; 7] = [
    "MATRICULE",
    "NAME",
    "POSITION",
    "DEPARTMENT",
    "TYPE",
    "HIRED",
    "ACTIVE",
];

fn row(employee: &Employee) -> [String; 7] {
    [
        employee.matricule.clone(),
        employee.full_name(),
        employee.poste.clone(),
        employee.departement.clone().unwrap_or_default(),
        employee
            .employee_type
            .map(|t| t.display_name().to_string())
            .unwrap_or_default(),
        employee
            .date_embauche
            .map(|d| d.to_string())
            .unwrap_or_default(),
        match employee.is_active {
            Some(true) => "yes".into(),
            Some(false) => "no".into(),
            None => String::new(),
        },
    ]
}

pub fn render_table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "(no employees)\n".to_string();
    }
    let rows: Vec<[String; 7]> = employees.iter().map(row).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    for cells in &rows {
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let mut line = String::new();
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(line, "{cell:<width$}  ");
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_detail(employee: &Employee) -> String {
    let mut lines: Vec<(&str, String)> = vec![
        ("Matricule", employee.matricule.clone()),
        ("Name", employee.full_name()),
    ];
    if !employee.poste.is_empty() {
        lines.push(("Position", employee.poste.clone()));
    }
    let optional = [
        (
            "Type",
            employee.employee_type.map(|t| t.display_name().to_string()),
        ),
        ("Department", employee.departement.clone()),
        ("Email", employee.email.clone()),
        ("Telephone", employee.telephone.clone()),
        ("Hired", employee.date_embauche.map(|d| d.to_string())),
        ("Born", employee.date_naissance.map(|d| d.to_string())),
        ("Address", employee.adresse.clone()),
        ("Social security", employee.numero_securite_sociale.clone()),
        ("CIN", employee.cin.clone()),
        ("Speciality", employee.specialite.clone()),
        ("Licence", employee.licence_number.clone()),
        (
            "Active",
            employee
                .is_active
                .map(|a| if a { "yes" } else { "no" }.to_string()),
        ),
        ("Supervisor", employee.supervisor_matricule.clone()),
        (
            "Work days",
            employee.work_days.as_ref().map(|days| {
                days.iter()
                    .map(|d| d.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
        ),
        ("Shift", shift(employee)),
        ("Created", employee.created_at.map(|t| t.to_string())),
        ("Updated", employee.updated_at.map(|t| t.to_string())),
    ];
    lines.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v))),
    );

    let mut out = String::new();
    for (label, value) in lines {
        let _ = writeln!(out, "{label}: {value}");
    }
    out
}

fn shift(employee: &Employee) -> Option<String> {
    match (&employee.shift_start, &employee.shift_end) {
        (None, None) => None,
        (start, end) => Some(format!(
            "{}-{}",
            start.as_deref().unwrap_or("?"),
            end.as_deref().unwrap_or("?")
        )),
    }
}

/// One line per department: "Cardiology: 4 (Administration 1, Medical Staff 3)".
pub fn render_department_statistics(stats: &DepartmentStatistics) -> String {
    if stats.department_breakdown.is_empty() {
        return "(no active employees)\n".to_string();
    }
    let mut out = String::new();
    for (department, by_type) in &stats.department_breakdown {
        let parts: Vec<String> = by_type
            .iter()
            .map(|(kind, count)| format!("{} {count}", kind.display_name()))
            .collect();
        let _ = writeln!(
            out,
            "{department}: {} ({})",
            stats.department_total(department),
            parts.join(", ")
        );
    }
    out
}

pub fn render_statistics(stats: &EmployeeStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total: {}", stats.total_employees);
    let _ = writeln!(out, "Active: {}", stats.active_employees);
    let _ = writeln!(out, "Inactive: {}", stats.inactive_employees);
    let _ = writeln!(out, "Active administration: {}", stats.active_administration);
    let _ = writeln!(out, "Active medical staff: {}", stats.active_medical_staff);
    for (kind, count) in &stats.employees_by_type {
        let _ = writeln!(out, "  {}: {count}", kind.display_name());
    }
    for (department, count) in &stats.employees_by_department {
        let _ = writeln!(out, "  {department}: {count}");
    }
    out
}

/// Full screen: notice, list, selected record, draft.
pub fn render_view(view: &DirectoryView) -> String {
    let mut out = String::new();
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    let _ = writeln!(out, "Employees ({})", view.employees.len());
    out.push_str(&render_table(&view.employees));
    if let Some(employee) = &view.searched {
        out.push_str("\nSelected\n");
        out.push_str(&render_detail(employee));
    }
    out.push_str("\nDraft");
    if view.draft.is_blank() {
        out.push_str(" (empty)\n");
    } else {
        out.push('\n');
        for (field, value) in view.draft.fields() {
            if !value.trim().is_empty() {
                let _ = writeln!(out, "  {field} = {value}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Notice;
    use chrono::NaiveDate;
    use entity::EmployeeType;

    fn nurse() -> Employee {
        Employee {
            poste: "Nurse".into(),
            employee_type: Some(EmployeeType::MedicalStaff),
            date_embauche: NaiveDate::from_ymd_opt(2024, 1, 1),
            is_active: Some(true),
            ..Employee::new("E1", "Doe")
        }
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&[nurse()]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines[0],
            "MATRICULE  NAME  POSITION  DEPARTMENT  TYPE           HIRED       ACTIVE"
        );
        assert_eq!(
            lines[1],
            "E1         Doe   Nurse                 Medical Staff  2024-01-01  yes"
        );
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render_table(&[]), "(no employees)\n");
    }

    #[test]
    fn detail_skips_absent_fields() {
        let detail = render_detail(&nurse());
        assert!(detail.contains("Position: Nurse\n"));
        assert!(detail.contains("Hired: 2024-01-01\n"));
        assert!(!detail.contains("Email"));
        assert!(!detail.contains("Shift"));
    }

    #[test]
    fn view_shows_notice_and_draft() {
        let mut view = DirectoryView {
            notice: Some(Notice::NotFound("X9".into())),
            ..Default::default()
        };
        view.draft.set("nom", "Doe").unwrap();
        let screen = render_view(&view);
        assert!(screen.starts_with("! no employee with matricule X9\n"));
        assert!(screen.contains("Employees (0)\n(no employees)\n"));
        assert!(screen.contains("  nom = Doe\n"));
    }

    #[test]
    fn department_lines_sum_types() {
        let mut stats = DepartmentStatistics::default();
        let cardiology = stats
            .department_breakdown
            .entry("Cardiology".into())
            .or_default();
        cardiology.insert(EmployeeType::Administration, 1);
        cardiology.insert(EmployeeType::MedicalStaff, 3);
        assert_eq!(
            render_department_statistics(&stats),
            "Cardiology: 4 (Administration 1, Medical Staff 3)\n"
        );
        assert_eq!(
            render_department_statistics(&DepartmentStatistics::default()),
            "(no active employees)\n"
        );
    }
}
