use std::{
    fmt::Display,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use directory::{
    AppConfig, DirectoryController,
    shell::run_shell,
    view::{render_department_statistics, render_detail, render_statistics, render_table},
};
use entity::{Employee, EmployeeType, SearchCriteria, WorkDay};
use platform_api::EmployeeClient;
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use serde::Serialize;
use tokio::io::BufReader;

const VERBOSE_FILTER: &str = "info,directory=debug,platform_api=debug";

#[derive(Parser, Debug)]
#[command(name = "staff-directory", version, about = "Hospital employee directory")]
struct Cli {
    /// Base URL of the employee service (overrides EMPLOYEE_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
    /// Log requests to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every employee.
    List,
    /// Show one employee by matricule.
    Get { matricule: String },
    /// Create an employee from flags or a JSON file.
    Create(CreateCommand),
    /// Replace an employee record; flags are applied on top of the current one.
    Update(UpdateCommand),
    /// Delete an employee.
    Delete { matricule: String },
    /// Mark an employee active again.
    Activate { matricule: String },
    /// Find by a unique field.
    #[command(subcommand)]
    Lookup(LookupCommand),
    /// Server-side filters.
    #[command(subcommand)]
    Filter(FilterCommand),
    /// Name and multi-field search.
    #[command(subcommand)]
    Search(SearchCommand),
    /// Active head counts.
    #[command(subcommand)]
    Count(CountCommand),
    /// Aggregated statistics.
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Check whether a unique value is already taken.
    #[command(subcommand)]
    Exists(ExistsCommand),
    /// Ping the employee service.
    Health,
    /// Interactive session.
    Shell,
}

#[derive(Args, Debug)]
struct EmployeeFields {
    #[arg(long)]
    nom: Option<String>,
    #[arg(long)]
    prenom: Option<String>,
    #[arg(long)]
    poste: Option<String>,
    #[arg(long = "type", value_name = "TYPE")]
    employee_type: Option<EmployeeType>,
    #[arg(long)]
    departement: Option<String>,
    #[arg(long)]
    telephone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    hired: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    born: Option<NaiveDate>,
    #[arg(long)]
    adresse: Option<String>,
    #[arg(long = "ssn")]
    numero_securite_sociale: Option<String>,
    #[arg(long)]
    cin: Option<String>,
    #[arg(long)]
    specialite: Option<String>,
    #[arg(long = "licence")]
    licence_number: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    supervisor: Option<String>,
    #[arg(long = "work-days", value_delimiter = ',', value_name = "DAY,...")]
    work_days: Vec<WorkDay>,
    #[arg(long, value_name = "HH:MM")]
    shift_start: Option<String>,
    #[arg(long, value_name = "HH:MM")]
    shift_end: Option<String>,
}

impl EmployeeFields {
    fn apply(self, employee: &mut Employee) {
        if let Some(nom) = self.nom {
            employee.nom = nom;
        }
        if let Some(poste) = self.poste {
            employee.poste = poste;
        }
        if !self.work_days.is_empty() {
            employee.work_days = Some(self.work_days.into_iter().collect());
        }
        overlay(&mut employee.prenom, self.prenom);
        overlay(&mut employee.employee_type, self.employee_type);
        overlay(&mut employee.departement, self.departement);
        overlay(&mut employee.telephone, self.telephone);
        overlay(&mut employee.email, self.email);
        overlay(&mut employee.date_embauche, self.hired);
        overlay(&mut employee.date_naissance, self.born);
        overlay(&mut employee.adresse, self.adresse);
        overlay(&mut employee.numero_securite_sociale, self.numero_securite_sociale);
        overlay(&mut employee.cin, self.cin);
        overlay(&mut employee.specialite, self.specialite);
        overlay(&mut employee.licence_number, self.licence_number);
        overlay(&mut employee.is_active, self.active);
        overlay(&mut employee.supervisor_matricule, self.supervisor);
        overlay(&mut employee.shift_start, self.shift_start);
        overlay(&mut employee.shift_end, self.shift_end);
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

#[derive(Args, Debug)]
struct CreateCommand {
    /// JSON file holding the record; flags override its fields.
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,
    #[arg(long, required_unless_present = "file")]
    matricule: Option<String>,
    #[command(flatten)]
    fields: EmployeeFields,
}

#[derive(Args, Debug)]
struct UpdateCommand {
    matricule: String,
    /// JSON file holding the replacement record; flags override its fields.
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,
    #[command(flatten)]
    fields: EmployeeFields,
}

#[derive(Subcommand, Debug)]
enum LookupCommand {
    Email { email: String },
    Cin { cin: String },
    Licence { licence: String },
    Telephone { telephone: String },
}

#[derive(Subcommand, Debug)]
enum FilterCommand {
    /// Employees of one type.
    Type { employee_type: EmployeeType },
    Administration,
    MedicalStaff,
    Active,
    Inactive,
    /// Employees of a department, optionally of one type.
    Department {
        department: String,
        #[arg(long = "type", value_name = "TYPE")]
        employee_type: Option<EmployeeType>,
    },
    Speciality { speciality: String },
    /// Direct reports of a supervisor.
    Supervisor { matricule: String },
    /// Hired within an inclusive date range.
    HiredBetween { start: NaiveDate, end: NaiveDate },
    /// Scheduled on any of the given days.
    WorkDays {
        #[arg(required = true, num_args = 1..)]
        days: Vec<WorkDay>,
    },
    /// Exact shift window.
    Shift { start: String, end: String },
    /// Active medical staff with a speciality in a department.
    MedicalStaffIn {
        speciality: String,
        department: String,
    },
    /// Active doctors working on a day.
    DoctorsAvailable { day: WorkDay },
    WithLicence,
    NoSupervisor,
}

#[derive(Subcommand, Debug)]
enum SearchCommand {
    /// Partial match on family and/or given name.
    Name {
        #[arg(long, required_unless_present = "prenom")]
        nom: Option<String>,
        #[arg(long)]
        prenom: Option<String>,
    },
    /// Partial match on "nom prenom".
    Fullname { name: String },
    /// Every given criterion must match.
    Criteria {
        #[arg(long)]
        nom: Option<String>,
        #[arg(long)]
        prenom: Option<String>,
        #[arg(long)]
        departement: Option<String>,
        #[arg(long = "type", value_name = "TYPE")]
        employee_type: Option<EmployeeType>,
        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
enum CountCommand {
    Type { employee_type: EmployeeType },
    Department { department: String },
}

#[derive(Subcommand, Debug)]
enum StatsCommand {
    /// Active head count per department and type.
    Department,
    /// Directory-wide totals.
    Overall,
}

#[derive(Subcommand, Debug)]
enum ExistsCommand {
    Email { email: String },
    Cin { cin: String },
    Licence { licence: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    let env_filter = if cli.verbose {
        Some(VERBOSE_FILTER.to_string())
    } else {
        config.log_filter.clone()
    };
    init_tracing(ObsConfig {
        env_filter,
        otlp_endpoint: config.otlp_endpoint.clone(),
        ..Default::default()
    })?;

    let client = EmployeeClient::new(config.client.clone())?;
    let printer = Printer { json: cli.json };
    let result = run(cli.command, client, &printer).await;
    shutdown_tracing()?;
    result
}

async fn run(command: Command, client: EmployeeClient, printer: &Printer) -> Result<()> {
    match command {
        Command::List => {
            let mut controller = DirectoryController::new(client);
            controller.load_employees().await;
            ensure_ok(&controller)?;
            printer.employees(&controller.view().employees)
        }
        Command::Get { matricule } => {
            let mut controller = DirectoryController::new(client);
            controller.search_for(&matricule).await;
            ensure_ok(&controller)?;
            printer.selected(&controller)
        }
        Command::Create(cmd) => {
            let mut employee = match &cmd.file {
                Some(path) => read_employee(path)?,
                None => Employee::default(),
            };
            if let Some(matricule) = cmd.matricule {
                employee.matricule = matricule;
            }
            cmd.fields.apply(&mut employee);
            let mut controller = DirectoryController::new(client);
            controller.create_employee(employee).await;
            ensure_ok(&controller)?;
            printer.selected(&controller)
        }
        Command::Update(cmd) => {
            let mut controller = DirectoryController::new(client);
            controller.search_for(&cmd.matricule).await;
            ensure_ok(&controller)?;
            let mut employee = match &cmd.file {
                Some(path) => read_employee(path)?,
                None => controller.view().searched.clone().unwrap_or_default(),
            };
            employee.matricule = cmd.matricule.clone();
            cmd.fields.apply(&mut employee);
            controller.update_employee(&cmd.matricule, &employee).await;
            ensure_ok(&controller)?;
            printer.selected(&controller)
        }
        Command::Delete { matricule } => {
            let mut controller = DirectoryController::new(client);
            controller.delete_employee(&matricule).await;
            ensure_ok(&controller)?;
            let remaining = controller.view().employees.len();
            printer.message(
                &serde_json::json!({ "deleted": matricule.as_str(), "remaining": remaining }),
                format!("deleted {matricule} ({remaining} employees remain)"),
            )
        }
        Command::Activate { matricule } => {
            printer.employee(&client.activate_employee(&matricule).await?)
        }
        Command::Lookup(lookup) => match lookup {
            LookupCommand::Email { email } => {
                printer.employee(&client.find_by_email(&email).await?)
            }
            LookupCommand::Cin { cin } => printer.employee(&client.find_by_cin(&cin).await?),
            LookupCommand::Licence { licence } => {
                printer.employee(&client.find_by_licence(&licence).await?)
            }
            LookupCommand::Telephone { telephone } => {
                printer.employees(&client.find_by_telephone(&telephone).await?)
            }
        },
        Command::Filter(filter) => printer.employees(&run_filter(filter, &client).await?),
        Command::Search(search) => {
            let found = match search {
                SearchCommand::Name { nom, prenom } => {
                    client
                        .search_by_name(nom.as_deref(), prenom.as_deref())
                        .await?
                }
                SearchCommand::Fullname { name } => client.search_by_full_name(&name).await?,
                SearchCommand::Criteria {
                    nom,
                    prenom,
                    departement,
                    employee_type,
                    active,
                } => {
                    let criteria = SearchCriteria {
                        nom,
                        prenom,
                        departement,
                        employee_type,
                        is_active: active,
                    };
                    client.search_employees(&criteria).await?
                }
            };
            printer.employees(&found)
        }
        Command::Count(count) => {
            let total = match count {
                CountCommand::Type { employee_type } => client.count_by_type(employee_type).await?,
                CountCommand::Department { department } => {
                    client.count_by_department(&department).await?
                }
            };
            printer.scalar(&total)
        }
        Command::Stats(StatsCommand::Department) => {
            let stats = client.department_statistics().await?;
            printer.message(&stats, render_department_statistics(&stats))
        }
        Command::Stats(StatsCommand::Overall) => {
            let stats = client.statistics().await?;
            printer.message(&stats, render_statistics(&stats))
        }
        Command::Exists(exists) => {
            let taken = match exists {
                ExistsCommand::Email { email } => client.email_exists(&email).await?,
                ExistsCommand::Cin { cin } => client.cin_exists(&cin).await?,
                ExistsCommand::Licence { licence } => client.licence_exists(&licence).await?,
            };
            printer.scalar(&taken)
        }
        Command::Health => {
            let status = client.health().await?;
            printer.message(&status, status.clone())
        }
        Command::Shell => {
            let mut controller = DirectoryController::new(client);
            let stdin = BufReader::new(tokio::io::stdin());
            run_shell(&mut controller, stdin, &mut io::stdout()).await
        }
    }
}

async fn run_filter(filter: FilterCommand, client: &EmployeeClient) -> Result<Vec<Employee>> {
    let found = match filter {
        FilterCommand::Type { employee_type } => client.employees_by_type(employee_type).await?,
        FilterCommand::Administration => client.administration_employees().await?,
        FilterCommand::MedicalStaff => client.medical_staff().await?,
        FilterCommand::Active => client.active_employees().await?,
        FilterCommand::Inactive => client.inactive_employees().await?,
        FilterCommand::Department {
            department,
            employee_type: Some(kind),
        } => {
            client
                .employees_by_department_and_type(&department, kind)
                .await?
        }
        FilterCommand::Department {
            department,
            employee_type: None,
        } => client.employees_by_department(&department).await?,
        FilterCommand::Speciality { speciality } => {
            client.employees_by_speciality(&speciality).await?
        }
        FilterCommand::Supervisor { matricule } => {
            client.employees_by_supervisor(&matricule).await?
        }
        FilterCommand::HiredBetween { start, end } => client.hired_between(start, end).await?,
        FilterCommand::WorkDays { days } => client.employees_by_work_days(&days).await?,
        FilterCommand::Shift { start, end } => client.employees_by_shift(&start, &end).await?,
        FilterCommand::MedicalStaffIn {
            speciality,
            department,
        } => {
            client
                .medical_staff_by_speciality_and_department(&speciality, &department)
                .await?
        }
        FilterCommand::DoctorsAvailable { day } => client.available_doctors(day).await?,
        FilterCommand::WithLicence => client.medical_staff_with_licence().await?,
        FilterCommand::NoSupervisor => client.employees_without_supervisor().await?,
    };
    Ok(found)
}

fn ensure_ok(controller: &DirectoryController) -> Result<()> {
    if let Some(notice) = &controller.view().notice {
        bail!("{notice}");
    }
    Ok(())
}

fn read_employee(path: &Path) -> Result<Employee> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not an employee record", path.display()))
}

struct Printer {
    json: bool,
}

impl Printer {
    fn employees(&self, employees: &[Employee]) -> Result<()> {
        self.message(&employees, render_table(employees))
    }

    fn employee(&self, employee: &Employee) -> Result<()> {
        self.message(employee, render_detail(employee))
    }

    fn selected(&self, controller: &DirectoryController) -> Result<()> {
        match &controller.view().searched {
            Some(employee) => self.employee(employee),
            None => Ok(()),
        }
    }

    fn scalar<T: Serialize + Display>(&self, value: &T) -> Result<()> {
        self.message(value, value.to_string())
    }

    fn message<T: Serialize + ?Sized>(&self, value: &T, text: String) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        } else if text.ends_with('\n') {
            write!(stdout, "{text}")?;
        } else {
            writeln!(stdout, "{text}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use platform_api::ClientConfig;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("staff-directory").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_collects_field_flags() {
        let cli = parse(&[
            "create",
            "--matricule",
            "E1",
            "--nom",
            "Doe",
            "--type",
            "medical_staff",
            "--hired",
            "2024-01-01",
            "--work-days",
            "monday,friday",
            "--active",
            "true",
            "--json",
        ]);
        assert!(cli.json);
        let Command::Create(cmd) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(cmd.matricule.as_deref(), Some("E1"));
        assert_eq!(cmd.fields.employee_type, Some(EmployeeType::MedicalStaff));
        assert_eq!(cmd.fields.hired, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(cmd.fields.work_days, vec![WorkDay::Monday, WorkDay::Friday]);
        assert_eq!(cmd.fields.active, Some(true));
    }

    #[test]
    fn create_needs_matricule_or_file() {
        assert!(Cli::try_parse_from(["staff-directory", "create", "--nom", "Doe"]).is_err());
        let cli = parse(&["create", "--file", "record.json"]);
        assert!(matches!(cli.command, Command::Create(CreateCommand { file: Some(_), .. })));
    }

    #[test]
    fn search_name_accepts_either_side() {
        let cli = parse(&["search", "name", "--prenom", "x"]);
        assert!(matches!(
            cli.command,
            Command::Search(SearchCommand::Name { nom: None, prenom: Some(ref p) }) if p == "x"
        ));
        assert!(Cli::try_parse_from(["staff-directory", "search", "name"]).is_err());
    }

    #[test]
    fn work_days_filter_requires_a_day() {
        let cli = parse(&["filter", "work-days", "saturday", "sunday"]);
        assert!(matches!(
            cli.command,
            Command::Filter(FilterCommand::WorkDays { ref days })
                if *days == [WorkDay::Saturday, WorkDay::Sunday]
        ));
        assert!(Cli::try_parse_from(["staff-directory", "filter", "work-days"]).is_err());
        let unknown = Cli::try_parse_from(["staff-directory", "filter", "work-days", "someday"]);
        assert!(unknown.is_err());
    }

    #[test]
    fn absent_flags_keep_existing_values() {
        let mut employee: Employee = serde_json::from_str(
            r#"{"matricule":"E1","nom":"Doe","poste":"Nurse","email":"doe@hospital.test",
                "isActive":true,"workDays":["MONDAY","TUESDAY"]}"#,
        )
        .expect("record");
        let cli = parse(&["update", "E1", "--poste", "Head Nurse", "--work-days", "sunday"]);
        let Command::Update(cmd) = cli.command else {
            panic!("expected update");
        };
        cmd.fields.apply(&mut employee);

        assert_eq!(employee.nom, "Doe");
        assert_eq!(employee.poste, "Head Nurse");
        assert_eq!(employee.email.as_deref(), Some("doe@hospital.test"));
        assert_eq!(employee.is_active, Some(true));
        assert_eq!(
            employee.work_days,
            Some([WorkDay::Sunday].into_iter().collect())
        );
    }

    #[test]
    fn notice_becomes_an_error() {
        let client = EmployeeClient::new(
            ClientConfig::new("http://127.0.0.1:9/api/employees").expect("config"),
        )
        .expect("client");
        let mut controller = DirectoryController::new(client);
        assert!(ensure_ok(&controller).is_ok());

        controller.view_mut().notice = Some(directory::Notice::NotFound("E9".into()));
        let err = ensure_ok(&controller).expect_err("notice should fail the command");
        assert_eq!(err.to_string(), "no employee with matricule E9");
    }
}
