use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::classify::InfoPayload;
use crate::error::{FormatError, Result};
use crate::types::{ListMeta, UserRecord};
use crate::view::View;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Cards,
    Json,
}

/// Table row for a user. Every cell is the plain display form of one field.
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Age")]
    pub age: String,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Job")]
    pub job: String,
    #[tabled(rename = "Hobby")]
    pub hobby: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age.to_string(),
            city: user.city.clone(),
            job: user.pekerjaan.clone(),
            hobby: user.hobi.clone(),
        }
    }
}

impl TryFrom<&UserRow> for UserRecord {
    type Error = FormatError;

    fn try_from(row: &UserRow) -> std::result::Result<Self, Self::Error> {
        let number = |value: &str, field: &'static str| {
            value
                .parse::<i64>()
                .map_err(|_| FormatError::InvalidFormat(format!("{field} is not a number: {value}")))
        };
        Ok(Self {
            id: number(&row.id, "id")?,
            name: row.name.clone(),
            email: row.email.clone(),
            age: number(&row.age, "age")?,
            city: row.city.clone(),
            pekerjaan: row.job.clone(),
            hobi: row.hobby.clone(),
        })
    }
}

pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn print(&self, view: &View) -> Result<()> {
        println!("{}", self.render(view)?);
        Ok(())
    }

    pub fn render(&self, view: &View) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(match view {
                View::Info(info) => serde_json::to_string_pretty(&info.raw)?,
                _ => serde_json::to_string_pretty(view)?,
            });
        }

        Ok(match view {
            View::UserList { users, .. } if users.is_empty() => {
                empty_state("No users found for this endpoint")
            }
            View::UserList { users, total, meta } => {
                let body = match self.format {
                    OutputFormat::Cards => {
                        users.iter().map(user_card).collect::<Vec<_>>().join("\n\n")
                    }
                    _ => user_table(users),
                };
                format!("{}\n{body}", list_header(*total, meta.as_ref()))
            }
            View::SingleUser { user } => user_detail(user),
            View::Info(info) => info_block(info),
            View::Empty => empty_state("Try a different endpoint"),
        })
    }
}

pub fn user_table(users: &[UserRecord]) -> String {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn list_header(total: u64, meta: Option<&ListMeta>) -> String {
    let mut lines = vec![format!("{} {total} users", "Total:".bold())];
    if let Some(ListMeta::Details {
        total_users,
        last_updated,
        data_source,
    }) = meta
    {
        if let Some(n) = total_users {
            lines.push(format!("{} {n}", "Total users:".bold()));
        }
        if let Some(updated) = last_updated {
            lines.push(format!("{} {}", "Last updated:".bold(), format_date(updated)));
        }
        if let Some(source) = data_source {
            lines.push(format!("{} {source}", "Data source:".bold()));
        }
    }
    lines.join("\n")
}

fn user_card(user: &UserRecord) -> String {
    format!(
        "{}\n  ID: {}\n  Email: {}\n  Age: {} years\n  City: {}\n  Job: {}\n  Hobby: {}",
        user.name.bold(),
        user.id,
        user.email,
        user.age,
        user.city,
        user.pekerjaan,
        user.hobi
    )
}

fn user_detail(user: &UserRecord) -> String {
    let fields = [
        ("ID", user.id.to_string()),
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Age", format!("{} years", user.age)),
        ("City", user.city.clone()),
        ("Job", user.pekerjaan.clone()),
        ("Hobby", user.hobi.clone()),
    ];
    let mut out = format!("{}\n", "User detail".bold().underline());
    for (label, value) in fields {
        out.push_str(&format!("  {:<7} {value}\n", format!("{label}:")));
    }
    out.trim_end().to_string()
}

fn info_block(info: &InfoPayload) -> String {
    let mut lines = vec![
        "API information".bold().underline().to_string(),
        format!("{} {}", "Message:".bold(), info.message),
        format!("{} {}", "Status:".bold(), info.status),
    ];
    if let Some(total) = info.total_users {
        lines.push(format!("{} {total}", "Total users:".bold()));
    }
    if !info.endpoints.is_empty() {
        lines.push(format!("\n{}", "Available endpoints:".bold()));
        lines.extend(
            info.endpoints
                .iter()
                .map(|(path, desc)| format!("  {} - {desc}", path.cyan())),
        );
    }
    if !info.usage_examples.is_empty() {
        lines.push(format!("\n{}", "Usage examples:".bold()));
        lines.extend(
            info.usage_examples
                .iter()
                .map(|(name, url)| format!("  {name}: {url}")),
        );
    }
    lines.join("\n")
}

fn empty_state(hint: &str) -> String {
    format!("{}\n{hint}", "No data".bold())
}

/// Format a timestamp nicely using chrono, falling back to the raw text
pub fn format_date(iso: &str) -> String {
    use chrono::{DateTime, Local, Utc};

    if let Ok(dt) = iso.parse::<DateTime<Utc>>() {
        let local: DateTime<Local> = dt.into();
        local.format("%Y-%m-%d %H:%M").to_string()
    } else {
        iso.to_string()
    }
}
