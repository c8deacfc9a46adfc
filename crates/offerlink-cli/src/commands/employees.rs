use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{now_utc, optional_text, require_text};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use offerlink_core::domain::{normalize_phone, EmployeeStatus};
use offerlink_store::repo::{DirectoryEntry, EmployeeNew};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// Insert or replace a directory entry
    Add(AddEmployeeArgs),
    Show(ShowEmployeeArgs),
    Ls(ListEmployeesArgs),
    /// Load a JSON array of employees in one transaction
    Import(ImportEmployeesArgs),
    Terminate(TerminateEmployeeArgs),
}

#[derive(Debug, Args)]
pub struct AddEmployeeArgs {
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub first: Option<String>,
    #[arg(long)]
    pub last: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// A (active), L (leave) or T (terminated)
    #[arg(long, default_value = "A")]
    pub status: String,
}

#[derive(Debug, Args)]
pub struct ShowEmployeeArgs {
    pub number: String,
}

#[derive(Debug, Args)]
pub struct ListEmployeesArgs {
    /// Include terminated employees
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ImportEmployeesArgs {
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct TerminateEmployeeArgs {
    pub number: String,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    imported: usize,
}

pub fn add_employee(ctx: &Context<'_>, args: AddEmployeeArgs) -> Result<()> {
    let status = EmployeeStatus::parse_strict(&args.status)?;
    let input = EmployeeNew {
        employee_number: require_text("employee number", &args.number)?,
        first_name: optional_text(args.first),
        last_name: optional_text(args.last),
        email: optional_text(args.email),
        phone_number: optional_text(args.phone).map(|phone| normalize_phone(&phone)),
        status,
    };
    let entry = ctx.store.employees().upsert(now_utc(), input)?;

    if ctx.json {
        return print_json(&entry);
    }
    println!("Saved employee {}", entry.employee.employee_number);
    Ok(())
}

pub fn show_employee(ctx: &Context<'_>, args: ShowEmployeeArgs) -> Result<()> {
    let number = require_text("employee number", &args.number)?;
    let entry = ctx
        .store
        .employees()
        .get(&number)?
        .ok_or_else(|| not_found(format!("employee {number}")))?;

    if ctx.json {
        return print_json(&entry);
    }
    print_entry(&entry);
    Ok(())
}

pub fn list_employees(ctx: &Context<'_>, args: ListEmployeesArgs) -> Result<()> {
    let entries: Vec<DirectoryEntry> = ctx
        .store
        .employees()
        .list_all()?
        .into_iter()
        .filter(|entry| args.all || entry.status.is_active())
        .collect();

    if ctx.json {
        return print_json(&entries);
    }
    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

pub fn import_employees(ctx: &Context<'_>, args: ImportEmployeesArgs) -> Result<()> {
    let data = fs::read_to_string(&args.file)
        .with_context(|| format!("read employees file {}", args.file.display()))?;
    let rows: Vec<EmployeeNew> = serde_json::from_str(&data)
        .with_context(|| format!("parse employees file {}", args.file.display()))?;
    let rows = rows
        .into_iter()
        .map(|mut row| {
            row.phone_number = optional_text(row.phone_number).map(|phone| normalize_phone(&phone));
            row
        })
        .collect();

    let imported = ctx
        .store
        .employees()
        .import(now_utc(), rows)
        .with_context(|| format!("import employees from {}", args.file.display()))?;

    if ctx.json {
        return print_json(&ImportReport { imported });
    }
    println!("Imported {} employees", imported);
    Ok(())
}

pub fn terminate_employee(ctx: &Context<'_>, args: TerminateEmployeeArgs) -> Result<()> {
    let number = require_text("employee number", &args.number)?;
    ctx.store
        .employees()
        .set_status(now_utc(), &number, EmployeeStatus::Terminated)?;
    if !ctx.json {
        println!("Terminated employee {}", number);
    }
    Ok(())
}

fn print_entry(entry: &DirectoryEntry) {
    let employee = &entry.employee;
    println!(
        "{}  {} {}  {}  {}  [{}]",
        employee.employee_number,
        employee.first_name.as_deref().unwrap_or("-"),
        employee.last_name.as_deref().unwrap_or("-"),
        employee.email.as_deref().unwrap_or("-"),
        employee.phone_number.as_deref().unwrap_or("-"),
        entry.status.as_str(),
    );
}
