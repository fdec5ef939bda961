use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use budget_tracker::{
    BudgetForm, Frequency, NewExpense, NewIncome, NewSavingsGoal, UserID, create_expense,
    create_goal, create_income, create_or_update_budget, create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of budget_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let user = create_user("Test User", &conn)?;

    let now = OffsetDateTime::now_utc();
    let start_of_month = now.replace_day(1)?;

    println!("Adding incomes...");
    seed_incomes(user.id, start_of_month, &conn)?;

    println!("Adding expenses...");
    seed_expenses(user.id, start_of_month, now, &conn)?;

    println!("Adding budgets...");
    for (category, amount) in [
        ("Housing", 1500),
        ("Food", 600),
        ("Transportation", 200),
        ("Entertainment", 0),
    ] {
        let form = BudgetForm {
            category: category.to_owned(),
            amount: Decimal::from(amount),
            month: u8::from(now.month()),
            year: now.year(),
        };
        create_or_update_budget(user.id, &form, &conn)?;
    }

    println!("Adding savings goals...");
    for (name, target, saved) in [("Emergency fund", 10_000, 2_500), ("Holiday", 3_000, 3_000)] {
        let goal = NewSavingsGoal {
            name: name.to_owned(),
            target_amount: Decimal::from(target),
            current_amount: Decimal::from(saved),
            target_date: Some(now + Duration::days(365)),
            description: None,
        };
        create_goal(user.id, &goal, &conn)?;
    }

    println!(
        "Success! Send the header 'X-User-Id: {}' to act as the test user.",
        user.id
    );

    Ok(())
}

fn seed_incomes(
    user_id: UserID,
    start_of_month: OffsetDateTime,
    conn: &Connection,
) -> Result<(), Box<dyn Error>> {
    let salary = NewIncome {
        source: "Salary".to_owned(),
        amount: Decimal::new(5_250_00, 2),
        date: start_of_month,
        is_recurring: true,
        frequency: Some(Frequency::Monthly),
        description: None,
    };
    create_income(user_id, &salary, conn)?;

    let side_job = NewIncome {
        source: "Freelance".to_owned(),
        amount: Decimal::new(420_50, 2),
        date: start_of_month + Duration::days(9),
        is_recurring: false,
        frequency: None,
        description: Some("Logo design".to_owned()),
    };
    create_income(user_id, &side_job, conn)?;

    Ok(())
}

fn seed_expenses(
    user_id: UserID,
    start_of_month: OffsetDateTime,
    now: OffsetDateTime,
    conn: &Connection,
) -> Result<(), Box<dyn Error>> {
    let expenses = [
        ("Housing", Decimal::new(1_500_00, 2), 0, Some("Bank Transfer")),
        ("Food", Decimal::new(84_37, 2), 1, Some("Debit Card")),
        ("Transportation", Decimal::new(60_00, 2), 2, Some("Credit Card")),
        ("Food", Decimal::new(112_90, 2), 6, Some("Debit Card")),
        ("Entertainment", Decimal::new(45_00, 2), 7, Some("Credit Card")),
        ("Food", Decimal::new(23_15, 2), 12, Some("Cash")),
        ("Utilities", Decimal::new(143_20, 2), 14, None),
    ];

    for (category, amount, day_offset, payment_method) in expenses {
        let date = start_of_month + Duration::days(day_offset);
        // Keep the sample data within the current month.
        if date > now {
            continue;
        }

        let expense = NewExpense {
            category: category.to_owned(),
            amount,
            date,
            is_recurring: category == "Housing",
            frequency: (category == "Housing").then_some(Frequency::Monthly),
            description: None,
            payment_method: payment_method.map(str::to_owned),
        };
        create_expense(user_id, &expense, conn)?;
    }

    Ok(())
}
