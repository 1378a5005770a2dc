//! Creates a database seeded with demo accounts, transactions, and a
//! prediction snapshot for local development.

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use fincast::{
    account::{AccountKind, NewAccount, create_account},
    initialize_db,
    prediction::{encode_month_index, save_snapshot},
    transaction::{RecurringInterval, Transaction, TransactionKind, create_transaction},
};

/// Creates a demo database for trying out Fincast.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to write the SQLite database to.
    #[arg(long, default_value = "demo.db")]
    db_path: String,
}

fn main() {
    let args = Args::parse();

    let mut connection = Connection::open(&args.db_path).expect("Could not open the database file");
    initialize_db(&connection).expect("Could not initialize the database");

    let today = OffsetDateTime::now_utc().date();

    let everyday = create_account(
        &NewAccount {
            name: "Everyday Checking".to_owned(),
            kind: AccountKind::Current,
            balance: 2843.17,
            is_default: true,
        },
        &mut connection,
    )
    .expect("Could not create account");

    let savings = create_account(
        &NewAccount {
            name: "Rainy Day Savings".to_owned(),
            kind: AccountKind::Savings,
            balance: 12500.00,
            is_default: false,
        },
        &mut connection,
    )
    .expect("Could not create account");

    // Six months of salary, rent, and day-to-day spending. Amounts are varied
    // deterministically so repeated runs produce the same data.
    for month in 0..6i64 {
        let month_start = today - Duration::days(30 * month);

        create_transaction(
            Transaction::build(everyday.id, 4200.0, month_start - Duration::days(1), "Salary")
                .category("salary")
                .kind(TransactionKind::Income)
                .recurring(RecurringInterval::Monthly, Some(today + Duration::days(30))),
            &connection,
        )
        .expect("Could not create transaction");

        create_transaction(
            Transaction::build(everyday.id, 1650.0, month_start - Duration::days(2), "Rent")
                .category("housing")
                .recurring(RecurringInterval::Monthly, Some(today + Duration::days(28))),
            &connection,
        )
        .expect("Could not create transaction");

        for week in 0..4i64 {
            let offset = month * 4 + week;
            let date = month_start - Duration::days(3 + week * 7);

            create_transaction(
                Transaction::build(
                    everyday.id,
                    60.0 + (offset * 7 % 40) as f64,
                    date,
                    "Supermarket shop",
                )
                .category("groceries"),
                &connection,
            )
            .expect("Could not create transaction");

            create_transaction(
                Transaction::build(
                    everyday.id,
                    15.0 + (offset * 3 % 25) as f64,
                    date - Duration::days(2),
                    "Dinner out",
                )
                .category("food"),
                &connection,
            )
            .expect("Could not create transaction");
        }

        create_transaction(
            Transaction::build(
                savings.id,
                500.0,
                month_start - Duration::days(5),
                "Monthly savings top-up",
            )
            .category("other-income")
            .kind(TransactionKind::Income),
            &connection,
        )
        .expect("Could not create transaction");
    }

    // A snapshot of the kind the forecast service pushes: five months of
    // per-category predictions starting from the current month.
    let mut points = Vec::new();
    for month_offset in 0..5i64 {
        let date = today + Duration::days(30 * month_offset);
        let month_index = encode_month_index(date.year() as i64, u8::from(date.month()));

        for (category, base) in [("groceries", 290.0), ("food", 110.0), ("housing", 1650.0)] {
            points.push(serde_json::json!({
                "month_index": month_index,
                "category": category,
                "predicted_monthly_expense": base + (month_offset * 13 % 31) as f64,
            }));
        }
    }

    let payload = serde_json::to_string(&points).expect("Could not serialize predictions");
    save_snapshot(&payload, today, &connection).expect("Could not save prediction snapshot");

    println!(
        "Created demo database at {} with two accounts and six months of transactions.",
        args.db_path
    );
}
