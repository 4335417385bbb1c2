//! Database seeder for Pulso development and testing.
//!
//! Seeds company settings, demo departments with plans and objectives,
//! a retainer catalog with contracts, and a set of fixed costs for local
//! development.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use pulso_core::fiscal::Period;
use pulso_db::entities::sea_orm_active_enums::FixedCostCategory;
use pulso_db::repositories::{
    CreateDepartmentInput, CreateFixedCostInput, CreateRetainerInput, DepartmentRepository,
    FixedCostRepository, ObjectiveRepository, PlannedHoursRepository, SettingsRepository,
    UpsertObjectiveInput, UpsertPlannedHoursInput,
};
use pulso_db::repositories::{CreateCatalogInput, RetainerRepository};

/// Seeded months cover the first half of this year.
const SEED_YEAR: i32 = 2026;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = pulso_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding company settings...");
    seed_settings(&db).await;

    println!("Seeding departments...");
    let departments = seed_departments(&db).await;

    println!("Seeding retainer catalog and contracts...");
    seed_retainers(&db, &departments).await;

    println!("Seeding fixed costs...");
    seed_fixed_costs(&db).await;

    println!("Seeding hours plans and objectives...");
    seed_plans(&db, &departments).await;

    println!("Seeding complete!");
}

/// Inserts the default company settings where no value is stored yet.
async fn seed_settings(db: &DatabaseConnection) {
    let repo = SettingsRepository::new(db.clone());
    match repo.seed_defaults().await {
        Ok(inserted) => println!("  Inserted {inserted} default settings"),
        Err(e) => eprintln!("Failed to seed settings: {e}"),
    }
}

/// Seeds three demo departments, skipping names that already exist.
async fn seed_departments(db: &DatabaseConnection) -> Vec<(String, Uuid)> {
    let repo = DepartmentRepository::new(db.clone());
    let departments = [
        ("Desenvolvimento", "DEV", 6, dec!(55)),
        ("Design", "DES", 3, dec!(50)),
        ("Marketing", "MKT", 4, dec!(45)),
    ];

    let mut seeded = Vec::new();
    for (name, code, headcount, rate) in departments {
        if let Ok(Some(existing)) = repo.find_by_name(name).await {
            println!("  Department {name} already exists, skipping...");
            seeded.push((name.to_owned(), existing.id));
            continue;
        }

        match repo
            .create(CreateDepartmentInput {
                name: name.to_owned(),
                code: Some(code.to_owned()),
                billable_headcount: Some(headcount),
                cost_per_person_per_month: None,
                target_utilization: Some(dec!(0.65)),
                average_hourly_rate: Some(rate),
            })
            .await
        {
            Ok(department) => {
                println!("  Created department: {name}");
                seeded.push((name.to_owned(), department.id));
            }
            Err(e) => eprintln!("Failed to insert department {name}: {e}"),
        }
    }
    seeded
}

/// Seeds one catalog template per department plus a pair of contracts.
async fn seed_retainers(db: &DatabaseConnection, departments: &[(String, Uuid)]) {
    let repo = RetainerRepository::new(db.clone());
    let Some(&(_, dev_id)) = departments.first() else {
        return;
    };

    let existing = repo.list_catalog().await.unwrap_or_default();
    if existing.is_empty() {
        let catalog = repo
            .create_catalog(CreateCatalogInput {
                name: "Manutenção 20h".to_owned(),
                department_id: dev_id,
                monthly_price: dec!(1500),
                hours_per_month: dec!(20),
                internal_hourly_cost: Some(dec!(35)),
                base_hours: Some(dec!(10)),
                base_price: Some(dec!(800)),
            })
            .await;
        match catalog {
            Ok(entry) => println!("  Created catalog template: {}", entry.name),
            Err(e) => eprintln!("Failed to insert catalog template: {e}"),
        }
    } else {
        println!("  Catalog already populated, skipping templates...");
    }

    let contracts = [
        ("Cliente Alfa", dec!(1500), 1, 1),
        ("Cliente Beta", dec!(2200), 2, 3),
    ];
    for (name, price, quantity, start_month) in contracts {
        let taken = repo
            .list_for_department(dev_id)
            .await
            .unwrap_or_default()
            .iter()
            .any(|r| r.name == name);
        if taken {
            println!("  Contract {name} already exists, skipping...");
            continue;
        }

        let start_date = NaiveDate::from_ymd_opt(SEED_YEAR, start_month, 1)
            .expect("seed dates are valid");
        match repo
            .create(CreateRetainerInput {
                department_id: dev_id,
                catalog_id: None,
                name: name.to_owned(),
                contract_type: "avenca".to_owned(),
                monthly_price: price,
                quantity: Some(quantity),
                start_date,
                end_date: None,
                notes: None,
            })
            .await
        {
            Ok(_) => println!("  Created contract: {name}"),
            Err(e) => eprintln!("Failed to insert contract {name}: {e}"),
        }
    }
}

/// Seeds a representative fixed cost per category.
async fn seed_fixed_costs(db: &DatabaseConnection) {
    let repo = FixedCostRepository::new(db.clone());
    if !repo.list().await.unwrap_or_default().is_empty() {
        println!("  Fixed costs already populated, skipping...");
        return;
    }

    let start_date =
        NaiveDate::from_ymd_opt(SEED_YEAR, 1, 1).expect("seed dates are valid");
    let costs = [
        ("Escritório", FixedCostCategory::Aluguel, dec!(2400)),
        ("Eletricidade e água", FixedCostCategory::Utilidades, dec!(350)),
        ("Licenças SaaS", FixedCostCategory::Software, dec!(600)),
        ("Viatura comercial", FixedCostCategory::Viaturas, dec!(450)),
        ("Seguros", FixedCostCategory::Outros, dec!(200)),
    ];

    let mut inserted = 0;
    for (name, category, monthly_amount) in costs {
        let result = repo
            .create(CreateFixedCostInput {
                name: name.to_owned(),
                category,
                monthly_amount,
                description: None,
                start_date,
                end_date: None,
            })
            .await;
        match result {
            Ok(_) => inserted += 1,
            Err(e) => eprintln!("Failed to insert fixed cost {name}: {e}"),
        }
    }
    println!("  Inserted {inserted} fixed costs");
}

/// Seeds six months of hours plans and revenue objectives per department.
async fn seed_plans(db: &DatabaseConnection, departments: &[(String, Uuid)]) {
    let hours_repo = PlannedHoursRepository::new(db.clone());
    let objective_repo = ObjectiveRepository::new(db.clone());

    let mut plans = 0;
    let mut objectives = 0;
    for &(ref name, department_id) in departments {
        for month in 1..=6_u32 {
            let period = match Period::new(month, SEED_YEAR) {
                Ok(period) => period,
                Err(e) => {
                    eprintln!("Invalid seed period {month}/{SEED_YEAR}: {e}");
                    continue;
                }
            };

            let plan = hours_repo
                .upsert(
                    department_id,
                    period,
                    UpsertPlannedHoursInput {
                        billable_headcount: None,
                        target_hours_per_month: None,
                        target_utilization: None,
                        target_available_hours: None,
                        actual_billable_hours: Some(Decimal::from(80 + month * 5)),
                        project_revenue: None,
                    },
                )
                .await;
            match plan {
                Ok(_) => plans += 1,
                Err(e) => eprintln!("Failed to seed hours for {name} {month}/{SEED_YEAR}: {e}"),
            }

            let objective = objective_repo
                .upsert(UpsertObjectiveInput {
                    department_id,
                    period,
                    target_value: dec!(10000),
                })
                .await;
            match objective {
                Ok(_) => objectives += 1,
                Err(e) => {
                    eprintln!("Failed to seed objective for {name} {month}/{SEED_YEAR}: {e}");
                }
            }
        }
    }
    println!("  Upserted {plans} hours plans and {objectives} objectives");
}
