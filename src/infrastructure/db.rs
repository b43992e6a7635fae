use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    // An in-memory database lives and dies with its connection
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    tracing::debug!("Connected to {}", database_url);

    // Cascade deletes need foreign key enforcement on
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    const SCHEMA: &[(&str, &str)] = &[
        (
            "users",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT,
                first_name TEXT,
                last_name TEXT,
                password_hash TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        ),
        (
            "customers",
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE,
                phone_number TEXT UNIQUE,
                profile_picture TEXT,
                date_of_birth TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )
            "#,
        ),
        (
            "agents",
            r#"
            CREATE TABLE IF NOT EXISTS agents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile_picture TEXT NOT NULL,
                user_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                location TEXT,
                created_at TEXT NOT NULL,
                updated_date TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1
            )
            "#,
        ),
        (
            "property_categories",
            r#"
            CREATE TABLE IF NOT EXISTS property_categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )
            "#,
        ),
        (
            "districts",
            r#"
            CREATE TABLE IF NOT EXISTS districts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )
            "#,
        ),
        (
            "cities",
            r#"
            CREATE TABLE IF NOT EXISTS cities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )
            "#,
        ),
        (
            "properties",
            r#"
            CREATE TABLE IF NOT EXISTS properties (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                price REAL NOT NULL,
                district_id INTEGER NOT NULL,
                city_id INTEGER NOT NULL,
                address TEXT NOT NULL,
                sqft INTEGER NOT NULL,
                bhk INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                year_of_construction INTEGER NOT NULL,
                images1 TEXT NOT NULL,
                images2 TEXT NOT NULL,
                images3 TEXT NOT NULL,
                images4 TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                sold_out BOOLEAN NOT NULL DEFAULT 0,
                admin_approval BOOLEAN NOT NULL DEFAULT 0,
                FOREIGN KEY (district_id) REFERENCES districts(id) ON DELETE CASCADE,
                FOREIGN KEY (city_id) REFERENCES cities(id) ON DELETE CASCADE,
                FOREIGN KEY (category_id) REFERENCES property_categories(id) ON DELETE CASCADE
            )
            "#,
        ),
        (
            "leads",
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_id INTEGER NOT NULL,
                property_id INTEGER NOT NULL,
                agent_id INTEGER NOT NULL,
                lead_status TEXT NOT NULL CHECK (lead_status IN ('cold', 'warm', 'hot')),
                created_date TEXT NOT NULL,
                updated_date TEXT NOT NULL,
                FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE,
                FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE,
                FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
            )
            "#,
        ),
        (
            "tasks",
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agent_id INTEGER NOT NULL,
                deadline TEXT NOT NULL,
                description TEXT NOT NULL,
                task_status TEXT NOT NULL DEFAULT 'Not accepted'
                    CHECK (task_status IN ('Not accepted', 'Accepted', 'Completed')),
                FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
            )
            "#,
        ),
        (
            "sales",
            r#"
            CREATE TABLE IF NOT EXISTS sales (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agent_id INTEGER NOT NULL,
                property_id INTEGER NOT NULL,
                customer_id INTEGER NOT NULL,
                sale_price INTEGER NOT NULL,
                sale_date TEXT NOT NULL,
                FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE,
                FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE,
                FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE
            )
            "#,
        ),
        (
            "commissions",
            r#"
            CREATE TABLE IF NOT EXISTS commissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agent_id INTEGER NOT NULL,
                percentage REAL NOT NULL,
                commission_amount REAL NOT NULL,
                FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
            )
            "#,
        ),
        (
            "account_balances",
            r#"
            CREATE TABLE IF NOT EXISTS account_balances (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                agent_id INTEGER NOT NULL,
                total_sales REAL NOT NULL,
                commission_earned REAL NOT NULL,
                balance REAL NOT NULL,
                FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
            )
            "#,
        ),
    ];

    for (table, ddl) in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            ddl.to_string(),
        ))
        .await?;
        tracing::trace!("Ensured table {}", table);
    }

    // Lookup indexes for the foreign keys queried most
    for ddl in [
        "CREATE INDEX IF NOT EXISTS idx_leads_agent ON leads(agent_id)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_agent ON tasks(agent_id)",
        "CREATE INDEX IF NOT EXISTS idx_sales_agent ON sales(agent_id)",
        "CREATE INDEX IF NOT EXISTS idx_properties_listing ON properties(admin_approval, is_active, sold_out)",
        "CREATE INDEX IF NOT EXISTS idx_agents_location ON agents(location)",
    ] {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            ddl.to_owned(),
        ))
        .await?;
    }

    tracing::info!("Schema ready ({} tables)", SCHEMA.len());
    Ok(())
}
