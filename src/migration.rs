//! Schema DDL, applied in dependency order at startup. Every statement is idempotent.

use crate::error::AppError;
use sqlx::PgPool;

const SCHEMA: &[(&str, &str)] = &[
    (
        "accounts",
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(150) NOT NULL UNIQUE,
            name VARCHAR(100) NOT NULL DEFAULT '',
            phone_number VARCHAR(15) NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT '',
            location VARCHAR(200) NOT NULL DEFAULT '',
            is_pharmacy BOOLEAN NOT NULL DEFAULT FALSE,
            is_smartphone_user BOOLEAN NOT NULL DEFAULT TRUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "sessions",
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            account_id BIGINT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "pharmacies",
        r#"
        CREATE TABLE IF NOT EXISTS pharmacies (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL UNIQUE REFERENCES accounts (id) ON DELETE CASCADE,
            store_name VARCHAR(100) NOT NULL,
            license_number VARCHAR(50) NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            location VARCHAR(200) NOT NULL DEFAULT '',
            contact_number VARCHAR(15) NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "pharmacists",
        r#"
        CREATE TABLE IF NOT EXISTS pharmacists (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
            pharmacy_id BIGINT NOT NULL REFERENCES pharmacies (id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (account_id, pharmacy_id)
        )
        "#,
    ),
    (
        "medicines",
        r#"
        CREATE TABLE IF NOT EXISTS medicines (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            brand VARCHAR(100) NOT NULL DEFAULT '',
            category VARCHAR(100) NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "medicines_name_idx",
        "CREATE INDEX IF NOT EXISTS medicines_name_lower_idx ON medicines (LOWER(name))",
    ),
    (
        "medicine_alternatives",
        r#"
        CREATE TABLE IF NOT EXISTS medicine_alternatives (
            medicine_id BIGINT NOT NULL REFERENCES medicines (id) ON DELETE CASCADE,
            alternative_id BIGINT NOT NULL REFERENCES medicines (id) ON DELETE CASCADE,
            PRIMARY KEY (medicine_id, alternative_id),
            CHECK (medicine_id <> alternative_id)
        )
        "#,
    ),
    (
        "inventory",
        r#"
        CREATE TABLE IF NOT EXISTS inventory (
            id BIGSERIAL PRIMARY KEY,
            pharmacy_id BIGINT NOT NULL REFERENCES pharmacies (id) ON DELETE CASCADE,
            medicine_id BIGINT NOT NULL REFERENCES medicines (id) ON DELETE CASCADE,
            quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
            last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (pharmacy_id, medicine_id)
        )
        "#,
    ),
    (
        "search_logs",
        r#"
        CREATE TABLE IF NOT EXISTS search_logs (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT REFERENCES accounts (id) ON DELETE SET NULL,
            medicine_name VARCHAR(100) NOT NULL,
            "timestamp" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            result_found BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "sms_requests",
        r#"
        CREATE TABLE IF NOT EXISTS sms_requests (
            id BIGSERIAL PRIMARY KEY,
            phone_number VARCHAR(15) NOT NULL,
            medicine_name VARCHAR(100) NOT NULL,
            location VARCHAR(200) NOT NULL,
            response_sent BOOLEAN NOT NULL DEFAULT FALSE,
            "timestamp" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

/// Create every table and index that does not exist yet.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for (name, ddl) in SCHEMA {
        tracing::debug!(object = %name, "applying schema");
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(objects = SCHEMA.len(), "schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SCHEMA;

    #[test]
    fn tables_are_created_after_what_they_reference() {
        let position = |name: &str| SCHEMA.iter().position(|(n, _)| *n == name).unwrap();
        assert!(position("accounts") < position("sessions"));
        assert!(position("accounts") < position("pharmacies"));
        assert!(position("pharmacies") < position("inventory"));
        assert!(position("medicines") < position("inventory"));
        assert!(position("medicines") < position("medicine_alternatives"));
    }

    #[test]
    fn every_statement_is_idempotent() {
        assert!(SCHEMA.iter().all(|(_, ddl)| ddl.contains("IF NOT EXISTS")));
    }
}
