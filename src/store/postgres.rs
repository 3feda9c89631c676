//! PostgreSQL store. Values are always bound as parameters; SQL text is static.

use super::{normalize_alternatives, unknown_alternatives, Store};
use crate::error::{AppError, ConfigError};
use crate::model::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{ConnectOptions, PgConnection, PgPool};
use std::str::FromStr;

const ACCOUNT_COLUMNS: &str =
    "id, username, name, phone_number, address, location, is_pharmacy, is_smartphone_user, password_hash, created_at";
const PHARMACY_COLUMNS: &str =
    "id, account_id, store_name, license_number, address, location, contact_number, created_at";
const PHARMACIST_COLUMNS: &str = "id, account_id, pharmacy_id, created_at";
const INVENTORY_COLUMNS: &str = "id, pharmacy_id, medicine_id, quantity, last_updated";
const SEARCH_LOG_COLUMNS: &str = r#"id, account_id, medicine_name, "timestamp", result_found"#;
const SMS_REQUEST_COLUMNS: &str = r#"id, phone_number, medicine_name, location, response_sent, "timestamp""#;

/// Medicine rows with their alternative ids folded into an array.
const MEDICINE_SELECT: &str = r#"
    SELECT m.id, m.name, m.brand, m.category, m.description, m.price, m.created_at,
           ARRAY(
               SELECT a.alternative_id FROM medicine_alternatives a
               WHERE a.medicine_id = m.id ORDER BY a.alternative_id
           ) AS alternative_medicine_ids
    FROM medicines m
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a unique-constraint violation to a conflict with `message`; other errors pass through.
fn conflict_on_unique(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
            AppError::Conflict(message.into())
        } else {
            AppError::Db(e)
        }
    }
}

/// ILIKE pattern matching `needle` anywhere, with LIKE metacharacters escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

async fn insert_pharmacy(
    conn: &mut PgConnection,
    account_id: i64,
    new: &NewPharmacy,
) -> Result<Pharmacy, AppError> {
    let sql = format!(
        "INSERT INTO pharmacies (account_id, store_name, license_number, address, location, contact_number) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        PHARMACY_COLUMNS
    );
    let pharmacy: Pharmacy = sqlx::query_as(&sql)
        .bind(account_id)
        .bind(&new.store_name)
        .bind(&new.license_number)
        .bind(&new.address)
        .bind(&new.location)
        .bind(&new.contact_number)
        .fetch_one(&mut *conn)
        .await
        .map_err(conflict_on_unique("account already owns a pharmacy"))?;
    let covered = sqlx::query(
        "INSERT INTO inventory (pharmacy_id, medicine_id, quantity) \
         SELECT $1, id, 0 FROM medicines ON CONFLICT (pharmacy_id, medicine_id) DO NOTHING",
    )
    .bind(pharmacy.id)
    .execute(&mut *conn)
    .await?;
    tracing::info!(
        pharmacy_id = pharmacy.id,
        rows = covered.rows_affected(),
        "created pharmacy inventory coverage"
    );
    Ok(pharmacy)
}

async fn check_alternatives(conn: &mut PgConnection, ids: &[i64]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM medicines WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;
    let missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(unknown_alternatives(&missing))
    }
}

async fn replace_alternatives(conn: &mut PgConnection, medicine_id: i64, ids: &[i64]) -> Result<(), AppError> {
    sqlx::query("DELETE FROM medicine_alternatives WHERE medicine_id = $1")
        .bind(medicine_id)
        .execute(&mut *conn)
        .await?;
    if !ids.is_empty() {
        sqlx::query(
            "INSERT INTO medicine_alternatives (medicine_id, alternative_id) SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(medicine_id)
        .bind(ids)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn fetch_medicine(conn: &mut PgConnection, id: i64) -> Result<Option<Medicine>, AppError> {
    let sql = format!("{} WHERE m.id = $1", MEDICINE_SELECT);
    Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_account(
        &self,
        new: NewAccount,
        pharmacy: Option<NewPharmacy>,
    ) -> Result<(Account, Option<Pharmacy>), AppError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO accounts (username, name, phone_number, address, location, is_pharmacy, is_smartphone_user, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let account: Account = sqlx::query_as(&sql)
            .bind(&new.username)
            .bind(&new.name)
            .bind(&new.phone_number)
            .bind(&new.address)
            .bind(&new.location)
            .bind(new.is_pharmacy)
            .bind(new.is_smartphone_user)
            .bind(&new.password_hash)
            .fetch_one(&mut *tx)
            .await
            .map_err(conflict_on_unique("username already taken"))?;
        let pharmacy = match pharmacy {
            Some(p) => Some(insert_pharmacy(&mut tx, account.id, &p).await?),
            None => None,
        };
        tx.commit().await?;
        Ok((account, pharmacy))
    }

    async fn account(&self, id: i64) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {} FROM accounts WHERE username = $1", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(username).fetch_optional(&self.pool).await?)
    }

    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, AppError> {
        let sql = format!("SELECT {} FROM accounts ORDER BY id LIMIT $1 OFFSET $2", ACCOUNT_COLUMNS);
        Ok(sqlx::query_as(&sql)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_account(&self, id: i64, patch: AccountPatch) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "UPDATE accounts SET name = COALESCE($2, name), phone_number = COALESCE($3, phone_number), \
             address = COALESCE($4, address), location = COALESCE($5, location), \
             is_smartphone_user = COALESCE($6, is_smartphone_user) WHERE id = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.phone_number)
            .bind(patch.address)
            .bind(patch.location)
            .bind(patch.is_smartphone_user)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_account(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_session(&self, session: Session) -> Result<(), AppError> {
        sqlx::query("INSERT INTO sessions (token, account_id, created_at, expires_at) VALUES ($1, $2, $3, $4)")
            .bind(&session.token)
            .bind(session.account_id)
            .bind(session.created_at)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn session_account(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE id = \
             (SELECT account_id FROM sessions WHERE token = $1 AND expires_at > $2)",
            ACCOUNT_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_session(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_pharmacy(&self, account_id: i64, pharmacy: NewPharmacy) -> Result<Pharmacy, AppError> {
        let mut tx = self.pool.begin().await?;
        let created = insert_pharmacy(&mut tx, account_id, &pharmacy).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn pharmacy(&self, id: i64) -> Result<Option<Pharmacy>, AppError> {
        let sql = format!("SELECT {} FROM pharmacies WHERE id = $1", PHARMACY_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn pharmacy_by_account(&self, account_id: i64) -> Result<Option<Pharmacy>, AppError> {
        let sql = format!("SELECT {} FROM pharmacies WHERE account_id = $1", PHARMACY_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(account_id).fetch_optional(&self.pool).await?)
    }

    async fn list_pharmacies(&self, page: Page) -> Result<Vec<Pharmacy>, AppError> {
        let sql = format!("SELECT {} FROM pharmacies ORDER BY id LIMIT $1 OFFSET $2", PHARMACY_COLUMNS);
        Ok(sqlx::query_as(&sql)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_pharmacy(&self, id: i64, patch: PharmacyPatch) -> Result<Option<Pharmacy>, AppError> {
        let sql = format!(
            "UPDATE pharmacies SET store_name = COALESCE($2, store_name), \
             license_number = COALESCE($3, license_number), address = COALESCE($4, address), \
             location = COALESCE($5, location), contact_number = COALESCE($6, contact_number) \
             WHERE id = $1 RETURNING {}",
            PHARMACY_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.store_name)
            .bind(patch.license_number)
            .bind(patch.address)
            .bind(patch.location)
            .bind(patch.contact_number)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_pharmacy(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pharmacies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_pharmacist(&self, link: NewPharmacist) -> Result<Pharmacist, AppError> {
        let sql = format!(
            "INSERT INTO pharmacists (account_id, pharmacy_id) VALUES ($1, $2) RETURNING {}",
            PHARMACIST_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(link.account_id)
            .bind(link.pharmacy_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_foreign_key_violation()) {
                    AppError::NotFound("account or pharmacy".into())
                } else {
                    conflict_on_unique("account is already a pharmacist there")(e)
                }
            })
    }

    async fn pharmacist(&self, id: i64) -> Result<Option<Pharmacist>, AppError> {
        let sql = format!("SELECT {} FROM pharmacists WHERE id = $1", PHARMACIST_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_pharmacists(&self, filter: PharmacistFilter, page: Page) -> Result<Vec<Pharmacist>, AppError> {
        let sql = format!(
            "SELECT {} FROM pharmacists WHERE ($1::BIGINT IS NULL OR pharmacy_id = $1) \
             ORDER BY id LIMIT $2 OFFSET $3",
            PHARMACIST_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(filter.pharmacy_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_pharmacist(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pharmacists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_medicine(&self, new: NewMedicine) -> Result<Medicine, AppError> {
        let alternatives = normalize_alternatives(&new.alternative_medicine_ids, None);
        let mut tx = self.pool.begin().await?;
        check_alternatives(&mut tx, &alternatives).await?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO medicines (name, brand, category, description, price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&new.name)
        .bind(&new.brand)
        .bind(&new.category)
        .bind(&new.description)
        .bind(new.price.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;
        replace_alternatives(&mut tx, id, &alternatives).await?;
        let medicine = fetch_medicine(&mut tx, id)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tx.commit().await?;
        Ok(medicine)
    }

    async fn medicine(&self, id: i64) -> Result<Option<Medicine>, AppError> {
        let mut conn = self.pool.acquire().await?;
        fetch_medicine(&mut conn, id).await
    }

    async fn list_medicines(&self, filter: MedicineFilter, page: Page) -> Result<Vec<Medicine>, AppError> {
        let sql = format!(
            "{} WHERE ($1::TEXT IS NULL OR m.name ILIKE $1) ORDER BY m.id LIMIT $2 OFFSET $3",
            MEDICINE_SELECT
        );
        Ok(sqlx::query_as(&sql)
            .bind(filter.search.as_deref().map(contains_pattern))
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_medicines(&self, needle: &str) -> Result<Vec<Medicine>, AppError> {
        let sql = format!("{} WHERE m.name ILIKE $1 ORDER BY m.id", MEDICINE_SELECT);
        Ok(sqlx::query_as(&sql)
            .bind(contains_pattern(needle))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_medicine(&self, id: i64, patch: MedicinePatch) -> Result<Option<Medicine>, AppError> {
        let mut tx = self.pool.begin().await?;
        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE medicines SET name = COALESCE($2, name), brand = COALESCE($3, brand), \
             category = COALESCE($4, category), description = COALESCE($5, description), \
             price = COALESCE($6, price) WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.brand)
        .bind(patch.category)
        .bind(patch.description)
        .bind(patch.price)
        .fetch_optional(&mut *tx)
        .await?;
        if updated.is_none() {
            return Ok(None);
        }
        if let Some(ids) = patch.alternative_medicine_ids {
            let ids = normalize_alternatives(&ids, Some(id));
            check_alternatives(&mut tx, &ids).await?;
            replace_alternatives(&mut tx, id, &ids).await?;
        }
        let medicine = fetch_medicine(&mut tx, id).await?;
        tx.commit().await?;
        Ok(medicine)
    }

    async fn delete_medicine(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM medicines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn inventory(&self, id: i64) -> Result<Option<Inventory>, AppError> {
        let sql = format!("SELECT {} FROM inventory WHERE id = $1", INVENTORY_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_inventory(&self, filter: InventoryFilter, page: Page) -> Result<Vec<Inventory>, AppError> {
        let sql = format!(
            "SELECT {} FROM inventory WHERE ($1::BIGINT IS NULL OR pharmacy_id = $1) \
             AND ($2::BIGINT IS NULL OR medicine_id = $2) ORDER BY id LIMIT $3 OFFSET $4",
            INVENTORY_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(filter.pharmacy_id)
            .bind(filter.medicine_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn upsert_inventory(&self, pharmacy_id: i64, medicine_id: i64, quantity: i32) -> Result<Inventory, AppError> {
        // One statement, so concurrent calls for the same pair serialize on the unique index.
        let sql = format!(
            "INSERT INTO inventory (pharmacy_id, medicine_id, quantity, last_updated) VALUES ($1, $2, $3, NOW()) \
             ON CONFLICT (pharmacy_id, medicine_id) DO UPDATE SET quantity = EXCLUDED.quantity, last_updated = NOW() \
             RETURNING {}",
            INVENTORY_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(pharmacy_id)
            .bind(medicine_id)
            .bind(quantity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_foreign_key_violation()) {
                    AppError::NotFound(format!("medicine {}", medicine_id))
                } else {
                    AppError::Db(e)
                }
            })
    }

    async fn update_inventory(&self, id: i64, quantity: i32) -> Result<Option<Inventory>, AppError> {
        let sql = format!(
            "UPDATE inventory SET quantity = $2, last_updated = NOW() WHERE id = $1 RETURNING {}",
            INVENTORY_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(id)
            .bind(quantity)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_inventory(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_search_log(&self, log: NewSearchLog) -> Result<SearchLog, AppError> {
        let sql = format!(
            "INSERT INTO search_logs (account_id, medicine_name, result_found) VALUES ($1, $2, $3) RETURNING {}",
            SEARCH_LOG_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(log.account_id)
            .bind(&log.medicine_name)
            .bind(log.result_found)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn search_log(&self, id: i64) -> Result<Option<SearchLog>, AppError> {
        let sql = format!("SELECT {} FROM search_logs WHERE id = $1", SEARCH_LOG_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_search_logs(&self, filter: SearchLogFilter, page: Page) -> Result<Vec<SearchLog>, AppError> {
        let sql = format!(
            "SELECT {} FROM search_logs WHERE ($1::BOOLEAN IS NULL OR result_found = $1) \
             ORDER BY id LIMIT $2 OFFSET $3",
            SEARCH_LOG_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(filter.result_found)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_sms_request(&self, request: NewSmsRequest) -> Result<SmsRequest, AppError> {
        let sql = format!(
            "INSERT INTO sms_requests (phone_number, medicine_name, location) VALUES ($1, $2, $3) RETURNING {}",
            SMS_REQUEST_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(&request.phone_number)
            .bind(&request.medicine_name)
            .bind(&request.location)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn sms_request(&self, id: i64) -> Result<Option<SmsRequest>, AppError> {
        let sql = format!("SELECT {} FROM sms_requests WHERE id = $1", SMS_REQUEST_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_sms_requests(&self, filter: SmsRequestFilter, page: Page) -> Result<Vec<SmsRequest>, AppError> {
        let sql = format!(
            "SELECT {} FROM sms_requests WHERE ($1::BOOLEAN IS NULL OR response_sent = $1) \
             ORDER BY id LIMIT $2 OFFSET $3",
            SMS_REQUEST_COLUMNS
        );
        Ok(sqlx::query_as(&sql)
            .bind(filter.response_sent)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Create the database named in `database_url` if it does not exist yet (connects to `postgres` to check).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_database_url(e.to_string()))?;
    let mut conn: PgConnection = opts.connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "\"\"")))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Splits `postgres://host/db?opts` into (`postgres://host/postgres?opts`, `db`).
/// A URL without a database path yields an empty name.
fn split_database_url(url: &str) -> Result<(String, String), ConfigError> {
    let authority = url
        .find("://")
        .map(|i| i + 3)
        .ok_or_else(|| invalid_database_url("expected scheme://host/database"))?;
    let Some(slash) = url[authority..].find('/') else {
        return Ok((url.to_string(), String::new()));
    };
    let (base, rest) = url.split_at(authority + slash + 1);
    let (db_name, query) = match rest.split_once('?') {
        Some((name, q)) => (name, Some(q)),
        None => (rest, None),
    };
    let mut admin_url = format!("{}postgres", base);
    if let Some(q) = query {
        admin_url.push('?');
        admin_url.push_str(q);
    }
    Ok((admin_url, db_name.trim().to_string()))
}

fn invalid_database_url(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: "DATABASE_URL",
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("asp"), "%asp%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn splits_database_url() {
        let (admin, db) = split_database_url("postgres://u:p@localhost:5432/pharmacy?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres?sslmode=disable");
        assert_eq!(db, "pharmacy");
        assert!(matches!(
            split_database_url("nonsense"),
            Err(ConfigError::InvalidValue { key: "DATABASE_URL", .. })
        ));
    }

    #[test]
    fn database_url_without_path_has_no_database_name() {
        let (admin, db) = split_database_url("postgres://localhost").unwrap();
        assert_eq!(admin, "postgres://localhost");
        assert_eq!(db, "");
        let (_, db) = split_database_url("postgres://localhost:5432?sslmode=disable").unwrap();
        assert_eq!(db, "");
    }
}
