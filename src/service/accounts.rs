//! Registration, login and logout.

use super::auth::{hash_password, new_session_token, verify_password};
use super::validation::Validate;
use crate::error::AppError;
use crate::model::{Account, AuthResponse, LoginRequest, NewAccount, RegisterRequest, Session};
use crate::store::Store;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub struct AccountService;

impl AccountService {
    /// Validate, create the account (and its pharmacy for pharmacy owners) and open a session.
    /// Nothing is written when validation fails.
    pub async fn register(
        store: &dyn Store,
        session_ttl: Duration,
        req: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        req.validate()?;
        let pharmacy = req.pharmacy();
        let new = NewAccount {
            username: req.username.trim().to_string(),
            name: req.name.trim().to_string(),
            phone_number: req.phone_number.trim().to_string(),
            address: req.address,
            location: req.location,
            is_pharmacy: req.is_pharmacy,
            is_smartphone_user: req.is_smartphone_user,
            password_hash: hash_password(req.password).await?,
        };
        let (account, pharmacy) = store.create_account(new, pharmacy).await?;
        tracing::info!(
            account_id = account.id,
            is_pharmacy = account.is_pharmacy,
            pharmacy_id = pharmacy.as_ref().map(|p| p.id),
            "registered account"
        );
        let session = Self::open_session(store, &account, session_ttl).await?;
        Ok(AuthResponse {
            token: session.token,
            expires_at: session.expires_at,
            account,
            pharmacy,
        })
    }

    /// Unknown usernames and wrong passwords fail the same way.
    pub async fn login(store: &dyn Store, session_ttl: Duration, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let Some(account) = store.account_by_username(req.username.trim()).await? else {
            tracing::warn!(username = %req.username, "login for unknown username");
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(req.password, account.password_hash.clone()).await? {
            tracing::warn!(account_id = account.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        let session = Self::open_session(store, &account, session_ttl).await?;
        let pharmacy = if account.is_pharmacy {
            store.pharmacy_by_account(account.id).await?
        } else {
            None
        };
        Ok(AuthResponse {
            token: session.token,
            expires_at: session.expires_at,
            account,
            pharmacy,
        })
    }

    pub async fn logout(store: &dyn Store, token: &str) -> Result<(), AppError> {
        store.delete_session(token).await?;
        Ok(())
    }

    async fn open_session(store: &dyn Store, account: &Account, ttl: Duration) -> Result<Session, AppError> {
        let now = Utc::now();
        let session = Session {
            token: new_session_token(),
            account_id: account.id,
            created_at: now,
            expires_at: session_expiry(now, ttl)?,
        };
        store.create_session(session.clone()).await?;
        Ok(session)
    }
}

/// `now + ttl`, or an internal error when the sum leaves chrono's range.
fn session_expiry(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AppError> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("session ttl of {}s is out of range", ttl.as_secs())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InventoryFilter, NewMedicine, Page};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    const TTL: Duration = Duration::from_secs(3600);

    fn request(username: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            name: String::new(),
            phone_number: String::new(),
            address: String::new(),
            location: String::new(),
            is_pharmacy: false,
            is_smartphone_user: true,
            password: password.into(),
            password_confirm: confirm.into(),
            store_name: None,
            license_number: None,
        }
    }

    #[test]
    fn session_expiry_rejects_out_of_range_ttl() {
        let now = Utc::now();
        assert_eq!(session_expiry(now, TTL).unwrap(), now + chrono::Duration::hours(1));
        assert!(matches!(
            session_expiry(now, Duration::from_secs(36_000_000_000_000)),
            Err(AppError::Internal(_))
        ));
        assert!(session_expiry(now, Duration::from_secs(u64::MAX)).is_err());
    }

    #[tokio::test]
    async fn mismatched_passwords_create_nothing() {
        let store = MemoryStore::new();
        let err = AccountService::register(&store, TTL, request("bob", "password-1", "password-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.account_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pharmacy_registration_creates_coverage_rows() {
        let store = MemoryStore::new();
        for name in ["Aspirin", "Ibuprofen"] {
            store
                .create_medicine(NewMedicine {
                    name: name.into(),
                    brand: String::new(),
                    category: String::new(),
                    description: String::new(),
                    price: Some(Decimal::ONE),
                    alternative_medicine_ids: Vec::new(),
                })
                .await
                .unwrap();
        }
        let mut req = request("pharm", "password-1", "password-1");
        req.is_pharmacy = true;
        req.store_name = Some("A".into());
        req.license_number = Some("LIC-9".into());

        let out = AccountService::register(&store, TTL, req).await.unwrap();
        let pharmacy = out.pharmacy.expect("pharmacy created");
        assert_eq!(pharmacy.account_id, out.account.id);
        let rows = store
            .list_inventory(InventoryFilter { pharmacy_id: Some(pharmacy.id), medicine_id: None }, Page::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.quantity == 0));
    }

    #[tokio::test]
    async fn login_checks_password_and_opens_session() {
        let store = MemoryStore::new();
        AccountService::register(&store, TTL, request("carol", "password-1", "password-1"))
            .await
            .unwrap();

        let bad = LoginRequest { username: "carol".into(), password: "nope-nope".into() };
        assert!(matches!(
            AccountService::login(&store, TTL, bad).await.unwrap_err(),
            AppError::InvalidCredentials
        ));
        let unknown = LoginRequest { username: "nobody".into(), password: "password-1".into() };
        assert!(matches!(
            AccountService::login(&store, TTL, unknown).await.unwrap_err(),
            AppError::InvalidCredentials
        ));

        let good = LoginRequest { username: "carol".into(), password: "password-1".into() };
        let out = AccountService::login(&store, TTL, good).await.unwrap();
        let who = store.session_account(&out.token, Utc::now()).await.unwrap().unwrap();
        assert_eq!(who.username, "carol");

        AccountService::logout(&store, &out.token).await.unwrap();
        assert!(store.session_account(&out.token, Utc::now()).await.unwrap().is_none());
    }
}
