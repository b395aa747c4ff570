// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        LedgerRepository, LoginAttemptRepository, PayslipRepository, TaxDocumentRepository, TaxProfileRepository,
        UserRepository,
    },
    services::{
        auth::AuthService,
        dashboard_service::DashboardService,
        ledger_service::LedgerService,
        login_limiter::LoginLimiter,
        payslip_parser::{EmployerRegistry, PayslipParser},
        payslip_service::PayslipService,
        tax_document_service::TaxDocumentService,
        tax_service::TaxService,
    },
};

// Configurações lidas do ambiente (com .env opcional)
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub jwt_ttl_days: i64,
    pub login_max_attempts: u32,
    pub login_window_secs: i64,
    pub known_employers: Vec<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} deve ser definida", key))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            jwt_ttl_days: parse_or(&lookup, "JWT_TTL_DAYS", 7)?,
            login_max_attempts: parse_or(&lookup, "LOGIN_MAX_ATTEMPTS", 5)?,
            login_window_secs: parse_or(&lookup, "LOGIN_WINDOW_SECS", 900)?,
            known_employers: lookup("KNOWN_EMPLOYERS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({:?}): {}", key, raw, e)),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub ledger_service: LedgerService,
    pub payslip_service: PayslipService,
    pub tax_service: TaxService,
    pub tax_document_service: TaxDocumentService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, settings)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, settings: &Settings) -> anyhow::Result<Self> {
        let mut registry = EmployerRegistry::with_defaults()?;
        for employer in &settings.known_employers {
            registry.register(employer)?;
        }
        tracing::info!(employers = registry.len(), "Registro de empregadores carregado");
        let parser = Arc::new(PayslipParser::new(registry)?);

        let limiter = LoginLimiter::new(
            settings.login_max_attempts,
            chrono::Duration::seconds(settings.login_window_secs),
        );
        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            LoginAttemptRepository::new(db_pool.clone()),
            limiter,
            settings.jwt_secret.clone(),
            chrono::Duration::days(settings.jwt_ttl_days),
        );

        let ledger_service = LedgerService::new(LedgerRepository::new(db_pool.clone()));
        let payslip_service = PayslipService::new(PayslipRepository::new(db_pool.clone()), parser);
        let tax_service = TaxService::new(TaxProfileRepository::new(db_pool.clone()), ledger_service.clone());
        let tax_document_service = TaxDocumentService::new(TaxDocumentRepository::new(db_pool.clone()));
        let dashboard_service = DashboardService::new(ledger_service.clone());

        Ok(Self {
            db_pool,
            auth_service,
            ledger_service,
            payslip_service,
            tax_service,
            tax_document_service,
            dashboard_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_keys() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/taxbot"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.jwt_ttl_days, 7);
        assert_eq!(settings.login_max_attempts, 5);
        assert_eq!(settings.login_window_secs, 900);
        assert!(settings.known_employers.is_empty());
    }

    #[test]
    fn overrides_and_employer_list_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/taxbot"),
            ("JWT_SECRET", "s3cr3t"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("LOGIN_MAX_ATTEMPTS", "3"),
            ("KNOWN_EMPLOYERS", "Acme Widgets, ,Globex Corporation"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr.port(), 8080);
        assert_eq!(settings.login_max_attempts, 3);
        assert_eq!(settings.known_employers, vec!["Acme Widgets", "Globex Corporation"]);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/taxbot")])).unwrap_err();

        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn unparsable_number_is_an_error() {
        let result = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/taxbot"),
            ("JWT_SECRET", "s3cr3t"),
            ("DB_MAX_CONNECTIONS", "muitas"),
        ]));

        assert!(result.is_err());
    }
}
