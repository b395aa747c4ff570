// src/services/login_limiter.rs

//! Limite de tentativas de login por (IP, e-mail) dentro de uma janela.
//! Os contadores moram no Postgres; aqui ficam só as regras.

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};

use crate::db::login_attempt_repo::LoginAttempt;

#[derive(Debug, Clone, Copy)]
pub struct LoginLimiter {
    pub max_attempts: u32,
    pub window: Duration,
}

impl LoginLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self { max_attempts, window }
    }

    /// Chave do contador: IP + e-mail normalizado.
    pub fn identity(ip: Option<IpAddr>, email: &str) -> String {
        let ip = ip.map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".to_string());
        format!("{}|{}", ip, email.trim().to_lowercase())
    }

    /// Janelas iniciadas antes deste instante já venceram.
    pub fn window_expired_before(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    pub fn is_locked(&self, attempt: Option<&LoginAttempt>, now: DateTime<Utc>) -> bool {
        match attempt {
            Some(a) => {
                a.window_started_at >= self.window_expired_before(now)
                    && a.attempts.max(0) as u32 >= self.max_attempts
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn limiter() -> LoginLimiter {
        LoginLimiter::new(5, Duration::minutes(15))
    }

    #[test]
    fn identity_normalizes_email() {
        let ip = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));

        assert_eq!(LoginLimiter::identity(ip, " Ravi@Example.COM "), "10.0.0.7|ravi@example.com");
        assert_eq!(LoginLimiter::identity(None, "a@b.c"), "unknown|a@b.c");
    }

    #[test]
    fn unlocked_without_history() {
        assert!(!limiter().is_locked(None, Utc::now()));
    }

    #[test]
    fn locked_at_max_attempts_inside_window() {
        let now = Utc::now();
        let attempt = LoginAttempt { attempts: 5, window_started_at: now - Duration::minutes(3) };

        assert!(limiter().is_locked(Some(&attempt), now));
    }

    #[test]
    fn below_max_is_not_locked() {
        let now = Utc::now();
        let attempt = LoginAttempt { attempts: 4, window_started_at: now - Duration::minutes(3) };

        assert!(!limiter().is_locked(Some(&attempt), now));
    }

    #[test]
    fn expired_window_unlocks() {
        let now = Utc::now();
        let attempt = LoginAttempt { attempts: 50, window_started_at: now - Duration::minutes(16) };

        assert!(!limiter().is_locked(Some(&attempt), now));
    }
}
