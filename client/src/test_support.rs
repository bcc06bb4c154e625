//! In-process stand-in for the backend, shared by the flow tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

use crate::api::{
    ApiError, ApiResult, AuthApi, LoginRequest, LoginResponse, Role, UserInfo, VerifyResponse,
};

struct Account {
    password: String,
    user_info: UserInfo,
}

pub struct FakeAuthApi {
    accounts: HashMap<String, Account>,
    /// token -> (user id, role)
    valid_tokens: Mutex<HashMap<String, (String, Role)>>,
    available: AtomicBool,
    latency: Duration,
    gate: Option<Arc<Notify>>,
    pub login_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            valid_tokens: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            latency: Duration::ZERO,
            gate: None,
            login_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
        }
    }

    /// Knows `alice_99` / `correctpass1`, a client with id `u1`.
    pub fn with_alice() -> Self {
        Self::new().account("alice_99", "correctpass1", alice())
    }

    pub fn account(mut self, username: &str, password: &str, user_info: UserInfo) -> Self {
        self.accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                user_info,
            },
        );
        self
    }

    pub fn accept_token(self, token: &str, user_id: &str, role: Role) -> Self {
        self.valid_tokens
            .lock()
            .insert(token.to_string(), (user_id.to_string(), role));
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every call waits for a permit on `gate` before answering.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn verifications(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> ApiResult<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(ApiError::Server {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;

        match self.accounts.get(&request.username) {
            Some(account) if account.password == request.password => {
                let token = format!("token-{}", account.user_info.id);
                self.valid_tokens.lock().insert(
                    token.clone(),
                    (account.user_info.id.clone(), account.user_info.role),
                );
                Ok(LoginResponse {
                    status: 200,
                    msg: "Logged in successfully".to_string(),
                    token: Some(token),
                    user_info: Some(account.user_info.clone()),
                })
            }
            _ => Ok(LoginResponse {
                status: 401,
                msg: "Invalid username or password".to_string(),
                token: None,
                user_info: None,
            }),
        }
    }

    async fn verify(&self, token: &str) -> ApiResult<VerifyResponse> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;

        Ok(match self.valid_tokens.lock().get(token) {
            Some((user_id, role)) => VerifyResponse {
                valid: true,
                user_id: Some(user_id.clone()),
                role: Some(*role),
            },
            None => VerifyResponse {
                valid: false,
                user_id: None,
                role: None,
            },
        })
    }
}

pub fn alice() -> UserInfo {
    UserInfo {
        id: "u1".to_string(),
        username: "alice_99".to_string(),
        role: Role::Client,
        profile_id: None,
        image: Some("alice.png".to_string()),
    }
}
