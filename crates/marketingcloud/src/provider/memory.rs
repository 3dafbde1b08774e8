//! In-memory provider implementation
//!
//! Simulates the vendor SDK for tests and host harnesses. Records are kept
//! in the loose native shape (JSON objects with `0`/`1` or boolean flags) so
//! the facade's normalization runs against realistic input.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{
    HandshakeStatus, NotificationPayload, PushConfig, PushProvider, REFRESH_COOLDOWN_SECS,
    VendorLogLevel, cooldown_elapsed,
};
use crate::init::PendingNavigation;
use crate::inbox::coerce_flag;
use crate::models::{MessageId, ProfileAttributes};

struct SimState {
    default_outcome: HandshakeStatus,
    scripted: VecDeque<(Duration, HandshakeStatus)>,
    config: Option<PushConfig>,
    configure_calls: usize,
    registration_requests: usize,
    device_token: Option<String>,
    profile_id: Option<String>,
    attributes: ProfileAttributes,
    push_enabled: bool,
    log_level: VendorLogLevel,
    records: Vec<Value>,
    last_refresh: Option<chrono::DateTime<Utc>>,
    refreshes: usize,
    notifications: Vec<NotificationPayload>,
    housed: Vec<PendingNavigation>,
}

/// Vendor SDK stand-in backed by a mutex-protected state
pub struct InMemoryProvider {
    state: Mutex<SimState>,
}

impl InMemoryProvider {
    /// Provider whose handshakes succeed immediately
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                default_outcome: HandshakeStatus::Success,
                scripted: VecDeque::new(),
                config: None,
                configure_calls: 0,
                registration_requests: 0,
                device_token: None,
                profile_id: None,
                attributes: ProfileAttributes::new(),
                push_enabled: true,
                log_level: VendorLogLevel::Warn,
                records: Vec::new(),
                last_refresh: None,
                refreshes: 0,
                notifications: Vec::new(),
                housed: Vec::new(),
            }),
        }
    }

    /// Verdict for handshakes that were not scripted
    pub fn with_outcome(self, outcome: HandshakeStatus) -> Self {
        self.lock().default_outcome = outcome;
        self
    }

    /// Seed the inbox with native records
    pub fn with_records(self, records: Vec<Value>) -> Self {
        self.lock().records = records;
        self
    }

    pub fn with_device_token(self, token: impl Into<String>) -> Self {
        self.lock().device_token = Some(token.into());
        self
    }

    /// Queue the verdict and latency of the next unscripted handshake
    pub fn script_handshake(&self, delay: Duration, outcome: HandshakeStatus) {
        self.lock().scripted.push_back((delay, outcome));
    }

    pub fn set_outcome(&self, outcome: HandshakeStatus) {
        self.lock().default_outcome = outcome;
    }

    // === Inspection ===

    pub fn configured(&self) -> Option<PushConfig> {
        self.lock().config.clone()
    }

    pub fn configure_calls(&self) -> usize {
        self.lock().configure_calls
    }

    pub fn registration_requests(&self) -> usize {
        self.lock().registration_requests
    }

    pub fn profile_attributes(&self) -> ProfileAttributes {
        self.lock().attributes.clone()
    }

    pub fn log_level(&self) -> VendorLogLevel {
        self.lock().log_level
    }

    pub fn notifications(&self) -> Vec<NotificationPayload> {
        self.lock().notifications.clone()
    }

    pub fn refreshes(&self) -> usize {
        self.lock().refreshes
    }

    /// Simulate the user opening a notification
    ///
    /// Resolves the URL through the configured intent resolver and houses the
    /// result. Returns `None` before the first handshake.
    pub fn open_notification(&self, url: Option<&str>) -> Option<PendingNavigation> {
        let resolver = self.lock().config.as_ref()?.intent_resolver.clone();
        let pending = resolver.resolve(url);
        self.lock().housed.push(pending.clone());
        Some(pending)
    }

    /// Drain the navigation actions waiting to be triggered
    pub fn take_housed_navigations(&self) -> Vec<PendingNavigation> {
        std::mem::take(&mut self.lock().housed)
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_record(&self, id: &MessageId, field: &str) -> bool {
        let mut state = self.lock();
        let record = state
            .records
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|obj| record_id(obj.get("id")).as_deref() == Some(id.as_str()));

        match record {
            Some(obj) => {
                obj.insert(field.to_string(), Value::Bool(true));
                true
            }
            None => false,
        }
    }

    fn update_all(&self, field: &str) -> bool {
        let mut state = self.lock();
        for obj in state.records.iter_mut().filter_map(Value::as_object_mut) {
            obj.insert(field.to_string(), Value::Bool(true));
        }
        true
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushProvider for InMemoryProvider {
    async fn configure(&self, config: PushConfig) -> HandshakeStatus {
        let (delay, outcome) = {
            let mut state = self.lock();
            state.configure_calls += 1;
            state.config = Some(config);
            state
                .scripted
                .pop_front()
                .unwrap_or((Duration::ZERO, state.default_outcome))
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        debug!("Simulated handshake finished with {:?}", outcome);
        outcome
    }

    async fn request_device_registration(&self) {
        let mut state = self.lock();
        state.registration_requests += 1;
        if state.device_token.is_none() {
            state.device_token = Some(format!("sim-{:08x}", state.registration_requests));
        }
    }

    async fn set_device_token(&self, token: Vec<u8>) {
        let hex: String = token.iter().map(|b| format!("{b:02x}")).collect();
        self.lock().device_token = Some(hex);
    }

    async fn process_notification(&self, payload: NotificationPayload) {
        let mut state = self.lock();

        if let Some(id) = payload.message_id() {
            let known = state
                .records
                .iter()
                .any(|r| record_id(r.get("id")).as_deref() == Some(id));
            if !known {
                let now = Utc::now().timestamp_millis();
                info!("Notification {} added to the inbox", id);
                state.records.push(json!({
                    "id": id,
                    "subject": payload.alert().unwrap_or_default(),
                    "url": payload.url(),
                    "read": 0,
                    "deleted": 0,
                    "sendDateEpoch": now,
                    "startDateEpoch": now,
                    "endDateEpoch": null,
                }));
            }
        }

        state.notifications.push(payload);
    }

    async fn set_log_level(&self, level: VendorLogLevel) {
        self.lock().log_level = level;
    }

    async fn device_token(&self) -> Option<String> {
        self.lock().device_token.clone()
    }

    async fn profile_id(&self) -> Option<String> {
        self.lock().profile_id.clone()
    }

    async fn set_profile_id(&self, profile_id: String) {
        self.lock().profile_id = Some(profile_id);
    }

    async fn set_profile_attributes(&self, attributes: ProfileAttributes) {
        self.lock().attributes.merge(attributes);
    }

    async fn is_push_enabled(&self) -> bool {
        self.lock().push_enabled
    }

    async fn set_push_enabled(&self, enabled: bool) {
        self.lock().push_enabled = enabled;
    }

    async fn messages(&self) -> Vec<Value> {
        self.lock().records.clone()
    }

    async fn message_count(&self) -> u32 {
        let state = self.lock();
        state
            .records
            .iter()
            .filter(|r| !coerce_flag(r.get("deleted")))
            .count() as u32
    }

    async fn unread_message_count(&self) -> u32 {
        let state = self.lock();
        state
            .records
            .iter()
            .filter(|r| !coerce_flag(r.get("deleted")) && !coerce_flag(r.get("read")))
            .count() as u32
    }

    async fn mark_message_deleted(&self, id: &MessageId) -> bool {
        self.update_record(id, "deleted")
    }

    async fn mark_message_read(&self, id: &MessageId) -> bool {
        self.update_record(id, "read")
    }

    async fn mark_all_messages_deleted(&self) -> bool {
        self.update_all("deleted")
    }

    async fn mark_all_messages_read(&self) -> bool {
        self.update_all("read")
    }

    async fn refresh_messages(&self) -> bool {
        let mut state = self.lock();
        let now = Utc::now();
        if !cooldown_elapsed(state.last_refresh, now, REFRESH_COOLDOWN_SECS) {
            debug!("Inbox refresh throttled");
            return false;
        }
        state.last_refresh = Some(now);
        state.refreshes += 1;
        true
    }
}

fn record_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
