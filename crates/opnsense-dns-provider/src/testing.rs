//! In-memory backend for engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use opnsense_dns_core::{DnsError, HostOverride, HostOverrideBackend, HostOverrideRow, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(HostOverride),
    Update(String, HostOverride),
    Delete(String),
    Commit,
}

#[derive(Debug, Default)]
struct State {
    rows: Vec<HostOverrideRow>,
    next_id: usize,
    calls: Vec<Call>,
    fail_list: bool,
    fail_create: bool,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn with_rows(rows: impl IntoIterator<Item = HostOverride>) -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            for host in rows {
                state.next_id += 1;
                let id = format!("u-{}", state.next_id);
                state.rows.push(HostOverrideRow::new(id, host));
            }
        }
        backend
    }

    pub fn rows(&self) -> Vec<HostOverrideRow> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than `List`
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| *c != Call::List).collect()
    }

    pub fn fail_list(&self) {
        self.state.lock().unwrap().fail_list = true;
    }

    pub fn fail_create(&self) {
        self.state.lock().unwrap().fail_create = true;
    }
}

#[async_trait]
impl HostOverrideBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<HostOverrideRow>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);
        if state.fail_list {
            return Err(DnsError::Connection("connection refused".into()));
        }
        Ok(state.rows.clone())
    }

    async fn create(&self, host: &HostOverride) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(host.clone()));
        if state.fail_create {
            return Err(DnsError::Api {
                code: 500,
                message: "internal error".into(),
            });
        }
        state.next_id += 1;
        let id = format!("u-{}", state.next_id);
        state.rows.push(HostOverrideRow::new(id.clone(), host.clone()));
        Ok(id)
    }

    async fn update(&self, id: &str, host: &HostOverride) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update(id.to_string(), host.clone()));
        let row = state
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DnsError::NotFound { resource: id.to_string() })?;
        row.host = host.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(id.to_string()));
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        if state.rows.len() == before {
            return Err(DnsError::NotFound { resource: id.to_string() });
        }
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.state.lock().unwrap().calls.push(Call::Commit);
        Ok(())
    }
}
