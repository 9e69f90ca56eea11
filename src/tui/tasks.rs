//! Background worker for network lookups
//!
//! The TUI main loop is synchronous. Lookups run on a tokio runtime owned by
//! a worker thread; requests and responses travel over crossbeam channels.
//! Each request is spawned as its own task, so a slow lookup in one tab does
//! not hold up another tab.
//!
//! Every request carries the form [`Ticket`] it was issued for; the UI uses
//! it to drop responses that arrive after the form has moved on.

use crate::config::Config;
use crate::form::Ticket;
use crate::http::HttpClient;
use crate::tools::dns::{self, DnsCheckState};
use crate::tools::tenant::{self, TENANT_LOOKUP_ERROR, TenantLookup};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Messages sent from the TUI to the worker
#[derive(Debug, Clone)]
pub enum TaskRequest {
    LookupTenant { ticket: Ticket, email: String },
    CheckDns { ticket: Ticket, domain: String },
    Shutdown,
}

/// Messages sent from the worker to the TUI
#[derive(Debug, Clone)]
pub enum TaskResponse {
    TenantLookedUp {
        ticket: Ticket,
        outcome: Result<TenantLookup, String>,
    },
    DnsChecked {
        ticket: Ticket,
        domain: String,
        state: DnsCheckState,
    },
    /// Worker is ready
    Ready,
    /// Worker could not start
    Unavailable { message: String },
}

/// Handle for sending tasks to the worker
pub struct TaskSender {
    tx: Sender<TaskRequest>,
}

impl TaskSender {
    pub fn send(
        &self,
        request: TaskRequest,
    ) -> std::result::Result<(), crossbeam_channel::SendError<TaskRequest>> {
        self.tx.send(request)
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(TaskRequest::Shutdown);
    }
}

/// Handle for receiving responses from the worker
pub struct TaskReceiver {
    rx: Receiver<TaskResponse>,
}

impl TaskReceiver {
    /// Try to receive a response without blocking
    pub fn try_recv(&self) -> Option<TaskResponse> {
        self.rx.try_recv().ok()
    }

    /// Drain all available responses
    pub fn drain(&self) -> Vec<TaskResponse> {
        let mut responses = Vec::new();
        while let Some(resp) = self.try_recv() {
            responses.push(resp);
        }
        responses
    }
}

/// The worker-side ends of the task channels
pub struct WorkerEnds {
    pub requests: Receiver<TaskRequest>,
    pub responses: Sender<TaskResponse>,
}

/// Create both halves of the TUI/worker channel pair
pub fn task_channels() -> (TaskSender, TaskReceiver, WorkerEnds) {
    let (request_tx, request_rx) = bounded::<TaskRequest>(32);
    let (response_tx, response_rx) = bounded::<TaskResponse>(64);

    (
        TaskSender { tx: request_tx },
        TaskReceiver { rx: response_rx },
        WorkerEnds {
            requests: request_rx,
            responses: response_tx,
        },
    )
}

/// Spawn the background task worker
pub fn spawn_task_worker(config: Config) -> (TaskSender, TaskReceiver) {
    let (sender, receiver, ends) = task_channels();

    thread::spawn(move || run_worker(config, ends));

    (sender, receiver)
}

fn run_worker(config: Config, ends: WorkerEnds) {
    let WorkerEnds {
        requests,
        responses,
    } = ends;

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            let _ = responses.send(TaskResponse::Unavailable {
                message: format!("Could not start runtime: {}", e),
            });
            return;
        }
    };

    let client = match HttpClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            let _ = responses.send(TaskResponse::Unavailable {
                message: e.to_string(),
            });
            return;
        }
    };
    let config = Arc::new(config);

    let _ = responses.send(TaskResponse::Ready);

    while let Ok(request) = requests.recv() {
        let tx = responses.clone();
        let client = Arc::clone(&client);
        let config = Arc::clone(&config);

        match request {
            TaskRequest::Shutdown => break,
            TaskRequest::LookupTenant { ticket, email } => {
                rt.spawn(async move {
                    let outcome = tenant::lookup_tenant_for_display(
                        client.as_ref(),
                        &config.login_authority,
                        &email,
                    )
                    .await;
                    let _ = tx.send(TaskResponse::TenantLookedUp { ticket, outcome });
                });
            }
            TaskRequest::CheckDns { ticket, domain } => {
                rt.spawn(async move {
                    let state = dns::check_domain(
                        client.as_ref(),
                        &config.doh_endpoint,
                        &config.dkim_selector,
                        &domain,
                    )
                    .await;
                    let _ = tx.send(TaskResponse::DnsChecked {
                        ticket,
                        domain,
                        state,
                    });
                });
            }
        }
    }

    rt.shutdown_timeout(Duration::from_millis(250));
}

/// Fallback outcome when a lookup could not be handed to the worker
pub fn undeliverable_tenant_lookup() -> Result<TenantLookup, String> {
    Err(TENANT_LOOKUP_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::AsyncForm;

    #[test]
    fn test_channels_connect() {
        let (sender, receiver, ends) = task_channels();
        let mut form: AsyncForm<String, TenantLookup> = AsyncForm::new("a@b.com".into());
        let ticket = form.begin().unwrap();

        sender
            .send(TaskRequest::LookupTenant {
                ticket,
                email: "a@b.com".into(),
            })
            .unwrap();
        match ends.requests.try_recv().unwrap() {
            TaskRequest::LookupTenant { email, .. } => assert_eq!(email, "a@b.com"),
            other => panic!("unexpected request {:?}", other),
        }

        ends.responses.send(TaskResponse::Ready).unwrap();
        ends.responses
            .send(TaskResponse::TenantLookedUp {
                ticket,
                outcome: undeliverable_tenant_lookup(),
            })
            .unwrap();

        let drained = receiver.drain();
        assert_eq!(drained.len(), 2);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_worker_stops_on_shutdown() {
        let (sender, receiver) = spawn_task_worker(Config::default());
        sender.shutdown();

        let first = receiver
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker should report readiness");
        assert!(matches!(first, TaskResponse::Ready));
    }
}
