//! Background job plumbing for the controller.
//!
//! Every network call runs on its own worker thread and reports back
//! through one mpsc channel that the controller drains once per frame.
//! The UI thread never blocks on the network.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use crate::api::{ApiClient, ApiError, Lead, Run, ScanConfig, ScanTarget, Stats, StatusSnapshot};

type TryRecvError = std::sync::mpsc::TryRecvError;

pub(crate) enum JobMessage {
    StatusFetched {
        result: Result<StatusSnapshot, ApiError>,
    },
    /// Stats and runs are fetched together on the dashboard cadence.
    /// `epoch` identifies the page mount that issued the request so
    /// results arriving after the operator navigated away are dropped.
    OverviewFetched {
        epoch: u64,
        result: Result<(Stats, Vec<Run>), ApiError>,
    },
    LeadsFetched {
        generation: u64,
        result: Result<Vec<Lead>, ApiError>,
    },
    ConfigLoaded {
        epoch: u64,
        result: Result<ScanConfig, ApiError>,
    },
    ConfigSaved {
        result: Result<(), ApiError>,
    },
    ScanStarted {
        result: Result<(), ApiError>,
    },
    ScanStopped {
        result: Result<(), ApiError>,
    },
    DatabaseCleared {
        result: Result<(), ApiError>,
    },
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    pub(super) overview_in_flight: bool,
    pub(super) leads_in_flight: bool,
    pub(super) config_load_in_flight: bool,
    pub(super) config_save_in_flight: bool,
    pub(super) scan_request_in_flight: bool,
    pub(super) stop_in_flight: bool,
    pub(super) clear_in_flight: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            overview_in_flight: false,
            leads_in_flight: false,
            config_load_in_flight: false,
            config_save_in_flight: false,
            scan_request_in_flight: false,
            stop_in_flight: false,
            clear_in_flight: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    /// Status polling concurrency is owned by the controller's
    /// `PollSchedule`, so no in-flight flag lives here.
    pub(super) fn begin_status_poll(&self, client: ApiClient) {
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client.get_status();
            let _ = tx.send(JobMessage::StatusFetched { result });
        });
    }

    pub(super) fn begin_overview_fetch(&mut self, client: ApiClient, epoch: u64, runs_limit: usize) {
        if self.overview_in_flight {
            return;
        }
        self.overview_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client
                .get_stats()
                .and_then(|stats| client.get_runs(runs_limit).map(|runs| (stats, runs)));
            let _ = tx.send(JobMessage::OverviewFetched { epoch, result });
        });
    }

    pub(super) fn clear_overview_fetch(&mut self) {
        self.overview_in_flight = false;
    }

    pub(super) fn begin_leads_fetch(&mut self, client: ApiClient, generation: u64, limit: usize) {
        self.leads_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client.get_leads(limit);
            let _ = tx.send(JobMessage::LeadsFetched { generation, result });
        });
    }

    pub(super) fn clear_leads_fetch(&mut self) {
        self.leads_in_flight = false;
    }

    pub(super) fn begin_config_load(&mut self, client: ApiClient, epoch: u64) {
        if self.config_load_in_flight {
            return;
        }
        self.config_load_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client.get_config();
            let _ = tx.send(JobMessage::ConfigLoaded { epoch, result });
        });
    }

    pub(super) fn clear_config_load(&mut self) {
        self.config_load_in_flight = false;
    }

    pub(super) fn begin_config_save(&mut self, client: ApiClient, config: ScanConfig) {
        if self.config_save_in_flight {
            return;
        }
        self.config_save_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client.save_config(&config);
            let _ = tx.send(JobMessage::ConfigSaved { result });
        });
    }

    pub(super) fn clear_config_save(&mut self) {
        self.config_save_in_flight = false;
    }

    pub(super) fn begin_scan_start(
        &mut self,
        client: ApiClient,
        target: ScanTarget,
        auto_days: Option<u32>,
    ) {
        if self.scan_request_in_flight {
            return;
        }
        self.scan_request_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = match auto_days {
                Some(days) => client.start_auto_scan(&target, days),
                None => client.start_single_scan(&target),
            };
            let _ = tx.send(JobMessage::ScanStarted { result });
        });
    }

    pub(super) fn clear_scan_start(&mut self) {
        self.scan_request_in_flight = false;
    }

    pub(super) fn begin_scan_stop(&mut self, client: ApiClient) {
        if self.stop_in_flight {
            return;
        }
        self.stop_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client.stop_scan();
            let _ = tx.send(JobMessage::ScanStopped { result });
        });
    }

    pub(super) fn clear_scan_stop(&mut self) {
        self.stop_in_flight = false;
    }

    pub(super) fn begin_database_clear(&mut self, client: ApiClient) {
        if self.clear_in_flight {
            return;
        }
        self.clear_in_flight = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = client.clear_database();
            let _ = tx.send(JobMessage::DatabaseCleared { result });
        });
    }

    pub(super) fn clear_database_clear(&mut self) {
        self.clear_in_flight = false;
    }
}
