use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::{Cmd, LoadRequest, SaveRequest};
use crate::config::VellumConfig;
use crate::dialogs::Dialogs;
use crate::fs_watcher::VaultWatcher;
use crate::gateway;
use crate::messages::{AppMsg, Msg, VaultMsg};
use crate::model::{tree, AppModel};
use crate::update::update;

/// How long `wait_idle` sleeps between checks for finished workers
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Owns the model and executes the commands `update` asks for
pub struct App {
    model: AppModel,
    dialogs: Arc<dyn Dialogs>,
    watcher: Option<VaultWatcher>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Worker threads that have not yet reported back
    in_flight: Arc<AtomicUsize>,
}

impl App {
    pub fn new(config: VellumConfig, dialogs: Arc<dyn Dialogs>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model: AppModel::new(config),
            dialogs,
            watcher: None,
            msg_tx,
            msg_rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Feed a message through `update` and start any resulting work
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
        self.sync_watcher();
    }

    /// Status message produced since the last call, if any
    pub fn take_status(&mut self) -> Option<String> {
        self.model.ui.take_status()
    }

    /// One turn of the loop: apply finished work, react to file changes,
    /// and let autosave check its deadline.
    pub fn tick(&mut self, now: Instant) {
        self.process_async_messages();

        let changed = self
            .watcher
            .as_ref()
            .map(|w| !w.poll_changes().is_empty())
            .unwrap_or(false);
        if changed {
            self.dispatch(Msg::Vault(VaultMsg::Refresh));
        }

        self.dispatch(Msg::tick(now));
    }

    /// Whether every worker has reported back
    pub fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0
    }

    /// Apply results until every worker has finished, or `timeout` passes.
    /// Returns whether the app went idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let processed = self.process_async_messages();
            // Workers send before they count themselves done, so after the
            // counter reaches zero one more drain sees everything
            if self.is_idle() && processed == 0 && self.process_async_messages() == 0 {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match self.msg_rx.recv_timeout(IDLE_POLL.min(deadline - now)) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return self.is_idle(),
            }
        }
    }

    /// Flush a dirty buffer and wait for outstanding writes
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.dispatch(Msg::App(AppMsg::Flush));
        let idle = self.wait_idle(timeout);
        if !idle {
            tracing::warn!("shutting down with work still running");
        }
        idle
    }

    fn process_cmd(&self, cmd: Cmd) {
        match cmd {
            Cmd::ScanVault { root } => {
                self.spawn(move |tx| {
                    let result = tree::scan(&root).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::VaultScanned { root, result }));
                });
            }
            Cmd::LoadDocument(load) => {
                self.spawn(move |tx| run_load(tx, load));
            }
            Cmd::SaveDocument(save) => {
                self.spawn(move |tx| run_save(tx, save));
            }
            Cmd::FlushAndLoad { save, load } => {
                // One worker, so the write lands before the read starts
                self.spawn(move |tx| {
                    run_save(tx, save);
                    run_load(tx, load);
                });
            }
            Cmd::CreateDocument { relative, path } => {
                self.spawn(move |tx| {
                    let result = gateway::create(&path);
                    let _ = tx.send(Msg::App(AppMsg::DocumentCreated {
                        path: relative,
                        result,
                    }));
                });
            }
            Cmd::DeleteDocument { relative, path } => {
                self.spawn(move |tx| {
                    let result = gateway::delete(&path);
                    let _ = tx.send(Msg::App(AppMsg::DocumentDeleted {
                        path: relative,
                        result,
                    }));
                });
            }
            Cmd::ShowOpenFolderDialog => {
                let dialogs = Arc::clone(&self.dialogs);
                self.spawn(move |tx| {
                    let folder = dialogs.pick_folder();
                    let _ = tx.send(Msg::App(AppMsg::OpenFolderDialogResult { folder }));
                });
            }
            Cmd::ShowOpenFileDialog => {
                let dialogs = Arc::clone(&self.dialogs);
                self.spawn(move |tx| {
                    let file = dialogs.pick_markdown_file();
                    let _ = tx.send(Msg::App(AppMsg::OpenFileDialogResult { file }));
                });
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    fn spawn(&self, job: impl FnOnce(&Sender<Msg>) + Send + 'static) {
        let tx = self.msg_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);
        std::thread::spawn(move || {
            job(&tx);
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Apply every result that has arrived. Returns how many there were.
    fn process_async_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            count += 1;
        }
        count
    }

    /// Keep the watcher on the open vault when watching is enabled
    fn sync_watcher(&mut self) {
        if !self.model.config.watch {
            return;
        }
        let Some(root) = self.model.session.vault_root() else {
            self.watcher = None;
            return;
        };
        if self.watcher.as_ref().map(|w| w.root()) == Some(root) {
            return;
        }

        self.watcher = match VaultWatcher::new(root.to_path_buf()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "cannot watch vault");
                None
            }
        };
    }

    /// Root of the active watcher, if watching
    pub fn watched_root(&self) -> Option<&Path> {
        self.watcher.as_ref().map(VaultWatcher::root)
    }
}

fn run_load(tx: &Sender<Msg>, load: LoadRequest) {
    let result = gateway::read(&load.path);
    let _ = tx.send(Msg::App(AppMsg::DocumentLoaded {
        request_id: load.id,
        target: load.target,
        result,
    }));
}

fn run_save(tx: &Sender<Msg>, save: SaveRequest) {
    let result = gateway::write(&save.path, &save.content);
    let _ = tx.send(Msg::App(AppMsg::SaveCompleted {
        target: save.target,
        revision: save.revision,
        result,
    }));
}
