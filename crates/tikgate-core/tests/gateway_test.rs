// Integration tests for the command gateway.
//
// The device is an in-memory table store behind the `Connector` /
// `DeviceLink` traits. Every call is logged so tests can assert exactly
// which requests a command produced (or that it produced none).

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use tikgate_core::command;
use tikgate_core::{
    AccessConfig, ApiError, Connector, DeviceLink, EmptyAdminPolicy, FirewallConfig, Gateway,
    GatewayConfig, KeyboardLayout, RankSide, Record, RouterConfig,
};

const ADMIN: i64 = 1;
const GUEST: i64 = 2;

// ── Fake device ─────────────────────────────────────────────────────

#[derive(Default)]
struct DeviceState {
    tables: HashMap<String, Vec<Record>>,
    traps: HashMap<String, String>,
    calls: Vec<String>,
    next_id: u32,
}

#[derive(Clone, Default)]
struct FakeDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    fn with_table(self, path: &str, rows: &[&[(&str, &str)]]) -> Self {
        let records: Vec<Record> = rows.iter().map(|row| row.iter().copied().collect()).collect();
        self.state.lock().unwrap().tables.insert(path.into(), records);
        self
    }

    fn with_trap(self, path: &str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .traps
            .insert(path.into(), message.into());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn table(&self, path: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

/// Like a real connection, a link stays unhealthy from the start of an
/// exchange until its reply has been read; `/slow` takes 200ms to answer.
struct FakeLink {
    device: FakeDevice,
    in_flight: bool,
}

impl DeviceLink for FakeLink {
    async fn call(
        &mut self,
        path: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Record>, ApiError> {
        self.in_flight = true;
        if path == "/slow" {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        let result = self.answer(path, action, params);
        self.in_flight = false;
        result
    }

    fn is_healthy(&self) -> bool {
        !self.in_flight
    }
}

impl FakeLink {
    fn answer(
        &self,
        path: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Record>, ApiError> {
        assert!(path != "/panic", "simulated handler bug");

        let mut state = self.device.state.lock().unwrap();
        let mut logged = format!("{path}/{action}");
        for (k, v) in params {
            logged.push_str(&format!(" {k}={v}"));
        }
        state.calls.push(logged);

        if let Some(message) = state.traps.get(path) {
            return Err(ApiError::Trap {
                category: None,
                message: message.clone(),
            });
        }

        match action {
            "print" => Ok(state.tables.get(path).cloned().unwrap_or_default()),
            "add" => {
                state.next_id += 1;
                let id = format!("*{:X}", state.next_id);
                let mut record: Record = params.iter().copied().collect();
                record.insert(".id", id);
                state.tables.entry(path.into()).or_default().push(record);
                Ok(Vec::new())
            }
            "remove" => {
                let id = params
                    .iter()
                    .find(|(k, _)| *k == ".id")
                    .map(|(_, v)| (*v).to_owned())
                    .unwrap();
                if let Some(rows) = state.tables.get_mut(path) {
                    rows.retain(|r| r.get(".id") != Some(id.as_str()));
                }
                Ok(Vec::new())
            }
            "save" => Ok(Vec::new()),
            other => Err(ApiError::Trap {
                category: None,
                message: format!("no such command: {other}"),
            }),
        }
    }
}

struct FakeConnector {
    device: FakeDevice,
    offline: bool,
    connects: Arc<AtomicUsize>,
}

impl Connector for FakeConnector {
    type Link = FakeLink;

    async fn connect(&self) -> Result<FakeLink, ApiError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(ApiError::Connect {
                addr: "fake:8728".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(FakeLink {
            device: self.device.clone(),
            in_flight: false,
        })
    }

    fn describe(&self) -> String {
        "fake".into()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn config(admins: &[i64], empty_policy: EmptyAdminPolicy) -> GatewayConfig {
    GatewayConfig {
        router: RouterConfig {
            connect_attempts: 2,
            retry_delay: Duration::from_millis(1),
            ..RouterConfig::default()
        },
        access: AccessConfig {
            admin_ids: admins.iter().copied().collect::<BTreeSet<_>>(),
            empty_policy,
        },
        firewall: FirewallConfig::default(),
        rank_side: RankSide::Download,
    }
}

struct Harness {
    gateway: Gateway<FakeConnector>,
    device: FakeDevice,
    connects: Arc<AtomicUsize>,
}

impl Harness {
    fn new(device: FakeDevice) -> Self {
        Self::with_config(device, false, &config(&[ADMIN], EmptyAdminPolicy::Nobody))
    }

    fn with_config(device: FakeDevice, offline: bool, config: &GatewayConfig) -> Self {
        let connects = Arc::new(AtomicUsize::new(0));
        let connector = FakeConnector {
            device: device.clone(),
            offline,
            connects: Arc::clone(&connects),
        };
        Self {
            gateway: Gateway::new(connector, config),
            device,
            connects,
        }
    }

    async fn send(&self, caller_id: i64, text: &str) -> String {
        let reply = self.gateway.handle(caller_id, text).await;
        assert_eq!(reply.caller_id, caller_id);
        reply.text
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

// ── Read-only commands ──────────────────────────────────────────────

#[tokio::test]
async fn speed_uses_lease_names_for_queue_targets() {
    let device = FakeDevice::default()
        .with_table(
            "/ip/dhcp-server/lease",
            &[
                &[("address", "10.0.0.2"), ("host-name", "android-1"), ("comment", "Kitchen TV")],
                &[("address", "10.0.0.3"), ("host-name", "")],
            ],
        )
        .with_table(
            "/queue/simple",
            &[
                &[("name", "q-tv"), ("target", "10.0.0.2/32"), ("rate", "1000/2000000")],
                &[("name", "guest"), ("target", "10.0.0.3/32")],
            ],
        );
    let h = Harness::new(device);

    let text = h.send(GUEST, "📊 Speed").await;
    assert_eq!(
        text,
        "📊 Current Bandwidth:\n\n\
         1. Kitchen TV: ↑1.0 Kbps ↓2.0 Mbps\n\
         2. guest: ?\n"
    );
    assert_eq!(
        h.device.calls(),
        ["/ip/dhcp-server/lease/print", "/queue/simple/print"]
    );
}

#[tokio::test]
async fn top_ranks_by_download_counter() {
    let device = FakeDevice::default().with_table(
        "/queue/simple",
        &[
            &[("name", "A"), ("bytes", "0/100")],
            &[("name", "B"), ("bytes", "0/200")],
            &[("name", "C"), ("bytes", "0/200")],
            &[("name", "D"), ("bytes", "0/50")],
            &[("name", "E"), ("bytes", "garbage")],
        ],
    );
    let h = Harness::new(device);

    let text = h.send(GUEST, "top5").await;
    let order: Vec<&str> = text
        .lines()
        .skip(2)
        .map(|line| line.split(". ").nth(1).unwrap().split(':').next().unwrap())
        .collect();
    assert_eq!(order, ["B", "C", "A", "D"]);
}

#[tokio::test]
async fn one_session_serves_many_commands() {
    let h = Harness::new(FakeDevice::default());
    for text in ["status", "devices", "logs", "traffic"] {
        h.send(GUEST, text).await;
    }
    assert_eq!(h.connects(), 1);
    assert_eq!(h.device.calls().len(), 4);
}

#[tokio::test]
async fn status_renders_unknowns_for_missing_fields() {
    let device = FakeDevice::default().with_table(
        "/system/resource",
        &[&[("cpu-load", "3"), ("version", "7.14.2 (stable)")]],
    );
    let h = Harness::new(device);
    assert_eq!(
        h.send(GUEST, "STATUS").await,
        "⚙️ Router Status:\n\n\
         CPU: 3%\n\
         Uptime: ?\n\
         Memory: ? free / ?\n\
         Version: 7.14.2 (stable)\n\
         Board: ?\n"
    );
}

// ── Authorization ───────────────────────────────────────────────────

#[tokio::test]
async fn privileged_commands_refuse_guests_without_device_calls() {
    let h = Harness::new(FakeDevice::default());
    for text in ["backup", "🚫 Firewall", "block 10.0.0.9", "unblock 10.0.0.9", "terminal /log"] {
        let reply = h.gateway.handle(GUEST, text).await;
        assert_eq!(reply.text, "🔒 Admin only", "{text}");
        assert_eq!(reply.keyboard, KeyboardLayout::Default);
    }
    assert!(h.device.calls().is_empty());
    assert_eq!(h.connects(), 0);
}

#[tokio::test]
async fn admin_gate_covers_exactly_the_privileged_commands() {
    let h = Harness::new(FakeDevice::default());
    let texts = [
        "speed", "devices", "status", "top5", "traffic", "logs", "help", "backup", "firewall",
        "block 10.0.0.9", "unblock 10.0.0.9", "terminal /log", "terminal", "block",
    ];
    for text in texts {
        let refused = h.send(GUEST, text).await == "🔒 Admin only";
        assert_eq!(refused, command::parse(text).is_privileged(), "{text}");
    }
}

#[tokio::test]
async fn empty_allow_list_follows_pinned_policy() {
    let everyone = Harness::with_config(
        FakeDevice::default(),
        false,
        &config(&[], EmptyAdminPolicy::Everyone),
    );
    let text = everyone.send(12_345, "backup").await;
    assert!(text.starts_with("✅ Backup: bot-"), "{text}");
    assert!(text.ends_with(".backup"));
    let calls = everyone.device.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("/system/backup/save name=bot-"));

    let nobody = Harness::with_config(
        FakeDevice::default(),
        false,
        &config(&[], EmptyAdminPolicy::Nobody),
    );
    assert_eq!(nobody.send(12_345, "backup").await, "🔒 Admin only");
}

#[tokio::test]
async fn help_and_keyboard_follow_privilege() {
    let h = Harness::new(FakeDevice::default());

    let admin = h.gateway.handle(ADMIN, "something unknown").await;
    assert_eq!(admin.keyboard, KeyboardLayout::Admin);
    assert!(admin.text.contains("🔒 Admin:"));

    let guest = h.gateway.handle(GUEST, "/help").await;
    assert_eq!(guest.keyboard, KeyboardLayout::Default);
    assert!(!guest.text.contains("Admin"));
    assert!(h.device.calls().is_empty());
}

// ── Terminal ────────────────────────────────────────────────────────

#[tokio::test]
async fn dangerous_terminal_command_never_reaches_the_device() {
    let h = Harness::new(FakeDevice::default());
    for caller in [ADMIN, GUEST] {
        assert_eq!(
            h.send(caller, "terminal /system reboot").await,
            "🔒 Dangerous command blocked. Use WebFig for system changes."
        );
    }
    assert!(h.device.calls().is_empty());
    assert_eq!(h.connects(), 0);
}

#[tokio::test]
async fn terminal_print_is_dispatched() {
    let device = FakeDevice::default().with_table(
        "/system/resource",
        &[&[(".id", "*0"), ("uptime", "3d4h"), ("cpu-load", "2")]],
    );
    let h = Harness::new(device);

    assert_eq!(
        h.send(ADMIN, "terminal /system/resource print").await,
        "📟 /system/resource\n\n─ Entry 1:\n  uptime: 3d4h\n  cpu-load: 2\n\n"
    );
    assert_eq!(h.device.calls(), ["/system/resource/print"]);
}

#[tokio::test]
async fn terminal_rejects_unrooted_paths_and_other_actions() {
    let h = Harness::new(FakeDevice::default());
    assert!(h.send(ADMIN, "terminal interface").await.starts_with("❌ Command must start with /"));
    assert_eq!(
        h.send(ADMIN, "terminal /interface set").await,
        "❌ Action 'set' not supported. Use: /path/to/resource print"
    );
    assert!(h.device.calls().is_empty());
}

// ── Block / unblock ─────────────────────────────────────────────────

#[tokio::test]
async fn block_validates_before_touching_the_device() {
    let h = Harness::new(FakeDevice::default());
    for bad in ["192.168.1.999", "not-an-ip"] {
        let text = h.send(ADMIN, &format!("block {bad}")).await;
        assert_eq!(
            text,
            format!("❌ Invalid IP '{bad}'. Expected four numbers 0-255, e.g. 192.168.1.100")
        );
    }
    assert!(h.device.calls().is_empty());
}

#[tokio::test]
async fn block_adds_to_the_configured_list() {
    let h = Harness::new(FakeDevice::default());
    assert_eq!(h.send(ADMIN, "Block 10.0.0.9").await, "🚫 Blocked 10.0.0.9");
    assert_eq!(
        h.device.calls(),
        ["/ip/firewall/address-list/add list=blocked address=10.0.0.9 comment=blocked-by-bot"]
    );
    assert_eq!(h.device.table("/ip/firewall/address-list").len(), 1);
}

#[tokio::test]
async fn unblock_removes_every_matching_entry() {
    let device = FakeDevice::default().with_table(
        "/ip/firewall/address-list",
        &[
            &[(".id", "*1"), ("list", "blocked"), ("address", "10.0.0.9")],
            &[(".id", "*2"), ("list", "trusted"), ("address", "10.0.0.9")],
            &[(".id", "*3"), ("list", "blocked"), ("address", "10.0.0.9")],
            &[(".id", "*4"), ("list", "blocked"), ("address", "10.0.0.10")],
        ],
    );
    let h = Harness::new(device);

    assert_eq!(h.send(ADMIN, "unblock 10.0.0.9").await, "✅ Unblocked 10.0.0.9");
    assert_eq!(
        h.device.calls(),
        [
            "/ip/firewall/address-list/print",
            "/ip/firewall/address-list/remove .id=*1",
            "/ip/firewall/address-list/remove .id=*3",
        ]
    );
    let left: Vec<String> = h
        .device
        .table("/ip/firewall/address-list")
        .iter()
        .map(|r| r.get(".id").unwrap().to_owned())
        .collect();
    assert_eq!(left, ["*2", "*4"]);
}

#[tokio::test]
async fn unblock_miss_is_not_found_not_offline() {
    let h = Harness::new(FakeDevice::default());
    let missing = h.send(ADMIN, "unblock 10.0.0.9").await;
    assert_eq!(missing, "❌ 10.0.0.9 not found");

    let offline = Harness::with_config(
        FakeDevice::default(),
        true,
        &config(&[ADMIN], EmptyAdminPolicy::Nobody),
    );
    let unreachable = offline.send(ADMIN, "unblock 10.0.0.9").await;
    assert_eq!(unreachable, "❌ Router offline");
    assert_eq!(offline.connects(), 2);
}

// ── Failure handling ────────────────────────────────────────────────

#[tokio::test]
async fn device_rejection_is_reported_truncated() {
    let device = FakeDevice::default().with_trap("/log", &"no such item ".repeat(20));
    let h = Harness::new(device);

    let text = h.send(GUEST, "logs").await;
    assert!(text.starts_with("❌ Error: no such item"));
    assert_eq!(text.chars().count(), "❌ Error: ".chars().count() + 80);
}

#[tokio::test]
async fn terminal_rejection_uses_command_error_text() {
    let device =
        FakeDevice::default().with_trap("/ip/bogus", &"no such command prefix ".repeat(10));
    let h = Harness::new(device);

    let text = h.send(ADMIN, "terminal /ip/bogus").await;
    assert!(text.starts_with("❌ Command error: no such command prefix"), "{text}");
    assert_eq!(text.chars().count(), "❌ Command error: ".chars().count() + 100);
}

#[tokio::test]
async fn handler_panic_still_produces_one_reply() {
    let h = Harness::new(FakeDevice::default());

    let reply = h.gateway.handle(ADMIN, "terminal /panic").await;
    assert_eq!(reply.text, "❌ Error occurred");
    assert_eq!(reply.keyboard, KeyboardLayout::Admin);

    // The session lock was released during unwinding.
    let text = h.send(GUEST, "traffic").await;
    assert_eq!(text, "📈 No interfaces");
}

#[tokio::test]
async fn abandoned_command_does_not_leak_into_the_next_one() {
    let device = FakeDevice::default().with_table(
        "/slow",
        &[&[("address", "10.0.0.9"), ("list", "blocked")]],
    );
    let h = Harness::new(device);

    let cut_off = tokio::time::timeout(
        Duration::from_millis(50),
        h.gateway.handle(ADMIN, "terminal /slow"),
    )
    .await;
    assert!(cut_off.is_err());

    // The half-finished link is replaced rather than handed to the guest.
    let text = h.send(GUEST, "traffic").await;
    assert_eq!(text, "📈 No interfaces");
    assert_eq!(h.connects(), 2);
    assert_eq!(h.device.calls(), ["/interface/print"]);
}
