// ── Command gateway ──
//
// Entry point for every inbound command: parse, authorize, run the
// device calls under one session, render. `handle` always produces
// exactly one reply; handler errors become formatted text and a panic
// inside a handler is caught and answered with a generic failure.

use std::panic::AssertUnwindSafe;

use chrono::Utc;
use futures_util::FutureExt;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::access::AccessGate;
use crate::aggregate;
use crate::command::{Command, parse};
use crate::config::{FirewallConfig, GatewayConfig, RankSide};
use crate::device::{Connector, RouterOsConnector};
use crate::error::{CoreError, ValidationError};
use crate::format::is_valid_ipv4;
use crate::keyboard::KeyboardLayout;
use crate::model::SystemResource;
use crate::ranking::TOP_LIMIT;
use crate::report::{
    BLOCK_USAGE, GENERIC_FAILURE, TERMINAL_USAGE, UNBLOCK_USAGE, render_devices, render_error,
    render_firewall, render_help, render_logs, render_speed, render_status,
    render_terminal_error, render_top, render_traffic,
};
use crate::session::SessionManager;
use crate::terminal::{TerminalQuery, render_records};

/// Outbound reply for one inbound command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub caller_id: i64,
    pub text: String,
    pub keyboard: KeyboardLayout,
}

pub struct Gateway<C: Connector> {
    sessions: SessionManager<C>,
    access: AccessGate,
    firewall: FirewallConfig,
    rank_side: RankSide,
}

impl Gateway<RouterOsConnector> {
    /// Gateway for a real RouterOS device. Nothing connects until the
    /// first command needs the device.
    pub fn for_router(config: &GatewayConfig) -> Self {
        Self::new(RouterOsConnector::new(config.router.clone()), config)
    }
}

impl<C: Connector> Gateway<C> {
    pub fn new(connector: C, config: &GatewayConfig) -> Self {
        Self {
            sessions: SessionManager::new(
                connector,
                config.router.connect_attempts,
                config.router.retry_delay,
            ),
            access: AccessGate::new(&config.access),
            firewall: config.firewall.clone(),
            rank_side: config.rank_side,
        }
    }

    pub fn sessions(&self) -> &SessionManager<C> {
        &self.sessions
    }

    /// Handle one inbound command and produce its reply.
    pub async fn handle(&self, caller_id: i64, text: &str) -> Reply {
        info!(caller_id, text, "inbound command");

        let command = parse(text);
        let keyboard = KeyboardLayout::for_caller(self.access.is_admin(caller_id));

        let outcome = AssertUnwindSafe(self.execute(caller_id, &command))
            .catch_unwind()
            .await;

        let text = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                match &err {
                    CoreError::Authorization | CoreError::Validation(_) | CoreError::NotFound { .. } => {
                        info!(caller_id, command = command.name(), error = %err, "command refused");
                    }
                    _ => error!(caller_id, command = command.name(), error = %err, "command failed"),
                }
                match command {
                    Command::Terminal(_) => render_terminal_error(&err),
                    _ => render_error(&err),
                }
            }
            Err(_) => {
                error!(caller_id, command = command.name(), "command handler panicked");
                GENERIC_FAILURE.into()
            }
        };

        Reply {
            caller_id,
            text,
            keyboard,
        }
    }

    /// Run a parsed command. Privileged commands check the admin gate
    /// before the session is acquired, so a refused caller causes no
    /// device traffic at all.
    pub async fn execute(&self, caller_id: i64, command: &Command) -> Result<String, CoreError> {
        // Terminal input is checked ahead of the gate: a dangerous command
        // gets the same refusal from every caller.
        if let Command::Terminal(input) = command {
            TerminalQuery::parse(input).inspect_err(|e| {
                if *e == ValidationError::DangerousCommand {
                    warn!(caller_id, input = %input, "blocked dangerous terminal command");
                }
            })?;
        }
        if command.is_privileged() {
            self.access.require_admin(caller_id)?;
        }

        match command {
            Command::Help => Ok(render_help(self.access.is_admin(caller_id))),
            Command::TerminalUsage => Ok(TERMINAL_USAGE.into()),
            Command::BlockUsage => Ok(BLOCK_USAGE.into()),
            Command::UnblockUsage => Ok(UNBLOCK_USAGE.into()),

            Command::Speed => {
                let mut session = self.sessions.acquire().await?;
                let (queues, names) = aggregate::named_queues(&mut session).await?;
                Ok(render_speed(&queues, &names))
            }
            Command::Top => {
                let mut session = self.sessions.acquire().await?;
                let ranked = aggregate::top_consumers(&mut session, self.rank_side, TOP_LIMIT).await?;
                Ok(render_top(&ranked))
            }
            Command::Devices => {
                let mut session = self.sessions.acquire().await?;
                Ok(render_devices(&aggregate::leases(&mut session).await?))
            }
            Command::Status => Ok(render_status(&self.system_resource().await?)),
            Command::Traffic => {
                let mut session = self.sessions.acquire().await?;
                Ok(render_traffic(&aggregate::interfaces(&mut session).await?))
            }
            Command::Logs => {
                let mut session = self.sessions.acquire().await?;
                Ok(render_logs(&aggregate::logs(&mut session).await?))
            }

            Command::Firewall => {
                let mut session = self.sessions.acquire().await?;
                Ok(render_firewall(&aggregate::filter_rules(&mut session).await?))
            }
            Command::Backup => {
                let name = format!("bot-{}", Utc::now().timestamp());
                let mut session = self.sessions.acquire().await?;
                aggregate::save_backup(&mut session, &name).await?;
                warn!(caller_id, backup = %name, "backup created");
                Ok(format!("✅ Backup: {name}.backup"))
            }
            Command::Block(address) => {
                validate_ip(address)?;
                let mut session = self.sessions.acquire().await?;
                aggregate::add_to_address_list(&mut session, &self.firewall, address).await?;
                warn!(caller_id, address = %address, list = %self.firewall.block_list, "address blocked");
                Ok(format!("🚫 Blocked {address}"))
            }
            Command::Unblock(address) => {
                validate_ip(address)?;
                let mut session = self.sessions.acquire().await?;
                let removed =
                    aggregate::unblock_address(&mut session, &self.firewall, address).await?;
                warn!(caller_id, address = %address, removed, "address unblocked");
                Ok(format!("✅ Unblocked {address}"))
            }
            Command::Terminal(input) => {
                let query = TerminalQuery::parse(input)?;
                let mut session = self.sessions.acquire().await?;
                let records = session.call(&query.path, &query.action, &[]).await?;
                Ok(render_records(&query.path, &records))
            }
        }
    }

    /// Read `/system/resource`. Also serves as a connectivity probe.
    pub async fn system_resource(&self) -> Result<SystemResource, CoreError> {
        let mut session = self.sessions.acquire().await?;
        aggregate::system_resource(&mut session).await
    }
}

fn validate_ip(input: &str) -> Result<(), ValidationError> {
    if is_valid_ipv4(input) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIp {
            input: input.to_owned(),
        })
    }
}
