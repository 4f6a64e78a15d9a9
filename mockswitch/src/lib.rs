//! # Mockswitch
//!
//! In-process fake network switches for integration testing network
//! automation.
//!
//! Mockswitch emulates the interactive CLIs of real vendor switches —
//! Cisco IOS (incl. Catalyst 6500), Brocade, Dell PowerConnect (incl.
//! 10G), HP ProCurve, Juniper JunOS, and Arista EOS — with
//! byte-for-byte fidelity of prompts, banners, error messages, paging,
//! and running-config rendering. Transports (SSH, Telnet, HTTP) stay
//! outside the crate: they hand received lines to a [`engine::ShellSession`]
//! and write whatever comes back to the wire.
//!
//! ## Features
//!
//! - A modal command-processor engine: a stack of vendor shell modes
//!   with unambiguous-prefix dispatch, `| begin/include/exclude` pipe
//!   filters, paging, and password echo control
//! - A typed, lock-guarded switch configuration shared by every session
//!   of one switch (VLANs, ports, LAGs, VRFs, routes, HSRP)
//! - JunOS candidate configs with commit/rollback/compare and a typed
//!   NETCONF adapter; Arista eAPI (`runCmds`) over the same processors
//! - A model registry (`cisco_2960_24TT_L`, `dell10g_generic`, …) and
//!   YAML pre-load documents for boot-time configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mockswitch::core::{Protocol, SwitchCore};
//! use mockswitch::factory::create_switch;
//! use mockswitch::terminal::BufferedTerminal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mockswitch::Error> {
//!     let switch = create_switch("cisco_generic", "my_switch")?;
//!
//!     let mut session = switch
//!         .launch(Protocol::Ssh, Box::new(BufferedTerminal::new()))
//!         .await;
//!     session.open().await;
//!     session.receive("enable").await;
//!     session.receive("").await; // empty enable password
//!     session.receive("configure terminal").await;
//!     session.receive("vlan 123").await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod factory;
pub mod preload;
pub mod terminal;
pub mod tftp;
pub mod vendors;

// Re-export main types for convenience
pub use config::{SharedConfig, SwitchConfiguration};
pub use core::{Protocol, SwitchCore};
pub use engine::{Action, CommandProcessor, ShellSession};
pub use error::Error;
pub use factory::{SwitchFactory, create_switch};
pub use terminal::{BufferedTerminal, EchoMode, TerminalController};
pub use tftp::TftpReader;
