// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gixie Lib - A Rust library to control Gixie nixie-style clocks.
//!
//! Gixie clocks expose a small set of registers over a JSON-over-WebSocket
//! command protocol on port 81. This library provides:
//!
//! - **Protocol client**: one short-lived connection per read or write,
//!   with timeouts and a unified error for every failure
//! - **Coordinator**: periodic polling into a cached snapshot, write-then-confirm
//!   mutations, and idempotent timezone / DST reconciliation
//! - **Events**: a broadcast bus reporting every merged change
//!
//! # Supported Registers
//!
//! | Register    | Command | Type                        |
//! |-------------|---------|-----------------------------|
//! | Color       | 9       | [`RgbColor`] (four entries) |
//! | Brightness  | 14      | [`Brightness`]              |
//! | Power       | 15      | [`PowerState`]              |
//! | Timezone    | 16      | [`TimezoneIndex`]           |
//! | Mode        | 211     | [`DisplayMode`]             |
//! | Time format | 213     | [`TimeFormat`]              |
//!
//! # Quick Start
//!
//! ```no_run
//! use gixie_lib::Coordinator;
//! use gixie_lib::types::{DisplayMode, DstPolicy, RgbColor};
//!
//! #[tokio::main]
//! async fn main() -> gixie_lib::Result<()> {
//!     // Loads the initial state and starts polling every 30 s
//!     let coordinator = Coordinator::websocket("192.168.1.60").build().await?;
//!
//!     coordinator
//!         .turn_on(None, Some(RgbColor::new(255, 120, 0)))
//!         .await?;
//!     coordinator.set_mode(DisplayMode::FixedColorClock).await?;
//!
//!     // Standard time UTC+1, daylight saving forced on
//!     coordinator.set_base_timezone(1).await?;
//!     coordinator.set_dst_policy(DstPolicy::On).await?;
//!
//!     println!("{:?}", coordinator.state());
//!     Ok(())
//! }
//! ```
//!
//! ## Watching for Changes
//!
//! ```no_run
//! use gixie_lib::Coordinator;
//! use gixie_lib::event::CoordinatorEvent;
//!
//! # async fn example() -> gixie_lib::Result<()> {
//! let coordinator = Coordinator::websocket("192.168.1.60").build().await?;
//! let mut events = coordinator.subscribe();
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         CoordinatorEvent::StateChanged { new_state, .. } => {
//!             println!("on: {}", new_state.is_on());
//!         }
//!         CoordinatorEvent::RefreshFailed { error } => eprintln!("{error}"),
//!         CoordinatorEvent::AvailabilityChanged { available } => {
//!             println!("available: {available}");
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Raw Register Access
//!
//! ```no_run
//! use gixie_lib::command::{CommandId, WriteCommand};
//! use gixie_lib::protocol::{Protocol, WsClient};
//! use gixie_lib::types::Brightness;
//!
//! # async fn example() -> gixie_lib::Result<()> {
//! let client = WsClient::new("192.168.1.60")?;
//! client.write(&WriteCommand::Brightness(Brightness::new(80))).await?;
//! let raw = client.read(CommandId::Brightness).await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod protocol;
pub mod response;
pub mod state;
pub mod types;

pub use command::{Command, CommandId, OperationKind, ReadCommand, WriteCommand};
pub use coordinator::{Coordinator, CoordinatorBuilder, CoordinatorConfig};
pub use error::{Error, OperationError, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{Protocol, WsClient, WsConfig};
pub use state::{DeviceState, StateChange};
pub use types::{
    Brightness, DisplayMode, DstPolicy, PowerState, RgbColor, TimeFormat, TimezoneIndex,
    UtcOffset,
};
