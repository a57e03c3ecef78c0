// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Player state machine and its UI boundary.

pub mod command;
pub mod controller;
pub mod session;
pub mod view;

pub use command::PlayerCommand;
pub use controller::PlaybackController;
pub use session::{PlaybackSession, PlayerState};
pub use view::{format_time, PlayerView};
