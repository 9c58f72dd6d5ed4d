use std::fmt;
use std::str::FromStr;

use rand::Rng;
use station_types::{Channel, User};

use crate::csv_io::users_to_csv;
use crate::error::ExportError;
use crate::json::{channels_to_json, simulator_users_to_json, users_to_json, world_to_json};

/// The downloadable files the roster can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Users and channels together, for restoring this editor.
    World,
    /// Plain user array, re-importable.
    Users,
    /// User array enriched for the simulator.
    SimulatorUsers,
    Channels,
    Csv,
}

impl ExportKind {
    pub const ALL: [ExportKind; 5] = [
        ExportKind::World,
        ExportKind::Users,
        ExportKind::SimulatorUsers,
        ExportKind::Channels,
        ExportKind::Csv,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::World => "station_v_world.json",
            ExportKind::Users => "station_v_users.json",
            ExportKind::SimulatorUsers => "users.json",
            ExportKind::Channels => "station_v_channels.json",
            ExportKind::Csv => "station_v_users.csv",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExportKind::World => "world",
            ExportKind::Users => "users",
            ExportKind::SimulatorUsers => "users-enriched",
            ExportKind::Channels => "channels",
            ExportKind::Csv => "csv",
        }
    }

    /// Renders the file contents. `rng` only feeds the simulator's presence intervals.
    pub fn render<R: Rng + ?Sized>(
        self,
        users: &[User],
        channels: &[Channel],
        rng: &mut R,
    ) -> Result<String, ExportError> {
        let text = match self {
            ExportKind::World => world_to_json(users, channels)?,
            ExportKind::Users => users_to_json(users)?,
            ExportKind::SimulatorUsers => simulator_users_to_json(users, rng)?,
            ExportKind::Channels => channels_to_json(channels)?,
            ExportKind::Csv => users_to_csv(users)?,
        };
        Ok(text)
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown export kind '{}'", s))
    }
}
