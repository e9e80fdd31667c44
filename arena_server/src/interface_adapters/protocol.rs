// Wire protocol DTOs and conversions for client-facing WebSocket messages.
//
// Both directions use the `{ "type": ..., "data": ... }` envelope.

use crate::domain::{PlayerView, ProjectileView, WorldSnapshot};
use crate::use_cases::Command;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    // Assigned identity, sent once before any world update.
    Welcome(WelcomeDto),
    // Full world snapshot after every mutation and every tick.
    GameState(GameStateDto),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeDto {
    pub player_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateDto {
    pub players: BTreeMap<String, PlayerStateDto>,
    pub projectiles: BTreeMap<String, ProjectileStateDto>,
}

impl From<&WorldSnapshot> for GameStateDto {
    fn from(snapshot: &WorldSnapshot) -> Self {
        Self {
            players: snapshot
                .players
                .iter()
                .map(|(id, p)| (id.clone(), PlayerStateDto::from(p)))
                .collect(),
            projectiles: snapshot
                .projectiles
                .iter()
                .map(|(id, p)| (id.clone(), ProjectileStateDto::from(p)))
                .collect(),
        }
    }
}

/// Flattened player state for wire transmission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub hp: i32,
    pub max_hp: i32,
    pub angle: f64,
}

impl From<&PlayerView> for PlayerStateDto {
    fn from(p: &PlayerView) -> Self {
        Self {
            id: p.id.clone(),
            x: p.x,
            y: p.y,
            color: p.color.to_string(),
            hp: p.hp,
            max_hp: p.max_hp,
            angle: p.angle,
        }
    }
}

/// Flattened projectile state for wire transmission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileStateDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub owner_id: String,
    pub color: String,
}

impl From<&ProjectileView> for ProjectileStateDto {
    fn from(p: &ProjectileView) -> Self {
        Self {
            id: p.id.clone(),
            x: p.x,
            y: p.y,
            vel_x: p.vx,
            vel_y: p.vy,
            owner_id: p.owner_id.clone(),
            color: p.color.to_string(),
        }
    }
}

/// Envelope the client sends over the WebSocket.
///
/// Only the envelope itself must be well formed; `data` is read leniently so a mistyped or
/// missing numeric field becomes zero instead of rejecting the command.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnvelope {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl ClientEnvelope {
    /// Parses a text or binary frame payload.
    pub fn parse(payload: impl AsRef<[u8]>) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload.as_ref())
    }

    pub fn into_command(self) -> Command {
        match self.kind.as_str() {
            "move" => Command::Move {
                x: number_field(&self.data, "x"),
                y: number_field(&self.data, "y"),
            },
            "shoot" => Command::Shoot {
                angle: number_field(&self.data, "angle"),
            },
            _ => Command::Unknown(self.kind),
        }
    }
}

fn number_field(data: &Value, key: &str) -> f64 {
    data.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
