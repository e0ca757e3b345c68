//! Devices and their control state machine.
//!
//! There are exactly three devices: two LEDs (on/off) and a stepper motor
//! (stopped, turning left, turning right). A [`DeviceCommand`] sent to a
//! device maps to one backend action code; the matching state transition is
//! applied only once the backend has accepted the command.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the fixed set of controllable peripherals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceId {
    #[serde(rename = "LED1")]
    Led1,
    #[serde(rename = "LED2")]
    Led2,
    #[serde(rename = "Motor")]
    Motor,
}

impl DeviceId {
    pub const ALL: [DeviceId; 3] = [DeviceId::Led1, DeviceId::Led2, DeviceId::Motor];

    /// Numeric id the backend stores in `id_device`.
    pub fn backend_id(self) -> u32 {
        match self {
            DeviceId::Led1 => 1,
            DeviceId::Led2 => 2,
            DeviceId::Motor => 3,
        }
    }

    /// URL-safe name used in dashboard routes and CLI arguments.
    pub fn slug(self) -> &'static str {
        match self {
            DeviceId::Led1 => "led1",
            DeviceId::Led2 => "led2",
            DeviceId::Motor => "motor",
        }
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            DeviceId::Led1 => "Led 1",
            DeviceId::Led2 => "Led 2",
            DeviceId::Motor => "Motor",
        }
    }

    pub fn is_led(self) -> bool {
        matches!(self, DeviceId::Led1 | DeviceId::Led2)
    }

    /// Commands this device accepts, in button order.
    pub fn commands(self) -> &'static [DeviceCommand] {
        if self.is_led() {
            &[DeviceCommand::TurnOn, DeviceCommand::TurnOff]
        } else {
            &[DeviceCommand::TurnLeft, DeviceCommand::Stop, DeviceCommand::TurnRight]
        }
    }

    pub fn from_backend_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(DeviceId::Led1),
            2 => Some(DeviceId::Led2),
            3 => Some(DeviceId::Motor),
            _ => None,
        }
    }

    /// Resolve an id as the backend sends it: a number or a name.
    pub fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(Self::from_backend_id),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceId::Led1 => "LED1",
            DeviceId::Led2 => "LED2",
            DeviceId::Motor => "Motor",
        })
    }
}

impl FromStr for DeviceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "led1" | "1" => Ok(DeviceId::Led1),
            "led2" | "2" => Ok(DeviceId::Led2),
            "motor" | "3" => Ok(DeviceId::Motor),
            _ => Err(CoreError::UnknownDevice(s.to_string())),
        }
    }
}

/// A control command issued from a button or the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCommand {
    #[serde(rename = "on")]
    TurnOn,
    #[serde(rename = "off")]
    TurnOff,
    #[serde(rename = "left")]
    TurnLeft,
    #[serde(rename = "right")]
    TurnRight,
    Stop,
}

impl DeviceCommand {
    pub fn slug(self) -> &'static str {
        match self {
            DeviceCommand::TurnOn => "on",
            DeviceCommand::TurnOff => "off",
            DeviceCommand::TurnLeft => "left",
            DeviceCommand::TurnRight => "right",
            DeviceCommand::Stop => "stop",
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            DeviceCommand::TurnOn => "Encender",
            DeviceCommand::TurnOff => "Apagar",
            DeviceCommand::TurnLeft => "Girar Izquierda",
            DeviceCommand::TurnRight => "Girar Derecha",
            DeviceCommand::Stop => "Detener",
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DeviceCommand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" | "encender" => Ok(DeviceCommand::TurnOn),
            "off" | "apagar" => Ok(DeviceCommand::TurnOff),
            "left" | "girar-izquierda" => Ok(DeviceCommand::TurnLeft),
            "right" | "girar-derecha" => Ok(DeviceCommand::TurnRight),
            "stop" | "detener" => Ok(DeviceCommand::Stop),
            _ => Err(CoreError::UnknownCommand(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedState {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotorState {
    Stopped,
    TurningLeft,
    TurningRight,
}

impl MotorState {
    /// Wire value: LEFT, RIGHT or STOP.
    pub fn wire(self) -> &'static str {
        match self {
            MotorState::Stopped => "STOP",
            MotorState::TurningLeft => "LEFT",
            MotorState::TurningRight => "RIGHT",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "STOP" | "STOPPED" | "DETENIDO" => Some(MotorState::Stopped),
            "LEFT" | "GIRO IZQUIERDA" => Some(MotorState::TurningLeft),
            "RIGHT" | "GIRO DERECHA" => Some(MotorState::TurningRight),
            _ => None,
        }
    }
}

/// Current state of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    Led(LedState),
    Motor(MotorState),
}

impl DeviceState {
    /// Power-on state of a device.
    pub fn initial(device: DeviceId) -> Self {
        if device.is_led() {
            DeviceState::Led(LedState::Off)
        } else {
            DeviceState::Motor(MotorState::Stopped)
        }
    }

    /// Status label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            DeviceState::Led(LedState::On) => "ON",
            DeviceState::Led(LedState::Off) => "OFF",
            DeviceState::Motor(MotorState::Stopped) => "Detenido",
            DeviceState::Motor(MotorState::TurningLeft) => "Giro Izquierda",
            DeviceState::Motor(MotorState::TurningRight) => "Giro Derecha",
        }
    }

    /// Whether the device is doing something (LED lit, motor turning).
    pub fn is_active(self) -> bool {
        matches!(
            self,
            DeviceState::Led(LedState::On)
                | DeviceState::Motor(MotorState::TurningLeft | MotorState::TurningRight)
        )
    }

    /// State reached after `command`, or an error when the command does not
    /// apply to this kind of device.
    pub fn transition(self, device: DeviceId, command: DeviceCommand) -> Result<Self, CoreError> {
        match (self, command) {
            (DeviceState::Led(_), DeviceCommand::TurnOn) => Ok(DeviceState::Led(LedState::On)),
            (DeviceState::Led(_), DeviceCommand::TurnOff) => Ok(DeviceState::Led(LedState::Off)),
            (DeviceState::Motor(_), DeviceCommand::TurnLeft) => {
                Ok(DeviceState::Motor(MotorState::TurningLeft))
            }
            (DeviceState::Motor(_), DeviceCommand::TurnRight) => {
                Ok(DeviceState::Motor(MotorState::TurningRight))
            }
            (DeviceState::Motor(_), DeviceCommand::Stop) => Ok(DeviceState::Motor(MotorState::Stopped)),
            _ => Err(CoreError::InvalidCommand { device, command }),
        }
    }

    /// Interpret a `/devices/status` value for `device`.
    pub fn from_wire(device: DeviceId, status: &Value) -> Option<Self> {
        if device.is_led() {
            let on = match status {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_i64()? != 0,
                Value::String(s) => match s.trim().to_uppercase().as_str() {
                    "ON" | "TRUE" | "1" | "ENCENDIDO" => true,
                    "OFF" | "FALSE" | "0" | "APAGADO" => false,
                    _ => return None,
                },
                _ => return None,
            };
            Some(DeviceState::Led(if on { LedState::On } else { LedState::Off }))
        } else {
            status.as_str().and_then(MotorState::from_wire).map(DeviceState::Motor)
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `POST /actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub id_device: u32,
    pub action: String,
    pub value: String,
}

impl ActionRequest {
    /// Map `(device, command)` to its backend action code.
    pub fn for_command(device: DeviceId, command: DeviceCommand) -> Result<Self, CoreError> {
        let (action, value) = match (device.is_led(), command) {
            (true, DeviceCommand::TurnOn) => ("LED_ON", "ON"),
            (true, DeviceCommand::TurnOff) => ("LED_OFF", "OFF"),
            (false, DeviceCommand::TurnLeft) => ("MOTOR_LEFT", "LEFT"),
            (false, DeviceCommand::TurnRight) => ("MOTOR_RIGHT", "RIGHT"),
            (false, DeviceCommand::Stop) => ("MOTOR_STOP", "STOP"),
            _ => return Err(CoreError::InvalidCommand { device, command }),
        };
        Ok(Self {
            id_device: device.backend_id(),
            action: action.to_string(),
            value: value.to_string(),
        })
    }
}

/// One record of `GET /devices/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStatusRecord {
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Value,
}

impl DeviceStatusRecord {
    /// Resolve to a known device and state; `None` for anything unrecognised.
    pub fn resolve(&self) -> Option<(DeviceId, DeviceState)> {
        let device = DeviceId::from_wire(&self.id).or_else(|| self.name.parse().ok())?;
        let state = DeviceState::from_wire(device, &self.status)?;
        Some((device, state))
    }
}

/// Last known state of every device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBoard {
    states: BTreeMap<DeviceId, DeviceState>,
}

impl Default for DeviceBoard {
    fn default() -> Self {
        Self {
            states: DeviceId::ALL
                .iter()
                .map(|d| (*d, DeviceState::initial(*d)))
                .collect(),
        }
    }
}

impl DeviceBoard {
    pub fn state(&self, device: DeviceId) -> DeviceState {
        self.states
            .get(&device)
            .copied()
            .unwrap_or_else(|| DeviceState::initial(device))
    }

    /// Apply an accepted command and return the new state.
    pub fn apply(&mut self, device: DeviceId, command: DeviceCommand) -> Result<DeviceState, CoreError> {
        let next = self.state(device).transition(device, command)?;
        self.states.insert(device, next);
        Ok(next)
    }

    /// Overwrite states with what the backend reports. Returns how many
    /// records were recognised.
    pub fn merge_status(&mut self, records: &[DeviceStatusRecord]) -> usize {
        let mut merged = 0;
        for (device, state) in records.iter().filter_map(DeviceStatusRecord::resolve) {
            self.states.insert(device, state);
            merged += 1;
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, DeviceState)> + '_ {
        self.states.iter().map(|(d, s)| (*d, *s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_device_names() {
        assert_eq!("LED1".parse::<DeviceId>().unwrap(), DeviceId::Led1);
        assert_eq!("led 2".parse::<DeviceId>().unwrap(), DeviceId::Led2);
        assert_eq!("Motor".parse::<DeviceId>().unwrap(), DeviceId::Motor);
        assert!(matches!("fan".parse::<DeviceId>(), Err(CoreError::UnknownDevice(_))));
    }

    #[test]
    fn parse_commands_in_both_vocabularies() {
        assert_eq!("off".parse::<DeviceCommand>().unwrap(), DeviceCommand::TurnOff);
        assert_eq!("girar-izquierda".parse::<DeviceCommand>().unwrap(), DeviceCommand::TurnLeft);
        assert_eq!("DETENER".parse::<DeviceCommand>().unwrap(), DeviceCommand::Stop);
    }

    #[test]
    fn led_transitions() {
        let mut board = DeviceBoard::default();
        assert_eq!(board.apply(DeviceId::Led1, DeviceCommand::TurnOn).unwrap().label(), "ON");
        assert_eq!(board.apply(DeviceId::Led1, DeviceCommand::TurnOff).unwrap().label(), "OFF");
        assert_eq!(board.state(DeviceId::Led2), DeviceState::Led(LedState::Off));
    }

    #[test]
    fn motor_transitions() {
        let mut board = DeviceBoard::default();
        board.apply(DeviceId::Motor, DeviceCommand::TurnRight).unwrap();
        assert_eq!(board.state(DeviceId::Motor).label(), "Giro Derecha");
        board.apply(DeviceId::Motor, DeviceCommand::Stop).unwrap();
        assert_eq!(board.state(DeviceId::Motor).label(), "Detenido");
    }

    #[test]
    fn cross_kind_commands_rejected_and_state_kept() {
        let mut board = DeviceBoard::default();
        board.apply(DeviceId::Led1, DeviceCommand::TurnOn).unwrap();
        let err = board.apply(DeviceId::Led1, DeviceCommand::Stop).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCommand { .. }));
        assert_eq!(board.state(DeviceId::Led1).label(), "ON");
        assert!(ActionRequest::for_command(DeviceId::Motor, DeviceCommand::TurnOn).is_err());
    }

    #[test]
    fn action_codes() {
        let req = ActionRequest::for_command(DeviceId::Led2, DeviceCommand::TurnOff).unwrap();
        assert_eq!(req, ActionRequest { id_device: 2, action: "LED_OFF".into(), value: "OFF".into() });
        let req = ActionRequest::for_command(DeviceId::Motor, DeviceCommand::TurnLeft).unwrap();
        assert_eq!(req.id_device, 3);
        assert_eq!(req.action, "MOTOR_LEFT");
        assert_eq!(req.value, "LEFT");
    }

    #[test]
    fn merge_backend_status() {
        let records: Vec<DeviceStatusRecord> = serde_json::from_value(json!([
            {"id": "LED1", "name": "Led 1", "status": true},
            {"id": 2, "name": "Led 2", "status": false},
            {"id": "Motor", "name": "Motor", "status": "LEFT"},
            {"id": 99, "name": "Fan", "status": "ON"}
        ]))
        .unwrap();
        let mut board = DeviceBoard::default();
        assert_eq!(board.merge_status(&records), 3);
        assert_eq!(board.state(DeviceId::Led1).label(), "ON");
        assert_eq!(board.state(DeviceId::Led2).label(), "OFF");
        assert_eq!(board.state(DeviceId::Motor).label(), "Giro Izquierda");
    }

    #[test]
    fn unknown_motor_status_is_ignored() {
        let record = DeviceStatusRecord { id: json!("Motor"), name: String::new(), status: json!("SPIN") };
        assert!(record.resolve().is_none());
    }
}
