//! Observable per-frame summary for the host's overlay

use serde::{Deserialize, Serialize};

use crate::sim::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub speed_kmh: u32,
    pub distance: u32,
    pub pickups: u32,
    pub multiplier: f32,
    pub nitro_active: bool,
    /// Host-supplied starting balance, passed through untouched
    pub balance: f64,
}

impl Hud {
    pub fn from_run(run: &RunState, balance: f64) -> Self {
        Self {
            speed_kmh: run.speed_kmh(),
            distance: run.distance.floor() as u32,
            pickups: run.pickups,
            multiplier: run.multiplier,
            nitro_active: run.nitro_active(),
            balance,
        }
    }

    pub fn multiplier_label(&self) -> String {
        format!("x{:.2}", self.multiplier)
    }

    /// Names of running power-ups for the side panel
    pub fn active_powerups(&self) -> Vec<&'static str> {
        if self.nitro_active { vec!["NITRO"] } else { Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scoring;

    #[test]
    fn test_hud_floors_and_passes_balance_through() {
        let run = RunState {
            distance: 12.9,
            multiplier: 1.1025,
            ..RunState::new()
        };
        let hud = Hud::from_run(&run, 42.5);
        assert_eq!(hud.speed_kmh, 100);
        assert_eq!(hud.distance, 12);
        assert_eq!(hud.balance, 42.5);
        assert_eq!(hud.multiplier_label(), "x1.10");
        assert!(hud.active_powerups().is_empty());
    }

    #[test]
    fn test_hud_reports_nitro() {
        let run = scoring::activate_nitro(RunState::new(), 0.0).unwrap();
        let hud = Hud::from_run(&run, 0.0);
        assert_eq!(hud.speed_kmh, 150);
        assert_eq!(hud.active_powerups(), vec!["NITRO"]);
    }
}
