use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainPhase {
    NotDraining,
    Draining,
    JustFinishedDraining,
}

/// Detects the end of a node drain so the page can show a one-shot
/// "drain complete" banner.
///
/// `observe` must be called with every new `is_draining` value seen on the
/// node. Only a `true -> false` edge raises the banner.
#[derive(Debug, Clone)]
pub struct DrainNotification {
    flag_as_draining: bool,
    show_drain_notification: bool,
    phase: DrainPhase,
}

impl DrainNotification {
    /// Seed the tracker with the drain flag seen when the page is entered.
    pub fn new(is_draining: bool) -> Self {
        Self {
            flag_as_draining: is_draining,
            show_drain_notification: false,
            phase: if is_draining {
                DrainPhase::Draining
            } else {
                DrainPhase::NotDraining
            },
        }
    }

    pub fn observe(&mut self, is_draining: bool) -> DrainPhase {
        if self.flag_as_draining && !is_draining {
            self.show_drain_notification = true;
            self.phase = DrainPhase::JustFinishedDraining;
            tracing::info!("Node drain finished");
        } else if is_draining {
            self.phase = DrainPhase::Draining;
        } else if self.phase != DrainPhase::JustFinishedDraining {
            self.phase = DrainPhase::NotDraining;
        }

        self.flag_as_draining = is_draining;
        self.phase
    }

    pub fn show_drain_notification(&self) -> bool {
        self.show_drain_notification
    }

    pub fn flag_as_draining(&self) -> bool {
        self.flag_as_draining
    }

    pub fn phase(&self) -> DrainPhase {
        self.phase
    }

    /// Hide the banner once the user has acknowledged it.
    pub fn dismiss(&mut self) {
        self.show_drain_notification = false;
        if self.phase == DrainPhase::JustFinishedDraining {
            self.phase = DrainPhase::NotDraining;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_edge_raises_banner() {
        let mut drain = DrainNotification::new(true);
        assert_eq!(drain.observe(false), DrainPhase::JustFinishedDraining);
        assert!(drain.show_drain_notification());
        assert!(!drain.flag_as_draining());
    }

    #[test]
    fn rising_edge_is_silent() {
        let mut drain = DrainNotification::new(false);
        assert_eq!(drain.observe(true), DrainPhase::Draining);
        assert!(!drain.show_drain_notification());
        assert!(drain.flag_as_draining());
    }

    #[test]
    fn repeated_values_are_silent() {
        let mut drain = DrainNotification::new(true);
        drain.observe(true);
        assert!(!drain.show_drain_notification());

        let mut drain = DrainNotification::new(false);
        drain.observe(false);
        assert!(!drain.show_drain_notification());
        assert_eq!(drain.phase(), DrainPhase::NotDraining);
    }

    #[test]
    fn banner_survives_until_dismissed() {
        let mut drain = DrainNotification::new(true);
        drain.observe(false);
        drain.observe(false);
        assert!(drain.show_drain_notification());
        assert_eq!(drain.phase(), DrainPhase::JustFinishedDraining);

        drain.dismiss();
        assert!(!drain.show_drain_notification());
        assert_eq!(drain.phase(), DrainPhase::NotDraining);
    }

    #[test]
    fn second_drain_cycle_fires_again() {
        let mut drain = DrainNotification::new(false);
        drain.observe(true);
        drain.observe(false);
        assert!(drain.show_drain_notification());
        drain.dismiss();

        drain.observe(true);
        assert!(!drain.show_drain_notification());
        drain.observe(false);
        assert!(drain.show_drain_notification());
    }
}
