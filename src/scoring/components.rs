use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five per-event performance signals, each on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Race pace
    Rr,
    /// Qualifying pace
    Qr,
    /// Tyre / stint management
    Td,
    /// Overtaking quality (absent in eras without the telemetry)
    Oq,
    /// Wet-weather ability (wet sessions only)
    Wa,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::Rr,
        Component::Qr,
        Component::Td,
        Component::Oq,
        Component::Wa,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Component::Rr => "RR",
            Component::Qr => "QR",
            Component::Td => "TD",
            Component::Oq => "OQ",
            Component::Wa => "WA",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The components supplied for one participant at one event.
///
/// Absent components are `None`; no value is ever used as a "missing" marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSet {
    #[serde(default)]
    pub rr: Option<f64>,
    #[serde(default)]
    pub qr: Option<f64>,
    #[serde(default)]
    pub td: Option<f64>,
    #[serde(default)]
    pub oq: Option<f64>,
    #[serde(default)]
    pub wa: Option<f64>,
}

impl ComponentSet {
    pub fn new(
        rr: Option<f64>,
        qr: Option<f64>,
        td: Option<f64>,
        oq: Option<f64>,
        wa: Option<f64>,
    ) -> Self {
        Self { rr, qr, td, oq, wa }
    }

    pub fn get(&self, component: Component) -> Option<f64> {
        match component {
            Component::Rr => self.rr,
            Component::Qr => self.qr,
            Component::Td => self.td,
            Component::Oq => self.oq,
            Component::Wa => self.wa,
        }
    }

    pub fn set(&mut self, component: Component, value: Option<f64>) {
        match component {
            Component::Rr => self.rr = value,
            Component::Qr => self.qr = value,
            Component::Td => self.td = value,
            Component::Oq => self.oq = value,
            Component::Wa => self.wa = value,
        }
    }

    /// Supplied components in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL
            .iter()
            .filter_map(move |&c| self.get(c).map(|v| (c, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Unweighted mean of the supplied components, `None` when nothing is supplied.
    pub fn mean(&self) -> Option<f64> {
        let n = self.present().count();
        if n == 0 {
            return None;
        }
        // Divide first so the sum cannot overflow
        Some(self.present().map(|(_, v)| v / n as f64).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_skips_absent_components() {
        let set = ComponentSet::new(Some(9.0), None, Some(7.0), None, Some(5.0));
        let present: Vec<_> = set.present().collect();
        assert_eq!(
            present,
            vec![(Component::Rr, 9.0), (Component::Td, 7.0), (Component::Wa, 5.0)]
        );
    }

    #[test]
    fn test_empty_set() {
        let set = ComponentSet::default();
        assert!(set.is_empty());
        assert_eq!(set.mean(), None);
    }

    #[test]
    fn test_mean_of_present_only() {
        let set = ComponentSet::new(Some(9.0), Some(6.0), None, None, None);
        assert_eq!(set.mean(), Some(7.5));
    }

    #[test]
    fn test_mean_of_extremes_is_finite() {
        let set = ComponentSet::new(Some(f64::MAX), Some(f64::MAX), None, None, None);
        assert_eq!(set.mean(), Some(f64::MAX));
    }

    #[test]
    fn test_set_and_get() {
        let mut set = ComponentSet::default();
        set.set(Component::Oq, Some(4.5));
        assert_eq!(set.get(Component::Oq), Some(4.5));
        set.set(Component::Oq, None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_partial_json_parse() {
        let set: ComponentSet = serde_json::from_str(r#"{"rr": 9.2, "td": 8.0}"#).unwrap();
        assert_eq!(set.rr, Some(9.2));
        assert_eq!(set.qr, None);
        assert_eq!(set.td, Some(8.0));
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = Component::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["RR", "QR", "TD", "OQ", "WA"]);
    }
}
