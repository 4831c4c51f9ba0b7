//! Five-element therapeutic point table
//!
//! Each of the 12 meridians has a fixed tonification and sedation point
//! (the classical five-shu assignments). The extremum recommendation in
//! five-element mode reads from this table.

use crate::taxonomy::Channel;
use crate::types::Action;

/// Tonification and sedation points for one meridian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPoints {
    pub tonify: &'static str,
    pub sedate: &'static str,
}

/// Five-element points for a channel's meridian
pub fn element_points(channel: Channel) -> ElementPoints {
    match channel {
        Channel::H1 => ElementPoints { tonify: "LU9", sedate: "LU5" },
        Channel::H2 => ElementPoints { tonify: "PC9", sedate: "PC7" },
        Channel::H3 => ElementPoints { tonify: "HT9", sedate: "HT7" },
        Channel::H4 => ElementPoints { tonify: "SI3", sedate: "SI8" },
        Channel::H5 => ElementPoints { tonify: "SJ3", sedate: "SJ10" },
        Channel::H6 => ElementPoints { tonify: "LI11", sedate: "LI2" },
        Channel::F1 => ElementPoints { tonify: "SP2", sedate: "SP5" },
        Channel::F2 => ElementPoints { tonify: "LV8", sedate: "LV2" },
        Channel::F3 => ElementPoints { tonify: "KI7", sedate: "KI1" },
        Channel::F4 => ElementPoints { tonify: "BL67", sedate: "BL65" },
        Channel::F5 => ElementPoints { tonify: "GB43", sedate: "GB38" },
        Channel::F6 => ElementPoints { tonify: "ST41", sedate: "ST45" },
    }
}

/// Therapeutic point for a channel and corrective action
pub fn recommended_point(channel: Channel, action: Action) -> &'static str {
    let points = element_points(channel);
    match action {
        Action::Sedate => points.sedate,
        Action::Tonify => points.tonify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::CHANNEL_ORDER;

    #[test]
    fn test_every_channel_has_distinct_points() {
        for channel in CHANNEL_ORDER {
            let points = element_points(channel);
            assert_ne!(points.tonify, points.sedate);
            assert!(!points.tonify.is_empty());
            assert!(!points.sedate.is_empty());
        }
    }

    #[test]
    fn test_action_selects_point() {
        assert_eq!(recommended_point(Channel::H1, Action::Sedate), "LU5");
        assert_eq!(recommended_point(Channel::H1, Action::Tonify), "LU9");
        assert_eq!(recommended_point(Channel::H4, Action::Tonify), "SI3");
        assert_eq!(recommended_point(Channel::F4, Action::Sedate), "BL65");
    }
}
