//! Per-role input dispatch.
//!
//! One flat capability table instead of a controller subclass hierarchy:
//! every role runs the same classifiers, the profile only decides which
//! semantic actions leave the device.

use shared::domain::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlProfile {
    /// Single-contact drags emit continuous pan deltas.
    pub pans_on_drag: bool,
    /// Single-contact releases are classified into tap/direction selects.
    pub classifies_release: bool,
    /// Pinch and wheel input emits zoom deltas.
    pub zooms: bool,
    /// Confirmed shakes emit directional selects.
    pub shake_select: bool,
    /// Orientation tilt emits continuous tilt updates.
    pub tilts: bool,
}

impl ControlProfile {
    const NONE: ControlProfile = ControlProfile {
        pans_on_drag: false,
        classifies_release: false,
        zooms: false,
        shake_select: false,
        tilts: false,
    };
}

/// Capability lookup by role. Hosts consume actions and send none.
pub fn profile_for(role: Role) -> ControlProfile {
    match role {
        Role::Host => ControlProfile::NONE,
        Role::Navigator => ControlProfile {
            pans_on_drag: true,
            zooms: true,
            tilts: true,
            ..ControlProfile::NONE
        },
        Role::Selector => ControlProfile {
            classifies_release: true,
            shake_select: true,
            ..ControlProfile::NONE
        },
        Role::Inspector => ControlProfile {
            classifies_release: true,
            zooms: true,
            ..ControlProfile::NONE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_send_nothing() {
        let profile = profile_for(Role::Host);
        assert!(!profile.pans_on_drag);
        assert!(!profile.classifies_release);
        assert!(!profile.zooms);
        assert!(!profile.shake_select);
        assert!(!profile.tilts);
    }

    #[test]
    fn navigators_move_the_view_and_selectors_pick() {
        let navigator = profile_for(Role::Navigator);
        assert!(navigator.pans_on_drag && navigator.zooms && navigator.tilts);
        assert!(!navigator.classifies_release);

        let selector = profile_for(Role::Selector);
        assert!(selector.classifies_release && selector.shake_select);
        assert!(!selector.pans_on_drag);
    }
}
