use crate::models::navigation::{Handoff, View};

#[derive(Default)]
pub struct NavigationRepository {
    active_view: View,
    handoff: Option<Handoff>,
}

impl NavigationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching to a view outside the hand-off scope drops any pending
    /// payload.
    pub fn set_active_view(&mut self, view: View) {
        self.active_view = view;
        if !view.keeps_handoff() {
            self.handoff = None;
        }
    }

    pub fn hand_off(&mut self, handoff: Handoff, destination: View) {
        self.handoff = Some(handoff);
        self.set_active_view(destination);
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn handoff(&self) -> Option<&Handoff> {
        self.handoff.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marie() -> Handoff {
        Handoff {
            name: "Marie Curie".to_string(),
            account: Some("FR76 3000 0000 1111 2222 333".to_string()),
        }
    }

    #[test]
    fn scoped_views_keep_the_payload() {
        let mut navigation = NavigationRepository::new();
        navigation.hand_off(marie(), View::Transfers);

        for view in [View::Donations, View::Contacts, View::Transfers] {
            navigation.set_active_view(view);
            assert_eq!(navigation.handoff(), Some(&marie()));
        }
    }

    #[test]
    fn other_views_clear_the_payload() {
        for view in [
            View::Dashboard,
            View::History,
            View::Profile,
            View::AdminUsers,
            View::AdminSecurity,
        ] {
            let mut navigation = NavigationRepository::new();
            navigation.hand_off(marie(), View::Donations);
            navigation.set_active_view(view);

            assert_eq!(navigation.active_view(), view);
            assert!(navigation.handoff().is_none());
        }
    }

    #[test]
    fn hand_off_outside_scope_is_dropped_immediately() {
        let mut navigation = NavigationRepository::new();
        navigation.hand_off(marie(), View::History);

        assert!(navigation.handoff().is_none());
    }
}
