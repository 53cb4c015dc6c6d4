use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::users::Role;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Dashboard,
    Transfers,
    Donations,
    Contacts,
    History,
    Profile,
    AdminDashboard,
    AdminUsers,
    AdminMessages,
    AdminFinance,
    AdminLogs,
    AdminSecurity,
}

const USER_MENU: [(View, &str); 6] = [
    (View::Dashboard, "Dashboard"),
    (View::Transfers, "Transfers"),
    (View::Donations, "Send a donation"),
    (View::Contacts, "Contacts"),
    (View::History, "Transactions"),
    (View::Profile, "My profile"),
];

const ADMIN_MENU: [(View, &str); 6] = [
    (View::AdminDashboard, "Command center"),
    (View::AdminUsers, "User management"),
    (View::AdminMessages, "Messaging"),
    (View::AdminFinance, "Cash flow"),
    (View::AdminLogs, "System logs"),
    (View::AdminSecurity, "Security & API"),
];

impl View {
    pub fn tag(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Transfers => "transfers",
            View::Donations => "donations",
            View::Contacts => "contacts",
            View::History => "history",
            View::Profile => "profile",
            View::AdminDashboard => "admin-dashboard",
            View::AdminUsers => "admin-users",
            View::AdminMessages => "admin-messages",
            View::AdminFinance => "admin-finance",
            View::AdminLogs => "admin-logs",
            View::AdminSecurity => "admin-security",
        }
    }

    pub fn landing(role: Role) -> Self {
        match role {
            Role::Admin => View::AdminDashboard,
            Role::User => View::Dashboard,
        }
    }

    /// Views that may hold a hand-off payload.
    pub fn keeps_handoff(self) -> bool {
        matches!(self, View::Transfers | View::Donations | View::Contacts)
    }

    pub fn is_admin(self) -> bool {
        self.tag().starts_with("admin-")
    }

    pub fn menu(role: Role) -> Vec<MenuEntry> {
        let entries: &[(View, &str)] = match role {
            Role::Admin => &ADMIN_MENU,
            Role::User => &USER_MENU,
        };

        entries
            .iter()
            .map(|(view, label)| MenuEntry {
                id: *view,
                label: label.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        USER_MENU
            .iter()
            .chain(ADMIN_MENU.iter())
            .map(|(view, _)| *view)
            .find(|view| view.tag() == s)
            .ok_or_else(|| format!("Unknown view: {}", s))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MenuEntry {
    pub id: View,
    pub label: String,
}

/// Recipient pre-fill handed from the contacts view to a transfer or
/// donation form.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Handoff {
    pub name: String,
    pub account: Option<String>,
}
