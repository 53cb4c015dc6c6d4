use crate::models::transactions::Money;
use crate::models::users::{Identity, IdentityUpdate};

/// Authenticated identity for the single live session.
///
/// The identity survives a logout; the next login replaces it wholesale and
/// bumps the generation.
pub struct SessionRepository {
    identity: Identity,
    authenticated: bool,
    generation: u64,
}

impl SessionRepository {
    pub fn new() -> Self {
        Self {
            identity: Identity::for_login(""),
            authenticated: false,
            generation: 0,
        }
    }

    pub fn login(&mut self, email: &str) -> &Identity {
        self.identity = Identity::for_login(email);
        self.authenticated = true;
        self.generation += 1;

        &self.identity
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    pub fn update_identity(&mut self, update: IdentityUpdate) -> &Identity {
        update.apply(&mut self.identity);

        &self.identity
    }

    pub fn set_balance(&mut self, balance: Money) {
        self.identity.balance = balance;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Number of logins so far. Work scheduled under one login must not
    /// settle under another.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::Role;

    #[test]
    fn login_replaces_the_previous_identity() {
        let mut session = SessionRepository::new();
        session.login("admin@nexgen.com");
        session.update_identity(IdentityUpdate {
            balance: Some(Money::from_cents(10)),
            ..Default::default()
        });
        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.identity().balance, Money::from_cents(10));

        let generation = session.generation();
        let identity = session.login("someone@example.org").clone();
        assert!(session.is_authenticated());
        assert_eq!(session.generation(), generation + 1);
        assert_eq!(identity.role, Role::User);
        assert_eq!(identity.email, "someone@example.org");
        assert_eq!(identity.balance, Money::from_cents(1_245_075));
    }

    #[test]
    fn updates_are_last_write_wins() {
        let mut session = SessionRepository::new();
        session.login("client@nexgen.com");
        for name in ["A", "B", "C"] {
            session.update_identity(IdentityUpdate {
                name: Some(name.to_string()),
                ..Default::default()
            });
        }

        assert_eq!(session.identity().name, "C");
    }
}
