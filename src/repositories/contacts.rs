use uuid::Uuid;

use crate::models::contacts::{demo_beneficiaries, Beneficiary, NewBeneficiary};

pub struct ContactRepository {
    beneficiaries: Vec<Beneficiary>,
}

impl ContactRepository {
    pub fn new() -> Self {
        Self {
            beneficiaries: demo_beneficiaries(),
        }
    }

    pub fn search(&self, query: &str) -> Vec<Beneficiary> {
        self.beneficiaries
            .iter()
            .filter(|b| b.matches(query))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Beneficiary> {
        self.beneficiaries.iter().find(|b| b.id == id)
    }

    pub fn insert(&mut self, contact: NewBeneficiary) -> Beneficiary {
        let beneficiary = Beneficiary {
            id: format!("b{}", Uuid::new_v4().simple()),
            name: contact.name,
            email: contact.email,
            account_number: contact.account_number,
            category: contact.category,
        };
        self.beneficiaries.insert(0, beneficiary.clone());

        beneficiary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contacts::ContactCategory;

    #[test]
    fn search_matches_name_or_email_ignoring_case() {
        let contacts = ContactRepository::new();

        assert_eq!(contacts.search("").len(), 4);
        assert_eq!(contacts.search("MARIE")[0].id, "b1");
        assert_eq!(contacts.search("spa.fr")[0].name, "Fondation SPA");
        assert!(contacts.search("nobody").is_empty());
    }

    #[test]
    fn new_contacts_are_listed_first() {
        let mut contacts = ContactRepository::new();
        let added = contacts.insert(NewBeneficiary {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.org".to_string(),
            account_number: "FR76 0000".to_string(),
            category: ContactCategory::Professional,
        });

        assert_eq!(contacts.search("")[0], added);
        assert_eq!(contacts.get(&added.id), Some(&added));
    }
}
