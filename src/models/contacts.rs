use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactCategory {
    Family,
    #[default]
    Friends,
    Donations,
    Professional,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Beneficiary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub account_number: String,
    pub category: ContactCategory,
}

impl Beneficiary {
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.email.to_lowercase().contains(&query)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBeneficiary {
    pub name: String,
    pub email: String,
    pub account_number: String,
    #[serde(default)]
    pub category: ContactCategory,
}

pub fn demo_beneficiaries() -> Vec<Beneficiary> {
    let contact = |id: &str, name: &str, email: &str, account: &str, category: ContactCategory| Beneficiary {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        account_number: account.to_string(),
        category,
    };

    vec![
        contact("b1", "Marie Curie", "marie@curie.org", "FR76 3000 0000 1111 2222 333", ContactCategory::Family),
        contact("b2", "Pierre Durand", "pierre.d@gmail.com", "FR76 3000 4444 5555 6666 777", ContactCategory::Friends),
        contact("b3", "Fondation SPA", "contact@spa.fr", "FR76 3000 8888 9999 0000 111", ContactCategory::Donations),
        contact("b4", "Luc Martin", "luc@martin.fr", "FR76 1234 5678 9012 3456 789", ContactCategory::Professional),
    ]
}
