//! The fixed chart of bookkeeping accounts.
//!
//! Loaded once at startup and immutable afterwards; the full set is the only
//! valid domain for a line item's account assignment. Consumed twice: the
//! request builder serializes it into the instruction, the presentation
//! layer renders it as the selection list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A single bookkeeping account usable for line-item categorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingAccount {
    /// Unique, stable account number.
    pub number: String,

    /// Display name.
    pub name: String,

    /// Typical articles booked here, if the chart gives a hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Grouping category.
    pub category: String,
}

/// Wareneingang chart used for categorizing invoice line items.
const STANDARD_CHART: &[(&str, &str, Option<&str>, &str)] = &[
    ("5300", "Wareneingang 7% (allgemein)", None, "wareneingang"),
    (
        "5301",
        "Wareneingang 7% (Gemüse)",
        Some("Eisbergsalat, Zwiebeln, Rotkohl, Tomaten, Gurken, Petersilie, Zitronen, Mais"),
        "wareneingang",
    ),
    (
        "5302",
        "Wareneingang 7% (SHFKJP)",
        Some("Sucuk, Haloumi, Falafel, Käse, Jalapenos, Peperoni, Würstchen"),
        "wareneingang",
    ),
    (
        "5303",
        "Wareneingang 7% (Sauce)",
        Some("Kräuter, Knoblauch, Scharf, Ketchup, Mayonnaise, Joppi, Samurai, Curry-Ketchup"),
        "wareneingang",
    ),
    ("5304", "Wareneingang 7% (Pommes)", Some("Pommes"), "wareneingang"),
    (
        "5305",
        "Wareneingang 7% (Fleisch)",
        Some("Kalbfleisch, Hähnchenfleisch"),
        "wareneingang",
    ),
    (
        "5306",
        "Wareneingang 7% (Getränke)",
        Some("Nicht-alkoholische Getränke lt. HDD-Standard"),
        "wareneingang",
    ),
    (
        "5307",
        "Wareneingang 7% (Brot)",
        Some("Sandwich-Brot, Dürüm-Brot"),
        "wareneingang",
    ),
    ("5308", "Wareneingang 7% (Dönerbrot)", Some("Dönerbrot"), "wareneingang"),
    ("5309", "Wareneingang 7% (Lahmacun)", Some("Lahmacun"), "wareneingang"),
    (
        "5400",
        "Wareneingang 19%",
        Some("Wareneingang (19% Vorsteuer)."),
        "wareneingang",
    ),
    (
        "5401",
        "Wareneingang 19% (Getränke)",
        Some("Cola, Fanta, Sprite, Gazoz, Sprudelwasser, Eistee, Durstlöscher, Capri-Sun"),
        "wareneingang",
    ),
];

/// Immutable, ordered chart of accounts with fast membership by number.
#[derive(Debug, Clone)]
pub struct AccountChart {
    accounts: Vec<AccountingAccount>,
    by_number: HashMap<String, usize>,
}

impl AccountChart {
    /// The built-in chart for Wareneingang bookings.
    pub fn standard() -> Self {
        Self::from_accounts(
            STANDARD_CHART
                .iter()
                .map(|(number, name, description, category)| AccountingAccount {
                    number: (*number).to_string(),
                    name: (*name).to_string(),
                    description: description.map(str::to_string),
                    category: (*category).to_string(),
                })
                .collect(),
        )
    }

    /// Build a chart from explicit accounts, keeping their order.
    ///
    /// A later duplicate of an already-seen number is dropped so that
    /// numbers stay unique within the chart.
    pub fn from_accounts(accounts: Vec<AccountingAccount>) -> Self {
        let mut unique = Vec::with_capacity(accounts.len());
        let mut by_number = HashMap::with_capacity(accounts.len());

        for account in accounts {
            if by_number.contains_key(&account.number) {
                continue;
            }
            by_number.insert(account.number.clone(), unique.len());
            unique.push(account);
        }

        Self {
            accounts: unique,
            by_number,
        }
    }

    /// Ordered iteration over all accounts.
    pub fn iter(&self) -> impl Iterator<Item = &AccountingAccount> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Look up an account by number.
    pub fn get(&self, number: &str) -> Option<&AccountingAccount> {
        self.by_number.get(number).map(|&i| &self.accounts[i])
    }

    /// Membership test by number.
    pub fn contains(&self, number: &str) -> bool {
        self.by_number.contains_key(number)
    }

    /// The number/name/description projection serialized as pretty JSON for
    /// embedding in the classification instruction. Category is omitted.
    pub fn context_json(&self) -> String {
        let projection: Vec<Value> = self
            .accounts
            .iter()
            .map(|account| match &account.description {
                Some(description) => json!({
                    "number": account.number,
                    "name": account.name,
                    "description": description,
                }),
                None => json!({
                    "number": account.number,
                    "name": account.name,
                }),
            })
            .collect();

        format!("{:#}", Value::Array(projection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_chart_numbers_are_unique() {
        let chart = AccountChart::standard();
        let mut numbers: Vec<&str> = chart.iter().map(|a| a.number.as_str()).collect();
        let total = numbers.len();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), total);
    }

    #[test]
    fn membership_and_lookup() {
        let chart = AccountChart::standard();
        assert!(chart.contains("5309"));
        assert_eq!(chart.get("5309").unwrap().name, "Wareneingang 7% (Lahmacun)");
        assert!(!chart.contains("9999"));
        assert!(chart.get("9999").is_none());
    }

    #[test]
    fn duplicate_numbers_are_dropped() {
        let account = |number: &str| AccountingAccount {
            number: number.to_string(),
            name: format!("Account {number}"),
            description: None,
            category: "test".to_string(),
        };
        let chart = AccountChart::from_accounts(vec![
            account("1000"),
            account("1001"),
            account("1000"),
        ]);
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn context_omits_category_and_absent_descriptions() {
        let chart = AccountChart::standard();
        let context: Value = serde_json::from_str(&chart.context_json()).unwrap();
        let entries = context.as_array().unwrap();

        assert_eq!(entries.len(), chart.len());
        for entry in entries {
            assert!(entry.get("category").is_none());
        }
        // 5300 is the one account without a description hint.
        let general = entries
            .iter()
            .find(|e| e["number"] == "5300")
            .unwrap();
        assert!(general.get("description").is_none());
    }
}
