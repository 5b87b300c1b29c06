use serde::{Deserialize, Serialize};

/// A card kept on file. Only the masked form is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCard {
    pub alias: String,
    pub brand: String,
    pub last4: String,
    pub expiry: String,
    pub masked: String,
}

/// The signed-in shopper: supplies the default delivery address and saved card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shopper {
    pub id: String,
    pub name: String,
    pub email: String,
    pub default_address: String,
    #[serde(default)]
    pub cards: Vec<SavedCard>,
}

impl Shopper {
    /// The demo account the storefront signs in as.
    pub fn demo() -> Self {
        Self {
            id: "user_rose_01".to_string(),
            name: "Rose".to_string(),
            email: "rose@example.com".to_string(),
            default_address: "Delhi, Chandni Chowk, Gali No.5".to_string(),
            cards: vec![SavedCard {
                alias: "Rose".to_string(),
                brand: "VISA".to_string(),
                last4: "4242".to_string(),
                expiry: "12/27".to_string(),
                masked: "•••• 4242".to_string(),
            }],
        }
    }

    pub fn saved_card(&self) -> Option<&SavedCard> {
        self.cards.first()
    }
}
