use repository_base::Entity;
use serde::{Deserialize, Serialize};

/// Implements `Entity` by hand instead of deriving it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "account_id")]
    number: i64,
    pub email: String,
    pub active: bool,
}

impl Account {
    pub fn new(email: &str) -> Self {
        Self {
            number: 0,
            email: email.to_string(),
            active: true,
        }
    }

    pub fn number(&self) -> i64 {
        self.number
    }
}

impl Entity for Account {
    type Id = i64;
    const KIND: &'static str = "Account";
    const ID_FIELD: &'static str = "account_id";

    fn identifier(&self) -> i64 {
        self.number
    }

    fn set_identifier(&mut self, id: i64) {
        self.number = id;
    }
}
