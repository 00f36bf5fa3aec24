use repository_base::Entity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Entity)]
pub struct User {
    #[repository(id)]
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Entity)]
#[repository(kind = "Topic")]
pub struct Topic {
    #[repository(id)]
    pub slug: String,
    pub title: String,
}

impl User {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}
