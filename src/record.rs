use serde::{Deserialize, Serialize};

use crate::catalog::Person;

/// One flattened `(person, hobby, option)` triple.
///
/// Serializes to a JSON object with the keys `usuario`, `aficion` and
/// `opcion`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// The person's name.
    #[serde(rename = "usuario")]
    pub user: String,
    /// The person's hobby.
    #[serde(rename = "aficion")]
    pub hobby: String,
    /// One option of that hobby.
    #[serde(rename = "opcion")]
    pub option: String,
}

impl Record {
    /// Pair a person with one option of their hobby.
    pub fn new(person: &Person, option: impl Into<String>) -> Self {
        Self {
            user: person.name.clone(),
            hobby: person.hobby.clone(),
            option: option.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_display_keys() {
        let maria = Person::new("Maria", 46, "Musica");
        let json = serde_json::to_string(&Record::new(&maria, "Clásica")).unwrap();
        assert_eq!(
            json,
            r#"{"usuario":"Maria","aficion":"Musica","opcion":"Clásica"}"#
        );
    }
}
