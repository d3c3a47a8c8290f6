use serde::Deserialize;

use crate::error::ApiError;
use crate::jobs::category::Category;

/// Listing fields as submitted for posting or admin editing. Edits replace
/// every field wholesale.
#[derive(Debug, Deserialize)]
pub struct JobForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub pay: String,
    pub category: String,
    pub poster_name: String,
    pub poster_contact: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl JobForm {
    /// Shape checks: every field required, category drawn from the fixed set.
    /// Returns the canonical category on success.
    pub fn validate(&self) -> Result<Category, ApiError> {
        let required = [
            &self.title,
            &self.description,
            &self.location,
            &self.pay,
            &self.poster_name,
            &self.poster_contact,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(ApiError::Validation("All fields are required".into()));
        }
        Category::from_name(&self.category)
            .ok_or_else(|| ApiError::Validation("Unknown category".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> JobForm {
        JobForm {
            title: "Fix kitchen sink".into(),
            description: "Leaking trap under the sink".into(),
            location: "Lagos".into(),
            pay: "5000 per visit".into(),
            category: "Plumbing".into(),
            poster_name: "Alice".into(),
            poster_contact: "07001234567".into(),
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        assert_eq!(valid_form().validate().unwrap(), Category::Plumbing);
    }

    #[test]
    fn rejects_blank_fields() {
        let mut form = valid_form();
        form.pay = "   ".into();
        assert!(matches!(
            form.validate(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn rejects_category_outside_the_fixed_set() {
        let mut form = valid_form();
        form.category = "Gardening".into();
        assert!(form.validate().is_err());

        // Case matters; the stored names are canonical
        form.category = "plumbing".into();
        assert!(form.validate().is_err());
    }
}
