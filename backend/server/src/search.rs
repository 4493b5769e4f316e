//! # Catalog Search
//!
//! Filters for `GET /api/cakes`. The catalog is small enough to read in full
//! and filter in process.
//!
//! ## Query parameters
//! - `category`: exact category match
//! - `featured=true`: featured cakes only, any other value is ignored
//! - `available=false`: include unavailable cakes, by default they are hidden
//! - `search`: case-insensitive substring of name or description
use domain::cakes::Cake;
use serde::Deserialize;

use crate::utils::fold;

#[derive(Debug, Default, Deserialize)]
pub struct CakeQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
    pub available: Option<String>,
}

impl CakeQuery {
    pub fn matches(&self, cake: &Cake) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if cake.category.as_str() != category {
                return false;
            }
        }

        if self.featured.as_deref() == Some("true") && !cake.featured {
            return false;
        }

        if self.available.as_deref() != Some("false") && !cake.available {
            return false;
        }

        match self.search.as_deref().map(fold).filter(|s| !s.is_empty()) {
            Some(needle) => {
                fold(&cake.name).contains(&needle) || fold(&cake.description).contains(&needle)
            }
            None => true,
        }
    }

    /// Matching cakes, newest first.
    pub fn apply(&self, cakes: Vec<Cake>) -> Vec<Cake> {
        let mut found: Vec<Cake> = cakes.into_iter().filter(|c| self.matches(c)).collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use domain::cakes::{Cake, Category, CustomizableOptions};

    use super::CakeQuery;

    fn cake(name: &str, category: Category, featured: bool, available: bool, age: i64) -> Cake {
        let at = Utc::now() - Duration::minutes(age);
        Cake {
            id: name.to_lowercase(),
            name: name.into(),
            description: format!("A lovely {name} cake"),
            price: 50.0,
            image: String::new(),
            category,
            customizable_options: CustomizableOptions::default(),
            featured,
            available,
            created_at: at,
            updated_at: at,
        }
    }

    fn catalog() -> Vec<Cake> {
        vec![
            cake("Chocolate", Category::Birthday, true, true, 30),
            cake("Lemon", Category::Seasonal, false, true, 20),
            cake("Wedding Tier", Category::Wedding, true, false, 10),
        ]
    }

    fn names(cakes: &[Cake]) -> Vec<&str> {
        cakes.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_default_hides_unavailable_newest_first() {
        let found = CakeQuery::default().apply(catalog());
        assert_eq!(names(&found), ["Lemon", "Chocolate"]);
    }

    #[test]
    fn test_available_false_lifts_filter() {
        let query = CakeQuery {
            available: Some("false".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(catalog()).len(), 3);
    }

    #[test]
    fn test_featured_only_when_true() {
        let featured = CakeQuery {
            featured: Some("true".into()),
            ..Default::default()
        };
        assert_eq!(names(&featured.apply(catalog())), ["Chocolate"]);

        let ignored = CakeQuery {
            featured: Some("false".into()),
            ..Default::default()
        };
        assert_eq!(ignored.apply(catalog()).len(), 2);
    }

    #[test]
    fn test_search_and_category() {
        let query = CakeQuery {
            search: Some("  LEMON ".into()),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(catalog())), ["Lemon"]);

        let by_description = CakeQuery {
            search: Some("lovely".into()),
            category: Some("birthday".into()),
            ..Default::default()
        };
        assert_eq!(names(&by_description.apply(catalog())), ["Chocolate"]);
    }
}
