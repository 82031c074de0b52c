use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photographer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub tagline: String,
    /// Daily rate in euros.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub portrait: String,
}

impl Photographer {
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Order photographers for the home page.
///
/// Ids listed in `featured` come first, in that list's order. Everyone else
/// follows in their original relative order.
pub fn featured_order(photographers: &[Photographer], featured: &[i64]) -> Vec<Photographer> {
    let mut ordered = photographers.to_vec();
    ordered.sort_by_key(|p| {
        featured
            .iter()
            .position(|id| *id == p.id)
            .unwrap_or(featured.len())
    });
    ordered
}
