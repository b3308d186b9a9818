//! Menu page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use localburger_core::{CatalogItem, Category};

use crate::filters;
use crate::state::AppState;

/// One product card on the menu.
#[derive(Clone)]
pub struct ItemView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub badge: Option<String>,
}

impl From<&CatalogItem> for ItemView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
            badge: item.badge.clone(),
        }
    }
}

/// One category section; empty categories are not rendered.
#[derive(Clone)]
pub struct SectionView {
    pub heading: &'static str,
    pub items: Vec<ItemView>,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuTemplate {
    pub sections: Vec<SectionView>,
    pub menu_unavailable: bool,
}

/// Group active products into sections in the fixed category order.
fn sections(products: &[CatalogItem]) -> Vec<SectionView> {
    Category::ALL
        .iter()
        .map(|category| SectionView {
            heading: category.heading(),
            items: products
                .iter()
                .filter(|item| item.category == *category)
                .map(ItemView::from)
                .collect(),
        })
        .filter(|section| !section.items.is_empty())
        .collect()
}

/// Menu page. The page still renders when the products API is down; the
/// cart panel keeps serving persisted state either way.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> MenuTemplate {
    match state.catalog().products().await {
        Ok(products) => MenuTemplate {
            sections: sections(&products),
            menu_unavailable: false,
        },
        Err(e) => {
            tracing::warn!("Rendering menu without products: {e}");
            MenuTemplate {
                sections: Vec::new(),
                menu_unavailable: true,
            }
        }
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use localburger_core::Price;

    fn item(name: &str, category: Category) -> CatalogItem {
        CatalogItem {
            id: String::new(),
            name: name.to_string(),
            description: String::new(),
            category,
            price: Price::from_cents(2000),
            image: String::new(),
            badge: None,
            active: true,
        }
    }

    #[test]
    fn test_sections_follow_fixed_category_order() {
        let products = vec![
            item("Suco", Category::Drink),
            item("Classic", Category::Burger),
            item("Batata", Category::Side),
        ];
        let sections = sections(&products);
        let headings: Vec<_> = sections.iter().map(|s| s.heading).collect();
        assert_eq!(
            headings,
            vec!["Hambúrgueres Artesanais", "Porções", "Bebidas"]
        );
    }

    #[test]
    fn test_empty_categories_are_skipped() {
        let sections = sections(&[item("Classic", Category::Burger)]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items.len(), 1);
    }
}
