//! Menu catalog types.
//!
//! Catalog entries are created and updated only by the external product
//! service; the storefront reads them through the JSON API and treats them
//! as immutable within a session. Wire field names follow the product
//! service's (Portuguese) JSON format.

use serde::{Deserialize, Serialize};

use crate::types::price::Price;

/// Menu category for a catalog item.
///
/// Wire names match the product service's `categoria` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Artisanal burgers (`lanche`).
    #[serde(rename = "lanche")]
    Burger,
    /// Smash burgers.
    #[serde(rename = "smash")]
    Smash,
    /// Sides and portions (`porcao`).
    #[serde(rename = "porcao")]
    Side,
    /// Kids menu.
    #[serde(rename = "kids")]
    Kids,
    /// Drinks (`bebida`).
    #[serde(rename = "bebida")]
    Drink,
}

impl Category {
    /// All categories in menu display order.
    pub const ALL: [Self; 5] = [
        Self::Burger,
        Self::Smash,
        Self::Side,
        Self::Kids,
        Self::Drink,
    ];

    /// Section heading shown on the menu page.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Burger => "Hambúrgueres Artesanais",
            Self::Smash => "Smash Burgers",
            Self::Side => "Porções",
            Self::Kids => "Kids",
            Self::Drink => "Bebidas",
        }
    }
}

/// A purchasable menu item from the product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Product service document ID.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Customer-facing description.
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Menu category.
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Base price before options.
    #[serde(rename = "preco")]
    pub price: Price,
    /// Image URL.
    #[serde(rename = "imagem", default)]
    pub image: String,
    /// Optional badge label (e.g. "Mais pedido").
    #[serde(default)]
    pub badge: Option<String>,
    /// Whether the item is currently offered.
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "_id": "65f1",
            "nome": "Smash Clássico",
            "descricao": "Duplo smash, queijo",
            "categoria": "smash",
            "preco": 24.99,
            "imagem": "/img/smash.jpg",
            "badge": "Novo",
            "ativo": true
        }"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "Smash Clássico");
        assert_eq!(item.category, Category::Smash);
        assert_eq!(item.price.to_string(), "R$ 24,99");
        assert!(item.active);
    }

    #[test]
    fn test_active_defaults_to_true() {
        let json = r#"{"nome": "Suco", "categoria": "bebida", "preco": 8}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert!(item.active);
        assert_eq!(item.category, Category::Drink);
    }

    #[test]
    fn test_category_order_is_stable() {
        assert_eq!(Category::ALL[0], Category::Burger);
        assert_eq!(Category::ALL[4], Category::Drink);
    }
}
