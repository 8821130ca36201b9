//! Fixed product catalogue inserted into an empty store.

use crate::entity::product;
use crate::repository::{CrudRepository, Filter, RepoError};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    category: &'static str,
    in_stock: bool,
}

const PRODUCTS: [SeedProduct; 10] = [
    SeedProduct {
        name: "Wireless Mouse",
        description: "Ergonomic wireless mouse with USB receiver",
        price: 29.99,
        category: "Electronics",
        in_stock: true,
    },
    SeedProduct {
        name: "Mechanical Keyboard",
        description: "RGB mechanical keyboard with Cherry MX switches",
        price: 89.99,
        category: "Electronics",
        in_stock: true,
    },
    SeedProduct {
        name: "USB-C Hub",
        description: "7-in-1 USB-C hub with HDMI output",
        price: 45.99,
        category: "Electronics",
        in_stock: false,
    },
    SeedProduct {
        name: "Notebook",
        description: "Hardcover lined notebook, 200 pages",
        price: 12.99,
        category: "Office Supplies",
        in_stock: true,
    },
    SeedProduct {
        name: "Desk Lamp",
        description: "LED desk lamp with adjustable brightness",
        price: 34.99,
        category: "Office Supplies",
        in_stock: true,
    },
    SeedProduct {
        name: "Webcam HD",
        description: "1080p HD webcam with built-in microphone",
        price: 59.99,
        category: "Electronics",
        in_stock: true,
    },
    SeedProduct {
        name: "Standing Desk Mat",
        description: "Anti-fatigue standing desk mat",
        price: 39.99,
        category: "Furniture",
        in_stock: true,
    },
    SeedProduct {
        name: "Monitor Stand",
        description: "Adjustable monitor stand with storage drawer",
        price: 49.99,
        category: "Furniture",
        in_stock: false,
    },
    SeedProduct {
        name: "Wireless Charger",
        description: "Fast wireless charging pad for phones",
        price: 19.99,
        category: "Electronics",
        in_stock: true,
    },
    SeedProduct {
        name: "Pen Set",
        description: "Premium ballpoint pen set, pack of 5",
        price: 8.99,
        category: "Office Supplies",
        in_stock: true,
    },
];

/// The seed catalogue as insertable drafts.
pub fn seed_drafts() -> Vec<product::Draft> {
    PRODUCTS
        .iter()
        .map(|p| product::Draft {
            name: p.name.to_string(),
            description: p.description.to_string(),
            price: p.price,
            category: p.category.to_string(),
            in_stock: p.in_stock,
        })
        .collect()
}

/// Insert the catalogue if the products table is empty. Returns how many
/// records were inserted; a non-empty table is left untouched.
pub async fn seed_products(
    repo: &dyn CrudRepository<product::Entity>,
) -> Result<usize, RepoError> {
    let existing = repo.count(Filter::new()).await?;
    if existing > 0 {
        log::debug!("products table has {existing} rows, skipping seed");
        return Ok(0);
    }

    let drafts = seed_drafts();
    let inserted = drafts.len();
    for draft in drafts {
        repo.insert(draft).await?;
    }
    log::info!("seeded {inserted} products");
    Ok(inserted)
}
