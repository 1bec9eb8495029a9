//! # Demonstration Data
//!
//! The hardware-store catalogue loaded into an empty database on first
//! start, and into a fresh offline mirror.
//!
//! ## Shape
//! - 6 categories (Droguerie, Sanitaire, Peinture, Quincaillerie,
//!   Outillage, Électricité)
//! - 18 products, each pointing at a category by its position in
//!   [`SEED_CATEGORIES`]
//!
//! Category ids are only known after insertion, so products reference
//! categories by index and the loader maps index → generated id.

use crate::money::Money;
use crate::types::ProductDraft;

/// A seed category.
#[derive(Debug, Clone, Copy)]
pub struct SeedCategory {
    pub name: &'static str,
    pub description: &'static str,
}

/// A seed product. `category` indexes into [`SEED_CATEGORIES`].
#[derive(Debug, Clone, Copy)]
pub struct SeedProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub category: usize,
    pub purchase_cents: i64,
    pub selling_cents: i64,
    pub remaining_stock: i64,
    pub min_stock_level: i64,
}

impl SeedProduct {
    /// Builds the insert draft, given the generated id of its category.
    pub fn to_draft(&self, category_id: Option<i64>) -> ProductDraft {
        ProductDraft {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            category_id,
            purchase_price: Money::from_cents(self.purchase_cents),
            selling_price: Money::from_cents(self.selling_cents),
            remaining_stock: Some(self.remaining_stock),
            min_stock_level: Some(self.min_stock_level),
            image_url: None,
        }
    }
}

const fn category(name: &'static str, description: &'static str) -> SeedCategory {
    SeedCategory { name, description }
}

const fn product(
    name: &'static str,
    description: &'static str,
    category: usize,
    purchase_cents: i64,
    selling_cents: i64,
    remaining_stock: i64,
    min_stock_level: i64,
) -> SeedProduct {
    SeedProduct {
        name,
        description,
        category,
        purchase_cents,
        selling_cents,
        remaining_stock,
        min_stock_level,
    }
}

pub const SEED_CATEGORIES: &[SeedCategory] = &[
    category(
        "Droguerie",
        "Produits chimiques, adhésifs, mastics et composés spécialisés",
    ),
    category(
        "Sanitaire",
        "Équipements de plomberie, tuyaux, robinets, chauffe-eau, accessoires de salle de bain",
    ),
    category(
        "Peinture",
        "Peintures, apprêts, pinceaux, rouleaux, accessoires et outils de peinture",
    ),
    category(
        "Quincaillerie",
        "Fixations, vis, boulons, écrous, charnières, serrures et composants métalliques",
    ),
    category(
        "Outillage",
        "Outils à main, outils électriques, équipements de mesure et de sécurité",
    ),
    category(
        "Électricité",
        "Composants électriques, câblage, interrupteurs, prises, luminaires",
    ),
];

// Indexes into SEED_CATEGORIES
const DROGUERIE: usize = 0;
const SANITAIRE: usize = 1;
const PEINTURE: usize = 2;
const QUINCAILLERIE: usize = 3;
const OUTILLAGE: usize = 4;
const ELECTRICITE: usize = 5;

pub const SEED_PRODUCTS: &[SeedProduct] = &[
    product("Colle PVC forte", "Adhésif haute résistance pour tuyaux PVC", DROGUERIE, 2500, 3500, 50, 10),
    product("Mastic d'étanchéité universel", "Mastic étanche pour joints et fissures", DROGUERIE, 1800, 2800, 75, 15),
    product("Robinet mélangeur chromé", "Robinet mélangeur pour cuisine et salle de bain", SANITAIRE, 15000, 22000, 25, 5),
    product("Tube PVC Ø100mm", "Tuyau PVC 100mm pour évacuation", SANITAIRE, 4500, 6500, 100, 20),
    product("Peinture murale blanche 10L", "Peinture acrylique blanche pour murs intérieurs", PEINTURE, 18000, 25000, 40, 10),
    product("Rouleau de peinture professionnel", "Rouleau pour finitions lisses", PEINTURE, 1500, 2500, 80, 20),
    product("Vis à bois 4x40mm (boîte 100)", "Vis pour menuiserie, tête fraisée", QUINCAILLERIE, 1250, 1800, 200, 50),
    product("Serrure de sécurité 3 points", "Serrure haute sécurité avec 3 clés", QUINCAILLERIE, 8500, 12500, 15, 5),
    product("Perceuse visseuse 18V", "Perceuse sans fil avec batterie et chargeur", OUTILLAGE, 28000, 42000, 12, 3),
    product("Marteau de charpentier 500g", "Marteau avec manche bois", OUTILLAGE, 3500, 5500, 25, 8),
    product("Câble électrique 2.5mm² (rouleau 100m)", "Câble pour installations électriques", ELECTRICITE, 8500, 12000, 20, 5),
    product("Interrupteur simple blanc", "Interrupteur mural blanc", ELECTRICITE, 1200, 1800, 100, 25),
    product("Clé à molette 250mm", "Clé réglable en acier chromé pour plomberie", OUTILLAGE, 4500, 7500, 15, 3),
    product("Tournevis cruciforme PH2", "Tournevis professionnel manche isolé", OUTILLAGE, 850, 1500, 60, 12),
    product("Flexible douche 1.5m", "Flexible en inox pour douchette", SANITAIRE, 2200, 3500, 30, 8),
    product("Ampoule LED 12W E27", "Ampoule économique blanc chaud", ELECTRICITE, 1800, 2800, 80, 20),
    product("Papier abrasif P120 (feuille)", "Papier de verre grain moyen", PEINTURE, 250, 450, 150, 30),
    product("Chevilles fischer Ø8mm (boîte 50)", "Chevilles universelles avec vis", QUINCAILLERIE, 1500, 2500, 90, 25),
];
