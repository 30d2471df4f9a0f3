//! Seed data configuration loaded from config.toml.
//!
//! The `[seed]` table lists the categories, stores and delivery locations that must
//! exist on a fresh install. Seeding is idempotent: rows are matched by name.

use serde::Deserialize;

/// Initial catalog rows created at start-up when missing
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Category names
    #[serde(default)]
    pub categories: Vec<String>,
    /// Stores to create
    #[serde(default)]
    pub stores: Vec<StoreSeed>,
    /// Delivery locations to create
    #[serde(default)]
    pub delivery_locations: Vec<DeliveryLocationSeed>,
}

/// A store entry in `[[seed.stores]]`
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSeed {
    /// Store name
    pub name: String,
    /// Optional location text
    #[serde(default)]
    pub location: Option<String>,
}

/// A delivery location entry in `[[seed.delivery_locations]]`
#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryLocationSeed {
    /// Location name
    pub name: String,
    /// Address or pickup instructions
    pub address: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                "Turrones".to_string(),
                "Dulces".to_string(),
                "Chocolates".to_string(),
            ],
            stores: vec![
                StoreSeed {
                    name: "Tienda Principal".to_string(),
                    location: Some("Centro de la ciudad".to_string()),
                },
                StoreSeed {
                    name: "Sucursal Norte".to_string(),
                    location: Some("Zona Norte".to_string()),
                },
            ],
            delivery_locations: vec![
                DeliveryLocationSeed {
                    name: "Domicilio".to_string(),
                    address: "Entrega a domicilio".to_string(),
                },
                DeliveryLocationSeed {
                    name: "Punto de Recogida".to_string(),
                    address: "Recoger en tienda".to_string(),
                },
            ],
        }
    }
}
