//! Seed the service catalog from YAML.
//!
//! Services carry fixed IDs because the exclusion groups refer to them.
//! Seeding is an upsert keyed by ID, so it can be re-run after editing the
//! file; `--replace` deletes services missing from the file as well.
//!
//! ```yaml
//! services:
//!   - id: 1
//!     name: Lavagem Simples
//!     hours: "1"
//!     pricing:
//!       carro: { cost_p: "15.00", cost_m: "18.00", cost_g: "22.00",
//!                price_p: "50.00", price_m: "60.00", price_g: "75.00" }
//! exclusion_groups:
//!   - label: Lavagem
//!     services: [1, 2]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use arycar_api::db::ServiceRepository;
use arycar_core::{ServiceId, ServiceInput};

use super::connect;

/// Catalog shipped with the CLI.
pub const DEFAULT_SERVICES_FILE: &str = "crates/cli/seed/services.yaml";

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub services: Vec<SeedService>,
    #[serde(default)]
    pub exclusion_groups: Vec<SeedGroup>,
}

#[derive(Debug, Deserialize)]
pub struct SeedService {
    pub id: i32,
    #[serde(flatten)]
    pub service: ServiceInput,
}

#[derive(Debug, Deserialize)]
pub struct SeedGroup {
    pub label: String,
    pub services: Vec<i32>,
}

/// A catalog that passed validation.
#[derive(Debug)]
pub struct ValidCatalog {
    pub services: Vec<(ServiceId, ServiceInput)>,
    pub exclusion_groups: Vec<(String, Vec<ServiceId>)>,
}

/// Check a catalog file, collecting every problem found.
///
/// # Errors
///
/// Returns the list of problems when any entry is invalid.
pub fn validate(catalog: CatalogFile) -> Result<ValidCatalog, Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    let mut services = Vec::with_capacity(catalog.services.len());

    for entry in catalog.services {
        if entry.id < 1 {
            errors.push(format!("service {:?}: id must be positive", entry.service.name));
            continue;
        }
        if !seen.insert(entry.id) {
            errors.push(format!("service id {} is used twice", entry.id));
            continue;
        }
        match entry.service.validated() {
            Ok(input) => services.push((ServiceId::new(entry.id), input)),
            Err(e) => errors.push(format!("service {}: {e}", entry.id)),
        }
    }

    let mut exclusion_groups = Vec::with_capacity(catalog.exclusion_groups.len());
    for group in catalog.exclusion_groups {
        if group.services.len() < 2 {
            errors.push(format!("exclusion group {:?} needs at least two services", group.label));
            continue;
        }
        if let Some(unknown) = group.services.iter().find(|id| !seen.contains(*id)) {
            errors.push(format!(
                "exclusion group {:?} refers to unknown service {unknown}",
                group.label
            ));
            continue;
        }
        let members = group.services.into_iter().map(ServiceId::new).collect();
        exclusion_groups.push((group.label, members));
    }

    if errors.is_empty() {
        Ok(ValidCatalog {
            services,
            exclusion_groups,
        })
    } else {
        Err(errors)
    }
}

/// Seed services and exclusion groups from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, or if a
/// database operation fails.
pub async fn services(file_path: &str, replace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading service catalog");

    // Validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_yaml::from_str(&content)?;
    let catalog = match validate(catalog) {
        Ok(catalog) => catalog,
        Err(errors) => {
            error!("Catalog validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    info!(
        services = catalog.services.len(),
        groups = catalog.exclusion_groups.len(),
        "Catalog validated"
    );

    let pool = connect().await?;
    let repo = ServiceRepository::new(&pool);

    if replace {
        let deleted = repo.delete_all().await?;
        info!(deleted, "Existing services deleted");
    }

    for (id, input) in &catalog.services {
        repo.upsert_with_id(*id, input).await?;
        info!(service_id = %id, name = %input.name, "Service seeded");
    }

    if !catalog.exclusion_groups.is_empty() || replace {
        repo.replace_exclusion_groups(&catalog.exclusion_groups)
            .await?;
        info!(groups = catalog.exclusion_groups.len(), "Exclusion groups replaced");
    }

    info!("Seeding complete!");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use arycar_core::{ExclusionRules, VehicleSize, VehicleType};

    use super::*;

    const BUNDLED: &str = include_str!("../../seed/services.yaml");

    #[test]
    fn test_bundled_catalog_is_valid() {
        let catalog: CatalogFile = serde_yaml::from_str(BUNDLED).unwrap();
        let catalog = validate(catalog).unwrap();

        assert!(catalog.services.len() >= 10);
        let groups: Vec<Vec<ServiceId>> = catalog
            .exclusion_groups
            .iter()
            .map(|(_, members)| members.clone())
            .collect();
        assert_eq!(ExclusionRules::new(groups), ExclusionRules::default());
    }

    #[test]
    fn test_bundled_prices_parse() {
        let catalog: CatalogFile = serde_yaml::from_str(BUNDLED).unwrap();
        let catalog = validate(catalog).unwrap();
        let (_, input) = &catalog.services[0];
        let carro = input.pricing.get(&VehicleType::Carro).unwrap();
        assert!(!carro.price(VehicleSize::M).is_zero());
    }

    #[test]
    fn test_validation_collects_errors() {
        let yaml = r#"
services:
  - id: 1
    name: Lavagem
    pricing:
      carro: { cost_p: "1", cost_m: "1", cost_g: "1", price_p: "2", price_m: "2", price_g: "2" }
  - id: 1
    name: Duplicada
    pricing:
      carro: { cost_p: "1", cost_m: "1", cost_g: "1", price_p: "2", price_m: "2", price_g: "2" }
  - id: 2
    name: "  "
    pricing: {}
exclusion_groups:
  - label: Solo
    services: [1]
  - label: Fantasma
    services: [1, 99]
"#;
        let catalog: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(catalog).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("used twice")));
        assert!(errors.iter().any(|e| e.contains("unknown service 99")));
    }
}
